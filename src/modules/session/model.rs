use crate::modules::catalog::model::MovieRecord;
use serde::Serialize;
use utoipa::ToSchema;

/// Observable state of one catalog session.
///
/// Only [`CatalogSession`](super::controller::CatalogSession) mutates it;
/// everyone else sees cloned snapshots.
#[derive(Debug, Serialize, Clone, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    pub loading: bool,
    pub hero_movie: Option<MovieRecord>,
    pub recent_movies: Vec<MovieRecord>,
    pub recommendations: Vec<MovieRecord>,
    pub search_query: String,
    pub is_searching: bool,
    pub search_results: Vec<MovieRecord>,
    pub playing_movie: Option<MovieRecord>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            loading: true,
            hero_movie: None,
            recent_movies: Vec::new(),
            recommendations: Vec::new(),
            search_query: String::new(),
            is_searching: false,
            search_results: Vec::new(),
            playing_movie: None,
        }
    }
}

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum HeroStatus {
    Loading,
    Ready,
    /// Loading finished without any record to feature.
    Unavailable,
}

#[derive(Debug, Serialize, Clone, PartialEq, Eq, ToSchema)]
pub struct Rail {
    pub title: &'static str,
    pub movies: Vec<MovieRecord>,
}

impl SessionState {
    pub fn overlay_open(&self) -> bool {
        !self.search_results.is_empty()
    }

    pub fn player_open(&self) -> bool {
        self.playing_movie.is_some()
    }

    pub fn hero_status(&self) -> HeroStatus {
        match (self.loading, &self.hero_movie) {
            (true, _) => HeroStatus::Loading,
            (false, Some(_)) => HeroStatus::Ready,
            (false, None) => HeroStatus::Unavailable,
        }
    }

    pub fn rails(&self) -> Vec<Rail> {
        vec![
            Rail {
                title: "Recently Added",
                movies: self.recent_movies.clone(),
            },
            Rail {
                title: "Recommended for You",
                movies: self.recommendations.clone(),
            },
            Rail {
                title: "Trending Now",
                movies: self.recent_movies.iter().rev().cloned().collect(),
            },
        ]
    }

    /// Looks a record up among everything currently on screen.
    pub fn find_movie(&self, id: &str) -> Option<&MovieRecord> {
        self.hero_movie
            .iter()
            .chain(&self.recent_movies)
            .chain(&self.recommendations)
            .chain(&self.search_results)
            .find(|m| m.id == id)
    }
}

/// Result of a single provider call made by an operation.
#[derive(Debug, Serialize, Clone, PartialEq, Eq, ToSchema)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum FetchOutcome {
    Loaded { count: usize },
    Failed { reason: String },
    NotRequested,
}

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum HeroSource {
    Recent,
    Fallback,
    Missing,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InitOutcome {
    Completed {
        recent: FetchOutcome,
        recommendations: FetchOutcome,
        hero: HeroSource,
    },
    /// `initialize` already ran (or is running) for this session.
    AlreadyStarted,
}

#[derive(Debug, Serialize, Clone, PartialEq, Eq, ToSchema)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum SearchOutcome {
    /// Blank query; nothing was fetched or changed.
    Skipped,
    Applied { count: usize },
    /// Previous results were kept.
    Failed { reason: String },
    /// A newer search or a clear happened first; the response was dropped.
    Superseded,
}
