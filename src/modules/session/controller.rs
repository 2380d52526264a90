use super::model::{FetchOutcome, HeroSource, InitOutcome, SearchOutcome, SessionState};
use crate::modules::catalog::model::MovieRecord;
use crate::modules::catalog::provider::CatalogProvider;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use tokio::sync::watch;
use tracing::{error, info, warn};

/// Coordinates catalog loading, search and playback selection for one
/// viewer session.
///
/// Each operation publishes a fresh snapshot on a watch channel. Searches
/// carry a sequence token; a response that is no longer the latest is
/// dropped instead of overwriting newer state.
pub struct CatalogSession {
    provider: Arc<dyn CatalogProvider>,
    fallback_query: String,
    state: watch::Sender<SessionState>,
    started: AtomicBool,
    search_seq: AtomicU64,
}

impl CatalogSession {
    pub fn new(provider: Arc<dyn CatalogProvider>, fallback_query: impl Into<String>) -> Self {
        let (state, _) = watch::channel(SessionState::default());
        Self {
            provider,
            fallback_query: fallback_query.into(),
            state,
            started: AtomicBool::new(false),
            search_seq: AtomicU64::new(0),
        }
    }

    pub fn snapshot(&self) -> SessionState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    /// Loads the recent slice, picks the hero and fetches recommendations.
    ///
    /// Runs once per session. `loading` is cleared on every path.
    pub async fn initialize(&self) -> InitOutcome {
        if self.started.swap(true, Ordering::SeqCst) {
            warn!("Session initialize called twice, ignoring");
            return InitOutcome::AlreadyStarted;
        }

        self.state.send_modify(|s| s.loading = true);
        let outcome = self.load_catalog().await;
        self.state.send_modify(|s| s.loading = false);

        outcome
    }

    async fn load_catalog(&self) -> InitOutcome {
        let recent = match self.provider.recent().await {
            Ok(recent) => recent,
            Err(e) => {
                error!("Failed to load recent movies: {}", e);
                return InitOutcome::Completed {
                    recent: FetchOutcome::Failed { reason: e.reason() },
                    recommendations: FetchOutcome::NotRequested,
                    hero: HeroSource::Missing,
                };
            }
        };

        let recent_outcome = FetchOutcome::Loaded {
            count: recent.len(),
        };
        let hero = recent.first().cloned();
        let seed = match &hero {
            Some(movie) => movie.title.clone(),
            None => {
                info!("No recent movies, falling back to \"{}\"", self.fallback_query);
                self.fallback_query.clone()
            }
        };
        let mut hero_source = if hero.is_some() {
            HeroSource::Recent
        } else {
            HeroSource::Missing
        };

        self.state.send_modify(|s| {
            s.recent_movies = recent;
            if hero.is_some() {
                s.hero_movie = hero;
            }
        });

        let recommendations = match self.provider.recommendations(&seed).await {
            Ok(recs) => {
                let count = recs.len();
                let promote = hero_source == HeroSource::Missing && !recs.is_empty();
                if promote {
                    hero_source = HeroSource::Fallback;
                }
                self.state.send_modify(|s| {
                    if promote {
                        s.hero_movie = recs.first().cloned();
                    }
                    s.recommendations = recs;
                });
                FetchOutcome::Loaded { count }
            }
            Err(e) => {
                error!("Failed to load recommendations for \"{}\": {}", seed, e);
                FetchOutcome::Failed { reason: e.reason() }
            }
        };

        InitOutcome::Completed {
            recent: recent_outcome,
            recommendations,
            hero: hero_source,
        }
    }

    /// Runs a catalog search. Blank queries are ignored.
    pub async fn search(&self, query: &str) -> SearchOutcome {
        let query = query.trim();
        if query.is_empty() {
            return SearchOutcome::Skipped;
        }

        let mut token = 0;
        self.state.send_modify(|s| {
            token = self.search_seq.fetch_add(1, Ordering::SeqCst) + 1;
            s.is_searching = true;
            s.search_query = query.to_string();
        });

        let mut pending = PendingSearch {
            session: self,
            token,
            settled: false,
        };
        let result = self.provider.search(query).await;
        pending.settled = true;
        if let Err(e) = &result {
            error!("Search failed for \"{}\": {}", query, e);
        }

        let mut outcome = SearchOutcome::Superseded;
        self.state.send_if_modified(|s| {
            if !self.is_latest_search(token) {
                return false;
            }
            s.is_searching = false;
            outcome = match result {
                Ok(results) => {
                    let count = results.len();
                    s.search_results = results;
                    SearchOutcome::Applied { count }
                }
                Err(e) => SearchOutcome::Failed { reason: e.reason() },
            };
            true
        });

        if outcome == SearchOutcome::Superseded {
            info!("Dropping stale search response for \"{}\"", query);
        }
        outcome
    }

    fn is_latest_search(&self, token: u64) -> bool {
        self.search_seq.load(Ordering::SeqCst) == token
    }

    /// Closes the search overlay. Any search still in flight is abandoned.
    pub fn clear_search(&self) {
        self.state.send_modify(|s| {
            self.search_seq.fetch_add(1, Ordering::SeqCst);
            s.search_results.clear();
            s.search_query.clear();
            s.is_searching = false;
        });
    }

    /// Opens the player on top of whatever else is showing.
    pub fn select_for_playback(&self, movie: MovieRecord) {
        info!("Playing \"{}\" ({}, {})", movie.title, movie.id, movie.quality_label());
        self.state.send_modify(|s| s.playing_movie = Some(movie));
    }

    /// Looks `movie_id` up among the records on screen and plays it, in a
    /// single state update. Returns the record, or `None` if nothing
    /// matched and the player was left alone.
    pub fn select_for_playback_by_id(&self, movie_id: &str) -> Option<MovieRecord> {
        let mut selected = None;
        self.state.send_if_modified(|s| {
            let Some(movie) = s.find_movie(movie_id).cloned() else {
                return false;
            };
            s.playing_movie = Some(movie.clone());
            selected = Some(movie);
            true
        });

        if let Some(movie) = &selected {
            info!("Playing \"{}\" ({}, {})", movie.title, movie.id, movie.quality_label());
        }
        selected
    }

    pub fn close_player(&self) {
        self.state.send_if_modified(|s| s.playing_movie.take().is_some());
    }
}

/// Clears `is_searching` if a search future is dropped before its fetch
/// returns, as long as no newer search or clear took over.
struct PendingSearch<'a> {
    session: &'a CatalogSession,
    token: u64,
    settled: bool,
}

impl Drop for PendingSearch<'_> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        let cleared = self.session.state.send_if_modified(|s| {
            if !self.session.is_latest_search(self.token) || !s.is_searching {
                return false;
            }
            s.is_searching = false;
            true
        });
        if cleared {
            warn!("Search {} dropped before the catalog answered", self.token);
        }
    }
}
