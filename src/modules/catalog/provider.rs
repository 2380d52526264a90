use super::model::MovieRecord;
use async_trait::async_trait;
use thiserror::Error;

/// The one failure condition a catalog fetch can produce.
///
/// Variants exist for diagnostics only; callers treat them all the same.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FetchFailure {
    #[error("catalog request failed: {0}")]
    Transport(String),
    #[error("catalog provider returned {status}: {message}")]
    Provider { status: u16, message: String },
    #[error("malformed catalog response: {0}")]
    Malformed(String),
}

impl FetchFailure {
    pub fn reason(&self) -> String {
        self.to_string()
    }
}

/// Source of movie records for a catalog session.
///
/// An empty list is a valid answer and distinct from a failure.
#[async_trait]
pub trait CatalogProvider: Send + Sync {
    /// Recency-ordered slice of the catalog. Index 0 becomes the hero.
    async fn recent(&self) -> Result<Vec<MovieRecord>, FetchFailure>;

    async fn recommendations(&self, seed_title: &str) -> Result<Vec<MovieRecord>, FetchFailure>;

    async fn search(&self, query: &str) -> Result<Vec<MovieRecord>, FetchFailure>;
}
