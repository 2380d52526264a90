use super::model::{MovieRecord, dedupe_by_id};
use super::provider::{CatalogProvider, FetchFailure};
use async_trait::async_trait;
use std::path::Path;
use tracing::info;

/// In-memory catalog, loaded from a JSON array of movie records.
#[derive(Clone, Debug)]
pub struct StaticCatalog {
    movies: Vec<MovieRecord>,
}

impl StaticCatalog {
    pub fn new(movies: Vec<MovieRecord>) -> Self {
        Self {
            movies: dedupe_by_id(movies),
        }
    }

    pub async fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let raw = tokio::fs::read_to_string(path).await?;
        let movies: Vec<MovieRecord> = serde_json::from_str(&raw)?;

        info!("✅ Loaded {} movies from {}", movies.len(), path.display());
        Ok(Self::new(movies))
    }
}

#[async_trait]
impl CatalogProvider for StaticCatalog {
    async fn recent(&self) -> Result<Vec<MovieRecord>, FetchFailure> {
        Ok(self.movies.clone())
    }

    async fn recommendations(&self, seed_title: &str) -> Result<Vec<MovieRecord>, FetchFailure> {
        Ok(self
            .movies
            .iter()
            .filter(|m| m.title != seed_title)
            .cloned()
            .collect())
    }

    async fn search(&self, query: &str) -> Result<Vec<MovieRecord>, FetchFailure> {
        let needle = query.to_lowercase();
        Ok(self
            .movies
            .iter()
            .filter(|m| {
                m.title.to_lowercase().contains(&needle)
                    || m.description.to_lowercase().contains(&needle)
                    || m.genres.iter().any(|g| g.to_lowercase().contains(&needle))
            })
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::catalog::model::fixtures::movie;

    fn catalog() -> StaticCatalog {
        let mut noir = movie("m3", "Night Shift");
        noir.genres = vec!["Noir".to_string()];
        StaticCatalog::new(vec![movie("m1", "Heat"), movie("m2", "Ronin"), noir])
    }

    #[tokio::test]
    async fn recent_keeps_file_order() {
        let ids: Vec<_> = catalog().recent().await.unwrap().into_iter().map(|m| m.id).collect();
        assert_eq!(ids, ["m1", "m2", "m3"]);
    }

    #[tokio::test]
    async fn recommendations_exclude_seed() {
        let recs = catalog().recommendations("Heat").await.unwrap();
        assert_eq!(recs.len(), 2);
        assert!(recs.iter().all(|m| m.title != "Heat"));
    }

    #[tokio::test]
    async fn search_matches_title_and_genre_case_insensitively() {
        assert_eq!(catalog().search("rONin").await.unwrap()[0].id, "m2");
        assert_eq!(catalog().search("noir").await.unwrap()[0].id, "m3");
        assert!(catalog().search("musical").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn load_reads_json_file() {
        let path = std::env::temp_dir().join(format!("limestream-{}.json", uuid::Uuid::new_v4()));
        let body = serde_json::to_string(&vec![movie("m1", "Heat")]).unwrap();
        tokio::fs::write(&path, body).await.unwrap();

        let loaded = StaticCatalog::load(&path).await.unwrap();
        let _ = tokio::fs::remove_file(&path).await;

        assert_eq!(loaded.recent().await.unwrap()[0].title, "Heat");
    }
}
