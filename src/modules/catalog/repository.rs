use super::model::{MovieRecord, dedupe_by_id};
use super::provider::{CatalogProvider, FetchFailure};
use crate::infrastructure::gemini::client::GeminiClient;
use async_trait::async_trait;
use tracing::{info, warn};

const SYSTEM_INSTRUCTION: &str = "You are the catalog backend of a movie streaming storefront. \
Answer with a JSON array only. Each element is an object with the keys \
id (string, unique), title, description, rating (certification such as PG-13), \
year (integer), duration (display string such as \"2h 10m\"), genres (array of strings), \
posterUrl, backdropUrl, streamUrl (URLs) and is4K (boolean).";

/// Catalog backed by a generative language model.
#[derive(Clone)]
pub struct GeminiCatalog {
    client: GeminiClient,
}

impl GeminiCatalog {
    pub fn new(client: GeminiClient) -> Self {
        Self { client }
    }

    async fn ask(&self, prompt: String) -> Result<Vec<MovieRecord>, FetchFailure> {
        let text = self.client.generate_json(SYSTEM_INSTRUCTION, &prompt).await?;
        let movies = parse_movie_list(&text)?;
        info!("Catalog returned {} movies", movies.len());
        Ok(movies)
    }
}

#[async_trait]
impl CatalogProvider for GeminiCatalog {
    async fn recent(&self) -> Result<Vec<MovieRecord>, FetchFailure> {
        self.ask("List 12 movies recently added to streaming, newest first.".to_string())
            .await
    }

    async fn recommendations(&self, seed_title: &str) -> Result<Vec<MovieRecord>, FetchFailure> {
        self.ask(format!(
            "Recommend 10 movies for a viewer who enjoyed \"{seed_title}\". Do not include \"{seed_title}\" itself."
        ))
        .await
    }

    async fn search(&self, query: &str) -> Result<Vec<MovieRecord>, FetchFailure> {
        self.ask(format!("Find up to 18 movies matching the search \"{query}\"."))
            .await
    }
}

/// Decodes a model answer into movie records.
///
/// Tolerates markdown fences or prose around the array by decoding the
/// outermost `[...]` slice.
pub fn parse_movie_list(text: &str) -> Result<Vec<MovieRecord>, FetchFailure> {
    let start = text.find('[');
    let end = text.rfind(']');
    let slice = match (start, end) {
        (Some(s), Some(e)) if s < e => &text[s..=e],
        _ => return Err(FetchFailure::Malformed("no JSON array in answer".to_string())),
    };

    let movies: Vec<MovieRecord> =
        serde_json::from_str(slice).map_err(|e| FetchFailure::Malformed(e.to_string()))?;

    let total = movies.len();
    let movies = dedupe_by_id(movies);
    if movies.len() != total {
        warn!("Dropped {} duplicate catalog ids", total - movies.len());
    }
    Ok(movies)
}
