use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A single catalog entry as handed out by a [`CatalogProvider`].
///
/// Field contents are trusted as-is; only presence is enforced by
/// deserialization.
///
/// [`CatalogProvider`]: super::provider::CatalogProvider
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MovieRecord {
    pub id: String,
    pub title: String,
    pub description: String,
    /// Certification, e.g. "PG-13".
    pub rating: String,
    pub year: i32,
    /// Display string, e.g. "2h 14m".
    pub duration: String,
    pub genres: Vec<String>,
    pub poster_url: String,
    pub backdrop_url: String,
    pub stream_url: String,
    #[serde(rename = "is4K")]
    pub is_4k: bool,
}

impl MovieRecord {
    pub fn quality_label(&self) -> &'static str {
        if self.is_4k { "4K Ultra HD" } else { "HD" }
    }
}

/// Drops records whose id already appeared earlier in the list.
pub fn dedupe_by_id(records: Vec<MovieRecord>) -> Vec<MovieRecord> {
    let mut seen = std::collections::HashSet::new();
    records
        .into_iter()
        .filter(|m| seen.insert(m.id.clone()))
        .collect()
}

#[cfg(test)]
pub mod fixtures {
    use super::MovieRecord;

    pub fn movie(id: &str, title: &str) -> MovieRecord {
        MovieRecord {
            id: id.to_string(),
            title: title.to_string(),
            description: format!("{title} description"),
            rating: "PG-13".to_string(),
            year: 2024,
            duration: "2h 1m".to_string(),
            genres: vec!["Action".to_string(), "Thriller".to_string()],
            poster_url: format!("https://img.example/{id}/poster.jpg"),
            backdrop_url: format!("https://img.example/{id}/backdrop.jpg"),
            stream_url: format!("https://cdn.example/{id}/master.m3u8"),
            is_4k: true,
        }
    }
}
