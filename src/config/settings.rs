use crate::config::env::{EnvKey, EnvSource, ProcessEnv};
use crate::infrastructure::gemini::client::{DEFAULT_BASE_URL, DEFAULT_MODEL};
use serde::Deserialize;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;
use url::Url;

pub const DEFAULT_FALLBACK_QUERY: &str = "Trending 2025 movies";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required setting {0}")]
    Missing(&'static str),
    #[error("invalid setting {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub enum CatalogBackend {
    Gemini {
        api_key: String,
        model: String,
        base_url: String,
        timeout: Duration,
    },
    Static {
        fixture_path: PathBuf,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum BackendKind {
    Gemini,
    Static,
}

impl FromStr for BackendKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gemini" => Ok(BackendKind::Gemini),
            "static" => Ok(BackendKind::Static),
            other => Err(format!("unknown catalog provider '{other}'")),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct AppConfig {
    pub server_port: u16,
    pub catalog: CatalogBackend,
    pub fallback_query: String,
    pub session_idle: Duration,
    pub session_sweep: Duration,
}

impl AppConfig {
    pub fn new() -> Result<Self, ConfigError> {
        Self::from_source(&ProcessEnv)
    }

    pub fn from_source(env: &impl EnvSource) -> Result<Self, ConfigError> {
        let kind = env
            .get_or(EnvKey::CatalogProvider, "gemini")
            .parse::<BackendKind>()
            .map_err(|reason| ConfigError::Invalid {
                key: EnvKey::CatalogProvider.as_str(),
                reason,
            })?;

        let catalog = match kind {
            BackendKind::Gemini => {
                let base_url = env.get_or(EnvKey::GeminiBaseUrl, DEFAULT_BASE_URL);
                Url::parse(&base_url).map_err(|e| ConfigError::Invalid {
                    key: EnvKey::GeminiBaseUrl.as_str(),
                    reason: e.to_string(),
                })?;

                CatalogBackend::Gemini {
                    api_key: env
                        .get(EnvKey::GeminiApiKey)
                        .ok_or(ConfigError::Missing(EnvKey::GeminiApiKey.as_str()))?,
                    model: env.get_or(EnvKey::GeminiModel, DEFAULT_MODEL),
                    base_url,
                    timeout: Duration::from_secs(env.get_parsed(EnvKey::GeminiTimeoutSecs, 30)),
                }
            }
            BackendKind::Static => CatalogBackend::Static {
                fixture_path: env
                    .get(EnvKey::CatalogFixturePath)
                    .map(PathBuf::from)
                    .ok_or(ConfigError::Missing(EnvKey::CatalogFixturePath.as_str()))?,
            },
        };

        Ok(Self {
            server_port: env.get_parsed(EnvKey::ServerPort, 3000),
            catalog,
            fallback_query: env.get_or(EnvKey::FallbackQuery, DEFAULT_FALLBACK_QUERY),
            session_idle: Duration::from_secs(env.get_parsed(EnvKey::SessionIdleSecs, 1800)),
            session_sweep: Duration::from_secs(env.get_parsed(EnvKey::SessionSweepSecs, 60)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn gemini_defaults() {
        let env = HashMap::from([("GEMINI_API_KEY", "k-123")]);
        let config = AppConfig::from_source(&env).unwrap();

        assert_eq!(config.server_port, 3000);
        assert_eq!(config.fallback_query, "Trending 2025 movies");
        assert_eq!(config.session_idle, Duration::from_secs(1800));
        assert_eq!(
            config.catalog,
            CatalogBackend::Gemini {
                api_key: "k-123".to_string(),
                model: "gemini-2.5-flash".to_string(),
                base_url: DEFAULT_BASE_URL.to_string(),
                timeout: Duration::from_secs(30),
            }
        );
    }

    #[test]
    fn gemini_requires_api_key() {
        let env: HashMap<&str, &str> = HashMap::new();
        assert!(matches!(
            AppConfig::from_source(&env),
            Err(ConfigError::Missing("GEMINI_API_KEY"))
        ));
    }

    #[test]
    fn static_backend_needs_fixture_path() {
        let env = HashMap::from([("CATALOG_PROVIDER", "Static")]);
        assert!(matches!(
            AppConfig::from_source(&env),
            Err(ConfigError::Missing("CATALOG_FIXTURE_PATH"))
        ));

        let env = HashMap::from([
            ("CATALOG_PROVIDER", "static"),
            ("CATALOG_FIXTURE_PATH", "/srv/movies.json"),
            ("FALLBACK_QUERY", "Top rated movies 2024"),
            ("APP_PORT", "8080"),
        ]);
        let config = AppConfig::from_source(&env).unwrap();
        assert_eq!(config.server_port, 8080);
        assert_eq!(config.fallback_query, "Top rated movies 2024");
        assert_eq!(
            config.catalog,
            CatalogBackend::Static {
                fixture_path: PathBuf::from("/srv/movies.json")
            }
        );
    }

    #[test]
    fn rejects_unknown_provider_and_bad_url() {
        let env = HashMap::from([("CATALOG_PROVIDER", "imdb")]);
        assert!(matches!(
            AppConfig::from_source(&env),
            Err(ConfigError::Invalid { key: "CATALOG_PROVIDER", .. })
        ));

        let env = HashMap::from([("GEMINI_API_KEY", "k"), ("GEMINI_BASE_URL", "not a url")]);
        assert!(matches!(
            AppConfig::from_source(&env),
            Err(ConfigError::Invalid { key: "GEMINI_BASE_URL", .. })
        ));
    }

    #[test]
    fn unparsable_numbers_fall_back_to_defaults() {
        let env = HashMap::from([("GEMINI_API_KEY", "k"), ("APP_PORT", "eighty")]);
        assert_eq!(AppConfig::from_source(&env).unwrap().server_port, 3000);
    }
}
