use std::env;
use std::str::FromStr;
use tracing::warn;

#[derive(Debug, Clone, Copy)]
pub enum EnvKey {
    ServerPort,
    CatalogProvider,
    GeminiApiKey,
    GeminiModel,
    GeminiBaseUrl,
    GeminiTimeoutSecs,
    CatalogFixturePath,
    FallbackQuery,
    SessionIdleSecs,
    SessionSweepSecs,
}

impl EnvKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            EnvKey::ServerPort => "APP_PORT",
            EnvKey::CatalogProvider => "CATALOG_PROVIDER",
            EnvKey::GeminiApiKey => "GEMINI_API_KEY",
            EnvKey::GeminiModel => "GEMINI_MODEL",
            EnvKey::GeminiBaseUrl => "GEMINI_BASE_URL",
            EnvKey::GeminiTimeoutSecs => "GEMINI_TIMEOUT_SECS",
            EnvKey::CatalogFixturePath => "CATALOG_FIXTURE_PATH",
            EnvKey::FallbackQuery => "FALLBACK_QUERY",
            EnvKey::SessionIdleSecs => "SESSION_IDLE_SECS",
            EnvKey::SessionSweepSecs => "SESSION_SWEEP_SECS",
        }
    }
}

/// Where configuration values come from. The process environment in
/// production, a map in tests.
pub trait EnvSource {
    fn var(&self, name: &str) -> Option<String>;

    fn get(&self, key: EnvKey) -> Option<String> {
        self.var(key.as_str()).filter(|v| !v.trim().is_empty())
    }

    fn get_or(&self, key: EnvKey, default: &str) -> String {
        self.get(key).unwrap_or_else(|| default.to_string())
    }

    fn get_parsed<T: FromStr>(&self, key: EnvKey, default: T) -> T {
        match self.get(key) {
            Some(val) => val.parse::<T>().unwrap_or_else(|_| {
                warn!("Ignoring unparsable {}={}", key.as_str(), val);
                default
            }),
            None => default,
        }
    }
}

pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, name: &str) -> Option<String> {
        env::var(name).ok()
    }
}

impl EnvSource for std::collections::HashMap<&str, &str> {
    fn var(&self, name: &str) -> Option<String> {
        self.get(name).map(|v| v.to_string())
    }
}
