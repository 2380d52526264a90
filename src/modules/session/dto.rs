use super::model::{HeroStatus, Rail, SearchOutcome, SessionState};
use super::registry::SessionHandle;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SearchRequest {
    #[validate(length(max = 200, message = "Search query is too long"))]
    pub query: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackRequest {
    #[validate(length(min = 1, message = "Movie id is required"))]
    pub movie_id: String,
}

pub const MAX_WAIT_SECS: u64 = 30;

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct WaitQuery {
    /// Hold the response until loading finishes, for at most this many
    /// seconds (capped at 30).
    pub wait_secs: Option<u64>,
}

impl WaitQuery {
    pub fn wait(&self) -> Option<std::time::Duration> {
        self.wait_secs
            .filter(|secs| *secs > 0)
            .map(|secs| std::time::Duration::from_secs(secs.min(MAX_WAIT_SECS)))
    }
}

/// Snapshot plus everything the storefront derives from it.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub id: Uuid,
    #[serde(with = "time::serde::iso8601")]
    #[schema(value_type = String, format = DateTime)]
    pub created_at: OffsetDateTime,
    #[serde(flatten)]
    pub state: SessionState,
    pub hero_status: HeroStatus,
    pub overlay_open: bool,
    pub player_open: bool,
    pub rails: Vec<Rail>,
}

impl From<&SessionHandle> for SessionView {
    fn from(handle: &SessionHandle) -> Self {
        let state = handle.session.snapshot();
        Self {
            id: handle.id,
            created_at: handle.created_at,
            hero_status: state.hero_status(),
            overlay_open: state.overlay_open(),
            player_open: state.player_open(),
            rails: state.rails(),
            state,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SearchResponse {
    pub outcome: SearchOutcome,
    pub session: SessionView,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn wait_is_capped_and_zero_means_no_wait() {
        let q = |wait_secs| WaitQuery { wait_secs };
        assert_eq!(q(None).wait(), None);
        assert_eq!(q(Some(0)).wait(), None);
        assert_eq!(q(Some(5)).wait(), Some(Duration::from_secs(5)));
        assert_eq!(q(Some(600)).wait(), Some(Duration::from_secs(MAX_WAIT_SECS)));
    }
}
