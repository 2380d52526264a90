use super::controller::CatalogSession;
use super::dto::{PlaybackRequest, SearchRequest, SearchResponse, SessionView};
use super::registry::SessionHandle;
use crate::common::response::ApiError;
use crate::state::AppState;
use axum::http::StatusCode;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Session {0} not found")]
    NotFound(Uuid),
    #[error("Movie {0} is not part of this session")]
    MovieNotFound(String),
    #[error("{0}")]
    Validation(String),
    #[error("Search task failed: {0}")]
    Internal(String),
}

impl From<SessionError> for ApiError {
    fn from(e: SessionError) -> Self {
        match e {
            SessionError::NotFound(_) | SessionError::MovieNotFound(_) => {
                ApiError::not_found(e.to_string())
            }
            SessionError::Validation(_) => ApiError::bad_request(e.to_string()),
            SessionError::Internal(_) => {
                ApiError(e.to_string(), StatusCode::INTERNAL_SERVER_ERROR)
            }
        }
    }
}

impl From<validator::ValidationErrors> for SessionError {
    fn from(e: validator::ValidationErrors) -> Self {
        SessionError::Validation(e.to_string())
    }
}

pub struct SessionService;

impl SessionService {
    async fn handle(state: &AppState, id: Uuid) -> Result<SessionHandle, SessionError> {
        state
            .sessions
            .get(id)
            .await
            .ok_or(SessionError::NotFound(id))
    }

    /// Registers a new session and starts loading its catalog in the
    /// background. The returned view is still `loading`.
    pub async fn create(state: AppState) -> SessionView {
        let session = CatalogSession::new(state.catalog.clone(), state.config.fallback_query.clone());
        let handle = state.sessions.insert(session).await;
        info!("🎬 Session {} created", handle.id);

        let id = handle.id;
        let session = handle.session.clone();
        tokio::spawn(async move {
            let outcome = session.initialize().await;
            info!("Session {} initialized: {:?}", id, outcome);
        });

        SessionView::from(&handle)
    }

    pub async fn view(state: AppState, id: Uuid) -> Result<SessionView, SessionError> {
        let handle = Self::handle(&state, id).await?;
        Ok(SessionView::from(&handle))
    }

    /// Like [`view`](Self::view), but first waits up to `wait` for the
    /// catalog to finish loading.
    pub async fn view_when_loaded(
        state: AppState,
        id: Uuid,
        wait: Duration,
    ) -> Result<SessionView, SessionError> {
        let handle = Self::handle(&state, id).await?;

        let mut rx = handle.session.subscribe();
        if tokio::time::timeout(wait, rx.wait_for(|s| !s.loading))
            .await
            .is_err()
        {
            info!("Session {} still loading after {:?}", id, wait);
        }

        Ok(SessionView::from(&handle))
    }

    pub async fn remove(state: AppState, id: Uuid) -> Result<(), SessionError> {
        if !state.sessions.remove(id).await {
            return Err(SessionError::NotFound(id));
        }
        info!("Session {} closed", id);
        Ok(())
    }

    pub async fn search(
        state: AppState,
        id: Uuid,
        req: SearchRequest,
    ) -> Result<SearchResponse, SessionError> {
        req.validate()?;
        let handle = Self::handle(&state, id).await?;

        // The fetch runs on its own task so a dropped request does not
        // abort it.
        let session = handle.session.clone();
        let outcome = tokio::spawn(async move { session.search(&req.query).await })
            .await
            .map_err(|e| SessionError::Internal(e.to_string()))?;

        Ok(SearchResponse {
            outcome,
            session: SessionView::from(&handle),
        })
    }

    pub async fn clear_search(state: AppState, id: Uuid) -> Result<SessionView, SessionError> {
        let handle = Self::handle(&state, id).await?;
        handle.session.clear_search();
        Ok(SessionView::from(&handle))
    }

    pub async fn play(
        state: AppState,
        id: Uuid,
        req: PlaybackRequest,
    ) -> Result<SessionView, SessionError> {
        req.validate()?;
        let handle = Self::handle(&state, id).await?;

        if handle.session.select_for_playback_by_id(&req.movie_id).is_none() {
            warn!("Session {} asked to play unknown movie {}", id, req.movie_id);
            return Err(SessionError::MovieNotFound(req.movie_id));
        }

        Ok(SessionView::from(&handle))
    }

    pub async fn close_player(state: AppState, id: Uuid) -> Result<SessionView, SessionError> {
        let handle = Self::handle(&state, id).await?;
        handle.session.close_player();
        Ok(SessionView::from(&handle))
    }
}
