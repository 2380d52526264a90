use super::dto::{PlaybackRequest, SearchRequest, SearchResponse, SessionView, WaitQuery};
use super::service::SessionService;
use crate::common::response::{ApiError, ApiResponse, ApiSuccess};
use crate::state::AppState;
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use tower_cookies::{Cookie, Cookies};
use uuid::Uuid;

pub const SESSION_COOKIE: &str = "session_id";

/// Start a storefront session
#[utoipa::path(
    post,
    path = "/api/v1/sessions",
    responses(
        (status = 201, description = "Session created, catalog loading", body = ApiResponse<SessionView>)
    ),
    tag = "Session"
)]
pub async fn create_session(State(state): State<AppState>, cookies: Cookies) -> impl IntoResponse {
    let view = SessionService::create(state).await;

    let mut cookie = Cookie::new(SESSION_COOKIE, view.id.to_string());
    cookie.set_http_only(true);
    cookie.set_path("/api/v1/sessions");
    cookies.add(cookie);

    ApiSuccess(
        ApiResponse::success(view, "Session created successfully"),
        StatusCode::CREATED,
    )
}

/// Get the session bound to the `session_id` cookie
#[utoipa::path(
    get,
    path = "/api/v1/sessions/current",
    responses(
        (status = 200, description = "Session state", body = ApiResponse<SessionView>),
        (status = 404, description = "No session cookie or session expired")
    ),
    tag = "Session"
)]
pub async fn current_session(State(state): State<AppState>, cookies: Cookies) -> impl IntoResponse {
    let id = cookies
        .get(SESSION_COOKIE)
        .and_then(|c| Uuid::parse_str(c.value()).ok());

    let Some(id) = id else {
        return ApiError::not_found("No active session").into_response();
    };

    match SessionService::view(state, id).await {
        Ok(view) => ApiSuccess(
            ApiResponse::success(view, "Session retrieved successfully"),
            StatusCode::OK,
        )
        .into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}

/// Get session state
///
/// With `wait_secs`, answers once the catalog has loaded or the wait runs out.
#[utoipa::path(
    get,
    path = "/api/v1/sessions/{id}",
    params(
        ("id" = Uuid, Path, description = "Session ID"),
        WaitQuery
    ),
    responses(
        (status = 200, description = "Session state", body = ApiResponse<SessionView>),
        (status = 404, description = "Session not found")
    ),
    tag = "Session"
)]
pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<WaitQuery>,
) -> impl IntoResponse {
    let result = match query.wait() {
        Some(wait) => SessionService::view_when_loaded(state, id, wait).await,
        None => SessionService::view(state, id).await,
    };

    match result {
        Ok(view) => ApiSuccess(
            ApiResponse::success(view, "Session retrieved successfully"),
            StatusCode::OK,
        )
        .into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}

/// End a session
#[utoipa::path(
    delete,
    path = "/api/v1/sessions/{id}",
    params(
        ("id" = Uuid, Path, description = "Session ID")
    ),
    responses(
        (status = 200, description = "Session closed", body = ApiResponse<String>),
        (status = 404, description = "Session not found")
    ),
    tag = "Session"
)]
pub async fn delete_session(
    State(state): State<AppState>,
    cookies: Cookies,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    match SessionService::remove(state, id).await {
        Ok(_) => {
            if cookies.get(SESSION_COOKIE).is_some_and(|c| c.value() == id.to_string()) {
                let mut cookie = Cookie::new(SESSION_COOKIE, "");
                cookie.set_path("/api/v1/sessions");
                cookies.remove(cookie);
            }
            ApiSuccess(ApiResponse::success((), "Session closed successfully"), StatusCode::OK)
                .into_response()
        }
        Err(e) => ApiError::from(e).into_response(),
    }
}

/// Search the catalog
#[utoipa::path(
    post,
    path = "/api/v1/sessions/{id}/search",
    params(
        ("id" = Uuid, Path, description = "Session ID")
    ),
    request_body = SearchRequest,
    responses(
        (status = 200, description = "Search finished; see outcome", body = ApiResponse<SearchResponse>),
        (status = 400, description = "Bad Request"),
        (status = 404, description = "Session not found")
    ),
    tag = "Session"
)]
pub async fn search(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<SearchRequest>,
) -> impl IntoResponse {
    match SessionService::search(state, id, payload).await {
        Ok(res) => ApiSuccess(ApiResponse::success(res, "Search completed"), StatusCode::OK)
            .into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}

/// Close the search overlay
#[utoipa::path(
    delete,
    path = "/api/v1/sessions/{id}/search",
    params(
        ("id" = Uuid, Path, description = "Session ID")
    ),
    responses(
        (status = 200, description = "Search cleared", body = ApiResponse<SessionView>),
        (status = 404, description = "Session not found")
    ),
    tag = "Session"
)]
pub async fn clear_search(State(state): State<AppState>, Path(id): Path<Uuid>) -> impl IntoResponse {
    match SessionService::clear_search(state, id).await {
        Ok(view) => ApiSuccess(ApiResponse::success(view, "Search cleared"), StatusCode::OK)
            .into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}

/// Open the player on a movie from the session
#[utoipa::path(
    post,
    path = "/api/v1/sessions/{id}/playback",
    params(
        ("id" = Uuid, Path, description = "Session ID")
    ),
    request_body = PlaybackRequest,
    responses(
        (status = 200, description = "Playback started", body = ApiResponse<SessionView>),
        (status = 400, description = "Bad Request"),
        (status = 404, description = "Session or movie not found")
    ),
    tag = "Session"
)]
pub async fn start_playback(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<PlaybackRequest>,
) -> impl IntoResponse {
    match SessionService::play(state, id, payload).await {
        Ok(view) => ApiSuccess(ApiResponse::success(view, "Playback started"), StatusCode::OK)
            .into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}

/// Close the player
#[utoipa::path(
    delete,
    path = "/api/v1/sessions/{id}/playback",
    params(
        ("id" = Uuid, Path, description = "Session ID")
    ),
    responses(
        (status = 200, description = "Player closed", body = ApiResponse<SessionView>),
        (status = 404, description = "Session not found")
    ),
    tag = "Session"
)]
pub async fn stop_playback(State(state): State<AppState>, Path(id): Path<Uuid>) -> impl IntoResponse {
    match SessionService::close_player(state, id).await {
        Ok(view) => ApiSuccess(ApiResponse::success(view, "Player closed"), StatusCode::OK)
            .into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}
