use crate::state::AppState;
use axum::Router;
use axum::routing::{get, post};

pub mod controller;
pub mod dto;
pub mod handler;
pub mod model;
pub mod registry;
pub mod service;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(handler::create_session))
        .route("/current", get(handler::current_session))
        .route(
            "/{id}",
            get(handler::get_session).delete(handler::delete_session),
        )
        .route(
            "/{id}/search",
            post(handler::search).delete(handler::clear_search),
        )
        .route(
            "/{id}/playback",
            post(handler::start_playback).delete(handler::stop_playback),
        )
}
