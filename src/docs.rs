use crate::modules::catalog::model::MovieRecord;
use crate::modules::session::dto::{PlaybackRequest, SearchRequest, SearchResponse, SessionView};
use crate::modules::session::model::{HeroStatus, Rail, SearchOutcome, SessionState};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::session::handler::create_session,
        crate::modules::session::handler::current_session,
        crate::modules::session::handler::get_session,
        crate::modules::session::handler::delete_session,
        crate::modules::session::handler::search,
        crate::modules::session::handler::clear_search,
        crate::modules::session::handler::start_playback,
        crate::modules::session::handler::stop_playback,
    ),
    components(
        schemas(
            MovieRecord, SessionState, SessionView, HeroStatus, Rail,
            SearchRequest, SearchResponse, SearchOutcome, PlaybackRequest,
        )
    ),
    tags(
        (name = "Session", description = "Storefront session: catalog, search and playback")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documents_every_session_route() {
        let doc = ApiDoc::openapi();
        let paths: Vec<_> = doc.paths.paths.keys().cloned().collect();
        for path in [
            "/api/v1/sessions",
            "/api/v1/sessions/current",
            "/api/v1/sessions/{id}",
            "/api/v1/sessions/{id}/search",
            "/api/v1/sessions/{id}/playback",
        ] {
            assert!(paths.iter().any(|p| p == path), "missing {path}");
        }
    }
}
