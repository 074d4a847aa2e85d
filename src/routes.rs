// Route path constants - single source of truth for all API paths

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    routing::get,
};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api_doc::ApiDoc;
use crate::handlers;
use crate::state::AppState;

pub const ROOT: &str = "/";
pub const KV_TEST: &str = "/kv-test";
pub const LOCATIONS: &str = "/locations";
pub const SWAGGER_UI: &str = "/swagger-ui";
pub const OPENAPI_JSON: &str = "/api-docs/openapi.json";

/// CORS restricted to the configured origins
pub fn cors_layer(allowed_origins: Vec<HeaderValue>) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed_origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE])
}

pub fn build_router(state: AppState, cors: CorsLayer) -> Router {
    Router::new()
        .route(ROOT, get(handlers::root_handler))
        .route(KV_TEST, get(handlers::kv_test_handler))
        .route(
            LOCATIONS,
            get(handlers::list_handler)
                .post(handlers::submit_handler)
                .delete(handlers::clear_handler),
        )
        .merge(SwaggerUi::new(SWAGGER_UI).url(OPENAPI_JSON, ApiDoc::openapi()))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
