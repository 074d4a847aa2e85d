use utoipa::OpenApi;

use crate::error::ErrorResponse;
use crate::handlers;
use crate::models::{
    ClearResponse, KvTestResponse, ListResponse, Location, LocationDataDocument, LocationGroup,
    PathPoint, PathSubmission, SubmitResponse,
};

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "ikutio-kv API",
        version = "0.1.0",
        description = "Stores and lists GPS path submissions in a key-value store"
    ),
    paths(
        handlers::root::root_handler,
        handlers::kv_test::kv_test_handler,
        handlers::submit::submit_handler,
        handlers::list::list_handler,
        handlers::clear::clear_handler
    ),
    components(
        schemas(
            Location,
            LocationGroup,
            LocationDataDocument,
            PathPoint,
            PathSubmission,
            SubmitResponse,
            ListResponse,
            ClearResponse,
            KvTestResponse,
            ErrorResponse
        )
    ),
    tags(
        (name = "meta", description = "Greeting and store connectivity check"),
        (name = "locations", description = "GPS path submissions")
    )
)]
pub struct ApiDoc;
