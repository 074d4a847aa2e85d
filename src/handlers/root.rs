use crate::routes;

pub const GREETING: &str = "Hello from ikutio-kv!";

/// GET / handler - Plain-text greeting
#[utoipa::path(
    get,
    path = routes::ROOT,
    responses(
        (status = 200, description = "Greeting", body = String, content_type = "text/plain")
    ),
    tag = "meta"
)]
pub async fn root_handler() -> &'static str {
    GREETING
}
