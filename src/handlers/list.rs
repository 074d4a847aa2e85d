use crate::error::{ApiError, ErrorResponse};
use crate::models::ListResponse;
use crate::routes;
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, Json};

/// GET /locations handler - List every stored location group
///
/// Groups from all stored documents are flattened into one list in store
/// enumeration order. Unreadable documents are left out.
#[utoipa::path(
    get,
    path = routes::LOCATIONS,
    responses(
        (status = 200, description = "All stored location groups", body = ListResponse),
        (status = 500, description = "Store error", body = ErrorResponse)
    ),
    tag = "locations"
)]
pub async fn list_handler(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<ListResponse>), ApiError> {
    let location_groups = state
        .service
        .list_all_groups()
        .await
        .map_err(ApiError::RetrieveFailed)?;

    tracing::info!("Listed {} location groups", location_groups.len());

    Ok((StatusCode::OK, Json(ListResponse { location_groups })))
}
