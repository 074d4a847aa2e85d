use crate::error::{ApiError, ErrorResponse};
use crate::models::{LocationDataDocument, PathSubmission, SubmitResponse};
use crate::routes;
use crate::state::AppState;
use axum::{body::Bytes, extract::State, http::StatusCode, Json};

/// POST /locations handler - Store one GPS path
///
/// The body is taken as raw bytes and schema-checked here, so every
/// malformed body gets the same 400 shape regardless of content type.
#[utoipa::path(
    post,
    path = routes::LOCATIONS,
    request_body = PathSubmission,
    responses(
        (status = 201, description = "Path stored", body = SubmitResponse),
        (status = 400, description = "Malformed or missing body", body = ErrorResponse),
        (status = 500, description = "Store error", body = ErrorResponse)
    ),
    tag = "locations"
)]
pub async fn submit_handler(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<SubmitResponse>), ApiError> {
    let submission = PathSubmission::parse(&body)?;

    let submitted = state
        .service
        .submit_path(submission.path_data)
        .await
        .map_err(ApiError::StoreFailed)?;

    Ok((
        StatusCode::CREATED,
        Json(SubmitResponse {
            success: true,
            key: submitted.key,
            data: LocationDataDocument {
                location_groups: vec![submitted.group],
            },
        }),
    ))
}
