use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::models::ValidationError;
use crate::service::ServiceError;
use crate::store::StoreError;

/// Uniform failure body
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

/// Custom error type for API endpoints
///
/// Each variant records which operation failed; the underlying cause is
/// logged but never echoed to the client.
#[derive(Debug)]
pub enum ApiError {
    /// Request body failed the schema check
    InvalidBody(ValidationError),
    /// Writing a new submission failed
    StoreFailed(ServiceError),
    /// Listing or reading submissions failed
    RetrieveFailed(ServiceError),
    /// Deleting submissions failed
    ClearFailed(ServiceError),
    /// The store round-trip check failed
    KvTestFailed(StoreError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            ApiError::InvalidBody(err) => {
                tracing::info!("Rejected request body: {}", err);
                (StatusCode::BAD_REQUEST, "Invalid JSON data")
            }
            ApiError::StoreFailed(err) => {
                tracing::error!("Error storing locations: {}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, "Failed to store locations")
            }
            ApiError::RetrieveFailed(err) => {
                tracing::error!("Error retrieving locations: {}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, "Failed to retrieve locations")
            }
            ApiError::ClearFailed(err) => {
                tracing::error!("Error clearing locations: {}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, "Failed to clear locations")
            }
            ApiError::KvTestFailed(err) => {
                tracing::error!("KV test failed: {}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, "KV test failed")
            }
        };

        let body = Json(ErrorResponse {
            success: false,
            error: error_message.to_string(),
        });

        (status, body).into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::InvalidBody(err)
    }
}
