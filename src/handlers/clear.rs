use crate::error::{ApiError, ErrorResponse};
use crate::models::ClearResponse;
use crate::routes;
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, Json};

/// DELETE /locations handler - Remove every stored location document
#[utoipa::path(
    delete,
    path = routes::LOCATIONS,
    responses(
        (status = 200, description = "All location data cleared", body = ClearResponse),
        (status = 500, description = "Store error", body = ErrorResponse)
    ),
    tag = "locations"
)]
pub async fn clear_handler(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<ClearResponse>), ApiError> {
    state
        .service
        .clear_all()
        .await
        .map_err(ApiError::ClearFailed)?;

    Ok((
        StatusCode::OK,
        Json(ClearResponse {
            success: true,
            message: "All location data cleared".to_string(),
        }),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::failing::FailingStore;
    use crate::store::{KvStore, MemoryStore, SharedStore};
    use axum::{body::Body, http::Request, routing::delete, Router};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn setup_test_app(store: SharedStore) -> Router {
        Router::new()
            .route(routes::LOCATIONS, delete(clear_handler))
            .with_state(AppState::new(store))
    }

    fn delete_request() -> Request<Body> {
        Request::builder()
            .method("DELETE")
            .uri("/locations")
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn test_clear_endpoint_removes_only_location_keys() {
        let store = MemoryStore::new();
        store.put("locations:1:a", b"{}".to_vec()).await.unwrap();
        store.put("locations:2:b", b"{}".to_vec()).await.unwrap();
        store.put("test-key", b"test-value".to_vec()).await.unwrap();
        let app = setup_test_app(Arc::new(store.clone()));

        let response = app.oneshot(delete_request()).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let response_json: ClearResponse = serde_json::from_slice(&body).unwrap();
        assert!(response_json.success);
        assert_eq!(response_json.message, "All location data cleared");

        assert!(store.list("locations:").await.unwrap().is_empty());
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_clear_endpoint_on_empty_store() {
        let app = setup_test_app(Arc::new(MemoryStore::new()));

        let response = app.oneshot(delete_request()).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_clear_endpoint_store_failure() {
        let app = setup_test_app(Arc::new(FailingStore));

        let response = app.oneshot(delete_request()).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let error_response: ErrorResponse = serde_json::from_slice(&body).unwrap();
        assert!(!error_response.success);
        assert_eq!(error_response.error, "Failed to clear locations");
    }
}
