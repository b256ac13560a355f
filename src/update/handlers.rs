use super::service::UpdateService;
use super::types::{ActionResponse, ServiceStats, StatusResponse};
use crate::error::Error;
use crate::search::types::ErrorResponse;

use axum::{Extension, Json, http::StatusCode};
use std::sync::Arc;

/// Runs an update to completion. A run already in progress is not an error for
/// the caller: it gets `202 Accepted`.
pub async fn handle_update(
    Extension(service): Extension<Arc<UpdateService>>,
) -> (StatusCode, Json<ActionResponse>) {
    match service.update().await {
        Ok(()) => (StatusCode::OK, Json(ActionResponse::ok("updated"))),
        Err(Error::AlreadyRunning) => {
            tracing::debug!("Update requested while one is running");
            (StatusCode::ACCEPTED, Json(ActionResponse::ok("already_running")))
        }
        Err(e) => {
            tracing::error!("Update failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, Json(ActionResponse::failed(e)))
        }
    }
}

pub async fn handle_stats(
    Extension(service): Extension<Arc<UpdateService>>,
) -> Result<Json<ServiceStats>, (StatusCode, Json<ErrorResponse>)> {
    service.stats().await.map(Json).map_err(|e| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: e.to_string(),
            }),
        )
    })
}

pub async fn handle_status(
    Extension(service): Extension<Arc<UpdateService>>,
) -> Json<StatusResponse> {
    Json(StatusResponse {
        status: service.status(),
    })
}

pub async fn handle_drop(
    Extension(service): Extension<Arc<UpdateService>>,
) -> (StatusCode, Json<ActionResponse>) {
    match service.drop_all().await {
        Ok(()) => (StatusCode::OK, Json(ActionResponse::ok("dropped"))),
        Err(Error::AlreadyRunning) => (
            StatusCode::ACCEPTED,
            Json(ActionResponse::ok("already_running")),
        ),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, Json(ActionResponse::failed(e))),
    }
}
