use super::types::HealthResponse;
use crate::{
    Error,
    inference::{ClientResponse, InferenceHandler, InferenceRequest},
};
use axum::{
    extract::{State, rejection::JsonRejection},
    http::HeaderName,
    response::{IntoResponse, Json},
};
use std::sync::Arc;
use tracing::{error, info, warn};
use uuid::Uuid;

pub const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

pub async fn inference(
    State(handler): State<Arc<InferenceHandler>>,
    payload: Result<Json<InferenceRequest>, JsonRejection>,
) -> impl IntoResponse {
    let request_id = Uuid::new_v4().to_string();

    let result: Result<ClientResponse, Error> = match payload {
        Ok(Json(request)) => {
            info!(
                "[{}] Received {} request for endpoint {:?}",
                request_id,
                handler.name(),
                request.endpoint_name
            );
            handler.handle(request).await
        }
        Err(rejection) => Err(Error::validation(rejection.body_text())),
    };

    match &result {
        Ok(_) => info!("[{}] Request to {} succeeded", request_id, handler.name()),
        Err(e @ Error::Validation(_)) => {
            warn!("[{}] Rejected request to {}: {}", request_id, handler.name(), e)
        }
        Err(e) => error!("[{}] Request to {} failed: {}", request_id, handler.name(), e),
    }

    ([(REQUEST_ID_HEADER, request_id)], result.map(Json))
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}
