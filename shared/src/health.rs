use lambda_http::{http::StatusCode, Body, Response};
use serde::Serialize;

use crate::error::ApiError;
use crate::response::json_response;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub message: &'static str,
}

/// Liveness probe. Touches nothing but the process itself.
pub fn healthcheck() -> Result<Response<Body>, ApiError> {
    json_response(
        StatusCode::OK,
        &HealthResponse {
            status: "ok",
            message: "Service is healthy",
        },
    )
}
