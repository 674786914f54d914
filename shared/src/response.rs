use lambda_http::{
    http::{
        header::{ACCESS_CONTROL_ALLOW_ORIGIN, CONTENT_TYPE},
        HeaderValue, StatusCode,
    },
    Body, Response,
};
use serde::Serialize;

use crate::error::ApiError;
use crate::types::ErrorResponse;

pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// JSON response with the headers every endpoint sends.
pub fn json_response<T: Serialize>(status: StatusCode, body: &T) -> Result<Response<Body>, ApiError> {
    Ok(Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .header("Access-Control-Allow-Origin", "*")
        .body(serde_json::to_string(body)?.into())?)
}

pub fn error_response(status: StatusCode, message: &str) -> Result<Response<Body>, ApiError> {
    json_response(status, &ErrorResponse::new(message))
}

/// Last-resort 500. Built from a static body so it cannot fail itself.
pub fn internal_error() -> Response<Body> {
    let mut resp = Response::new(Body::from(
        serde_json::json!({"error": INTERNAL_ERROR_MESSAGE}).to_string(),
    ));
    *resp.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
    let headers = resp.headers_mut();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    resp
}
