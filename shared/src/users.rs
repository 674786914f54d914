use lambda_http::{
    http::{HeaderMap, StatusCode},
    Body, Response,
};
use serde_json::Value;

use crate::error::{ApiError, StoreError};
use crate::response::{error_response, json_response};
use crate::types::{
    CreateUserRequest, CreateUserResponse, ListUsersResponse, UserRecord, REQUIRED_USER_FIELDS,
};
use crate::{auth, AppState};

pub const BODY_REQUIRED_MESSAGE: &str = "Request body is required.";
pub const INVALID_JSON_MESSAGE: &str = "Invalid JSON in request body.";
pub const INVALID_ATTRIBUTES_MESSAGE: &str = "userAttributes must be a JSON object.";
pub const USER_EXISTS_MESSAGE: &str = "User already exists with the same userID and clientID.";
pub const UNAUTHORIZED_MESSAGE: &str = "Unauthorized. Valid admin authentication required.";

/// Register a user under a client. Public endpoint.
pub async fn create_user(state: &AppState, body: &Body) -> Result<Response<Body>, ApiError> {
    let bytes: &[u8] = match body {
        Body::Text(text) => text.as_bytes(),
        Body::Binary(bytes) => bytes,
        Body::Empty => &[],
    };

    if bytes.is_empty() {
        tracing::warn!("Create user rejected: empty body");
        return error_response(StatusCode::BAD_REQUEST, BODY_REQUIRED_MESSAGE);
    }

    let payload: Value = match serde_json::from_slice(bytes) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!("Create user rejected: invalid JSON: {}", e);
            return error_response(StatusCode::BAD_REQUEST, INVALID_JSON_MESSAGE);
        }
    };

    let missing = missing_required_fields(&payload);
    if !missing.is_empty() {
        tracing::warn!("Create user rejected: missing {:?}", missing);
        return error_response(
            StatusCode::BAD_REQUEST,
            &format!("Missing required fields: {}", missing.join(", ")),
        );
    }

    if !matches!(
        payload.get("userAttributes"),
        None | Some(Value::Null) | Some(Value::Object(_))
    ) {
        tracing::warn!("Create user rejected: userAttributes is not an object");
        return error_response(StatusCode::BAD_REQUEST, INVALID_ATTRIBUTES_MESSAGE);
    }

    let req: CreateUserRequest = serde_json::from_value(payload)?;
    let store = state.user_store()?;

    // Not atomic with the put below; see WriteMode.
    if store.user_exists(&req.client_id, &req.user_id).await? {
        tracing::info!(
            "User {} already exists for client {}",
            req.user_id,
            req.client_id
        );
        return error_response(StatusCode::CONFLICT, USER_EXISTS_MESSAGE);
    }

    let record = UserRecord {
        client_id: req.client_id,
        user_id: req.user_id,
        user_email: req.user_email,
        user_first_name: req.user_first_name,
        user_last_name: req.user_last_name,
        user_password: req.user_password,
        user_password_clue: req.user_password_clue,
        user_attributes: req.user_attributes.unwrap_or_default(),
        created_at: iso_timestamp(),
    };

    match store.put_user(&record).await {
        Ok(()) => {}
        Err(StoreError::AlreadyExists) => {
            tracing::info!(
                "User {} for client {} was created concurrently",
                record.user_id,
                record.client_id
            );
            return error_response(StatusCode::CONFLICT, USER_EXISTS_MESSAGE);
        }
        Err(e) => return Err(e.into()),
    }

    tracing::info!("Created user {} for client {}", record.user_id, record.client_id);

    json_response(
        StatusCode::CREATED,
        &CreateUserResponse {
            message: "User created successfully".to_string(),
            user_id: record.user_id,
            client_id: record.client_id,
            created_at: record.created_at,
        },
    )
}

/// List every user as a summary. Requires the admin shared secret.
pub async fn list_users(state: &AppState, headers: &HeaderMap) -> Result<Response<Body>, ApiError> {
    if !auth::is_admin(headers, state.admin_password.as_deref()) {
        tracing::warn!("List users rejected: missing or invalid admin credentials");
        return error_response(StatusCode::UNAUTHORIZED, UNAUTHORIZED_MESSAGE);
    }

    let users = state.user_store()?.scan_summaries().await?;
    tracing::info!("Listing {} users", users.len());

    json_response(
        StatusCode::OK,
        &ListUsersResponse {
            count: users.len(),
            users,
        },
    )
}

/// Required fields that are absent or not a non-empty string, in declared order.
fn missing_required_fields(payload: &Value) -> Vec<&'static str> {
    REQUIRED_USER_FIELDS
        .iter()
        .copied()
        .filter(|field| {
            !matches!(payload.get(*field), Some(Value::String(s)) if !s.is_empty())
        })
        .collect()
}

/// UTC, millisecond precision, `Z` suffix.
fn iso_timestamp() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}
