use lambda_http::{
    http::{Method, StatusCode},
    Body, Error, Request, Response,
};
use simple_auth_shared::{response, users, AppState};
use std::sync::Arc;

pub(crate) const METHOD_NOT_ALLOWED_MESSAGE: &str =
    "Method not allowed. Only GET and POST requests are supported.";

/// Users Lambda handler - POST creates a user, GET lists them for admins
pub(crate) async fn function_handler(
    event: Request,
    state: Arc<AppState>,
) -> Result<Response<Body>, Error> {
    let method = event.method();
    tracing::info!(
        "Users Lambda invoked - Method: {} Path: {}",
        method,
        event.uri().path()
    );

    let result = match method {
        &Method::POST => users::create_user(&state, event.body()).await,
        &Method::GET => users::list_users(&state, event.headers()).await,
        _ => response::error_response(StatusCode::METHOD_NOT_ALLOWED, METHOD_NOT_ALLOWED_MESSAGE),
    };

    match result {
        Ok(resp) => Ok(resp),
        Err(e) => {
            tracing::error!("Error processing users request: {}", e);
            Ok(response::internal_error())
        }
    }
}
