use lambda_http::{Body, Error, Request, Response};
use simple_auth_shared::{health, response};

/// Healthcheck Lambda handler - fixed payload, no dependencies
pub(crate) async fn function_handler(event: Request) -> Result<Response<Body>, Error> {
    tracing::info!("Healthcheck invoked - Path: {}", event.uri().path());

    match health::healthcheck() {
        Ok(resp) => Ok(resp),
        Err(e) => {
            tracing::error!("Error building healthcheck response: {}", e);
            Ok(response::internal_error())
        }
    }
}
