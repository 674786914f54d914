use aws_sdk_dynamodb::Client as DynamoClient;
use lambda_http::{run, service_fn, tracing, Error, Request};
use simple_auth_shared::config::Config;
use simple_auth_shared::store::{DynamoUserStore, UserStore};
use simple_auth_shared::AppState;
use std::sync::Arc;

mod http_handler;

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing::init_default_subscriber();

    let config = Config::from_env()?;

    // Initialize AWS clients once at startup
    let aws_config = aws_config::load_from_env().await;

    let user_store = match &config.users_table_name {
        Some(table_name) => {
            tracing::info!(
                "Users table: {} (write mode: {:?})",
                table_name,
                config.write_mode
            );
            let store = DynamoUserStore::new(
                DynamoClient::new(&aws_config),
                table_name.clone(),
                config.write_mode,
            );
            Some(Arc::new(store) as Arc<dyn UserStore>)
        }
        None => {
            tracing::error!("USERS_TABLE_NAME is not set; user requests will fail");
            None
        }
    };

    if config.admin_password.is_none() {
        tracing::warn!("ADMIN_PASSWORD is not set; listing users is disabled");
    }

    let state = AppState::new(user_store, config.admin_password);

    run(service_fn(move |event: Request| {
        let state = Arc::clone(&state);
        async move { http_handler::function_handler(event, state).await }
    }))
    .await
}
