pub mod types;
pub mod attributes;
pub mod auth;
pub mod config;
pub mod error;
pub mod health;
pub mod response;
pub mod store;
pub mod users;

use std::sync::Arc;

use error::ApiError;
use store::UserStore;

/// Shared application state, built once per cold start.
pub struct AppState {
    /// `None` when no users table is configured.
    pub user_store: Option<Arc<dyn UserStore>>,
    pub admin_password: Option<String>,
}

impl AppState {
    pub fn new(
        user_store: Option<Arc<dyn UserStore>>,
        admin_password: Option<String>,
    ) -> Arc<Self> {
        Arc::new(Self {
            user_store,
            admin_password,
        })
    }

    pub fn user_store(&self) -> Result<&dyn UserStore, ApiError> {
        self.user_store.as_deref().ok_or_else(|| {
            ApiError::Config("USERS_TABLE_NAME environment variable is not set".to_string())
        })
    }
}
