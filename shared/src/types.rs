use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ========== USER ==========
/// A user as persisted in the users table, keyed by (clientID, userID).
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    #[serde(rename = "clientID")]
    pub client_id: String,
    #[serde(rename = "userID")]
    pub user_id: String,
    pub user_email: String,
    pub user_first_name: String,
    pub user_last_name: String,
    pub user_password: String, // plaintext, hashing is not done here
    pub user_password_clue: String,
    #[serde(default)]
    pub user_attributes: Map<String, Value>,
    pub created_at: String,
}

/// Body of `POST /users` once the required fields have been checked.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    #[serde(rename = "userID")]
    pub user_id: String,
    pub user_email: String,
    pub user_first_name: String,
    pub user_last_name: String,
    pub user_password: String,
    pub user_password_clue: String,
    #[serde(rename = "clientID")]
    pub client_id: String,
    #[serde(default)]
    pub user_attributes: Option<Map<String, Value>>,
}

/// Required fields of [`CreateUserRequest`], in the order they are reported.
pub const REQUIRED_USER_FIELDS: [&str; 7] = [
    "userID",
    "userEmail",
    "userFirstName",
    "userLastName",
    "userPassword",
    "userPasswordClue",
    "clientID",
];

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserResponse {
    pub message: String,
    #[serde(rename = "userID")]
    pub user_id: String,
    #[serde(rename = "clientID")]
    pub client_id: String,
    pub created_at: String,
}

/// Projection returned by the admin listing. Never carries credentials.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    #[serde(rename = "userID")]
    pub user_id: String,
    #[serde(rename = "clientID")]
    pub client_id: String,
    pub user_email: String,
}

impl From<&UserRecord> for UserSummary {
    fn from(record: &UserRecord) -> Self {
        Self {
            user_id: record.user_id.clone(),
            client_id: record.client_id.clone(),
            user_email: record.user_email.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ListUsersResponse {
    pub users: Vec<UserSummary>,
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self { error: error.into() }
    }
}
