use async_trait::async_trait;
use aws_sdk_dynamodb::{types::AttributeValue, Client as DynamoClient};
use std::collections::HashMap;
use std::future::Future;
use std::str::FromStr;
#[cfg(any(test, feature = "test-util"))]
use std::sync::Mutex;

use crate::attributes;
use crate::error::StoreError;
use crate::types::{UserRecord, UserSummary};

/// How `put_user` treats an existing record under the same key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WriteMode {
    /// Plain put. Two creators racing past the existence check end up last-write-wins.
    #[default]
    Unconditional,
    /// Put only if the key is free; a lost race becomes `StoreError::AlreadyExists`.
    IfAbsent,
}

impl FromStr for WriteMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "unconditional" => Ok(WriteMode::Unconditional),
            "if-absent" | "if_absent" => Ok(WriteMode::IfAbsent),
            other => Err(format!(
                "USERS_WRITE_MODE must be 'unconditional' or 'if-absent', got '{}'",
                other
            )),
        }
    }
}

/// Storage backend for user records.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Whether any item sits under the key, whatever its shape.
    async fn user_exists(&self, client_id: &str, user_id: &str) -> Result<bool, StoreError>;

    async fn get_user(
        &self,
        client_id: &str,
        user_id: &str,
    ) -> Result<Option<UserRecord>, StoreError>;

    async fn put_user(&self, record: &UserRecord) -> Result<(), StoreError>;

    /// Every record in the table, reduced to its summary fields.
    async fn scan_summaries(&self) -> Result<Vec<UserSummary>, StoreError>;
}

// ========== DYNAMODB ==========
const SUMMARY_PROJECTION: &str = "userID, clientID, userEmail";
const KEY_PROJECTION: &str = "clientID, userID";
const KEY_ABSENT_CONDITION: &str = "attribute_not_exists(clientID) AND attribute_not_exists(userID)";

/// Users table with partition key `clientID` and sort key `userID`.
pub struct DynamoUserStore {
    client: DynamoClient,
    table_name: String,
    write_mode: WriteMode,
}

impl DynamoUserStore {
    pub fn new(client: DynamoClient, table_name: impl Into<String>, write_mode: WriteMode) -> Self {
        Self {
            client,
            table_name: table_name.into(),
            write_mode,
        }
    }
}

#[async_trait]
impl UserStore for DynamoUserStore {
    async fn user_exists(&self, client_id: &str, user_id: &str) -> Result<bool, StoreError> {
        let result = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .key("clientID", AttributeValue::S(client_id.to_string()))
            .key("userID", AttributeValue::S(user_id.to_string()))
            .projection_expression(KEY_PROJECTION)
            .consistent_read(true)
            .send()
            .await
            .map_err(|e| StoreError::Backend(format!("Failed to check user: {:?}", e)))?;

        Ok(result.item().is_some())
    }

    async fn get_user(
        &self,
        client_id: &str,
        user_id: &str,
    ) -> Result<Option<UserRecord>, StoreError> {
        let result = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .key("clientID", AttributeValue::S(client_id.to_string()))
            .key("userID", AttributeValue::S(user_id.to_string()))
            .consistent_read(true)
            .send()
            .await
            .map_err(|e| StoreError::Backend(format!("Failed to fetch user: {:?}", e)))?;

        result.item().map(item_to_record).transpose()
    }

    async fn put_user(&self, record: &UserRecord) -> Result<(), StoreError> {
        let mut put_request = self
            .client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(record_to_item(record)));

        if self.write_mode == WriteMode::IfAbsent {
            put_request = put_request.condition_expression(KEY_ABSENT_CONDITION);
        }

        match put_request.send().await {
            Ok(_) => Ok(()),
            Err(e) => {
                let conflict = e
                    .as_service_error()
                    .map(|se| se.is_conditional_check_failed_exception())
                    .unwrap_or(false);
                if conflict {
                    Err(StoreError::AlreadyExists)
                } else {
                    Err(StoreError::Backend(format!("Failed to put user: {:?}", e)))
                }
            }
        }
    }

    async fn scan_summaries(&self) -> Result<Vec<UserSummary>, StoreError> {
        let client = &self.client;
        let table_name = self.table_name.as_str();

        let users = scan_pages(|start_key| async move {
            let page = client
                .scan()
                .table_name(table_name)
                .projection_expression(SUMMARY_PROJECTION)
                .set_exclusive_start_key(start_key)
                .send()
                .await
                .map_err(|e| StoreError::Backend(format!("Failed to scan users: {:?}", e)))?;

            Ok((page.items.unwrap_or_default(), page.last_evaluated_key))
        })
        .await?;

        tracing::debug!("Scanned {} users from {}", users.len(), table_name);
        Ok(users)
    }
}

type Item = HashMap<String, AttributeValue>;

/// Follows `LastEvaluatedKey` until a page comes back without one.
async fn scan_pages<F, Fut>(mut fetch_page: F) -> Result<Vec<UserSummary>, StoreError>
where
    F: FnMut(Option<Item>) -> Fut,
    Fut: Future<Output = Result<(Vec<Item>, Option<Item>), StoreError>>,
{
    let mut users = Vec::new();
    let mut start_key: Option<Item> = None;

    loop {
        let (items, last_key) = fetch_page(start_key.take()).await?;
        for item in &items {
            users.push(item_to_summary(item)?);
        }

        match last_key {
            Some(key) if !key.is_empty() => start_key = Some(key),
            _ => break,
        }
    }

    Ok(users)
}

fn record_to_item(record: &UserRecord) -> HashMap<String, AttributeValue> {
    let mut item = HashMap::new();
    let strings = [
        ("clientID", &record.client_id),
        ("userID", &record.user_id),
        ("userEmail", &record.user_email),
        ("userFirstName", &record.user_first_name),
        ("userLastName", &record.user_last_name),
        ("userPassword", &record.user_password),
        ("userPasswordClue", &record.user_password_clue),
        ("createdAt", &record.created_at),
    ];
    for (name, value) in strings {
        item.insert(name.to_string(), AttributeValue::S(value.clone()));
    }
    item.insert(
        "userAttributes".to_string(),
        AttributeValue::M(attributes::to_attribute_map(&record.user_attributes)),
    );
    item
}

pub(crate) fn item_to_record(item: &HashMap<String, AttributeValue>) -> Result<UserRecord, StoreError> {
    let user_attributes = match item.get("userAttributes") {
        Some(AttributeValue::M(map)) => attributes::from_attribute_map(map)?,
        Some(AttributeValue::Null(_)) | None => serde_json::Map::new(),
        Some(other) => {
            return Err(StoreError::Malformed(format!(
                "userAttributes is not a map: {:?}",
                other
            )))
        }
    };

    Ok(UserRecord {
        client_id: required_s(item, "clientID")?,
        user_id: required_s(item, "userID")?,
        user_email: required_s(item, "userEmail")?,
        user_first_name: required_s(item, "userFirstName")?,
        user_last_name: required_s(item, "userLastName")?,
        user_password: required_s(item, "userPassword")?,
        user_password_clue: required_s(item, "userPasswordClue")?,
        user_attributes,
        created_at: required_s(item, "createdAt")?,
    })
}

fn item_to_summary(item: &HashMap<String, AttributeValue>) -> Result<UserSummary, StoreError> {
    Ok(UserSummary {
        user_id: required_s(item, "userID")?,
        client_id: required_s(item, "clientID")?,
        user_email: required_s(item, "userEmail")?,
    })
}

fn required_s(item: &HashMap<String, AttributeValue>, name: &str) -> Result<String, StoreError> {
    item.get(name)
        .and_then(|v| v.as_s().ok())
        .map(|s| s.to_string())
        .ok_or_else(|| StoreError::Malformed(format!("missing string attribute {}", name)))
}

// ========== IN-MEMORY ==========
/// Process-local store for tests.
#[cfg(any(test, feature = "test-util"))]
#[derive(Default)]
pub struct InMemoryUserStore {
    users: Mutex<HashMap<(String, String), UserRecord>>,
    write_mode: WriteMode,
}

#[cfg(any(test, feature = "test-util"))]
impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_write_mode(write_mode: WriteMode) -> Self {
        Self {
            users: Mutex::default(),
            write_mode,
        }
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<(String, String), UserRecord>> {
        self.users.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(any(test, feature = "test-util"))]
#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn user_exists(&self, client_id: &str, user_id: &str) -> Result<bool, StoreError> {
        let key = (client_id.to_string(), user_id.to_string());
        Ok(self.lock().contains_key(&key))
    }

    async fn get_user(
        &self,
        client_id: &str,
        user_id: &str,
    ) -> Result<Option<UserRecord>, StoreError> {
        let key = (client_id.to_string(), user_id.to_string());
        Ok(self.lock().get(&key).cloned())
    }

    async fn put_user(&self, record: &UserRecord) -> Result<(), StoreError> {
        let key = (record.client_id.clone(), record.user_id.clone());
        let mut users = self.lock();
        if self.write_mode == WriteMode::IfAbsent && users.contains_key(&key) {
            return Err(StoreError::AlreadyExists);
        }
        users.insert(key, record.clone());
        Ok(())
    }

    async fn scan_summaries(&self) -> Result<Vec<UserSummary>, StoreError> {
        Ok(self.lock().values().map(UserSummary::from).collect())
    }
}
