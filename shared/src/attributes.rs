//! Conversion between schemaless JSON and DynamoDB attribute values.
//!
//! `userAttributes` is opaque to this service, so it is stored as a nested
//! `M` attribute that mirrors the JSON shape the caller sent.

use aws_sdk_dynamodb::types::AttributeValue;
use serde_json::{Map, Number, Value};
use std::collections::HashMap;

use crate::error::StoreError;

pub fn to_attribute(value: &Value) -> AttributeValue {
    match value {
        Value::Null => AttributeValue::Null(true),
        Value::Bool(b) => AttributeValue::Bool(*b),
        Value::Number(n) => AttributeValue::N(n.to_string()),
        Value::String(s) => AttributeValue::S(s.clone()),
        Value::Array(items) => AttributeValue::L(items.iter().map(to_attribute).collect()),
        Value::Object(map) => AttributeValue::M(to_attribute_map(map)),
    }
}

pub fn to_attribute_map(map: &Map<String, Value>) -> HashMap<String, AttributeValue> {
    map.iter()
        .map(|(k, v)| (k.clone(), to_attribute(v)))
        .collect()
}

pub fn from_attribute(attribute: &AttributeValue) -> Result<Value, StoreError> {
    let value = match attribute {
        AttributeValue::Null(_) => Value::Null,
        AttributeValue::Bool(b) => Value::Bool(*b),
        AttributeValue::N(n) => Value::Number(parse_number(n)?),
        AttributeValue::S(s) => Value::String(s.clone()),
        AttributeValue::L(items) => Value::Array(
            items
                .iter()
                .map(from_attribute)
                .collect::<Result<Vec<_>, _>>()?,
        ),
        AttributeValue::M(map) => Value::Object(from_attribute_map(map)?),
        // Sets never come from JSON input, but the table may be edited by hand.
        AttributeValue::Ss(items) => Value::Array(items.iter().cloned().map(Value::String).collect()),
        AttributeValue::Ns(items) => Value::Array(
            items
                .iter()
                .map(|n| parse_number(n).map(Value::Number))
                .collect::<Result<Vec<_>, _>>()?,
        ),
        other => {
            return Err(StoreError::Malformed(format!(
                "unsupported attribute type: {:?}",
                other
            )))
        }
    };
    Ok(value)
}

pub fn from_attribute_map(
    map: &HashMap<String, AttributeValue>,
) -> Result<Map<String, Value>, StoreError> {
    map.iter()
        .map(|(k, v)| from_attribute(v).map(|value| (k.clone(), value)))
        .collect()
}

fn parse_number(raw: &str) -> Result<Number, StoreError> {
    serde_json::from_str::<Number>(raw)
        .map_err(|_| StoreError::Malformed(format!("invalid number attribute: {}", raw)))
}
