//! Item record and its JSON representation.
//!
//! An [`Item`] is append-only: it is created once through the API and never
//! updated or removed. The client supplies only the name; `id` and
//! `created_at` are assigned by the server.

use std::borrow::Cow;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::error::FieldErrors;

/// Maximum length of an item name, in characters.
pub const NAME_MAX_LENGTH: usize = 100;
/// `NAME_MAX_LENGTH` typed as `u64`, as required by the `validator` length attribute.
const NAME_MAX_LENGTH_U64: u64 = NAME_MAX_LENGTH as u64;

pub const MSG_REQUIRED: &str = "This field is required.";
pub const MSG_NULL: &str = "This field may not be null.";
pub const MSG_BLANK: &str = "This field may not be blank.";
pub const MSG_TOO_LONG: &str = "Ensure this field has no more than 100 characters.";
pub const MSG_NOT_STRING: &str = "Not a valid string.";
pub const MSG_NULL_CHARACTER: &str = "Null characters are not allowed.";

/// A persisted item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Item {
    /// Server-generated identifier.
    #[schema(example = 1)]
    pub id: i64,
    /// Item name, at most 100 characters.
    #[schema(example = "Notebook")]
    pub name: String,
    /// Insertion time (UTC).
    pub created_at: DateTime<Utc>,
}

/// Payload accepted when creating an item.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate, ToSchema)]
pub struct CreateItem {
    /// Item name; surrounding whitespace is trimmed.
    #[validate(
        custom(function = "plain_text"),
        length(max = NAME_MAX_LENGTH_U64, message = "Ensure this field has no more than 100 characters.")
    )]
    #[schema(example = "Notebook", max_length = 100)]
    pub name: String,
}

/// Rejects empty text and text containing NUL characters.
fn plain_text(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::new("blank").with_message(Cow::Borrowed(MSG_BLANK)));
    }
    if value.contains('\0') {
        return Err(
            ValidationError::new("null_characters").with_message(Cow::Borrowed(MSG_NULL_CHARACTER)),
        );
    }
    Ok(())
}

impl CreateItem {
    /// Build a create payload from a JSON object.
    ///
    /// Unknown keys (including client-supplied `id` and `created_at`) are
    /// ignored. Numbers are accepted and stored in their textual form;
    /// booleans, arrays and objects are rejected.
    pub fn from_payload(payload: &Map<String, Value>) -> Result<Self, FieldErrors> {
        let name = match payload.get("name") {
            None => return Err(FieldErrors::single("name", MSG_REQUIRED)),
            Some(Value::Null) => return Err(FieldErrors::single("name", MSG_NULL)),
            Some(Value::String(s)) => s.trim().to_string(),
            Some(Value::Number(n)) => n.to_string(),
            Some(_) => return Err(FieldErrors::single("name", MSG_NOT_STRING)),
        };

        Ok(Self { name })
    }

    /// Parse and validate a create payload in one step.
    pub fn parse(payload: &Map<String, Value>) -> Result<Self, FieldErrors> {
        let item = Self::from_payload(payload)?;
        item.validate()?;
        Ok(item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn payload(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    fn name_errors(value: Value) -> Vec<String> {
        let errors = CreateItem::parse(&payload(value)).unwrap_err();
        errors.get("name").unwrap().to_vec()
    }

    #[test]
    fn accepts_name_at_limit() {
        let name = "a".repeat(NAME_MAX_LENGTH);
        let item = CreateItem::parse(&payload(json!({ "name": name }))).unwrap();
        assert_eq!(item.name.len(), NAME_MAX_LENGTH);
    }

    #[test]
    fn length_counts_characters_not_bytes() {
        let name = "ż".repeat(NAME_MAX_LENGTH);
        assert!(CreateItem::parse(&payload(json!({ "name": name }))).is_ok());
    }

    #[test]
    fn rejects_name_over_limit() {
        let name = "a".repeat(NAME_MAX_LENGTH + 1);
        assert_eq!(name_errors(json!({ "name": name })), vec![MSG_TOO_LONG]);
    }

    #[test]
    fn rejects_missing_name() {
        assert_eq!(name_errors(json!({})), vec![MSG_REQUIRED]);
    }

    #[test]
    fn rejects_null_name() {
        assert_eq!(name_errors(json!({ "name": null })), vec![MSG_NULL]);
    }

    #[test]
    fn rejects_blank_name() {
        assert_eq!(name_errors(json!({ "name": "   " })), vec![MSG_BLANK]);
    }

    #[test]
    fn rejects_nul_character_in_name() {
        assert_eq!(name_errors(json!({ "name": "pe\u{0}n" })), vec![MSG_NULL_CHARACTER]);
    }

    #[test]
    fn rejects_non_string_name() {
        assert_eq!(name_errors(json!({ "name": true })), vec![MSG_NOT_STRING]);
        assert_eq!(name_errors(json!({ "name": ["a"] })), vec![MSG_NOT_STRING]);
    }

    #[test]
    fn trims_and_coerces_numbers() {
        let item = CreateItem::parse(&payload(json!({ "name": "  pen  " }))).unwrap();
        assert_eq!(item.name, "pen");

        let item = CreateItem::parse(&payload(json!({ "name": 42 }))).unwrap();
        assert_eq!(item.name, "42");
    }

    #[test]
    fn ignores_server_assigned_fields() {
        let item = CreateItem::parse(&payload(json!({
            "id": 999,
            "name": "pen",
            "created_at": "2000-01-01T00:00:00Z"
        })))
        .unwrap();
        assert_eq!(item, CreateItem { name: "pen".to_string() });
    }

    #[test]
    fn item_serializes_exactly_three_fields() {
        let item = Item {
            id: 7,
            name: "pen".to_string(),
            created_at: "2024-05-01T10:00:00Z".parse().unwrap(),
        };

        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(
            value,
            json!({ "id": 7, "name": "pen", "created_at": "2024-05-01T10:00:00Z" })
        );
    }
}
