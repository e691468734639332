//! REST client layer for the clinic backend.
//!
//! Every entity collection is reached through a [`client::ResourceClient`],
//! which talks to the backend through a [`transport::Transport`] and publishes
//! the last fetched collection into a [`store::ResourceStore`]. The
//! [`clinic::Clinic`] registry owns one client per entity for the whole
//! process lifetime.

use serde_json::Value;
use std::collections::BTreeMap;

pub mod client;
pub mod clinic;
#[cfg(test)]
pub mod mock;
pub mod store;
pub mod transport;

/// Keys the backend uses for messages that belong to no single field.
const NON_FIELD_KEYS: [&str; 2] = ["non_field_errors", "detail"];

/// Structured validation failure returned by the backend.
///
/// The body is a JSON object mapping field names to lists of messages, plus
/// an optional `non_field_errors` (or `detail`) entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    pub fields: BTreeMap<String, Vec<String>>,
    pub non_field: Vec<String>,
}

impl FieldErrors {
    /// Parses a validation body. Returns `None` when the body is not a JSON object.
    pub fn from_body(body: &str) -> Option<Self> {
        let Ok(Value::Object(map)) = serde_json::from_str::<Value>(body) else {
            return None;
        };

        let mut errors = FieldErrors::default();
        for (key, value) in map {
            let messages = flatten_messages(&value);
            if messages.is_empty() {
                continue;
            }
            if NON_FIELD_KEYS.contains(&key.as_str()) {
                errors.non_field.extend(messages);
            } else {
                errors.fields.insert(key, messages);
            }
        }
        Some(errors)
    }

    /// First message attached to `field`, if any.
    pub fn first_for(&self, field: &str) -> Option<&str> {
        self.fields
            .get(field)
            .and_then(|messages| messages.first())
            .map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.non_field.is_empty()
    }
}

fn flatten_messages(value: &Value) -> Vec<String> {
    match value {
        Value::String(message) => vec![message.clone()],
        Value::Array(items) => items.iter().flat_map(flatten_messages).collect(),
        Value::Null => Vec::new(),
        other => vec![other.to_string()],
    }
}

/// Failure of a call against the backend.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ApiError {
    /// No response was received.
    #[error("could not reach the backend: {0}")]
    Transport(String),
    #[error("not found: {path}")]
    NotFound { path: String },
    #[error("the backend rejected the submitted data")]
    Validation(FieldErrors),
    #[error("unexpected response {status}: {body}")]
    Unexpected { status: u16, body: String },
    /// A successful response whose body does not have the expected shape.
    #[error("could not decode response from {path}: {message}")]
    Decode { path: String, message: String },
    #[error("could not encode request: {0}")]
    Encode(String),
}

impl ApiError {
    /// Classifies a non-2xx response.
    pub fn from_status(status: u16, path: &str, body: String) -> Self {
        match status {
            404 => ApiError::NotFound {
                path: path.to_string(),
            },
            400 | 422 => match FieldErrors::from_body(&body) {
                Some(errors) => ApiError::Validation(errors),
                None => ApiError::Unexpected { status, body },
            },
            _ => ApiError::Unexpected { status, body },
        }
    }

    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            ApiError::Validation(errors) => Some(errors),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound { .. })
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_errors_split_field_and_general_messages() {
        let body = r#"{
            "telephone": ["Ensure this field has no more than 10 characters."],
            "email": "Enter a valid email address.",
            "non_field_errors": ["The doctor already has an appointment at this time."]
        }"#;

        let errors = FieldErrors::from_body(body).expect("object body");
        assert_eq!(
            errors.first_for("telephone"),
            Some("Ensure this field has no more than 10 characters.")
        );
        assert_eq!(errors.first_for("email"), Some("Enter a valid email address."));
        assert_eq!(
            errors.non_field,
            vec!["The doctor already has an appointment at this time.".to_string()]
        );
        assert!(errors.first_for("name").is_none());
    }

    #[test]
    fn detail_key_counts_as_general_message() {
        let errors = FieldErrors::from_body(r#"{"detail": "Not allowed"}"#).unwrap();
        assert!(errors.fields.is_empty());
        assert_eq!(errors.non_field, vec!["Not allowed".to_string()]);
    }

    #[test]
    fn non_object_body_is_not_a_validation_body() {
        assert!(FieldErrors::from_body("<html>Bad Request</html>").is_none());
        assert!(FieldErrors::from_body(r#"["a", "b"]"#).is_none());
    }

    #[test]
    fn status_classification() {
        assert!(ApiError::from_status(404, "/doctors/9/", String::new()).is_not_found());

        let validation =
            ApiError::from_status(400, "/doctors/", r#"{"name": ["Required"]}"#.into());
        assert_eq!(
            validation.field_errors().and_then(|e| e.first_for("name")),
            Some("Required")
        );

        let html = ApiError::from_status(400, "/doctors/", "<h1>oops</h1>".into());
        assert!(matches!(html, ApiError::Unexpected { status: 400, .. }));

        let server = ApiError::from_status(500, "/doctors/", "boom".into());
        assert!(matches!(server, ApiError::Unexpected { status: 500, .. }));
    }
}
