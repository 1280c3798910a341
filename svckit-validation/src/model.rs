//! Schema validation over dynamic field mappings
//!
//! A schema is any deserializable type implementing [`Model`]. Decoding
//! covers presence and types of fields; [`Model::check`] covers constraints
//! serde can't express. Failures never propagate: they are logged and folded
//! into a [`ValidationOutcome`].

use serde::de::DeserializeOwned;
use serde_json::error::Category;
use serde_json::Value;
use svckit_telemetry::{Fields, LOG_TARGET};

use crate::ValidationError;

/// A schema that dynamic data can be validated against.
pub trait Model: DeserializeOwned {
    /// Field constraints checked after a successful decode.
    fn check(&self) -> Result<(), ValidationError> {
        Ok(())
    }
}

/// Result of [`validate_model`]
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationOutcome<T> {
    Valid(T),
    /// Data does not satisfy the schema
    Invalid { message: String },
    /// Validation could not run to completion
    Failed { message: String },
}

impl<T> ValidationOutcome<T> {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid(_))
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Valid(_) => None,
            Self::Invalid { message } | Self::Failed { message } => Some(message.as_str()),
        }
    }

    pub fn ok(self) -> Option<T> {
        match self {
            Self::Valid(instance) => Some(instance),
            _ => None,
        }
    }

    pub fn into_result(self) -> Result<T, String> {
        match self {
            Self::Valid(instance) => Ok(instance),
            Self::Invalid { message } | Self::Failed { message } => Err(message),
        }
    }

    /// `(success, instance, error message)`
    pub fn into_parts(self) -> (bool, Option<T>, Option<String>) {
        match self {
            Self::Valid(instance) => (true, Some(instance), None),
            Self::Invalid { message } | Self::Failed { message } => (false, None, Some(message)),
        }
    }
}

enum Rejection {
    Schema(String),
    Unexpected(String),
}

/// Validate `data` against the schema `M`.
///
/// `data` must be a JSON object of field values. Schema violations are logged
/// at warn level, anything else at error level.
pub fn validate_model<M: Model>(data: &Value) -> ValidationOutcome<M> {
    match decode::<M>(data) {
        Ok(instance) => ValidationOutcome::Valid(instance),
        Err(Rejection::Schema(reason)) => {
            let message = format!("Validation failed: {reason}");
            tracing::warn!(
                target: LOG_TARGET,
                error = %message,
                context = %data_fields(data),
                "Model validation failed"
            );
            ValidationOutcome::Invalid { message }
        }
        Err(Rejection::Unexpected(reason)) => {
            let message = format!("Unexpected validation error: {reason}");
            tracing::error!(
                target: LOG_TARGET,
                error = %message,
                context = %data_fields(data),
                "Unexpected validation error"
            );
            ValidationOutcome::Failed { message }
        }
    }
}

fn data_fields(data: &Value) -> Fields {
    Fields::new().with("data", data.clone())
}

fn decode<M: Model>(data: &Value) -> Result<M, Rejection> {
    if !data.is_object() {
        return Err(Rejection::Unexpected(format!(
            "expected a mapping of field values, got {}",
            kind(data)
        )));
    }

    let instance = M::deserialize(data).map_err(|err| match err.classify() {
        Category::Data => Rejection::Schema(err.to_string()),
        Category::Io | Category::Syntax | Category::Eof => Rejection::Unexpected(err.to_string()),
    })?;

    instance
        .check()
        .map_err(|err| Rejection::Schema(err.to_string()))?;

    Ok(instance)
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::{require_email, require_non_empty};
    use serde::Deserialize;
    use serde_json::json;
    use svckit_telemetry::testing::LogCapture;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Bidder {
        name: String,
        email: String,
        #[serde(default)]
        max_bid: Option<u32>,
    }

    impl Model for Bidder {
        fn check(&self) -> Result<(), ValidationError> {
            require_non_empty("name", &self.name)?;
            require_email("email", &self.email)
        }
    }

    #[test]
    fn valid_data_produces_instance() {
        let data = json!({ "name": "Ada", "email": "ada@example.com", "max_bid": 500 });
        let (ok, instance, message) = validate_model::<Bidder>(&data).into_parts();

        assert!(ok);
        assert_eq!(
            instance,
            Some(Bidder {
                name: "Ada".into(),
                email: "ada@example.com".into(),
                max_bid: Some(500),
            })
        );
        assert_eq!(message, None);
    }

    #[test]
    fn missing_field_is_a_schema_failure() {
        let capture = LogCapture::new();
        let _guard = capture.install();

        let data = json!({ "name": "Ada" });
        let outcome = validate_model::<Bidder>(&data);

        assert!(matches!(outcome, ValidationOutcome::Invalid { .. }));
        let (ok, instance, message) = outcome.into_parts();
        assert!(!ok);
        assert!(instance.is_none());
        let message = message.unwrap_or_default();
        assert!(message.contains("Validation failed"), "{message}");
        assert!(message.contains("email"), "{message}");

        let warnings = capture.events_with_message("Model validation failed");
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0]["level"], "WARN");
        assert_eq!(warnings[0]["data"], json!({ "name": "Ada" }));
    }

    #[test]
    fn wrong_type_is_a_schema_failure() {
        let data = json!({ "name": "Ada", "email": "ada@example.com", "max_bid": "lots" });
        let outcome = validate_model::<Bidder>(&data);
        assert!(matches!(outcome, ValidationOutcome::Invalid { .. }));
    }

    #[test]
    fn check_rejection_is_a_schema_failure() {
        let data = json!({ "name": "Ada", "email": "not-an-address" });
        let outcome = validate_model::<Bidder>(&data);

        assert_eq!(
            outcome.message(),
            Some("Validation failed: email: must be a valid email address")
        );
    }

    #[test]
    fn non_mapping_input_is_unexpected() {
        let capture = LogCapture::new();
        let _guard = capture.install();

        let outcome = validate_model::<Bidder>(&json!(["Ada"]));

        assert!(matches!(outcome, ValidationOutcome::Failed { .. }));
        assert_eq!(
            outcome.into_result().unwrap_err(),
            "Unexpected validation error: expected a mapping of field values, got array"
        );

        let errors = capture.events_with_message("Unexpected validation error");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0]["level"], "ERROR");
        assert_eq!(errors[0]["data"], json!(["Ada"]));
    }
}
