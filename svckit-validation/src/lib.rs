//! svckit-validation: format predicates and schema validation
//!
//! Predicates are plain `fn(&str) -> bool`. [`validate_model`] turns any
//! serde-deserializable [`Model`] into a schema and never fails outright:
//! problems come back as a [`ValidationOutcome`] and are logged through
//! svckit-telemetry.

pub mod error;
pub mod format;
pub mod model;

pub use error::ValidationError;
pub use format::{
    is_valid_date_string, is_valid_date_value, is_valid_email, is_valid_uuid, require_email,
    require_max_len, require_non_empty, require_uuid,
};
pub use model::{validate_model, Model, ValidationOutcome};
