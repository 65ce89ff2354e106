//! Error types for countryclean library.
//!
//! Reconciliation itself never fails; these errors only surface at the
//! boundary where callers hand in data that has the wrong shape.

use thiserror::Error;

/// Result type alias for countryclean operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for countryclean library.
#[derive(Error, Debug)]
pub enum Error {
    /// JSON parsing error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A record was expected to be a JSON object.
    #[error("Record is not an object (found {0})")]
    NotAnObject(&'static str),

    /// A record field held an array or object instead of a scalar.
    #[error("Field '{field}' is not a scalar value")]
    NonScalarField { field: String },

    /// The country code and country name were mapped to the same field.
    #[error("Country code and country name cannot share the field '{0}'")]
    SharedCountryField(String),

    /// A custom reference table used a key that is not a two-letter code.
    #[error("Invalid country code in reference table: {0:?}")]
    InvalidCountryCode(String),
}

/// Human-readable JSON type name, used in error messages.
pub(crate) fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
