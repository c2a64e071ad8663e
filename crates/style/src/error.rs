use thiserror::Error;

/// Errors raised by configuration access and parsing.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CfgError {
    #[error("'Cfg' object has no attribute '{0}'")]
    NoSuchAttribute(String),

    #[error("Config value '{key}' has type {found}, expected {expected}")]
    TypeMismatch {
        key: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("Invalid config JSON: {0}")]
    Json(String),

    #[error("Style parse error: {0}")]
    Parse(String),

    #[error("Invalid value for '{property}': {value:?}")]
    InvalidValue { property: String, value: String },
}
