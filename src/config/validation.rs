//! Configuration validation
//!
//! Validates SynfulCircuit configuration for correctness:
//! - Store path is set
//! - Table name is a plain SQL identifier (it is interpolated, not bound)
//! - Query defaults are usable

use super::circuit_config::CircuitConfig;
use crate::SynfulError;

/// Validation error details
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validation result
pub type ValidationResult = std::result::Result<(), Vec<ValidationError>>;

/// Whether `name` matches `[A-Za-z_][A-Za-z0-9_]*`
pub fn is_sql_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Validate a configuration, collecting every problem found
pub fn validate_config(config: &CircuitConfig) -> ValidationResult {
    let mut errors = Vec::new();

    if config.store.path.as_os_str().is_empty() {
        errors.push(ValidationError::new("store.path", "Store path must not be empty"));
    }

    if !is_sql_identifier(&config.store.table) {
        errors.push(ValidationError::new(
            "store.table",
            format!(
                "'{}' is not a valid table name (letters, digits and underscores only)",
                config.store.table
            ),
        ));
    }

    if config.filters.score_threshold.is_nan() {
        errors.push(ValidationError::new(
            "filters.score_threshold",
            "Score threshold must be a number",
        ));
    }

    if config.queries.top_k == 0 {
        errors.push(ValidationError::new(
            "queries.top_k",
            "top_k must be at least 1",
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validate a configuration, converting failures into a single error
pub fn validate_config_result(config: &CircuitConfig) -> crate::Result<()> {
    validate_config(config).map_err(|errors| {
        let messages = errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ");
        SynfulError::Config(messages)
    })
}
