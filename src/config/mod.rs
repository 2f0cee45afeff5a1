//! Configuration system
//!
//! Loads ~/.config/synful/config.yaml with:
//! - Backing store location and link table name
//! - Score and autapse filters
//! - Default partner query parameters

mod circuit_config;
pub mod validation;

pub use circuit_config::{CircuitConfig, FilterConfig, QueryConfig, StoreConfig};
pub use validation::{is_sql_identifier, validate_config, validate_config_result, ValidationError};
