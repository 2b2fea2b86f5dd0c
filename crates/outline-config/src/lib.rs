//! # OutlineGenie Config
//!
//! TOML configuration for the analyzer, the panel, the in-memory host and
//! logging. Every section and field has a default, so an empty file is a
//! valid configuration.

mod error;
mod loader;
mod schema;
mod validator;

pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use schema::*;
pub use validator::{ConfigValidator, ValidationError, ValidationResult, ValidationWarning};
