//! # Vibey Config
//!
//! Configuration management for the Vibey engagement agent.

mod error;
mod loader;
mod schema;
mod validator;

pub use error::ConfigError;
pub use loader::{
    AUDIT_KEY_ENV, ConfigLoader, LOCAL_CONFIG_FILES, LOCAL_ENV_FILE, PROVIDER_KEY_ENV,
};
pub use schema::*;
pub use validator::{ConfigValidator, ValidationError, ValidationResult, ValidationWarning};
