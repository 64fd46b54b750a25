//! # Deskhand Config
//!
//! TOML configuration for the deskhand server: schema with defaults for
//! every section, a loader that expands `${VAR}` references, and a
//! validator that separates hard errors from warnings.

mod error;
mod loader;
mod schema;
mod validator;

pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use schema::*;
pub use validator::{ConfigValidator, ValidationError, ValidationResult, ValidationWarning};
