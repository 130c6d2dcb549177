//! Configuration management
//!
//! TOML file with `${ENV_VAR}` substitution and `TAMIZ_*` environment
//! overrides. Secrets (salt, connection string) are wrapped in
//! [`SecretString`] and never logged.

pub mod loader;
pub mod schema;
pub mod secret;

pub use loader::load_config;
pub use schema::{
    AnonymizationConfig, ApplicationConfig, LoadConfig, LoggingConfig, PostgresConfig,
    RejectsConfig, TamizConfig,
};
pub use secret::{secret_string, SecretString, SecretValue};
