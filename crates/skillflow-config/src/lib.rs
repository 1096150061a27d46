//! SkillFlow configuration.
//!
//! TOML-based configuration with environment overrides for secrets and
//! range validation. Every section uses serde defaults, so a partial (or
//! empty) config file works out of the box.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use skillflow_config::load_config;
//!
//! let config = load_config(None).expect("failed to load config");
//! println!("model: {}", config.assistant.model);
//! ```

pub mod env;
pub mod schema;
pub mod toml_loader;
pub mod validation;

pub use schema::{
    AssistantConfig, DeletePolicy, FirebaseConfig, LogLevel, LoggingConfig, PersistenceConfig,
    SkillflowConfig, WriteMode, CONFIG_SCHEMA_VERSION,
};

use std::path::Path;

use skillflow_common::ConfigError;

/// Load config from `path`, or from the platform default path when `None`.
///
/// The default file is created from a commented template if it does not
/// exist yet. Environment overrides are applied after parsing and the result
/// is validated.
pub fn load_config(path: Option<&Path>) -> Result<SkillflowConfig, ConfigError> {
    let mut config = match path {
        Some(path) => toml_loader::load_from_path(path)?,
        None => toml_loader::load_default()?,
    };

    env::apply_env_overrides(&mut config);
    validation::validate(&config)?;
    Ok(config)
}
