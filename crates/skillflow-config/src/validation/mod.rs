//! Full configuration validation.
//!
//! Checks numeric ranges and endpoint shapes, collecting every problem into
//! a single `ConfigError`.

mod assistant;
mod helpers;


use crate::schema::SkillflowConfig;
use skillflow_common::ConfigError;

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &SkillflowConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    assistant::validate_assistant(&mut errors, config);
    assistant::validate_endpoints(&mut errors, config);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}
