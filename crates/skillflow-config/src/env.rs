//! Environment overrides for secrets and project identity.
//!
//! Keys never need to live in the config file: these variables win over
//! whatever the TOML says.

use tracing::debug;

use crate::schema::SkillflowConfig;

pub const GEMINI_API_KEY_VAR: &str = "SKILLFLOW_GEMINI_API_KEY";
pub const FIREBASE_API_KEY_VAR: &str = "SKILLFLOW_FIREBASE_API_KEY";
pub const FIREBASE_PROJECT_VAR: &str = "SKILLFLOW_FIREBASE_PROJECT_ID";
pub const GEMINI_MODEL_VAR: &str = "SKILLFLOW_GEMINI_MODEL";

/// Apply overrides from the process environment.
pub fn apply_env_overrides(config: &mut SkillflowConfig) {
    apply_overrides_from(config, |key| std::env::var(key).ok());
}

/// Apply overrides using an arbitrary lookup. Empty values are ignored.
pub fn apply_overrides_from(
    config: &mut SkillflowConfig,
    lookup: impl Fn(&str) -> Option<String>,
) {
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(key) = get(GEMINI_API_KEY_VAR) {
        debug!("assistant.api_key taken from {GEMINI_API_KEY_VAR}");
        config.assistant.api_key = key;
    }
    if let Some(model) = get(GEMINI_MODEL_VAR) {
        config.assistant.model = model;
    }
    if let Some(key) = get(FIREBASE_API_KEY_VAR) {
        debug!("firebase.api_key taken from {FIREBASE_API_KEY_VAR}");
        config.firebase.api_key = key;
    }
    if let Some(project) = get(FIREBASE_PROJECT_VAR) {
        config.firebase.project_id = project;
    }
}
