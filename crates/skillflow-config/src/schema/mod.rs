//! Configuration schema types for SkillFlow.
//!
//! All structs use `serde(default)` so partial configs work correctly.

mod assistant;
mod firebase;
mod persistence;
mod system;

pub use assistant::*;
pub use firebase::*;
pub use persistence::*;
pub use system::*;

use serde::{Deserialize, Serialize};

/// Current config schema version.
pub const CONFIG_SCHEMA_VERSION: u32 = 1;

/// Root configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SkillflowConfig {
    pub assistant: AssistantConfig,
    pub firebase: FirebaseConfig,
    pub persistence: PersistenceConfig,
    pub logging: LoggingConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_assistant_sampling() {
        let config = SkillflowConfig::default();
        assert_eq!(config.assistant.model, "gemini-2.5-flash");
        assert_eq!(config.assistant.temperature, 0.7);
        assert_eq!(config.assistant.top_k, 40);
        assert_eq!(config.assistant.top_p, 0.95);
        assert_eq!(config.assistant.max_output_tokens, 1024);
        assert_eq!(config.assistant.timeout_secs, 30);
        assert!(config.assistant.api_key.is_empty());
    }

    #[test]
    fn default_persistence_is_fire_and_forget_local_delete() {
        let config = SkillflowConfig::default();
        assert_eq!(config.persistence.write_mode, WriteMode::FireAndForget);
        assert_eq!(config.persistence.delete_policy, DeletePolicy::LocalOnly);
    }

    #[test]
    fn empty_toml_gives_defaults() {
        let config: SkillflowConfig = toml::from_str("").unwrap();
        assert_eq!(config.firebase.database, "(default)");
        assert_eq!(config.logging.level, LogLevel::Info);
    }

    #[test]
    fn partial_section_keeps_other_defaults() {
        let config: SkillflowConfig = toml::from_str(
            r#"
[persistence]
write_mode = "awaited"
"#,
        )
        .unwrap();
        assert_eq!(config.persistence.write_mode, WriteMode::Awaited);
        assert_eq!(config.persistence.delete_policy, DeletePolicy::LocalOnly);
    }

    #[test]
    fn debug_output_redacts_keys() {
        let mut config = SkillflowConfig::default();
        config.assistant.api_key = "AIzaSECRET".into();
        config.firebase.api_key = "AIzaOTHER".into();
        let dump = format!("{config:?}");
        assert!(!dump.contains("AIzaSECRET"));
        assert!(!dump.contains("AIzaOTHER"));
        assert!(dump.contains("[REDACTED]"));
    }
}
