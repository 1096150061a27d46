//! Validation for the assistant and endpoint sections.

use crate::schema::SkillflowConfig;

use super::helpers::{validate_range, validate_range_f64, validate_url};

/// Validate sampling parameters and the request timeout.
pub(crate) fn validate_assistant(errors: &mut Vec<String>, config: &SkillflowConfig) {
    let a = &config.assistant;
    validate_range_f64(errors, "assistant.temperature", a.temperature, 0.0, 2.0);
    validate_range(errors, "assistant.top_k", a.top_k.into(), 1, 100);
    validate_range_f64(errors, "assistant.top_p", a.top_p, 0.0, 1.0);
    validate_range(
        errors,
        "assistant.max_output_tokens",
        a.max_output_tokens.into(),
        1,
        8192,
    );
    validate_range(errors, "assistant.timeout_secs", a.timeout_secs, 1, 300);

    if a.model.trim().is_empty() {
        errors.push("assistant.model must not be empty".into());
    }
    if let Some(persona) = &a.persona {
        if persona.trim().is_empty() {
            errors.push("assistant.persona must not be empty when set".into());
        }
    }
}

/// Validate base URLs.
pub(crate) fn validate_endpoints(errors: &mut Vec<String>, config: &SkillflowConfig) {
    validate_url(errors, "assistant.api_base", &config.assistant.api_base);
    validate_url(errors, "firebase.auth_base", &config.firebase.auth_base);
    validate_url(errors, "firebase.firestore_base", &config.firebase.firestore_base);
    if config.firebase.database.trim().is_empty() {
        errors.push("firebase.database must not be empty".into());
    }
}
