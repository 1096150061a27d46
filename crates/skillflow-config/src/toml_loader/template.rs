//! Default TOML config template with inline documentation comments.

/// Generate the default TOML config content with comments.
pub(crate) fn default_config_toml() -> &'static str {
    r##"# SkillFlow Configuration
# Schema version 1
# Only override what you want to change -- missing fields use defaults.
# Keys are best supplied through the environment:
#   SKILLFLOW_GEMINI_API_KEY, SKILLFLOW_FIREBASE_API_KEY, SKILLFLOW_FIREBASE_PROJECT_ID

[assistant]
# model = "gemini-2.5-flash"
# temperature = 0.7        # 0.0-2.0
# top_k = 40               # 1-100
# top_p = 0.95             # 0.0-1.0
# max_output_tokens = 1024 # 1-8192
# timeout_secs = 30        # 1-300
# persona = "You are ... {user_context} ..."
# acknowledgment = "I understand. ..."

[firebase]
# project_id = ""
# database = "(default)"

[persistence]
# write_mode = "fire_and_forget"   # or "awaited"
# delete_policy = "local_only"     # or "archive", "remote"

[logging]
# level = "info"           # trace, debug, info, warn, error
"##
}
