use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("config parse error: {0}")]
    ParseError(String),

    #[error("config validation error: {0}")]
    ValidationError(String),

    #[error("missing credential: {0}")]
    MissingCredential(String),
}

#[derive(Debug, thiserror::Error)]
pub enum SkillflowError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("ai error: {0}")]
    Ai(String),

    #[error("store error: {0}")]
    Store(String),

    #[error("chat error: {0}")]
    Chat(String),

    #[error("account error: {0}")]
    Account(String),

    #[error("{0}")]
    Other(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_display() {
        let err = ConfigError::FileNotFound(PathBuf::from("/tmp/missing.toml"));
        assert_eq!(err.to_string(), "config file not found: /tmp/missing.toml");

        let err = ConfigError::ParseError("unexpected token".into());
        assert_eq!(err.to_string(), "config parse error: unexpected token");

        let err = ConfigError::ValidationError("assistant.temperature out of range".into());
        assert_eq!(
            err.to_string(),
            "config validation error: assistant.temperature out of range"
        );

        let err = ConfigError::MissingCredential("gemini api key".into());
        assert_eq!(err.to_string(), "missing credential: gemini api key");
    }

    #[test]
    fn skillflow_error_from_config() {
        let config_err = ConfigError::ParseError("bad toml".into());
        let err: SkillflowError = config_err.into();
        assert!(matches!(err, SkillflowError::Config(_)));
        assert!(err.to_string().contains("bad toml"));
    }

    #[test]
    fn skillflow_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let err: SkillflowError = io_err.into();
        assert!(matches!(err, SkillflowError::Io(_)));
        assert!(err.to_string().contains("file missing"));
    }

    #[test]
    fn skillflow_error_other_variants() {
        let err = SkillflowError::Ai("model unavailable".into());
        assert_eq!(err.to_string(), "ai error: model unavailable");

        let err = SkillflowError::Store("permission denied".into());
        assert_eq!(err.to_string(), "store error: permission denied");

        let err = SkillflowError::Chat("persistence failed".into());
        assert_eq!(err.to_string(), "chat error: persistence failed");

        let err = SkillflowError::Account("suspended".into());
        assert_eq!(err.to_string(), "account error: suspended");

        let err = SkillflowError::Other("something went wrong".into());
        assert_eq!(err.to_string(), "something went wrong");
    }
}
