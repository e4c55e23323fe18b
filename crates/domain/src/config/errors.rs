/// Failures while locating, parsing or checking `gridrank.toml`.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Cannot read config file {path}: {reason}")]
    Unreadable { path: String, reason: String },

    #[error("Cannot write config file {path}: {reason}")]
    Unwritable { path: String, reason: String },

    #[error("Malformed config: {0}")]
    Malformed(String),

    #[error("Invalid [{section}] setting: {message}")]
    Invalid {
        section: &'static str,
        message: String,
    },
}

impl ConfigError {
    pub fn invalid(section: &'static str, message: impl Into<String>) -> Self {
        ConfigError::Invalid {
            section,
            message: message.into(),
        }
    }

    /// Config section the error refers to, when it is a validation failure.
    pub fn section(&self) -> Option<&'static str> {
        match self {
            ConfigError::Invalid { section, .. } => Some(section),
            _ => None,
        }
    }
}
