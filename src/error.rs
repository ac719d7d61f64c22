use thiserror::Error;

/// Unified error type for changelog-kit operations
#[derive(Error, Debug)]
pub enum ChangelogError {
    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid version: {0}")]
    InvalidVersion(String),

    #[error("Changelog error: {0}")]
    Changelog(String),

    #[error("GitHub request failed: {0}")]
    GitHub(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience type alias for Results in changelog-kit
pub type Result<T> = std::result::Result<T, ChangelogError>;

impl ChangelogError {
    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        ChangelogError::Config(msg.into())
    }

    /// Create a version error with context
    pub fn invalid_version(msg: impl Into<String>) -> Self {
        ChangelogError::InvalidVersion(msg.into())
    }

    /// Create a changelog content error with context
    pub fn changelog(msg: impl Into<String>) -> Self {
        ChangelogError::Changelog(msg.into())
    }

    /// Create a GitHub error with context
    pub fn github(msg: impl Into<String>) -> Self {
        ChangelogError::GitHub(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ChangelogError::config("unknown section");
        assert_eq!(err.to_string(), "Configuration error: unknown section");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: ChangelogError = io_err.into();
        assert!(err.to_string().contains("I/O error"));
    }

    #[test]
    fn test_error_from_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: ChangelogError = json_err.into();
        assert!(err.to_string().starts_with("JSON error"));
    }

    #[test]
    fn test_invalid_version_keeps_input() {
        let err = ChangelogError::invalid_version("v1.0.0");
        assert_eq!(err.to_string(), "Invalid version: v1.0.0");
    }

    #[test]
    fn test_error_messages_are_descriptive() {
        let error_pairs = vec![
            (ChangelogError::config("x"), "Configuration error"),
            (ChangelogError::invalid_version("x"), "Invalid version"),
            (ChangelogError::changelog("x"), "Changelog error"),
            (ChangelogError::github("x"), "GitHub request failed"),
        ];

        for (err, expected_prefix) in error_pairs {
            let msg = err.to_string();
            assert!(
                msg.starts_with(expected_prefix),
                "Error message should start with '{}', but got '{}'",
                expected_prefix,
                msg
            );
        }
    }

    #[test]
    fn test_error_special_characters_in_messages() {
        for msg in ["with\nnewline", "with 'quotes'", "with unicode: ñ"] {
            let err = ChangelogError::changelog(msg);
            assert!(err.to_string().contains(msg));
        }
    }
}
