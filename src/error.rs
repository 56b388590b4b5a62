use thiserror::Error;

/// Unified error type for wagner operations
#[derive(Error, Debug)]
pub enum WagnerError {
    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("Repository HEAD is not on a branch")]
    DetachedHead,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Tag error: {0}")]
    Tag(String),

    #[error("Remote operation failed: {0}")]
    Remote(String),

    #[error("Command failed: {0}")]
    Command(String),

    #[error("Egg error: {0}")]
    Egg(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in wagner
pub type Result<T> = std::result::Result<T, WagnerError>;

impl WagnerError {
    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        WagnerError::Config(msg.into())
    }

    /// Create a tag error with context
    pub fn tag(msg: impl Into<String>) -> Self {
        WagnerError::Tag(msg.into())
    }

    /// Create a remote error with context
    pub fn remote(msg: impl Into<String>) -> Self {
        WagnerError::Remote(msg.into())
    }

    /// Create a local command error with context
    pub fn command(msg: impl Into<String>) -> Self {
        WagnerError::Command(msg.into())
    }

    /// Create an egg error with context
    pub fn egg(msg: impl Into<String>) -> Self {
        WagnerError::Egg(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = WagnerError::config("missing host");
        assert_eq!(err.to_string(), "Configuration error: missing host");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: WagnerError = io_err.into();
        assert!(err.to_string().contains("I/O error"));
    }

    #[test]
    fn test_error_from_git2() {
        let git_err = git2::Error::from_str("object not found");
        let err: WagnerError = git_err.into();
        assert!(err.to_string().starts_with("Git operation failed"));
    }

    #[test]
    fn test_error_messages_are_descriptive() {
        let error_pairs = vec![
            (WagnerError::config("x"), "Configuration error"),
            (WagnerError::tag("x"), "Tag error"),
            (WagnerError::remote("x"), "Remote operation failed"),
            (WagnerError::command("x"), "Command failed"),
            (WagnerError::egg("x"), "Egg error"),
            (WagnerError::DetachedHead, "Repository HEAD"),
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
}
