//! Unified error handling for feedlab
//!
//! One error type for every command, with context-rich messages and a
//! category for log filtering. Leaf modules keep their own narrow errors
//! (`ConfigError`, `GeneratorError`) and convert into this one at the edges.

use std::fmt;
use std::io;

/// Main error type for the feed tooling
#[derive(Debug)]
pub enum FeedError {
    // Configuration errors
    ConfigNotFound(String),
    ConfigParse(String),
    ConfigValidation(String),

    // Generator errors
    InvalidParameter(String, String), // (parameter_name, reason)

    // Feed and table errors
    MalformedRow(usize, String), // (line_number, reason)
    EmptyInput(String),
    VerificationFailed(String),

    // IO errors
    FileNotFound(String),
    FileRead(String),
    FileWrite(String),

    // General errors
    Internal(String),
}

impl FeedError {
    /// Get a user-friendly error message with helpful context
    pub fn user_message(&self) -> String {
        match self {
            FeedError::ConfigNotFound(path) => {
                format!(
                    "Configuration file not found: {}\n\n\
                    💡 Quick fix:\n\
                    1. Run: feedlab init\n\
                    2. Or omit --config to use built-in defaults",
                    path
                )
            }
            FeedError::ConfigValidation(msg) => {
                format!(
                    "Configuration validation error: {}\n\n\
                    💡 Check feedlab.toml for:\n\
                    - Probabilities within [0, 1]\n\
                    - A positive histogram bin count",
                    msg
                )
            }
            FeedError::InvalidParameter(param, reason) => {
                format!(
                    "Invalid parameter '{}': {}\n\n\
                    💡 Nothing was generated. Fix the value and run again.",
                    param, reason
                )
            }
            FeedError::MalformedRow(line, reason) => {
                format!(
                    "Malformed row at line {}: {}\n\n\
                    💡 Expected columns: ts_ns,type,order_id,side,px,qty",
                    line, reason
                )
            }
            FeedError::VerificationFailed(msg) => {
                format!(
                    "Feed verification failed: {}\n\n\
                    💡 Run: feedlab verify <file> --verbose for every finding",
                    msg
                )
            }
            _ => self.to_string(),
        }
    }

    /// Get error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            FeedError::ConfigNotFound(_)
            | FeedError::ConfigParse(_)
            | FeedError::ConfigValidation(_) => "config",

            FeedError::InvalidParameter(_, _) => "generator",

            FeedError::MalformedRow(_, _)
            | FeedError::EmptyInput(_)
            | FeedError::VerificationFailed(_) => "data",

            FeedError::FileNotFound(_)
            | FeedError::FileRead(_)
            | FeedError::FileWrite(_) => "io",

            FeedError::Internal(_) => "internal",
        }
    }
}

impl fmt::Display for FeedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeedError::ConfigNotFound(path) => {
                write!(f, "Configuration file not found: {}", path)
            }
            FeedError::ConfigParse(msg) => {
                write!(f, "Configuration parse error: {}", msg)
            }
            FeedError::ConfigValidation(msg) => {
                write!(f, "Configuration validation error: {}", msg)
            }

            FeedError::InvalidParameter(param, reason) => {
                write!(f, "Invalid parameter '{}': {}", param, reason)
            }

            FeedError::MalformedRow(line, reason) => {
                write!(f, "Malformed row at line {}: {}", line, reason)
            }
            FeedError::EmptyInput(what) => {
                write!(f, "No data in {}", what)
            }
            FeedError::VerificationFailed(msg) => {
                write!(f, "Verification failed: {}", msg)
            }

            FeedError::FileNotFound(path) => {
                write!(f, "File not found: {}", path)
            }
            FeedError::FileRead(msg) => {
                write!(f, "File read error: {}", msg)
            }
            FeedError::FileWrite(msg) => {
                write!(f, "File write error: {}", msg)
            }

            FeedError::Internal(msg) => {
                write!(f, "Internal error: {}", msg)
            }
        }
    }
}

impl std::error::Error for FeedError {}

// Conversion implementations for common error types

impl From<io::Error> for FeedError {
    fn from(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => FeedError::FileNotFound(err.to_string()),
            io::ErrorKind::PermissionDenied => FeedError::FileRead(err.to_string()),
            _ => FeedError::Internal(format!("IO error: {}", err)),
        }
    }
}

impl From<serde_json::Error> for FeedError {
    fn from(err: serde_json::Error) -> Self {
        FeedError::Internal(format!("JSON error: {}", err))
    }
}

impl From<toml::de::Error> for FeedError {
    fn from(err: toml::de::Error) -> Self {
        FeedError::ConfigParse(format!("TOML parse error: {}", err))
    }
}

impl From<crate::config::ConfigError> for FeedError {
    fn from(err: crate::config::ConfigError) -> Self {
        use crate::config::ConfigError;
        match err {
            ConfigError::FileNotFound(path) => FeedError::ConfigNotFound(path),
            ConfigError::FileRead(msg) => FeedError::FileRead(msg),
            ConfigError::FileWrite(msg) => FeedError::FileWrite(msg),
            ConfigError::Parse(msg) => FeedError::ConfigParse(msg),
            ConfigError::Serialize(msg) => FeedError::Internal(msg),
            ConfigError::Validation(msg) => FeedError::ConfigValidation(msg),
        }
    }
}

impl From<crate::generator::GeneratorError> for FeedError {
    fn from(err: crate::generator::GeneratorError) -> Self {
        use crate::generator::GeneratorError;
        match err {
            GeneratorError::InvalidProbability { name, .. } => {
                FeedError::InvalidParameter(name.to_string(), err.to_string())
            }
        }
    }
}

impl From<String> for FeedError {
    fn from(msg: String) -> Self {
        FeedError::Internal(msg)
    }
}

impl From<&str> for FeedError {
    fn from(msg: &str) -> Self {
        FeedError::Internal(msg.to_string())
    }
}

/// Result type alias using FeedError
pub type FeedResult<T> = Result<T, FeedError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = FeedError::ConfigNotFound("feedlab.toml".to_string());
        assert!(err.to_string().contains("feedlab.toml"));

        let err = FeedError::MalformedRow(12, "invalid px value 'x'".to_string());
        assert_eq!(err.to_string(), "Malformed row at line 12: invalid px value 'x'");
    }

    #[test]
    fn test_error_category() {
        let err = FeedError::ConfigValidation("test".to_string());
        assert_eq!(err.category(), "config");

        let err = FeedError::MalformedRow(1, "test".to_string());
        assert_eq!(err.category(), "data");

        let err = FeedError::FileWrite("test".to_string());
        assert_eq!(err.category(), "io");
    }

    #[test]
    fn test_user_message() {
        let err = FeedError::InvalidParameter("cancel_probability".to_string(), "too big".to_string());
        let msg = err.user_message();
        assert!(msg.contains("cancel_probability"));
        assert!(msg.contains("💡"));
    }

    #[test]
    fn test_io_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "test");
        let err: FeedError = io_err.into();
        assert!(matches!(err, FeedError::FileNotFound(_)));
    }

    #[test]
    fn test_generator_conversion() {
        let gen_err = crate::generator::GeneratorError::InvalidProbability {
            name: "burst_probability",
            value: 3.0,
        };
        let err: FeedError = gen_err.into();
        match err {
            FeedError::InvalidParameter(name, reason) => {
                assert_eq!(name, "burst_probability");
                assert!(reason.contains("3"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
