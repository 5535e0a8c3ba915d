use thiserror::Error;

use crate::core::poll::PollError;

#[derive(Error, Debug)]
pub enum MovieNightError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration field '{field}' is invalid: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Metadata lookup failed: {message}")]
    MetadataError { message: String },

    #[error("Saved document '{path}' is invalid: {source}")]
    CorruptDocument {
        path: String,
        #[source]
        source: PollError,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Storage,
    Network,
    Configuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl MovieNightError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::IoError(_) | Self::SerializationError(_) | Self::CorruptDocument { .. } => {
                ErrorCategory::Storage
            }
            Self::HttpError(_) | Self::MetadataError { .. } => ErrorCategory::Network,
            Self::ConfigError { .. }
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        // A lookup miss only costs a decoration.
        if let Self::MetadataError { .. } = self {
            return ErrorSeverity::Low;
        }
        match self.category() {
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Storage => ErrorSeverity::High,
            ErrorCategory::Configuration => ErrorSeverity::Critical,
        }
    }

    /// True when the error is an I/O "not found", used to treat a missing
    /// document as absent rather than broken.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::IoError(e) if e.kind() == std::io::ErrorKind::NotFound)
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::IoError(e) => format!("Could not access a saved file: {}", e),
            Self::SerializationError(_) => "A saved file is corrupt or unreadable.".to_string(),
            Self::HttpError(_) | Self::MetadataError { .. } => {
                "The movie database could not be reached.".to_string()
            }
            Self::ConfigError { message } => format!("Bad configuration: {}", message),
            Self::ConfigValidationError { field, message } => {
                format!("Bad configuration in '{}': {}", field, message)
            }
            Self::InvalidConfigValueError { field, reason, .. } => {
                format!("Bad configuration in '{}': {}", field, reason)
            }
            Self::CorruptDocument { path, source } => {
                format!("The saved document '{}' is inconsistent: {}", path, source)
            }
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Storage => {
                "Check that the storage directory exists and is writable, or remove the corrupt document."
            }
            ErrorCategory::Network => "Check the metadata endpoint and API key, then try again.",
            ErrorCategory::Configuration => {
                "Create or fix the config file as described in the README."
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, MovieNightError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_detection() {
        let err = MovieNightError::from(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "gone",
        ));
        assert!(err.is_not_found());
        assert_eq!(err.category(), ErrorCategory::Storage);

        let err = MovieNightError::from(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "nope",
        ));
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_severity_ordering() {
        let config = MovieNightError::ConfigError {
            message: "bot.name is empty".to_string(),
        };
        let corrupt = MovieNightError::CorruptDocument {
            path: "currentpoll.json".to_string(),
            source: PollError::EmptyChoiceList,
        };

        assert_eq!(config.severity(), ErrorSeverity::Critical);
        assert_eq!(corrupt.category(), ErrorCategory::Storage);
        assert!(config.severity() > corrupt.severity());
        assert_eq!(
            MovieNightError::MetadataError {
                message: "Movie not found!".to_string()
            }
            .severity(),
            ErrorSeverity::Low
        );
        assert_eq!(
            corrupt.user_friendly_message(),
            "The saved document 'currentpoll.json' is inconsistent: A poll needs at least one movie."
        );
    }
}
