//! Centralized error types.
//!
//! A unified error hierarchy with user-friendly messages. All error types
//! use `thiserror` for ergonomic handling. Per-operation backend failures
//! travel through the gateway's error sink instead and never appear here.

use thiserror::Error;

use crate::api::ApiError;
use crate::config::ConfigError;

/// The main application error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration-related errors.
    #[error("{0}")]
    Config(#[from] ConfigError),

    /// API-related errors (client construction, not per-operation failures).
    #[error("{0}")]
    Api(#[from] ApiError),

    /// IO errors (file system, etc.).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Terminal-related errors.
    #[error("Terminal error: {0}")]
    Terminal(String),

    /// Generic errors with a message.
    #[error("{0}")]
    Other(String),
}

impl AppError {
    /// Create a terminal error.
    pub fn terminal(msg: impl Into<String>) -> Self {
        AppError::Terminal(msg.into())
    }

    /// Create a generic error.
    pub fn other(msg: impl Into<String>) -> Self {
        AppError::Other(msg.into())
    }

    /// Get a user-friendly message for display.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Config(e) => match e {
                ConfigError::NoConfigDir => {
                    "Could not find the configuration directory. Please check your system settings."
                        .to_string()
                }
                ConfigError::CreateDirError(_) | ConfigError::WriteError(_) => {
                    "Could not save configuration. Please check file permissions.".to_string()
                }
                ConfigError::ReadError(_) => {
                    "Could not read the configuration file. Please check it exists and is readable."
                        .to_string()
                }
                ConfigError::ParseError(_) => {
                    "The configuration file is invalid. Please check the file format.".to_string()
                }
                ConfigError::SerializeError(_) => {
                    "Could not save configuration. Internal error.".to_string()
                }
                ConfigError::ValidationError(msg) => format!("Configuration error: {}", msg),
            },
            AppError::Api(e) => match e {
                ApiError::Network(_) => {
                    "Connection failed. Please check the server URL and your network.".to_string()
                }
                ApiError::MalformedResponse => {
                    "Unexpected response from the ticket service. Please try again.".to_string()
                }
                ApiError::MissingId => {
                    "The ticket service returned an incomplete record. Please try again."
                        .to_string()
                }
                ApiError::NoMatch(id) => format!("Ticket '{}' was not found.", id),
            },
            AppError::Io(_) => "A file operation failed. Please check file permissions.".to_string(),
            AppError::Terminal(msg) => format!("Terminal error: {}", msg),
            AppError::Other(msg) => msg.clone(),
        }
    }

    /// Check if this error is critical and requires user acknowledgment.
    ///
    /// Critical errors prevent the application from functioning at all,
    /// such as configuration or terminal setup problems.
    pub fn is_critical(&self) -> bool {
        matches!(self, AppError::Config(_) | AppError::Terminal(_))
    }
}

/// Result type for application operations.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_from_config_error() {
        let config_err = ConfigError::NoConfigDir;
        let app_err: AppError = config_err.into();
        assert!(matches!(app_err, AppError::Config(ConfigError::NoConfigDir)));
    }

    #[test]
    fn test_app_error_from_api_error() {
        let api_err = ApiError::MalformedResponse;
        let app_err: AppError = api_err.into();
        assert!(matches!(app_err, AppError::Api(ApiError::MalformedResponse)));
    }

    #[test]
    fn test_user_message_validation() {
        let err = AppError::Config(ConfigError::ValidationError(
            "server URL cannot be empty".to_string(),
        ));
        assert!(err.user_message().contains("server URL cannot be empty"));
    }

    #[test]
    fn test_user_message_no_match() {
        let err = AppError::Api(ApiError::NoMatch("17".to_string()));
        let msg = err.user_message();
        assert!(msg.contains("17"));
        assert!(msg.contains("not found"));
    }

    #[test]
    fn test_is_critical_config() {
        let err = AppError::Config(ConfigError::NoConfigDir);
        assert!(err.is_critical());
    }

    #[test]
    fn test_is_critical_terminal() {
        let err = AppError::terminal("raw mode failed");
        assert!(err.is_critical());
    }

    #[test]
    fn test_api_error_is_not_critical() {
        let err = AppError::Api(ApiError::MalformedResponse);
        assert!(!err.is_critical());
    }

    #[test]
    fn test_other_error() {
        let err = AppError::other("something went wrong");
        assert!(matches!(err, AppError::Other(_)));
        assert_eq!(err.user_message(), "something went wrong");
    }
}
