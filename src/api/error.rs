//! API error types for the ticket service client.

use thiserror::Error;

/// Errors that can occur when talking to the ticket service.
///
/// The transport collapses network and decode failures into an empty JSON
/// array, so most of these are detected as shape mismatches downstream.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Network or HTTP error (client construction, connection setup).
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The response could not be interpreted for this operation.
    #[error("Unexpected response from the ticket service")]
    MalformedResponse,

    /// A create response arrived without a server-assigned id.
    #[error("The ticket service did not return an id for the created ticket")]
    MissingId,

    /// An operation referenced a ticket that could not be located.
    #[error("Ticket '{0}' was not found")]
    NoMatch(String),
}

/// Result type for API operations.
pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_match_display_includes_id() {
        let err = ApiError::NoMatch("17".to_string());
        assert_eq!(err.to_string(), "Ticket '17' was not found");
    }

    #[test]
    fn test_malformed_response_display() {
        let err = ApiError::MalformedResponse;
        assert!(err.to_string().contains("Unexpected response"));
    }
}
