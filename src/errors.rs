// Error types shared across the gateway and storage layers

use std::path::PathBuf;
use thiserror::Error;

/// Failure of a single call to the generative-text service.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Failed to create HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("Failed to send request to {provider} API: {source}")]
    Transport {
        provider: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{provider} API request failed\n\nStatus: {status}\nBody: {body}")]
    Status {
        provider: String,
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("Failed to parse {provider} API response: {reason}")]
    Malformed { provider: String, reason: String },

    #[error("{provider} returned no text in its response")]
    EmptyResponse { provider: String },

    #[error("{provider} returned no text (finish reason: {reason})")]
    Blocked { provider: String, reason: String },
}

/// Failure while persisting a transcript.
///
/// `InvalidRating` is raised before anything touches the disk. The remaining
/// variants are write failures: callers report them and keep going.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Rating must be between 1 and 5 (got {0})")]
    InvalidRating(i32),

    #[error("Failed to access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write CSV record to {}: {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Failed to serialize transcripts in {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl StorageError {
    /// True for I/O and serialization failures (anything but a bad rating)
    pub fn is_write_failure(&self) -> bool {
        !matches!(self, StorageError::InvalidRating(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_rating_is_not_write_failure() {
        let err = StorageError::InvalidRating(6);
        assert!(!err.is_write_failure());
        assert_eq!(err.to_string(), "Rating must be between 1 and 5 (got 6)");
    }

    #[test]
    fn test_io_error_is_write_failure() {
        let err = StorageError::Io {
            path: PathBuf::from("conversations.csv"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(err.is_write_failure());
        assert!(err.to_string().contains("conversations.csv"));
    }

    #[test]
    fn test_empty_response_message() {
        let err = GatewayError::EmptyResponse {
            provider: "Gemini".to_string(),
        };
        assert_eq!(err.to_string(), "Gemini returned no text in its response");
    }
}
