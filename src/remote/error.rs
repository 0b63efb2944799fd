//! Remote store-specific error types.

use std::path::PathBuf;

/// Errors that can occur while reading or writing the remote task collection.
#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    HttpRequest(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("API error (status {status}): {message}")]
    ApiError { status: u16, message: String },

    /// Failed to (de)serialize the task collection
    #[error("Failed to deserialize task collection: {0}")]
    Deserialization(#[from] serde_json::Error),

    /// Backing file could not be read or written
    #[error("Storage I/O failed for {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Blocking storage task did not complete
    #[error("Storage task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    /// Store reported itself unreachable
    #[error("Remote store unavailable")]
    Unavailable,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_error_display() {
        let error = RemoteError::Unavailable;
        assert!(error.to_string().contains("unavailable"));

        let error = RemoteError::ApiError {
            status: 401,
            message: "Unauthorized".to_string(),
        };
        let error_str = error.to_string();
        assert!(error_str.contains("401"));
        assert!(error_str.contains("Unauthorized"));

        let error = RemoteError::Io {
            path: PathBuf::from("/data/tasks.json"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(error.to_string().contains("/data/tasks.json"));
    }
}
