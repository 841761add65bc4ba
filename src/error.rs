// Error types shared by the form and the HTTP client. The `Display`
// output of each variant is exactly the status text shown to the user.

use std::path::PathBuf;
use thiserror::Error;

/// Problems detected locally before anything is sent to the server.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("File too large ({size_mb:.2} MB). Max {max_mb} MB.")]
    TooLarge { size_mb: f64, max_mb: u64 },
    #[error("Only PDF files are allowed.")]
    InvalidExtension,
    #[error("Please select a PDF first.")]
    NoFileSelected,
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The server answered with a non-success status. The message is the
    /// body's `error` field, or a generic fallback.
    #[error("{0}")]
    Server(String),

    /// No response was received: DNS, refused connection, timeout, ...
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("An analysis is already in progress.")]
    Busy,

    #[error("Could not read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ClientError {
    /// The underlying reason without the "Connection error" prefix, used
    /// when the failure is reported under another heading.
    pub fn reason(&self) -> String {
        match self {
            ClientError::Connection(reason) => reason.clone(),
            other => other.to_string(),
        }
    }
}
