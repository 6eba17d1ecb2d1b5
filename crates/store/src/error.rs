use thiserror::Error;

/// Result type for vault operations
pub type Result<T> = std::result::Result<T, VaultError>;

/// Errors reported by a vault backend
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VaultError {
    /// File or directory does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// The backend refused the connection (server not running, wrong port)
    #[error("Cannot connect to vault: {0}")]
    ConnectionRefused(String),

    /// Non-success HTTP status from the backend
    #[error("Request failed with status code {status}: {message}")]
    Http { status: u16, message: String },

    /// Malformed request parameters
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl VaultError {
    /// Create a not-found error
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create an HTTP status error
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self::Http {
            status,
            message: message.into(),
        }
    }

    /// Missing file or directory, including a 404 from the backend
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_) | Self::Http { status: 404, .. })
    }

    /// Transport-level failure where the backend never answered
    #[must_use]
    pub const fn is_connection_refused(&self) -> bool {
        matches!(self, Self::ConnectionRefused(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_404_counts_as_not_found() {
        assert!(VaultError::http(404, "Not Found").is_not_found());
        assert!(VaultError::not_found("a.md").is_not_found());
        assert!(!VaultError::http(500, "boom").is_not_found());
    }

    #[test]
    fn http_message_keeps_status_code() {
        let err = VaultError::http(404, "Not Found");
        assert_eq!(
            err.to_string(),
            "Request failed with status code 404: Not Found"
        );
    }
}
