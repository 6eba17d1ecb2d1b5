use thiserror::Error;
use vault_edit::EditError;
use vault_store::VaultError;

pub type Result<T> = std::result::Result<T, RouterError>;

/// Failure of a routed operation, caught at the router boundary
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RouterError {
    /// Unknown operation/action or malformed parameters
    #[error("{0}")]
    Validation(String),

    /// Missing file or directory, or no edit anchor above the threshold
    #[error("{0}")]
    NotFound(String),

    /// The vault backend failed or could not be reached
    #[error("{0}")]
    Upstream(String),

    #[error("{0}")]
    Unknown(String),
}

impl RouterError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn unknown(msg: impl Into<String>) -> Self {
        Self::Unknown(msg.into())
    }

    /// Stable machine-readable code
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Upstream(_) => "UPSTREAM_ERROR",
            Self::Unknown(_) => "UNKNOWN_ERROR",
        }
    }

    #[must_use]
    pub const fn is_upstream(&self) -> bool {
        matches!(self, Self::Upstream(_))
    }
}

impl From<VaultError> for RouterError {
    fn from(err: VaultError) -> Self {
        let message = err.to_string();
        if err.is_not_found() {
            return Self::NotFound(message);
        }
        match err {
            VaultError::InvalidInput(_) => Self::Validation(message),
            _ => Self::Upstream(message),
        }
    }
}

impl From<EditError> for RouterError {
    fn from(err: EditError) -> Self {
        match err {
            EditError::Store(inner) => inner.into(),
            EditError::NoMatch { .. } => Self::NotFound(err.to_string()),
            EditError::EmptySearch => Self::Validation(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for RouterError {
    fn from(err: serde_json::Error) -> Self {
        Self::Unknown(format!("Failed to encode result: {err}"))
    }
}
