use thiserror::Error;
use vault_store::VaultError;

pub type Result<T> = std::result::Result<T, EditError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EditError {
    /// No span of the file is similar enough to the search text
    #[error(
        "No match found for the search text in {path} (best similarity {best:.2}, threshold {threshold:.2})"
    )]
    NoMatch {
        path: String,
        threshold: f64,
        best: f64,
    },

    #[error(transparent)]
    Store(#[from] VaultError),

    #[error("Search text must not be empty")]
    EmptySearch,
}
