//! Edit anchoring for vault notes
//!
//! [`find_fuzzy_matches`] locates spans similar to a search text when an exact match fails;
//! [`perform_window_edit`] uses it to replace text in a note held by a
//! [`vault_store::VaultStore`]. Failed edits are kept by the caller in a [`ContentBuffer`].

mod buffer;
mod error;
mod fuzzy;
mod path_match;
mod window_edit;

pub use buffer::{BufferedContent, ContentBuffer};
pub use error::{EditError, Result};
pub use fuzzy::{best_similarity, find_fuzzy_matches, normalize, similarity, FuzzyMatch};
pub use path_match::PathMatcher;
pub use window_edit::{perform_window_edit, EditMethod, WindowEditOutcome, DEFAULT_FUZZY_THRESHOLD};
