//! Vault collaborator for the semantic router
//!
//! The router never talks to a note application directly. Everything it needs from the vault
//! (file CRUD, directory listing, plain-text search, targeted patches, the active note) goes
//! through the [`VaultStore`] trait. [`MemoryVault`] is a complete in-memory implementation used
//! for tests and offline sessions.

mod error;
mod memory;
mod store;
mod types;

pub use error::{Result, VaultError};
pub use memory::MemoryVault;
pub use store::VaultStore;
pub use types::{
    CommandInfo, NoteFile, PatchOperation, PatchRequest, PatchTargetType, SearchHit, WriteAck,
};
