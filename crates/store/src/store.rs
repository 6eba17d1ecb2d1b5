use crate::error::Result;
use crate::types::{CommandInfo, NoteFile, PatchRequest, SearchHit, WriteAck};
use async_trait::async_trait;
use serde_json::Value;

/// File-store backend holding the notes.
///
/// Paths are vault-relative and use `/` separators. `list_files` returns entry names relative to
/// the listed directory; sub-directories carry a trailing `/`.
#[async_trait]
pub trait VaultStore: Send + Sync {
    async fn list_files(&self, directory: Option<&str>) -> Result<Vec<String>>;

    async fn get_file(&self, path: &str) -> Result<NoteFile>;

    async fn create_file(&self, path: &str, content: &str) -> Result<WriteAck>;

    async fn update_file(&self, path: &str, content: &str) -> Result<WriteAck>;

    async fn delete_file(&self, path: &str) -> Result<WriteAck>;

    async fn append_to_file(&self, path: &str, content: &str) -> Result<WriteAck>;

    async fn patch_file(&self, path: &str, patch: &PatchRequest) -> Result<WriteAck>;

    /// Plain-text search across note contents
    async fn search_simple(&self, query: &str) -> Result<Vec<SearchHit>>;

    /// Note currently focused in the vault application
    async fn get_active_file(&self) -> Result<NoteFile>;

    async fn open_file(&self, path: &str) -> Result<WriteAck>;

    async fn get_server_info(&self) -> Result<Value>;

    async fn get_commands(&self) -> Result<Vec<CommandInfo>>;
}
