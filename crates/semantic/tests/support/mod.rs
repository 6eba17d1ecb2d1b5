#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use vault_semantic::{SemanticRequest, SemanticResponse, SemanticRouter, WorkflowConfig};
use vault_store::{
    CommandInfo, MemoryVault, NoteFile, PatchRequest, Result, SearchHit, VaultError, VaultStore,
    WriteAck,
};

pub const TEST_NOTE: &str = "# Test Note\n\nThis links to [[linked.md]] and carries #tag1.\n\n## Section\nSome more text here.\n";

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn sample_vault() -> MemoryVault {
    MemoryVault::with_files([
        ("test.md", TEST_NOTE),
        ("linked.md", "# Linked\n\nBack to [[test.md]].\n"),
        (
            "projects/tax.md",
            "# Tax\nWe expect to recover $200,000 in ITCs.\n\n# Other\nUnrelated planning notes.\n",
        ),
        ("daily/2024-01-05.md", "# Friday\n\n- [ ] call the accountant\n"),
    ])
}

pub fn router() -> SemanticRouter {
    init_logging();
    SemanticRouter::with_bundled_config(Arc::new(sample_vault()))
}

pub fn router_over(store: impl VaultStore + 'static) -> SemanticRouter {
    init_logging();
    SemanticRouter::new(Arc::new(store), WorkflowConfig::bundled())
}

pub async fn call(
    router: &mut SemanticRouter,
    operation: &str,
    action: &str,
    params: Value,
) -> SemanticResponse {
    router
        .route(SemanticRequest::new(operation, action, params))
        .await
}

pub fn empty() -> Value {
    json!({})
}

/// Wraps a [`MemoryVault`] and injects backend failures
pub struct FailingVault {
    inner: MemoryVault,
    /// Returned by every call while set
    everything: Mutex<Option<VaultError>>,
    /// Returned by `search_simple` only
    search: Option<VaultError>,
}

impl FailingVault {
    /// Every call answers with a 404, like a REST backend for a missing resource
    pub fn not_found() -> Self {
        Self {
            inner: sample_vault(),
            everything: Mutex::new(Some(VaultError::http(404, "Not Found"))),
            search: None,
        }
    }

    /// The backend is unreachable
    pub fn refusing() -> Self {
        Self {
            inner: sample_vault(),
            everything: Mutex::new(Some(VaultError::ConnectionRefused(
                "connect ECONNREFUSED 127.0.0.1:27124".into(),
            ))),
            search: None,
        }
    }

    /// Only the search endpoint fails
    pub fn broken_search() -> Self {
        Self {
            inner: sample_vault(),
            everything: Mutex::new(None),
            search: Some(VaultError::http(500, "Internal Server Error")),
        }
    }

    /// The backend comes back; later calls reach the inner vault
    pub fn restore(&self) {
        *self.everything.lock().unwrap() = None;
    }

    fn check(&self) -> Result<()> {
        match self.everything.lock().unwrap().as_ref() {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl VaultStore for FailingVault {
    async fn list_files(&self, directory: Option<&str>) -> Result<Vec<String>> {
        self.check()?;
        self.inner.list_files(directory).await
    }

    async fn get_file(&self, path: &str) -> Result<NoteFile> {
        self.check()?;
        self.inner.get_file(path).await
    }

    async fn create_file(&self, path: &str, content: &str) -> Result<WriteAck> {
        self.check()?;
        self.inner.create_file(path, content).await
    }

    async fn update_file(&self, path: &str, content: &str) -> Result<WriteAck> {
        self.check()?;
        self.inner.update_file(path, content).await
    }

    async fn delete_file(&self, path: &str) -> Result<WriteAck> {
        self.check()?;
        self.inner.delete_file(path).await
    }

    async fn append_to_file(&self, path: &str, content: &str) -> Result<WriteAck> {
        self.check()?;
        self.inner.append_to_file(path, content).await
    }

    async fn patch_file(&self, path: &str, patch: &PatchRequest) -> Result<WriteAck> {
        self.check()?;
        self.inner.patch_file(path, patch).await
    }

    async fn search_simple(&self, query: &str) -> Result<Vec<SearchHit>> {
        self.check()?;
        if let Some(err) = &self.search {
            return Err(err.clone());
        }
        self.inner.search_simple(query).await
    }

    async fn get_active_file(&self) -> Result<NoteFile> {
        self.check()?;
        self.inner.get_active_file().await
    }

    async fn open_file(&self, path: &str) -> Result<WriteAck> {
        self.check()?;
        self.inner.open_file(path).await
    }

    async fn get_server_info(&self) -> Result<Value> {
        self.check()?;
        self.inner.get_server_info().await
    }

    async fn get_commands(&self) -> Result<Vec<CommandInfo>> {
        self.check()?;
        self.inner.get_commands().await
    }
}
