use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// Content kept after a failed edit so it can be replayed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BufferedContent {
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Milliseconds since the Unix epoch
    pub stored_at_ms: u64,
}

/// Single-slot buffer owned by one session. Storing replaces whatever was there.
#[derive(Debug, Default)]
pub struct ContentBuffer {
    slot: Option<BufferedContent>,
}

impl ContentBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn store(
        &mut self,
        content: impl Into<String>,
        search_text: Option<String>,
        path: Option<String>,
    ) {
        let stored_at_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or_default();
        self.slot = Some(BufferedContent {
            content: content.into(),
            search_text,
            path,
            stored_at_ms,
        });
    }

    pub fn retrieve(&self) -> Option<&BufferedContent> {
        self.slot.as_ref()
    }

    pub fn take(&mut self) -> Option<BufferedContent> {
        self.slot.take()
    }

    pub fn clear(&mut self) {
        self.slot = None;
    }

    pub fn is_available(&self) -> bool {
        self.slot.is_some()
    }
}
