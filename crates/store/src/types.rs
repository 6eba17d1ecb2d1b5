use crate::error::VaultError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::str::FromStr;

/// A note as returned by the vault
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct NoteFile {
    /// Vault-relative path
    pub path: String,

    /// Raw markdown text
    pub content: String,

    /// Tags reported by the backend (with leading `#`)
    #[serde(default)]
    pub tags: Vec<String>,

    /// Parsed frontmatter, if any
    #[serde(default)]
    pub frontmatter: Map<String, Value>,
}

/// A single upstream search hit
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchHit {
    pub path: String,
    pub score: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

/// Acknowledgement for write operations
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WriteAck {
    pub success: bool,
    pub path: String,
}

impl WriteAck {
    pub fn ok(path: impl Into<String>) -> Self {
        Self {
            success: true,
            path: path.into(),
        }
    }
}

/// A command exposed by the vault application
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CommandInfo {
    pub id: String,
    pub name: String,
}

/// How patch content is combined with its target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatchOperation {
    Append,
    Prepend,
    Replace,
}

impl PatchOperation {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Append => "append",
            Self::Prepend => "prepend",
            Self::Replace => "replace",
        }
    }
}

impl FromStr for PatchOperation {
    type Err = VaultError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "append" => Ok(Self::Append),
            "prepend" => Ok(Self::Prepend),
            "replace" => Ok(Self::Replace),
            other => Err(VaultError::invalid_input(format!(
                "Unknown patch operation '{other}' (expected append, prepend or replace)"
            ))),
        }
    }
}

/// What a patch is anchored to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatchTargetType {
    Heading,
    Block,
    Frontmatter,
}

impl FromStr for PatchTargetType {
    type Err = VaultError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "heading" => Ok(Self::Heading),
            "block" => Ok(Self::Block),
            "frontmatter" => Ok(Self::Frontmatter),
            other => Err(VaultError::invalid_input(format!(
                "Unknown patch target type '{other}' (expected heading, block or frontmatter)"
            ))),
        }
    }
}

/// Targeted modification of part of a note
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PatchRequest {
    pub operation: PatchOperation,
    pub target_type: PatchTargetType,
    pub target: String,
    pub content: String,
}
