use crate::context::ContextSnapshot;
use crate::error::RouterError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use vault_fragments::{EfficiencyHints, SuggestedAction, WorkflowHint};

/// One routed request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SemanticRequest {
    pub operation: String,
    pub action: String,
    #[serde(default)]
    pub params: Map<String, Value>,
}

impl SemanticRequest {
    /// Build a request; `params` that are not a JSON object are treated as empty
    pub fn new(operation: impl Into<String>, action: impl Into<String>, params: Value) -> Self {
        let params = match params {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        Self {
            operation: operation.into(),
            action: action.into(),
            params,
        }
    }
}

/// Failure details; replaces `workflow` on error responses
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    pub code: String,
    pub message: String,
    #[serde(default)]
    pub recovery_hints: Vec<SuggestedAction>,
}

impl ErrorInfo {
    pub fn from_error(err: &RouterError, recovery_hints: Vec<SuggestedAction>) -> Self {
        Self {
            code: err.code().to_string(),
            message: err.to_string(),
            recovery_hints,
        }
    }
}

/// Enriched response returned by `SemanticRouter::route`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SemanticResponse {
    pub result: Value,
    pub context: ContextSnapshot,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workflow: Option<WorkflowHint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub efficiency_hints: Option<EfficiencyHints>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorInfo>,
}

impl SemanticResponse {
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    /// Commands of the suggestions (success) or recovery hints (failure)
    pub fn suggested_commands(&self) -> Vec<&str> {
        let actions = match (&self.workflow, &self.error) {
            (Some(workflow), _) => &workflow.suggested_next,
            (None, Some(error)) => &error.recovery_hints,
            (None, None) => return Vec::new(),
        };
        actions.iter().map(|a| a.command.as_str()).collect()
    }
}
