use crate::types::Fragment;
use serde::{Deserialize, Serialize};

/// A next step offered to the agent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestedAction {
    pub description: String,
    pub command: String,
    pub reason: String,
}

impl SuggestedAction {
    pub fn new(
        description: impl Into<String>,
        command: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            description: description.into(),
            command: command.into(),
            reason: reason.into(),
        }
    }
}

/// Guidance block attached to successful responses
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowHint {
    pub message: String,
    #[serde(default)]
    pub suggested_next: Vec<SuggestedAction>,
}

/// Which approach was taken and what else could have been used
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EfficiencyHints {
    pub message: String,
    #[serde(default)]
    pub alternatives: Vec<String>,
}

/// Summary of a retrieval
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FragmentContext {
    pub search_results: usize,
    /// Distinct document paths touched, in result order
    pub linked_files: Vec<String>,
}

/// Result of `FragmentRetriever::retrieve_fragments`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FragmentResponse {
    pub result: Vec<Fragment>,
    pub workflow: WorkflowHint,
    pub efficiency_hints: EfficiencyHints,
    pub context: FragmentContext,
}
