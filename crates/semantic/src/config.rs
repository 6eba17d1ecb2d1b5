use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

const BUNDLED_WORKFLOWS: &str = include_str!("../../../config/workflows.json");

/// Declarative hint configuration: `operation -> action -> {success_hints, failure_hints}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowConfig {
    pub version: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default)]
    pub operations: BTreeMap<String, OperationConfig>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub efficiency_rules: Vec<EfficiencyRule>,

    #[serde(default)]
    pub context_triggers: ContextTriggers,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default)]
    pub actions: BTreeMap<String, ActionConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success_hints: Option<HintBlock>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure_hints: Option<HintBlock>,
}

/// Message template plus condition-gated suggestion groups
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HintBlock {
    #[serde(default)]
    pub message: String,

    #[serde(default)]
    pub suggested_next: Vec<ConditionalSuggestions>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionalSuggestions {
    /// Condition name, e.g. `always` or `has_results`
    pub condition: String,

    #[serde(default)]
    pub suggestions: Vec<SuggestionTemplate>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestionTemplate {
    pub description: String,
    pub command: String,
    pub reason: String,

    /// Token requirements that must all hold; accepts a single name or a list
    #[serde(
        default,
        deserialize_with = "one_or_many",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub requires_tokens: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EfficiencyRule {
    pub pattern: String,
    pub hint: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextTriggers {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub daily_note_pattern: Option<String>,
}

fn one_or_many<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match Option::<OneOrMany>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(OneOrMany::One(name)) => vec![name],
        Some(OneOrMany::Many(names)) => names,
    })
}

impl WorkflowConfig {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read workflow config {}", path.display()))?;
        Self::from_json(&raw)
            .with_context(|| format!("Failed to parse workflow config {}", path.display()))
    }

    /// Load from `path`, falling back to [`WorkflowConfig::minimal`] on any error
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::from_file(path) {
            Ok(config) => config,
            Err(err) => {
                log::warn!("{err:#}; using minimal workflow config");
                Self::minimal()
            }
        }
    }

    /// Configuration shipped with the crate
    pub fn bundled() -> Self {
        match Self::from_json(BUNDLED_WORKFLOWS) {
            Ok(config) => config,
            Err(err) => {
                log::warn!("Bundled workflow config is invalid ({err}); using minimal config");
                Self::minimal()
            }
        }
    }

    /// Built-in default: empty `vault` and `edit` operations, no rules
    pub fn minimal() -> Self {
        let empty = |description: &str| OperationConfig {
            description: Some(description.to_string()),
            actions: BTreeMap::new(),
        };
        Self {
            version: "1.0.0".to_string(),
            description: Some("Default workflow configuration".to_string()),
            operations: BTreeMap::from([
                ("vault".to_string(), empty("File operations")),
                ("edit".to_string(), empty("Edit operations")),
            ]),
            efficiency_rules: Vec::new(),
            context_triggers: ContextTriggers::default(),
        }
    }

    pub fn action(&self, operation: &str, action: &str) -> Option<&ActionConfig> {
        self.operations.get(operation)?.actions.get(action)
    }

    /// Success or failure hint block of an action
    pub fn hints(&self, operation: &str, action: &str, failure: bool) -> Option<&HintBlock> {
        let action = self.action(operation, action)?;
        if failure {
            action.failure_hints.as_ref()
        } else {
            action.success_hints.as_ref()
        }
    }

    /// Every configured `(operation, action)` pair
    pub fn configured_actions(&self) -> impl Iterator<Item = (&str, &str)> {
        self.operations.iter().flat_map(|(op, cfg)| {
            cfg.actions
                .keys()
                .map(move |action| (op.as_str(), action.as_str()))
        })
    }
}
