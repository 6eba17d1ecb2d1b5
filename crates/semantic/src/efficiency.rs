use crate::config::EfficiencyRule;
use crate::context::PreviousRequest;
use crate::params::Params;
use vault_fragments::EfficiencyHints;

/// Recognised rule patterns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RulePattern {
    /// Edit of the file the previous edit touched
    MultipleEditsSameFile,
    /// Same query searched twice in a row
    RepeatedSearch,
    /// Whole file requested instead of fragments
    FullFileRead,
}

impl RulePattern {
    fn parse(name: &str) -> Option<Self> {
        match name {
            "multiple_edits_same_file" => Some(Self::MultipleEditsSameFile),
            "repeated_search" => Some(Self::RepeatedSearch),
            "full_file_read" => Some(Self::FullFileRead),
            _ => None,
        }
    }

    fn matches(self, request: &RuleInput<'_>) -> bool {
        let previous = request.previous;
        match self {
            Self::MultipleEditsSameFile => {
                request.operation == "edit"
                    && previous.operation.as_deref() == Some("edit")
                    && request.params.str("path").is_some()
                    && request.params.str("path") == previous.last_file.as_deref()
            }
            Self::RepeatedSearch => {
                matches!(
                    (request.operation, request.action),
                    ("vault", "search") | ("vault", "fragments")
                ) && request.params.str("query").is_some()
                    && request.params.str("query") == previous.last_search.as_deref()
            }
            Self::FullFileRead => {
                (request.operation, request.action) == ("vault", "read")
                    && request.params.flag("returnFullFile")
            }
        }
    }
}

/// The request being evaluated
pub struct RuleInput<'a> {
    pub operation: &'a str,
    pub action: &'a str,
    pub params: Params<'a>,
    pub previous: &'a PreviousRequest,
}

/// Static efficiency rules resolved once from configuration
#[derive(Debug, Clone, Default)]
pub struct EfficiencyRules {
    rules: Vec<(RulePattern, String)>,
}

impl EfficiencyRules {
    pub fn from_config(rules: &[EfficiencyRule]) -> Self {
        let rules = rules
            .iter()
            .filter_map(|rule| match RulePattern::parse(&rule.pattern) {
                Some(pattern) => Some((pattern, rule.hint.clone())),
                None => {
                    log::warn!("Ignoring efficiency rule with unknown pattern '{}'", rule.pattern);
                    None
                }
            })
            .collect();
        Self { rules }
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// First matching hint is the message, later ones become alternatives
    pub fn evaluate(&self, request: &RuleInput<'_>) -> Option<EfficiencyHints> {
        let mut hits = self
            .rules
            .iter()
            .filter(|(pattern, _)| pattern.matches(request))
            .map(|(_, hint)| hint.clone());
        let message = hits.next()?;
        Some(EfficiencyHints {
            message,
            alternatives: hits.collect(),
        })
    }
}
