use crate::markdown::{extract_links, extract_tags};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::str::FromStr;

/// Most recent files kept in `file_history`
pub const FILE_HISTORY_LIMIT: usize = 10;

/// Symbolic session state derived from operation outcomes
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateTokens {
    pub file_loaded: Option<String>,
    pub file_has_links: Vec<String>,
    pub file_has_tags: Vec<String>,
    pub file_history: Vec<String>,
    pub buffer_available: bool,
    pub buffer_file: Option<String>,
    pub search_has_results: bool,
    pub search_query: Option<String>,
    pub directory_listed: Option<String>,
}

/// Named precondition a suggestion can require
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    CanFollowLinks,
    CanUseTags,
    CanEdit,
    CanUseBuffer,
    CanRefineSearch,
    CanBrowseDirectory,
    HasFileHistory,
}

impl FromStr for Requirement {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "can_follow_links" => Ok(Self::CanFollowLinks),
            "can_use_tags" => Ok(Self::CanUseTags),
            "can_edit" => Ok(Self::CanEdit),
            "can_use_buffer" => Ok(Self::CanUseBuffer),
            "can_refine_search" => Ok(Self::CanRefineSearch),
            "can_browse_directory" => Ok(Self::CanBrowseDirectory),
            "has_file_history" => Ok(Self::HasFileHistory),
            other => Err(format!("Unknown token requirement '{other}'")),
        }
    }
}

impl StateTokens {
    pub fn satisfies(&self, requirement: Requirement) -> bool {
        match requirement {
            Requirement::CanFollowLinks => !self.file_has_links.is_empty(),
            Requirement::CanUseTags => !self.file_has_tags.is_empty(),
            Requirement::CanEdit => self.file_loaded.is_some(),
            Requirement::CanUseBuffer => self.buffer_available,
            Requirement::CanRefineSearch => self.search_query.is_some(),
            Requirement::CanBrowseDirectory => self.directory_listed.is_some(),
            Requirement::HasFileHistory => !self.file_history.is_empty(),
        }
    }
}

/// Owns the session's [`StateTokens`]; `update_tokens` is the only mutation path
#[derive(Debug, Default)]
pub struct StateTokenManager {
    tokens: StateTokens,
}

impl StateTokenManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tokens(&self) -> &StateTokens {
        &self.tokens
    }

    /// Whether a named requirement holds; unknown names never do
    pub fn has_tokens_for(&self, requirement: &str) -> bool {
        requirement
            .parse::<Requirement>()
            .map(|req| self.tokens.satisfies(req))
            .unwrap_or(false)
    }

    /// All requirements hold (an empty list always does)
    pub fn has_all<S: AsRef<str>>(&self, requirements: &[S]) -> bool {
        requirements.iter().all(|r| self.has_tokens_for(r.as_ref()))
    }

    /// Record the outcome of one routed request
    pub fn update_tokens(
        &mut self,
        operation: &str,
        action: &str,
        params: &Map<String, Value>,
        result: Option<&Value>,
        success: bool,
    ) {
        let param = |key: &str| params.get(key).and_then(Value::as_str).map(str::to_string);

        if !success {
            if operation == "edit" {
                self.tokens.buffer_available = true;
                self.tokens.buffer_file = param("path");
            }
            return;
        }

        match (operation, action) {
            ("vault", "read") | ("view", "file") | ("view", "active") => {
                let Some(result) = result else { return };
                let path = param("path").or_else(|| {
                    result
                        .get("path")
                        .and_then(Value::as_str)
                        .map(str::to_string)
                });
                let Some(path) = path else { return };
                self.tokens.file_has_links = string_list(result, "links")
                    .unwrap_or_else(|| content_text(result).map(extract_links).unwrap_or_default());
                self.tokens.file_has_tags = string_list(result, "tags")
                    .filter(|tags| !tags.is_empty())
                    .unwrap_or_else(|| content_text(result).map(extract_tags).unwrap_or_default());
                push_bounded(&mut self.tokens.file_history, &path, FILE_HISTORY_LIMIT);
                self.tokens.file_loaded = Some(path);
            }
            ("vault", "list") => {
                self.tokens.directory_listed = Some(param("directory").unwrap_or_else(|| "/".into()));
            }
            ("vault", "search") => {
                let total = result
                    .and_then(|r| r.get("totalResults"))
                    .and_then(Value::as_u64)
                    .unwrap_or(0);
                self.tokens.search_has_results = total > 0;
                self.tokens.search_query = param("query");
            }
            ("vault", "fragments") => {
                let count = result
                    .and_then(|r| r.get("result"))
                    .and_then(Value::as_array)
                    .map_or(0, Vec::len);
                self.tokens.search_has_results = count > 0;
                if let Some(query) = param("query") {
                    self.tokens.search_query = Some(query);
                }
            }
            ("vault", "delete") => {
                if self.tokens.file_loaded.is_some() && self.tokens.file_loaded == param("path") {
                    self.tokens.file_loaded = None;
                    self.tokens.file_has_links.clear();
                    self.tokens.file_has_tags.clear();
                }
            }
            ("edit", "from_buffer") => {
                self.tokens.buffer_available = false;
                self.tokens.buffer_file = None;
            }
            _ => {}
        }
    }
}

/// Append `value` unless present, dropping the oldest entries beyond `limit`
pub(crate) fn push_bounded(list: &mut Vec<String>, value: &str, limit: usize) {
    if list.iter().any(|v| v == value) {
        return;
    }
    list.push(value.to_string());
    if list.len() > limit {
        let excess = list.len() - limit;
        list.drain(..excess);
    }
}

fn string_list(value: &Value, key: &str) -> Option<Vec<String>> {
    let items = value.get(key)?.as_array()?;
    Some(
        items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
    )
}

fn content_text(value: &Value) -> Option<&str> {
    value
        .as_str()
        .or_else(|| value.get("content").and_then(Value::as_str))
}
