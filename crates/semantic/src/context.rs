use crate::params::Params;
use crate::route::Route;
use crate::tokens::{push_bounded, StateTokens, FILE_HISTORY_LIMIT};
use serde::{Deserialize, Serialize};
use vault_edit::ContentBuffer;

/// Most recent queries kept in `search_history`
pub const SEARCH_HISTORY_LIMIT: usize = 5;

/// Rolling memory of what the session attempted and what happened
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionContext {
    pub operation: Option<String>,
    pub action: Option<String>,
    pub last_file: Option<String>,
    pub last_directory: Option<String>,
    pub file_history: Vec<String>,
    pub search_history: Vec<String>,
    pub buffer_content: Option<String>,
}

/// What the previous request left behind, captured before the current one is recorded
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreviousRequest {
    pub operation: Option<String>,
    pub last_file: Option<String>,
    pub last_search: Option<String>,
}

/// Context attached to every response
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextSnapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_file: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_directory: Option<String>,
    pub buffer_available: bool,
    pub file_history: Vec<String>,
    pub search_history: Vec<String>,
    pub has_links: bool,
    pub has_tags: bool,
    pub search_results_available: bool,
    pub linked_files: Vec<String>,
    pub tags: Vec<String>,
}

impl SessionContext {
    pub fn previous(&self) -> PreviousRequest {
        PreviousRequest {
            operation: self.operation.clone(),
            last_file: self.last_file.clone(),
            last_search: self.search_history.last().cloned(),
        }
    }

    /// Record the attempt before dispatch. Never rolled back on failure.
    pub fn record_attempt(&mut self, operation: &str, action: &str, params: &Params<'_>) {
        self.operation = Some(operation.to_string());
        self.action = Some(action.to_string());

        if let Some(path) = params.str("path") {
            self.last_file = Some(path.to_string());
            push_bounded(&mut self.file_history, path, FILE_HISTORY_LIMIT);
        }
        if let Some(directory) = params.str("directory") {
            self.last_directory = Some(directory.to_string());
        }
        if let Some(query) = params.str("query") {
            self.search_history.push(query.to_string());
            if self.search_history.len() > SEARCH_HISTORY_LIMIT {
                self.search_history.remove(0);
            }
        }
    }

    /// Adopt the tokens the succeeding route just set; tokens left over from
    /// earlier requests never overwrite what this request recorded.
    pub fn record_success(&mut self, route: Route, tokens: &StateTokens) {
        match route {
            Route::VaultRead | Route::ViewFile | Route::ViewActive => {
                if let Some(file) = &tokens.file_loaded {
                    self.last_file = Some(file.clone());
                    push_bounded(&mut self.file_history, file, FILE_HISTORY_LIMIT);
                }
            }
            Route::VaultList => {
                if let Some(directory) = &tokens.directory_listed {
                    self.last_directory = Some(directory.clone());
                }
            }
            Route::VaultSearch | Route::VaultFragments => {
                if let Some(query) = &tokens.search_query {
                    push_bounded(&mut self.search_history, query, SEARCH_HISTORY_LIMIT);
                }
            }
            _ => {}
        }
    }

    pub fn sync_buffer(&mut self, buffer: &ContentBuffer) {
        self.buffer_content = buffer.retrieve().map(|b| b.content.clone());
    }

    pub fn snapshot(&self, tokens: &StateTokens) -> ContextSnapshot {
        ContextSnapshot {
            current_file: self.last_file.clone(),
            current_directory: self.last_directory.clone(),
            buffer_available: self.buffer_content.is_some(),
            file_history: self.file_history.clone(),
            search_history: self.search_history.clone(),
            has_links: !tokens.file_has_links.is_empty(),
            has_tags: !tokens.file_has_tags.is_empty(),
            search_results_available: tokens.search_has_results,
            linked_files: tokens.file_has_links.clone(),
            tags: tokens.file_has_tags.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::{json, Map, Value};

    fn map(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn attempt_records_path_directory_and_query() {
        let mut context = SessionContext::default();
        let params = map(json!({"path": "a.md", "directory": "notes", "query": "tax"}));
        context.record_attempt("vault", "read", &Params::new(&params));
        assert_eq!(context.last_file.as_deref(), Some("a.md"));
        assert_eq!(context.last_directory.as_deref(), Some("notes"));
        assert_eq!(context.search_history, vec!["tax"]);
        assert_eq!(context.previous().last_search.as_deref(), Some("tax"));
    }

    #[test]
    fn search_history_is_bounded() {
        let mut context = SessionContext::default();
        for i in 0..7 {
            let params = map(json!({"query": format!("q{i}")}));
            context.record_attempt("vault", "search", &Params::new(&params));
        }
        assert_eq!(context.search_history, vec!["q2", "q3", "q4", "q5", "q6"]);
    }

    #[test]
    fn success_adopts_loaded_file() {
        let mut context = SessionContext::default();
        let tokens = StateTokens {
            file_loaded: Some("b.md".into()),
            file_has_links: vec!["c.md".into()],
            ..Default::default()
        };
        context.record_success(Route::VaultRead, &tokens);
        let snapshot = context.snapshot(&tokens);
        assert_eq!(snapshot.current_file.as_deref(), Some("b.md"));
        assert!(snapshot.has_links);
        assert_eq!(snapshot.file_history, vec!["b.md"]);
        assert!(!snapshot.buffer_available);
    }

    #[test]
    fn edit_keeps_its_own_path_over_an_earlier_read() {
        let mut context = SessionContext::default();
        let tokens = StateTokens {
            file_loaded: Some("a.md".into()),
            ..Default::default()
        };
        let params = map(json!({"path": "b.md", "content": "x"}));
        context.record_attempt("edit", "append", &Params::new(&params));
        context.record_success(Route::EditAppend, &tokens);
        assert_eq!(context.last_file.as_deref(), Some("b.md"));
        assert_eq!(context.previous().last_file.as_deref(), Some("b.md"));
    }
}
