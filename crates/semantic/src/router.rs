use crate::conditions::{Condition, ConditionInput};
use crate::config::{HintBlock, WorkflowConfig};
use crate::context::{ContextSnapshot, PreviousRequest, SessionContext};
use crate::efficiency::{EfficiencyRules, RuleInput};
use crate::error::{Result, RouterError};
use crate::handlers;
use crate::interpolate::interpolate;
use crate::params::{file_stem, parent_directory, Params};
use crate::response::{ErrorInfo, SemanticRequest, SemanticResponse};
use crate::route::Route;
use crate::tokens::{StateTokenManager, StateTokens};
use regex::{Regex, RegexBuilder};
use serde_json::{Map, Value};
use std::sync::Arc;
use vault_edit::ContentBuffer;
use vault_fragments::{FragmentRetriever, SuggestedAction, WorkflowHint};
use vault_store::VaultStore;

/// Routes semantic requests to the vault and enriches every outcome with
/// context, workflow hints and efficiency hints.
///
/// One router serves one session. `route` takes `&mut self`, so requests are
/// processed strictly one after another; session state (context, tokens,
/// content buffer, fragment index) lives as long as the router.
pub struct SemanticRouter {
    pub(crate) store: Arc<dyn VaultStore>,
    config: WorkflowConfig,
    rules: EfficiencyRules,
    daily_note: Option<Regex>,
    pub(crate) context: SessionContext,
    tokens: StateTokenManager,
    pub(crate) retriever: FragmentRetriever,
    pub(crate) buffer: ContentBuffer,
    pub(crate) vault_indexed: bool,
}

/// Enrichment computed from a hint block
struct Enrichment {
    message: Option<String>,
    suggestions: Vec<SuggestedAction>,
}

impl SemanticRouter {
    pub fn new(store: Arc<dyn VaultStore>, config: WorkflowConfig) -> Self {
        for (operation, action) in config.configured_actions() {
            if Route::resolve(operation, action).is_err() {
                log::warn!("Workflow config has hints for unknown route {operation}.{action}");
            }
        }
        let daily_note = config
            .context_triggers
            .daily_note_pattern
            .as_deref()
            .and_then(|pattern| {
                RegexBuilder::new(pattern)
                    .case_insensitive(true)
                    .build()
                    .map_err(|err| log::warn!("Invalid daily note pattern '{pattern}': {err}"))
                    .ok()
            });
        let rules = EfficiencyRules::from_config(&config.efficiency_rules);

        Self {
            store,
            config,
            rules,
            daily_note,
            context: SessionContext::default(),
            tokens: StateTokenManager::new(),
            retriever: FragmentRetriever::new(),
            buffer: ContentBuffer::new(),
            vault_indexed: false,
        }
    }

    /// Router using the workflow configuration bundled with the crate
    pub fn with_bundled_config(store: Arc<dyn VaultStore>) -> Self {
        Self::new(store, WorkflowConfig::bundled())
    }

    pub fn config(&self) -> &WorkflowConfig {
        &self.config
    }

    pub fn tokens(&self) -> &StateTokens {
        self.tokens.tokens()
    }

    pub fn token_manager(&self) -> &StateTokenManager {
        &self.tokens
    }

    pub fn session(&self) -> &SessionContext {
        &self.context
    }

    pub fn buffer(&self) -> &ContentBuffer {
        &self.buffer
    }

    pub fn retriever(&self) -> &FragmentRetriever {
        &self.retriever
    }

    pub fn snapshot(&self) -> ContextSnapshot {
        self.context.snapshot(self.tokens.tokens())
    }

    /// Handle one request. Never fails: errors come back as an `error` block.
    pub async fn route(&mut self, request: SemanticRequest) -> SemanticResponse {
        let SemanticRequest {
            operation,
            action,
            params,
        } = request;

        let previous = self.context.previous();
        self.context
            .record_attempt(&operation, &action, &Params::new(&params));

        let resolved = Route::resolve(&operation, &action);
        let route = resolved.as_ref().ok().copied();
        let outcome = match resolved {
            Ok(route) => self
                .dispatch(route, Params::new(&params))
                .await
                .map(|result| (route, result)),
            Err(err) => Err(err),
        };

        match outcome {
            Ok((route, result)) => {
                self.tokens
                    .update_tokens(&operation, &action, &params, Some(&result), true);
                self.context.record_success(route, self.tokens.tokens());
                self.context.sync_buffer(&self.buffer);
                log::debug!("{operation}.{action} succeeded");
                self.success_response(&operation, &action, &params, result, &previous)
            }
            Err(err) => {
                if let Some(route) = route.filter(|r| r.is_edit()) {
                    self.buffer_failed_edit(route, Params::new(&params));
                }
                self.tokens
                    .update_tokens(&operation, &action, &params, None, false);
                self.context.sync_buffer(&self.buffer);
                log::debug!("{operation}.{action} failed ({}): {err}", err.code());
                self.failure_response(&operation, &action, &params, &err)
            }
        }
    }

    async fn dispatch(&mut self, route: Route, params: Params<'_>) -> Result<Value> {
        match route {
            Route::VaultList => handlers::vault::list(self, params).await,
            Route::VaultRead => handlers::vault::read(self, params).await,
            Route::VaultFragments => handlers::vault::fragments(self, params).await,
            Route::VaultCreate => handlers::vault::create(self, params).await,
            Route::VaultUpdate => handlers::vault::update(self, params).await,
            Route::VaultDelete => handlers::vault::delete(self, params).await,
            Route::VaultSearch => handlers::vault::search(self, params).await,
            Route::EditWindow => handlers::edit::window(self, params).await,
            Route::EditAppend => handlers::edit::append(self, params).await,
            Route::EditPatch => handlers::edit::patch(self, params).await,
            Route::EditAtLine => handlers::edit::at_line(self, params).await,
            Route::EditFromBuffer => handlers::edit::from_buffer(self, params).await,
            Route::ViewFile => handlers::view::file(self, params).await,
            Route::ViewWindow => handlers::view::window(self, params).await,
            Route::ViewActive => handlers::view::active(self, params).await,
            Route::ViewOpenInObsidian => handlers::view::open_in_obsidian(self, params).await,
            Route::WorkflowSuggest => handlers::workflow::suggest(self, params),
            Route::SystemInfo => handlers::system::info(self, params).await,
            Route::SystemCommands => handlers::system::commands(self, params).await,
        }
    }

    /// Keep the text of a failed edit so it can be replayed
    fn buffer_failed_edit(&mut self, route: Route, params: Params<'_>) {
        let path = params.str("path").map(str::to_string);
        let (content, search_text) = match route {
            Route::EditWindow => (
                params.text("newText"),
                params.text("oldText").map(str::to_string),
            ),
            Route::EditAppend | Route::EditPatch | Route::EditAtLine => {
                (params.text("content"), None)
            }
            _ => (None, None),
        };
        if let Some(content) = content {
            log::info!("Buffering {} bytes from failed edit", content.len());
            self.buffer.store(content, search_text, path);
        }
    }

    fn success_response(
        &self,
        operation: &str,
        action: &str,
        params: &Map<String, Value>,
        result: Value,
        previous: &PreviousRequest,
    ) -> SemanticResponse {
        let workflow = self
            .config
            .hints(operation, action, false)
            .map(|block| self.enrich(block, params, Some(&result)))
            .map(|enrichment| WorkflowHint {
                message: enrichment.message.unwrap_or_default(),
                suggested_next: enrichment.suggestions,
            });
        let efficiency_hints = self.rules.evaluate(&RuleInput {
            operation,
            action,
            params: Params::new(params),
            previous,
        });

        SemanticResponse {
            result,
            context: self.snapshot(),
            workflow,
            efficiency_hints,
            error: None,
        }
    }

    fn failure_response(
        &self,
        operation: &str,
        action: &str,
        params: &Map<String, Value>,
        err: &RouterError,
    ) -> SemanticResponse {
        let recovery_hints = self
            .config
            .hints(operation, action, true)
            .map(|block| self.enrich(block, params, None).suggestions)
            .unwrap_or_default();

        SemanticResponse {
            result: Value::Null,
            context: self.snapshot(),
            workflow: None,
            efficiency_hints: None,
            error: Some(ErrorInfo::from_error(err, recovery_hints)),
        }
    }

    fn enrich(
        &self,
        block: &HintBlock,
        params: &Map<String, Value>,
        result: Option<&Value>,
    ) -> Enrichment {
        let view = template_params(params);
        let input = ConditionInput {
            params: &view,
            result,
            daily_note: self.daily_note.as_ref(),
            buffer_available: self.buffer.is_available(),
        };

        let suggestions = block
            .suggested_next
            .iter()
            .filter(|group| Condition::evaluate_named(&group.condition, &input))
            .flat_map(|group| group.suggestions.iter())
            .filter(|s| self.tokens.has_all(&s.requires_tokens))
            .map(|s| {
                SuggestedAction::new(
                    interpolate(&s.description, &view, result),
                    interpolate(&s.command, &view, result),
                    interpolate(&s.reason, &view, result),
                )
            })
            .collect();

        let message = (!block.message.is_empty())
            .then(|| interpolate(&block.message, &view, result));
        Enrichment {
            message,
            suggestions,
        }
    }
}

/// Request params plus the derived `parent_directory` and `file_stem` keys
fn template_params(params: &Map<String, Value>) -> Map<String, Value> {
    let mut view = params.clone();
    let source = Params::new(params);
    let anchor = source.str("path").or_else(|| source.str("directory"));
    if let Some(anchor) = anchor {
        view.entry("parent_directory")
            .or_insert_with(|| Value::String(parent_directory(anchor)));
    }
    if let Some(path) = source.str("path") {
        view.entry("file_stem")
            .or_insert_with(|| Value::String(file_stem(path)));
    }
    view
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn template_params_derive_path_parts() {
        let params = json!({"path": "path/to/note.md"}).as_object().cloned().unwrap();
        let view = template_params(&params);
        assert_eq!(view["parent_directory"], "path/to");
        assert_eq!(view["file_stem"], "note");

        let params = json!({"directory": "path/to/missing"}).as_object().cloned().unwrap();
        let view = template_params(&params);
        assert_eq!(view["parent_directory"], "path/to");
        assert!(view.get("file_stem").is_none());
    }
}
