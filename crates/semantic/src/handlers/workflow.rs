use crate::error::Result;
use crate::params::Params;
use crate::router::SemanticRouter;
use serde_json::{json, Value};
use vault_fragments::SuggestedAction;

/// Next steps derived from what the session has done so far
pub(crate) fn suggest(router: &SemanticRouter, _params: Params<'_>) -> Result<Value> {
    let context = &router.context;
    let mut suggestions = Vec::new();

    if let Some(file) = &context.last_file {
        suggestions.push(SuggestedAction::new(
            "Continue working with last file",
            format!("vault(action='read', path='{file}')"),
            format!("You were last working with {file}"),
        ));
    }
    if let Some(query) = context.search_history.last() {
        suggestions.push(SuggestedAction::new(
            "Refine last search",
            format!("vault(action='search', query='{query}')"),
            format!("Your last search was for '{query}'"),
        ));
    }
    if let Some(buffered) = router.buffer.retrieve() {
        let path = buffered
            .path
            .as_deref()
            .or(context.last_file.as_deref())
            .unwrap_or("<path>");
        suggestions.push(SuggestedAction::new(
            "Retry the buffered edit",
            format!("edit(action='from_buffer', path='{path}')"),
            "Content from a failed edit is still buffered",
        ));
    }
    if suggestions.is_empty() {
        suggestions.push(SuggestedAction::new(
            "Explore the vault",
            "vault(action='list')",
            "Nothing has been opened or searched yet",
        ));
    }

    Ok(json!({
        "current_context": router.snapshot(),
        "suggestions": suggestions,
    }))
}
