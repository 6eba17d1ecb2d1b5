use crate::error::Result;
use crate::params::Params;
use crate::router::SemanticRouter;
use serde_json::{json, Value};
use vault_edit::find_fuzzy_matches;

/// Lines shown by `view window` when `windowSize` is absent
pub(crate) const DEFAULT_WINDOW_SIZE: usize = 20;

/// Looser than the edit threshold: a view only needs a place to look
pub(crate) const VIEW_FUZZY_THRESHOLD: f64 = 0.6;

pub(crate) async fn file(router: &mut SemanticRouter, params: Params<'_>) -> Result<Value> {
    let path = params.require_str("path")?;
    let note = router.store.get_file(path).await?;
    Ok(serde_json::to_value(note)?)
}

/// A window of lines centred on `lineNumber` (clamped to the last line), or on
/// the best fuzzy match of `searchText`, or on the first line
pub(crate) async fn window(router: &mut SemanticRouter, params: Params<'_>) -> Result<Value> {
    let path = params.require_str("path")?;
    let line_number = params.usize("lineNumber")?.filter(|n| *n > 0);
    let search_text = params.str("searchText");
    let window_size = params.usize("windowSize")?.unwrap_or(DEFAULT_WINDOW_SIZE);

    let note = router.store.get_file(path).await?;
    let lines: Vec<&str> = note.content.split('\n').collect();

    let center = match (line_number, search_text) {
        (Some(line), _) => line.min(lines.len()),
        (None, Some(text)) => find_fuzzy_matches(&note.content, text, VIEW_FUZZY_THRESHOLD)
            .first()
            .map_or(1, |m| m.line_number),
        (None, None) => 1,
    };
    let half = window_size / 2;
    let start = center.saturating_sub(half).max(1);
    let end = center.saturating_add(half).min(lines.len());
    let shown: &[&str] = lines.get(start - 1..end).unwrap_or_default();

    Ok(json!({
        "path": path,
        "lines": shown,
        "startLine": start,
        "endLine": end,
        "totalLines": lines.len(),
        "centerLine": center,
        "searchText": search_text,
    }))
}

pub(crate) async fn active(router: &mut SemanticRouter, _params: Params<'_>) -> Result<Value> {
    let note = router.store.get_active_file().await?;
    Ok(serde_json::to_value(note)?)
}

pub(crate) async fn open_in_obsidian(
    router: &mut SemanticRouter,
    params: Params<'_>,
) -> Result<Value> {
    let path = params.require_str("path")?;
    let ack = router.store.open_file(path).await?;
    Ok(serde_json::to_value(ack)?)
}
