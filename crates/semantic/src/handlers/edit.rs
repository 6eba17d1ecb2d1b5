use super::refresh_indexed;
use crate::error::{Result, RouterError};
use crate::params::Params;
use crate::router::SemanticRouter;
use serde_json::{json, Value};
use std::str::FromStr;
use vault_edit::{perform_window_edit, WindowEditOutcome};
use vault_store::{PatchOperation, PatchRequest, PatchTargetType};

/// Where `at_line` puts its content relative to the target line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineMode {
    Before,
    After,
    Replace,
}

impl LineMode {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Before => "before",
            Self::After => "after",
            Self::Replace => "replace",
        }
    }
}

impl FromStr for LineMode {
    type Err = RouterError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "before" => Ok(Self::Before),
            "after" => Ok(Self::After),
            "replace" => Ok(Self::Replace),
            other => Err(RouterError::validation(format!(
                "Unknown line mode '{other}' (expected before, after or replace)"
            ))),
        }
    }
}

fn outcome_json(outcome: &WindowEditOutcome) -> Value {
    json!({
        "success": true,
        "path": outcome.path,
        "method": outcome.method,
        "similarity": outcome.similarity,
        "lineNumber": outcome.line_number,
        "replaced": outcome.replaced,
    })
}

/// Replace `oldText` with `newText`, exactly or through a fuzzy anchor.
/// On failure the router buffers `newText` for `from_buffer`.
pub(crate) async fn window(router: &mut SemanticRouter, params: Params<'_>) -> Result<Value> {
    let path = params.require_str("path")?;
    let old_text = params.require_text("oldText")?;
    let new_text = params.require_text("newText")?;
    let threshold = params.f64("fuzzyThreshold")?;

    let outcome =
        perform_window_edit(router.store.as_ref(), path, old_text, new_text, threshold).await?;
    refresh_indexed(router, path).await;
    Ok(outcome_json(&outcome))
}

pub(crate) async fn append(router: &mut SemanticRouter, params: Params<'_>) -> Result<Value> {
    let path = params.require_str("path")?;
    let content = params.require_text("content")?;
    let ack = router.store.append_to_file(path, content).await?;
    refresh_indexed(router, path).await;
    Ok(serde_json::to_value(ack)?)
}

pub(crate) async fn patch(router: &mut SemanticRouter, params: Params<'_>) -> Result<Value> {
    let path = params.require_str("path")?;
    let request = PatchRequest {
        operation: params.require_str("operation")?.parse::<PatchOperation>()?,
        target_type: params.require_str("targetType")?.parse::<PatchTargetType>()?,
        target: params.require_str("target")?.to_string(),
        content: params.require_text("content")?.to_string(),
    };
    let ack = router.store.patch_file(path, &request).await?;
    refresh_indexed(router, path).await;
    Ok(serde_json::to_value(ack)?)
}

/// Insert or replace at a 1-based line; `lineNumber` may be one past the end
pub(crate) async fn at_line(router: &mut SemanticRouter, params: Params<'_>) -> Result<Value> {
    let path = params.require_str("path")?;
    let line_number = params
        .usize("lineNumber")?
        .ok_or_else(|| RouterError::validation("Missing required parameter 'lineNumber'"))?;
    let mode = params
        .str("mode")
        .map_or(Ok(LineMode::Replace), str::parse)?;

    let content = match params.text("content").filter(|c| !c.is_empty()) {
        Some(content) => content.to_string(),
        None => router
            .buffer
            .retrieve()
            .map(|b| b.content.clone())
            .ok_or_else(|| {
                RouterError::validation("No content provided and no buffered content found")
            })?,
    };
    let content = content.as_str();

    let note = router.store.get_file(path).await?;
    let mut lines: Vec<&str> = note.content.split('\n').collect();
    if line_number < 1 || line_number > lines.len() + 1 {
        return Err(RouterError::validation(format!(
            "Invalid line number {line_number}. File has {} lines.",
            lines.len()
        )));
    }

    let index = line_number - 1;
    match mode {
        LineMode::Before => lines.insert(index, content),
        LineMode::After => lines.insert((index + 1).min(lines.len()), content),
        LineMode::Replace if index == lines.len() => lines.push(content),
        LineMode::Replace => lines[index] = content,
    }
    let updated = lines.join("\n");
    router.store.update_file(path, &updated).await?;
    refresh_indexed(router, path).await;

    Ok(json!({
        "success": true,
        "path": path,
        "line": line_number,
        "mode": mode.as_str(),
    }))
}

/// Replay the buffered content of a failed edit
pub(crate) async fn from_buffer(router: &mut SemanticRouter, params: Params<'_>) -> Result<Value> {
    let buffered = router
        .buffer
        .retrieve()
        .cloned()
        .ok_or_else(|| RouterError::not_found("No buffered content available"))?;

    let path = params
        .str("path")
        .map(str::to_string)
        .or(buffered.path)
        .ok_or_else(|| RouterError::validation("Missing required parameter 'path'"))?;
    let old_text = params
        .text("oldText")
        .map(str::to_string)
        .or(buffered.search_text)
        .unwrap_or_default();
    let threshold = params.f64("fuzzyThreshold")?;

    let outcome = perform_window_edit(
        router.store.as_ref(),
        &path,
        &old_text,
        &buffered.content,
        threshold,
    )
    .await?;
    router.buffer.clear();
    refresh_indexed(router, &path).await;
    Ok(outcome_json(&outcome))
}
