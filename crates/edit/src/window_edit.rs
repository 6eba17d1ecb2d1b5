use crate::error::{EditError, Result};
use crate::fuzzy::{best_similarity, find_fuzzy_matches};
use serde::{Deserialize, Serialize};
use vault_store::VaultStore;

/// Similarity a fuzzy anchor must reach for an edit to proceed
pub const DEFAULT_FUZZY_THRESHOLD: f64 = 0.7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditMethod {
    Exact,
    Fuzzy,
}

/// What a successful window edit changed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowEditOutcome {
    pub path: String,
    pub method: EditMethod,
    pub similarity: f64,
    /// Line where the replaced span started (1-indexed)
    pub line_number: usize,
    /// Text that was replaced
    pub replaced: String,
}

/// Replace `old_text` in the note at `path` with `new_text`.
///
/// The first exact occurrence wins. Without one, the best fuzzy anchor at or above
/// `threshold` (default [`DEFAULT_FUZZY_THRESHOLD`]) is replaced; equal candidates resolve to
/// the lowest line. When nothing qualifies the note is left untouched and
/// [`EditError::NoMatch`] is returned; buffering the attempted text is up to the caller.
pub async fn perform_window_edit(
    store: &dyn VaultStore,
    path: &str,
    old_text: &str,
    new_text: &str,
    threshold: Option<f64>,
) -> Result<WindowEditOutcome> {
    if old_text.trim().is_empty() {
        return Err(EditError::EmptySearch);
    }
    let threshold = threshold.unwrap_or(DEFAULT_FUZZY_THRESHOLD);
    let content = store.get_file(path).await?.content;

    if let Some(start) = content.find(old_text) {
        let updated = content.replacen(old_text, new_text, 1);
        store.update_file(path, &updated).await?;
        return Ok(WindowEditOutcome {
            path: path.to_string(),
            method: EditMethod::Exact,
            similarity: 1.0,
            line_number: content[..start].matches('\n').count() + 1,
            replaced: old_text.to_string(),
        });
    }

    let Some(anchor) = find_fuzzy_matches(&content, old_text, threshold)
        .into_iter()
        .next()
    else {
        let best = best_similarity(&content, old_text);
        log::debug!("No fuzzy anchor in {path}: best {best:.2} < {threshold:.2}");
        return Err(EditError::NoMatch {
            path: path.to_string(),
            threshold,
            best,
        });
    };

    log::info!(
        "Fuzzy anchor in {path} at line {} (similarity {:.2})",
        anchor.line_number,
        anchor.similarity
    );
    let mut updated = String::with_capacity(content.len() + new_text.len());
    updated.push_str(&content[..anchor.start]);
    updated.push_str(new_text);
    updated.push_str(&content[anchor.end..]);
    store.update_file(path, &updated).await?;

    Ok(WindowEditOutcome {
        path: path.to_string(),
        method: EditMethod::Fuzzy,
        similarity: anchor.similarity,
        line_number: anchor.line_number,
        replaced: anchor.text,
    })
}
