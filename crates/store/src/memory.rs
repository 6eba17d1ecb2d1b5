use crate::error::{Result, VaultError};
use crate::store::VaultStore;
use crate::types::{
    CommandInfo, NoteFile, PatchOperation, PatchRequest, PatchTargetType, SearchHit, WriteAck,
};
use async_trait::async_trait;
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;
use tokio::sync::RwLock;

const EXCERPT_RADIUS: usize = 60;

/// Vault kept entirely in memory.
///
/// Directories are implied by file paths, so an empty directory cannot exist. Listing a
/// directory that holds no files fails with `NotFound`, mirroring the REST backend's 404.
pub struct MemoryVault {
    state: RwLock<VaultState>,
}

#[derive(Debug, Default)]
struct VaultState {
    files: BTreeMap<String, String>,
    active: Option<String>,
    commands: Vec<CommandInfo>,
}

impl MemoryVault {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(VaultState {
                commands: default_commands(),
                ..Default::default()
            }),
        }
    }

    /// Build a vault pre-populated with `(path, content)` pairs
    pub fn with_files<I, P, C>(files: I) -> Self
    where
        I: IntoIterator<Item = (P, C)>,
        P: Into<String>,
        C: Into<String>,
    {
        let files = files
            .into_iter()
            .map(|(p, c)| (p.into().trim_start_matches('/').to_string(), c.into()))
            .collect();
        Self {
            state: RwLock::new(VaultState {
                files,
                active: None,
                commands: default_commands(),
            }),
        }
    }

    /// Current raw content of a file, if present
    pub async fn content_of(&self, path: &str) -> Option<String> {
        let path = path.trim_start_matches('/');
        self.state.read().await.files.get(path).cloned()
    }

    pub async fn file_count(&self) -> usize {
        self.state.read().await.files.len()
    }
}

impl Default for MemoryVault {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VaultStore for MemoryVault {
    async fn list_files(&self, directory: Option<&str>) -> Result<Vec<String>> {
        let directory = normalize_dir(directory);
        let prefix = directory
            .as_deref()
            .map(|d| format!("{d}/"))
            .unwrap_or_default();

        let state = self.state.read().await;
        let mut entries: Vec<String> = Vec::new();
        let mut seen_any = false;
        for path in state.files.keys() {
            let Some(rest) = path.strip_prefix(&prefix) else {
                continue;
            };
            seen_any = true;
            let entry = match rest.split_once('/') {
                Some((dir, _)) => format!("{dir}/"),
                None => rest.to_string(),
            };
            if !entries.contains(&entry) {
                entries.push(entry);
            }
        }

        if let Some(dir) = directory {
            if !seen_any {
                return Err(VaultError::not_found(format!("Directory not found: {dir}")));
            }
        }
        Ok(entries)
    }

    async fn get_file(&self, path: &str) -> Result<NoteFile> {
        let path = normalize_path(path)?;
        let state = self.state.read().await;
        let content = state
            .files
            .get(&path)
            .ok_or_else(|| VaultError::not_found(format!("File not found: {path}")))?;
        Ok(note_from(path.clone(), content))
    }

    async fn create_file(&self, path: &str, content: &str) -> Result<WriteAck> {
        let path = normalize_path(path)?;
        log::debug!("memory vault: create {path} ({} bytes)", content.len());
        self.state
            .write()
            .await
            .files
            .insert(path.clone(), content.to_string());
        Ok(WriteAck::ok(path))
    }

    async fn update_file(&self, path: &str, content: &str) -> Result<WriteAck> {
        let path = normalize_path(path)?;
        let mut state = self.state.write().await;
        let slot = state
            .files
            .get_mut(&path)
            .ok_or_else(|| VaultError::not_found(format!("File not found: {path}")))?;
        *slot = content.to_string();
        log::debug!("memory vault: update {path} ({} bytes)", content.len());
        Ok(WriteAck::ok(path))
    }

    async fn delete_file(&self, path: &str) -> Result<WriteAck> {
        let path = normalize_path(path)?;
        let mut state = self.state.write().await;
        if state.files.remove(&path).is_none() {
            return Err(VaultError::not_found(format!("File not found: {path}")));
        }
        if state.active.as_deref() == Some(path.as_str()) {
            state.active = None;
        }
        Ok(WriteAck::ok(path))
    }

    async fn append_to_file(&self, path: &str, content: &str) -> Result<WriteAck> {
        let path = normalize_path(path)?;
        let mut state = self.state.write().await;
        let slot = state
            .files
            .get_mut(&path)
            .ok_or_else(|| VaultError::not_found(format!("File not found: {path}")))?;
        slot.push_str(content);
        Ok(WriteAck::ok(path))
    }

    async fn patch_file(&self, path: &str, patch: &PatchRequest) -> Result<WriteAck> {
        let path = normalize_path(path)?;
        let mut state = self.state.write().await;
        let slot = state
            .files
            .get_mut(&path)
            .ok_or_else(|| VaultError::not_found(format!("File not found: {path}")))?;
        *slot = apply_patch(slot, patch)?;
        Ok(WriteAck::ok(path))
    }

    async fn search_simple(&self, query: &str) -> Result<Vec<SearchHit>> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Err(VaultError::invalid_input("Search query must not be empty"));
        }

        let state = self.state.read().await;
        let mut hits: Vec<SearchHit> = state
            .files
            .iter()
            .filter_map(|(path, content)| {
                let lower = content.to_lowercase();
                let in_body = lower.matches(&needle).count();
                let in_path = usize::from(path.to_lowercase().contains(&needle));
                if in_body + in_path == 0 {
                    return None;
                }
                let context = lower
                    .find(&needle)
                    .map(|pos| excerpt(content, lower[..pos].chars().count(), needle.chars().count()));
                Some(SearchHit {
                    path: path.clone(),
                    score: (in_body + in_path) as f32,
                    context,
                })
            })
            .collect();

        hits.sort_by(|a, b| b.score.total_cmp(&a.score).then_with(|| a.path.cmp(&b.path)));
        Ok(hits)
    }

    async fn get_active_file(&self) -> Result<NoteFile> {
        let state = self.state.read().await;
        let path = state
            .active
            .clone()
            .ok_or_else(|| VaultError::not_found("No active file"))?;
        let content = state
            .files
            .get(&path)
            .ok_or_else(|| VaultError::not_found(format!("File not found: {path}")))?;
        Ok(note_from(path.clone(), content))
    }

    async fn open_file(&self, path: &str) -> Result<WriteAck> {
        let path = normalize_path(path)?;
        let mut state = self.state.write().await;
        if !state.files.contains_key(&path) {
            return Err(VaultError::not_found(format!("File not found: {path}")));
        }
        state.active = Some(path.clone());
        Ok(WriteAck::ok(path))
    }

    async fn get_server_info(&self) -> Result<Value> {
        let files = self.state.read().await.files.len();
        Ok(json!({
            "status": "OK",
            "service": "memory-vault",
            "authenticated": true,
            "files": files,
        }))
    }

    async fn get_commands(&self) -> Result<Vec<CommandInfo>> {
        Ok(self.state.read().await.commands.clone())
    }
}

fn default_commands() -> Vec<CommandInfo> {
    vec![
        CommandInfo {
            id: "daily-notes".into(),
            name: "Open today's daily note".into(),
        },
        CommandInfo {
            id: "graph:open".into(),
            name: "Open graph view".into(),
        },
    ]
}

fn normalize_path(path: &str) -> Result<String> {
    let trimmed = path.trim().trim_start_matches('/');
    if trimmed.is_empty() || trimmed.ends_with('/') {
        return Err(VaultError::invalid_input(format!(
            "Expected a file path, got '{path}'"
        )));
    }
    Ok(trimmed.to_string())
}

fn normalize_dir(directory: Option<&str>) -> Option<String> {
    let dir = directory?.trim().trim_matches('/');
    if dir.is_empty() {
        None
    } else {
        Some(dir.to_string())
    }
}

fn note_from(path: String, content: &str) -> NoteFile {
    NoteFile {
        tags: extract_tags(content),
        frontmatter: parse_frontmatter(content),
        content: content.to_string(),
        path,
    }
}

fn extract_tags(content: &str) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for token in content.split_whitespace() {
        let Some(rest) = token.strip_prefix('#') else {
            continue;
        };
        if !rest
            .chars()
            .next()
            .is_some_and(|c| c.is_alphanumeric() || c == '_')
        {
            continue;
        }
        let tag = token.trim_end_matches(|c: char| matches!(c, '.' | ',' | ';' | ':' | '!' | '?' | ')'));
        if !tags.iter().any(|t| t == tag) {
            tags.push(tag.to_string());
        }
    }
    tags
}

fn frontmatter_bounds(lines: &[&str]) -> Option<usize> {
    if lines.first().map(|l| l.trim_end()) != Some("---") {
        return None;
    }
    lines
        .iter()
        .enumerate()
        .skip(1)
        .find(|(_, l)| l.trim_end() == "---")
        .map(|(idx, _)| idx)
}

fn parse_frontmatter(content: &str) -> Map<String, Value> {
    let lines: Vec<&str> = content.split('\n').collect();
    let mut map = Map::new();
    let Some(end) = frontmatter_bounds(&lines) else {
        return map;
    };
    for line in &lines[1..end] {
        if let Some((key, value)) = line.split_once(':') {
            let key = key.trim();
            if !key.is_empty() {
                map.insert(key.to_string(), Value::String(value.trim().to_string()));
            }
        }
    }
    map
}

fn excerpt(content: &str, char_pos: usize, needle_chars: usize) -> String {
    let start = char_pos.saturating_sub(EXCERPT_RADIUS);
    let take = needle_chars + 2 * EXCERPT_RADIUS;
    let total = content.chars().count();
    let mut out: String = content.chars().skip(start).take(take).collect();
    out = out.trim().to_string();
    if start > 0 {
        out.insert_str(0, "...");
    }
    if start + take < total {
        out.push_str("...");
    }
    out
}

fn heading_level(line: &str) -> Option<(usize, &str)> {
    let trimmed = line.trim_start();
    let level = trimmed.chars().take_while(|c| *c == '#').count();
    if level == 0 || level > 6 {
        return None;
    }
    let rest = &trimmed[level..];
    if !rest.starts_with(' ') {
        return None;
    }
    Some((level, rest.trim()))
}

/// Apply a targeted patch to note text. Missing heading targets are created.
fn apply_patch(content: &str, patch: &PatchRequest) -> Result<String> {
    let mut lines: Vec<String> = content.split('\n').map(str::to_string).collect();
    let body: Vec<String> = patch.content.split('\n').map(str::to_string).collect();

    match patch.target_type {
        PatchTargetType::Heading => {
            let wanted = patch.target.rsplit("::").next().unwrap_or("").trim();
            let found = lines.iter().enumerate().find_map(|(idx, line)| {
                heading_level(line)
                    .filter(|(_, text)| text.eq_ignore_ascii_case(wanted))
                    .map(|(level, _)| (idx, level))
            });
            let Some((start, level)) = found else {
                if !content.is_empty() && !content.ends_with('\n') {
                    lines.push(String::new());
                }
                lines.push(format!("## {wanted}"));
                lines.extend(body);
                return Ok(lines.join("\n"));
            };
            let end = lines
                .iter()
                .enumerate()
                .skip(start + 1)
                .find(|(_, line)| heading_level(line).is_some_and(|(l, _)| l <= level))
                .map_or(lines.len(), |(idx, _)| idx);
            match patch.operation {
                PatchOperation::Prepend => {
                    lines.splice(start + 1..start + 1, body);
                }
                PatchOperation::Append => {
                    let mut at = end;
                    while at > start + 1 && lines[at - 1].trim().is_empty() {
                        at -= 1;
                    }
                    lines.splice(at..at, body);
                }
                PatchOperation::Replace => {
                    let mut replacement = body;
                    if end < lines.len() {
                        replacement.push(String::new());
                    }
                    lines.splice(start + 1..end, replacement);
                }
            }
        }
        PatchTargetType::Block => {
            let id = patch.target.trim().trim_start_matches('^');
            let marker = format!("^{id}");
            let idx = lines
                .iter()
                .position(|line| line.trim_end().ends_with(&marker))
                .ok_or_else(|| VaultError::not_found(format!("Block not found: {marker}")))?;
            match patch.operation {
                PatchOperation::Append => {
                    lines.splice(idx + 1..idx + 1, body);
                }
                PatchOperation::Prepend => {
                    lines.splice(idx..idx, body);
                }
                PatchOperation::Replace => {
                    lines[idx] = format!("{} {marker}", patch.content.trim_end());
                }
            }
        }
        PatchTargetType::Frontmatter => {
            let key = patch.target.trim();
            let value = patch.content.trim();
            let refs: Vec<&str> = lines.iter().map(String::as_str).collect();
            match frontmatter_bounds(&refs) {
                None => {
                    let header = vec!["---".to_string(), format!("{key}: {value}"), "---".to_string()];
                    lines.splice(0..0, header);
                }
                Some(end) => {
                    let existing = (1..end).find(|&i| {
                        lines[i]
                            .split_once(':')
                            .is_some_and(|(k, _)| k.trim() == key)
                    });
                    match existing {
                        Some(i) => {
                            let old = lines[i]
                                .split_once(':')
                                .map(|(_, v)| v.trim().to_string())
                                .unwrap_or_default();
                            let merged = match patch.operation {
                                PatchOperation::Replace => value.to_string(),
                                PatchOperation::Append => format!("{old} {value}").trim().to_string(),
                                PatchOperation::Prepend => format!("{value} {old}").trim().to_string(),
                            };
                            lines[i] = format!("{key}: {merged}");
                        }
                        None => lines.insert(end, format!("{key}: {value}")),
                    }
                }
            }
        }
    }

    Ok(lines.join("\n"))
}
