use super::{doc_id, refresh_indexed};
use crate::error::{Result, RouterError};
use crate::markdown::{extract_links, extract_tags};
use crate::params::{file_stem, Params};
use crate::router::SemanticRouter;
use serde_json::{json, Value};
use vault_edit::PathMatcher;
use vault_fragments::{RetrievalOptions, StrategyChoice, StrategySelector, DEFAULT_MAX_FRAGMENTS};
use vault_store::{SearchHit, VaultStore};

/// Word count above which a full-file read carries a warning
pub(crate) const FULL_FILE_WORD_WARNING: usize = 2000;

/// Search results per page when `pageSize` is absent
pub(crate) const DEFAULT_PAGE_SIZE: usize = 10;

/// Characters of search context kept per result
const SEARCH_CONTEXT_CHARS: usize = 200;

pub(crate) async fn list(router: &mut SemanticRouter, params: Params<'_>) -> Result<Value> {
    let files = router.store.list_files(params.str("directory")).await?;
    Ok(json!(files))
}

/// Fragments of one note by default; the whole note with `returnFullFile`
pub(crate) async fn read(router: &mut SemanticRouter, params: Params<'_>) -> Result<Value> {
    let path = params.require_str("path")?;
    let note = router.store.get_file(path).await?;
    let links = extract_links(&note.content);
    let mut tags = note.tags.clone();
    for tag in extract_tags(&note.content) {
        if !tags.contains(&tag) {
            tags.push(tag);
        }
    }

    if params.flag("returnFullFile") {
        let word_count = note.content.split_whitespace().count();
        let warning = (word_count > FULL_FILE_WORD_WARNING).then(|| {
            format!(
                "This file contains {word_count} words. Consider fragment retrieval \
                 (omit returnFullFile) to reduce context consumption."
            )
        });
        return Ok(json!({
            "path": path,
            "content": note.content,
            "links": links,
            "tags": tags,
            "frontmatter": note.frontmatter,
            "metadata": {
                "wordCount": word_count,
                "warning": warning,
            },
        }));
    }

    let id = doc_id(path);
    router.retriever.index_document(&id, path, &note.content);

    let query = params
        .str("query")
        .map_or_else(|| file_stem(path), str::to_string);
    let choice = strategy_param(params)?;
    let options = RetrievalOptions::default()
        .strategy(choice)
        .max_fragments(params.usize("maxFragments")?.unwrap_or(DEFAULT_MAX_FRAGMENTS))
        .scoped_to(id);
    let response = router.retriever.retrieve_fragments(Some(&query), &options);
    let strategy = StrategySelector::select(choice, &query).strategy;

    Ok(json!({
        "path": path,
        "content": response.result,
        "links": links,
        "tags": tags,
        "frontmatter": note.frontmatter,
        "originalContentLength": note.content.len(),
        "fragmentMetadata": {
            "totalFragments": response.result.len(),
            "strategy": strategy.as_str(),
            "query": query,
        },
        "workflow": response.workflow,
        "efficiency_hints": response.efficiency_hints,
    }))
}

/// Fragment retrieval across the whole vault
pub(crate) async fn fragments(router: &mut SemanticRouter, params: Params<'_>) -> Result<Value> {
    if !router.vault_indexed {
        index_vault(router).await?;
        router.vault_indexed = true;
    }
    let query = params.str("query").or_else(|| params.str("path"));
    let options = RetrievalOptions::default()
        .strategy(strategy_param(params)?)
        .max_fragments(params.usize("maxFragments")?.unwrap_or(DEFAULT_MAX_FRAGMENTS));
    let response = router.retriever.retrieve_fragments(query, &options);
    Ok(serde_json::to_value(response)?)
}

pub(crate) async fn create(router: &mut SemanticRouter, params: Params<'_>) -> Result<Value> {
    let path = params.require_str("path")?;
    let content = params.text("content").unwrap_or_default();
    let ack = router.store.create_file(path, content).await?;
    if router.vault_indexed && path.ends_with(".md") {
        router.retriever.index_document(&doc_id(path), path, content);
    }
    Ok(serde_json::to_value(ack)?)
}

pub(crate) async fn update(router: &mut SemanticRouter, params: Params<'_>) -> Result<Value> {
    let path = params.require_str("path")?;
    let content = params.require_text("content")?;
    let ack = router.store.update_file(path, content).await?;
    refresh_indexed(router, path).await;
    Ok(serde_json::to_value(ack)?)
}

pub(crate) async fn delete(router: &mut SemanticRouter, params: Params<'_>) -> Result<Value> {
    let path = params.require_str("path")?;
    let ack = router.store.delete_file(path).await?;
    router.retriever.index_mut().remove_document(&doc_id(path));
    Ok(serde_json::to_value(ack)?)
}

/// Paginated content search, falling back to file-name matching when the
/// backend's search endpoint fails
pub(crate) async fn search(router: &mut SemanticRouter, params: Params<'_>) -> Result<Value> {
    let query = params.require_str("query")?;
    let page = params.usize("page")?.unwrap_or(1).max(1);
    let page_size = params
        .usize("pageSize")?
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .max(1);

    let (hits, method) = match router.store.search_simple(query).await {
        Ok(hits) => (hits, "api"),
        Err(err) => {
            let err = RouterError::from(err);
            if !err.is_upstream() {
                return Err(err);
            }
            log::warn!("Search endpoint failed ({err}); matching file names instead");
            (fallback_search(router.store.as_ref(), query).await?, "fallback")
        }
    };

    let total_results = hits.len();
    let total_pages = total_results.div_ceil(page_size);
    let results: Vec<Value> = hits
        .into_iter()
        .skip((page - 1).saturating_mul(page_size))
        .take(page_size)
        .map(search_item)
        .collect();

    Ok(json!({
        "query": query,
        "page": page,
        "pageSize": page_size,
        "totalResults": total_results,
        "totalPages": total_pages,
        "results": results,
        "method": method,
    }))
}

fn search_item(hit: SearchHit) -> Value {
    let title = file_stem(&hit.path);
    let context = hit.context.map(|context| {
        if context.chars().count() > SEARCH_CONTEXT_CHARS {
            let cut: String = context.chars().take(SEARCH_CONTEXT_CHARS).collect();
            format!("{cut}...")
        } else {
            context
        }
    });
    json!({
        "path": hit.path,
        "title": title,
        "context": context,
        "score": hit.score,
    })
}

async fn fallback_search(store: &dyn VaultStore, query: &str) -> Result<Vec<SearchHit>> {
    let paths = list_markdown_recursive(store).await?;
    let mut matcher = PathMatcher::new();
    Ok(matcher
        .rank(query, &paths, paths.len())
        .into_iter()
        .map(|(path, score)| SearchHit {
            path,
            score,
            context: None,
        })
        .collect())
}

fn strategy_param(params: Params<'_>) -> Result<StrategyChoice> {
    params
        .str("strategy")
        .map_or(Ok(StrategyChoice::Auto), str::parse)
        .map_err(RouterError::validation)
}

/// Every markdown path in the vault. Unreadable sub-directories are skipped;
/// only a failure to list the root is an error.
async fn list_markdown_recursive(store: &dyn VaultStore) -> Result<Vec<String>> {
    let mut paths = Vec::new();
    let mut pending: Vec<Option<String>> = vec![None];
    while let Some(directory) = pending.pop() {
        let entries = match store.list_files(directory.as_deref()).await {
            Ok(entries) => entries,
            Err(err) => match directory {
                None => return Err(err.into()),
                Some(dir) => {
                    log::warn!("Skipping unreadable directory {dir}: {err}");
                    continue;
                }
            },
        };
        for entry in entries {
            let full = match &directory {
                Some(dir) => format!("{dir}/{entry}"),
                None => entry,
            };
            if let Some(sub) = full.strip_suffix('/') {
                pending.push(Some(sub.to_string()));
            } else if full.ends_with(".md") {
                paths.push(full);
            }
        }
    }
    paths.sort();
    Ok(paths)
}

/// Index every readable markdown note. Unreadable notes are logged and skipped;
/// a vault root that cannot be listed fails the whole pass.
async fn index_vault(router: &mut SemanticRouter) -> Result<()> {
    let paths = list_markdown_recursive(router.store.as_ref())
        .await
        .map_err(|err| {
            log::warn!("Cannot list vault for indexing: {err}");
            err
        })?;
    let mut indexed = 0usize;
    for path in paths {
        match router.store.get_file(&path).await {
            Ok(note) => {
                router
                    .retriever
                    .index_document(&doc_id(&path), &path, &note.content);
                indexed += 1;
            }
            Err(err) => log::warn!("Skipping {path} while indexing: {err}"),
        }
    }
    log::debug!("Indexed {indexed} vault notes for fragment retrieval");
    Ok(())
}
