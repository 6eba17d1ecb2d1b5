mod support;

use pretty_assertions::assert_eq;
use serde_json::json;
use support::{call, empty, router};

#[tokio::test]
async fn listing_the_root_sets_current_directory() {
    let mut router = router();
    let response = call(&mut router, "vault", "list", json!({"directory": "/"})).await;

    assert!(!response.is_error());
    assert_eq!(response.context.current_directory.as_deref(), Some("/"));
    let entries = response.result.as_array().expect("listing is an array");
    assert!(entries.iter().any(|e| e == "test.md"));
    assert!(entries.iter().any(|e| e == "projects/"));
}

#[tokio::test]
async fn fresh_session_offers_no_edit_suggestions() {
    let mut router = router();
    let response = call(&mut router, "vault", "list", empty()).await;

    let commands = response.suggested_commands();
    assert!(!commands.is_empty());
    assert!(commands.iter().all(|c| !c.contains("edit(")));
}

#[tokio::test]
async fn reading_a_note_unlocks_editing_and_link_hints() {
    let mut router = router();
    let response = call(&mut router, "vault", "read", json!({"path": "test.md"})).await;

    assert!(!response.is_error());
    let workflow = response.workflow.as_ref().expect("read has success hints");
    assert_eq!(workflow.message, "Loaded test.md");
    let descriptions: Vec<&str> = workflow
        .suggested_next
        .iter()
        .map(|s| s.description.as_str())
        .collect();
    assert!(descriptions.contains(&"Edit this file"));
    assert!(descriptions.contains(&"Follow a linked note"));
    assert!(descriptions.contains(&"Find notes sharing these tags"));
    assert!(workflow
        .suggested_next
        .iter()
        .any(|s| s.command == "edit(action='window', path='test.md', oldText='...', newText='...')"));

    assert_eq!(response.context.current_file.as_deref(), Some("test.md"));
    assert!(response.context.has_links);
    assert_eq!(response.context.linked_files, vec!["linked.md"]);
    assert_eq!(response.context.tags, vec!["#tag1"]);
    assert_eq!(router.tokens().file_loaded.as_deref(), Some("test.md"));
}

#[tokio::test]
async fn default_read_returns_fragments_of_that_note_only() {
    let mut router = router();
    // Index another note first so the shared index holds more than one document
    call(&mut router, "vault", "read", json!({"path": "projects/tax.md"})).await;

    let response = call(
        &mut router,
        "vault",
        "read",
        json!({"path": "test.md", "query": "section text"}),
    )
    .await;
    let result = &response.result;
    let fragments = result["content"].as_array().expect("fragments");
    assert!(!fragments.is_empty());
    assert!(fragments.iter().all(|f| f["docPath"] == "test.md"));
    assert_eq!(result["fragmentMetadata"]["query"], "section text");
    assert_eq!(result["fragmentMetadata"]["strategy"], "adaptive");
    assert_eq!(
        result["fragmentMetadata"]["totalFragments"],
        json!(fragments.len())
    );
    assert_eq!(result["originalContentLength"], json!(support::TEST_NOTE.len()));
}

#[tokio::test]
async fn full_file_read_reports_word_count_and_efficiency_hint() {
    let mut router = router();
    let response = call(
        &mut router,
        "vault",
        "read",
        json!({"path": "test.md", "returnFullFile": true}),
    )
    .await;

    assert_eq!(response.result["content"], support::TEST_NOTE);
    assert_eq!(
        response.result["metadata"]["wordCount"],
        json!(support::TEST_NOTE.split_whitespace().count())
    );
    assert!(response.result["metadata"]["warning"].is_null());
    let hints = response.efficiency_hints.expect("full read is flagged");
    assert!(hints.message.contains("Full-file reads"));
}

#[tokio::test]
async fn large_full_file_read_carries_a_warning() {
    let body = "word ".repeat(2500);
    let mut router = support::router_over(vault_store::MemoryVault::with_files([("big.md", body)]));
    let response = call(
        &mut router,
        "vault",
        "read",
        json!({"path": "big.md", "returnFullFile": true}),
    )
    .await;
    let warning = response.result["metadata"]["warning"]
        .as_str()
        .expect("warning above 2000 words");
    assert!(warning.contains("2500 words"));
}

#[tokio::test]
async fn search_is_paginated_and_echoes_query() {
    let mut router = router();
    let response = call(
        &mut router,
        "vault",
        "search",
        json!({"query": "test", "page": 1, "pageSize": 1}),
    )
    .await;

    let result = &response.result;
    assert_eq!(result["query"], "test");
    assert_eq!(result["page"], 1);
    assert_eq!(result["pageSize"], 1);
    assert_eq!(result["method"], "api");
    assert_eq!(result["results"].as_array().map(Vec::len), Some(1));
    let total = result["totalResults"].as_u64().expect("total");
    assert!(total >= 2);
    assert_eq!(result["totalPages"], json!(total));
    assert!(result["results"][0]["title"].is_string());

    let workflow = response.workflow.expect("search hints");
    assert_eq!(workflow.message, format!("Found {total} results for 'test'"));
    assert!(response.context.search_results_available);
    assert_eq!(response.context.search_history, vec!["test"]);
}

#[tokio::test]
async fn empty_search_suggests_fragments() {
    let mut router = router();
    let response = call(&mut router, "vault", "search", json!({"query": "zebra"})).await;

    assert_eq!(response.result["totalResults"], 0);
    assert!(response
        .suggested_commands()
        .contains(&"vault(action='fragments', query='zebra')"));
    assert!(!router.tokens().search_has_results);
}

#[tokio::test]
async fn repeated_search_is_flagged() {
    let mut router = router();
    let first = call(&mut router, "vault", "search", json!({"query": "tax"})).await;
    assert!(first.efficiency_hints.is_none());

    let second = call(&mut router, "vault", "search", json!({"query": "tax"})).await;
    let hints = second.efficiency_hints.expect("second identical search");
    assert!(hints.message.contains("Same query"));
}

#[tokio::test]
async fn vault_fragments_index_the_whole_vault() {
    let mut router = router();
    let response = call(
        &mut router,
        "vault",
        "fragments",
        json!({"query": "tax recovery"}),
    )
    .await;

    assert!(!response.is_error());
    let fragments = response.result["result"].as_array().expect("fragments");
    let top = &fragments[0];
    assert!(top["content"].as_str().unwrap().contains("$200,000"));
    assert!(top["lineStart"].as_u64().unwrap() > 0);
    assert_eq!(top["docPath"], "projects/tax.md");
    assert_eq!(router.retriever().index().document_count(), 4);
    assert!(router.tokens().search_has_results);
}

#[tokio::test]
async fn create_update_delete_cycle() {
    let mut router = router();
    let created = call(
        &mut router,
        "vault",
        "create",
        json!({"path": "inbox/new.md"}),
    )
    .await;
    assert_eq!(created.result["success"], true);
    assert!(created
        .suggested_commands()
        .contains(&"edit(action='append', path='inbox/new.md', content='...')"));

    let updated = call(
        &mut router,
        "vault",
        "update",
        json!({"path": "inbox/new.md", "content": "# New\nfresh"}),
    )
    .await;
    assert!(!updated.is_error());

    let read = call(
        &mut router,
        "view",
        "file",
        json!({"path": "inbox/new.md"}),
    )
    .await;
    assert_eq!(read.result["content"], "# New\nfresh");

    let deleted = call(&mut router, "vault", "delete", json!({"path": "inbox/new.md"})).await;
    assert!(!deleted.is_error());
    assert!(router.tokens().file_loaded.is_none());

    let gone = call(&mut router, "view", "file", json!({"path": "inbox/new.md"})).await;
    assert_eq!(gone.error.expect("deleted").code, "NOT_FOUND");
}

#[tokio::test]
async fn view_window_centres_on_fuzzy_search_text() {
    let mut router = router();
    let response = call(
        &mut router,
        "view",
        "window",
        json!({"path": "test.md", "searchText": "Some more text", "windowSize": 2}),
    )
    .await;

    let result = &response.result;
    assert_eq!(result["centerLine"], 6);
    assert_eq!(result["startLine"], 5);
    assert_eq!(result["endLine"], 7);
    assert_eq!(result["lines"][0], "## Section");
    assert_eq!(result["totalLines"], 7);
}

#[tokio::test]
async fn view_window_defaults_to_the_top() {
    let mut router = router();
    let response = call(&mut router, "view", "window", json!({"path": "linked.md"})).await;
    assert_eq!(response.result["startLine"], 1);
    assert_eq!(response.result["centerLine"], 1);
    assert!(response.result["searchText"].is_null());
}

#[tokio::test]
async fn view_window_past_the_end_shows_the_tail() {
    let mut router = router();
    let response = call(
        &mut router,
        "view",
        "window",
        json!({"path": "linked.md", "lineNumber": 40, "windowSize": 4}),
    )
    .await;

    assert!(!response.is_error(), "{:?}", response.error);
    assert_eq!(response.result["totalLines"], 4);
    assert_eq!(response.result["centerLine"], 4);
    assert_eq!(response.result["startLine"], 2);
    assert_eq!(response.result["endLine"], 4);
    assert_eq!(
        response.result["lines"],
        json!(["", "Back to [[test.md]].", ""])
    );
}

#[tokio::test]
async fn open_then_view_active() {
    let mut router = router();
    let opened = call(
        &mut router,
        "view",
        "open_in_obsidian",
        json!({"path": "linked.md"}),
    )
    .await;
    assert!(!opened.is_error());

    let active = call(&mut router, "view", "active", empty()).await;
    assert_eq!(active.result["path"], "linked.md");
    assert_eq!(
        active.workflow.expect("active hints").message,
        "Active note is linked.md"
    );
    assert_eq!(router.tokens().file_loaded.as_deref(), Some("linked.md"));
}

#[tokio::test]
async fn workflow_suggest_reflects_session() {
    let mut router = router();
    call(&mut router, "vault", "read", json!({"path": "test.md"})).await;
    call(&mut router, "vault", "search", json!({"query": "tax"})).await;

    let response = call(&mut router, "workflow", "suggest", empty()).await;
    let suggestions = response.result["suggestions"].as_array().expect("suggestions");
    let descriptions: Vec<&str> = suggestions
        .iter()
        .filter_map(|s| s["description"].as_str())
        .collect();
    assert_eq!(
        descriptions,
        vec!["Continue working with last file", "Refine last search"]
    );
    assert_eq!(response.result["current_context"]["current_file"], "test.md");
}

#[tokio::test]
async fn system_info_and_commands() {
    let mut router = router();
    let info = call(&mut router, "system", "info", empty()).await;
    assert_eq!(info.result["status"], "OK");

    let commands = call(&mut router, "system", "commands", empty()).await;
    assert!(commands.result.as_array().is_some());
}

#[tokio::test]
async fn daily_note_read_suggests_browsing_siblings() {
    let mut router = router();
    let response = call(
        &mut router,
        "vault",
        "read",
        json!({"path": "daily/2024-01-05.md"}),
    )
    .await;
    assert!(response
        .suggested_commands()
        .contains(&"vault(action='list', directory='daily')"));
}
