mod support;

use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::sync::Arc;
use support::{call, empty, router, router_over, sample_vault, FailingVault};
use vault_semantic::{SemanticRouter, WorkflowConfig};
use vault_store::VaultStore;

#[tokio::test]
async fn unknown_operation_is_a_validation_error() {
    let mut router = router();
    let response = call(&mut router, "teleport", "read", json!({"path": "test.md"})).await;

    let error = response.error.as_ref().expect("unknown operation");
    assert_eq!(error.code, "VALIDATION_ERROR");
    assert_eq!(error.message, "Unknown operation: teleport");
    assert!(error.recovery_hints.is_empty());
    assert!(response.workflow.is_none());
    assert!(response.result.is_null());
    // The attempt is still remembered
    assert_eq!(response.context.current_file.as_deref(), Some("test.md"));
    assert!(router.tokens().file_loaded.is_none());
}

#[tokio::test]
async fn unknown_action_is_a_validation_error() {
    let mut router = router();
    let response = call(&mut router, "vault", "explode", empty()).await;
    let error = response.error.expect("unknown action");
    assert_eq!(error.code, "VALIDATION_ERROR");
    assert_eq!(error.message, "Unknown vault action: explode");
}

#[tokio::test]
async fn error_response_serializes_without_workflow() {
    let mut router = router();
    let response = call(&mut router, "vault", "read", empty()).await;

    let json = serde_json::to_value(&response).unwrap();
    assert!(json.get("workflow").is_none());
    assert_eq!(json["result"], Value::Null);
    assert_eq!(json["error"]["code"], "VALIDATION_ERROR");
    assert_eq!(
        json["error"]["message"],
        "Missing required parameter 'path'"
    );
    assert!(json["error"]["recovery_hints"].is_array());
}

#[tokio::test]
async fn missing_directory_suggests_root_and_parent() {
    let mut router = router_over(FailingVault::not_found());
    let response = call(
        &mut router,
        "vault",
        "list",
        json!({"directory": "path/to/non-existent"}),
    )
    .await;

    let error = response.error.as_ref().expect("404");
    assert_eq!(error.code, "NOT_FOUND");
    assert!(error.message.contains("Request failed with status code 404"));
    let commands: Vec<&str> = error.recovery_hints.iter().map(|h| h.command.as_str()).collect();
    assert!(commands.contains(&"vault(action='list')"));
    assert!(commands.contains(&"vault(action='list', directory='path/to')"));
    assert_eq!(
        response.context.current_directory.as_deref(),
        Some("path/to/non-existent")
    );
    assert!(router.tokens().directory_listed.is_none());
}

#[tokio::test]
async fn failed_read_suggests_listing_parent_and_searching() {
    let mut router = router();
    let response = call(
        &mut router,
        "vault",
        "read",
        json!({"path": "notes/missing-note.md"}),
    )
    .await;

    let error = response.error.as_ref().expect("missing note");
    assert_eq!(error.code, "NOT_FOUND");
    assert_eq!(
        response.suggested_commands(),
        vec![
            "vault(action='list', directory='notes')",
            "vault(action='search', query='missing-note')",
        ]
    );
    assert_eq!(
        response.context.file_history,
        vec!["notes/missing-note.md"]
    );
    assert!(router.tokens().file_history.is_empty());
}

#[tokio::test]
async fn failed_edit_on_missing_file_offers_buffered_retry() {
    let mut router = router();
    let response = call(
        &mut router,
        "edit",
        "window",
        json!({"path": "nope/ghost.md", "oldText": "a", "newText": "b"}),
    )
    .await;

    let error = response.error.as_ref().expect("missing file");
    assert!(error
        .recovery_hints
        .iter()
        .any(|h| h.description.contains("buffered")));
    assert!(error
        .recovery_hints
        .iter()
        .any(|h| h.command == "vault(action='list', directory='nope')"));
    assert!(response.context.buffer_available);
}

#[tokio::test]
async fn replay_without_buffer_is_not_found() {
    let mut router = router();
    let response = call(&mut router, "edit", "from_buffer", json!({"path": "test.md"})).await;

    let error = response.error.expect("empty buffer");
    assert_eq!(error.code, "NOT_FOUND");
    assert_eq!(error.message, "No buffered content available");
    assert!(error
        .recovery_hints
        .iter()
        .all(|h| !h.command.starts_with("edit(action='at_line'")));
}

#[tokio::test]
async fn unreachable_backend_is_upstream() {
    let mut router = router_over(FailingVault::refusing());
    let response = call(&mut router, "system", "info", empty()).await;

    let error = response.error.expect("connection refused");
    assert_eq!(error.code, "UPSTREAM_ERROR");
    assert!(error.message.contains("ECONNREFUSED"));
    assert_eq!(error.recovery_hints[0].command, "system(action='info')");
}

#[tokio::test]
async fn unreachable_vault_fails_fragments_until_it_recovers() {
    support::init_logging();
    let vault = Arc::new(FailingVault::refusing());
    let store: Arc<dyn VaultStore> = vault.clone();
    let mut router = SemanticRouter::new(store, WorkflowConfig::bundled());

    let failed = call(&mut router, "vault", "fragments", json!({"query": "tax"})).await;
    let error = failed.error.expect("connection refused");
    assert_eq!(error.code, "UPSTREAM_ERROR");
    assert!(error.message.contains("ECONNREFUSED"));
    assert!(failed.result.is_null());

    vault.restore();
    let recovered = call(&mut router, "vault", "fragments", json!({"query": "tax"})).await;
    assert!(!recovered.is_error(), "{:?}", recovered.error);
    let fragments = recovered.result["result"].as_array().expect("fragments");
    assert!(!fragments.is_empty());
    assert_eq!(fragments[0]["docPath"], "projects/tax.md");
}

#[tokio::test]
async fn broken_search_falls_back_to_file_names() {
    let mut router = router_over(FailingVault::broken_search());
    let response = call(&mut router, "vault", "search", json!({"query": "tax"})).await;

    assert!(!response.is_error(), "{:?}", response.error);
    assert_eq!(response.result["method"], "fallback");
    assert_eq!(response.result["results"][0]["path"], "projects/tax.md");
    assert!(response.result["results"][0]["context"].is_null());
}

#[tokio::test]
async fn invalid_strategy_is_rejected() {
    let mut router = router();
    let response = call(
        &mut router,
        "vault",
        "fragments",
        json!({"query": "tax", "strategy": "telepathy"}),
    )
    .await;
    let error = response.error.expect("bad strategy");
    assert_eq!(error.code, "VALIDATION_ERROR");
    assert!(error.message.contains("telepathy"));
}

#[tokio::test]
async fn blank_fragment_query_returns_empty_result() {
    let mut router = router();
    let response = call(&mut router, "vault", "fragments", json!({"query": "   "})).await;
    assert!(!response.is_error());
    assert_eq!(response.result["result"], json!([]));
}

#[tokio::test]
async fn minimal_config_still_reports_errors() {
    support::init_logging();
    let mut router = SemanticRouter::new(Arc::new(sample_vault()), WorkflowConfig::minimal());

    let ok = call(&mut router, "vault", "read", json!({"path": "test.md"})).await;
    assert!(ok.workflow.is_none());
    assert!(ok.efficiency_hints.is_none());

    let failed = call(&mut router, "vault", "read", json!({"path": "absent.md"})).await;
    let error = failed.error.expect("missing note");
    assert_eq!(error.code, "NOT_FOUND");
    assert!(error.recovery_hints.is_empty());
}
