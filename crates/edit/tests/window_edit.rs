use pretty_assertions::assert_eq;
use vault_edit::{perform_window_edit, EditError, EditMethod};
use vault_store::MemoryVault;

fn vault() -> MemoryVault {
    MemoryVault::with_files([(
        "plan.md",
        "# Plan\nShip the parser on Friday.\nReview the docs afterwards.\n",
    )])
}

#[tokio::test]
async fn exact_text_is_replaced_once() {
    let vault = vault();
    let outcome = perform_window_edit(&vault, "plan.md", "Friday", "Monday", None)
        .await
        .expect("exact edit");
    assert_eq!(outcome.method, EditMethod::Exact);
    assert_eq!(outcome.similarity, 1.0);
    assert_eq!(outcome.line_number, 2);
    assert_eq!(
        vault.content_of("plan.md").await.unwrap(),
        "# Plan\nShip the parser on Monday.\nReview the docs afterwards.\n"
    );
}

#[tokio::test]
async fn fuzzy_anchor_is_replaced() {
    let vault = vault();
    let outcome = perform_window_edit(
        &vault,
        "plan.md",
        "Reveiw the doc afterwards.",
        "Review the docs on Monday.",
        None,
    )
    .await
    .expect("fuzzy edit");
    assert_eq!(outcome.method, EditMethod::Fuzzy);
    assert_eq!(outcome.line_number, 3);
    assert_eq!(outcome.replaced, "Review the docs afterwards.");
    assert_eq!(
        vault.content_of("plan.md").await.unwrap(),
        "# Plan\nShip the parser on Friday.\nReview the docs on Monday.\n"
    );
}

#[tokio::test]
async fn no_candidate_leaves_file_untouched() {
    let vault = vault();
    let err = perform_window_edit(&vault, "plan.md", "Completely unrelated sentence here", "x", None)
        .await
        .unwrap_err();
    match err {
        EditError::NoMatch { best, threshold, .. } => assert!(best < threshold),
        other => panic!("unexpected error: {other}"),
    }
    assert!(vault
        .content_of("plan.md")
        .await
        .unwrap()
        .contains("Ship the parser on Friday."));
}

#[tokio::test]
async fn missing_file_propagates_store_error() {
    let err = perform_window_edit(&vault(), "nope.md", "a", "b", None)
        .await
        .unwrap_err();
    assert!(matches!(err, EditError::Store(ref e) if e.is_not_found()));
}

#[tokio::test]
async fn blank_search_is_rejected() {
    let err = perform_window_edit(&vault(), "plan.md", "  ", "b", None)
        .await
        .unwrap_err();
    assert_eq!(err, EditError::EmptySearch);
}
