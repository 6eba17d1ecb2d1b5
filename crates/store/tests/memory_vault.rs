use std::sync::Arc;

use pretty_assertions::assert_eq;
use vault_store::{MemoryVault, PatchOperation, PatchRequest, PatchTargetType, VaultStore};

#[tokio::test]
async fn crud_round_through_trait_object() {
    let vault: Arc<dyn VaultStore> = Arc::new(MemoryVault::new());

    let ack = vault
        .create_file("/projects/plan.md", "# Plan\n")
        .await
        .expect("create");
    assert_eq!(ack.path, "projects/plan.md");

    vault
        .patch_file(
            "projects/plan.md",
            &PatchRequest {
                operation: PatchOperation::Append,
                target_type: PatchTargetType::Heading,
                target: "Plan".into(),
                content: "- ship it".into(),
            },
        )
        .await
        .expect("patch");

    let note = vault.get_file("projects/plan.md").await.expect("read");
    assert_eq!(note.content, "# Plan\n- ship it\n");

    let listing = vault.list_files(Some("projects")).await.expect("list");
    assert_eq!(listing, vec!["plan.md"]);

    vault.delete_file("projects/plan.md").await.expect("delete");
    let err = vault.get_file("projects/plan.md").await.unwrap_err();
    assert!(err.is_not_found());
    assert!(vault.list_files(Some("projects")).await.is_err());
}

#[tokio::test]
async fn empty_search_is_invalid_input() {
    let vault = MemoryVault::with_files([("a.md", "alpha")]);
    let err = vault.search_simple("   ").await.unwrap_err();
    assert!(matches!(err, vault_store::VaultError::InvalidInput(_)));
}

#[tokio::test]
async fn server_info_and_commands() {
    let vault = MemoryVault::with_files([("a.md", "alpha")]);
    let info = vault.get_server_info().await.expect("info");
    assert_eq!(info["files"], 1);
    let commands = vault.get_commands().await.expect("commands");
    assert!(!commands.is_empty());
}
