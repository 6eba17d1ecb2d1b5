// Per-action handlers used by the router's dispatch table.

pub(crate) mod edit;
pub(crate) mod system;
pub(crate) mod vault;
pub(crate) mod view;
pub(crate) mod workflow;

use crate::router::SemanticRouter;

/// Index id of a vault note
pub(crate) fn doc_id(path: &str) -> String {
    format!("file:{path}")
}

/// Refresh the index entry of `path` after a write, if the note is indexed.
/// A note that can no longer be read is dropped from the index.
pub(crate) async fn refresh_indexed(router: &mut SemanticRouter, path: &str) {
    let id = doc_id(path);
    if !router.retriever.index().contains(&id) {
        return;
    }
    match router.store.get_file(path).await {
        Ok(note) => router.retriever.index_document(&id, path, &note.content),
        Err(err) => {
            log::warn!("Dropping {path} from the fragment index: {err}");
            router.retriever.index_mut().remove_document(&id);
        }
    }
}
