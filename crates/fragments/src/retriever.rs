use crate::index::DocumentIndex;
use crate::response::{
    EfficiencyHints, FragmentContext, FragmentResponse, SuggestedAction, WorkflowHint,
};
use crate::selector::{Selection, StrategySelector};
use crate::strategy::score_document;
use crate::text::QueryTerms;
use crate::types::{Fragment, RetrievalOptions};
use std::cmp::Ordering;

/// Owns a [`DocumentIndex`] and answers fragment queries against it
#[derive(Debug, Default)]
pub struct FragmentRetriever {
    index: DocumentIndex,
}

impl FragmentRetriever {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn index(&self) -> &DocumentIndex {
        &self.index
    }

    pub fn index_mut(&mut self) -> &mut DocumentIndex {
        &mut self.index
    }

    pub fn index_document(&mut self, doc_id: &str, path: &str, text: &str) {
        self.index.index_document(doc_id, path, text);
    }

    /// Most relevant fragments for `query`.
    ///
    /// An absent or blank query returns an empty result; it never fails.
    pub fn retrieve_fragments(
        &self,
        query: Option<&str>,
        options: &RetrievalOptions,
    ) -> FragmentResponse {
        let query = query.map(str::trim).unwrap_or("");
        let selection = StrategySelector::select(options.strategy, query);
        let terms = QueryTerms::parse(query);

        let mut fragments: Vec<Fragment> = if terms.is_empty() {
            Vec::new()
        } else {
            self.index
                .documents()
                .into_iter()
                .filter(|doc| {
                    options
                        .doc_ids
                        .as_ref()
                        .map_or(true, |ids| ids.iter().any(|id| id == doc.doc_id()))
                })
                .flat_map(|doc| score_document(selection.strategy, doc, &terms))
                .filter(|f| f.score > 0.0)
                .collect()
        };
        fragments.sort_by(compare_fragments);
        fragments.truncate(options.max_fragments);

        let mut linked_files: Vec<String> = Vec::new();
        for fragment in &fragments {
            if !linked_files.contains(&fragment.doc_path) {
                linked_files.push(fragment.doc_path.clone());
            }
        }

        FragmentResponse {
            workflow: workflow_for(query, &fragments, &linked_files),
            efficiency_hints: efficiency_for(&selection),
            context: FragmentContext {
                search_results: fragments.len(),
                linked_files,
            },
            result: fragments,
        }
    }
}

/// Score descending, then line ascending, then path ascending
fn compare_fragments(a: &Fragment, b: &Fragment) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| a.line_start.cmp(&b.line_start))
        .then_with(|| a.doc_path.cmp(&b.doc_path))
        .then_with(|| a.line_end.cmp(&b.line_end))
}

fn efficiency_for(selection: &Selection) -> EfficiencyHints {
    EfficiencyHints {
        message: selection.message(),
        alternatives: selection.alternatives(),
    }
}

fn workflow_for(query: &str, fragments: &[Fragment], linked_files: &[String]) -> WorkflowHint {
    let path = match linked_files {
        [only] => only.as_str(),
        _ => "<path>",
    };
    let message = if fragments.is_empty() {
        if query.is_empty() {
            "No query given, so no fragments were retrieved. Read the full file instead.".to_string()
        } else {
            format!("No fragments matched '{query}'. Try other terms or read the full file.")
        }
    } else {
        format!(
            "Found {} relevant fragments across {} files",
            fragments.len(),
            linked_files.len()
        )
    };

    WorkflowHint {
        message,
        suggested_next: vec![
            SuggestedAction::new(
                "Refine the query to target a specific section",
                "vault(action='fragments', query='<more specific terms>')",
                "Narrower queries return tighter fragments",
            ),
            SuggestedAction::new(
                "Read the complete file",
                format!("vault(action='read', path='{path}', returnFullFile=true)"),
                "Fragments may omit surrounding context",
            ),
        ],
    }
}
