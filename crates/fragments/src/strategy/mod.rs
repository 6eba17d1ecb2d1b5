//! Scoring strategies over an indexed document

mod adaptive;
mod proximity;
mod semantic;

use crate::document::Document;
use crate::text::QueryTerms;
use crate::types::{Fragment, FragmentMetadata, Strategy};

/// Fixed bonus for a chunk whose heading mentions a query term
pub const HEADING_BONUS: f64 = 3.0;

/// Candidate fragments of `doc` with score > 0, in document order
pub fn score_document(strategy: Strategy, doc: &Document, query: &QueryTerms) -> Vec<Fragment> {
    if query.is_empty() {
        return Vec::new();
    }
    match strategy {
        Strategy::Adaptive => adaptive::score(doc, query),
        Strategy::Proximity => proximity::score(doc, query),
        Strategy::Semantic => semantic::score(doc, query),
    }
}

fn fragment(
    doc: &Document,
    strategy: Strategy,
    content: String,
    lines: (usize, usize),
    score: f64,
) -> Fragment {
    Fragment {
        content,
        line_start: lines.0,
        line_end: lines.1,
        score,
        doc_path: doc.path().to_string(),
        metadata: Some(FragmentMetadata::new(doc.doc_id(), strategy)),
    }
}
