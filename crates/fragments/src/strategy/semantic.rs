use super::{fragment, HEADING_BONUS};
use crate::document::Document;
use crate::text::QueryTerms;
use crate::types::{Fragment, Strategy};

/// Chunk score: query-term frequency in the body, plus a bonus when the heading matches
pub fn score(doc: &Document, query: &QueryTerms) -> Vec<Fragment> {
    doc.chunks()
        .iter()
        .filter_map(|chunk| {
            let tf = query.frequency(&chunk.body_tokens) as f64;
            let bonus = if query.frequency(&chunk.heading_tokens) > 0 {
                HEADING_BONUS
            } else {
                0.0
            };
            let score = tf + bonus;
            if score <= 0.0 {
                return None;
            }
            let mut fragment = fragment(
                doc,
                Strategy::Semantic,
                chunk.content.clone(),
                (chunk.line_start, chunk.line_end),
                score,
            );
            fragment.metadata = fragment.metadata.map(|meta| {
                meta.chunk_type(chunk.chunk_type)
                    .heading(chunk.heading.clone())
            });
            Some(fragment)
        })
        .collect()
}
