use super::fragment;
use crate::document::Document;
use crate::text::QueryTerms;
use crate::types::{Fragment, Strategy};

/// Paragraph score: distinct query terms present, damped by paragraph length
pub fn score(doc: &Document, query: &QueryTerms) -> Vec<Fragment> {
    doc.paragraphs()
        .iter()
        .filter_map(|paragraph| {
            let matched = query.coverage(&paragraph.tokens);
            if matched == 0 {
                return None;
            }
            let words = paragraph.tokens.len() as f64;
            let score = matched as f64 / (1.0 + words.ln_1p() * 0.1);
            Some(fragment(
                doc,
                Strategy::Adaptive,
                paragraph.text.clone(),
                (paragraph.line_start, paragraph.line_end),
                score,
            ))
        })
        .collect()
}
