use super::fragment;
use crate::document::{Document, Sentence};
use crate::text::QueryTerms;
use crate::types::{Fragment, Strategy};

/// Widest window of consecutive sentences considered
const MAX_WINDOW: usize = 3;

/// Best sentence window of each paragraph, scored by the tightest span covering every term
pub fn score(doc: &Document, query: &QueryTerms) -> Vec<Fragment> {
    doc.paragraphs()
        .iter()
        .filter_map(|paragraph| {
            let (score, window) = best_window(&paragraph.sentences, query)?;
            let first = window.first()?;
            let last = window.last()?;
            Some(fragment(
                doc,
                Strategy::Proximity,
                join_sentences(window),
                (first.line_start, last.line_end),
                score,
            ))
        })
        .collect()
}

fn best_window<'a>(sentences: &'a [Sentence], query: &QueryTerms) -> Option<(f64, &'a [Sentence])> {
    let mut best: Option<(f64, &[Sentence])> = None;
    for start in 0..sentences.len() {
        let widest = MAX_WINDOW.min(sentences.len() - start);
        for size in 1..=widest {
            let window = &sentences[start..start + size];
            let tokens: Vec<&str> = window
                .iter()
                .flat_map(|s| s.tokens.iter().map(String::as_str))
                .collect();
            let Some(span) = minimal_span(&tokens, query) else {
                continue;
            };
            let score = 1.0 / (1.0 + span.saturating_sub(query.len()) as f64);
            if best.map_or(true, |(s, _)| score > s) {
                best = Some((score, window));
            }
            break;
        }
    }
    best
}

/// Length in tokens of the shortest run containing every query term
fn minimal_span(tokens: &[&str], query: &QueryTerms) -> Option<usize> {
    let hits: Vec<(usize, usize)> = tokens
        .iter()
        .enumerate()
        .flat_map(|(pos, tok)| query.positions(tok).map(move |term| (pos, term)))
        .collect();

    let need = query.len();
    let mut counts = vec![0usize; need];
    let mut covered = 0;
    let mut left = 0;
    let mut best: Option<usize> = None;
    for right in 0..hits.len() {
        let term = hits[right].1;
        counts[term] += 1;
        if counts[term] == 1 {
            covered += 1;
        }
        while covered == need {
            let span = hits[right].0 - hits[left].0 + 1;
            best = Some(best.map_or(span, |b| b.min(span)));
            let dropped = hits[left].1;
            counts[dropped] -= 1;
            if counts[dropped] == 0 {
                covered -= 1;
            }
            left += 1;
        }
    }
    best
}

fn join_sentences(window: &[Sentence]) -> String {
    let mut out = String::new();
    let mut prev_line = None;
    for sentence in window {
        if let Some(prev) = prev_line {
            out.push(if prev == sentence.line_start { ' ' } else { '\n' });
        }
        out.push_str(&sentence.text);
        prev_line = Some(sentence.line_end);
    }
    out
}
