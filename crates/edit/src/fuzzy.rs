use serde::{Deserialize, Serialize};

/// A span of the content similar to the search text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuzzyMatch {
    /// First line of the span (1-indexed)
    pub line_number: usize,
    /// Last line of the span (1-indexed, inclusive)
    pub end_line: usize,
    /// Byte offset of the span start
    pub start: usize,
    /// Byte offset one past the span end
    pub end: usize,
    pub text: String,
    /// Normalized similarity in `0.0..=1.0`
    pub similarity: f64,
}

#[derive(Debug, Clone, Copy)]
struct LineSpan {
    start: usize,
    end: usize,
}

/// Collapse whitespace runs and case-fold
pub fn normalize(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Levenshtein similarity of the normalized texts: `1 - distance / max_len`
pub fn similarity(a: &str, b: &str) -> f64 {
    let a: Vec<char> = normalize(a).chars().collect();
    let b: Vec<char> = normalize(b).chars().collect();
    let longest = a.len().max(b.len());
    if longest == 0 {
        return 1.0;
    }
    1.0 - levenshtein(&a, &b) as f64 / longest as f64
}

fn levenshtein(a: &[char], b: &[char]) -> usize {
    if a.is_empty() {
        return b.len();
    }
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];
    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            curr[j + 1] = (prev[j] + cost).min(prev[j + 1] + 1).min(curr[j] + 1);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

/// Upper bound of `similarity` given only the two normalized lengths
fn length_bound(a: usize, b: usize) -> f64 {
    let longest = a.max(b);
    if longest == 0 {
        1.0
    } else {
        a.min(b) as f64 / longest as f64
    }
}

fn line_spans(content: &str) -> Vec<LineSpan> {
    let mut spans = Vec::new();
    let mut start = 0;
    for line in content.split('\n') {
        let end = start + line.trim_end_matches('\r').len();
        spans.push(LineSpan { start, end });
        start += line.len() + 1;
    }
    spans
}

fn line_of(content: &str, offset: usize) -> usize {
    content[..offset].matches('\n').count() + 1
}

/// Byte ranges of whitespace-separated words in `line`
fn word_spans(line: &str, base: usize) -> Vec<(usize, usize)> {
    let mut words = Vec::new();
    let mut start = None;
    for (idx, ch) in line.char_indices() {
        match (ch.is_whitespace(), start) {
            (false, None) => start = Some(idx),
            (true, Some(s)) => {
                words.push((base + s, base + idx));
                start = None;
            }
            _ => {}
        }
    }
    if let Some(s) = start {
        words.push((base + s, base + line.len()));
    }
    words
}

/// Every candidate span: whole-line windows sized around the search text's line count and,
/// for single-line searches, word windows within each line.
fn candidates(content: &str, search: &str) -> Vec<(usize, usize)> {
    let lines = line_spans(content);
    let search_lines = search.trim().lines().count().max(1);
    let mut spans = Vec::new();

    for size in search_lines.saturating_sub(1).max(1)..=search_lines + 1 {
        for window in lines.windows(size) {
            let (start, end) = (window[0].start, window[size - 1].end);
            if !content[start..end].trim().is_empty() {
                spans.push((start, end));
            }
        }
    }

    if search_lines == 1 {
        let search_words = search.split_whitespace().count();
        for line in &lines {
            let words = word_spans(&content[line.start..line.end], line.start);
            for size in search_words.saturating_sub(1).max(1)..=search_words + 1 {
                for window in words.windows(size) {
                    spans.push((window[0].0, window[size - 1].1));
                }
            }
        }
    }

    spans.sort_unstable();
    spans.dedup();
    spans
}

/// Spans of `content` whose similarity to `search` is at least `threshold`, best first.
///
/// An exact occurrence short-circuits: every occurrence is returned with similarity `1.0`.
/// Otherwise candidates are ordered by similarity, then line, then byte offset, and a
/// candidate overlapping a better one is dropped. Ties therefore resolve to the lowest line.
pub fn find_fuzzy_matches(content: &str, search: &str, threshold: f64) -> Vec<FuzzyMatch> {
    if search.trim().is_empty() {
        return Vec::new();
    }

    if content.contains(search) {
        return content
            .match_indices(search)
            .map(|(start, text)| {
                let line_number = line_of(content, start);
                FuzzyMatch {
                    line_number,
                    end_line: line_number + text.matches('\n').count(),
                    start,
                    end: start + text.len(),
                    text: text.to_string(),
                    similarity: 1.0,
                }
            })
            .collect();
    }

    let target = normalize(search);
    let target_chars: Vec<char> = target.chars().collect();
    let mut scored: Vec<FuzzyMatch> = candidates(content, search)
        .into_iter()
        .filter_map(|(start, end)| {
            let text = &content[start..end];
            let normalized: Vec<char> = normalize(text).chars().collect();
            if length_bound(normalized.len(), target_chars.len()) < threshold {
                return None;
            }
            let longest = normalized.len().max(target_chars.len());
            let sim = 1.0 - levenshtein(&normalized, &target_chars) as f64 / longest as f64;
            if sim < threshold {
                return None;
            }
            let line_number = line_of(content, start);
            Some(FuzzyMatch {
                line_number,
                end_line: line_number + text.matches('\n').count(),
                start,
                end,
                text: text.to_string(),
                similarity: sim,
            })
        })
        .collect();

    scored.sort_by(|a, b| {
        b.similarity
            .total_cmp(&a.similarity)
            .then_with(|| a.line_number.cmp(&b.line_number))
            .then_with(|| a.start.cmp(&b.start))
    });

    let mut kept: Vec<FuzzyMatch> = Vec::new();
    for candidate in scored {
        let overlaps = kept
            .iter()
            .any(|k| candidate.start < k.end && k.start < candidate.end);
        if !overlaps {
            kept.push(candidate);
        }
    }
    kept
}

/// Highest similarity any candidate span reaches, for reporting near misses
pub fn best_similarity(content: &str, search: &str) -> f64 {
    if search.trim().is_empty() {
        return 0.0;
    }
    if content.contains(search) {
        return 1.0;
    }
    let target: Vec<char> = normalize(search).chars().collect();
    let mut best = 0.0_f64;
    for (start, end) in candidates(content, search) {
        let normalized: Vec<char> = normalize(&content[start..end]).chars().collect();
        if length_bound(normalized.len(), target.len()) <= best {
            continue;
        }
        let longest = normalized.len().max(target.len());
        let sim = 1.0 - levenshtein(&normalized, &target) as f64 / longest as f64;
        best = best.max(sim);
    }
    best
}
