use crate::text::tokenize;
use crate::types::ChunkType;
use unicode_segmentation::UnicodeSegmentation;

/// Markdown structure of a single line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineKind {
    Blank,
    Heading(usize),
    List,
    Code,
    Quote,
    Table,
    Text,
}

/// Blank-line delimited block of text
#[derive(Debug, Clone)]
pub struct Paragraph {
    pub text: String,
    pub line_start: usize,
    pub line_end: usize,
    pub tokens: Vec<String>,
    pub sentences: Vec<Sentence>,
}

#[derive(Debug, Clone)]
pub struct Sentence {
    pub text: String,
    pub line_start: usize,
    pub line_end: usize,
    pub tokens: Vec<String>,
}

/// Heading-bounded section of a document.
///
/// A chunk runs from its heading to the next heading of equal or higher level, so chunks of
/// nested headings overlap their parent. Text before the first heading forms a chunk without
/// a heading.
#[derive(Debug, Clone)]
pub struct Chunk {
    pub heading: Option<String>,
    pub level: usize,
    pub heading_tokens: Vec<String>,
    pub body_tokens: Vec<String>,
    pub content: String,
    pub line_start: usize,
    pub line_end: usize,
    pub chunk_type: ChunkType,
}

/// An indexed document with its derived structures
#[derive(Debug, Clone)]
pub struct Document {
    doc_id: String,
    path: String,
    raw_text: String,
    paragraphs: Vec<Paragraph>,
    chunks: Vec<Chunk>,
}

impl Document {
    /// Parse `text` into paragraphs, sentences and chunks in one pass over its lines
    pub fn build(doc_id: impl Into<String>, path: impl Into<String>, text: impl Into<String>) -> Self {
        let raw_text = text.into();
        let lines: Vec<&str> = raw_text.lines().collect();
        let kinds = classify(&lines);
        let paragraphs = split_paragraphs(&lines);
        let chunks = split_chunks(&lines, &kinds);
        Self {
            doc_id: doc_id.into(),
            path: path.into(),
            raw_text,
            paragraphs,
            chunks,
        }
    }

    pub fn doc_id(&self) -> &str {
        &self.doc_id
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn raw_text(&self) -> &str {
        &self.raw_text
    }

    pub fn paragraphs(&self) -> &[Paragraph] {
        &self.paragraphs
    }

    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    pub fn sentence_count(&self) -> usize {
        self.paragraphs.iter().map(|p| p.sentences.len()).sum()
    }
}

/// ATX heading level and text, if `line` is a heading
pub(crate) fn heading_of(line: &str) -> Option<(usize, &str)> {
    let trimmed = line.trim_start();
    let level = trimmed.chars().take_while(|c| *c == '#').count();
    if level == 0 || level > 6 {
        return None;
    }
    let rest = &trimmed[level..];
    if !(rest.is_empty() || rest.starts_with(' ') || rest.starts_with('\t')) {
        return None;
    }
    Some((level, rest.trim().trim_end_matches('#').trim_end()))
}

fn is_list_item(trimmed: &str) -> bool {
    if ["- ", "* ", "+ "].iter().any(|m| trimmed.starts_with(m)) {
        return true;
    }
    let digits = trimmed.chars().take_while(char::is_ascii_digit).count();
    digits > 0 && (trimmed[digits..].starts_with(". ") || trimmed[digits..].starts_with(") "))
}

fn classify(lines: &[&str]) -> Vec<LineKind> {
    let mut in_fence = false;
    lines
        .iter()
        .map(|line| {
            let trimmed = line.trim_start();
            if trimmed.starts_with("```") || trimmed.starts_with("~~~") {
                in_fence = !in_fence;
                return LineKind::Code;
            }
            if in_fence {
                return LineKind::Code;
            }
            if trimmed.is_empty() {
                LineKind::Blank
            } else if let Some((level, _)) = heading_of(trimmed) {
                LineKind::Heading(level)
            } else if is_list_item(trimmed) {
                LineKind::List
            } else if trimmed.starts_with('>') {
                LineKind::Quote
            } else if trimmed.starts_with('|') {
                LineKind::Table
            } else {
                LineKind::Text
            }
        })
        .collect()
}

fn split_paragraphs(lines: &[&str]) -> Vec<Paragraph> {
    let mut paragraphs = Vec::new();
    let mut start: Option<usize> = None;
    for idx in 0..=lines.len() {
        let blank = lines.get(idx).map_or(true, |l| l.trim().is_empty());
        match (blank, start) {
            (false, None) => start = Some(idx),
            (true, Some(s)) => {
                paragraphs.push(build_paragraph(&lines[s..idx], s + 1));
                start = None;
            }
            _ => {}
        }
    }
    paragraphs
}

fn build_paragraph(lines: &[&str], line_start: usize) -> Paragraph {
    let text = lines.join("\n");
    let sentences = split_sentences(&text, line_start);
    Paragraph {
        tokens: tokenize(&text),
        line_end: line_start + lines.len() - 1,
        line_start,
        sentences,
        text,
    }
}

fn split_sentences(text: &str, line_start: usize) -> Vec<Sentence> {
    text.split_sentence_bound_indices()
        .filter_map(|(offset, raw)| {
            let trimmed = raw.trim();
            let tokens = tokenize(trimmed);
            if tokens.is_empty() {
                return None;
            }
            let lead = raw.len() - raw.trim_start().len();
            let first = line_start + text[..offset + lead].matches('\n').count();
            Some(Sentence {
                text: trimmed.to_string(),
                line_start: first,
                line_end: first + trimmed.matches('\n').count(),
                tokens,
            })
        })
        .collect()
}

fn dominant_type(kinds: &[LineKind]) -> ChunkType {
    let order = [
        (LineKind::List, ChunkType::List),
        (LineKind::Code, ChunkType::Code),
        (LineKind::Quote, ChunkType::Quote),
        (LineKind::Table, ChunkType::Table),
        (LineKind::Text, ChunkType::Paragraph),
    ];
    let mut best = (0, ChunkType::Heading);
    for (kind, chunk_type) in order {
        let count = kinds.iter().filter(|k| **k == kind).count();
        if count > best.0 {
            best = (count, chunk_type);
        }
    }
    best.1
}

fn build_chunk(
    lines: &[&str],
    kinds: &[LineKind],
    range: std::ops::Range<usize>,
    heading: Option<(usize, String)>,
) -> Option<Chunk> {
    let first = range.clone().find(|&i| kinds[i] != LineKind::Blank)?;
    let last = range.clone().rev().find(|&i| kinds[i] != LineKind::Blank)?;
    let body_start = if heading.is_some() { first + 1 } else { first };
    let body = lines.get(body_start..=last).unwrap_or_default();
    let body_kinds = kinds.get(body_start..=last).unwrap_or_default();
    let (level, heading) = match heading {
        Some((level, text)) => (level, Some(text)),
        None => (0, None),
    };
    Some(Chunk {
        heading_tokens: heading.as_deref().map(tokenize).unwrap_or_default(),
        body_tokens: tokenize(&body.join("\n")),
        content: lines[first..=last].join("\n"),
        line_start: first + 1,
        line_end: last + 1,
        chunk_type: dominant_type(body_kinds),
        heading,
        level,
    })
}

fn split_chunks(lines: &[&str], kinds: &[LineKind]) -> Vec<Chunk> {
    let headings: Vec<(usize, usize)> = kinds
        .iter()
        .enumerate()
        .filter_map(|(idx, kind)| match kind {
            LineKind::Heading(level) => Some((idx, *level)),
            _ => None,
        })
        .collect();

    let mut chunks = Vec::new();
    let preamble_end = headings.first().map_or(lines.len(), |(idx, _)| *idx);
    if let Some(chunk) = build_chunk(lines, kinds, 0..preamble_end, None) {
        chunks.push(chunk);
    }

    for (pos, &(start, level)) in headings.iter().enumerate() {
        let end = headings[pos + 1..]
            .iter()
            .find(|(_, next)| *next <= level)
            .map_or(lines.len(), |(idx, _)| *idx);
        let text = heading_of(lines[start])
            .map(|(_, t)| t.to_string())
            .unwrap_or_default();
        if let Some(chunk) = build_chunk(lines, kinds, start..end, Some((level, text))) {
            chunks.push(chunk);
        }
    }
    chunks
}
