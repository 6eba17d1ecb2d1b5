use once_cell::sync::Lazy;
use std::collections::HashSet;
use unicode_segmentation::UnicodeSegmentation;

/// Shortest term length that may match another term by prefix
const MIN_PREFIX_LEN: usize = 4;

static STOPWORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "a", "an", "and", "are", "as", "at", "be", "but", "by", "do", "for", "from", "has",
        "have", "how", "i", "if", "in", "into", "is", "it", "its", "of", "on", "or", "that",
        "the", "their", "this", "to", "was", "we", "were", "what", "when", "where", "which",
        "who", "why", "will", "with", "you",
    ]
    .into_iter()
    .collect()
});

/// Lower-cased unicode words of `text`
pub fn tokenize(text: &str) -> Vec<String> {
    text.unicode_words().map(str::to_lowercase).collect()
}

/// Two lower-cased terms refer to the same word.
///
/// Equal terms always match; otherwise the shorter one must be a prefix of the longer and at
/// least four characters long, so `recover` matches `recovery` but `tax` does not match `taxi`.
pub fn terms_match(a: &str, b: &str) -> bool {
    if a == b {
        return true;
    }
    let (short, long) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    short.chars().count() >= MIN_PREFIX_LEN && long.starts_with(short)
}

/// Distinct scoring terms of a query
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryTerms {
    terms: Vec<String>,
}

impl QueryTerms {
    /// Tokenize a query, drop duplicates and stopwords.
    ///
    /// A query made only of stopwords keeps them, so "what is this" still finds something.
    pub fn parse(query: &str) -> Self {
        let mut all: Vec<String> = Vec::new();
        for token in tokenize(query) {
            if !all.contains(&token) {
                all.push(token);
            }
        }
        let content: Vec<String> = all
            .iter()
            .filter(|t| !STOPWORDS.contains(t.as_str()))
            .cloned()
            .collect();
        Self {
            terms: if content.is_empty() { all } else { content },
        }
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Indices of every query term matching `token`.
    ///
    /// A token may stand for several terms: `recovery` covers both `recover` and `recovery`.
    pub fn positions<'a>(&'a self, token: &'a str) -> impl Iterator<Item = usize> + 'a {
        self.terms
            .iter()
            .enumerate()
            .filter(move |(_, t)| terms_match(t, token))
            .map(|(index, _)| index)
    }

    /// Number of distinct query terms present in `tokens`
    pub fn coverage(&self, tokens: &[String]) -> usize {
        self.terms
            .iter()
            .filter(|term| tokens.iter().any(|tok| terms_match(term, tok)))
            .count()
    }

    /// Number of `tokens` that match any query term
    pub fn frequency(&self, tokens: &[String]) -> usize {
        tokens
            .iter()
            .filter(|tok| self.positions(tok).next().is_some())
            .count()
    }
}
