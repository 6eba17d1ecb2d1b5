use nucleo_matcher::pattern::{CaseMatching, Normalization, Pattern};
use nucleo_matcher::{Config, Matcher, Utf32String};

/// Fuzzy matching of a query against vault file paths using nucleo-matcher
pub struct PathMatcher {
    matcher: Matcher,
}

impl PathMatcher {
    pub fn new() -> Self {
        Self {
            matcher: Matcher::new(Config::DEFAULT.match_paths()),
        }
    }

    /// Rank `paths` against `query`.
    /// Returns (path, score) sorted by score descending, scores normalized to the best hit
    pub fn rank(&mut self, query: &str, paths: &[String], limit: usize) -> Vec<(String, f32)> {
        let pattern = Pattern::parse(query, CaseMatching::Smart, Normalization::Smart);

        let mut scored: Vec<(usize, u32)> = paths
            .iter()
            .enumerate()
            .filter_map(|(idx, path)| {
                let haystack = Utf32String::from(path.as_str());
                let score = pattern.score(haystack.slice(..), &mut self.matcher)?;
                Some((idx, score))
            })
            .collect();

        // Stable sort keeps listing order among equal scores
        scored.sort_by(|a, b| b.1.cmp(&a.1));
        scored.truncate(limit);

        let max_score = scored.first().map_or(1.0, |(_, s)| *s as f32);
        scored
            .into_iter()
            .map(|(idx, score)| {
                let normalized = if max_score > 0.0 {
                    score as f32 / max_score
                } else {
                    0.0
                };
                (paths[idx].clone(), normalized)
            })
            .collect()
    }
}

impl Default for PathMatcher {
    fn default() -> Self {
        Self::new()
    }
}
