use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Default number of fragments returned by a retrieval
pub const DEFAULT_MAX_FRAGMENTS: usize = 5;

/// Scoring algorithm requested by a caller
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyChoice {
    #[default]
    Auto,
    Adaptive,
    Proximity,
    Semantic,
}

impl StrategyChoice {
    /// The concrete strategy, unless the choice is deferred to query analysis
    #[must_use]
    pub const fn fixed(self) -> Option<Strategy> {
        match self {
            Self::Auto => None,
            Self::Adaptive => Some(Strategy::Adaptive),
            Self::Proximity => Some(Strategy::Proximity),
            Self::Semantic => Some(Strategy::Semantic),
        }
    }
}

impl FromStr for StrategyChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "auto" => Ok(Self::Auto),
            "adaptive" => Ok(Self::Adaptive),
            "proximity" => Ok(Self::Proximity),
            "semantic" => Ok(Self::Semantic),
            other => Err(format!(
                "Unknown strategy '{other}' (expected auto, adaptive, proximity or semantic)"
            )),
        }
    }
}

/// A resolved scoring algorithm
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Paragraph granularity, distinct-term coverage normalized by length
    Adaptive,
    /// Sentence-window granularity, tightest span covering every term
    Proximity,
    /// Heading-bounded chunks, term frequency plus heading bonus
    Semantic,
}

impl Strategy {
    pub const ALL: [Self; 3] = [Self::Adaptive, Self::Proximity, Self::Semantic];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Adaptive => "adaptive",
            Self::Proximity => "proximity",
            Self::Semantic => "semantic",
        }
    }

    /// When a caller should prefer this strategy
    #[must_use]
    pub const fn use_case(self) -> &'static str {
        match self {
            Self::Adaptive => "short keyword lookups that need precise paragraphs",
            Self::Proximity => "phrases whose words should appear close together",
            Self::Semantic => "descriptive questions answered by whole sections",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Dominant content of a heading-bounded chunk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChunkType {
    Heading,
    List,
    Code,
    Quote,
    Table,
    Paragraph,
}

/// A scored excerpt of a document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fragment {
    pub content: String,

    /// First line of the excerpt (1-indexed)
    pub line_start: usize,

    /// Last line of the excerpt (1-indexed, inclusive)
    pub line_end: usize,

    pub score: f64,

    pub doc_path: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<FragmentMetadata>,
}

/// Provenance attached to every fragment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FragmentMetadata {
    pub doc_id: String,
    pub strategy: Strategy,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chunk_type: Option<ChunkType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heading: Option<String>,
}

impl FragmentMetadata {
    #[must_use]
    pub fn new(doc_id: impl Into<String>, strategy: Strategy) -> Self {
        Self {
            doc_id: doc_id.into(),
            strategy,
            chunk_type: None,
            heading: None,
        }
    }

    #[must_use]
    pub const fn chunk_type(mut self, chunk_type: ChunkType) -> Self {
        self.chunk_type = Some(chunk_type);
        self
    }

    #[must_use]
    pub fn heading(mut self, heading: Option<String>) -> Self {
        self.heading = heading;
        self
    }
}

/// Knobs for a single retrieval
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetrievalOptions {
    pub strategy: StrategyChoice,
    pub max_fragments: usize,
    /// Restrict retrieval to these documents; `None` searches the whole index
    pub doc_ids: Option<Vec<String>>,
}

impl Default for RetrievalOptions {
    fn default() -> Self {
        Self {
            strategy: StrategyChoice::Auto,
            max_fragments: DEFAULT_MAX_FRAGMENTS,
            doc_ids: None,
        }
    }
}

impl RetrievalOptions {
    #[must_use]
    pub const fn strategy(mut self, strategy: StrategyChoice) -> Self {
        self.strategy = strategy;
        self
    }

    #[must_use]
    pub const fn max_fragments(mut self, max: usize) -> Self {
        self.max_fragments = max;
        self
    }

    #[must_use]
    pub fn scoped_to(mut self, doc_id: impl Into<String>) -> Self {
        self.doc_ids.get_or_insert_with(Vec::new).push(doc_id.into());
        self
    }
}
