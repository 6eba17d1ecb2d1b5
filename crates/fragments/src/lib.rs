//! Fragment retrieval engine
//!
//! Returns the most relevant excerpts of indexed documents instead of whole files.
//!
//! ## Architecture
//!
//! ```text
//! index_document(doc_id, path, text)
//!        │
//!        ▼
//! ┌──────────────────────────────────────────┐
//! │ Document                                 │
//! │  paragraphs ── sentences                 │
//! │  heading-bounded chunks (typed)          │
//! └──────────────────────────────────────────┘
//!        │
//! retrieve_fragments(query, options)
//!        │
//!        ▼
//! StrategySelector (auto → by word count)
//!        │
//!   ┌────┴──────────┬───────────────┐
//!   ▼               ▼               ▼
//! adaptive      proximity       semantic
//! (paragraphs)  (sentence       (chunks, tf +
//!               windows)        heading bonus)
//!   └────┬──────────┴───────────────┘
//!        ▼
//! sort (score ↓, line ↑) → truncate → FragmentResponse
//! ```

mod document;
mod index;
mod response;
mod retriever;
mod selector;
mod strategy;
mod text;
mod types;

pub use document::{Chunk, Document, Paragraph, Sentence};
pub use index::DocumentIndex;
pub use response::{
    EfficiencyHints, FragmentContext, FragmentResponse, SuggestedAction, WorkflowHint,
};
pub use retriever::FragmentRetriever;
pub use selector::{Selection, StrategySelector};
pub use strategy::HEADING_BONUS;
pub use text::{terms_match, tokenize, QueryTerms};
pub use types::{
    ChunkType, Fragment, FragmentMetadata, RetrievalOptions, Strategy, StrategyChoice,
    DEFAULT_MAX_FRAGMENTS,
};
