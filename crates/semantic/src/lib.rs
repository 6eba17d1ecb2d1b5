//! Semantic operation router for a markdown vault
//!
//! Takes `{operation, action, params}` requests, runs them against a
//! [`VaultStore`](vault_store::VaultStore), and returns the result enriched with
//! session context, workflow suggestions and efficiency hints.
//!
//! ## Request flow
//!
//! ```text
//! route(request)
//!   │
//!   ├─ SessionContext::record_attempt      (kept even if the request fails)
//!   ├─ Route::resolve ─► handler           (vault / edit / view / workflow / system)
//!   ├─ StateTokenManager::update_tokens    (actual outcome)
//!   └─ enrichment
//!        hints from WorkflowConfig ─► conditions ─► requires_tokens ─► interpolate
//!        efficiency rules
//!        success: {result, context, workflow?, efficiency_hints?}
//!        failure: {result: null, context, error{code, message, recovery_hints}}
//! ```

mod conditions;
mod config;
mod context;
mod efficiency;
mod error;
mod handlers;
mod interpolate;
mod markdown;
mod params;
mod response;
mod route;
mod router;
mod tokens;

pub use conditions::{Condition, ConditionInput};
pub use config::{
    ActionConfig, ConditionalSuggestions, ContextTriggers, EfficiencyRule, HintBlock,
    OperationConfig, SuggestionTemplate, WorkflowConfig,
};
pub use context::{ContextSnapshot, PreviousRequest, SessionContext, SEARCH_HISTORY_LIMIT};
pub use efficiency::{EfficiencyRules, RuleInput};
pub use error::{Result, RouterError};
pub use interpolate::interpolate;
pub use markdown::{extract_links, extract_tags};
pub use params::{file_stem, parent_directory, Params};
pub use response::{ErrorInfo, SemanticRequest, SemanticResponse};
pub use route::{Operation, Route};
pub use router::SemanticRouter;
pub use tokens::{Requirement, StateTokenManager, StateTokens, FILE_HISTORY_LIMIT};
