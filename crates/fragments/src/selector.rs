use crate::types::{Strategy, StrategyChoice};

/// A resolved strategy and the reason it was picked
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub strategy: Strategy,
    pub reason: String,
}

impl Selection {
    /// Human-readable efficiency message, e.g. `Used proximity strategy: ...`
    pub fn message(&self) -> String {
        format!("Used {} strategy: {}", self.strategy, self.reason)
    }

    /// Hints describing the strategies that were not used
    pub fn alternatives(&self) -> Vec<String> {
        Strategy::ALL
            .into_iter()
            .filter(|s| *s != self.strategy)
            .map(|s| format!("strategy='{s}' suits {}", s.use_case()))
            .collect()
    }
}

/// Resolves `auto` into a concrete strategy from the query's word count
pub struct StrategySelector;

impl StrategySelector {
    /// `<= 2` words adaptive, `3` proximity, `>= 4` semantic
    #[must_use]
    pub const fn for_word_count(words: usize) -> Strategy {
        match words {
            0..=2 => Strategy::Adaptive,
            3 => Strategy::Proximity,
            _ => Strategy::Semantic,
        }
    }

    pub fn select(choice: StrategyChoice, query: &str) -> Selection {
        if let Some(strategy) = choice.fixed() {
            return Selection {
                strategy,
                reason: "requested explicitly".to_string(),
            };
        }

        let words = query.split_whitespace().count();
        let strategy = Self::for_word_count(words);
        let reason = match strategy {
            Strategy::Adaptive => format!(
                "short query ({words} words) favors precise paragraph matches"
            ),
            Strategy::Proximity => format!(
                "{words}-word query favors terms appearing close together"
            ),
            Strategy::Semantic => format!(
                "descriptive query ({words} words) favors whole topical sections"
            ),
        };
        log::debug!("Auto strategy resolved to {strategy} for {words} words");
        Selection { strategy, reason }
    }
}
