use regex::Regex;
use serde_json::{Map, Value};
use std::str::FromStr;

/// Predicate gating a group of suggestions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Condition {
    Always,
    HasResults,
    NoResults,
    HasLinks,
    HasTags,
    HasMarkdownFiles,
    IsDailyNote,
    HasBuffer,
}

impl FromStr for Condition {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "always" => Ok(Self::Always),
            "has_results" => Ok(Self::HasResults),
            "no_results" => Ok(Self::NoResults),
            "has_links" => Ok(Self::HasLinks),
            "has_tags" => Ok(Self::HasTags),
            "has_markdown_files" => Ok(Self::HasMarkdownFiles),
            "is_daily_note" => Ok(Self::IsDailyNote),
            "has_buffer" => Ok(Self::HasBuffer),
            other => Err(format!("Unknown condition '{other}'")),
        }
    }
}

/// Everything a condition may look at
pub struct ConditionInput<'a> {
    pub params: &'a Map<String, Value>,
    pub result: Option<&'a Value>,
    pub daily_note: Option<&'a Regex>,
    pub buffer_available: bool,
}

fn non_empty_array(value: Option<&Value>) -> bool {
    value
        .and_then(Value::as_array)
        .is_some_and(|items| !items.is_empty())
}

impl Condition {
    /// Evaluate a condition by name; unknown names are false
    pub fn evaluate_named(name: &str, input: &ConditionInput<'_>) -> bool {
        name.parse::<Self>()
            .map(|condition| condition.evaluate(input))
            .unwrap_or(false)
    }

    pub fn evaluate(self, input: &ConditionInput<'_>) -> bool {
        let result = input.result.filter(|r| !r.is_null());
        let field = |key: &str| result.and_then(|r| r.get(key));
        match self {
            Self::Always => true,
            Self::HasResults => {
                non_empty_array(field("results"))
                    || field("totalResults")
                        .and_then(Value::as_u64)
                        .is_some_and(|n| n > 0)
            }
            Self::NoResults => match result {
                None => true,
                Some(_) => {
                    field("results")
                        .and_then(Value::as_array)
                        .is_some_and(Vec::is_empty)
                        && field("totalResults").and_then(Value::as_u64) == Some(0)
                }
            },
            Self::HasLinks => non_empty_array(field("links")),
            Self::HasTags => non_empty_array(field("tags")),
            Self::HasMarkdownFiles => result
                .and_then(Value::as_array)
                .is_some_and(|files| {
                    files
                        .iter()
                        .filter_map(Value::as_str)
                        .any(|f| f.ends_with(".md"))
                }),
            Self::IsDailyNote => {
                match (input.daily_note, input.params.get("path").and_then(Value::as_str)) {
                    (Some(pattern), Some(path)) => pattern.is_match(path),
                    _ => false,
                }
            }
            Self::HasBuffer => input.buffer_available,
        }
    }
}
