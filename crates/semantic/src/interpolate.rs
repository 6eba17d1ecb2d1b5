use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde_json::{Map, Value};

static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{(\w+)\}").expect("valid placeholder pattern"));

fn render(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Replace `{key}` with the value from `params`, else from `result`.
/// Placeholders found in neither are left as written.
pub fn interpolate(template: &str, params: &Map<String, Value>, result: Option<&Value>) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures<'_>| {
            let key = &caps[1];
            params
                .get(key)
                .and_then(render)
                .or_else(|| result.and_then(|r| r.get(key)).and_then(render))
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}
