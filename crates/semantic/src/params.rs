use crate::error::{Result, RouterError};
use serde_json::{Map, Value};

/// Typed read access to request parameters
#[derive(Debug, Clone, Copy)]
pub struct Params<'a> {
    map: &'a Map<String, Value>,
}

impl<'a> Params<'a> {
    pub fn new(map: &'a Map<String, Value>) -> Self {
        Self { map }
    }

    pub fn raw(&self) -> &'a Map<String, Value> {
        self.map
    }

    /// Non-blank string parameter
    pub fn str(&self, key: &str) -> Option<&'a str> {
        self.map
            .get(key)
            .and_then(Value::as_str)
            .filter(|s| !s.trim().is_empty())
    }

    /// String parameter that may be empty (e.g. replacement text)
    pub fn text(&self, key: &str) -> Option<&'a str> {
        self.map.get(key).and_then(Value::as_str)
    }

    pub fn require_str(&self, key: &str) -> Result<&'a str> {
        self.str(key)
            .ok_or_else(|| RouterError::validation(format!("Missing required parameter '{key}'")))
    }

    pub fn require_text(&self, key: &str) -> Result<&'a str> {
        self.text(key)
            .ok_or_else(|| RouterError::validation(format!("Missing required parameter '{key}'")))
    }

    /// Boolean flag; accepts `true` or `"true"`
    pub fn flag(&self, key: &str) -> bool {
        match self.map.get(key) {
            Some(Value::Bool(b)) => *b,
            Some(Value::String(s)) => s.eq_ignore_ascii_case("true"),
            _ => false,
        }
    }

    /// Non-negative integer; accepts numbers and numeric strings
    pub fn usize(&self, key: &str) -> Result<Option<usize>> {
        let Some(value) = self.map.get(key) else {
            return Ok(None);
        };
        let parsed = match value {
            Value::Null => return Ok(None),
            Value::Number(n) => n.as_u64().and_then(|n| usize::try_from(n).ok()),
            Value::String(s) => s.trim().parse::<usize>().ok(),
            _ => None,
        };
        parsed.map(Some).ok_or_else(|| {
            RouterError::validation(format!(
                "Parameter '{key}' must be a non-negative integer, got {value}"
            ))
        })
    }

    pub fn f64(&self, key: &str) -> Result<Option<f64>> {
        match self.map.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Number(n)) => Ok(n.as_f64()),
            Some(other) => Err(RouterError::validation(format!(
                "Parameter '{key}' must be a number, got {other}"
            ))),
        }
    }
}

/// Parent directory of a vault path; the root is `/`
pub fn parent_directory(path: &str) -> String {
    let trimmed = path.trim().trim_end_matches('/');
    match trimmed.rsplit_once('/') {
        Some((parent, _)) if !parent.trim_matches('/').is_empty() => {
            parent.trim_start_matches('/').to_string()
        }
        _ => "/".to_string(),
    }
}

/// File name without directory or `.md` extension
pub fn file_stem(path: &str) -> String {
    let name = path.trim_end_matches('/').rsplit('/').next().unwrap_or(path);
    name.strip_suffix(".md").unwrap_or(name).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn typed_accessors() {
        let map = json!({"path": "a.md", "blank": "  ", "page": "2", "n": 3, "bad": -1, "full": true})
            .as_object()
            .cloned()
            .unwrap();
        let params = Params::new(&map);
        assert_eq!(params.str("path"), Some("a.md"));
        assert_eq!(params.str("blank"), None);
        assert_eq!(params.text("blank"), Some("  "));
        assert_eq!(params.usize("page").unwrap(), Some(2));
        assert_eq!(params.usize("n").unwrap(), Some(3));
        assert!(params.usize("bad").is_err());
        assert!(params.flag("full"));
        assert!(params.require_str("missing").is_err());
    }

    #[test]
    fn derived_path_parts() {
        assert_eq!(parent_directory("path/to/non-existent"), "path/to");
        assert_eq!(parent_directory("note.md"), "/");
        assert_eq!(parent_directory("/daily/2024-01-05.md"), "daily");
        assert_eq!(file_stem("daily/2024-01-05.md"), "2024-01-05");
        assert_eq!(file_stem("readme"), "readme");
    }
}
