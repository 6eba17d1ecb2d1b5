use once_cell::sync::Lazy;
use regex::Regex;

// [[target]], [[target|alias]], [[target#heading]]
static WIKI_LINK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\[\[([^\]|#]+)(?:#[^\]|]*)?(?:\|[^\]]*)?\]\]").expect("valid wiki link pattern")
});

static TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:^|[\s(])(#[\p{L}\p{N}_][\p{L}\p{N}_/-]*)").expect("valid tag pattern")
});

fn push_unique(out: &mut Vec<String>, value: &str) {
    if !out.iter().any(|v| v == value) {
        out.push(value.to_string());
    }
}

/// Wiki link targets in order of first appearance
pub fn extract_links(content: &str) -> Vec<String> {
    let mut links = Vec::new();
    for caps in WIKI_LINK.captures_iter(content) {
        if let Some(target) = caps.get(1) {
            let target = target.as_str().trim();
            if !target.is_empty() {
                push_unique(&mut links, target);
            }
        }
    }
    links
}

/// Inline `#tags` (with the leading `#`); headings are not tags
pub fn extract_tags(content: &str) -> Vec<String> {
    let mut tags = Vec::new();
    for caps in TAG.captures_iter(content) {
        if let Some(tag) = caps.get(1) {
            push_unique(&mut tags, tag.as_str());
        }
    }
    tags
}
