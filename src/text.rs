//! Plain-text normalization for scraped fragments.
//!
//! Upstream titles and excerpts arrive wrapped in markup and sprinkled with
//! character entities. [`normalize`] reduces any such fragment to clean
//! single-spaced text. It never fails: input that is not markup at all
//! simply comes out whitespace-collapsed.

use once_cell::sync::Lazy;
use regex::Regex;

static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").unwrap());
static WS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// The entity set WordPress actually emits in rendered titles and excerpts.
/// Decoded after tag removal so `&lt;b&gt;` does not resurrect as a tag.
const ENTITIES: [(&str, &str); 6] = [
    ("&nbsp;", " "),
    ("&quot;", "\""),
    ("&#039;", "'"),
    ("&lt;", "<"),
    ("&gt;", ">"),
    ("&amp;", "&"),
];

/// Strip markup tags, decode the fixed entity set, collapse whitespace runs
/// to a single space, and trim.
///
/// Idempotent: `normalize(normalize(s)) == normalize(s)`.
pub fn normalize(raw: &str) -> String {
    if raw.is_empty() {
        return String::new();
    }
    let mut text = TAG_RE.replace_all(raw, " ").into_owned();
    for (entity, plain) in ENTITIES {
        if text.contains(entity) {
            text = text.replace(entity, plain);
        }
    }
    WS_RE.replace_all(&text, " ").trim().to_string()
}
