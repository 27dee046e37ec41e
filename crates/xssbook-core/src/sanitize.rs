//! Content filters for user-written post and comment bodies.
//!
//! These are deliberately weak. Each filter matches literal, case-sensitive
//! substrings in a single pass, so mixed-case tags, attributes and nested
//! fragments pass through. The site exists to practise against exactly
//! these gaps, so the behavior here must not be tightened.

use xssbook_types::post::SanitizerKind;

const BLACKLIST: [&str; 4] = ["<script>", "</script>", "<iframe>", "</iframe>"];

/// Remove exact `<script>` and `</script>` tags.
pub fn basic(content: &str) -> String {
    content.replace("<script>", "").replace("</script>", "")
}

/// Escape `<` and `>`. Quotes and ampersands are left alone.
pub fn partial(content: &str) -> String {
    content.replace('<', "&lt;").replace('>', "&gt;")
}

/// Remove each blacklisted tag in turn.
pub fn blacklist(content: &str) -> String {
    BLACKLIST
        .iter()
        .fold(content.to_owned(), |acc, tag| acc.replace(tag, ""))
}

/// Run the filter selected by `kind`.
pub fn apply(kind: SanitizerKind, content: &str) -> String {
    match kind {
        SanitizerKind::None => content.to_owned(),
        SanitizerKind::Basic => basic(content),
        SanitizerKind::Partial => partial(content),
        SanitizerKind::Blacklist => blacklist(content),
    }
}
