//! Visible-text extraction for fetched homepages.

use std::sync::LazyLock;

use regex::{Captures, Regex};

static HIDDEN_BLOCKS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?is)<script\b.*?</script\s*>|<style\b.*?</style\s*>|<noscript\b.*?</noscript\s*>|<svg\b.*?</svg\s*>",
    )
    .expect("valid hidden block regex")
});

static TAGS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<[^>]+>").expect("valid tags regex"));

static ENTITIES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)&(?:nbsp|amp|quot|#39);").expect("valid entity regex"));

/// Strip markup from raw HTML and return whitespace-collapsed plain text.
///
/// Script, style, noscript and svg blocks are dropped with their contents,
/// every other tag is replaced by a space, and the `&nbsp;`, `&amp;`,
/// `&quot;` and `&#39;` entities are decoded. Output is not truncated.
#[must_use]
pub fn extract_visible_text(html: &str) -> String {
    let without_blocks = HIDDEN_BLOCKS.replace_all(html, " ");
    let without_tags = TAGS.replace_all(&without_blocks, " ");
    let decoded = ENTITIES.replace_all(&without_tags, |caps: &Captures<'_>| {
        decode_entity(&caps[0])
    });

    decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn decode_entity(entity: &str) -> &'static str {
    match entity.to_ascii_lowercase().as_str() {
        "&nbsp;" => " ",
        "&amp;" => "&",
        "&quot;" => "\"",
        _ => "'",
    }
}
