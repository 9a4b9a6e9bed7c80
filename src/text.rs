//! Heuristic text extraction from page source or rendered HTML.
//!
//! This is a lossy tag-stripping approximation, not a markup parser. It is
//! shared by static content checks and the live crawler so both measure
//! text the same way.

use regex::Regex;
use std::sync::LazyLock;

static SCRIPT_STYLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<script\b[^>]*>.*?</script\s*>|<style\b[^>]*>.*?</style\s*>")
        .expect("script/style regex")
});
static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<[^>]+>").expect("tag regex"));
static WS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("whitespace regex"));
static H1: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)<h1[\s>]").expect("h1 regex"));
static LD_JSON: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)application/ld\+json").expect("ld+json regex"));

/// Tokens that survive tag stripping in JSX sources but are not prose.
const CODE_TOKENS: [&str; 12] = [
    "import",
    "export",
    "from",
    "default",
    "const",
    "return",
    "function",
    "async",
    "await",
    "classname",
    "true",
    "false",
];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStats {
    pub text_len: usize,
    pub total_len: usize,
    pub ratio: f64,
    pub words: usize,
}

/// Strip script/style blocks and tags, collapsing whitespace.
pub fn extract_text(src: &str) -> String {
    let no_blocks = SCRIPT_STYLE.replace_all(src, " ");
    let no_tags = TAG.replace_all(&no_blocks, " ");
    WS.replace_all(&no_tags, " ").trim().to_string()
}

/// Words longer than two letters, ignoring residual code tokens.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace()
        .filter(|tok| !tok.contains(['/', '=', '{', '}', '(', ')', ';', '<', '>']))
        .map(|tok| tok.trim_matches(|c: char| !c.is_alphanumeric()))
        .filter(|w| w.chars().count() > 2)
        .filter(|w| w.chars().all(|c| c.is_alphabetic() || c == '\'' || c == '-'))
        .filter(|w| !CODE_TOKENS.contains(&w.to_lowercase().as_str()))
        .count()
}

pub fn analyze(src: &str) -> TextStats {
    let text = extract_text(src);
    let total_len = src.len();
    let ratio = if total_len == 0 {
        0.0
    } else {
        text.len() as f64 / total_len as f64
    };
    TextStats {
        text_len: text.len(),
        total_len,
        ratio,
        words: word_count(&text),
    }
}

pub fn count_h1(src: &str) -> usize {
    H1.find_iter(src).count()
}

pub fn has_structured_data(src: &str) -> bool {
    LD_JSON.is_match(src)
}
