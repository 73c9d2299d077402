//! Deterministic post-text normalization.
use regex::Regex;
use std::sync::LazyLock;

static URL: LazyLock<Regex> = LazyLock::new(|| compile(r"(?:http|www)\S*"));
static MENTION: LazyLock<Regex> = LazyLock::new(|| compile(r"@\w+"));
static HASHTAG: LazyLock<Regex> = LazyLock::new(|| compile(r"#\w+"));
static NON_ALPHA: LazyLock<Regex> = LazyLock::new(|| compile(r"[^a-z\s]"));
static SPACES: LazyLock<Regex> = LazyLock::new(|| compile(r"\s+"));

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| panic!("invalid built-in pattern {pattern:?}: {e}"))
}

/// Normalize a post for classification.
///
/// Lowercases, then removes URL, mention and hashtag tokens (in that order),
/// strips everything outside `[a-z]` and whitespace, and collapses runs of
/// whitespace to single spaces. The passes repeat until the text stops
/// changing, so `clean(clean(s)) == clean(s)` for every input.
///
/// ```
/// assert_eq!(pulse_sentiment::clean("PUMA shoes are bad @brand"), "puma shoes are bad");
/// assert_eq!(pulse_sentiment::clean("  "), "");
/// ```
pub fn clean(raw_text: &str) -> String {
    let mut current = single_pass(raw_text);
    loop {
        let next = single_pass(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

fn single_pass(text: &str) -> String {
    let lowered = text.to_lowercase();
    let no_urls = URL.replace_all(&lowered, "");
    let no_mentions = MENTION.replace_all(&no_urls, "");
    let no_tags = HASHTAG.replace_all(&no_mentions, "");
    // `\s` is Unicode-aware, so non-ASCII whitespace survives this step.
    let letters = NON_ALPHA.replace_all(&no_tags, "");
    SPACES.replace_all(&letters, " ").trim().to_string()
}
