//! Quantity and item phrase extraction.
//!
//! A message is split into fragments on `and` and commas. Each fragment is
//! stripped of conversational filler ("i want", "please", ...) and then read
//! as either `<n> <phrase>` or `<phrase> x<n>`. The trailing multiplier wins
//! when both are present. A fragment without a number orders one.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

/// Fragment separators: the word "and", or a comma.
static SPLIT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+and\s+|\s*,\s*").expect("Invalid regex"));

/// `2 cheese burger`
static LEADING_QUANTITY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)\s+(.*)").expect("Invalid regex"));

/// `cheese burger x2`
static TRAILING_MULTIPLIER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.*)\s*[xX×]\s*(\d+)").expect("Invalid regex"));

/// Leading words that carry no item information.
const FILLER_WORDS: &[&str] = &[
    "i", "i'd", "i'll", "id", "we", "we'd", "want", "wanna", "would", "like", "to", "order", "get",
    "have", "can", "could", "may", "please", "me", "us", "some", "also", "plus", "a", "an", "the",
];

const TRAILING_PUNCTUATION: [char; 3] = ['.', '!', '?'];

/// An item phrase and how many of it were asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedItem {
    pub phrase: String,
    pub quantity: u32,
}

/// Split a message into trimmed, non-empty fragments.
#[must_use]
pub fn split_fragments(message: &str) -> Vec<&str> {
    SPLIT_RE
        .split(message)
        .map(str::trim)
        .filter(|fragment| !fragment.is_empty())
        .collect()
}

/// Parse a single fragment.
///
/// Returns `None` when nothing is left after filler stripping, or when the
/// requested quantity is zero.
#[must_use]
pub fn parse_fragment(fragment: &str) -> Option<ParsedItem> {
    let stripped = strip_filler(fragment);

    let (mut phrase, mut quantity) = match LEADING_QUANTITY_RE.captures(&stripped) {
        Some(caps) => match caps[1].parse::<u32>() {
            Ok(quantity) => (caps[2].to_string(), quantity),
            Err(_) => (stripped.clone(), 1),
        },
        None => (stripped.clone(), 1),
    };

    if let Some(caps) = TRAILING_MULTIPLIER_RE.captures(&phrase)
        && let Ok(multiplier) = caps[2].parse::<u32>()
    {
        let residual = caps[1].trim().to_string();
        phrase = residual;
        quantity = multiplier;
    }

    let phrase = phrase.trim();
    if phrase.is_empty() || quantity == 0 {
        return None;
    }

    Some(ParsedItem {
        phrase: phrase.to_string(),
        quantity,
    })
}

/// Parse every fragment of a normalized message, skipping unusable ones.
#[must_use]
pub fn parse_message(message: &str) -> Vec<ParsedItem> {
    split_fragments(message)
        .into_iter()
        .filter_map(|fragment| {
            let parsed = parse_fragment(fragment);
            if parsed.is_none() {
                debug!(fragment, "Fragment has no orderable item");
            }
            parsed
        })
        .collect()
}

/// Drop leading filler words, trailing "please" and trailing punctuation.
fn strip_filler(fragment: &str) -> String {
    let mut words: Vec<&str> = fragment.split_whitespace().collect();

    while let Some(&last) = words.last() {
        let bare = last.trim_end_matches(TRAILING_PUNCTUATION);
        words.pop();
        if !bare.is_empty() && bare != "please" {
            words.push(bare);
            break;
        }
    }

    let start = words
        .iter()
        .position(|word| !FILLER_WORDS.contains(word))
        .unwrap_or(words.len());

    words[start..].join(" ")
}
