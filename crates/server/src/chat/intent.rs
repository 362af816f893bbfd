//! Keyword intent classification.
//!
//! Classification is a pure function of the normalized message. Rules are
//! checked in order and the first one that matches wins:
//!
//! 1. [`Intent::Checkout`] - a checkout keyword, or a "that's all" style phrase
//! 2. [`Intent::Order`] - an ordering keyword or a menu category word
//! 3. [`Intent::Fallback`] - everything else

use std::sync::LazyLock;

use regex::Regex;

use cafebot_core::Intent;

/// Substrings that request a receipt.
pub const CHECKOUT_KEYWORDS: &[&str] = &[
    "checkout", "receipt", "bill", "done", "finish", "complete", "pay",
];

/// Substrings that indicate the customer is ordering.
pub const ORDER_KEYWORDS: &[&str] = &["order", "want", "get", "have", "burger", "fries", "drink"];

/// Substrings that suggest the customer is wrapping up.
pub const COMPLETION_KEYWORDS: &[&str] = &["finish", "done", "complete", "that's all"];

/// Phrases meaning "nothing more, thanks".
static TERMINATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(no|nope|that's all|that is all|that's it|that is it)\b")
        .expect("Invalid regex")
});

/// Lowercase and trim a message, and fold typographic apostrophes.
#[must_use]
pub fn normalize(message: &str) -> String {
    message.trim().to_lowercase().replace('\u{2019}', "'")
}

/// Classify a normalized message.
#[must_use]
pub fn classify(normalized: &str) -> Intent {
    if contains_any(normalized, CHECKOUT_KEYWORDS) || is_termination_phrase(normalized) {
        Intent::Checkout
    } else if contains_any(normalized, ORDER_KEYWORDS) {
        Intent::Order
    } else {
        Intent::Fallback
    }
}

/// Whether the message says the customer wants nothing more.
#[must_use]
pub fn is_termination_phrase(normalized: &str) -> bool {
    TERMINATION_RE.is_match(normalized)
}

/// Whether the message hints the customer is trying to finish.
#[must_use]
pub fn wants_to_finish(normalized: &str) -> bool {
    contains_any(normalized, COMPLETION_KEYWORDS)
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| haystack.contains(needle))
}
