//! Message understanding for the ordering chat.
//!
//! Everything here is synchronous and side-effect free apart from the cart
//! mutation in [`ordering::apply_order`]. The async turn handling that talks to
//! storage and the language model lives in [`crate::services::chat`].

pub mod intent;
pub mod ordering;
pub mod parser;

pub use intent::{classify, is_termination_phrase, normalize, wants_to_finish};
pub use ordering::{OrderOutcome, apply_order};
pub use parser::{ParsedItem, parse_fragment, parse_message, split_fragments};
