//! Business logic services.
//!
//! # Services
//!
//! - `chat` - One turn of the ordering conversation
//! - `receipt` - Checkout, order persistence and receipt text

pub mod chat;
pub mod receipt;

pub use chat::{ChatReply, ChatService};
pub use receipt::{Receipt, ReceiptError, ReceiptService, format_receipt};
