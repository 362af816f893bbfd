//! Chat turn handling.
//!
//! A turn runs in three steps:
//! 1. Normalize the message and classify its intent
//! 2. Checkout issues a receipt, order mutates the cart
//! 3. Anything else is answered by the text generator
//!
//! External failures never escape a turn; they become a polite reply.

use tracing::{info, instrument, warn};

use cafebot_core::{Intent, Menu, Session};

use crate::chat::{apply_order, classify, is_termination_phrase, normalize, wants_to_finish};
use crate::db::DocumentStore;
use crate::gemini::{TextGenerator, build_prompt};
use crate::services::receipt::{ReceiptError, ReceiptService};

pub const EMPTY_CART_REPLY: &str = "Your cart is empty! Please order something first.";
pub const RECEIPT_FAILED_REPLY: &str = "I couldn't generate a receipt. Please try again.";
pub const IMPLICIT_CHECKOUT_PREFIX: &str = "Great! Here's your receipt:\n\n";
pub const EMPTY_GENERATION_REPLY: &str = "How may I help you?";
pub const GENERATION_FAILED_REPLY: &str =
    "Sorry, I encountered an error processing your request. Please try again.";
pub const CHECKOUT_NUDGE: &str =
    "\n\nWould you like to checkout now? Please say 'checkout' or 'done' to complete your order.";

/// The outcome of one chat turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatReply {
    pub response: String,
    pub has_receipt: bool,
    pub intent: Intent,
}

/// Chat service for one turn of the ordering conversation.
pub struct ChatService<'a> {
    menu: &'a Menu,
    documents: &'a dyn DocumentStore,
    generator: &'a dyn TextGenerator,
}

impl<'a> ChatService<'a> {
    /// Create a new chat service.
    #[must_use]
    pub const fn new(
        menu: &'a Menu,
        documents: &'a dyn DocumentStore,
        generator: &'a dyn TextGenerator,
    ) -> Self {
        Self {
            menu,
            documents,
            generator,
        }
    }

    /// Answer a customer message, updating their session.
    #[instrument(skip(self, session, message), fields(intent = tracing::field::Empty))]
    pub async fn respond(&self, session: &mut Session, message: &str) -> ChatReply {
        let normalized = normalize(message);
        let intent = classify(&normalized);
        tracing::Span::current().record("intent", intent.as_str());

        let (response, has_receipt) = match intent {
            Intent::Checkout => self.checkout(session, "").await,
            Intent::Order => {
                let outcome = apply_order(self.menu, session, &normalized);
                info!(
                    added = outcome.added.len(),
                    unmatched = outcome.unmatched.len(),
                    "Order applied"
                );
                (outcome.reply().to_string(), false)
            }
            Intent::Fallback => self.fallback(session, &normalized).await,
        };

        ChatReply {
            response,
            has_receipt,
            intent,
        }
    }

    async fn checkout(&self, session: &mut Session, prefix: &str) -> (String, bool) {
        match ReceiptService::new(self.documents).checkout(session).await {
            Ok(receipt) => (format!("{prefix}{}", receipt.text), true),
            Err(ReceiptError::EmptyCart) => (EMPTY_CART_REPLY.to_string(), false),
            Err(e @ ReceiptError::Store(_)) => {
                warn!(error = %e, "Checkout failed");
                (RECEIPT_FAILED_REPLY.to_string(), false)
            }
        }
    }

    async fn fallback(&self, session: &mut Session, normalized: &str) -> (String, bool) {
        // Termination phrases normally classify as checkout before reaching here.
        if is_termination_phrase(normalized) && !session.cart.is_empty() {
            return self.checkout(session, IMPLICIT_CHECKOUT_PREFIX).await;
        }

        let prompt = build_prompt(
            self.menu,
            &session.customer_name,
            normalized,
            &session.cart,
        );
        let mut response = match self.generator.generate(&prompt).await {
            Ok(text) if text.trim().is_empty() => EMPTY_GENERATION_REPLY.to_string(),
            Ok(text) => text,
            Err(e) => {
                warn!(error = %e, "Text generation failed");
                GENERATION_FAILED_REPLY.to_string()
            }
        };

        if !session.cart.is_empty() && wants_to_finish(normalized) {
            response.push_str(CHECKOUT_NUDGE);
        }

        (response, false)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use cafebot_core::{MenuItem, Order};

    use super::*;
    use crate::db::{MemoryDocumentStore, RepositoryError};
    use crate::gemini::{GeminiError, UnconfiguredGenerator};

    /// Generator that answers with fixed text and records prompts.
    #[derive(Default)]
    struct CannedGenerator {
        reply: String,
        prompts: Mutex<Vec<String>>,
    }

    impl CannedGenerator {
        fn new(reply: &str) -> Self {
            Self {
                reply: reply.to_string(),
                prompts: Mutex::default(),
            }
        }
    }

    #[async_trait]
    impl TextGenerator for CannedGenerator {
        async fn generate(&self, prompt: &str) -> Result<String, GeminiError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            Ok(self.reply.clone())
        }
    }

    /// Store whose writes always fail.
    struct BrokenStore;

    #[async_trait]
    impl DocumentStore for BrokenStore {
        async fn replace_menu(&self, _menu: &Menu) -> Result<(), RepositoryError> {
            Err(RepositoryError::DataCorruption("broken".to_string()))
        }

        async fn find_menu(&self) -> Result<Menu, RepositoryError> {
            Err(RepositoryError::DataCorruption("broken".to_string()))
        }

        async fn insert_order(&self, _order: &Order) -> Result<(), RepositoryError> {
            Err(RepositoryError::DataCorruption("broken".to_string()))
        }

        async fn find_orders(&self) -> Result<Vec<Order>, RepositoryError> {
            Err(RepositoryError::DataCorruption("broken".to_string()))
        }

        async fn ping(&self) -> Result<(), RepositoryError> {
            Err(RepositoryError::DataCorruption("broken".to_string()))
        }
    }

    #[tokio::test]
    async fn test_order_then_checkout() {
        let menu = Menu::builtin();
        let store = MemoryDocumentStore::new();
        let service = ChatService::new(&menu, &store, &UnconfiguredGenerator);
        let mut session = Session::new("Ali", "0300");

        let reply = service
            .respond(&mut session, "I want 2 cheese burger and fries")
            .await;
        assert_eq!(reply.intent, Intent::Order);
        assert_eq!(reply.response, crate::chat::ordering::ITEMS_ADDED_REPLY);
        assert!(!reply.has_receipt);

        let reply = service.respond(&mut session, "checkout").await;
        assert_eq!(reply.intent, Intent::Checkout);
        assert!(reply.has_receipt);
        assert!(reply.response.starts_with("Receipt for Ali (0300):"));
        assert!(reply.response.contains("Total: $43"));

        let orders = store.find_orders().await.unwrap();
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].total, 43);
    }

    #[tokio::test]
    async fn test_checkout_with_empty_cart() {
        let menu = Menu::builtin();
        let store = MemoryDocumentStore::new();
        let service = ChatService::new(&menu, &store, &UnconfiguredGenerator);
        let mut session = Session::guest();

        let reply = service.respond(&mut session, "done").await;

        assert_eq!(reply.response, EMPTY_CART_REPLY);
        assert!(!reply.has_receipt);
        assert_eq!(store.order_count().await, 0);
    }

    #[tokio::test]
    async fn test_termination_phrase_checks_out() {
        let menu = Menu::builtin();
        let store = MemoryDocumentStore::new();
        let service = ChatService::new(&menu, &store, &UnconfiguredGenerator);
        let mut session = Session::guest();
        session.cart.add(&MenuItem::new("Regular Drink", 7), 1);

        let reply = service.respond(&mut session, "No, that\u{2019}s all").await;

        assert_eq!(reply.intent, Intent::Checkout);
        assert!(reply.has_receipt);
        assert!(reply.response.contains("Regular Drink x1 = $7"));
    }

    #[tokio::test]
    async fn test_store_failure_degrades() {
        let menu = Menu::builtin();
        let service = ChatService::new(&menu, &BrokenStore, &UnconfiguredGenerator);
        let mut session = Session::guest();
        session.cart.add(&MenuItem::new("Regular Drink", 7), 1);

        let reply = service.respond(&mut session, "checkout").await;

        assert_eq!(reply.response, RECEIPT_FAILED_REPLY);
        assert!(!reply.has_receipt);
        assert!(!session.last_receipt_generated);
        assert!(session.last_order.is_none());
    }

    #[tokio::test]
    async fn test_fallback_uses_generator() {
        let menu = Menu::builtin();
        let store = MemoryDocumentStore::new();
        let generator = CannedGenerator::new("We have great burgers!");
        let service = ChatService::new(&menu, &store, &generator);
        let mut session = Session::new("Ali", "0300");

        let reply = service.respond(&mut session, "What is good here?").await;

        assert_eq!(reply.intent, Intent::Fallback);
        assert_eq!(reply.response, "We have great burgers!");
        let prompts = generator.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("Customer Ali says: what is good here?"));
    }

    #[tokio::test]
    async fn test_empty_generation_gets_default_reply() {
        let menu = Menu::builtin();
        let store = MemoryDocumentStore::new();
        let generator = CannedGenerator::new("   ");
        let service = ChatService::new(&menu, &store, &generator);
        let mut session = Session::guest();

        let reply = service.respond(&mut session, "hello").await;

        assert_eq!(reply.response, EMPTY_GENERATION_REPLY);
    }

    #[tokio::test]
    async fn test_generator_failure_degrades() {
        let menu = Menu::builtin();
        let store = MemoryDocumentStore::new();
        let service = ChatService::new(&menu, &store, &UnconfiguredGenerator);
        let mut session = Session::guest();

        let reply = service.respond(&mut session, "hello").await;

        assert_eq!(reply.intent, Intent::Fallback);
        assert_eq!(reply.response, GENERATION_FAILED_REPLY);
        assert!(!reply.has_receipt);
    }
}
