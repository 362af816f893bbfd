//! In-memory chat sessions.
//!
//! Sessions live in a `moka` cache keyed by the client-supplied session ID.
//! The cache is unbounded and never expires entries unless a cap or an idle
//! timeout is configured. Each entry is an `Arc<Mutex<Session>>`: a request holds the
//! lock for its whole turn, so two requests on the same session run one after
//! the other while different sessions never wait on each other.

use std::sync::Arc;

use moka::future::Cache;
use tokio::sync::Mutex;
use tracing::debug;

use cafebot_core::{Session, SessionId};

use crate::config::SessionConfig;

/// A session shared between concurrent requests.
pub type SharedSession = Arc<Mutex<Session>>;

/// Errors from session operations.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("session not found: {0}")]
    NotFound(SessionId),
}

/// Store of live sessions.
#[derive(Clone)]
pub struct SessionStore {
    cache: Cache<SessionId, SharedSession>,
}

impl SessionStore {
    /// Create a store with the given limits.
    #[must_use]
    pub fn new(config: &SessionConfig) -> Self {
        let mut builder = Cache::builder();
        if let Some(cap) = config.max_sessions {
            builder = builder.max_capacity(cap);
        }
        if let Some(idle) = config.idle_timeout {
            builder = builder.time_to_idle(idle);
        }

        Self {
            cache: builder.build(),
        }
    }

    /// Look up an existing session.
    pub async fn get(&self, id: &SessionId) -> Option<SharedSession> {
        self.cache.get(id).await
    }

    /// Look up a session, creating a guest session if there is none.
    pub async fn get_or_create(&self, id: &SessionId) -> SharedSession {
        self.cache
            .get_with_by_ref(id, async {
                debug!(session_id = %id, "Creating guest session");
                Arc::new(Mutex::new(Session::guest()))
            })
            .await
    }

    /// Set the customer details on a session, creating it if needed.
    ///
    /// An existing cart is kept. A receipt issued under the old details is
    /// not reissued.
    pub async fn upsert_customer(
        &self,
        id: &SessionId,
        customer_name: &str,
        customer_phone: &str,
    ) -> SharedSession {
        let shared = self.get_or_create(id).await;
        {
            let mut session = shared.lock().await;
            session.customer_name = customer_name.to_string();
            session.customer_phone = customer_phone.to_string();
            session.last_receipt_generated = false;
        }
        shared
    }

    /// Empty a session's cart.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotFound` if no such session exists.
    pub async fn clear_cart(&self, id: &SessionId) -> Result<(), SessionError> {
        let shared = self
            .get(id)
            .await
            .ok_or_else(|| SessionError::NotFound(id.clone()))?;
        shared.lock().await.clear_cart();
        Ok(())
    }

    /// Remove a session.
    pub async fn delete(&self, id: &SessionId) {
        self.cache.invalidate(id).await;
    }

    /// Approximate number of live sessions.
    #[must_use]
    pub fn len(&self) -> u64 {
        self.cache.entry_count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[cfg(test)]
    async fn run_pending_tasks(&self) {
        self.cache.run_pending_tasks().await;
    }
}
