//! Application state shared across handlers.

use std::sync::{Arc, PoisonError, RwLock};

use cafebot_core::Menu;

use crate::config::SessionConfig;
use crate::db::DocumentStore;
use crate::gemini::TextGenerator;
use crate::sessions::SessionStore;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`. The live menu is swapped whole when a new
/// catalog is uploaded; turns already running keep the menu they started with.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    documents: Arc<dyn DocumentStore>,
    generator: Arc<dyn TextGenerator>,
    sessions: SessionStore,
    menu: RwLock<Arc<Menu>>,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Arguments
    ///
    /// * `documents` - Menu and order storage
    /// * `generator` - Text generator for free-form replies
    /// * `sessions` - Session store limits
    /// * `menu` - Catalog used for ordering until the next upload
    #[must_use]
    pub fn new(
        documents: Arc<dyn DocumentStore>,
        generator: Arc<dyn TextGenerator>,
        sessions: &SessionConfig,
        menu: Menu,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                documents,
                generator,
                sessions: SessionStore::new(sessions),
                menu: RwLock::new(Arc::new(menu)),
            }),
        }
    }

    /// Get a reference to the document store.
    #[must_use]
    pub fn documents(&self) -> &dyn DocumentStore {
        self.inner.documents.as_ref()
    }

    /// Get a reference to the text generator.
    #[must_use]
    pub fn generator(&self) -> &dyn TextGenerator {
        self.inner.generator.as_ref()
    }

    /// Get a reference to the session store.
    #[must_use]
    pub fn sessions(&self) -> &SessionStore {
        &self.inner.sessions
    }

    /// Snapshot of the catalog used for ordering.
    #[must_use]
    pub fn menu(&self) -> Arc<Menu> {
        self.inner
            .menu
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Swap in a new catalog for subsequent turns.
    pub fn replace_menu(&self, menu: Menu) {
        *self
            .inner
            .menu
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Arc::new(menu);
    }
}
