//! Lazily constructed, resettable handle to the configured store.

use super::RecipeStore;
use crate::config::Config;
use crate::error::AppError;
use std::sync::{Arc, Mutex, MutexGuard};

struct SelectorState {
    config: Config,
    cached: Option<Arc<RecipeStore>>,
}

/// Builds the configured [`RecipeStore`] at most once and hands out shared
/// handles to it until [`StoreSelector::reset`] is called.
pub struct StoreSelector {
    state: Mutex<SelectorState>,
}

impl StoreSelector {
    pub fn new(config: Config) -> Self {
        Self {
            state: Mutex::new(SelectorState {
                config,
                cached: None,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, SelectorState> {
        // The state is always left consistent, so a poisoned lock is safe to reuse.
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Return the cached store, constructing it on first use.
    ///
    /// Construction happens under the selector lock, so concurrent first
    /// callers still build the store only once.
    ///
    /// # Errors
    /// Propagates any error from [`RecipeStore::open`]; nothing is cached then.
    pub fn store(&self) -> Result<Arc<RecipeStore>, AppError> {
        let mut state = self.lock();
        if let Some(store) = state.cached.as_ref() {
            return Ok(Arc::clone(store));
        }
        let store = Arc::new(RecipeStore::open(&state.config)?);
        tracing::info!("Recipe store initialized ({})", store.backend().as_str());
        state.cached = Some(Arc::clone(&store));
        Ok(store)
    }

    /// Drop the cached store; the next [`StoreSelector::store`] call rebuilds it.
    ///
    /// Handles already given out stay valid.
    pub fn reset(&self) {
        self.lock().cached = None;
    }

    /// Replace the configuration and drop the cached store.
    pub fn reset_with(&self, config: Config) {
        let mut state = self.lock();
        state.config = config;
        state.cached = None;
    }

    pub fn is_initialized(&self) -> bool {
        self.lock().cached.is_some()
    }
}
