//! A model history bound to its store for its whole lifetime.

use bevy::log::error;

use super::model_history::{ModelHistory, RestoreOutcome};
use crate::scene::{ObjectStore, StoreError};

/// A [`ModelHistory`] that owns its store handle and clears itself on drop,
/// so archived clones can never outlive it.
///
/// Use `ScopedHistory<&mut S>` to borrow a store for the scope.
#[allow(dead_code)]
pub struct ScopedHistory<S: ObjectStore> {
    history: ModelHistory<S::Folder, S::Object>,
    store: S,
}

#[allow(dead_code)]
impl<S: ObjectStore> ScopedHistory<S> {
    pub fn new(store: S, maximum_saved_states: usize) -> Self {
        Self {
            history: ModelHistory::new(maximum_saved_states),
            store,
        }
    }

    pub fn history(&self) -> &ModelHistory<S::Folder, S::Object> {
        &self.history
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Access to the live models, for applying an edit between
    /// [`cache_state`](Self::cache_state) and [`save_state`](Self::save_state).
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn set_folder(&mut self, folder: S::Folder) -> Result<(), StoreError> {
        self.history.set_folder(folder, &mut self.store)
    }

    pub fn cache_state(&mut self) -> Result<(), StoreError> {
        self.history.cache_state(&mut self.store)
    }

    pub fn save_state(&mut self) -> Result<(), StoreError> {
        self.history.save_state(&mut self.store)
    }

    pub fn restore_previous_state(&mut self) -> Result<RestoreOutcome, StoreError> {
        self.history.restore_previous_state(&mut self.store)
    }

    pub fn restore_next_state(&self) -> RestoreOutcome {
        self.history.restore_next_state()
    }

    pub fn clear_history(&mut self) -> Result<(), StoreError> {
        self.history.clear_history(&mut self.store)
    }

    pub fn clear_cached_state(&mut self) -> Result<(), StoreError> {
        self.history.clear_cached_state(&mut self.store)
    }
}

impl<S: ObjectStore> Drop for ScopedHistory<S> {
    fn drop(&mut self) {
        if let Err(err) = self.history.clear_history(&mut self.store) {
            error!("Failed to release model history: {}", err);
        }
    }
}
