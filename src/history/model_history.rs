//! Linear undo log over snapshots of archived model clones.

use bevy::log::{debug, info, warn};

use crate::scene::{ObjectStore, StoreError};

/// Clones of the models that were current in the folder when the snapshot
/// was taken, all archived.
pub type Snapshot<O> = Vec<O>;

/// Result of an undo or redo request that did not fail in the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestoreOutcome {
    /// A snapshot was swapped in for the live models.
    Restored,
    /// There was nothing to restore; nothing changed.
    NothingToRestore,
}

/// Undo history for the models of one folder.
///
/// Every edit goes through the same cycle: [`cache_state`] before the live
/// models are touched, then [`save_state`] to commit or
/// [`clear_cached_state`] to discard. Undo is single-step and destructive:
/// the live models are deleted and the tail snapshot takes their place.
/// There is no redo.
///
/// Archived clones held here are owned by the history and are only deleted
/// by it. Release them with [`close`] (or [`ScopedHistory`]) before the
/// history goes away.
///
/// [`cache_state`]: ModelHistory::cache_state
/// [`save_state`]: ModelHistory::save_state
/// [`clear_cached_state`]: ModelHistory::clear_cached_state
/// [`close`]: ModelHistory::close
/// [`ScopedHistory`]: super::ScopedHistory
#[derive(Debug)]
pub struct ModelHistory<F, O> {
    folder: Option<F>,
    history: Vec<Snapshot<O>>,
    cached_state: Option<Snapshot<O>>,
    /// Number of snapshots ahead of the live state. Never exceeds `history.len()`.
    last_restored_state: usize,
    maximum_saved_states: usize,
}

impl<F, O> ModelHistory<F, O>
where
    F: Copy + PartialEq,
    O: Copy,
{
    pub fn new(maximum_saved_states: usize) -> Self {
        Self {
            folder: None,
            history: Vec::new(),
            cached_state: None,
            last_restored_state: 0,
            maximum_saved_states,
        }
    }

    pub fn folder(&self) -> Option<F> {
        self.folder
    }

    pub fn maximum_saved_states(&self) -> usize {
        self.maximum_saved_states
    }

    #[allow(dead_code)]
    pub fn last_restored_state(&self) -> usize {
        self.last_restored_state
    }

    pub fn has_cached_state(&self) -> bool {
        self.cached_state.is_some()
    }

    /// Objects of the pending snapshot, if an edit is in flight.
    #[allow(dead_code)]
    pub fn cached_objects(&self) -> Option<&[O]> {
        self.cached_state.as_deref()
    }

    #[allow(dead_code)]
    pub fn snapshots(&self) -> &[Snapshot<O>] {
        &self.history
    }

    pub fn has_history(&self) -> bool {
        !self.history.is_empty()
    }

    pub fn is_restore_previous_state_available(&self) -> bool {
        self.last_restored_state >= 1
    }

    /// Redo is disabled; always `false`.
    pub fn is_restore_next_state_available(&self) -> bool {
        false
    }

    pub fn number_of_states(&self) -> usize {
        self.history.len()
    }

    /// Change the capacity, evicting the oldest snapshots that no longer fit.
    ///
    /// A capacity of 0 disables saving.
    pub fn set_maximum_saved_states<S>(
        &mut self,
        maximum_saved_states: usize,
        store: &mut S,
    ) -> Result<(), StoreError>
    where
        S: ObjectStore<Folder = F, Object = O> + ?Sized,
    {
        self.maximum_saved_states = maximum_saved_states;
        self.remove_obsolete_states(store)
    }

    /// Track a different folder. Switching folders discards the history but
    /// leaves a pending cache alone.
    pub fn set_folder<S>(&mut self, folder: F, store: &mut S) -> Result<(), StoreError>
    where
        S: ObjectStore<Folder = F, Object = O> + ?Sized,
    {
        if self.folder == Some(folder) {
            return Ok(());
        }

        self.clear_history(store)?;
        self.folder = Some(folder);
        Ok(())
    }

    /// Snapshot the current models of the folder as the pending state,
    /// replacing (and deleting) any earlier pending state.
    ///
    /// Live models are untouched; only their clones are archived.
    pub fn cache_state<S>(&mut self, store: &mut S) -> Result<(), StoreError>
    where
        S: ObjectStore<Folder = F, Object = O> + ?Sized,
    {
        self.clear_cached_state(store)?;

        let children = self.current_children(store);
        // Clones are owned by the cache as soon as they exist
        let cached = self.cached_state.insert(Vec::with_capacity(children.len()));
        for child in children {
            let clone = store.clone_object(child)?;
            cached.push(clone);
            store.archive(clone)?;
        }

        debug!("Cached {} model(s) before edit", cached.len());
        Ok(())
    }

    /// Commit the pending state to the log.
    ///
    /// If [`cache_state`](Self::cache_state) was never called, the state is
    /// cached here instead, which records the models *after* the edit.
    /// Callers that want a pre-edit snapshot must cache first.
    pub fn save_state<S>(&mut self, store: &mut S) -> Result<(), StoreError>
    where
        S: ObjectStore<Folder = F, Object = O> + ?Sized,
    {
        if self.maximum_saved_states < 1 {
            debug!("Saving states is disabled");
            return Ok(());
        }

        if self.cached_state.is_none() {
            self.cache_state(store)?;
        }

        let snapshot = self.cached_state.take().unwrap_or_default();
        self.history.push(snapshot);
        self.last_restored_state = self.history.len();
        self.remove_obsolete_states(store)?;

        debug!(
            "Saved state {} of {}",
            self.history.len(),
            self.maximum_saved_states
        );
        Ok(())
    }

    /// Undo the last committed edit.
    ///
    /// Deletes every current model in the folder and restores the most
    /// recent snapshot in their place.
    pub fn restore_previous_state<S>(&mut self, store: &mut S) -> Result<RestoreOutcome, StoreError>
    where
        S: ObjectStore<Folder = F, Object = O> + ?Sized,
    {
        if self.last_restored_state < 1 || self.history.len() < self.last_restored_state {
            info!("There is no previous state available to restore");
            return Ok(RestoreOutcome::NothingToRestore);
        }

        self.restore_state(self.last_restored_state - 1, store)?;
        Ok(RestoreOutcome::Restored)
    }

    /// Redo is disabled; this only reports that nothing can be restored.
    pub fn restore_next_state(&self) -> RestoreOutcome {
        info!("No next state available to restore");
        RestoreOutcome::NothingToRestore
    }

    /// Delete every snapshot in the log. The pending cache is kept.
    pub fn clear_history<S>(&mut self, store: &mut S) -> Result<(), StoreError>
    where
        S: ObjectStore<Folder = F, Object = O> + ?Sized,
    {
        let history = std::mem::take(&mut self.history);
        self.last_restored_state = 0;

        if !history.is_empty() {
            debug!("Clearing {} saved state(s)", history.len());
        }
        for snapshot in &history {
            delete_snapshot(snapshot, store)?;
        }
        Ok(())
    }

    /// Delete the pending snapshot, if any.
    pub fn clear_cached_state<S>(&mut self, store: &mut S) -> Result<(), StoreError>
    where
        S: ObjectStore<Folder = F, Object = O> + ?Sized,
    {
        if let Some(cached) = self.cached_state.take() {
            delete_snapshot(&cached, store)?;
        }
        Ok(())
    }

    /// Release every snapshot still owned by the log.
    pub fn close<S>(mut self, store: &mut S) -> Result<(), StoreError>
    where
        S: ObjectStore<Folder = F, Object = O> + ?Sized,
    {
        self.clear_history(store)
    }

    /// Pops the tail snapshot whatever `target_index` is; the index only
    /// moves the cursor. Single-step undo is the only supported use.
    fn restore_state<S>(&mut self, target_index: usize, store: &mut S) -> Result<(), StoreError>
    where
        S: ObjectStore<Folder = F, Object = O> + ?Sized,
    {
        let Some(restored) = self.history.pop() else {
            return Ok(());
        };

        for child in self.current_children(store) {
            store.delete_object(child)?;
        }
        for object in &restored {
            store.restore(*object)?;
        }

        self.last_restored_state = target_index;
        info!(
            "Restored {} model(s), {} state(s) left",
            restored.len(),
            self.history.len()
        );
        Ok(())
    }

    fn remove_obsolete_states<S>(&mut self, store: &mut S) -> Result<(), StoreError>
    where
        S: ObjectStore<Folder = F, Object = O> + ?Sized,
    {
        while self.history.len() > self.maximum_saved_states {
            let evicted = self.history.remove(0);
            self.last_restored_state = self.last_restored_state.saturating_sub(1);
            delete_snapshot(&evicted, store)?;
        }
        Ok(())
    }

    fn current_children<S>(&self, store: &S) -> Vec<O>
    where
        S: ObjectStore<Folder = F, Object = O> + ?Sized,
    {
        let Some(folder) = self.folder else {
            return Vec::new();
        };

        store
            .enumerate_children(folder)
            .into_iter()
            .filter(|child| store.is_current(*child))
            .collect()
    }
}

impl<F, O> Drop for ModelHistory<F, O> {
    fn drop(&mut self) {
        if !self.history.is_empty() {
            warn!(
                "Model history dropped with {} unreleased state(s)",
                self.history.len()
            );
        }
    }
}

fn delete_snapshot<S>(snapshot: &[S::Object], store: &mut S) -> Result<(), StoreError>
where
    S: ObjectStore + ?Sized,
{
    for object in snapshot {
        store.delete_object(*object)?;
    }
    Ok(())
}
