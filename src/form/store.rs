// src/form/store.rs - State cells holding the current draft

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;

use crate::form::model::ProductDraft;
use crate::form::reducer::{form_reducer, FormAction};

/// The single place a draft lives. Every write goes through [`apply`],
/// which hands the closure the state as it is at that moment.
///
/// [`apply`]: DraftCell::apply
pub trait DraftCell: Clone {
    /// Copy of the current state. Variants are shared, not deep-copied.
    fn snapshot(&self) -> ProductDraft;

    /// Runs `f` against the current state without copying it
    fn inspect<R>(&self, f: impl FnOnce(&ProductDraft) -> R) -> R;

    /// Replaces the state with `update(current)`
    fn apply<F>(&self, update: F)
    where
        F: FnOnce(&ProductDraft) -> ProductDraft;

    fn dispatch(&self, action: FormAction) {
        self.apply(move |state| form_reducer(state, action));
    }
}

/// Lock-backed cell for use outside the UI
#[derive(Debug, Clone, Default)]
pub struct FormStore {
    state: Arc<RwLock<ProductDraft>>,
    revision: Arc<AtomicU64>,
}

impl FormStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of applied updates
    pub fn revision(&self) -> u64 {
        self.revision.load(Ordering::Acquire)
    }
}

impl DraftCell for FormStore {
    fn snapshot(&self) -> ProductDraft {
        self.state.read().clone()
    }

    fn inspect<R>(&self, f: impl FnOnce(&ProductDraft) -> R) -> R {
        f(&*self.state.read())
    }

    fn apply<F>(&self, update: F)
    where
        F: FnOnce(&ProductDraft) -> ProductDraft,
    {
        let mut state = self.state.write();
        let next = update(&*state);
        *state = next;
        self.revision.fetch_add(1, Ordering::AcqRel);
    }
}
