//! Signal Implementation
//!
//! A Signal is one shared value slot. It does exactly two reactive things:
//! a tracked read tells the current render pass "this component now depends
//! on me", and a write tells the runtime "re-render my dependents". All
//! subscription state lives in the [`Runtime`]; the signal itself is just
//! an id and a locked value.
//!
//! Atoms only ever propagate through render scopes, so the runtime path is
//! the single notification channel; there is no per-signal callback list.
//!
//! # Thread Safety
//!
//! The value sits behind a RwLock, so clones of a signal can be read and
//! written from any thread. Tracking is thread-local: a read is attributed
//! to whatever render pass is active on the reading thread.

use std::fmt::Debug;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use tracing::trace;

use super::runtime::Runtime;
use super::tracking;

static NEXT_SIGNAL_ID: AtomicU64 = AtomicU64::new(0);

/// A value slot with dependency-tracking reads and notifying writes.
///
/// This is the capability an [`Atom`](crate::atom::Atom) needs from its
/// backing primitive. [`Signal`] is the stock implementation; an embedding
/// framework with its own reactivity system can supply another and the atom
/// layer will not know the difference.
pub trait Observable<T>: Clone {
    /// Read the current value, subscribing the active render pass (if any).
    fn read(&self) -> T;

    /// Read the current value without establishing a dependency.
    fn read_untracked(&self) -> T;

    /// Replace the value and notify every dependent.
    fn write(&self, value: T);
}

/// A shared, observable value of type T.
///
/// Cloning a signal produces another handle to the same slot. Ids are
/// unique per process and are what the runtime keys dependencies on.
pub struct Signal<T>
where
    T: Clone + Send + Sync + 'static,
{
    id: u64,
    value: Arc<RwLock<T>>,
}

impl<T> Signal<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Create a new signal with the given initial value.
    pub fn new(value: T) -> Self {
        Self {
            id: NEXT_SIGNAL_ID.fetch_add(1, Ordering::Relaxed),
            value: Arc::new(RwLock::new(value)),
        }
    }

    /// Get the signal's unique ID.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Get the current value.
    ///
    /// If called during a render pass, the rendering component becomes a
    /// dependent of this signal.
    pub fn get(&self) -> T {
        if let Some(observer) = tracking::record_read(self.id) {
            Runtime::add_dependency(self.id, observer);
        }

        self.value.read().expect("value lock poisoned").clone()
    }

    /// Get the current value without tracking dependencies.
    pub fn get_untracked(&self) -> T {
        self.value.read().expect("value lock poisoned").clone()
    }

    /// Set a new value and re-render every dependent.
    pub fn set(&self, value: T) {
        {
            let mut guard = self.value.write().expect("value lock poisoned");
            *guard = value;
        }

        trace!(signal_id = self.id, "signal write");
        Runtime::notify_signal_change(self.id);
    }

    /// Replace the value using a function of the previous value.
    pub fn update<F>(&self, f: F)
    where
        F: FnOnce(&T) -> T,
    {
        let new_value = {
            let guard = self.value.read().expect("value lock poisoned");
            f(&guard)
        };
        self.set(new_value);
    }

    /// Number of observers currently depending on this signal.
    pub fn dependent_count(&self) -> usize {
        Runtime::dependent_count(self.id)
    }
}

impl<T> Observable<T> for Signal<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn read(&self) -> T {
        self.get()
    }

    fn read_untracked(&self) -> T {
        self.get_untracked()
    }

    fn write(&self, value: T) {
        self.set(value)
    }
}

impl<T> Clone for Signal<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            value: Arc::clone(&self.value),
        }
    }
}

impl<T> Debug for Signal<T>
where
    T: Clone + Send + Sync + Debug + 'static,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signal")
            .field("id", &self.id)
            .field("value", &self.get_untracked())
            .field("dependent_count", &self.dependent_count())
            .finish()
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
