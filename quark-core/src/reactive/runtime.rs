//! Reactive Runtime
//!
//! The runtime is the process-wide link between signals and the render
//! scopes that read them. Signals report reads and writes to it; the
//! runtime turns writes into re-renders.
//!
//! # State
//!
//! Two maps, both behind one lazily initialized global:
//!
//! - `scopes`: observer id to a weak handle on the mounted scope. Weak so
//!   an unmounted scope can be freed; the entry is removed when the scope's
//!   [`RuntimeHandle`] drops.
//! - `dependents`: signal id to the set of observers that read it in their
//!   latest render. A set, not a list: a component that reads the same atom
//!   several times in one pass is still one dependent and re-renders once
//!   per write.
//!
//! Entries are pruned as they empty out, and a notification that finds a
//! dependent whose scope is gone drops that dependent on the spot, so the
//! maps do not grow with unmounted scopes or one-off untracked readers.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, OnceLock, RwLock, Weak};

use tracing::debug;

use super::tracking::ObserverId;

/// A computation the runtime re-runs when one of its signals changes.
pub trait Dependent: Send + Sync {
    /// Get the observer ID for this dependent.
    fn observer_id(&self) -> ObserverId;

    /// Mark this dependent as out of date with respect to its inputs.
    fn mark_stale(&self);

    /// Re-run this dependent's computation.
    fn schedule_render(&self);
}

/// Handle to a registered dependent.
///
/// Dropping the handle unregisters the dependent from the runtime.
pub struct RuntimeHandle {
    observer_id: ObserverId,
}

impl Drop for RuntimeHandle {
    fn drop(&mut self) {
        Runtime::unregister(self.observer_id);
    }
}

struct RuntimeState {
    scopes: RwLock<HashMap<ObserverId, Weak<dyn Dependent>>>,
    dependents: RwLock<HashMap<u64, HashSet<ObserverId>>>,
}

static STATE: OnceLock<RuntimeState> = OnceLock::new();

fn state() -> &'static RuntimeState {
    STATE.get_or_init(|| RuntimeState {
        scopes: RwLock::new(HashMap::new()),
        dependents: RwLock::new(HashMap::new()),
    })
}

/// Remove one observer from every dependent set, dropping sets that empty.
fn forget_observer(dependents: &mut HashMap<u64, HashSet<ObserverId>>, id: ObserverId) {
    dependents.retain(|_, observers| {
        observers.remove(&id);
        !observers.is_empty()
    });
}

/// The global reactive runtime.
pub struct Runtime;

impl Runtime {
    /// Register a dependent with the runtime.
    ///
    /// Returns a handle that unregisters the dependent when dropped.
    pub fn register(dependent: Arc<dyn Dependent>) -> RuntimeHandle {
        let observer_id = dependent.observer_id();

        state()
            .scopes
            .write()
            .expect("scopes lock poisoned")
            .insert(observer_id, Arc::downgrade(&dependent));

        RuntimeHandle { observer_id }
    }

    fn unregister(observer_id: ObserverId) {
        state()
            .scopes
            .write()
            .expect("scopes lock poisoned")
            .remove(&observer_id);

        let mut dependents = state()
            .dependents
            .write()
            .expect("dependents lock poisoned");
        forget_observer(&mut dependents, observer_id);
    }

    /// Record that an observer depends on a signal.
    ///
    /// Called automatically when a signal is read during a render pass.
    /// Recording the same pair again is a no-op.
    pub fn add_dependency(signal_id: u64, observer_id: ObserverId) {
        state()
            .dependents
            .write()
            .expect("dependents lock poisoned")
            .entry(signal_id)
            .or_default()
            .insert(observer_id);
    }

    /// Remove all signal dependencies of an observer.
    ///
    /// Called before a re-render so stale dependencies do not linger.
    pub fn clear_dependencies(observer_id: ObserverId) {
        let mut dependents = state()
            .dependents
            .write()
            .expect("dependents lock poisoned");
        forget_observer(&mut dependents, observer_id);
    }

    /// Number of observers currently depending on a signal.
    pub fn dependent_count(signal_id: u64) -> usize {
        state()
            .dependents
            .read()
            .expect("dependents lock poisoned")
            .get(&signal_id)
            .map(|observers| observers.len())
            .unwrap_or(0)
    }

    /// Re-render every dependent of a signal.
    ///
    /// This is the core update propagation mechanism. Dependents whose
    /// scope has gone away are forgotten instead of notified.
    pub fn notify_signal_change(signal_id: u64) {
        let observer_ids: Vec<ObserverId> = {
            let dependents = state()
                .dependents
                .read()
                .expect("dependents lock poisoned");

            match dependents.get(&signal_id) {
                Some(observers) => observers.iter().copied().collect(),
                None => return,
            }
        };

        debug!(
            signal_id,
            dependents = observer_ids.len(),
            "propagating signal change"
        );

        let mut live = Vec::new();
        let mut dead = Vec::new();

        {
            let scopes = state().scopes.read().expect("scopes lock poisoned");

            for observer_id in observer_ids {
                match scopes.get(&observer_id).and_then(Weak::upgrade) {
                    Some(scope) => {
                        scope.mark_stale();
                        live.push(scope);
                    }
                    None => dead.push(observer_id),
                }
            }
        }

        if !dead.is_empty() {
            let mut dependents = state()
                .dependents
                .write()
                .expect("dependents lock poisoned");

            if let Some(observers) = dependents.get_mut(&signal_id) {
                for observer_id in dead {
                    observers.remove(&observer_id);
                }
                if observers.is_empty() {
                    dependents.remove(&signal_id);
                }
            }
        }

        // No locks held while rendering; a render pass reads signals,
        // which re-enters the runtime.
        for scope in live {
            scope.schedule_render();
        }
    }
}
