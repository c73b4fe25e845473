//! Atom Implementation
//!
//! An Atom is a single global value slot for application state. It is a
//! thin wrapper: the value lives in a [`Signal`] (or any other
//! [`Observable`] cell the embedder supplies) and all change propagation is
//! the signal's job. The atom's own surface is get and set. Anything
//! fancier, such as derived values or update batching, belongs to the
//! layers around it.
//!
//! # Writes
//!
//! A write is expressed as a [`SetValue`]: either a replacement value or a
//! function of the previous value, chosen at the call site. Because the
//! variant is explicit there is no runtime inspection of the argument, and
//! an atom whose value type is itself a function stays unambiguous.
//!
//! Writes are immediately visible to subsequent reads. There is no queue
//! and no equality check: every write notifies every dependent.

use std::fmt::Debug;
use std::marker::PhantomData;

use serde::Serialize;

use crate::reactive::{Observable, Signal};

/// The argument of [`Atom::set`]: a replacement value or an updater.
pub enum SetValue<T> {
    /// Install this value as-is.
    Direct(T),
    /// Call the function with the previous value and install its result.
    Update(Box<dyn FnOnce(&T) -> T + Send>),
}

impl<T> SetValue<T> {
    /// Build the updater variant from a closure.
    pub fn update<F>(f: F) -> Self
    where
        F: FnOnce(&T) -> T + Send + 'static,
    {
        SetValue::Update(Box::new(f))
    }
}

impl<T> From<T> for SetValue<T> {
    fn from(value: T) -> Self {
        SetValue::Direct(value)
    }
}

impl<T: Debug> Debug for SetValue<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SetValue::Direct(v) => f.debug_tuple("Direct").field(v).finish(),
            SetValue::Update(_) => f.debug_tuple("Update").field(&"<fn>").finish(),
        }
    }
}

/// A single mutable value slot with change notification.
///
/// The atom holds exactly one value of `T` at any instant. Reading during a
/// render pass subscribes the rendering component; writing re-renders every
/// subscriber. Cloning an atom clones the handle, not the value: all clones
/// share one slot.
///
/// `C` is the backing reactive cell and defaults to [`Signal<T>`]. An
/// embedding framework with its own reactivity primitive implements
/// [`Observable`] for it and constructs atoms with [`Atom::from_cell`].
///
/// # Example
///
/// ```rust,ignore
/// let c = Atom::new(10);
/// assert_eq!(c.get(), 10);
/// c.set(20);
/// c.update(|prev| prev + 5);
/// assert_eq!(c.get(), 25);
/// ```
pub struct Atom<T, C = Signal<T>>
where
    T: Clone + Send + Sync + 'static,
    C: Observable<T>,
{
    cell: C,
    marker: PhantomData<fn() -> T>,
}

impl<T> Atom<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Create an atom holding `initial`, backed by a fresh [`Signal`].
    ///
    /// Any value of `T` is accepted; the atom does not care whether `T`
    /// represents a settled value or an in-flight computation.
    pub fn new(initial: T) -> Self {
        Self::from_cell(Signal::new(initial))
    }

    /// Get the backing signal's unique ID.
    pub fn id(&self) -> u64 {
        self.cell.id()
    }
}

impl<T, C> Atom<T, C>
where
    T: Clone + Send + Sync + 'static,
    C: Observable<T>,
{
    /// Create an atom over an existing reactive cell.
    ///
    /// This is the seam for embedding frameworks that bring their own
    /// reactivity primitive.
    pub fn from_cell(cell: C) -> Self {
        Self {
            cell,
            marker: PhantomData,
        }
    }

    /// Get the current value.
    ///
    /// Synchronous and never blocks. Reading during a render pass
    /// subscribes the rendering component to this atom.
    pub fn get(&self) -> T {
        self.cell.read()
    }

    /// Get the current value without subscribing.
    pub fn get_untracked(&self) -> T {
        self.cell.read_untracked()
    }

    /// Write the atom and notify every dependent.
    ///
    /// Accepts a plain value (`atom.set(5)`) or an explicit
    /// [`SetValue::update`] closure. The updater runs synchronously with
    /// the current value; if it panics, nothing is written and the panic
    /// propagates to the caller.
    pub fn set(&self, value: impl Into<SetValue<T>>) {
        match value.into() {
            SetValue::Direct(v) => self.cell.write(v),
            SetValue::Update(f) => {
                let prev = self.cell.read_untracked();
                let next = f(&prev);
                self.cell.write(next);
            }
        }
    }

    /// Convenience for `set(SetValue::update(f))`.
    pub fn update<F>(&self, f: F)
    where
        F: FnOnce(&T) -> T + Send + 'static,
    {
        self.set(SetValue::update(f));
    }

    /// The underlying reactive cell.
    ///
    /// Exposed directly so the host framework can wire subscriptions
    /// without the atom growing a registration API of its own.
    pub fn cell(&self) -> &C {
        &self.cell
    }
}

impl<T, C> Clone for Atom<T, C>
where
    T: Clone + Send + Sync + 'static,
    C: Observable<T>,
{
    fn clone(&self) -> Self {
        Self {
            cell: self.cell.clone(),
            marker: PhantomData,
        }
    }
}

impl<T> Debug for Atom<T>
where
    T: Clone + Send + Sync + Debug + 'static,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Atom")
            .field("id", &self.id())
            .field("value", &self.get_untracked())
            .finish()
    }
}

// ----------------------------------------------------------------------------
// Snapshots
// ----------------------------------------------------------------------------

/// A point-in-time copy of an atom's identity and value.
///
/// This is what the framework's transport and devtools layers ship over the
/// wire; the atom itself never serializes in place.
#[derive(Debug, Clone, Serialize)]
pub struct AtomSnapshot<T> {
    pub id: u64,
    pub value: T,
}

impl<T> Atom<T>
where
    T: Clone + Send + Sync + Serialize + 'static,
{
    /// Take an untracked snapshot of the atom.
    pub fn snapshot(&self) -> AtomSnapshot<T> {
        AtomSnapshot {
            id: self.id(),
            value: self.get_untracked(),
        }
    }

    /// Serialize a snapshot to JSON.
    pub fn snapshot_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.snapshot())
    }
}

// ----------------------------------------------------------------------------
// Python Bindings
// ----------------------------------------------------------------------------

/// Python-exposed Atom type.
///
/// A standalone implementation for Python that handles PyO3's reference
/// counting properly. `Py<PyAny>` is Send+Sync and GIL-independent, so the
/// slot can be shared across threads.
#[cfg(feature = "python")]
mod python {
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::{Arc, RwLock};

    use pyo3::prelude::*;
    use pyo3::types::PyAny;

    static ATOM_ID_COUNTER: AtomicU64 = AtomicU64::new(0);

    #[pyclass(name = "Atom")]
    pub struct PyAtom {
        /// Unique identifier for this atom.
        id: u64,

        /// The current value, stored as a GIL-independent reference.
        value: Arc<RwLock<Py<PyAny>>>,
    }

    #[pymethods]
    impl PyAtom {
        /// Create a new atom with the given initial value.
        #[new]
        fn new(value: PyObject) -> Self {
            Self {
                id: ATOM_ID_COUNTER.fetch_add(1, Ordering::Relaxed),
                value: Arc::new(RwLock::new(value)),
            }
        }

        /// Get the current value.
        #[getter]
        fn value(&self, py: Python<'_>) -> PyObject {
            let guard = self.value.read().expect("value lock poisoned");
            guard.clone_ref(py).into()
        }

        /// Set a new value.
        #[setter]
        fn set_value(&self, value: PyObject) {
            let mut guard = self.value.write().expect("value lock poisoned");
            *guard = value;
        }

        /// Replace the value with `f(previous)`.
        ///
        /// If `f` raises, the previous value stays installed and the
        /// exception propagates unchanged.
        fn update(&self, py: Python<'_>, f: PyObject) -> PyResult<()> {
            let prev = {
                let guard = self.value.read().expect("value lock poisoned");
                guard.clone_ref(py)
            };

            let next = f.call1(py, (prev,))?;

            let mut guard = self.value.write().expect("value lock poisoned");
            *guard = next;
            Ok(())
        }

        /// Get the atom's unique ID.
        #[getter]
        fn id(&self) -> u64 {
            self.id
        }

        fn __repr__(&self, py: Python<'_>) -> String {
            let value = self.value.read().expect("value lock poisoned");
            let repr = value
                .bind(py)
                .repr()
                .map(|r| r.to_string())
                .unwrap_or_else(|_| "?".to_string());
            format!("Atom(id={}, value={})", self.id, repr)
        }
    }
}

#[cfg(feature = "python")]
pub use python::PyAtom;

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn atom_holds_initial_value() {
        let atom = Atom::new(7);
        assert_eq!(atom.get(), 7);
    }

    #[test]
    fn atom_set_replaces_value() {
        let atom = Atom::new("a".to_string());
        atom.set("b".to_string());
        assert_eq!(atom.get(), "b");
    }

    #[test]
    fn atom_set_with_updater() {
        let atom = Atom::new(10);
        atom.set(SetValue::update(|prev| prev * 2));
        assert_eq!(atom.get(), 20);
    }

    #[test]
    fn atom_updates_compose() {
        let atom = Atom::new(0);
        atom.update(|x| x + 1);
        atom.update(|x| x + 1);
        assert_eq!(atom.get(), 2);
    }

    #[test]
    fn read_is_idempotent() {
        let atom = Atom::new(vec![1, 2, 3]);
        assert_eq!(atom.get(), atom.get());
    }

    #[test]
    fn scenario_direct_then_functional() {
        let c = Atom::new(10);
        assert_eq!(c.get(), 10);

        c.set(20);
        assert_eq!(c.get(), 20);

        c.set(SetValue::update(|prev| prev + 5));
        assert_eq!(c.get(), 25);
    }

    #[test]
    fn atom_clone_shares_slot() {
        let a = Atom::new(1);
        let b = a.clone();

        a.set(5);
        assert_eq!(b.get(), 5);

        b.update(|v| v + 1);
        assert_eq!(a.get(), 6);
    }

    #[test]
    fn panicking_updater_leaves_value_intact() {
        let atom = Atom::new(3);
        let clone = atom.clone();

        let result = std::panic::catch_unwind(move || {
            clone.set(SetValue::update(|_: &i32| panic!("updater failed")));
        });

        assert!(result.is_err());
        assert_eq!(atom.get(), 3);
    }

    #[test]
    fn function_valued_atoms_are_unambiguous() {
        // T is itself a function type; Direct still means "store this".
        let atom: Atom<fn(i32) -> i32> = Atom::new(|x| x + 1);
        assert_eq!((atom.get())(1), 2);

        atom.set(SetValue::Direct((|x| x * 10) as fn(i32) -> i32));
        assert_eq!((atom.get())(1), 10);
    }

    #[test]
    fn snapshot_serializes_id_and_value() {
        let atom = Atom::new(5);
        let snapshot = atom.snapshot();
        assert_eq!(snapshot.value, 5);
        assert_eq!(snapshot.id, atom.id());

        let json = atom.snapshot_json().unwrap();
        assert!(json.contains("\"value\":5"));
    }

    #[test]
    fn atom_write_goes_through_injected_cell() {
        let signal = Signal::new(0);
        let atom = Atom::from_cell(signal.clone());

        atom.set(9);
        assert_eq!(signal.get_untracked(), 9);
        assert_eq!(atom.cell().get_untracked(), 9);
    }
}
