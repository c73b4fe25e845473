//! Module-scope atoms.
//!
//! Application state in Quark lives in atoms declared once at module scope
//! and shared by every component for the lifetime of the process. Rust
//! statics cannot run `Atom::new` at initialization time, so `GlobalAtom`
//! defers construction to first use behind a `OnceLock`.
//!
//! There is no teardown: a global atom is one value slot, alive until the
//! process exits.

use std::sync::OnceLock;

use super::cell::{Atom, SetValue};

/// A process-lifetime atom suitable for `static` declarations.
///
/// # Example
///
/// ```rust,ignore
/// static COUNT: GlobalAtom<i32> = GlobalAtom::new(|| 0);
///
/// COUNT.set(5);
/// COUNT.update(|prev| prev + 1);
/// assert_eq!(COUNT.get(), 6);
/// ```
pub struct GlobalAtom<T>
where
    T: Clone + Send + Sync + 'static,
{
    init: fn() -> T,
    slot: OnceLock<Atom<T>>,
}

impl<T> GlobalAtom<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Declare a global atom. `init` runs once, on first access.
    pub const fn new(init: fn() -> T) -> Self {
        Self {
            init,
            slot: OnceLock::new(),
        }
    }

    /// The underlying atom, constructed on first call.
    pub fn atom(&self) -> &Atom<T> {
        self.slot.get_or_init(|| Atom::new((self.init)()))
    }

    /// Get the current value. See [`Atom::get`].
    pub fn get(&self) -> T {
        self.atom().get()
    }

    /// Get the current value without subscribing.
    pub fn get_untracked(&self) -> T {
        self.atom().get_untracked()
    }

    /// Write the atom. See [`Atom::set`].
    pub fn set(&self, value: impl Into<SetValue<T>>) {
        self.atom().set(value);
    }

    /// Convenience for `set(SetValue::update(f))`.
    pub fn update<F>(&self, f: F)
    where
        F: FnOnce(&T) -> T + Send + 'static,
    {
        self.atom().update(f);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static COUNT: GlobalAtom<i32> = GlobalAtom::new(|| 0);
    static LABEL: GlobalAtom<&str> = GlobalAtom::new(|| "idle");

    #[test]
    fn global_atom_initializes_lazily() {
        assert_eq!(LABEL.get(), "idle");
        LABEL.set("busy");
        assert_eq!(LABEL.get(), "busy");
    }

    #[test]
    fn global_atom_is_stable_across_accesses() {
        let id = COUNT.atom().id();
        COUNT.update(|v| v + 1);
        assert_eq!(COUNT.atom().id(), id);
    }
}
