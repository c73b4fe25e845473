//! Binding Accessor
//!
//! `use_atom` is how a component reads an atom from inside its render
//! function. The read goes through the atom's tracked path, so the act of
//! reading is also the act of subscribing: the currently rendering scope
//! will re-render on every subsequent write.
//!
//! The hook returns the value paired with a setter handle. The setter is
//! the atom's own `set`, unmodified. The hook does not memoize the value
//! and does not compare before notifying, and there is no unsubscribe
//! call: subscription lifetime belongs to the render scope that performed
//! the read.

use tracing::warn;

use crate::reactive::{in_render_pass, Observable, Signal};

use super::cell::{Atom, SetValue};

/// Read an atom from within a render pass.
///
/// Returns the current value and a setter whose behavior is identical to
/// [`Atom::set`]. The read subscribes the rendering component, so a later
/// write to the atom re-renders it.
///
/// Calling this outside a render pass is a misuse: the value still comes
/// back, but no subscription is established. That case is logged and
/// otherwise left to the host framework to police.
///
/// # Example
///
/// ```rust,ignore
/// let scope = RenderScope::mount(move || {
///     let (count, set_count) = use_atom(COUNT.atom());
///     println!("count: {count}");
///     if count < 0 {
///         set_count.set(0);
///     }
/// });
/// ```
pub fn use_atom<T, C>(atom: &Atom<T, C>) -> (T, AtomSetter<T, C>)
where
    T: Clone + Send + Sync + 'static,
    C: Observable<T>,
{
    if !in_render_pass() {
        warn!("use_atom called outside a render pass; the read is untracked");
    }

    let value = atom.get();
    (value, AtomSetter { atom: atom.clone() })
}

/// The setter half of [`use_atom`].
///
/// A cloneable handle over the atom's `set`; safe to stash in event
/// handlers that outlive the render pass that produced it.
pub struct AtomSetter<T, C = Signal<T>>
where
    T: Clone + Send + Sync + 'static,
    C: Observable<T>,
{
    atom: Atom<T, C>,
}

impl<T, C> AtomSetter<T, C>
where
    T: Clone + Send + Sync + 'static,
    C: Observable<T>,
{
    /// Write the atom. Identical to [`Atom::set`].
    pub fn set(&self, value: impl Into<SetValue<T>>) {
        self.atom.set(value);
    }

    /// Convenience for `set(SetValue::update(f))`.
    pub fn update<F>(&self, f: F)
    where
        F: FnOnce(&T) -> T + Send + 'static,
    {
        self.atom.update(f);
    }
}

impl<T, C> Clone for AtomSetter<T, C>
where
    T: Clone + Send + Sync + 'static,
    C: Observable<T>,
{
    fn clone(&self) -> Self {
        Self {
            atom: self.atom.clone(),
        }
    }
}
