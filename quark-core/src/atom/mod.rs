//! Atom Store
//!
//! This module is Quark's application-state surface: atoms and the
//! `use_atom` hook.
//!
//! # Concepts
//!
//! ## Atoms
//!
//! An Atom is a single mutable value with get/set semantics. It wraps a
//! reactive cell from the [`reactive`](crate::reactive) layer and defers
//! all change propagation to it; the atom itself adds only the write
//! vocabulary ([`SetValue`]) and a stable, framework-facing API.
//!
//! ## The hook
//!
//! [`use_atom`] is called from inside a component's render function. The
//! read it performs subscribes that component to the atom, so every later
//! write re-renders it. It returns the value and a setter, and nothing
//! else: components never hold the atom's internals.
//!
//! ## Global state
//!
//! Atoms are typically declared once at module scope with [`GlobalAtom`]
//! and live as long as the process. Cloning an atom handle never copies
//! state; all clones share the same slot.

mod cell;
mod global;
mod hook;

pub use cell::{Atom, AtomSnapshot, SetValue};
pub use global::GlobalAtom;
pub use hook::{use_atom, AtomSetter};

#[cfg(feature = "python")]
pub use cell::PyAtom;
