//! Quark Core
//!
//! This crate provides the state layer for the Quark reactive UI framework.
//! It implements:
//!
//! - Atoms: single-value global state containers with change notification
//! - The `use_atom` hook that binds atoms into component render passes
//! - The reactivity layer underneath (signals, dependency tracking, and
//!   the runtime that re-renders dependents)
//!
//! The crate is designed to be used both as a native Rust library and,
//! behind the `python` feature, as a Python extension module via PyO3.
//!
//! # Architecture
//!
//! The crate is organized into two modules:
//!
//! - `atom`: the application-facing store (atoms, `use_atom`, global atoms)
//! - `reactive`: signals, render-pass tracking, and update propagation
//!
//! # Example
//!
//! ```rust,ignore
//! use quark_core::atom::{use_atom, GlobalAtom};
//! use quark_core::reactive::RenderScope;
//!
//! static COUNT: GlobalAtom<i32> = GlobalAtom::new(|| 0);
//!
//! let scope = RenderScope::mount(|| {
//!     let (count, _set_count) = use_atom(COUNT.atom());
//!     println!("count: {count}");
//! });
//!
//! COUNT.set(5);
//! // Scope re-renders, prints: "count: 5"
//! COUNT.update(|prev| prev + 1);
//! // Prints: "count: 6"
//! ```

pub mod atom;
pub mod reactive;

#[cfg(feature = "python")]
use pyo3::prelude::*;

/// Python module definition.
///
/// This function is called by Python when importing the module.
/// It registers all Python-exposed types and functions.
#[cfg(feature = "python")]
#[pymodule]
fn _core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    // Register the atom store
    m.add_class::<atom::PyAtom>()?;

    // Add version info
    m.add("__version__", env!("CARGO_PKG_VERSION"))?;

    Ok(())
}
