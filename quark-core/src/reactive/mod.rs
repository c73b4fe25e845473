//! Reactive Primitives
//!
//! This module implements the reactivity layer the atom store sits on:
//! signals, render-pass dependency tracking, and the runtime that turns
//! signal writes into component re-renders.
//!
//! # Concepts
//!
//! ## Signals
//!
//! A Signal is a container for mutable state. When a signal's value is read
//! during a render pass, the signal registers the rendering component as a
//! dependent. When the value changes, all dependents re-render.
//!
//! ## Render Scopes
//!
//! A RenderScope wraps one component's render function. It runs the
//! function inside a tracking pass, remembers which signals were read, and
//! re-runs when any of them changes.
//!
//! # Implementation Notes
//!
//! Dependency detection uses a thread-local tracking context: reading a
//! signal while a render pass is active records the dependency with no
//! explicit subscribe call. This approach (sometimes called "automatic
//! dependency tracking" or "transparent reactivity") is used by SolidJS,
//! Vue 3, and Leptos.

mod component;
mod runtime;
mod signal;
mod tracking;

pub use component::RenderScope;
pub use runtime::{Dependent, Runtime, RuntimeHandle};
pub use signal::{Observable, Signal};
pub use tracking::{in_render_pass, run_tracked, ObserverId};
