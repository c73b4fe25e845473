//! Render Scope
//!
//! A RenderScope models one component's render function. It is the piece of
//! the component model the state layer has to know about: the thing that
//! re-runs when an atom it read changes.
//!
//! # How Render Scopes Work
//!
//! 1. `mount` registers the scope with the runtime and runs the render
//!    function once to establish its initial signal dependencies.
//!
//! 2. When any of those signals changes, the runtime schedules the scope
//!    and it re-renders.
//!
//! 3. Each render drops the old dependency set and collects a fresh one,
//!    so conditional reads subscribe and unsubscribe naturally.
//!
//! # Disposal
//!
//! `dispose` makes the scope inert; dropping it unregisters it from the
//! runtime. Either way no further re-renders happen. This is the hook an
//! embedding framework uses when a component unmounts.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use super::runtime::{Dependent, Runtime, RuntimeHandle};
use super::tracking::{run_tracked, ObserverId};

/// A mounted render function that re-runs when its signal reads change.
///
/// # Example
///
/// ```rust,ignore
/// let count = Atom::new(0);
///
/// let scope = RenderScope::mount({
///     let count = count.clone();
///     move || {
///         let (value, _set) = use_atom(&count);
///         println!("count is: {value}");
///     }
/// });
///
/// count.set(5); // Prints: "count is: 5"
/// ```
pub struct RenderScope {
    inner: Arc<ScopeInner>,
    _registration: RuntimeHandle,
}

struct ScopeInner {
    /// The observer ID used for dependency tracking.
    observer_id: ObserverId,

    /// The render function.
    render: Box<dyn Fn() + Send + Sync>,

    /// Signal IDs read by the most recent render.
    tracked: RwLock<HashSet<u64>>,

    /// Set when a dependency changed, cleared by the next render.
    stale: AtomicBool,

    /// Whether the scope has been disposed.
    disposed: AtomicBool,

    /// Number of completed renders.
    render_count: RwLock<usize>,
}

impl ScopeInner {
    fn execute(&self) {
        if self.disposed.load(Ordering::SeqCst) {
            return;
        }

        // Drop dependencies from the previous render
        Runtime::clear_dependencies(self.observer_id);
        self.tracked.write().expect("tracked lock poisoned").clear();

        // Run the render function inside a tracking pass
        let ((), reads) = run_tracked(self.observer_id, || (self.render)());
        *self.tracked.write().expect("tracked lock poisoned") = reads.into_iter().collect();

        self.stale.store(false, Ordering::SeqCst);
        *self.render_count.write().expect("render_count lock poisoned") += 1;
    }
}

impl Dependent for ScopeInner {
    fn observer_id(&self) -> ObserverId {
        self.observer_id
    }

    fn mark_stale(&self) {
        self.stale.store(true, Ordering::SeqCst);
    }

    fn schedule_render(&self) {
        // Synchronous re-render. A frame scheduler would queue here instead.
        self.execute();
    }
}

impl RenderScope {
    /// Mount a render function.
    ///
    /// The function runs immediately to produce the first render and
    /// establish its dependencies, then re-runs whenever one of the signals
    /// it read changes.
    pub fn mount<F>(render: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        let inner = Arc::new(ScopeInner {
            observer_id: ObserverId::new(),
            render: Box::new(render),
            tracked: RwLock::new(HashSet::new()),
            stale: AtomicBool::new(false),
            disposed: AtomicBool::new(false),
            render_count: RwLock::new(0),
        });

        let registration = Runtime::register(inner.clone() as Arc<dyn Dependent>);
        inner.execute();

        Self {
            inner,
            _registration: registration,
        }
    }

    /// Get the observer ID for this scope.
    pub fn observer_id(&self) -> ObserverId {
        self.inner.observer_id
    }

    /// Re-run the render function immediately.
    pub fn rerender(&self) {
        self.inner.execute();
    }

    /// Dispose of the scope.
    ///
    /// After disposal, the render function will not run again.
    pub fn dispose(&self) {
        self.inner.disposed.store(true, Ordering::SeqCst);
    }

    /// Check if the scope has been disposed.
    pub fn is_disposed(&self) -> bool {
        self.inner.disposed.load(Ordering::SeqCst)
    }

    /// Check if a dependency changed since the last render.
    pub fn is_stale(&self) -> bool {
        self.inner.stale.load(Ordering::SeqCst)
    }

    /// Get the number of completed renders.
    pub fn render_count(&self) -> usize {
        *self
            .inner
            .render_count
            .read()
            .expect("render_count lock poisoned")
    }

    /// Get the number of signals the last render depended on.
    pub fn dependency_count(&self) -> usize {
        self.inner
            .tracked
            .read()
            .expect("tracked lock poisoned")
            .len()
    }
}

impl std::fmt::Debug for RenderScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderScope")
            .field("observer_id", &self.observer_id())
            .field("render_count", &self.render_count())
            .field("dependency_count", &self.dependency_count())
            .field("disposed", &self.is_disposed())
            .finish()
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reactive::Signal;
    use std::sync::atomic::{AtomicI32, Ordering};

    #[test]
    fn scope_renders_on_mount() {
        let renders = Arc::new(AtomicI32::new(0));
        let renders_clone = renders.clone();

        let scope = RenderScope::mount(move || {
            renders_clone.fetch_add(1, Ordering::SeqCst);
        });

        assert_eq!(renders.load(Ordering::SeqCst), 1);
        assert_eq!(scope.render_count(), 1);
    }

    #[test]
    fn scope_rerenders_when_signal_changes() {
        let signal = Signal::new(0);
        let seen = Arc::new(AtomicI32::new(-1));
        let seen_clone = seen.clone();

        let signal_clone = signal.clone();
        let scope = RenderScope::mount(move || {
            seen_clone.store(signal_clone.get(), Ordering::SeqCst);
        });

        assert_eq!(seen.load(Ordering::SeqCst), 0);
        assert_eq!(scope.dependency_count(), 1);

        signal.set(42);
        assert_eq!(seen.load(Ordering::SeqCst), 42);
        assert_eq!(scope.render_count(), 2);
    }

    #[test]
    fn disposed_scope_does_not_rerender() {
        let signal = Signal::new(0);
        let renders = Arc::new(AtomicI32::new(0));
        let renders_clone = renders.clone();

        let signal_clone = signal.clone();
        let scope = RenderScope::mount(move || {
            signal_clone.get();
            renders_clone.fetch_add(1, Ordering::SeqCst);
        });

        assert_eq!(renders.load(Ordering::SeqCst), 1);

        scope.dispose();
        assert!(scope.is_disposed());

        signal.set(1);
        assert_eq!(renders.load(Ordering::SeqCst), 1);

        // Manual rerender is also inert
        scope.rerender();
        assert_eq!(renders.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn dropped_scope_stops_observing() {
        let signal = Signal::new(0);
        let renders = Arc::new(AtomicI32::new(0));
        let renders_clone = renders.clone();

        let signal_clone = signal.clone();
        let scope = RenderScope::mount(move || {
            signal_clone.get();
            renders_clone.fetch_add(1, Ordering::SeqCst);
        });

        assert_eq!(renders.load(Ordering::SeqCst), 1);

        drop(scope);
        signal.set(1);
        assert_eq!(renders.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn scope_recollects_dependencies_each_render() {
        let toggle = Signal::new(true);
        let left = Signal::new(1);
        let right = Signal::new(2);

        let (toggle_c, left_c, right_c) = (toggle.clone(), left.clone(), right.clone());
        let scope = RenderScope::mount(move || {
            if toggle_c.get() {
                left_c.get();
            } else {
                right_c.get();
            }
        });

        // toggle + left
        assert_eq!(scope.dependency_count(), 2);

        toggle.set(false);
        // toggle + right
        assert_eq!(scope.dependency_count(), 2);

        // left is no longer observed
        let before = scope.render_count();
        left.set(10);
        assert_eq!(scope.render_count(), before);

        right.set(20);
        assert_eq!(scope.render_count(), before + 1);
    }
}
