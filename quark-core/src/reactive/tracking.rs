//! Render-pass tracking.
//!
//! Subscription in Quark is implicit: a component subscribes to an atom by
//! reading it while its render function runs. This module supplies the two
//! halves of that contract. [`run_tracked`] wraps one render pass and
//! collects every signal read made inside it; [`record_read`] is what a
//! signal calls to report a read and learn who is rendering.
//!
//! Passes nest (a parent rendering a child inline), so the bookkeeping is a
//! thread-local stack of frames rather than a single slot. A read always
//! belongs to the innermost frame. The stack is per thread; nothing here is
//! shared across threads.

use std::cell::RefCell;
use std::sync::atomic::{AtomicU64, Ordering};

/// Unique identifier for an observer (usually a render scope).
///
/// Signals and the runtime refer to observers by this ID when recording and
/// clearing dependencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

impl ObserverId {
    /// Generate a new unique observer ID.
    pub fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for ObserverId {
    fn default() -> Self {
        Self::new()
    }
}

/// One render pass in flight on this thread.
struct Frame {
    observer: ObserverId,
    reads: Vec<u64>,
}

thread_local! {
    static PASSES: RefCell<Vec<Frame>> = RefCell::new(Vec::new());
}

/// Pops the innermost frame if `run_tracked`'s render function panics, so
/// an unwound pass cannot leave its frame behind.
struct FrameGuard;

impl Drop for FrameGuard {
    fn drop(&mut self) {
        PASSES.with(|stack| {
            stack.borrow_mut().pop();
        });
    }
}

/// Run `render` as a render pass for `observer`.
///
/// Every signal read inside `render` is attributed to `observer` and
/// returned alongside the render result. The pass ends when `render`
/// returns (or unwinds).
pub fn run_tracked<R, F>(observer: ObserverId, render: F) -> (R, Vec<u64>)
where
    F: FnOnce() -> R,
{
    PASSES.with(|stack| {
        stack.borrow_mut().push(Frame {
            observer,
            reads: Vec::new(),
        })
    });

    let guard = FrameGuard;
    let result = render();
    std::mem::forget(guard);

    let reads = PASSES
        .with(|stack| stack.borrow_mut().pop())
        .map(|frame| frame.reads)
        .unwrap_or_default();

    (result, reads)
}

/// Check whether a render pass is active on this thread.
pub fn in_render_pass() -> bool {
    PASSES.with(|stack| !stack.borrow().is_empty())
}

/// Report a signal read to the innermost render pass.
///
/// Returns the observer the read belongs to, or `None` when no pass is
/// active and the read is untracked.
pub(crate) fn record_read(signal_id: u64) -> Option<ObserverId> {
    PASSES.with(|stack| {
        let mut stack = stack.borrow_mut();
        let frame = stack.last_mut()?;
        frame.reads.push(signal_id);
        Some(frame.observer)
    })
}
