//! Native stack headroom for recursive rendering.
//!
//! Nested conditional bodies, loop iterations, tag bodies, parameter
//! groups, and tags used as parameters each add Rust frames. Every such
//! step runs through `with_stack_headroom`, so nesting depth is bounded by
//! memory rather than by the thread's stack size.

/// Headroom below which a fresh stack segment is allocated.
#[cfg(not(target_arch = "wasm32"))]
const MIN_HEADROOM: usize = 128 * 1024;

/// Size of each fresh segment.
#[cfg(not(target_arch = "wasm32"))]
const SEGMENT_SIZE: usize = 2 * 1024 * 1024;

/// Run `f` with at least `MIN_HEADROOM` bytes of stack left.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn with_stack_headroom<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(MIN_HEADROOM, SEGMENT_SIZE, f)
}

/// `stacker` cannot switch stacks on wasm32; run `f` in place.
#[inline]
#[cfg(target_arch = "wasm32")]
pub fn with_stack_headroom<R>(f: impl FnOnce() -> R) -> R {
    f()
}
