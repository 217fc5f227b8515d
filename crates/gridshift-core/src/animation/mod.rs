#![forbid(unsafe_code)]

//! Tick-driven animation primitives.
//!
//! Nothing in this module reads a clock. Every animation advances only when
//! its owner calls [`Animation::tick`] with an elapsed [`Duration`], which
//! keeps the drag engine deterministic and trivially testable.
//!
//! # Invariants
//!
//! 1. `value()` is always in [0.0, 1.0].
//! 2. Once `is_complete()` returns true, further ticks do not change `value()`.
//! 3. `reset()` returns the animation to its initial, incomplete state.

use std::time::Duration;

mod tween;

pub use tween::{Lerp, OffsetTween, RectTween, ScalarTween, Tween};

/// An easing curve mapping linear progress `t` in [0, 1] to eased progress.
pub type EasingFn = fn(f32) -> f32;

/// A value that advances over time.
pub trait Animation {
    /// Advance by `dt`.
    fn tick(&mut self, dt: Duration);

    /// Whether the animation has reached its end.
    fn is_complete(&self) -> bool;

    /// Eased progress in [0.0, 1.0].
    fn value(&self) -> f32;

    /// Restart from the beginning.
    fn reset(&mut self);
}

// ---------------------------------------------------------------------------
// Easing curves
// ---------------------------------------------------------------------------

#[must_use]
pub fn linear(t: f32) -> f32 {
    t.clamp(0.0, 1.0)
}

/// Quadratic ease-in.
#[must_use]
pub fn ease_in(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * t
}

/// Quadratic ease-out.
#[must_use]
pub fn ease_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t) * (1.0 - t)
}

/// Quadratic ease-in-out. Used for sibling shift transitions.
#[must_use]
pub fn ease_in_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        2.0 * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
    }
}
