#![forbid(unsafe_code)]

//! Interpolating tweens with mid-flight retargeting.
//!
//! A [`Tween`] moves a value from `from` to `to` over a fixed duration.
//! [`Tween::retarget`] restarts the transition from whatever value is
//! currently rendered, so a tile that is told to move again before the
//! previous move finished never jumps.
//!
//! # Failure Modes
//!
//! - Zero duration: the tween is complete immediately and rests on `to`.

use std::time::Duration;

use super::{Animation, EasingFn, linear};
use crate::geometry::{Offset, Rect};

/// Types that can be linearly interpolated.
pub trait Lerp: Copy {
    fn lerp(from: Self, to: Self, t: f32) -> Self;
}

impl Lerp for f32 {
    fn lerp(from: Self, to: Self, t: f32) -> Self {
        from + (to - from) * t
    }
}

impl Lerp for Offset {
    fn lerp(from: Self, to: Self, t: f32) -> Self {
        Offset::lerp(from, to, t)
    }
}

impl Lerp for Rect {
    fn lerp(from: Self, to: Self, t: f32) -> Self {
        Rect::lerp(from, to, t)
    }
}

/// A timed transition between two values.
#[derive(Debug, Clone, Copy)]
pub struct Tween<T: Lerp> {
    from: T,
    to: T,
    duration: Duration,
    elapsed: Duration,
    easing: EasingFn,
}

pub type ScalarTween = Tween<f32>;
pub type OffsetTween = Tween<Offset>;
pub type RectTween = Tween<Rect>;

impl<T: Lerp> Tween<T> {
    /// Create a linear tween.
    #[must_use]
    pub fn new(from: T, to: T, duration: Duration) -> Self {
        Self {
            from,
            to,
            duration,
            elapsed: Duration::ZERO,
            easing: linear,
        }
    }

    /// A tween already resting on `value`.
    #[must_use]
    pub fn settled(value: T) -> Self {
        Self::new(value, value, Duration::ZERO)
    }

    /// Set the easing curve (builder pattern).
    #[must_use]
    pub fn easing(mut self, easing: EasingFn) -> Self {
        self.easing = easing;
        self
    }

    /// The currently rendered value.
    #[must_use]
    pub fn current(&self) -> T {
        T::lerp(self.from, self.to, self.value())
    }

    #[must_use]
    pub fn start(&self) -> T {
        self.from
    }

    #[must_use]
    pub fn target(&self) -> T {
        self.to
    }

    #[must_use]
    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Restart toward `to` from the currently rendered value, keeping the
    /// configured duration and easing.
    pub fn retarget(&mut self, to: T) {
        let duration = self.duration;
        self.retarget_with(to, duration);
    }

    /// Restart toward `to` from the currently rendered value over `duration`.
    pub fn retarget_with(&mut self, to: T, duration: Duration) {
        self.from = self.current();
        self.to = to;
        self.duration = duration;
        self.elapsed = Duration::ZERO;
    }

    /// Jump to `value` and stop.
    pub fn snap(&mut self, value: T) {
        self.from = value;
        self.to = value;
        self.elapsed = self.duration;
    }
}

impl<T: Lerp> Animation for Tween<T> {
    fn tick(&mut self, dt: Duration) {
        self.elapsed = self.elapsed.saturating_add(dt).min(self.duration);
    }

    fn is_complete(&self) -> bool {
        self.elapsed >= self.duration
    }

    fn value(&self) -> f32 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let t = self.elapsed.as_secs_f32() / self.duration.as_secs_f32();
        (self.easing)(t.clamp(0.0, 1.0))
    }

    fn reset(&mut self) {
        self.elapsed = Duration::ZERO;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::ease_in_out;

    const MS_100: Duration = Duration::from_millis(100);

    #[test]
    fn scalar_tween_reaches_target() {
        let mut tween = ScalarTween::new(0.0, 10.0, MS_100);
        assert_eq!(tween.current(), 0.0);
        tween.tick(Duration::from_millis(50));
        assert!((tween.current() - 5.0).abs() < 1e-4);
        assert!(!tween.is_complete());
        tween.tick(Duration::from_millis(60));
        assert!(tween.is_complete());
        assert_eq!(tween.current(), 10.0);
    }

    #[test]
    fn zero_duration_is_complete_immediately() {
        let tween = OffsetTween::new(Offset::ZERO, Offset::new(4.0, 0.0), Duration::ZERO);
        assert!(tween.is_complete());
        assert_eq!(tween.current(), Offset::new(4.0, 0.0));
    }

    #[test]
    fn retarget_starts_from_rendered_value() {
        let mut tween = OffsetTween::new(Offset::ZERO, Offset::new(100.0, 0.0), MS_100);
        tween.tick(Duration::from_millis(50));
        let mid = tween.current();
        tween.retarget(Offset::ZERO);
        assert_eq!(tween.start(), mid);
        assert_eq!(tween.current(), mid);
        tween.tick(MS_100);
        assert_eq!(tween.current(), Offset::ZERO);
    }

    #[test]
    fn snap_stops_on_value() {
        let mut tween = ScalarTween::new(0.0, 1.0, MS_100);
        tween.tick(Duration::from_millis(10));
        tween.snap(0.0);
        assert!(tween.is_complete());
        assert_eq!(tween.current(), 0.0);
    }

    #[test]
    fn reset_restarts_progress() {
        let mut tween = ScalarTween::new(0.0, 1.0, MS_100).easing(ease_in_out);
        tween.tick(MS_100);
        assert!(tween.is_complete());
        tween.reset();
        assert!(!tween.is_complete());
        assert_eq!(tween.value(), 0.0);
    }
}
