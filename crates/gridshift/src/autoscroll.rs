#![forbid(unsafe_code)]

//! Edge autoscroll.
//!
//! While a drag is active, a proxy that pokes past the leading or trailing
//! edge of the viewport nudges the enclosing scrollable one step at a time.
//! A step is a short linear tween of the scroll offset, written to the host
//! on every tick. When it lands the controller re-resolves the gap (the
//! tiles moved under the proxy) and asks for the next step.
//!
//! Step size: `step_scale * max(overshoot, min_overshoot) / overshoot_divisor`,
//! clamped to the scroll extent. Steps smaller than `min_step` are skipped.
//!
//! # Invariants
//!
//! 1. At most one step is in flight; requests made meanwhile are ignored.
//! 2. Offsets written to the host stay within `[min_extent, max_extent]`.

use std::time::Duration;

use gridshift_core::animation::{Animation, ScalarTween};
use gridshift_core::geometry::Rect;

use crate::config::AutoscrollConfig;
use crate::host::{ScrollController, ScrollMetrics};

/// Scroll target for one step, or `None` when the proxy is inside the
/// viewport, there is no travel left, or the step would be too small.
#[must_use]
pub fn compute_step(config: &AutoscrollConfig, proxy: Rect, metrics: &ScrollMetrics) -> Option<f32> {
    let axis = metrics.axis;
    let before_start = metrics.viewport.start(axis) - proxy.start(axis);
    let past_end = proxy.end(axis) - metrics.viewport.end(axis);

    let (overshoot, direction) = if metrics.reversed {
        if past_end > 0.0 && metrics.can_decrease() {
            (past_end, -1.0)
        } else if before_start > 0.0 && metrics.can_increase() {
            (before_start, 1.0)
        } else {
            return None;
        }
    } else if before_start > 0.0 && metrics.can_decrease() {
        (before_start, -1.0)
    } else if past_end > 0.0 && metrics.can_increase() {
        (past_end, 1.0)
    } else {
        return None;
    };

    let step = config.step_scale * overshoot.max(config.min_overshoot) / config.overshoot_divisor;
    let target = metrics.clamp(metrics.offset + direction * step);
    if (target - metrics.offset).abs() < config.min_step {
        return None;
    }
    Some(target)
}

/// Progress of the in-flight step after a tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StepStatus {
    Idle,
    InFlight,
    Completed { offset: f32 },
}

#[derive(Debug, Clone, Default)]
pub struct AutoScroller {
    step: Option<ScalarTween>,
    steps: u64,
}

impl AutoScroller {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_scrolling(&self) -> bool {
        self.step.is_some()
    }

    /// Steps started since construction.
    #[must_use]
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Start a step if the proxy is past an edge. Returns the step's target.
    pub fn request(
        &mut self,
        config: &AutoscrollConfig,
        proxy: Rect,
        scroll: &dyn ScrollController,
    ) -> Option<f32> {
        if !config.enabled || self.step.is_some() {
            return None;
        }
        let metrics = scroll.metrics();
        let target = compute_step(config, proxy, &metrics)?;
        tracing::trace!(
            target: "gridshift.autoscroll",
            from = metrics.offset,
            to = target,
            "autoscroll step"
        );
        self.step = Some(ScalarTween::new(metrics.offset, target, config.step_duration));
        self.steps += 1;
        Some(target)
    }

    /// Advance the in-flight step and write the offset to the host.
    pub fn tick(&mut self, dt: Duration, scroll: &mut dyn ScrollController) -> StepStatus {
        let Some(step) = self.step.as_mut() else {
            return StepStatus::Idle;
        };
        step.tick(dt);
        let offset = step.current();
        scroll.set_offset(offset);
        if step.is_complete() {
            self.step = None;
            StepStatus::Completed { offset }
        } else {
            StepStatus::InFlight
        }
    }

    /// Drop the in-flight step. The scroll offset stays where it is.
    pub fn cancel(&mut self) {
        self.step = None;
    }
}
