#![forbid(unsafe_code)]

//! Drag-start gesture recognition.
//!
//! A pointer that goes down on a tile does not necessarily start a drag.
//! Whether and when it does is decided by a [`GestureStartStrategy`]:
//!
//! - [`Immediate`]: the drag starts on pointer-down.
//! - [`Delayed`]: the pointer must be held still for a timeout (long press).
//!   Moving beyond the touch slop first rejects the gesture so the host can
//!   treat it as a scroll.
//! - [`AxisConstrained`]: the drag starts once the pointer travels the slop
//!   along one axis; dominant travel along the other axis rejects it.
//!
//! [`DragGestureRecognizer`] owns at most one tracked pointer and applies a
//! strategy to it, turning raw [`PointerEvent`]s into [`GestureEvent`]s.
//!
//! # State Machine
//!
//! ```text
//! Idle -> Pending -> Active -> Idle
//!            \-----> Idle (rejected, released, or cancelled while pending)
//! ```
//!
//! # Invariants
//!
//! 1. Events for a pointer other than the tracked one are ignored.
//! 2. `Accepted` is emitted at most once per tracked pointer, and always
//!    before any `Moved` for that pointer.
//! 3. After `reset()`, the recognizer is idle.

use std::fmt;
use std::time::Duration;

use web_time::Instant;

use crate::event::{PointerEvent, PointerEventKind, PointerId};
use crate::geometry::{Axis, Offset, Point};

/// Default long-press timeout for [`Delayed`].
pub const DEFAULT_LONG_PRESS_TIMEOUT: Duration = Duration::from_millis(500);

/// Default distance a pointer may wander before it counts as movement.
pub const DEFAULT_TOUCH_SLOP: f32 = 18.0;

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

/// A pointer that went down and has not yet been accepted or rejected.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingPointer {
    pub pointer: PointerId,
    pub origin: Point,
    pub current: Point,
    pub down_at: Instant,
}

impl PendingPointer {
    #[must_use]
    pub fn travel(&self) -> Offset {
        self.current - self.origin
    }
}

/// Verdict of a strategy on a pending pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartDecision {
    /// Keep waiting.
    Pending,
    /// Start the drag.
    Accept,
    /// Give the pointer up; no drag will start.
    Reject,
}

/// Decides when a pressed pointer becomes a drag.
pub trait GestureStartStrategy: fmt::Debug {
    fn evaluate(&self, pending: &PendingPointer, now: Instant) -> StartDecision;

    /// Short name for diagnostics.
    fn name(&self) -> &'static str;
}

/// Starts the drag as soon as the pointer goes down.
#[derive(Debug, Clone, Copy, Default)]
pub struct Immediate;

impl GestureStartStrategy for Immediate {
    fn evaluate(&self, _pending: &PendingPointer, _now: Instant) -> StartDecision {
        StartDecision::Accept
    }

    fn name(&self) -> &'static str {
        "immediate"
    }
}

/// Starts the drag after the pointer is held still for `timeout`.
#[derive(Debug, Clone, Copy)]
pub struct Delayed {
    pub timeout: Duration,
    pub slop: f32,
}

impl Delayed {
    #[must_use]
    pub const fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            slop: DEFAULT_TOUCH_SLOP,
        }
    }
}

impl Default for Delayed {
    fn default() -> Self {
        Self::new(DEFAULT_LONG_PRESS_TIMEOUT)
    }
}

impl GestureStartStrategy for Delayed {
    fn evaluate(&self, pending: &PendingPointer, now: Instant) -> StartDecision {
        if pending.travel().length() > self.slop {
            StartDecision::Reject
        } else if now.saturating_duration_since(pending.down_at) >= self.timeout {
            StartDecision::Accept
        } else {
            StartDecision::Pending
        }
    }

    fn name(&self) -> &'static str {
        "delayed"
    }
}

/// Starts the drag once the pointer travels `slop` along `axis`.
#[derive(Debug, Clone, Copy)]
pub struct AxisConstrained {
    pub axis: Axis,
    pub slop: f32,
}

impl AxisConstrained {
    #[must_use]
    pub const fn new(axis: Axis) -> Self {
        Self {
            axis,
            slop: DEFAULT_TOUCH_SLOP,
        }
    }
}

impl GestureStartStrategy for AxisConstrained {
    fn evaluate(&self, pending: &PendingPointer, _now: Instant) -> StartDecision {
        let travel = pending.travel();
        let along = travel.along(self.axis).abs();
        let across = travel.along(self.axis.cross()).abs();
        if along >= self.slop && along >= across {
            StartDecision::Accept
        } else if across >= self.slop {
            StartDecision::Reject
        } else {
            StartDecision::Pending
        }
    }

    fn name(&self) -> &'static str {
        match self.axis {
            Axis::Horizontal => "axis_constrained_horizontal",
            Axis::Vertical => "axis_constrained_vertical",
        }
    }
}

// ---------------------------------------------------------------------------
// Recognizer
// ---------------------------------------------------------------------------

/// Semantic output of the recognizer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureEvent {
    /// The strategy accepted the pointer. `position` is where the pointer
    /// is now; `origin` is where it went down.
    Accepted {
        pointer: PointerId,
        origin: Point,
        position: Point,
    },
    /// The strategy gave the pointer up before a drag started.
    Rejected { pointer: PointerId },
    /// An accepted pointer moved.
    Moved {
        pointer: PointerId,
        position: Point,
        delta: Offset,
    },
    /// An accepted pointer was released.
    Released { pointer: PointerId, position: Point },
    /// An accepted pointer was revoked by the platform.
    Canceled { pointer: PointerId },
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum RecognizerState {
    Idle,
    Pending(PendingPointer),
    Active { pointer: PointerId, last: Point },
}

/// Applies a [`GestureStartStrategy`] to one pointer at a time.
pub struct DragGestureRecognizer {
    strategy: Box<dyn GestureStartStrategy>,
    state: RecognizerState,
}

impl fmt::Debug for DragGestureRecognizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DragGestureRecognizer")
            .field("strategy", &self.strategy.name())
            .field("state", &self.state)
            .finish()
    }
}

impl Default for DragGestureRecognizer {
    fn default() -> Self {
        Self::new(Box::new(Immediate))
    }
}

impl DragGestureRecognizer {
    #[must_use]
    pub fn new(strategy: Box<dyn GestureStartStrategy>) -> Self {
        Self {
            strategy,
            state: RecognizerState::Idle,
        }
    }

    #[must_use]
    pub fn strategy(&self) -> &dyn GestureStartStrategy {
        self.strategy.as_ref()
    }

    /// Swap the strategy. Any tracked pointer is dropped.
    pub fn set_strategy(&mut self, strategy: Box<dyn GestureStartStrategy>) {
        self.strategy = strategy;
        self.state = RecognizerState::Idle;
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        matches!(self.state, RecognizerState::Pending(_))
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        matches!(self.state, RecognizerState::Active { .. })
    }

    /// The pointer currently tracked, pending or active.
    #[must_use]
    pub fn tracked_pointer(&self) -> Option<PointerId> {
        match self.state {
            RecognizerState::Idle => None,
            RecognizerState::Pending(p) => Some(p.pointer),
            RecognizerState::Active { pointer, .. } => Some(pointer),
        }
    }

    /// Begin tracking a pointer that went down. Replaces any tracked pointer.
    ///
    /// Returns `Accepted` right away when the strategy does not need to wait.
    pub fn add_pointer(&mut self, pointer: PointerId, position: Point, now: Instant) -> Option<GestureEvent> {
        let pending = PendingPointer {
            pointer,
            origin: position,
            current: position,
            down_at: now,
        };
        self.state = RecognizerState::Pending(pending);
        self.decide(pending, now)
    }

    /// Feed a move/up/cancel event for the tracked pointer.
    ///
    /// `Down` events are ignored here; use [`add_pointer`](Self::add_pointer).
    pub fn process(&mut self, event: &PointerEvent, now: Instant) -> Option<GestureEvent> {
        if self.tracked_pointer() != Some(event.pointer) {
            return None;
        }
        match (self.state, event.kind) {
            (_, PointerEventKind::Down) | (RecognizerState::Idle, _) => None,
            (RecognizerState::Pending(mut pending), PointerEventKind::Move) => {
                pending.current = event.position;
                self.state = RecognizerState::Pending(pending);
                self.decide(pending, now)
            }
            (
                RecognizerState::Pending(pending),
                PointerEventKind::Up | PointerEventKind::Cancel,
            ) => {
                self.state = RecognizerState::Idle;
                Some(GestureEvent::Rejected {
                    pointer: pending.pointer,
                })
            }
            (RecognizerState::Active { pointer, last }, PointerEventKind::Move) => {
                self.state = RecognizerState::Active {
                    pointer,
                    last: event.position,
                };
                Some(GestureEvent::Moved {
                    pointer,
                    position: event.position,
                    delta: event.position - last,
                })
            }
            (RecognizerState::Active { pointer, .. }, PointerEventKind::Up) => {
                self.state = RecognizerState::Idle;
                Some(GestureEvent::Released {
                    pointer,
                    position: event.position,
                })
            }
            (RecognizerState::Active { pointer, .. }, PointerEventKind::Cancel) => {
                self.state = RecognizerState::Idle;
                Some(GestureEvent::Canceled { pointer })
            }
        }
    }

    /// Re-evaluate a pending pointer without new input. Call on tick so
    /// time-based strategies can fire.
    pub fn poll(&mut self, now: Instant) -> Option<GestureEvent> {
        match self.state {
            RecognizerState::Pending(pending) => self.decide(pending, now),
            _ => None,
        }
    }

    /// Drop any tracked pointer without emitting anything.
    pub fn reset(&mut self) {
        self.state = RecognizerState::Idle;
    }

    fn decide(&mut self, pending: PendingPointer, now: Instant) -> Option<GestureEvent> {
        match self.strategy.evaluate(&pending, now) {
            StartDecision::Pending => None,
            StartDecision::Accept => {
                #[cfg(feature = "tracing")]
                tracing::trace!(
                    target: "gridshift.gesture",
                    strategy = self.strategy.name(),
                    pointer = pending.pointer.0,
                    "drag gesture accepted"
                );
                self.state = RecognizerState::Active {
                    pointer: pending.pointer,
                    last: pending.current,
                };
                Some(GestureEvent::Accepted {
                    pointer: pending.pointer,
                    origin: pending.origin,
                    position: pending.current,
                })
            }
            StartDecision::Reject => {
                #[cfg(feature = "tracing")]
                tracing::trace!(
                    target: "gridshift.gesture",
                    strategy = self.strategy.name(),
                    pointer = pending.pointer.0,
                    "drag gesture rejected"
                );
                self.state = RecognizerState::Idle;
                Some(GestureEvent::Rejected {
                    pointer: pending.pointer,
                })
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
