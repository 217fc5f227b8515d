#![forbid(unsafe_code)]

//! Drag session: the state of one in-flight drag.
//!
//! A [`DragSession`] is created when a drag starts and dropped when it
//! resolves. It keeps its own copy of everything it needs about the dragged
//! tile (index, size, grab offset) so the tile's registry entry can come and
//! go without corrupting the drag.
//!
//! # Proxy animation
//!
//! The proxy lifts in (progress 0 → 1) over the proxy duration. On drop it
//! settles: progress runs back to 0 from wherever it is while the proxy
//! rect flies to the landing slot.
//!
//! # Invariants
//!
//! 1. `proxy_origin() == position() - grab_offset()` until a settle starts.
//! 2. `dispose()` is idempotent and leaves no running animation.

use std::time::Duration;

use gridshift_core::animation::{Animation, RectTween, ScalarTween, ease_in_out, ease_out};
use gridshift_core::event::PointerId;
use gridshift_core::geometry::{Offset, Point, Rect, Size};

/// What the host needs to paint the floating proxy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProxyFrame {
    pub index: usize,
    pub rect: Rect,
    /// Lift progress in [0, 1].
    pub progress: f32,
}

#[derive(Debug, Clone)]
pub struct DragSession {
    index: usize,
    pointer: PointerId,
    item_size: Size,
    grab_offset: Offset,
    position: Point,
    item_count: usize,
    lift: ScalarTween,
    settle: Option<RectTween>,
    disposed: bool,
}

impl DragSession {
    /// Start a session for the tile at `index` whose static rect is
    /// `item_rect`, grabbed at `position`.
    #[must_use]
    pub fn start(
        index: usize,
        pointer: PointerId,
        position: Point,
        item_rect: Rect,
        item_count: usize,
        proxy_duration: Duration,
    ) -> Self {
        Self {
            index,
            pointer,
            item_size: item_rect.size(),
            grab_offset: position - item_rect.origin(),
            position,
            item_count,
            lift: ScalarTween::new(0.0, 1.0, proxy_duration).easing(ease_out),
            settle: None,
            disposed: false,
        }
    }

    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    #[must_use]
    pub fn pointer(&self) -> PointerId {
        self.pointer
    }

    #[must_use]
    pub fn item_size(&self) -> Size {
        self.item_size
    }

    #[must_use]
    pub fn grab_offset(&self) -> Offset {
        self.grab_offset
    }

    /// Current absolute pointer position.
    #[must_use]
    pub fn position(&self) -> Point {
        self.position
    }

    /// Item count observed when the drag started.
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.item_count
    }

    /// Accumulate pointer movement.
    pub fn update(&mut self, delta: Offset) {
        self.position += delta;
    }

    /// Top-left of the proxy while it follows the pointer.
    #[must_use]
    pub fn proxy_origin(&self) -> Point {
        self.position - self.grab_offset
    }

    /// Rect of the proxy while it follows the pointer.
    #[must_use]
    pub fn proxy_rect(&self) -> Rect {
        Rect::from_origin_size(self.proxy_origin(), self.item_size)
    }

    #[must_use]
    pub fn proxy_center(&self) -> Point {
        self.proxy_origin() + self.item_size.half()
    }

    #[must_use]
    pub fn progress(&self) -> f32 {
        self.lift.current()
    }

    #[must_use]
    pub fn is_settling(&self) -> bool {
        self.settle.is_some()
    }

    /// Begin the drop settle. With no landing rect the proxy fades in place.
    pub fn begin_settle(&mut self, landing: Option<Rect>, duration: Duration) {
        let from = self.proxy_rect();
        let to = landing.unwrap_or(from);
        self.settle = Some(RectTween::new(from, to, duration).easing(ease_in_out));
        self.lift.retarget_with(0.0, duration);
    }

    /// Whether a started settle has finished.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.settle
            .as_ref()
            .is_some_and(|settle| settle.is_complete() && self.lift.is_complete())
    }

    #[must_use]
    pub fn is_animating(&self) -> bool {
        !self.lift.is_complete() || self.settle.as_ref().is_some_and(|s| !s.is_complete())
    }

    pub fn tick(&mut self, dt: Duration) {
        if self.disposed {
            return;
        }
        self.lift.tick(dt);
        if let Some(settle) = self.settle.as_mut() {
            settle.tick(dt);
        }
    }

    #[must_use]
    pub fn proxy_frame(&self) -> ProxyFrame {
        let rect = self
            .settle
            .as_ref()
            .map_or_else(|| self.proxy_rect(), RectTween::current);
        ProxyFrame {
            index: self.index,
            rect,
            progress: self.progress(),
        }
    }

    /// Stop every animation. Safe to call more than once.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.lift.snap(0.0);
        self.settle = None;
        self.disposed = true;
    }

    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS_250: Duration = Duration::from_millis(250);

    fn session() -> DragSession {
        DragSession::start(
            2,
            PointerId(0),
            Point::new(130.0, 40.0),
            Rect::new(100.0, 0.0, 100.0, 100.0),
            5,
            MS_250,
        )
    }

    #[test]
    fn start_captures_grab_offset_and_size() {
        let s = session();
        assert_eq!(s.grab_offset(), Offset::new(30.0, 40.0));
        assert_eq!(s.item_size(), Size::new(100.0, 100.0));
        assert_eq!(s.proxy_origin(), Point::new(100.0, 0.0));
        assert_eq!(s.proxy_center(), Point::new(150.0, 50.0));
    }

    #[test]
    fn update_accumulates_movement() {
        let mut s = session();
        s.update(Offset::new(10.0, 0.0));
        s.update(Offset::new(5.0, -20.0));
        assert_eq!(s.position(), Point::new(145.0, 20.0));
        assert_eq!(s.proxy_rect(), Rect::new(115.0, -20.0, 100.0, 100.0));
    }

    #[test]
    fn lift_progress_rises() {
        let mut s = session();
        assert_eq!(s.progress(), 0.0);
        s.tick(MS_250);
        assert_eq!(s.progress(), 1.0);
        assert!(!s.is_animating());
    }

    #[test]
    fn settle_flies_to_landing_and_fades() {
        let mut s = session();
        s.tick(MS_250);
        let landing = Rect::new(0.0, 100.0, 100.0, 100.0);
        s.begin_settle(Some(landing), MS_250);
        assert!(s.is_settling());
        assert!(!s.is_settled());
        s.tick(Duration::from_millis(125));
        let mid = s.proxy_frame();
        assert!(mid.progress > 0.0 && mid.progress < 1.0);
        s.tick(Duration::from_millis(125));
        assert!(s.is_settled());
        assert_eq!(s.proxy_frame().rect, landing);
        assert_eq!(s.proxy_frame().progress, 0.0);
    }

    #[test]
    fn dispose_is_idempotent() {
        let mut s = session();
        s.begin_settle(None, MS_250);
        s.dispose();
        s.dispose();
        assert!(s.is_disposed());
        assert!(!s.is_animating());
        assert_eq!(s.progress(), 0.0);
    }
}
