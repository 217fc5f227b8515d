#![forbid(unsafe_code)]

//! Interfaces the host environment provides to the engine.
//!
//! The engine never discovers its collaborators; the host is passed into
//! every [`DragController`](crate::DragController) operation that needs it.
//! A host typically implements all of these on one struct that owns the
//! widget layer's layout and scroll state.

use gridshift_core::geometry::{Axis, Rect, Size};

/// Static layout geometry for the grid's tiles.
pub trait GeometryProvider {
    /// Current number of items. May change between drags; a change during
    /// a drag cancels it.
    fn item_count(&self) -> usize;

    /// On-screen rectangle of the tile at `index` in its layout slot, without
    /// any shift offset applied. `None` when the tile is not mounted.
    fn rect_of(&self, index: usize) -> Option<Rect>;

    /// Size of the tile at `index`.
    fn size_of(&self, index: usize) -> Option<Size> {
        self.rect_of(index).map(|rect| rect.size())
    }
}

/// A snapshot of the scrollable that hosts the grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollMetrics {
    pub offset: f32,
    pub min_extent: f32,
    pub max_extent: f32,
    /// Visible region of the scrollable, in the same space as tile rects.
    pub viewport: Rect,
    pub axis: Axis,
    /// Content grows from the trailing edge (offset increases toward the
    /// leading edge).
    pub reversed: bool,
}

impl ScrollMetrics {
    #[must_use]
    pub fn can_decrease(&self) -> bool {
        self.offset > self.min_extent
    }

    #[must_use]
    pub fn can_increase(&self) -> bool {
        self.offset < self.max_extent
    }

    #[must_use]
    pub fn clamp(&self, offset: f32) -> f32 {
        offset.clamp(self.min_extent, self.max_extent)
    }
}

/// The scroll position the engine nudges during edge autoscroll.
///
/// The engine animates each step itself by writing intermediate offsets from
/// its `tick`; the host only has to apply them.
pub trait ScrollController {
    fn metrics(&self) -> ScrollMetrics;

    fn set_offset(&mut self, offset: f32);
}

/// Caller-supplied predicates and outcome callbacks.
pub trait GridCallbacks {
    /// Whether dropping `dragged` onto `target` merges them. Queried on every
    /// resolver pass; must be pure.
    fn can_combine(&self, dragged: usize, target: usize) -> bool {
        let _ = (dragged, target);
        false
    }

    /// The dragged item at `old_index` was dropped at `new_index`. The host
    /// is responsible for mutating its collection.
    fn on_reorder(&mut self, old_index: usize, new_index: usize);

    /// The dragged item was dropped onto `target`.
    fn on_combine(&mut self, dragged: usize, target: usize) {
        let _ = (dragged, target);
    }
}

/// Everything the controller needs from its environment.
pub trait GridHost: GeometryProvider + GridCallbacks {
    /// The enclosing scrollable, if any. Autoscroll is inert without one.
    fn scroll_controller(&mut self) -> Option<&mut dyn ScrollController> {
        None
    }
}

/// Visual transform applied to the dragged proxy.
///
/// `progress` is the proxy's lift animation in [0, 1]: it rises when the
/// drag starts and falls while the drop settles.
pub trait ProxyDecorator<C> {
    fn decorate(&self, child: C, index: usize, progress: f32) -> C;
}

impl<C, F> ProxyDecorator<C> for F
where
    F: Fn(C, usize, f32) -> C,
{
    fn decorate(&self, child: C, index: usize, progress: f32) -> C {
        self(child, index, progress)
    }
}
