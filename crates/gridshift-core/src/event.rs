#![forbid(unsafe_code)]

//! Canonical pointer events.
//!
//! Hosts translate their platform input (mouse, touch, pen) into
//! [`PointerEvent`] values before forwarding them to the engine. Positions
//! are absolute, in the same space as the geometry the host reports.

use crate::geometry::Point;

/// Identifies one pointer (a mouse, or one finger of a touch screen).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct PointerId(pub u32);

/// What happened to the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum PointerEventKind {
    /// Button pressed or touch began.
    Down,
    /// Pointer moved while pressed.
    Move,
    /// Button released or touch lifted.
    Up,
    /// The platform revoked the pointer (focus loss, gesture arena loss).
    Cancel,
}

/// A single pointer sample.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PointerEvent {
    pub pointer: PointerId,
    pub kind: PointerEventKind,
    pub position: Point,
}

impl PointerEvent {
    #[must_use]
    pub const fn new(pointer: PointerId, kind: PointerEventKind, position: Point) -> Self {
        Self {
            pointer,
            kind,
            position,
        }
    }

    #[must_use]
    pub const fn down(pointer: PointerId, position: Point) -> Self {
        Self::new(pointer, PointerEventKind::Down, position)
    }

    #[must_use]
    pub const fn moved(pointer: PointerId, position: Point) -> Self {
        Self::new(pointer, PointerEventKind::Move, position)
    }

    #[must_use]
    pub const fn up(pointer: PointerId, position: Point) -> Self {
        Self::new(pointer, PointerEventKind::Up, position)
    }

    #[must_use]
    pub const fn cancel(pointer: PointerId, position: Point) -> Self {
        Self::new(pointer, PointerEventKind::Cancel, position)
    }
}
