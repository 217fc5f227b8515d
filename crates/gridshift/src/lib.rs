#![forbid(unsafe_code)]

//! gridshift: a headless drag-and-drop reorder engine for grids.
//!
//! A user picks up a tile, drags it across its siblings, and drops it either
//! at a new position (reorder) or onto a compatible tile (combine). The
//! engine tracks the gap under the pointer, slides siblings out of the way,
//! nudges the enclosing scrollable near its edges, and fires exactly one
//! outcome callback per completed drag.
//!
//! # Key Components
//!
//! - [`DragController`] - the state machine hosts talk to
//! - [`DragSession`] - the in-flight drag and its floating proxy
//! - [`GapResolver`] - proxy position to insertion index / combine target
//! - [`ItemRegistry`] - per-tile shift state and animation
//! - [`AutoScroller`] - stepped edge autoscroll
//! - [`GridHost`] - geometry, scrolling and callbacks supplied by the host
//!
//! # How it fits in the system
//! Rendering, layout and input dispatch stay with the host. The host forwards
//! pointer events, calls [`DragController::tick`] each frame, and paints
//! tiles at [`DragController::item_offset`] plus the proxy from
//! [`DragController::proxy`]. Primitives live in `gridshift-core`.
//!
//! Logging goes through `tracing` under the `gridshift.*` targets; the
//! library installs no subscriber.

pub mod autoscroll;
pub mod config;
pub mod controller;
pub mod error;
pub mod host;
pub mod registry;
pub mod resolver;
pub mod session;

pub use autoscroll::{AutoScroller, StepStatus, compute_step};
pub use config::{
    AutoscrollConfig, CombineThreshold, GridConfig, GridPolicyConfig, PolicyConfigError,
    StartStrategyConfig, ThresholdBasis,
};
pub use controller::{
    CancelReason, DragController, DragEffect, DragNoopReason, DragOutcome, DragPhase,
    DragTransition,
};
pub use error::GridError;
pub use host::{
    GeometryProvider, GridCallbacks, GridHost, ProxyDecorator, ScrollController, ScrollMetrics,
};
pub use registry::{GapUpdate, GridId, ItemKey, ItemPhase, ItemRegistry, RegistryEntry};
pub use resolver::{GapResolver, Resolution, ResolverPass};
pub use session::{DragSession, ProxyFrame};

pub use gridshift_core::event::{PointerEvent, PointerEventKind, PointerId};
pub use gridshift_core::geometry::{Axis, Offset, Point, Rect, Size};
