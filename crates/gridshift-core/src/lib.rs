#![cfg_attr(not(test), forbid(unsafe_code))]
#![cfg_attr(test, deny(unsafe_code))]

//! Core: geometry, pointer events, animation primitives, and drag-start gestures.
//!
//! # Role in gridshift
//! `gridshift-core` holds the host-agnostic pieces the drag engine is built
//! from. Nothing here knows about grids, items, or reordering.
//!
//! # Primary responsibilities
//! - **Geometry**: screen-space `Point`, `Offset`, `Size`, `Rect`, `Axis`.
//! - **Event**: normalized pointer events the host forwards to the engine.
//! - **Animation**: tick-driven `Animation` trait, easing curves, and tweens
//!   that can be retargeted mid-flight.
//! - **Gesture**: pluggable drag-start strategies (`Immediate`, `Delayed`,
//!   `AxisConstrained`) and the recognizer that applies them.
//!
//! # How it fits in the system
//! The engine crate (`gridshift`) consumes these types and drives every
//! animation from its own `tick`, so time only moves when the host says so.

pub mod animation;
pub mod event;
pub mod geometry;
pub mod gesture;
