#![forbid(unsafe_code)]

//! Error types for the drag engine.
//!
//! Only usage errors surface as [`GridError`]. Recoverable inconsistencies
//! (tiles unmounting mid-drag, item count changing under a drag) are handled
//! inside the engine and reported as `Canceled` transitions instead.

use std::fmt;

/// Errors returned by [`DragController`](crate::DragController) operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    /// A drag was requested on an index that has no mounted, registered tile.
    UnregisteredItem { index: usize },
    /// A drag was requested on the index that is already being dragged.
    AlreadyDragging { index: usize },
    /// The configuration failed validation.
    InvalidConfig(Vec<String>),
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnregisteredItem { index } => {
                write!(f, "item {index} is not registered or not mounted")
            }
            Self::AlreadyDragging { index } => write!(f, "item {index} is already being dragged"),
            Self::InvalidConfig(errors) => {
                write!(f, "invalid grid config: {}", errors.join("; "))
            }
        }
    }
}

impl std::error::Error for GridError {}
