#![forbid(unsafe_code)]

//! Gap/insertion resolver.
//!
//! Maps the proxy position to an insertion index and an optional combine
//! target. One pass runs per pointer move and per completed autoscroll step.
//!
//! # Pass
//!
//! 1. Proxy center = proxy origin + half the dragged tile's size.
//! 2. The candidate is the first registered, non-dragged tile whose static
//!    rect contains the center. Tiles with no rect are treated as unmounted.
//!    With no candidate the insertion index is kept and any combine target
//!    is dropped.
//! 3. Within the combine threshold of the candidate's center, and with the
//!    host's predicate allowing it, the candidate becomes the combine target
//!    and the insertion index returns to the dragged index.
//! 4. Otherwise the insertion index is `candidate - 1` when the center is
//!    nearer the candidate's top-left corner than its top-right corner, and
//!    `candidate` when not.
//! 5. The registry's gap is refreshed only when the insertion index changed.
//!
//! # Invariants
//!
//! 1. `insertion_index < item_count` whenever `item_count > 0`.
//! 2. A combine target is never the dragged index.

use gridshift_core::geometry::{Point, Rect};

use crate::config::GridConfig;
use crate::host::{GeometryProvider, GridCallbacks};
use crate::registry::{GapUpdate, ItemRegistry};
use crate::session::DragSession;

/// Where the dragged tile would land if dropped now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub insertion_index: usize,
    pub combine_target: Option<usize>,
}

impl Resolution {
    #[must_use]
    pub const fn at(index: usize) -> Self {
        Self {
            insertion_index: index,
            combine_target: None,
        }
    }
}

/// Result of one resolver pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolverPass {
    pub resolution: Resolution,
    /// Tile under the proxy center, if any.
    pub candidate: Option<usize>,
    pub index_changed: bool,
    pub combine_changed: bool,
}

impl ResolverPass {
    #[must_use]
    pub fn changed(&self) -> bool {
        self.index_changed || self.combine_changed
    }
}

#[derive(Debug, Clone, Default)]
pub struct GapResolver {
    dragged: Option<usize>,
    resolution: Option<Resolution>,
    passes: u64,
}

impl GapResolver {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start tracking a drag of `dragged`.
    pub fn begin(&mut self, dragged: usize) {
        self.dragged = Some(dragged);
        self.resolution = Some(Resolution::at(dragged));
    }

    pub fn clear(&mut self) {
        self.dragged = None;
        self.resolution = None;
    }

    #[must_use]
    pub fn resolution(&self) -> Option<Resolution> {
        self.resolution
    }

    /// Total passes run since construction.
    #[must_use]
    pub fn passes(&self) -> u64 {
        self.passes
    }

    /// Run one pass for `session` and push any gap change into `registry`.
    pub fn resolve<H>(
        &mut self,
        session: &DragSession,
        host: &H,
        registry: &mut ItemRegistry,
        config: &GridConfig,
    ) -> ResolverPass
    where
        H: GeometryProvider + GridCallbacks + ?Sized,
    {
        let dragged = session.index();
        if self.dragged != Some(dragged) {
            self.begin(dragged);
        }
        self.passes += 1;
        let previous = self.resolution.unwrap_or(Resolution::at(dragged));
        let center = session.proxy_center();
        let last_index = session.item_count().saturating_sub(1);

        let candidate = registry
            .indices()
            .filter(|&index| index != dragged)
            .find_map(|index| {
                host.rect_of(index)
                    .filter(|rect| rect.contains(center))
                    .map(|rect| (index, rect))
            });

        let next = match candidate {
            None => Resolution {
                insertion_index: previous.insertion_index,
                combine_target: None,
            },
            Some((index, rect)) => {
                let threshold = config.combine.distance_for(rect, config.axis);
                if center.distance(rect.center()) < threshold && host.can_combine(dragged, index) {
                    Resolution {
                        insertion_index: dragged,
                        combine_target: Some(index),
                    }
                } else {
                    Resolution {
                        insertion_index: side_of(center, index, rect).min(last_index),
                        combine_target: None,
                    }
                }
            }
        };

        let pass = ResolverPass {
            resolution: next,
            candidate: candidate.map(|(index, _)| index),
            index_changed: next.insertion_index != previous.insertion_index,
            combine_changed: next.combine_target != previous.combine_target,
        };
        self.resolution = Some(next);

        if pass.index_changed {
            tracing::trace!(
                target: "gridshift.resolver",
                dragged,
                from = previous.insertion_index,
                to = next.insertion_index,
                "insertion index changed"
            );
            registry.update_for_gap(
                host,
                GapUpdate {
                    dragged,
                    gap: next.insertion_index,
                    animate: true,
                    duration: config.shift_duration,
                },
            );
        }
        if pass.combine_changed {
            tracing::trace!(
                target: "gridshift.resolver",
                dragged,
                combine = ?next.combine_target,
                "combine target changed"
            );
        }
        pass
    }
}

/// Left/right corner rule.
fn side_of(center: Point, index: usize, rect: Rect) -> usize {
    if center.distance(rect.top_left()) < center.distance(rect.top_right()) {
        index.saturating_sub(1)
    } else {
        index
    }
}
