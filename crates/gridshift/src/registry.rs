#![forbid(unsafe_code)]

//! Item registry and shift animator.
//!
//! Every mounted tile has one [`RegistryEntry`], keyed by its current index.
//! The entry's [`ItemPhase`] is the only place a tile's shift state lives;
//! it changes exclusively through this module's API.
//!
//! # Shift rule
//!
//! With the dragged tile at `d` and the gap (insertion index) at `g`:
//!
//! - `d < i <= g`: tile `i` slides into slot `i - 1`.
//! - `g <= i < d`: tile `i` slides into slot `i + 1`.
//! - otherwise: no offset.
//!
//! The offset is the neighbor slot's static origin minus the tile's own, so
//! the rule works for any grid delegate and either flow direction.
//!
//! # Invariants
//!
//! 1. At most one entry per index, and at most one index per [`ItemKey`].
//! 2. A retargeted shift starts from the currently rendered offset.
//! 3. After `reset_gap()` every entry is `Idle` with a zero offset.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use ahash::AHashMap;
use gridshift_core::animation::{Animation, OffsetTween, ease_in_out};
use gridshift_core::geometry::Offset;

use crate::host::GeometryProvider;

static NEXT_GRID_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of one controller (one grid instance).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GridId(u64);

impl GridId {
    /// Allocate a process-unique id.
    #[must_use]
    pub fn next() -> Self {
        Self(NEXT_GRID_ID.fetch_add(1, Ordering::Relaxed))
    }

    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// Composite registry key: the caller's stable item identity plus the grid
/// that owns the entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemKey {
    pub identity: u64,
    pub owner: GridId,
}

/// Shift state of one tile.
#[derive(Debug, Clone, Copy)]
pub enum ItemPhase {
    /// In its layout slot.
    Idle,
    /// The tile being dragged; its slot is painted empty.
    Dragging,
    /// Moving toward a new offset.
    Shifting(OffsetTween),
    /// Resting at a non-zero offset.
    Shifted(Offset),
}

impl ItemPhase {
    /// Currently rendered offset.
    #[must_use]
    pub fn offset(&self) -> Offset {
        match self {
            Self::Idle | Self::Dragging => Offset::ZERO,
            Self::Shifting(tween) => tween.current(),
            Self::Shifted(offset) => *offset,
        }
    }

    /// Offset this phase is heading to.
    #[must_use]
    pub fn destination(&self) -> Offset {
        match self {
            Self::Idle | Self::Dragging => Offset::ZERO,
            Self::Shifting(tween) => tween.target(),
            Self::Shifted(offset) => *offset,
        }
    }

    #[must_use]
    pub fn is_animating(&self) -> bool {
        matches!(self, Self::Shifting(tween) if !tween.is_complete())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RegistryEntry {
    pub key: ItemKey,
    pub index: usize,
    pub phase: ItemPhase,
}

/// How the gap should be applied to an entry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GapUpdate {
    pub dragged: usize,
    pub gap: usize,
    pub animate: bool,
    pub duration: Duration,
}

#[derive(Debug, Clone)]
pub struct ItemRegistry {
    owner: GridId,
    entries: BTreeMap<usize, RegistryEntry>,
    by_key: AHashMap<ItemKey, usize>,
    gap_updates: u64,
    shift_restarts: u64,
}

impl ItemRegistry {
    #[must_use]
    pub fn new(owner: GridId) -> Self {
        Self {
            owner,
            entries: BTreeMap::new(),
            by_key: AHashMap::new(),
            gap_updates: 0,
            shift_restarts: 0,
        }
    }

    #[must_use]
    pub fn owner(&self) -> GridId {
        self.owner
    }

    #[must_use]
    pub fn key_for(&self, identity: u64) -> ItemKey {
        ItemKey {
            identity,
            owner: self.owner,
        }
    }

    /// Register (or move) the tile with `identity` at `index`.
    ///
    /// A different tile already at `index` is evicted. The new entry starts
    /// `Idle`; callers re-apply any active gap.
    pub fn register(&mut self, identity: u64, index: usize) -> ItemKey {
        let key = self.key_for(identity);
        if let Some(previous) = self.by_key.remove(&key) {
            self.entries.remove(&previous);
        }
        if let Some(evicted) = self.entries.remove(&index) {
            self.by_key.remove(&evicted.key);
            tracing::trace!(
                target: "gridshift.registry",
                index,
                evicted = evicted.key.identity,
                "registry slot reassigned"
            );
        }
        self.entries.insert(
            index,
            RegistryEntry {
                key,
                index,
                phase: ItemPhase::Idle,
            },
        );
        self.by_key.insert(key, index);
        key
    }

    /// Remove the entry for `key`, returning the index it occupied.
    pub fn unregister(&mut self, key: ItemKey) -> Option<usize> {
        let index = self.by_key.remove(&key)?;
        self.entries.remove(&index);
        Some(index)
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&RegistryEntry> {
        self.entries.get(&index)
    }

    #[must_use]
    pub fn index_of(&self, key: ItemKey) -> Option<usize> {
        self.by_key.get(&key).copied()
    }

    #[must_use]
    pub fn contains(&self, index: usize) -> bool {
        self.entries.contains_key(&index)
    }

    /// Registered indices in ascending order.
    pub fn indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.entries.keys().copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Rendered shift offset of the tile at `index` (zero if unknown).
    #[must_use]
    pub fn offset_of(&self, index: usize) -> Offset {
        self.entries
            .get(&index)
            .map_or(Offset::ZERO, |entry| entry.phase.offset())
    }

    /// Number of gap passes applied to the whole registry.
    #[must_use]
    pub fn gap_updates(&self) -> u64 {
        self.gap_updates
    }

    /// Number of shift transitions started or restarted.
    #[must_use]
    pub fn shift_restarts(&self) -> u64 {
        self.shift_restarts
    }

    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.entries.values().any(|entry| entry.phase.is_animating())
    }

    /// No animation running and every offset zero.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.entries
            .values()
            .all(|entry| !entry.phase.is_animating() && entry.phase.offset().is_zero())
    }

    /// Apply a gap to every registered tile.
    pub fn update_for_gap<G>(&mut self, geometry: &G, update: GapUpdate)
    where
        G: GeometryProvider + ?Sized,
    {
        self.gap_updates += 1;
        let indices: Vec<usize> = self.indices().collect();
        for index in indices {
            self.update_entry_for_gap(geometry, index, update);
        }
    }

    /// Apply a gap to one tile, e.g. one that mounted mid-drag.
    pub fn update_entry_for_gap<G>(&mut self, geometry: &G, index: usize, update: GapUpdate)
    where
        G: GeometryProvider + ?Sized,
    {
        let GapUpdate {
            dragged,
            gap,
            animate,
            duration,
        } = update;
        if !self.entries.contains_key(&index) {
            return;
        }
        let target = if index == dragged {
            None
        } else if dragged < index && index <= gap {
            Some(slot_shift(geometry, index, index - 1))
        } else if gap <= index && index < dragged {
            Some(slot_shift(geometry, index, index + 1))
        } else {
            Some(Offset::ZERO)
        };

        let Some(entry) = self.entries.get_mut(&index) else {
            return;
        };
        let Some(target) = target else {
            entry.phase = ItemPhase::Dragging;
            return;
        };

        if !animate {
            entry.phase = rest_phase(target);
            return;
        }
        if entry.phase.destination() == target {
            return;
        }
        let tween = match entry.phase {
            ItemPhase::Shifting(mut tween) => {
                tween.retarget_with(target, duration);
                tween
            }
            phase => OffsetTween::new(phase.offset(), target, duration).easing(ease_in_out),
        };
        entry.phase = ItemPhase::Shifting(tween);
        self.shift_restarts += 1;
    }

    /// Snap every tile back to its slot without animation.
    pub fn reset_gap(&mut self) {
        for entry in self.entries.values_mut() {
            entry.phase = ItemPhase::Idle;
        }
    }

    /// Advance running shifts.
    pub fn tick(&mut self, dt: Duration) {
        for entry in self.entries.values_mut() {
            if let ItemPhase::Shifting(tween) = &mut entry.phase {
                tween.tick(dt);
                if tween.is_complete() {
                    entry.phase = rest_phase(tween.target());
                }
            }
        }
    }
}

fn rest_phase(offset: Offset) -> ItemPhase {
    if offset.is_zero() {
        ItemPhase::Idle
    } else {
        ItemPhase::Shifted(offset)
    }
}

/// Offset that moves tile `from` onto the slot of tile `to`.
fn slot_shift<G>(geometry: &G, from: usize, to: usize) -> Offset
where
    G: GeometryProvider + ?Sized,
{
    match (geometry.rect_of(from), geometry.rect_of(to)) {
        (Some(a), Some(b)) => b.origin() - a.origin(),
        _ => {
            tracing::trace!(
                target: "gridshift.registry",
                from,
                to,
                "slot geometry unavailable; tile stays in place"
            );
            Offset::ZERO
        }
    }
}
