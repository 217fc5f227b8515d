#![forbid(unsafe_code)]

//! Drag controller: the orchestrator.
//!
//! Owns the registry, resolver, autoscroller, gesture recognizer and the
//! single [`DragSession`]. The host is passed into every operation that
//! needs geometry, scrolling or callbacks.
//!
//! ```text
//! Idle -> Pending -> Dragging -> Committing -> Idle
//!   \________\__________\____________\------> Idle (cancel)
//! ```
//!
//! Every operation returns a [`DragTransition`] naming the phase before and
//! after plus the effect it had, so hosts and tests can observe the machine
//! without polling.
//!
//! # Invariants
//!
//! 1. At most one session exists; a new `pointer_down` force-cancels it.
//! 2. A completed drag fires at most one of `on_reorder` / `on_combine`.
//! 3. Cancelling (any reason) fires no callback and leaves every offset at
//!    zero with nothing animating.
//! 4. An item count that differs from the one seen at `pointer_down`
//!    cancels the drag at the next entry point that receives the host.
//!
//! # Failure Modes
//!
//! - `pointer_down` on an unregistered or unmounted index returns
//!   [`GridError::UnregisteredItem`] and leaves the machine untouched.
//! - Pointer events for an untracked pointer are `Noop`s.

use std::time::Duration;

use gridshift_core::event::{PointerEvent, PointerId};
use gridshift_core::geometry::{Offset, Point};
use gridshift_core::gesture::{DragGestureRecognizer, GestureEvent};
use web_time::Instant;

use crate::autoscroll::{AutoScroller, StepStatus};
use crate::config::GridConfig;
use crate::error::GridError;
use crate::host::{GeometryProvider, GridHost, ProxyDecorator};
use crate::registry::{GapUpdate, GridId, ItemKey, ItemRegistry};
use crate::resolver::{GapResolver, Resolution};
use crate::session::{DragSession, ProxyFrame};

// ---------------------------------------------------------------------------
// Phases and effects
// ---------------------------------------------------------------------------

/// Lifecycle phase of the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragPhase {
    #[default]
    Idle,
    /// A pointer is down on `index`; the start strategy has not decided yet.
    Pending { index: usize, pointer: PointerId },
    Dragging { index: usize, pointer: PointerId },
    /// Dropped; the proxy is settling and the outcome fires when it lands.
    Committing { index: usize },
}

impl DragPhase {
    /// Index of the tile this phase is about.
    #[must_use]
    pub const fn index(&self) -> Option<usize> {
        match *self {
            Self::Idle => None,
            Self::Pending { index, .. }
            | Self::Dragging { index, .. }
            | Self::Committing { index } => Some(index),
        }
    }

    #[must_use]
    pub const fn pointer(&self) -> Option<PointerId> {
        match *self {
            Self::Pending { pointer, .. } | Self::Dragging { pointer, .. } => Some(pointer),
            Self::Idle | Self::Committing { .. } => None,
        }
    }

    #[must_use]
    pub const fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelReason {
    /// `cancel()` was called by the host.
    Programmatic,
    /// The platform revoked the pointer.
    PointerCanceled,
    /// A new drag started while this one was alive.
    Superseded,
    /// The item count changed under the drag.
    StructuralChange,
    /// The dragged tile was unregistered.
    DraggedItemUnmounted,
}

/// What a completed drag did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragOutcome {
    Reordered { from: usize, to: usize },
    Combined { dragged: usize, target: usize },
    /// Dropped back where it started; no callback fired.
    Dropped { index: usize },
}

/// Why an operation changed nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragNoopReason {
    IdleWithoutActiveDrag,
    PointerMismatch,
    /// The start strategy is still waiting.
    GesturePending,
    /// Pointer input while the proxy settles.
    SettleInProgress,
    UnknownItem,
    StructureUnchanged,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragEffect {
    Pending {
        index: usize,
        pointer: PointerId,
        origin: Point,
    },
    DragStarted {
        index: usize,
        pointer: PointerId,
        origin: Point,
    },
    /// The start strategy gave up on the pointer.
    Rejected { index: usize, pointer: PointerId },
    Moved {
        resolution: Resolution,
        resolution_changed: bool,
    },
    AutoScrolled { offset: f32, resolution: Resolution },
    SettleStarted { index: usize, resolution: Resolution },
    Completed { outcome: DragOutcome },
    Canceled {
        index: Option<usize>,
        reason: CancelReason,
    },
    ItemUnregistered { index: usize },
    /// Time advanced with nothing else to report.
    Animated { animating: bool },
    Noop { reason: DragNoopReason },
}

/// One controller step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragTransition {
    pub transition_id: u64,
    pub from: DragPhase,
    pub to: DragPhase,
    pub effect: DragEffect,
}

impl DragTransition {
    #[must_use]
    pub fn is_noop(&self) -> bool {
        matches!(self.effect, DragEffect::Noop { .. })
    }
}

// ---------------------------------------------------------------------------
// Controller
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct DragController {
    config: GridConfig,
    registry: ItemRegistry,
    resolver: GapResolver,
    autoscroll: AutoScroller,
    recognizer: DragGestureRecognizer,
    phase: DragPhase,
    session: Option<DragSession>,
    /// Resolution captured at drop.
    committed: Option<Resolution>,
    /// Item count seen at `pointer_down`.
    expected_count: Option<usize>,
    last_tick: Option<Instant>,
    transition_counter: u64,
}

impl Default for DragController {
    fn default() -> Self {
        Self::with_config(GridConfig::default())
    }
}

impl DragController {
    /// Create a controller, rejecting configs that fail validation.
    pub fn new(config: GridConfig) -> Result<Self, GridError> {
        let errors = config.validate();
        if !errors.is_empty() {
            return Err(GridError::InvalidConfig(errors));
        }
        Ok(Self::with_config(config))
    }

    fn with_config(config: GridConfig) -> Self {
        Self {
            recognizer: DragGestureRecognizer::new(config.start_strategy.build()),
            config,
            registry: ItemRegistry::new(GridId::next()),
            resolver: GapResolver::new(),
            autoscroll: AutoScroller::new(),
            phase: DragPhase::Idle,
            session: None,
            committed: None,
            expected_count: None,
            last_tick: None,
            transition_counter: 0,
        }
    }

    #[must_use]
    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    #[must_use]
    pub fn grid_id(&self) -> GridId {
        self.registry.owner()
    }

    #[must_use]
    pub fn registry(&self) -> &ItemRegistry {
        &self.registry
    }

    #[must_use]
    pub const fn phase(&self) -> DragPhase {
        self.phase
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.phase.is_idle()
    }

    /// Current resolution: the live one while dragging, the captured one
    /// while settling, `None` otherwise.
    #[must_use]
    pub fn resolution(&self) -> Option<Resolution> {
        match self.phase {
            DragPhase::Dragging { .. } => self.resolver.resolution(),
            DragPhase::Committing { .. } => self.committed,
            DragPhase::Idle | DragPhase::Pending { .. } => None,
        }
    }

    /// Rendered shift offset for the tile at `index`.
    #[must_use]
    pub fn item_offset(&self, index: usize) -> Offset {
        self.registry.offset_of(index)
    }

    /// Whether the tile at `index` is the one being dragged; its slot should
    /// be painted empty.
    #[must_use]
    pub fn is_dragged(&self, index: usize) -> bool {
        self.session.as_ref().is_some_and(|s| s.index() == index)
    }

    #[must_use]
    pub fn proxy(&self) -> Option<ProxyFrame> {
        self.session.as_ref().map(DragSession::proxy_frame)
    }

    /// Run `decorator` over `child` for the current proxy. Without a proxy
    /// the child is returned unchanged.
    pub fn decorate_proxy<C, D>(&self, child: C, decorator: &D) -> C
    where
        D: ProxyDecorator<C> + ?Sized,
    {
        match self.proxy() {
            Some(frame) => decorator.decorate(child, frame.index, frame.progress),
            None => child,
        }
    }

    #[must_use]
    pub fn has_pending_animations(&self) -> bool {
        self.registry.is_animating()
            || self.autoscroll.is_scrolling()
            || self.session.as_ref().is_some_and(DragSession::is_animating)
    }

    // -- registry maintenance -------------------------------------------------

    /// Register the tile with caller identity `identity` at `index`.
    ///
    /// A tile that mounts mid-drag or during the settle snaps straight to
    /// its gap offset.
    pub fn register_item<H>(&mut self, host: &H, identity: u64, index: usize) -> ItemKey
    where
        H: GeometryProvider + ?Sized,
    {
        let key = self.registry.register(identity, index);
        let gap = match self.phase {
            DragPhase::Dragging { index: dragged, .. } => {
                self.resolver.resolution().map(|resolution| (dragged, resolution))
            }
            DragPhase::Committing { index: dragged } => {
                self.committed.map(|resolution| (dragged, resolution))
            }
            DragPhase::Idle | DragPhase::Pending { .. } => None,
        };
        if let Some((dragged, resolution)) = gap {
            self.registry.update_entry_for_gap(
                host,
                index,
                GapUpdate {
                    dragged,
                    gap: resolution.insertion_index,
                    animate: false,
                    duration: self.config.shift_duration,
                },
            );
        }
        key
    }

    /// Remove a tile. Removing the tile under a pending or active drag
    /// cancels it.
    pub fn unregister_item(&mut self, key: ItemKey) -> DragTransition {
        let from = self.phase;
        let Some(index) = self.registry.unregister(key) else {
            return self.emit(
                from,
                DragEffect::Noop {
                    reason: DragNoopReason::UnknownItem,
                },
            );
        };
        match self.phase {
            DragPhase::Pending { index: dragged, .. } | DragPhase::Dragging { index: dragged, .. }
                if dragged == index =>
            {
                self.teardown(CancelReason::DraggedItemUnmounted)
            }
            _ => self.emit(from, DragEffect::ItemUnregistered { index }),
        }
    }

    /// Cancel the drag if the host's item count moved since `pointer_down`.
    pub fn sync_item_count<H>(&mut self, host: &H) -> DragTransition
    where
        H: GeometryProvider + ?Sized,
    {
        if let Some(transition) = self.check_structure(host) {
            return transition;
        }
        let reason = if self.phase.is_idle() {
            DragNoopReason::IdleWithoutActiveDrag
        } else {
            DragNoopReason::StructureUnchanged
        };
        let from = self.phase;
        self.emit(from, DragEffect::Noop { reason })
    }

    // -- pointer input ----------------------------------------------------------

    /// A pointer went down on the tile at `index`.
    pub fn pointer_down<H>(
        &mut self,
        host: &mut H,
        index: usize,
        event: &PointerEvent,
        now: Instant,
    ) -> Result<DragTransition, GridError>
    where
        H: GridHost + ?Sized,
    {
        if let DragPhase::Pending { index: active, .. } | DragPhase::Dragging { index: active, .. } =
            self.phase
        {
            if active == index {
                return Err(GridError::AlreadyDragging { index });
            }
        }
        if !self.registry.contains(index) || host.rect_of(index).is_none() {
            return Err(GridError::UnregisteredItem { index });
        }

        let from = self.phase;
        if !from.is_idle() {
            tracing::warn!(
                target: "gridshift.drag",
                previous = ?from.index(),
                index,
                "new drag supersedes active drag"
            );
            self.teardown(CancelReason::Superseded);
        }

        self.expected_count = Some(host.item_count());
        match self.recognizer.add_pointer(event.pointer, event.position, now) {
            Some(GestureEvent::Accepted {
                pointer,
                origin,
                position,
            }) => Ok(self.start_drag(host, from, index, pointer, origin, position, now)),
            Some(GestureEvent::Rejected { pointer }) => {
                self.reset();
                Ok(self.emit(from, DragEffect::Rejected { index, pointer }))
            }
            _ => {
                self.phase = DragPhase::Pending {
                    index,
                    pointer: event.pointer,
                };
                tracing::debug!(
                    target: "gridshift.drag",
                    index,
                    strategy = self.recognizer.strategy().name(),
                    "drag pending"
                );
                Ok(self.emit(
                    from,
                    DragEffect::Pending {
                        index,
                        pointer: event.pointer,
                        origin: event.position,
                    },
                ))
            }
        }
    }

    pub fn pointer_move<H>(&mut self, host: &mut H, event: &PointerEvent, now: Instant) -> DragTransition
    where
        H: GridHost + ?Sized,
    {
        if let Some(transition) = self.check_structure(host) {
            return transition;
        }
        let from = self.phase;
        if let Some(noop) = self.pointer_noop(event.pointer) {
            return self.emit(from, noop);
        }

        let gesture = self.recognizer.process(event, now);
        self.dispatch_gesture(host, from, gesture, now)
    }

    /// The pointer was released. An active drag starts settling; a pending
    /// one is rejected.
    pub fn pointer_up<H>(&mut self, host: &mut H, event: &PointerEvent, now: Instant) -> DragTransition
    where
        H: GridHost + ?Sized,
    {
        if let Some(transition) = self.check_structure(host) {
            return transition;
        }
        let from = self.phase;
        if let Some(noop) = self.pointer_noop(event.pointer) {
            return self.emit(from, noop);
        }

        let gesture = self.recognizer.process(event, now);
        self.dispatch_gesture(host, from, gesture, now)
    }

    /// The platform revoked the pointer.
    pub fn pointer_cancel<H>(&mut self, host: &mut H, event: &PointerEvent) -> DragTransition
    where
        H: GridHost + ?Sized,
    {
        if let Some(transition) = self.check_structure(host) {
            return transition;
        }
        let from = self.phase;
        if let Some(noop) = self.pointer_noop(event.pointer) {
            return self.emit(from, noop);
        }
        self.teardown(CancelReason::PointerCanceled)
    }

    /// Tear down whatever is in flight. No callback fires.
    pub fn cancel(&mut self, reason: CancelReason) -> DragTransition {
        if self.phase.is_idle() {
            let from = self.phase;
            return self.emit(
                from,
                DragEffect::Noop {
                    reason: DragNoopReason::IdleWithoutActiveDrag,
                },
            );
        }
        self.teardown(reason)
    }

    // -- time -------------------------------------------------------------------

    /// Advance time to `now`.
    ///
    /// Order: structure check, delayed gesture start, shift and proxy
    /// animations, autoscroll (re-resolving when a step lands), settle.
    pub fn tick<H>(&mut self, host: &mut H, now: Instant) -> DragTransition
    where
        H: GridHost + ?Sized,
    {
        let dt = self
            .last_tick
            .map_or(Duration::ZERO, |last| now.saturating_duration_since(last));
        self.last_tick = Some(now);

        if let Some(transition) = self.check_structure(host) {
            return transition;
        }
        let from = self.phase;

        if let DragPhase::Pending { index, .. } = self.phase {
            return match self.recognizer.poll(now) {
                Some(GestureEvent::Accepted {
                    pointer,
                    origin,
                    position,
                }) => self.start_drag(host, from, index, pointer, origin, position, now),
                Some(GestureEvent::Rejected { pointer }) => self.reject(from, pointer),
                _ => self.pending_noop(from),
            };
        }
        if self.phase.is_idle() {
            return self.emit(
                from,
                DragEffect::Noop {
                    reason: DragNoopReason::IdleWithoutActiveDrag,
                },
            );
        }

        self.registry.tick(dt);
        if let Some(session) = self.session.as_mut() {
            session.tick(dt);
        }

        if let DragPhase::Dragging { .. } = self.phase {
            if let Some(effect) = self.tick_autoscroll(host, dt) {
                return self.emit(from, effect);
            }
        }

        if let DragPhase::Committing { index } = self.phase {
            if self.session.as_ref().is_some_and(DragSession::is_settled) {
                let resolution = self.committed.unwrap_or(Resolution::at(index));
                let outcome = Self::fire_outcome(host, index, resolution);
                tracing::debug!(target: "gridshift.drag", ?outcome, "drag completed");
                self.reset();
                return self.emit(from, DragEffect::Completed { outcome });
            }
        }

        let animating = self.has_pending_animations();
        self.emit(from, DragEffect::Animated { animating })
    }

    // -- internals ----------------------------------------------------------------

    /// Act on what the recognizer made of a pointer event.
    ///
    /// The recognizer decides from the event kind, so every entry point
    /// handles every gesture: a release routed through `pointer_move` still
    /// commits and a cancel still tears down.
    fn dispatch_gesture<H>(
        &mut self,
        host: &mut H,
        from: DragPhase,
        gesture: Option<GestureEvent>,
        now: Instant,
    ) -> DragTransition
    where
        H: GridHost + ?Sized,
    {
        match gesture {
            Some(GestureEvent::Accepted {
                pointer,
                origin,
                position,
            }) => match self.phase {
                DragPhase::Pending { index, .. } => {
                    self.start_drag(host, from, index, pointer, origin, position, now)
                }
                _ => self.pending_noop(from),
            },
            Some(GestureEvent::Rejected { pointer }) => self.reject(from, pointer),
            Some(GestureEvent::Moved { delta, .. }) => {
                let Some(session) = self.session.as_mut() else {
                    return self.pending_noop(from);
                };
                session.update(delta);
                let (resolution, resolution_changed) = self.resolve_and_scroll(host);
                self.emit(
                    from,
                    DragEffect::Moved {
                        resolution,
                        resolution_changed,
                    },
                )
            }
            Some(GestureEvent::Released { position, .. }) => self.commit(host, from, position, now),
            Some(GestureEvent::Canceled { .. }) => self.teardown(CancelReason::PointerCanceled),
            None => self.pending_noop(from),
        }
    }

    /// Move the proxy to the release point, resolve there, and start the
    /// settle toward the landing slot.
    fn commit<H>(&mut self, host: &mut H, from: DragPhase, position: Point, now: Instant) -> DragTransition
    where
        H: GridHost + ?Sized,
    {
        let Some(session) = self.session.as_mut() else {
            return self.pending_noop(from);
        };
        let delta = position - session.position();
        session.update(delta);
        let index = session.index();
        let resolution = self
            .resolver
            .resolve(session, &*host, &mut self.registry, &self.config)
            .resolution;
        let landing = host.rect_of(resolution.combine_target.unwrap_or(resolution.insertion_index));
        session.begin_settle(landing, self.config.settle_duration);
        self.autoscroll.cancel();
        self.committed = Some(resolution);
        self.phase = DragPhase::Committing { index };
        self.last_tick = Some(now);
        tracing::debug!(
            target: "gridshift.drag",
            index,
            insertion = resolution.insertion_index,
            combine = ?resolution.combine_target,
            "drag released; settling"
        );
        self.emit(from, DragEffect::SettleStarted { index, resolution })
    }

    #[allow(clippy::too_many_arguments)]
    fn start_drag<H>(
        &mut self,
        host: &mut H,
        from: DragPhase,
        index: usize,
        pointer: PointerId,
        origin: Point,
        position: Point,
        now: Instant,
    ) -> DragTransition
    where
        H: GridHost + ?Sized,
    {
        let Some(rect) = host.rect_of(index) else {
            return self.teardown(CancelReason::DraggedItemUnmounted);
        };
        let count = self.expected_count.unwrap_or_else(|| host.item_count());
        let mut session =
            DragSession::start(index, pointer, origin, rect, count, self.config.proxy_duration);
        session.update(position - origin);

        self.registry.update_for_gap(
            &*host,
            GapUpdate {
                dragged: index,
                gap: index,
                animate: false,
                duration: self.config.shift_duration,
            },
        );
        self.resolver.begin(index);
        self.session = Some(session);
        self.phase = DragPhase::Dragging { index, pointer };
        self.last_tick = Some(now);
        tracing::debug!(
            target: "gridshift.drag",
            index,
            pointer = pointer.0,
            item_count = count,
            "drag started"
        );
        if position != origin {
            self.resolve_and_scroll(host);
        }
        self.emit(
            from,
            DragEffect::DragStarted {
                index,
                pointer,
                origin,
            },
        )
    }

    /// Resolver pass followed by an autoscroll request.
    fn resolve_and_scroll<H>(&mut self, host: &mut H) -> (Resolution, bool)
    where
        H: GridHost + ?Sized,
    {
        let Some(session) = self.session.as_ref() else {
            return (Resolution::at(0), false);
        };
        let pass = self
            .resolver
            .resolve(session, &*host, &mut self.registry, &self.config);
        let proxy = session.proxy_rect();
        if let Some(scroll) = host.scroll_controller() {
            self.autoscroll.request(&self.config.autoscroll, proxy, &*scroll);
        }
        (pass.resolution, pass.changed())
    }

    fn tick_autoscroll<H>(&mut self, host: &mut H, dt: Duration) -> Option<DragEffect>
    where
        H: GridHost + ?Sized,
    {
        if !self.autoscroll.is_scrolling() {
            return None;
        }
        let status = match host.scroll_controller() {
            Some(scroll) => self.autoscroll.tick(dt, scroll),
            None => {
                self.autoscroll.cancel();
                return None;
            }
        };
        match status {
            StepStatus::Completed { offset } => {
                let (resolution, _) = self.resolve_and_scroll(host);
                Some(DragEffect::AutoScrolled { offset, resolution })
            }
            StepStatus::Idle | StepStatus::InFlight => None,
        }
    }

    fn fire_outcome<H>(host: &mut H, dragged: usize, resolution: Resolution) -> DragOutcome
    where
        H: GridHost + ?Sized,
    {
        if resolution.insertion_index != dragged {
            host.on_reorder(dragged, resolution.insertion_index);
            return DragOutcome::Reordered {
                from: dragged,
                to: resolution.insertion_index,
            };
        }
        match resolution.combine_target {
            Some(target) if target != dragged => {
                host.on_combine(dragged, target);
                DragOutcome::Combined { dragged, target }
            }
            _ => DragOutcome::Dropped { index: dragged },
        }
    }

    fn check_structure<H>(&mut self, host: &H) -> Option<DragTransition>
    where
        H: GeometryProvider + ?Sized,
    {
        let expected = self.expected_count?;
        let actual = host.item_count();
        if actual == expected {
            return None;
        }
        tracing::warn!(
            target: "gridshift.drag",
            expected,
            actual,
            "item count changed during drag"
        );
        Some(self.teardown(CancelReason::StructuralChange))
    }

    /// Noop effect for pointer input that does not concern the tracked drag.
    fn pointer_noop(&self, pointer: PointerId) -> Option<DragEffect> {
        let reason = match self.phase {
            DragPhase::Idle => DragNoopReason::IdleWithoutActiveDrag,
            DragPhase::Committing { .. } => DragNoopReason::SettleInProgress,
            DragPhase::Pending { pointer: tracked, .. } | DragPhase::Dragging { pointer: tracked, .. } => {
                if tracked == pointer {
                    return None;
                }
                DragNoopReason::PointerMismatch
            }
        };
        Some(DragEffect::Noop { reason })
    }

    fn pending_noop(&mut self, from: DragPhase) -> DragTransition {
        self.emit(
            from,
            DragEffect::Noop {
                reason: DragNoopReason::GesturePending,
            },
        )
    }

    fn reject(&mut self, from: DragPhase, pointer: PointerId) -> DragTransition {
        let index = from.index().unwrap_or_default();
        tracing::debug!(target: "gridshift.drag", index, "drag gesture rejected");
        self.reset();
        self.emit(from, DragEffect::Rejected { index, pointer })
    }

    fn teardown(&mut self, reason: CancelReason) -> DragTransition {
        let from = self.phase;
        let index = from.index();
        match reason {
            CancelReason::StructuralChange | CancelReason::DraggedItemUnmounted => {
                tracing::warn!(target: "gridshift.drag", ?index, ?reason, "drag canceled");
            }
            _ => tracing::debug!(target: "gridshift.drag", ?index, ?reason, "drag canceled"),
        }
        self.reset();
        self.emit(from, DragEffect::Canceled { index, reason })
    }

    /// Return every component to rest.
    fn reset(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.dispose();
        }
        self.session = None;
        self.registry.reset_gap();
        self.resolver.clear();
        self.autoscroll.cancel();
        self.recognizer.reset();
        self.committed = None;
        self.expected_count = None;
        self.phase = DragPhase::Idle;
    }

    fn emit(&mut self, from: DragPhase, effect: DragEffect) -> DragTransition {
        self.transition_counter = self.transition_counter.saturating_add(1);
        DragTransition {
            transition_id: self.transition_counter,
            from,
            to: self.phase,
            effect,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StartStrategyConfig;
    use crate::host::GridCallbacks;
    use gridshift_core::geometry::{Axis, Rect};

    #[derive(Default)]
    struct Row {
        count: usize,
        reorders: Vec<(usize, usize)>,
        combines: Vec<(usize, usize)>,
    }

    impl GeometryProvider for Row {
        fn item_count(&self) -> usize {
            self.count
        }

        fn rect_of(&self, index: usize) -> Option<Rect> {
            (index < self.count).then(|| Rect::new(index as f32 * 100.0, 0.0, 100.0, 100.0))
        }
    }

    impl GridCallbacks for Row {
        fn can_combine(&self, _dragged: usize, _target: usize) -> bool {
            true
        }

        fn on_reorder(&mut self, old_index: usize, new_index: usize) {
            self.reorders.push((old_index, new_index));
        }

        fn on_combine(&mut self, dragged: usize, target: usize) {
            self.combines.push((dragged, target));
        }
    }

    impl GridHost for Row {}

    const P: PointerId = PointerId(1);
    const MS_250: Duration = Duration::from_millis(250);

    fn setup(count: usize, config: GridConfig) -> (DragController, Row) {
        let row = Row {
            count,
            ..Row::default()
        };
        let mut controller = DragController::new(config).unwrap();
        for i in 0..count {
            controller.register_item(&row, i as u64, i);
        }
        (controller, row)
    }

    #[test]
    fn new_rejects_invalid_config() {
        let mut config = GridConfig::default();
        config.autoscroll.overshoot_divisor = 0.0;
        assert!(matches!(
            DragController::new(config),
            Err(GridError::InvalidConfig(_))
        ));
    }

    #[test]
    fn pointer_down_on_unregistered_index_fails() {
        let (mut c, mut row) = setup(3, GridConfig::default());
        let t0 = Instant::now();
        let err = c
            .pointer_down(&mut row, 7, &PointerEvent::down(P, Point::new(0.0, 0.0)), t0)
            .unwrap_err();
        assert_eq!(err, GridError::UnregisteredItem { index: 7 });
        assert!(c.phase().is_idle());
    }

    #[test]
    fn immediate_strategy_starts_at_once() {
        let (mut c, mut row) = setup(3, GridConfig::default());
        let t0 = Instant::now();
        let t = c
            .pointer_down(&mut row, 1, &PointerEvent::down(P, Point::new(150.0, 50.0)), t0)
            .unwrap();
        assert!(matches!(t.effect, DragEffect::DragStarted { index: 1, .. }));
        assert_eq!(t.to, DragPhase::Dragging { index: 1, pointer: P });
        assert!(c.is_dragged(1));
        assert_eq!(c.resolution(), Some(Resolution::at(1)));
    }

    #[test]
    fn second_down_on_dragged_index_is_an_error() {
        let (mut c, mut row) = setup(3, GridConfig::default());
        let t0 = Instant::now();
        let down = PointerEvent::down(P, Point::new(150.0, 50.0));
        c.pointer_down(&mut row, 1, &down, t0).unwrap();
        assert_eq!(
            c.pointer_down(&mut row, 1, &down, t0).unwrap_err(),
            GridError::AlreadyDragging { index: 1 }
        );
    }

    #[test]
    fn down_on_other_tile_supersedes_drag() {
        let (mut c, mut row) = setup(3, GridConfig::default());
        let t0 = Instant::now();
        c.pointer_down(&mut row, 1, &PointerEvent::down(P, Point::new(150.0, 50.0)), t0)
            .unwrap();
        let t = c
            .pointer_down(&mut row, 2, &PointerEvent::down(P, Point::new(250.0, 50.0)), t0)
            .unwrap();
        assert_eq!(t.from, DragPhase::Dragging { index: 1, pointer: P });
        assert_eq!(t.to, DragPhase::Dragging { index: 2, pointer: P });
    }

    #[test]
    fn drop_on_new_slot_reorders_once() {
        let (mut c, mut row) = setup(4, GridConfig::default());
        let t0 = Instant::now();
        c.pointer_down(&mut row, 0, &PointerEvent::down(P, Point::new(50.0, 50.0)), t0)
            .unwrap();
        let t = c.pointer_move(&mut row, &PointerEvent::moved(P, Point::new(285.0, 50.0)), t0);
        assert!(matches!(
            t.effect,
            DragEffect::Moved {
                resolution_changed: true,
                ..
            }
        ));
        let t = c.pointer_up(&mut row, &PointerEvent::up(P, Point::new(285.0, 50.0)), t0);
        assert!(matches!(t.effect, DragEffect::SettleStarted { index: 0, .. }));
        assert_eq!(c.phase(), DragPhase::Committing { index: 0 });

        let t = c.tick(&mut row, t0 + MS_250);
        assert_eq!(
            t.effect,
            DragEffect::Completed {
                outcome: DragOutcome::Reordered { from: 0, to: 2 }
            }
        );
        assert_eq!(row.reorders, vec![(0, 2)]);
        assert!(row.combines.is_empty());
        assert!(c.phase().is_idle());
        assert!(!c.has_pending_animations());

        c.tick(&mut row, t0 + MS_250 * 2);
        assert_eq!(row.reorders.len(), 1);
    }

    #[test]
    fn drop_on_tile_center_combines() {
        let (mut c, mut row) = setup(4, GridConfig::default());
        let t0 = Instant::now();
        c.pointer_down(&mut row, 0, &PointerEvent::down(P, Point::new(50.0, 50.0)), t0)
            .unwrap();
        c.pointer_move(&mut row, &PointerEvent::moved(P, Point::new(252.0, 50.0)), t0);
        c.pointer_up(&mut row, &PointerEvent::up(P, Point::new(252.0, 50.0)), t0);
        let t = c.tick(&mut row, t0 + MS_250);
        assert_eq!(
            t.effect,
            DragEffect::Completed {
                outcome: DragOutcome::Combined {
                    dragged: 0,
                    target: 2
                }
            }
        );
        assert_eq!(row.combines, vec![(0, 2)]);
        assert!(row.reorders.is_empty());
    }

    #[test]
    fn cancel_leaves_no_residue() {
        let (mut c, mut row) = setup(4, GridConfig::default());
        let t0 = Instant::now();
        c.pointer_down(&mut row, 0, &PointerEvent::down(P, Point::new(50.0, 50.0)), t0)
            .unwrap();
        c.pointer_move(&mut row, &PointerEvent::moved(P, Point::new(385.0, 50.0)), t0);
        c.tick(&mut row, t0 + Duration::from_millis(100));
        let t = c.cancel(CancelReason::Programmatic);
        assert_eq!(
            t.effect,
            DragEffect::Canceled {
                index: Some(0),
                reason: CancelReason::Programmatic
            }
        );
        assert!(c.proxy().is_none());
        assert!(!c.has_pending_animations());
        assert!((0..4).all(|i| c.item_offset(i).is_zero()));
        assert!(c.cancel(CancelReason::Programmatic).is_noop());
        assert!(row.reorders.is_empty());
    }

    #[test]
    fn delayed_strategy_starts_on_tick() {
        let config = GridConfig {
            start_strategy: StartStrategyConfig::long_press(),
            ..GridConfig::default()
        };
        let (mut c, mut row) = setup(3, config);
        let t0 = Instant::now();
        let t = c
            .pointer_down(&mut row, 1, &PointerEvent::down(P, Point::new(150.0, 50.0)), t0)
            .unwrap();
        assert!(matches!(t.effect, DragEffect::Pending { index: 1, .. }));
        assert!(c.tick(&mut row, t0 + Duration::from_millis(100)).is_noop());
        let t = c.tick(&mut row, t0 + Duration::from_millis(500));
        assert!(matches!(t.effect, DragEffect::DragStarted { index: 1, .. }));
    }

    #[test]
    fn delayed_strategy_rejects_early_release() {
        let config = GridConfig {
            start_strategy: StartStrategyConfig::long_press(),
            ..GridConfig::default()
        };
        let (mut c, mut row) = setup(3, config);
        let t0 = Instant::now();
        c.pointer_down(&mut row, 1, &PointerEvent::down(P, Point::new(150.0, 50.0)), t0)
            .unwrap();
        let t = c.pointer_up(&mut row, &PointerEvent::up(P, Point::new(150.0, 50.0)), t0);
        assert_eq!(t.effect, DragEffect::Rejected { index: 1, pointer: P });
        assert!(c.phase().is_idle());
    }

    #[test]
    fn axis_constrained_strategy_starts_on_move() {
        let config = GridConfig {
            start_strategy: StartStrategyConfig::AxisConstrained {
                axis: Axis::Horizontal,
                slop: 10.0,
            },
            ..GridConfig::default()
        };
        let (mut c, mut row) = setup(4, config);
        let t0 = Instant::now();
        let t = c
            .pointer_down(&mut row, 1, &PointerEvent::down(P, Point::new(150.0, 50.0)), t0)
            .unwrap();
        assert!(matches!(t.effect, DragEffect::Pending { index: 1, .. }));

        let t = c.pointer_move(&mut row, &PointerEvent::moved(P, Point::new(155.0, 52.0)), t0);
        assert_eq!(
            t.effect,
            DragEffect::Noop {
                reason: DragNoopReason::GesturePending
            }
        );

        let t = c.pointer_move(&mut row, &PointerEvent::moved(P, Point::new(385.0, 52.0)), t0);
        assert_eq!(
            t.effect,
            DragEffect::DragStarted {
                index: 1,
                pointer: P,
                origin: Point::new(150.0, 50.0),
            }
        );
        assert_eq!(t.to, DragPhase::Dragging { index: 1, pointer: P });
        let proxy = c.proxy().unwrap();
        assert_eq!(proxy.rect.x, 335.0);
        assert_eq!(proxy.rect.y, 2.0);
        assert_eq!(c.resolution(), Some(Resolution::at(3)));

        c.pointer_up(&mut row, &PointerEvent::up(P, Point::new(385.0, 52.0)), t0);
        c.tick(&mut row, t0 + MS_250);
        assert_eq!(row.reorders, vec![(1, 3)]);
    }

    #[test]
    fn axis_constrained_strategy_rejects_cross_axis_travel() {
        let config = GridConfig {
            start_strategy: StartStrategyConfig::AxisConstrained {
                axis: Axis::Horizontal,
                slop: 10.0,
            },
            ..GridConfig::default()
        };
        let (mut c, mut row) = setup(3, config);
        let t0 = Instant::now();
        c.pointer_down(&mut row, 1, &PointerEvent::down(P, Point::new(150.0, 50.0)), t0)
            .unwrap();
        let t = c.pointer_move(&mut row, &PointerEvent::moved(P, Point::new(152.0, 80.0)), t0);
        assert_eq!(t.effect, DragEffect::Rejected { index: 1, pointer: P });
        assert!(c.phase().is_idle());
        assert!(c.proxy().is_none());
    }

    #[test]
    fn mismatched_event_kinds_follow_the_gesture() {
        let (mut c, mut row) = setup(3, GridConfig::default());
        let t0 = Instant::now();
        c.pointer_down(&mut row, 0, &PointerEvent::down(P, Point::new(50.0, 50.0)), t0)
            .unwrap();
        let t = c.pointer_move(&mut row, &PointerEvent::cancel(P, Point::new(50.0, 50.0)), t0);
        assert_eq!(
            t.effect,
            DragEffect::Canceled {
                index: Some(0),
                reason: CancelReason::PointerCanceled
            }
        );
        assert!(c.phase().is_idle());

        c.pointer_down(&mut row, 0, &PointerEvent::down(P, Point::new(50.0, 50.0)), t0)
            .unwrap();
        let t = c.pointer_move(&mut row, &PointerEvent::up(P, Point::new(50.0, 50.0)), t0);
        assert!(matches!(t.effect, DragEffect::SettleStarted { index: 0, .. }));
        assert_eq!(c.phase(), DragPhase::Committing { index: 0 });
        let t = c.tick(&mut row, t0 + MS_250);
        assert_eq!(
            t.effect,
            DragEffect::Completed {
                outcome: DragOutcome::Dropped { index: 0 }
            }
        );
    }

    #[test]
    fn unregistering_dragged_item_cancels() {
        let (mut c, mut row) = setup(3, GridConfig::default());
        let t0 = Instant::now();
        c.pointer_down(&mut row, 1, &PointerEvent::down(P, Point::new(150.0, 50.0)), t0)
            .unwrap();
        let other = c.registry().key_for(2);
        assert_eq!(
            c.unregister_item(other).effect,
            DragEffect::ItemUnregistered { index: 2 }
        );
        let key = c.registry().key_for(1);
        let t = c.unregister_item(key);
        assert_eq!(
            t.effect,
            DragEffect::Canceled {
                index: Some(1),
                reason: CancelReason::DraggedItemUnmounted
            }
        );
    }

    #[test]
    fn foreign_pointer_is_ignored() {
        let (mut c, mut row) = setup(3, GridConfig::default());
        let t0 = Instant::now();
        c.pointer_down(&mut row, 1, &PointerEvent::down(P, Point::new(150.0, 50.0)), t0)
            .unwrap();
        let t = c.pointer_move(
            &mut row,
            &PointerEvent::moved(PointerId(9), Point::new(10.0, 10.0)),
            t0,
        );
        assert_eq!(
            t.effect,
            DragEffect::Noop {
                reason: DragNoopReason::PointerMismatch
            }
        );
    }

    #[test]
    fn decorate_proxy_passes_progress() {
        let (mut c, mut row) = setup(3, GridConfig::default());
        let label = |child: String, index: usize, progress: f32| format!("{child}:{index}:{progress}");
        assert_eq!(c.decorate_proxy("tile".to_string(), &label), "tile");
        let t0 = Instant::now();
        c.pointer_down(&mut row, 1, &PointerEvent::down(P, Point::new(150.0, 50.0)), t0)
            .unwrap();
        c.tick(&mut row, t0 + MS_250);
        assert_eq!(c.decorate_proxy("tile".to_string(), &label), "tile:1:1");
    }

    #[test]
    fn transition_ids_increase() {
        let (mut c, mut row) = setup(3, GridConfig::default());
        let t0 = Instant::now();
        let a = c.tick(&mut row, t0);
        let b = c.tick(&mut row, t0);
        assert!(b.transition_id > a.transition_id);
    }
}
