//! Shape registry and overlap event queue
//!
//! Shapes live in an arena addressed by generational handles. A removed
//! shape's slot is recycled with a bumped generation, so stale handles held
//! by gameplay code are detected instead of aliasing a new shape.
//!
//! Events are queued during `step` and handed out afterwards, either by
//! draining the queue or through an `OverlapListener`. Listeners never see
//! the world itself; registry changes they request go through `Deferred`
//! and are applied once every event has been delivered.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::overlap::{OverlapEvent, OverlapKind, OverlapTracker};
use super::shape::Shape;
use crate::settings::EngineSettings;

/// Stable reference to a shape in a `World`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ShapeHandle {
    index: u32,
    generation: u32,
}

impl ShapeHandle {
    pub(crate) fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    #[inline]
    pub fn index(&self) -> u32 {
        self.index
    }

    #[inline]
    pub fn generation(&self) -> u32 {
        self.generation
    }
}

impl std::fmt::Display for ShapeHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}v{}", self.index, self.generation)
    }
}

#[derive(Debug, Clone)]
struct Slot {
    generation: u32,
    shape: Option<Shape>,
    /// Participates in the pairwise sweep
    registered: bool,
}

/// Receives overlap notifications after a step
///
/// Both methods default to doing nothing so listeners only implement what
/// they care about.
pub trait OverlapListener {
    fn on_overlap_begin(
        &mut self,
        _shape: ShapeHandle,
        _other: ShapeHandle,
        _deferred: &mut Deferred,
    ) {
    }

    fn on_overlap_end(
        &mut self,
        _shape: ShapeHandle,
        _other: ShapeHandle,
        _deferred: &mut Deferred,
    ) {
    }
}

/// Registry changes requested while events are being delivered
#[derive(Debug, Default)]
pub struct Deferred {
    ops: Vec<DeferredOp>,
}

#[derive(Debug, Clone, Copy)]
enum DeferredOp {
    Remove(ShapeHandle),
    Register(ShapeHandle),
    Unregister(ShapeHandle),
    Translate(ShapeHandle, Vec2),
}

impl Deferred {
    pub fn remove(&mut self, handle: ShapeHandle) {
        self.ops.push(DeferredOp::Remove(handle));
    }

    pub fn register(&mut self, handle: ShapeHandle) {
        self.ops.push(DeferredOp::Register(handle));
    }

    pub fn unregister(&mut self, handle: ShapeHandle) {
        self.ops.push(DeferredOp::Unregister(handle));
    }

    pub fn translate(&mut self, handle: ShapeHandle, offset: Vec2) {
        self.ops.push(DeferredOp::Translate(handle, offset));
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

/// The set of collidable shapes plus their overlap history
#[derive(Debug, Clone, Default)]
pub struct World {
    slots: Vec<Slot>,
    free: Vec<u32>,
    pub(crate) tracker: OverlapTracker,
    /// Events from the last step; cleared by the next `step` if not drained
    pub(crate) events: Vec<OverlapEvent>,
    pub settings: EngineSettings,
    /// Number of completed steps
    pub step_count: u64,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: EngineSettings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    /// Add a shape and register it for collision
    pub fn insert(&mut self, shape: impl Into<Shape>) -> ShapeHandle {
        let shape = shape.into();
        let kind = shape.kind();
        let handle = match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                slot.shape = Some(shape);
                slot.registered = true;
                ShapeHandle::new(index, slot.generation)
            }
            None => {
                let index = self.slots.len() as u32;
                self.slots.push(Slot {
                    generation: 0,
                    shape: Some(shape),
                    registered: true,
                });
                ShapeHandle::new(index, 0)
            }
        };
        log::debug!("inserted {:?} as {}", kind, handle);
        handle
    }

    /// Destroy a shape; stale or unknown handles are a no-op
    ///
    /// Overlaps involving the shape end on the next step, notifying only the
    /// surviving partner.
    pub fn remove(&mut self, handle: ShapeHandle) -> Option<Shape> {
        let slot = self.live_slot_mut(handle)?;
        let shape = slot.shape.take();
        slot.registered = false;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(handle.index);
        log::debug!("removed {}", handle);
        shape
    }

    /// Let a live shape take part in the sweep again (idempotent)
    pub fn register(&mut self, handle: ShapeHandle) -> bool {
        match self.live_slot_mut(handle) {
            Some(slot) => {
                slot.registered = true;
                true
            }
            None => false,
        }
    }

    /// Exclude a live shape from the sweep without destroying it (idempotent)
    pub fn unregister(&mut self, handle: ShapeHandle) -> bool {
        match self.live_slot_mut(handle) {
            Some(slot) => {
                slot.registered = false;
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, handle: ShapeHandle) -> bool {
        self.get(handle).is_some()
    }

    pub fn is_registered(&self, handle: ShapeHandle) -> bool {
        self.slots
            .get(handle.index as usize)
            .is_some_and(|s| s.generation == handle.generation && s.shape.is_some() && s.registered)
    }

    pub fn get(&self, handle: ShapeHandle) -> Option<&Shape> {
        self.slots
            .get(handle.index as usize)
            .filter(|s| s.generation == handle.generation)
            .and_then(|s| s.shape.as_ref())
    }

    pub fn get_mut(&mut self, handle: ShapeHandle) -> Option<&mut Shape> {
        self.live_slot_mut(handle).and_then(|s| s.shape.as_mut())
    }

    /// Two distinct live shapes, mutably
    pub fn get_pair_mut(
        &mut self,
        a: ShapeHandle,
        b: ShapeHandle,
    ) -> Option<(&mut Shape, &mut Shape)> {
        if a.index == b.index || !self.contains(a) || !self.contains(b) {
            return None;
        }
        let (lo, hi) = (a.index.min(b.index) as usize, a.index.max(b.index) as usize);
        let (head, tail) = self.slots.split_at_mut(hi);
        let lo_shape = head[lo].shape.as_mut()?;
        let hi_shape = tail[0].shape.as_mut()?;
        if a.index < b.index {
            Some((lo_shape, hi_shape))
        } else {
            Some((hi_shape, lo_shape))
        }
    }

    /// Move a shape by a world-space offset
    pub fn translate(&mut self, handle: ShapeHandle, offset: Vec2) -> bool {
        match self.get_mut(handle) {
            Some(shape) => {
                shape.translate(offset);
                true
            }
            None => false,
        }
    }

    /// Live shapes in slot order
    pub fn iter(&self) -> impl Iterator<Item = (ShapeHandle, &Shape)> {
        self.slots.iter().enumerate().filter_map(|(i, s)| {
            s.shape
                .as_ref()
                .map(|shape| (ShapeHandle::new(i as u32, s.generation), shape))
        })
    }

    /// Registered shapes in slot order
    pub fn registered(&self) -> impl Iterator<Item = (ShapeHandle, &Shape)> {
        self.slots.iter().enumerate().filter_map(|(i, s)| match (&s.shape, s.registered) {
            (Some(shape), true) => Some((ShapeHandle::new(i as u32, s.generation), shape)),
            _ => None,
        })
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = (ShapeHandle, &mut Shape)> {
        self.slots.iter_mut().enumerate().filter_map(|(i, s)| {
            let generation = s.generation;
            s.shape
                .as_mut()
                .map(|shape| (ShapeHandle::new(i as u32, generation), shape))
        })
    }

    /// Number of live shapes
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.shape.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Partners currently overlapping `handle` (as of the last step)
    pub fn overlapping(&self, handle: ShapeHandle) -> Vec<ShapeHandle> {
        self.tracker.partners(handle).collect()
    }

    /// Events queued by the last step(s), not yet delivered
    pub fn pending_events(&self) -> &[OverlapEvent] {
        &self.events
    }

    /// Take the queued events
    pub fn drain_events(&mut self) -> Vec<OverlapEvent> {
        std::mem::take(&mut self.events)
    }

    /// Deliver queued events to `listener`, then apply its deferred requests
    ///
    /// Returns the number of events delivered.
    pub fn dispatch<L: OverlapListener>(&mut self, listener: &mut L) -> usize {
        let events = self.drain_events();
        let mut deferred = Deferred::default();
        for event in &events {
            if self.settings.log_events {
                log::info!("{} {:?} overlap with {}", event.shape, event.kind, event.other);
            }
            match event.kind {
                OverlapKind::Begin => {
                    listener.on_overlap_begin(event.shape, event.other, &mut deferred)
                }
                OverlapKind::End => {
                    listener.on_overlap_end(event.shape, event.other, &mut deferred)
                }
            }
        }
        self.apply(deferred);
        events.len()
    }

    /// Apply requests collected while delivering events
    pub fn apply(&mut self, deferred: Deferred) {
        for op in deferred.ops {
            match op {
                DeferredOp::Remove(h) => {
                    self.remove(h);
                }
                DeferredOp::Register(h) => {
                    self.register(h);
                }
                DeferredOp::Unregister(h) => {
                    self.unregister(h);
                }
                DeferredOp::Translate(h, offset) => {
                    self.translate(h, offset);
                }
            }
        }
    }

    fn live_slot_mut(&mut self, handle: ShapeHandle) -> Option<&mut Slot> {
        self.slots
            .get_mut(handle.index as usize)
            .filter(|s| s.generation == handle.generation && s.shape.is_some())
    }
}
