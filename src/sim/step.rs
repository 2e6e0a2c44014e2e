//! Discrete collision step
//!
//! One call performs a full pairwise sweep over the registered shapes
//! (polygon-polygon, then circle-circle, then circle-polygon), queues begin
//! events for new overlaps, applies positional correction to blocking pairs
//! and finally queues end events for overlaps that did not survive.
//!
//! Events left undelivered from the previous step are dropped when the next
//! step starts, so callers must drain or dispatch after every step.

use std::collections::BTreeSet;

use super::overlap::{OverlapEvent, OverlapPair};
use super::resolve::{resolve_circle_pair, resolve_circle_polygon, resolve_polygon_pair};
use super::sat::{Contact, detect};
use super::shape::Shape;
use super::world::{ShapeHandle, World};

/// Counters describing one step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepSummary {
    pub pairs_tested: usize,
    pub contacts: usize,
    pub begun: usize,
    pub ended: usize,
    pub corrections: usize,
}

/// A detected overlap waiting for resolution
#[derive(Debug, Clone, Copy)]
struct Hit {
    a: ShapeHandle,
    b: ShapeHandle,
    contact: Contact,
    block: bool,
}

fn test_pair(world: &World, a: ShapeHandle, b: ShapeHandle) -> Option<Hit> {
    let shape_a = world.get(a)?;
    let shape_b = world.get(b)?;
    let contact = detect(shape_a, shape_b)?;
    Some(Hit {
        a,
        b,
        contact,
        block: shape_a.response().blocks_with(shape_b.response()),
    })
}

fn resolve_hit(world: &mut World, hit: &Hit) -> bool {
    let nudge = world.settings.resolve_nudge;
    let Some((a, b)) = world.get_pair_mut(hit.a, hit.b) else {
        return false;
    };
    let correction = match (a, b) {
        (Shape::Polygon(pa), Shape::Polygon(pb)) => resolve_polygon_pair(pa, pb),
        (Shape::Circle(ca), Shape::Circle(cb)) => resolve_circle_pair(ca, cb, &hit.contact),
        (Shape::Circle(c), Shape::Polygon(p)) => {
            resolve_circle_polygon(c, p, &hit.contact, nudge)
        }
        (Shape::Polygon(p), Shape::Circle(c)) => {
            resolve_circle_polygon(c, p, &hit.contact.flipped(), nudge)
        }
    };
    correction.is_some()
}

/// Advance the world by one discrete collision step
///
/// Any events still queued from the previous step are discarded with a
/// warning before detection runs.
pub fn step(world: &mut World) -> StepSummary {
    let mut summary = StepSummary::default();
    if !world.events.is_empty() {
        log::warn!(
            "dropping {} undelivered overlap events before step {}",
            world.events.len(),
            world.step_count + 1
        );
        world.events.clear();
    }
    world.tracker.begin_step();

    let mut polygons = Vec::new();
    let mut circles = Vec::new();
    for (handle, shape) in world.registered() {
        if !shape.participates() {
            continue;
        }
        match shape {
            Shape::Polygon(_) => polygons.push(handle),
            Shape::Circle(_) => circles.push(handle),
        }
    }

    // Detection: every pair is tested against this step's starting geometry
    let mut candidates = Vec::new();
    for (i, &a) in polygons.iter().enumerate() {
        candidates.extend(polygons[i + 1..].iter().map(|&b| (a, b)));
    }
    for (i, &a) in circles.iter().enumerate() {
        candidates.extend(circles[i + 1..].iter().map(|&b| (a, b)));
    }
    for &polygon in &polygons {
        candidates.extend(circles.iter().map(|&circle| (circle, polygon)));
    }
    summary.pairs_tested = candidates.len();

    let hits: Vec<Hit> = candidates
        .into_iter()
        .filter_map(|(a, b)| test_pair(world, a, b))
        .collect();
    summary.contacts = hits.len();

    let mut colliding = BTreeSet::new();
    for hit in &hits {
        colliding.insert(hit.a);
        colliding.insert(hit.b);
        if world.tracker.record(OverlapPair::new(hit.a, hit.b)) {
            world.events.push(OverlapEvent::begin(hit.a, hit.b));
            world.events.push(OverlapEvent::begin(hit.b, hit.a));
            summary.begun += 1;
        }
    }

    // Resolution runs after begin events are queued
    for hit in hits.iter().filter(|h| h.block) {
        if resolve_hit(world, hit) {
            summary.corrections += 1;
        }
    }

    for pair in world.tracker.finish_step() {
        summary.ended += 1;
        for (shape, other) in [(pair.first(), pair.second()), (pair.second(), pair.first())] {
            if world.contains(shape) {
                world.events.push(OverlapEvent::end(shape, other));
            } else {
                log::trace!("{} is gone, skipping its end event", shape);
            }
        }
    }

    for (handle, shape) in world.iter_mut() {
        shape.set_colliding(colliding.contains(&handle));
    }

    world.step_count += 1;
    log::trace!(
        "step {}: {} pairs, {} contacts, {} begun, {} ended, {} corrected",
        world.step_count,
        summary.pairs_tested,
        summary.contacts,
        summary.begun,
        summary.ended,
        summary.corrections
    );
    summary
}
