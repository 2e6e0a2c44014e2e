//! Positional correction along the minimum translation vector
//!
//! Polygon pairs and circle pairs are pushed apart symmetrically. A circle
//! pushed out of a polygon takes the full MTV plus a small outward nudge,
//! while the polygon takes the opposite of the un-nudged MTV.

use glam::Vec2;

use super::sat::{Contact, polygon_polygon};
use super::shape::{Circle, ConvexPolygon};
use crate::consts::EPSILON;
use crate::safe_normalize;

/// Offsets applied to the two shapes of a resolved pair
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Correction {
    pub first: Vec2,
    pub second: Vec2,
}

/// Validate a contact for correction, returning the unit axis
fn usable_axis(contact: &Contact) -> Option<Vec2> {
    if contact.overlap <= EPSILON {
        return None;
    }
    safe_normalize(contact.axis)
}

/// Re-test two polygons and split the MTV evenly between them
pub fn resolve_polygon_pair(a: &mut ConvexPolygon, b: &mut ConvexPolygon) -> Option<Correction> {
    let contact = polygon_polygon(a, b)?;
    let axis = usable_axis(&contact)?;
    let half = axis * contact.overlap * 0.5;

    a.translate(half);
    b.translate(-half);
    log::debug!("polygon pair separated by {:.4}", contact.overlap);
    Some(Correction {
        first: half,
        second: -half,
    })
}

/// Split the MTV evenly between two circles
pub fn resolve_circle_pair(
    a: &mut Circle,
    b: &mut Circle,
    contact: &Contact,
) -> Option<Correction> {
    let axis = usable_axis(contact)?;
    let half = axis * contact.overlap * 0.5;

    a.translate(half);
    b.translate(-half);
    log::debug!("circle pair separated by {:.4}", contact.overlap);
    Some(Correction {
        first: half,
        second: -half,
    })
}

/// Push a circle fully out of a polygon, and the polygon back by the same MTV
///
/// The circle additionally moves `nudge` further along the axis so floating
/// point residue does not register as a fresh contact next step.
pub fn resolve_circle_polygon(
    circle: &mut Circle,
    polygon: &mut ConvexPolygon,
    contact: &Contact,
    nudge: f32,
) -> Option<Correction> {
    let axis = usable_axis(contact)?;
    let mtv = axis * contact.overlap;

    let circle_offset = mtv + axis * nudge;
    circle.translate(circle_offset);
    polygon.translate(-mtv);
    log::debug!("circle pushed out of polygon by {:.4}", contact.overlap);
    Some(Correction {
        first: circle_offset,
        second: -mtv,
    })
}
