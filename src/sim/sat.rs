//! Separating axis tests for convex polygons and circles
//!
//! Each test enumerates candidate axes, projects both shapes onto them and
//! bails out on the first separating axis. When no axis separates the
//! shapes, the axis of smallest overlap becomes the contact normal.
//!
//! Every returned axis points from the second shape toward the first, so
//! moving the first shape by `axis * overlap` separates the pair.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::{Projection, orient_along, project};
use super::shape::{Circle, ConvexPolygon, Shape};
use crate::consts::FALLBACK_AXIS;
use crate::{is_nearly_zero, safe_normalize};

/// Minimum translation vector of an overlapping pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    /// Unit axis, pointing from the second shape toward the first
    pub axis: Vec2,
    /// Penetration depth along `axis` (never negative)
    pub overlap: f32,
}

impl Contact {
    /// The full translation that separates the first shape from the second
    #[inline]
    pub fn mtv(&self) -> Vec2 {
        self.axis * self.overlap
    }

    /// Same contact seen from the other shape
    #[inline]
    pub fn flipped(self) -> Self {
        Self {
            axis: -self.axis,
            overlap: self.overlap,
        }
    }
}

/// Tracks the axis with the smallest overlap seen so far
struct MinOverlap {
    axis: Vec2,
    overlap: f32,
    found: bool,
}

impl MinOverlap {
    fn new() -> Self {
        Self {
            axis: Vec2::ZERO,
            overlap: f32::MAX,
            found: false,
        }
    }

    /// Feed one axis; returns false when it separates the projections
    fn test(&mut self, axis: Vec2, a: &Projection, b: &Projection) -> bool {
        if a.is_separated_from(b) {
            return false;
        }
        let overlap = a.overlap(b).max(0.0);
        if overlap < self.overlap {
            self.axis = axis;
            self.overlap = overlap;
            self.found = true;
        }
        true
    }

    fn into_contact(self) -> Option<Contact> {
        self.found.then_some(Contact {
            axis: self.axis,
            overlap: self.overlap,
        })
    }
}

/// Polygon vs polygon, axes are the edge normals of both polygons
pub fn polygon_polygon(a: &ConvexPolygon, b: &ConvexPolygon) -> Option<Contact> {
    if a.points.len() < 3 || b.points.len() < 3 {
        return None;
    }
    let verts_a = a.world_vertices();
    let verts_b = b.world_vertices();

    let mut best = MinOverlap::new();
    let axes = a.world_normals().into_iter().chain(b.world_normals());
    for axis in axes.filter(|n| !is_nearly_zero(*n)) {
        let pa = project(&verts_a, axis)?;
        let pb = project(&verts_b, axis)?;
        if !best.test(axis, &pa, &pb) {
            return None;
        }
    }

    let mut contact = best.into_contact()?;
    contact.axis = orient_along(contact.axis, a.centroid_world() - b.centroid_world());
    Some(contact)
}

/// Circle vs circle, closed form
///
/// Touching circles collide with zero overlap. Coincident centers fall back
/// to `FALLBACK_AXIS` with the full radius sum as overlap.
pub fn circle_circle(a: &Circle, b: &Circle) -> Option<Contact> {
    if a.radius <= 0.0 || b.radius <= 0.0 {
        return None;
    }
    let delta = a.world_center() - b.world_center();
    let radius_sum = a.radius + b.radius;
    let dist_sq = delta.length_squared();
    if dist_sq > radius_sum * radius_sum {
        return None;
    }

    let contact = match safe_normalize(delta) {
        Some(axis) => Contact {
            axis,
            overlap: (radius_sum - dist_sq.sqrt()).max(0.0),
        },
        None => Contact {
            axis: FALLBACK_AXIS,
            overlap: radius_sum,
        },
    };
    Some(contact)
}

/// Circle vs polygon
///
/// Axes are the polygon's edge normals plus the direction from the circle
/// center to the nearest polygon vertex. The returned axis points away from
/// the polygon toward the circle.
///
/// The sign is taken from `center - nearest vertex`. When the circle's center
/// lies inside the polygon that vector can disagree with the outward face
/// normal, and the axis may point into the polygon. A blocking pair then gets
/// pushed deeper on that step and escapes along another axis later.
pub fn circle_polygon(circle: &Circle, polygon: &ConvexPolygon) -> Option<Contact> {
    if circle.radius <= 0.0 || polygon.points.len() < 3 {
        return None;
    }
    let center = circle.world_center();
    let radius = circle.radius;
    let verts = polygon.world_vertices();

    let nearest = verts
        .iter()
        .copied()
        .min_by(|p, q| {
            p.distance_squared(center)
                .total_cmp(&q.distance_squared(center))
        })?;

    let mut axes: Vec<Vec2> = polygon
        .world_normals()
        .into_iter()
        .filter(|n| !is_nearly_zero(*n))
        .collect();
    if let Some(vertex_axis) = safe_normalize(nearest - center) {
        axes.push(vertex_axis);
    }

    let mut best = MinOverlap::new();
    for axis in axes {
        let poly_proj = project(&verts, axis)?;
        let circle_proj = Projection::around(center.dot(axis), radius);
        if !best.test(axis, &poly_proj, &circle_proj) {
            return None;
        }
    }

    let mut contact = best.into_contact()?;
    contact.axis = orient_along(contact.axis, center - nearest);
    Some(contact)
}

/// Test any two shapes, honoring participation rules
///
/// Returns `None` when either shape is `Ignore`d or degenerate. The axis
/// points from `b` toward `a` whatever the kinds involved.
pub fn detect(a: &Shape, b: &Shape) -> Option<Contact> {
    if !a.participates() || !b.participates() {
        return None;
    }
    match (a, b) {
        (Shape::Polygon(pa), Shape::Polygon(pb)) => polygon_polygon(pa, pb),
        (Shape::Circle(ca), Shape::Circle(cb)) => circle_circle(ca, cb),
        (Shape::Circle(c), Shape::Polygon(p)) => circle_polygon(c, p),
        (Shape::Polygon(p), Shape::Circle(c)) => circle_polygon(c, p).map(Contact::flipped),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::shape::{ResponsePolicy, Transform2};
    use crate::sim::step::step;
    use crate::sim::world::World;
    use proptest::prelude::*;

    fn square(center: Vec2) -> ConvexPolygon {
        ConvexPolygon::rect(center, Vec2::ONE)
    }

    #[test]
    fn test_squares_overlap_by_one() {
        let a = square(Vec2::ZERO);
        let b = square(Vec2::new(1.0, 0.0));
        let contact = polygon_polygon(&a, &b).unwrap();
        assert!((contact.overlap - 1.0).abs() < 1e-5);
        // Points from b toward a
        assert!((contact.axis - Vec2::new(-1.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn test_squares_separated() {
        let a = square(Vec2::ZERO);
        let b = square(Vec2::new(2.5, 0.0));
        assert!(polygon_polygon(&a, &b).is_none());
    }

    #[test]
    fn test_squares_touching_is_zero_depth_contact() {
        let a = square(Vec2::ZERO);
        let b = square(Vec2::new(2.0, 0.0));
        let contact = polygon_polygon(&a, &b).unwrap();
        assert!(contact.overlap.abs() < 1e-5);
    }

    #[test]
    fn test_rotated_square_diagonal_gap() {
        // Bounding boxes overlap, only the diamond's edge normal separates
        let a = square(Vec2::ZERO);
        let b = square(Vec2::ZERO).with_transform(Transform2::new(
            Vec2::splat(1.9),
            std::f32::consts::FRAC_PI_4,
            Vec2::ONE,
        ));
        assert!(polygon_polygon(&a, &b).is_none());

        let closer = b.clone().with_transform(Transform2::new(
            Vec2::splat(1.6),
            std::f32::consts::FRAC_PI_4,
            Vec2::ONE,
        ));
        assert!(polygon_polygon(&a, &closer).is_some());
    }

    #[test]
    fn test_degenerate_polygon_never_collides() {
        let a = square(Vec2::ZERO);
        let b = ConvexPolygon::new(vec![Vec2::ZERO, Vec2::X]);
        assert!(polygon_polygon(&a, &b).is_none());
        assert!(polygon_polygon(&b, &a).is_none());
    }

    #[test]
    fn test_zero_length_edge_is_not_an_axis() {
        let a = ConvexPolygon::new(vec![
            Vec2::new(-1.0, -1.0),
            Vec2::new(1.0, -1.0),
            Vec2::new(1.0, -1.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(-1.0, 1.0),
        ]);
        let b = square(Vec2::new(1.5, 0.0));
        let contact = polygon_polygon(&a, &b).unwrap();
        assert!((contact.overlap - 0.5).abs() < 1e-5);
        assert!((contact.axis.length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_circles_overlap() {
        let a = Circle::new(Vec2::ZERO, 5.0);
        let b = Circle::new(Vec2::new(8.0, 0.0), 5.0);
        let contact = circle_circle(&a, &b).unwrap();
        assert!((contact.overlap - 2.0).abs() < 1e-5);
        assert!((contact.axis - Vec2::new(-1.0, 0.0)).length() < 1e-6);

        let reversed = circle_circle(&b, &a).unwrap();
        assert!((reversed.axis - Vec2::new(1.0, 0.0)).length() < 1e-6);
    }

    #[test]
    fn test_circles_touching_boundary_included() {
        let a = Circle::new(Vec2::ZERO, 5.0);
        let b = Circle::new(Vec2::new(10.0, 0.0), 5.0);
        let contact = circle_circle(&a, &b).unwrap();
        assert_eq!(contact.overlap, 0.0);

        let c = Circle::new(Vec2::new(10.001, 0.0), 5.0);
        assert!(circle_circle(&a, &c).is_none());
    }

    #[test]
    fn test_coincident_circles_use_fallback_axis() {
        let a = Circle::new(Vec2::new(3.0, 3.0), 1.0);
        let b = Circle::new(Vec2::new(3.0, 3.0), 2.0);
        let contact = circle_circle(&a, &b).unwrap();
        assert_eq!(contact.axis, FALLBACK_AXIS);
        assert_eq!(contact.overlap, 3.0);
    }

    #[test]
    fn test_circle_polygon_face_contact() {
        let circle = Circle::new(Vec2::new(1.5, 0.0), 1.0);
        let poly = square(Vec2::ZERO);
        let contact = circle_polygon(&circle, &poly).unwrap();
        assert!((contact.overlap - 0.5).abs() < 1e-5);
        // Away from the polygon, toward the circle
        assert!((contact.axis - Vec2::X).length() < 1e-5);
    }

    #[test]
    fn test_circle_polygon_corner_region() {
        // Near the corner but outside along the corner diagonal
        let circle = Circle::new(Vec2::new(1.8, 1.8), 1.0);
        let poly = square(Vec2::ZERO);
        assert!(circle_polygon(&circle, &poly).is_none());

        let circle = Circle::new(Vec2::new(1.5, 1.5), 1.0);
        let contact = circle_polygon(&circle, &poly).unwrap();
        let expected_axis = Vec2::splat(1.0).normalize();
        assert!((contact.axis - expected_axis).length() < 1e-4);
        assert!((contact.overlap - (1.0 - 0.5 * 2.0_f32.sqrt())).abs() < 1e-4);
    }

    #[test]
    fn test_circle_center_inside_polygon_keeps_vertex_sign() {
        // Nearest vertex (1,-1) sits on the inward side of the minimum face
        let circle = Circle::new(Vec2::new(0.9, 0.0), 0.5);
        let poly = ConvexPolygon::rect(Vec2::ZERO, Vec2::ONE);
        let contact = circle_polygon(&circle, &poly).unwrap();
        assert!((contact.axis - Vec2::new(-1.0, 0.0)).length() < 1e-5);
        assert!((contact.overlap - 0.6).abs() < 1e-4);
    }

    #[test]
    fn test_circle_polygon_separated() {
        let circle = Circle::new(Vec2::new(5.0, 0.0), 1.0);
        let poly = square(Vec2::ZERO);
        assert!(circle_polygon(&circle, &poly).is_none());
    }

    #[test]
    fn test_detect_orients_from_second_to_first() {
        let circle: Shape = Circle::new(Vec2::new(1.5, 0.0), 1.0).into();
        let poly: Shape = square(Vec2::ZERO).into();

        let cp = detect(&circle, &poly).unwrap();
        assert!(cp.axis.x > 0.0);
        let pc = detect(&poly, &circle).unwrap();
        assert!(pc.axis.x < 0.0);
        assert_eq!(cp.overlap, pc.overlap);
    }

    #[test]
    fn test_detect_skips_ignored_shapes() {
        let a: Shape = square(Vec2::ZERO).into();
        let b: Shape = square(Vec2::new(0.5, 0.0))
            .with_response(ResponsePolicy::Ignore)
            .into();
        assert!(detect(&a, &b).is_none());
        assert!(detect(&b, &a).is_none());
    }

    #[test]
    fn test_detect_is_idempotent() {
        let a: Shape = square(Vec2::ZERO).into();
        let b: Shape = square(Vec2::new(0.7, 0.3)).into();
        assert_eq!(detect(&a, &b), detect(&a, &b));
    }

    proptest! {
        #[test]
        fn prop_disjoint_squares_never_collide(
            x in -50.0f32..50.0,
            y in -50.0f32..50.0,
            gap in 0.01f32..10.0,
            horizontal in any::<bool>(),
        ) {
            let a = square(Vec2::new(x, y));
            let offset = if horizontal {
                Vec2::new(2.0 + gap, 0.0)
            } else {
                Vec2::new(0.0, 2.0 + gap)
            };
            let b = square(Vec2::new(x, y) + offset);
            prop_assert!(polygon_polygon(&a, &b).is_none());
        }

        #[test]
        fn prop_disjoint_regular_polygons_never_collide(
            sides_a in 3usize..=8,
            sides_b in 3usize..=8,
            radius_a in 0.1f32..5.0,
            radius_b in 0.1f32..5.0,
            scale_a in 0.2f32..3.0,
            scale_b in 0.2f32..3.0,
            rot_a in 0.0f32..std::f32::consts::TAU,
            rot_b in 0.0f32..std::f32::consts::TAU,
            heading in 0.0f32..std::f32::consts::TAU,
            gap in 0.01f32..10.0,
        ) {
            // Circumscribed circles are disjoint, so the polygons are too
            let dist = radius_a * scale_a + radius_b * scale_b + gap;
            let offset = Vec2::new(heading.cos(), heading.sin()) * dist;
            let a = ConvexPolygon::regular(Vec2::ZERO, radius_a, sides_a)
                .with_transform(Transform2::new(Vec2::ZERO, rot_a, Vec2::splat(scale_a)));
            let b = ConvexPolygon::regular(Vec2::ZERO, radius_b, sides_b)
                .with_transform(Transform2::new(offset, rot_b, Vec2::splat(scale_b)));

            let sa: Shape = a.clone().into();
            let sb: Shape = b.clone().into();
            prop_assert!(detect(&sa, &sb).is_none());
            prop_assert!(detect(&sb, &sa).is_none());

            let mut world = World::new();
            world.insert(a);
            world.insert(b);
            let summary = step(&mut world);
            prop_assert_eq!(summary.contacts, 0);
            prop_assert!(world.pending_events().is_empty());
        }

        #[test]
        fn prop_overlap_depth_is_order_independent(
            dx in -1.9f32..1.9,
            dy in -1.9f32..1.9,
            angle in 0.0f32..std::f32::consts::TAU,
        ) {
            let a = square(Vec2::ZERO);
            let b = square(Vec2::ZERO)
                .with_transform(Transform2::new(Vec2::new(dx, dy), angle, Vec2::ONE));
            let ab = polygon_polygon(&a, &b);
            let ba = polygon_polygon(&b, &a);
            prop_assert_eq!(ab.is_some(), ba.is_some());
            if let (Some(ab), Some(ba)) = (ab, ba) {
                prop_assert!(ab.overlap >= 0.0);
                prop_assert!((ab.overlap - ba.overlap).abs() < 1e-3);
            }
        }

        #[test]
        fn prop_circle_depth_matches_closed_form(
            ra in 0.1f32..10.0,
            rb in 0.1f32..10.0,
            dist in 0.01f32..25.0,
            angle in 0.0f32..std::f32::consts::TAU,
        ) {
            let a = Circle::new(Vec2::ZERO, ra);
            let b = Circle::new(Vec2::new(angle.cos(), angle.sin()) * dist, rb);
            match circle_circle(&a, &b) {
                Some(c) => {
                    prop_assert!(dist <= ra + rb + 1e-3);
                    prop_assert!((c.overlap - (ra + rb - dist)).abs() < 1e-3);
                    prop_assert!((c.axis.length() - 1.0).abs() < 1e-4);
                }
                None => prop_assert!(dist > ra + rb - 1e-3),
            }
        }
    }
}
