//! Geometry helpers shared by the narrow phase
//!
//! Pure functions over ordered point sequences: projection onto an axis,
//! edge normals and centroids.

use glam::{Affine2, Vec2};

use crate::safe_normalize;

/// Scalar range of a point set projected onto an axis
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    pub min: f32,
    pub max: f32,
}

impl Projection {
    /// Range covered by a circle whose center projects to `center`
    #[inline]
    pub fn around(center: f32, radius: f32) -> Self {
        Self {
            min: center - radius,
            max: center + radius,
        }
    }

    /// True when the two ranges share no point (touching is not separated)
    #[inline]
    pub fn is_separated_from(&self, other: &Projection) -> bool {
        self.max < other.min || other.max < self.min
    }

    /// Length of the shared range; only meaningful when not separated
    #[inline]
    pub fn overlap(&self, other: &Projection) -> f32 {
        self.max.min(other.max) - self.min.max(other.min)
    }
}

/// Project every point onto `axis` and return the covered range
///
/// Returns `None` for an empty point set.
pub fn project(points: &[Vec2], axis: Vec2) -> Option<Projection> {
    let (first, rest) = points.split_first()?;
    let start = first.dot(axis);
    let mut proj = Projection {
        min: start,
        max: start,
    };
    for p in rest {
        let d = p.dot(axis);
        proj.min = proj.min.min(d);
        proj.max = proj.max.max(d);
    }
    Some(proj)
}

/// Unit normal of every edge, wrapping from the last point back to the first
///
/// Zero-length edges yield `Vec2::ZERO`; callers filter those out.
pub fn edge_normals(points: &[Vec2]) -> Vec<Vec2> {
    let n = points.len();
    (0..n)
        .map(|i| {
            let edge = points[(i + 1) % n] - points[i];
            safe_normalize(edge.perp()).unwrap_or(Vec2::ZERO)
        })
        .collect()
}

/// Arithmetic mean of the transformed points (origin for an empty set)
pub fn centroid(points: &[Vec2], transform: &Affine2) -> Vec2 {
    if points.is_empty() {
        return Vec2::ZERO;
    }
    let sum: Vec2 = points.iter().map(|p| transform.transform_point2(*p)).sum();
    sum / points.len() as f32
}

/// Flip `axis` if needed so it points along `direction`
#[inline]
pub fn orient_along(axis: Vec2, direction: Vec2) -> Vec2 {
    if axis.dot(direction) < 0.0 { -axis } else { axis }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_square() -> Vec<Vec2> {
        vec![
            Vec2::new(-1.0, -1.0),
            Vec2::new(1.0, -1.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(-1.0, 1.0),
        ]
    }

    #[test]
    fn test_project_square() {
        let proj = project(&unit_square(), Vec2::X).unwrap();
        assert_eq!(proj, Projection { min: -1.0, max: 1.0 });

        let diag = Vec2::new(1.0, 1.0).normalize();
        let proj = project(&unit_square(), diag).unwrap();
        assert!((proj.max - 2.0_f32.sqrt()).abs() < 1e-5);
        assert!((proj.min + 2.0_f32.sqrt()).abs() < 1e-5);
    }

    #[test]
    fn test_project_empty() {
        assert!(project(&[], Vec2::X).is_none());
    }

    #[test]
    fn test_projection_overlap_and_touching() {
        let a = Projection { min: 0.0, max: 2.0 };
        let b = Projection { min: 1.0, max: 3.0 };
        assert!(!a.is_separated_from(&b));
        assert_eq!(a.overlap(&b), 1.0);

        let c = Projection { min: 2.0, max: 4.0 };
        assert!(!a.is_separated_from(&c));
        assert_eq!(a.overlap(&c), 0.0);

        let d = Projection { min: 2.5, max: 4.0 };
        assert!(a.is_separated_from(&d));
        assert!(d.is_separated_from(&a));
    }

    #[test]
    fn test_edge_normals_counter_clockwise_square() {
        let normals = edge_normals(&unit_square());
        assert_eq!(normals.len(), 4);
        // perp() rotates +90°, so a CCW square yields inward-pointing normals
        assert!((normals[0] - Vec2::new(0.0, 1.0)).length() < 1e-6);
        assert!((normals[1] - Vec2::new(-1.0, 0.0)).length() < 1e-6);
        for n in &normals {
            assert!((n.length() - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_edge_normals_degenerate_edge() {
        let points = [Vec2::ZERO, Vec2::ZERO, Vec2::new(1.0, 0.0)];
        let normals = edge_normals(&points);
        assert_eq!(normals[0], Vec2::ZERO);
        assert!((normals[1].length() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_centroid() {
        let t = Affine2::from_translation(Vec2::new(5.0, -2.0));
        let c = centroid(&unit_square(), &t);
        assert!((c - Vec2::new(5.0, -2.0)).length() < 1e-6);
        assert_eq!(centroid(&[], &t), Vec2::ZERO);
    }

    #[test]
    fn test_orient_along() {
        assert_eq!(orient_along(Vec2::X, Vec2::new(-3.0, 1.0)), -Vec2::X);
        assert_eq!(orient_along(Vec2::X, Vec2::new(3.0, 1.0)), Vec2::X);
    }
}
