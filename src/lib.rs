//! SAT Overlap - 2D narrow-phase collision for convex polygons and circles
//!
//! Core modules:
//! - `sim`: Separating-axis tests, positional correction, overlap lifecycle
//!   and the step driver that ties them together
//! - `settings`: Engine configuration (JSON via serde)

pub mod settings;
pub mod sim;

pub use settings::EngineSettings;
pub use sim::{
    Circle, ConvexPolygon, OverlapEvent, OverlapKind, ResponsePolicy, Shape, ShapeHandle, World,
    step,
};

use glam::Vec2;

/// Engine constants
pub mod consts {
    use glam::Vec2;

    /// Tolerance for "nearly zero" lengths and overlaps
    pub const EPSILON: f32 = 1.0e-4;
    /// Squared-length tolerance used when normalizing
    pub const EPSILON_SQ: f32 = EPSILON * EPSILON;
    /// Outward nudge applied to a circle pushed out of a polygon
    pub const RESOLVE_NUDGE: f32 = 0.01;
    /// Axis used when two circle centers coincide
    pub const FALLBACK_AXIS: Vec2 = Vec2::X;
}

/// Normalize `v`, or `None` when it is too short to have a direction
#[inline]
pub fn safe_normalize(v: Vec2) -> Option<Vec2> {
    let len_sq = v.length_squared();
    if len_sq <= consts::EPSILON_SQ {
        None
    } else {
        Some(v / len_sq.sqrt())
    }
}

/// True when `v` is within tolerance of the zero vector
#[inline]
pub fn is_nearly_zero(v: Vec2) -> bool {
    v.length_squared() <= consts::EPSILON_SQ
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_normalize() {
        let n = safe_normalize(Vec2::new(3.0, 4.0)).unwrap();
        assert!((n - Vec2::new(0.6, 0.8)).length() < 1e-6);
        assert!(safe_normalize(Vec2::ZERO).is_none());
        assert!(safe_normalize(Vec2::new(1e-6, 0.0)).is_none());
    }

    #[test]
    fn test_is_nearly_zero() {
        assert!(is_nearly_zero(Vec2::new(1e-5, -1e-5)));
        assert!(!is_nearly_zero(Vec2::new(0.1, 0.0)));
    }
}
