//! Shape model: circles and convex polygons placed by a world transform
//!
//! Shapes store local-space geometry and produce world-space vertices,
//! normals and centers on demand.

use glam::{Affine2, Vec2};
use serde::{Deserialize, Serialize};

use super::geometry::{centroid, edge_normals};

/// How a shape takes part in pairwise tests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ResponsePolicy {
    /// Excluded from every test
    Ignore,
    /// Detected and reported, never corrected
    #[default]
    Overlap,
    /// Detected, reported and pushed apart
    Block,
}

impl ResponsePolicy {
    /// True when a pair with these two policies gets positional correction
    #[inline]
    pub fn blocks_with(self, other: ResponsePolicy) -> bool {
        self == ResponsePolicy::Block || other == ResponsePolicy::Block
    }
}

/// Position, rotation (radians) and scale of a shape in the world
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform2 {
    pub translation: Vec2,
    pub rotation: f32,
    pub scale: Vec2,
}

impl Default for Transform2 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform2 {
    pub const IDENTITY: Self = Self {
        translation: Vec2::ZERO,
        rotation: 0.0,
        scale: Vec2::ONE,
    };

    pub fn from_translation(translation: Vec2) -> Self {
        Self {
            translation,
            ..Self::IDENTITY
        }
    }

    pub fn new(translation: Vec2, rotation: f32, scale: Vec2) -> Self {
        Self {
            translation,
            rotation,
            scale,
        }
    }

    #[inline]
    pub fn to_affine(&self) -> Affine2 {
        Affine2::from_scale_angle_translation(self.scale, self.rotation, self.translation)
    }

    #[inline]
    pub fn transform_point(&self, local: Vec2) -> Vec2 {
        self.to_affine().transform_point2(local)
    }
}

/// Coarse shape category, used for pairing and logging
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShapeKind {
    Circle,
    Polygon,
}

/// A circle with a local center offset and an untransformed radius
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Circle {
    /// Center offset in local space
    pub center: Vec2,
    pub radius: f32,
    pub transform: Transform2,
    pub response: ResponsePolicy,
    /// Set by the last step (presentation only)
    #[serde(skip)]
    pub colliding: bool,
}

impl Circle {
    /// Circle of `radius` centered on `position`
    pub fn new(position: Vec2, radius: f32) -> Self {
        Self {
            center: Vec2::ZERO,
            radius,
            transform: Transform2::from_translation(position),
            response: ResponsePolicy::default(),
            colliding: false,
        }
    }

    pub fn with_response(mut self, response: ResponsePolicy) -> Self {
        self.response = response;
        self
    }

    /// Replace the local center and radius
    pub fn set_circle(&mut self, x: f32, y: f32, radius: f32) {
        self.center = Vec2::new(x, y);
        self.radius = radius;
    }

    pub fn world_center(&self) -> Vec2 {
        self.transform.transform_point(self.center)
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Move the circle by a world-space offset
    pub fn translate(&mut self, offset: Vec2) {
        self.transform.translation += offset;
    }

    /// Eligible for pairwise tests this step
    pub fn participates(&self) -> bool {
        self.radius > 0.0 && self.response != ResponsePolicy::Ignore
    }
}

/// A convex polygon given by ordered local-space vertices
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConvexPolygon {
    pub points: Vec<Vec2>,
    pub transform: Transform2,
    pub response: ResponsePolicy,
    #[serde(skip)]
    pub colliding: bool,
}

impl ConvexPolygon {
    pub fn new(points: Vec<Vec2>) -> Self {
        Self {
            points,
            transform: Transform2::IDENTITY,
            response: ResponsePolicy::default(),
            colliding: false,
        }
    }

    /// Axis-aligned box of `half_extents` centered on `position`
    pub fn rect(position: Vec2, half_extents: Vec2) -> Self {
        let Vec2 { x: w, y: h } = half_extents;
        let mut poly = Self::new(vec![
            Vec2::new(-w, -h),
            Vec2::new(w, -h),
            Vec2::new(w, h),
            Vec2::new(-w, h),
        ]);
        poly.transform.translation = position;
        poly
    }

    /// Regular polygon with `sides` vertices on a circle of `radius`
    pub fn regular(position: Vec2, radius: f32, sides: usize) -> Self {
        let points = (0..sides)
            .map(|i| {
                let theta = i as f32 / sides as f32 * std::f32::consts::TAU;
                Vec2::new(theta.cos(), theta.sin()) * radius
            })
            .collect();
        let mut poly = Self::new(points);
        poly.transform.translation = position;
        poly
    }

    pub fn with_transform(mut self, transform: Transform2) -> Self {
        self.transform = transform;
        self
    }

    pub fn with_response(mut self, response: ResponsePolicy) -> Self {
        self.response = response;
        self
    }

    pub fn add_point(&mut self, x: f32, y: f32) {
        self.points.push(Vec2::new(x, y));
    }

    /// Overwrite a vertex; out-of-range indices are ignored
    pub fn set_point(&mut self, index: usize, x: f32, y: f32) {
        if let Some(p) = self.points.get_mut(index) {
            *p = Vec2::new(x, y);
        }
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    pub fn world_vertices(&self) -> Vec<Vec2> {
        let affine = self.transform.to_affine();
        self.points
            .iter()
            .map(|p| affine.transform_point2(*p))
            .collect()
    }

    pub fn world_normals(&self) -> Vec<Vec2> {
        edge_normals(&self.world_vertices())
    }

    pub fn centroid_world(&self) -> Vec2 {
        centroid(&self.points, &self.transform.to_affine())
    }

    pub fn translate(&mut self, offset: Vec2) {
        self.transform.translation += offset;
    }

    pub fn participates(&self) -> bool {
        self.points.len() >= 3 && self.response != ResponsePolicy::Ignore
    }
}

/// Any collidable shape
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Shape {
    Circle(Circle),
    Polygon(ConvexPolygon),
}

impl From<Circle> for Shape {
    fn from(c: Circle) -> Self {
        Shape::Circle(c)
    }
}

impl From<ConvexPolygon> for Shape {
    fn from(p: ConvexPolygon) -> Self {
        Shape::Polygon(p)
    }
}

impl Shape {
    pub fn kind(&self) -> ShapeKind {
        match self {
            Shape::Circle(_) => ShapeKind::Circle,
            Shape::Polygon(_) => ShapeKind::Polygon,
        }
    }

    pub fn response(&self) -> ResponsePolicy {
        match self {
            Shape::Circle(c) => c.response,
            Shape::Polygon(p) => p.response,
        }
    }

    pub fn set_response(&mut self, response: ResponsePolicy) {
        match self {
            Shape::Circle(c) => c.response = response,
            Shape::Polygon(p) => p.response = response,
        }
    }

    pub fn participates(&self) -> bool {
        match self {
            Shape::Circle(c) => c.participates(),
            Shape::Polygon(p) => p.participates(),
        }
    }

    pub fn translate(&mut self, offset: Vec2) {
        match self {
            Shape::Circle(c) => c.translate(offset),
            Shape::Polygon(p) => p.translate(offset),
        }
    }

    pub fn position(&self) -> Vec2 {
        match self {
            Shape::Circle(c) => c.transform.translation,
            Shape::Polygon(p) => p.transform.translation,
        }
    }

    pub fn is_colliding(&self) -> bool {
        match self {
            Shape::Circle(c) => c.colliding,
            Shape::Polygon(p) => p.colliding,
        }
    }

    pub fn set_colliding(&mut self, colliding: bool) {
        match self {
            Shape::Circle(c) => c.colliding = colliding,
            Shape::Polygon(p) => p.colliding = colliding,
        }
    }

    pub fn as_circle(&self) -> Option<&Circle> {
        match self {
            Shape::Circle(c) => Some(c),
            Shape::Polygon(_) => None,
        }
    }

    pub fn as_polygon(&self) -> Option<&ConvexPolygon> {
        match self {
            Shape::Polygon(p) => Some(p),
            Shape::Circle(_) => None,
        }
    }
}
