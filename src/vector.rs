//! 2D vector algebra
//!
//! `glam::Vec2` supplies the arithmetic operators, dot product and length.
//! This module adds the handful of operations the collision math is written
//! in terms of.

use glam::Vec2;

/// The vector type used throughout the engine
pub type Vector2D = Vec2;

/// 2D cross product: the z component of the 3D cross of `(a, 0)` and `(b, 0)`
#[inline]
pub fn cross(a: Vec2, b: Vec2) -> f32 {
    a.perp_dot(b)
}

/// Unit vector in the direction of `v`.
///
/// The zero vector normalizes to the zero vector, never NaN.
#[inline]
pub fn normalize(v: Vec2) -> Vec2 {
    v.normalize_or_zero()
}

/// Component of `v` along the unit axis `axis`
#[inline]
pub fn project(v: Vec2, axis: Vec2) -> Vec2 {
    v.dot(axis) * axis
}

/// Split `v` into (parallel, perpendicular) parts relative to a unit axis
#[inline]
pub fn decompose(v: Vec2, axis: Vec2) -> (Vec2, Vec2) {
    let parallel = project(v, axis);
    (parallel, v - parallel)
}

/// Normal of a segment direction `d`, rotated clockwise: `(d.y, -d.x)`
#[inline]
pub fn segment_normal(d: Vec2) -> Vec2 {
    Vec2::new(d.y, -d.x)
}

/// True when both components are finite
#[inline]
pub fn is_finite(v: Vec2) -> bool {
    v.x.is_finite() && v.y.is_finite()
}
