//! Object model and creation-time validation
//!
//! Two kinds of object share the registry: round bodies that move, and
//! boundaries (line segments) that never do.

use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::InvalidObject;
use crate::settings::ValidationPolicy;
use crate::vector::is_finite;

/// Registry key, unique across all objects of an engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectId(pub u32);

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for ObjectId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

/// A circular rigid body.
///
/// The `anchor_*` fields describe the body at `anchor_time`; its state at any
/// later clock reading is derived in [`kinematics`](super::kinematics).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundBody {
    pub id: ObjectId,
    pub anchor_pos: Vec2,
    #[serde(default)]
    pub anchor_vel: Vec2,
    /// Constant acceleration
    #[serde(default)]
    pub accel: Vec2,
    pub radius: f32,
    pub mass: f32,
    /// Degrees
    #[serde(default)]
    pub anchor_rotation: f32,
    /// Degrees per second, constant between collisions
    #[serde(default)]
    pub angular_vel: f32,
    #[serde(default = "default_restitution")]
    pub restitution: f32,
    /// Clock reading the anchor state refers to. Only the collision engine
    /// moves it.
    #[serde(skip)]
    pub(crate) anchor_time: f32,
}

fn default_restitution() -> f32 {
    1.0
}

impl RoundBody {
    /// A body at rest with restitution 1
    pub fn new(id: u32, pos: Vec2, radius: f32, mass: f32) -> Self {
        Self {
            id: ObjectId(id),
            anchor_pos: pos,
            anchor_vel: Vec2::ZERO,
            accel: Vec2::ZERO,
            radius,
            mass,
            anchor_rotation: 0.0,
            angular_vel: 0.0,
            restitution: 1.0,
            anchor_time: 0.0,
        }
    }

    pub fn with_velocity(mut self, vel: Vec2) -> Self {
        self.anchor_vel = vel;
        self
    }

    pub fn with_acceleration(mut self, accel: Vec2) -> Self {
        self.accel = accel;
        self
    }

    /// Initial rotation (degrees) and angular velocity (degrees/second)
    pub fn with_spin(mut self, rotation: f32, angular_vel: f32) -> Self {
        self.anchor_rotation = rotation;
        self.angular_vel = angular_vel;
        self
    }

    pub fn with_restitution(mut self, restitution: f32) -> Self {
        self.restitution = restitution;
        self
    }

    /// Clock reading the anchor state refers to
    pub fn anchor_time(&self) -> f32 {
        self.anchor_time
    }

    /// Moment of inertia of a uniform disk
    #[inline]
    pub fn moment_of_inertia(&self) -> f32 {
        0.5 * self.mass * self.radius * self.radius
    }

    /// Replace the anchor state (collision engine only)
    pub(crate) fn reanchor(
        &mut self,
        pos: Vec2,
        vel: Vec2,
        rotation: f32,
        angular_vel: f32,
        time: f32,
    ) {
        self.anchor_pos = pos;
        self.anchor_vel = vel;
        self.anchor_rotation = rotation;
        self.angular_vel = angular_vel;
        self.anchor_time = time;
    }
}

/// A static line segment with infinite effective mass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Boundary {
    pub id: ObjectId,
    pub start: Vec2,
    pub end: Vec2,
    #[serde(default = "default_restitution")]
    pub restitution: f32,
}

impl Boundary {
    pub fn new(id: u32, start: Vec2, end: Vec2) -> Self {
        Self {
            id: ObjectId(id),
            start,
            end,
            restitution: 1.0,
        }
    }

    pub fn with_restitution(mut self, restitution: f32) -> Self {
        self.restitution = restitution;
        self
    }

    /// Segment direction, `end - start`
    #[inline]
    pub fn direction(&self) -> Vec2 {
        self.end - self.start
    }
}

/// Anything the engine can hold
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GameObject {
    Round(RoundBody),
    Boundary(Boundary),
}

impl GameObject {
    pub fn id(&self) -> ObjectId {
        match self {
            GameObject::Round(body) => body.id,
            GameObject::Boundary(boundary) => boundary.id,
        }
    }

    pub fn as_round(&self) -> Option<&RoundBody> {
        match self {
            GameObject::Round(body) => Some(body),
            GameObject::Boundary(_) => None,
        }
    }

    pub fn as_boundary(&self) -> Option<&Boundary> {
        match self {
            GameObject::Boundary(boundary) => Some(boundary),
            GameObject::Round(_) => None,
        }
    }

    /// Check every creation-time constraint against `policy`
    pub fn validate(&self, policy: &ValidationPolicy) -> Result<(), InvalidObject> {
        match self {
            GameObject::Round(body) => validate_round(body, policy),
            GameObject::Boundary(boundary) => validate_boundary(boundary),
        }
    }
}

impl From<RoundBody> for GameObject {
    fn from(body: RoundBody) -> Self {
        GameObject::Round(body)
    }
}

impl From<Boundary> for GameObject {
    fn from(boundary: Boundary) -> Self {
        GameObject::Boundary(boundary)
    }
}

fn check_restitution(restitution: f32) -> Result<(), InvalidObject> {
    // NaN fails the range check too
    if (0.0..=1.0).contains(&restitution) {
        Ok(())
    } else {
        Err(InvalidObject::InvalidRestitution(restitution))
    }
}

fn validate_round(body: &RoundBody, policy: &ValidationPolicy) -> Result<(), InvalidObject> {
    check_restitution(body.restitution)?;
    if !(body.mass > 0.0) {
        return Err(InvalidObject::NonPositiveMass(body.mass));
    }
    if !(body.radius > 0.0) {
        return Err(InvalidObject::NonPositiveRadius(body.radius));
    }

    let fields = [
        ("position", is_finite(body.anchor_pos)),
        ("velocity", is_finite(body.anchor_vel)),
        ("acceleration", is_finite(body.accel)),
        ("mass", body.mass.is_finite()),
        ("radius", body.radius.is_finite()),
        ("rotation", body.anchor_rotation.is_finite()),
        ("angular velocity", body.angular_vel.is_finite()),
    ];
    if let Some((name, _)) = fields.into_iter().find(|&(_, finite)| !finite) {
        return Err(InvalidObject::NonFiniteState(name));
    }

    let speed = body.anchor_vel.length();
    if speed >= policy.max_velocity {
        return Err(InvalidObject::ExcessiveInitialVelocity {
            value: speed,
            limit: policy.max_velocity,
        });
    }
    let momentum = body.mass * speed;
    if momentum >= policy.max_momentum {
        return Err(InvalidObject::ExcessiveInitialMomentum {
            value: momentum,
            limit: policy.max_momentum,
        });
    }
    let accel = body.accel.length();
    if accel >= policy.max_acceleration {
        return Err(InvalidObject::ExcessiveInitialAcceleration {
            value: accel,
            limit: policy.max_acceleration,
        });
    }
    Ok(())
}

fn validate_boundary(boundary: &Boundary) -> Result<(), InvalidObject> {
    check_restitution(boundary.restitution)?;
    if !is_finite(boundary.start) {
        return Err(InvalidObject::NonFiniteState("start position"));
    }
    if !is_finite(boundary.end) {
        return Err(InvalidObject::NonFiniteState("end position"));
    }
    if boundary.start == boundary.end {
        return Err(InvalidObject::DegenerateBoundary);
    }
    Ok(())
}
