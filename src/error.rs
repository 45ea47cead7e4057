//! Error types

use crate::sim::ObjectId;

/// Errors returned by [`Engine`](crate::Engine) registry operations
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    /// An object with this id is already registered
    #[error("id {0} is already present, use a new id")]
    DuplicateId(ObjectId),

    /// The object failed validation and was not inserted
    #[error("object {id} rejected: {reason}")]
    InvalidObject { id: ObjectId, reason: InvalidObject },
}

/// The constraint an object violated at creation
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum InvalidObject {
    #[error("restitution {0} must be between 0 and 1")]
    InvalidRestitution(f32),

    #[error("mass {0} must be positive")]
    NonPositiveMass(f32),

    #[error("radius {0} must be positive")]
    NonPositiveRadius(f32),

    #[error("boundary start and end positions cannot be the same")]
    DegenerateBoundary,

    #[error("initial velocity {value} should be less than {limit}")]
    ExcessiveInitialVelocity { value: f32, limit: f32 },

    #[error("momentum {value} should be less than {limit}")]
    ExcessiveInitialMomentum { value: f32, limit: f32 },

    #[error("acceleration {value} should be less than {limit}")]
    ExcessiveInitialAcceleration { value: f32, limit: f32 },

    /// A position, velocity, rotation or similar field is NaN or infinite
    #[error("{0} is not finite")]
    NonFiniteState(&'static str),
}

/// Settings loading errors
#[derive(thiserror::Error, Debug)]
pub enum SettingsError {
    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid settings: {0}")]
    Invalid(String),
}
