//! Rebound - analytic 2D rigid-body simulation
//!
//! Core modules:
//! - `vector`: 2D vector helpers on top of `glam::Vec2`
//! - `sim`: Object model, kinematics, collision engine, loop clock, listeners
//! - `engine`: Facade owning the object registry and driving the clock
//! - `settings`: Validation limits and loop timing
//! - `scene`: Ready-made and seeded random scenes

pub mod engine;
pub mod error;
pub mod scene;
pub mod settings;
pub mod sim;
pub mod vector;

pub use engine::{Engine, ObjectSnapshot};
pub use error::{EngineError, InvalidObject, SettingsError};
pub use settings::{EngineSettings, ValidationPolicy};
pub use sim::{Boundary, GameObject, ObjectId, RoundBody};

/// Engine configuration constants
pub mod consts {
    /// Simulated length of one loop segment (seconds)
    pub const LOOP_SEGMENT_SECS: f32 = 10.0;
    /// Subtracted from the anchor time after a boundary hit, since detection
    /// happens strictly after penetration
    pub const BOUNDARY_BACKOFF_SECS: f32 = 0.01;

    /// Creation-time ceiling on |velocity|
    pub const MAX_INITIAL_VELOCITY: f32 = 700.0;
    /// Creation-time ceiling on mass * |velocity|
    pub const MAX_INITIAL_MOMENTUM: f32 = 70_000.0;
    /// Creation-time ceiling on |acceleration|
    pub const MAX_INITIAL_ACCELERATION: f32 = 200.0;

    /// Default sample rate for fixed-step drivers (Hz)
    pub const FIXED_STEP_HZ: f32 = 120.0;
}
