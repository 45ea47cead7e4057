//! Deterministic simulation module
//!
//! Everything here is a pure function of (objects, clock readings):
//! - Motion is closed-form, never stepped
//! - Pairs are scanned in registry (insertion) order
//! - No rendering or platform dependencies

pub mod clock;
pub mod collision;
pub mod kinematics;
pub mod listener;
pub mod object;

pub use clock::{ClockSource, FixedStep, LoopClock, LoopState, WallClock};
pub use collision::{Collision, CollisionKind, scan};
pub use kinematics::{KinematicState, position_at, rotation_at, state_at, velocity_at};
pub use listener::{CollisionListener, ListenerRegistry};
pub use object::{Boundary, GameObject, ObjectId, RoundBody};
