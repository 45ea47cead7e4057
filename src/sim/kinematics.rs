//! Closed-form motion
//!
//! Bodies are never stepped. Their state at any clock reading comes straight
//! from the constant-acceleration equations applied to the anchor state, so
//! motion between collisions carries no integration drift.

use glam::Vec2;

use super::object::RoundBody;

/// Position, velocity and rotation of a body at one clock reading
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KinematicState {
    pub position: Vec2,
    pub velocity: Vec2,
    /// Degrees
    pub rotation: f32,
    /// Degrees per second; constant between collisions
    pub angular_vel: f32,
}

/// s = p0 + v0 t + a t^2 / 2
#[inline]
pub fn position_at(body: &RoundBody, now: f32) -> Vec2 {
    let t = now - body.anchor_time;
    body.anchor_pos + body.anchor_vel * t + 0.5 * body.accel * t * t
}

/// v = v0 + a t
#[inline]
pub fn velocity_at(body: &RoundBody, now: f32) -> Vec2 {
    let t = now - body.anchor_time;
    body.anchor_vel + body.accel * t
}

/// theta = theta0 + w t
#[inline]
pub fn rotation_at(body: &RoundBody, now: f32) -> f32 {
    let t = now - body.anchor_time;
    body.anchor_rotation + body.angular_vel * t
}

pub fn state_at(body: &RoundBody, now: f32) -> KinematicState {
    KinematicState {
        position: position_at(body, now),
        velocity: velocity_at(body, now),
        rotation: rotation_at(body, now),
        angular_vel: body.angular_vel,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body() -> RoundBody {
        RoundBody::new(1, Vec2::new(100.0, 300.0), 30.0, 60.0)
            .with_velocity(Vec2::new(300.0, 40.0))
            .with_acceleration(Vec2::new(30.0, -10.0))
            .with_spin(10.0, 200.0)
    }

    #[test]
    fn test_at_anchor_time_is_anchor() {
        let b = body();
        let s = state_at(&b, 0.0);
        assert_eq!(s.position, b.anchor_pos);
        assert_eq!(s.velocity, b.anchor_vel);
        assert_eq!(s.rotation, b.anchor_rotation);
        assert_eq!(s.angular_vel, b.angular_vel);
    }

    #[test]
    fn test_constant_acceleration() {
        let b = body();
        let s = state_at(&b, 2.0);
        // 100 + 300*2 + 0.5*30*4 = 760, 300 + 40*2 - 0.5*10*4 = 360
        assert!((s.position - Vec2::new(760.0, 360.0)).length() < 1e-3);
        assert!((s.velocity - Vec2::new(360.0, 20.0)).length() < 1e-3);
        assert!((s.rotation - 410.0).abs() < 1e-3);
    }

    #[test]
    fn test_relative_to_anchor_time() {
        let mut b = body();
        b.reanchor(Vec2::ZERO, Vec2::new(1.0, 0.0), 0.0, 90.0, 5.0);
        assert_eq!(position_at(&b, 5.0), Vec2::ZERO);
        assert!((position_at(&b, 6.0) - Vec2::new(16.0, -5.0)).length() < 1e-4);
        assert!((rotation_at(&b, 7.0) - 180.0).abs() < 1e-4);
    }

    #[test]
    fn test_pure_function_of_time() {
        let b = body();
        // Evaluating out of order must not matter
        let late = state_at(&b, 3.5);
        let _early = state_at(&b, 0.25);
        assert_eq!(state_at(&b, 3.5), late);
    }
}
