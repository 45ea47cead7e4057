//! Collision detection and response
//!
//! Once per tick every unordered pair of objects is tested, in registry
//! order. All body states are sampled at the start of the tick; a resolution
//! early in the scan does not refresh the inputs of later pairs.
//!
//! A pair only counts as colliding while it is both overlapping and closing.
//! Bodies that still overlap after being resolved (or because of coarse
//! ticks) are separating, so they do not re-trigger while they drift apart.

use glam::Vec2;

use super::kinematics::{KinematicState, state_at};
use super::object::{Boundary, GameObject, ObjectId, RoundBody};
use crate::vector::{cross, decompose, normalize, project, segment_normal};

/// Which kinds of object met
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionKind {
    BodyBody,
    BodyBoundary,
}

/// A confirmed, resolved collision
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Collision {
    /// First body (for a boundary hit, always the ball)
    pub first: ObjectId,
    /// Second body or the boundary
    pub second: ObjectId,
    pub kind: CollisionKind,
    /// Clock reading of the tick that found it
    pub time: f32,
}

/// Post-collision velocities of a body pair
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PairResponse {
    pub vel1: Vec2,
    pub vel2: Vec2,
    pub angular_vel1: f32,
    pub angular_vel2: f32,
}

/// True when two bodies overlap and are moving toward each other along the
/// line of centers
pub fn bodies_colliding(
    b1: &RoundBody,
    s1: &KinematicState,
    b2: &RoundBody,
    s2: &KinematicState,
) -> bool {
    let axis = normalize(s2.position - s1.position);
    let v1_par = project(s1.velocity, axis);
    let v2_par = project(s2.velocity, axis);

    s1.position.distance(s2.position) < b1.radius + b2.radius
        && (v1_par - v2_par).dot(s1.position - s2.position) < 0.0
}

/// Resolve a body pair.
///
/// Along the line of centers this is a 1-D collision with restitution
/// `min(e1, e2)`; the perpendicular parts pass through unchanged. Spin is
/// exchanged as a perfectly elastic rotational collision between two disks,
/// regardless of restitution.
pub fn resolve_bodies(
    b1: &RoundBody,
    s1: &KinematicState,
    b2: &RoundBody,
    s2: &KinematicState,
) -> PairResponse {
    let axis = normalize(s2.position - s1.position);
    let e = b1.restitution.min(b2.restitution);
    let (m1, m2) = (b1.mass, b2.mass);

    let (v1_par, v1_perp) = decompose(s1.velocity, axis);
    let (v2_par, v2_perp) = decompose(s2.velocity, axis);

    let total = m1 * v1_par + m2 * v2_par;
    let v1_par_final = (total + m2 * e * (v2_par - v1_par)) / (m1 + m2);
    let v2_par_final = (total + m1 * e * (v1_par - v2_par)) / (m1 + m2);

    let (i1, i2) = (b1.moment_of_inertia(), b2.moment_of_inertia());
    let (w1, w2) = (s1.angular_vel, s2.angular_vel);
    let angular_vel1 = ((i1 - i2) * w1 + 2.0 * i2 * w2) / (i1 + i2);
    let angular_vel2 = ((i2 - i1) * w2 + 2.0 * i1 * w1) / (i1 + i2);

    PairResponse {
        vel1: v1_par_final + v1_perp,
        vel2: v2_par_final + v2_perp,
        angular_vel1,
        angular_vel2,
    }
}

/// True when a ball touches the segment and is moving toward its line.
///
/// The segment is treated as extended by the ball's radius at both ends, so a
/// ball clipping an end point still registers.
pub fn boundary_colliding(ball: &RoundBody, state: &KinematicState, boundary: &Boundary) -> bool {
    let d = boundary.direction();
    let n = segment_normal(d);
    let n_unit = normalize(n);
    let rel = state.position - boundary.start;

    let distance = cross(d, rel).abs() / d.length();
    if distance >= ball.radius {
        return false;
    }

    if state.velocity.dot(n_unit) * n.dot(rel) >= 0.0 {
        return false;
    }

    // Projection of the center onto the segment line, compared along d
    let projected = boundary.start + (rel.dot(d) / d.dot(d)) * d;
    let d_unit = d / d.length();
    let start_ext = boundary.start - ball.radius * d_unit;
    let end_ext = boundary.end + ball.radius * d_unit;
    let along = projected.dot(d);
    start_ext.dot(d) <= along && along <= end_ext.dot(d)
}

/// Velocity of a ball after bouncing off a boundary: the tangential part is
/// kept and the normal part is reversed and scaled by `min(e_ball, e_boundary)`
pub fn resolve_boundary(ball: &RoundBody, state: &KinematicState, boundary: &Boundary) -> Vec2 {
    let n_unit = normalize(segment_normal(boundary.direction()));
    let e = ball.restitution.min(boundary.restitution);
    let (v_normal, v_tangent) = decompose(state.velocity, n_unit);
    v_tangent - e * v_normal
}

/// Run one collision pass at clock reading `now`.
///
/// Colliding bodies are re-anchored at `now`; a ball that hit a boundary is
/// anchored `boundary_backoff` seconds earlier. Returns the collisions in scan
/// order.
pub fn scan(objects: &mut [GameObject], now: f32, boundary_backoff: f32) -> Vec<Collision> {
    // Re-anchoring only touches the fields captured here, so every pair is
    // judged on the state at tick start
    let states: Vec<Option<KinematicState>> = objects
        .iter()
        .map(|obj| obj.as_round().map(|body| state_at(body, now)))
        .collect();

    let mut collisions = Vec::new();

    for i in 0..objects.len() {
        for j in (i + 1)..objects.len() {
            let update = match (&objects[i], &objects[j]) {
                (GameObject::Round(b1), GameObject::Round(b2)) => {
                    body_pair((i, b1), &states[i], (j, b2), &states[j], now)
                }
                (GameObject::Round(ball), GameObject::Boundary(boundary)) => {
                    body_boundary((i, ball), &states[i], boundary, now, boundary_backoff)
                }
                (GameObject::Boundary(boundary), GameObject::Round(ball)) => {
                    body_boundary((j, ball), &states[j], boundary, now, boundary_backoff)
                }
                (GameObject::Boundary(_), GameObject::Boundary(_)) => None,
            };

            let Some(update) = update else {
                continue;
            };
            for (index, anchor) in update.anchors.iter().flatten() {
                if let Some(GameObject::Round(body)) = objects.get_mut(*index) {
                    body.reanchor(
                        anchor.pos,
                        anchor.vel,
                        anchor.rotation,
                        anchor.angular_vel,
                        anchor.time,
                    );
                }
            }
            log::trace!(
                "{:?} collision {} <-> {} at t={:.4}",
                update.collision.kind,
                update.collision.first,
                update.collision.second,
                now
            );
            collisions.push(update.collision);
        }
    }

    collisions
}

/// New anchor state for one body
struct Anchor {
    pos: Vec2,
    vel: Vec2,
    rotation: f32,
    angular_vel: f32,
    time: f32,
}

/// Everything a single confirmed hit writes back, keyed by registry index
struct Update {
    collision: Collision,
    anchors: [Option<(usize, Anchor)>; 2],
}

fn body_pair(
    (i, b1): (usize, &RoundBody),
    s1: &Option<KinematicState>,
    (j, b2): (usize, &RoundBody),
    s2: &Option<KinematicState>,
    now: f32,
) -> Option<Update> {
    let (s1, s2) = (s1.as_ref()?, s2.as_ref()?);
    if !bodies_colliding(b1, s1, b2, s2) {
        return None;
    }

    let response = resolve_bodies(b1, s1, b2, s2);
    Some(Update {
        collision: Collision {
            first: b1.id,
            second: b2.id,
            kind: CollisionKind::BodyBody,
            time: now,
        },
        anchors: [
            Some((
                i,
                Anchor {
                    pos: s1.position,
                    vel: response.vel1,
                    rotation: s1.rotation,
                    angular_vel: response.angular_vel1,
                    time: now,
                },
            )),
            Some((
                j,
                Anchor {
                    pos: s2.position,
                    vel: response.vel2,
                    rotation: s2.rotation,
                    angular_vel: response.angular_vel2,
                    time: now,
                },
            )),
        ],
    })
}

fn body_boundary(
    (index, ball): (usize, &RoundBody),
    state: &Option<KinematicState>,
    boundary: &Boundary,
    now: f32,
    backoff: f32,
) -> Option<Update> {
    let state = state.as_ref()?;
    if !boundary_colliding(ball, state, boundary) {
        return None;
    }

    Some(Update {
        collision: Collision {
            first: ball.id,
            second: boundary.id,
            kind: CollisionKind::BodyBoundary,
            time: now,
        },
        anchors: [
            Some((
                index,
                Anchor {
                    pos: state.position,
                    vel: resolve_boundary(ball, state, boundary),
                    rotation: state.rotation,
                    angular_vel: state.angular_vel,
                    time: now - backoff,
                },
            )),
            None,
        ],
    })
}
