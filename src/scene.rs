//! Ready-made scenes
//!
//! Builders return plain object lists in the order they should be added.
//! Random scenes are seeded so the same seed always gives the same layout.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::settings::ValidationPolicy;
use crate::sim::{Boundary, GameObject, RoundBody};

/// Rejection-sampling attempts per body before giving up on it
const MAX_PLACEMENT_ATTEMPTS: u32 = 64;

/// Four boundaries enclosing the rectangle `min..max`, ids `first_id..first_id + 4`.
///
/// Segments run bottom, right, top, left.
pub fn walled_box(first_id: u32, min: Vec2, max: Vec2, restitution: f32) -> Vec<GameObject> {
    let corners = [
        Vec2::new(min.x, min.y),
        Vec2::new(max.x, min.y),
        Vec2::new(max.x, max.y),
        Vec2::new(min.x, max.y),
    ];
    (0..4)
        .map(|i| {
            Boundary::new(first_id + i as u32, corners[i], corners[(i + 1) % 4])
                .with_restitution(restitution)
                .into()
        })
        .collect()
}

/// Five spinning and drifting bodies in a 600 x 850 box
pub fn demo() -> Vec<GameObject> {
    let mut objects: Vec<GameObject> = vec![
        RoundBody::new(1, Vec2::new(100.0, 300.0), 30.0, 60.0)
            .with_velocity(Vec2::new(300.0, 40.0))
            .with_acceleration(Vec2::new(30.0, -10.0))
            .with_spin(0.0, 200.0)
            .into(),
        RoundBody::new(2, Vec2::new(300.0, 300.0), 30.0, 30.0)
            .with_velocity(Vec2::new(100.0, -100.0))
            .with_spin(0.0, 60.0)
            .into(),
        RoundBody::new(3, Vec2::new(500.0, 500.0), 30.0, 30.0)
            .with_velocity(Vec2::new(30.0, -300.0))
            .into(),
        RoundBody::new(8, Vec2::new(500.0, 700.0), 30.0, 40.0)
            .with_velocity(Vec2::new(10.0, 300.0))
            .into(),
        RoundBody::new(9, Vec2::new(200.0, 700.0), 30.0, 40.0)
            .with_velocity(Vec2::new(100.0, 200.0))
            .into(),
    ];
    objects.extend(walled_box(
        4,
        Vec2::new(50.0, 50.0),
        Vec2::new(650.0, 900.0),
        1.0,
    ));
    objects
}

/// Up to `count` non-overlapping random bodies inside `min..max`, ids from
/// `first_id`, every one of them acceptable to `policy`.
///
/// Bodies that cannot be placed after a bounded number of attempts are
/// skipped, so a crowded box may yield fewer than `count`.
pub fn scatter(
    seed: u64,
    count: usize,
    first_id: u32,
    min: Vec2,
    max: Vec2,
    policy: &ValidationPolicy,
) -> Vec<GameObject> {
    let mut rng = Pcg32::seed_from_u64(seed);
    let mut bodies: Vec<RoundBody> = Vec::with_capacity(count);
    let mut next_id = first_id;

    for _ in 0..count {
        let radius: f32 = rng.random_range(8.0..24.0);
        let inner_min = min + Vec2::splat(radius);
        let inner_max = max - Vec2::splat(radius);
        if inner_min.x >= inner_max.x || inner_min.y >= inner_max.y {
            log::warn!("Box too small for a body of radius {:.1}", radius);
            continue;
        }

        let placed = (0..MAX_PLACEMENT_ATTEMPTS).find_map(|_| {
            let pos = Vec2::new(
                rng.random_range(inner_min.x..inner_max.x),
                rng.random_range(inner_min.y..inner_max.y),
            );
            let clear = bodies
                .iter()
                .all(|other| other.anchor_pos.distance(pos) > other.radius + radius);
            clear.then_some(pos)
        });
        let Some(pos) = placed else {
            log::debug!("No room for body {} after {} attempts", next_id, MAX_PLACEMENT_ATTEMPTS);
            continue;
        };

        let mass: f32 = rng.random_range(5.0..50.0);
        // Stay well inside the creation ceilings
        let max_speed = (policy.max_velocity.min(policy.max_momentum / mass) * 0.5).max(0.0);
        let speed: f32 = rng.random_range(0.0..=max_speed);
        let heading: f32 = rng.random_range(0.0..std::f32::consts::TAU);
        let spin: f32 = rng.random_range(-180.0..180.0);
        let restitution: f32 = rng.random_range(0.6..=1.0);

        bodies.push(
            RoundBody::new(next_id, pos, radius, mass)
                .with_velocity(Vec2::from_angle(heading) * speed)
                .with_spin(0.0, spin)
                .with_restitution(restitution),
        );
        next_id += 1;
    }

    bodies.into_iter().map(GameObject::from).collect()
}
