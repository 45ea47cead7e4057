//! Engine facade
//!
//! Owns the object registry, the listeners and the loop clock. The host (a
//! renderer, a headless runner, a test) adds objects, starts the loop and then
//! feeds it clock samples; between samples it reads positions back out.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, SettingsError};
use crate::settings::EngineSettings;
use crate::sim::{
    ClockSource, Collision, CollisionListener, GameObject, ListenerRegistry, LoopClock,
    LoopState, ObjectId, WallClock, kinematics, scan,
};

/// Render-facing view of one object at the current clock reading
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ObjectSnapshot {
    Round {
        id: ObjectId,
        position: Vec2,
        velocity: Vec2,
        /// Degrees
        rotation: f32,
        radius: f32,
    },
    Boundary {
        id: ObjectId,
        start: Vec2,
        end: Vec2,
    },
}

impl ObjectSnapshot {
    pub fn id(&self) -> ObjectId {
        match self {
            ObjectSnapshot::Round { id, .. } | ObjectSnapshot::Boundary { id, .. } => *id,
        }
    }
}

/// The simulation engine
#[derive(Debug)]
pub struct Engine<C = WallClock> {
    settings: EngineSettings,
    /// Insertion order; fixes the pair scan order
    objects: Vec<GameObject>,
    listeners: ListenerRegistry,
    clock: LoopClock,
    source: C,
}

impl Engine<WallClock> {
    /// Engine driven by real time
    pub fn new(settings: EngineSettings) -> Result<Self, SettingsError> {
        Self::with_clock_source(settings, WallClock::new())
    }
}

impl Default for Engine<WallClock> {
    fn default() -> Self {
        Self::build(EngineSettings::default(), WallClock::new())
    }
}

impl<C: ClockSource> Engine<C> {
    /// Engine driven by an arbitrary sample source.
    ///
    /// Fails if the settings do not pass [`EngineSettings::validate`].
    pub fn with_clock_source(settings: EngineSettings, source: C) -> Result<Self, SettingsError> {
        if let Err(e) = settings.validate() {
            log::error!("Engine not created: {}", e);
            return Err(e);
        }
        Ok(Self::build(settings, source))
    }

    fn build(settings: EngineSettings, source: C) -> Self {
        Self {
            clock: LoopClock::new(settings.loop_segment_secs),
            settings,
            objects: Vec::new(),
            listeners: ListenerRegistry::new(),
            source,
        }
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    // === Registry ===

    /// Validate and append an object.
    ///
    /// Nothing is inserted on error.
    pub fn add(&mut self, object: impl Into<GameObject>) -> Result<(), EngineError> {
        let object = object.into();
        let id = object.id();

        if self.contains(id) {
            log::warn!("Rejected object {}: duplicate id", id);
            return Err(EngineError::DuplicateId(id));
        }
        if let Err(reason) = object.validate(&self.settings.validation) {
            log::warn!("Rejected object {}: {}", id, reason);
            return Err(EngineError::InvalidObject { id, reason });
        }

        log::debug!("Added object {}", id);
        self.objects.push(object);
        Ok(())
    }

    /// Remove an object by id. Absent ids are ignored.
    pub fn remove(&mut self, id: ObjectId) -> Option<GameObject> {
        let index = self.objects.iter().position(|obj| obj.id() == id)?;
        log::debug!("Removed object {}", id);
        Some(self.objects.remove(index))
    }

    pub fn clear(&mut self) {
        log::debug!("Cleared {} objects", self.objects.len());
        self.objects.clear();
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.objects.iter().any(|obj| obj.id() == id)
    }

    /// All objects in insertion order
    pub fn objects(&self) -> &[GameObject] {
        &self.objects
    }

    pub fn get(&self, id: ObjectId) -> Option<&GameObject> {
        self.objects.iter().find(|obj| obj.id() == id)
    }

    // === Listeners ===

    pub fn add_listener(&mut self, listener: impl CollisionListener + 'static) {
        self.listeners.add(listener);
    }

    pub fn remove_all_listeners(&mut self) {
        self.listeners.clear();
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    // === Loop control ===

    /// Start or resume the loop. Starting a running loop does nothing.
    pub fn start(&mut self) {
        if self.clock.start() {
            self.source.restart();
        } else {
            log::debug!("start() ignored, loop already running");
        }
    }

    /// Freeze the clock. Object anchors are untouched.
    pub fn pause(&mut self) {
        if !self.clock.pause() {
            log::debug!("pause() ignored, loop not running");
        }
    }

    /// Halt, reset the clock, and discard every object and listener
    pub fn stop(&mut self) {
        self.clock.stop();
        self.clear();
        self.remove_all_listeners();
    }

    pub fn loop_state(&self) -> LoopState {
        self.clock.state()
    }

    pub fn is_running(&self) -> bool {
        self.clock.is_running()
    }

    /// Current clock reading (seconds)
    pub fn now(&self) -> f32 {
        self.clock.now()
    }

    pub fn loop_index(&self) -> u32 {
        self.clock.loop_index()
    }

    /// Take one sample from the clock source and advance by it
    pub fn pump(&mut self) -> Vec<Collision> {
        if !self.clock.is_running() {
            return Vec::new();
        }
        let dt = self.source.sample();
        self.advance(dt)
    }

    /// Advance by a host-measured `dt`, running one collision scan per tick.
    ///
    /// Listeners are notified as each tick's collisions are resolved. Returns
    /// every collision, in order. Does nothing unless running.
    pub fn advance(&mut self, dt: f32) -> Vec<Collision> {
        let Self {
            settings,
            objects,
            listeners,
            clock,
            ..
        } = self;
        let backoff = settings.boundary_backoff_secs;

        let mut collisions = Vec::new();
        clock.advance(dt, |now| {
            for collision in scan(objects.as_mut_slice(), now, backoff) {
                listeners.notify(collision.first, collision.second);
                collisions.push(collision);
            }
        });
        collisions
    }

    // === Queries ===

    /// Current position of a body, or the midpoint of a boundary
    pub fn position(&self, id: ObjectId) -> Option<Vec2> {
        match self.get(id)? {
            GameObject::Round(body) => Some(kinematics::position_at(body, self.now())),
            GameObject::Boundary(boundary) => Some((boundary.start + boundary.end) * 0.5),
        }
    }

    /// Current velocity (boundaries never move)
    pub fn velocity(&self, id: ObjectId) -> Option<Vec2> {
        match self.get(id)? {
            GameObject::Round(body) => Some(kinematics::velocity_at(body, self.now())),
            GameObject::Boundary(_) => Some(Vec2::ZERO),
        }
    }

    /// Current rotation in degrees (boundaries report 0)
    pub fn rotation(&self, id: ObjectId) -> Option<f32> {
        match self.get(id)? {
            GameObject::Round(body) => Some(kinematics::rotation_at(body, self.now())),
            GameObject::Boundary(_) => Some(0.0),
        }
    }

    /// Every object as it stands at the current clock reading, insertion order
    pub fn snapshot(&self) -> Vec<ObjectSnapshot> {
        let now = self.now();
        self.objects
            .iter()
            .map(|obj| match obj {
                GameObject::Round(body) => {
                    let state = kinematics::state_at(body, now);
                    ObjectSnapshot::Round {
                        id: body.id,
                        position: state.position,
                        velocity: state.velocity,
                        rotation: state.rotation,
                        radius: body.radius,
                    }
                }
                GameObject::Boundary(boundary) => ObjectSnapshot::Boundary {
                    id: boundary.id,
                    start: boundary.start,
                    end: boundary.end,
                },
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::InvalidObject;
    use crate::sim::{Boundary, CollisionKind, FixedStep, RoundBody};
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    fn engine(dt: f32) -> Engine<FixedStep> {
        Engine::with_clock_source(EngineSettings::default(), FixedStep::new(dt)).unwrap()
    }

    fn head_on_pair(engine: &mut Engine<FixedStep>) {
        engine
            .add(
                RoundBody::new(1, Vec2::new(0.0, 0.0), 1.0, 1.0)
                    .with_velocity(Vec2::new(5.0, 0.0)),
            )
            .unwrap();
        engine
            .add(
                RoundBody::new(2, Vec2::new(3.0, 0.0), 1.0, 1.0)
                    .with_velocity(Vec2::new(-5.0, 0.0)),
            )
            .unwrap();
    }

    fn run(engine: &mut Engine<FixedStep>, ticks: usize) -> Vec<Collision> {
        (0..ticks).flat_map(|_| engine.pump()).collect()
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let mut engine = engine(0.01);
        engine.add(RoundBody::new(1, Vec2::ZERO, 1.0, 1.0)).unwrap();
        let err = engine
            .add(Boundary::new(1, Vec2::ZERO, Vec2::X))
            .unwrap_err();
        assert_eq!(err, EngineError::DuplicateId(ObjectId(1)));
        assert_eq!(engine.objects().len(), 1);
    }

    #[test]
    fn test_invalid_object_not_inserted() {
        let mut engine = engine(0.01);
        let err = engine
            .add(RoundBody::new(1, Vec2::ZERO, 1.0, 0.0))
            .unwrap_err();
        assert_eq!(
            err,
            EngineError::InvalidObject {
                id: ObjectId(1),
                reason: InvalidObject::NonPositiveMass(0.0),
            }
        );
        assert!(engine.objects().is_empty());
    }

    #[test]
    fn test_custom_policy_applies() {
        let mut settings = EngineSettings::default();
        settings.validation.max_velocity = 1000.0;
        let mut engine = Engine::with_clock_source(settings, FixedStep::new(0.01)).unwrap();
        engine
            .add(RoundBody::new(1, Vec2::ZERO, 1.0, 1.0).with_velocity(Vec2::new(800.0, 0.0)))
            .unwrap();
    }

    #[test]
    fn test_remove_and_clear() {
        let mut engine = engine(0.01);
        head_on_pair(&mut engine);
        assert!(engine.remove(ObjectId(99)).is_none());
        assert_eq!(engine.objects().len(), 2);

        let removed = engine.remove(ObjectId(1)).unwrap();
        assert_eq!(removed.id(), ObjectId(1));
        assert_eq!(engine.objects()[0].id(), ObjectId(2));

        engine.clear();
        assert!(engine.objects().is_empty());
    }

    #[test]
    fn test_insertion_order_kept() {
        let mut engine = engine(0.01);
        for id in [5, 3, 9] {
            engine.add(RoundBody::new(id, Vec2::new(id as f32 * 10.0, 0.0), 1.0, 1.0)).unwrap();
        }
        let ids: Vec<u32> = engine.objects().iter().map(|o| o.id().0).collect();
        assert_eq!(ids, vec![5, 3, 9]);
    }

    #[test]
    fn test_no_motion_until_started() {
        let mut engine = engine(0.01);
        head_on_pair(&mut engine);
        assert!(run(&mut engine, 50).is_empty());
        assert_eq!(engine.now(), 0.0);
        assert_eq!(engine.position(ObjectId(1)), Some(Vec2::ZERO));
    }

    #[test]
    fn test_head_on_collision_swaps_velocities() {
        let mut engine = engine(0.01);
        head_on_pair(&mut engine);

        let seen = Rc::new(RefCell::new(Vec::new()));
        let log = Rc::clone(&seen);
        engine.add_listener(move |a: ObjectId, b: ObjectId| log.borrow_mut().push((a, b)));

        engine.start();
        let collisions = run(&mut engine, 30);

        assert_eq!(collisions.len(), 1);
        assert_eq!(collisions[0].kind, CollisionKind::BodyBody);
        assert_eq!(*seen.borrow(), vec![(ObjectId(1), ObjectId(2))]);

        let v1 = engine.velocity(ObjectId(1)).unwrap();
        let v2 = engine.velocity(ObjectId(2)).unwrap();
        assert!((v1 - Vec2::new(-5.0, 0.0)).length() < 1e-4);
        assert!((v2 - Vec2::new(5.0, 0.0)).length() < 1e-4);

        // Bodies separate afterwards
        let p1 = engine.position(ObjectId(1)).unwrap();
        let p2 = engine.position(ObjectId(2)).unwrap();
        assert!(p1.distance(p2) > 2.0);
    }

    #[test]
    fn test_boundary_bounce_through_engine() {
        let mut engine = engine(0.01);
        engine
            .add(
                Boundary::new(10, Vec2::new(100.0, 0.0), Vec2::new(-100.0, 0.0))
                    .with_restitution(0.5),
            )
            .unwrap();
        engine
            .add(
                RoundBody::new(1, Vec2::new(0.0, 20.0), 10.0, 1.0)
                    .with_velocity(Vec2::new(0.0, -100.0)),
            )
            .unwrap();

        engine.start();
        let collisions = run(&mut engine, 20);
        assert_eq!(collisions.len(), 1);
        assert_eq!(collisions[0].first, ObjectId(1));
        assert_eq!(collisions[0].second, ObjectId(10));
        let v = engine.velocity(ObjectId(1)).unwrap();
        assert!((v - Vec2::new(0.0, 50.0)).length() < 1e-3);
    }

    #[test]
    fn test_pause_freezes_positions() {
        let mut engine = engine(0.05);
        engine
            .add(RoundBody::new(1, Vec2::ZERO, 1.0, 1.0).with_velocity(Vec2::new(10.0, 0.0)))
            .unwrap();
        engine.start();
        run(&mut engine, 4);
        engine.pause();
        let frozen = engine.position(ObjectId(1)).unwrap();
        assert!((frozen.x - 2.0).abs() < 1e-4);

        run(&mut engine, 10);
        assert_eq!(engine.position(ObjectId(1)).unwrap(), frozen);
        assert_eq!(engine.loop_state(), LoopState::Paused);

        engine.start();
        run(&mut engine, 2);
        assert!((engine.position(ObjectId(1)).unwrap().x - 3.0).abs() < 1e-4);
    }

    #[test]
    fn test_double_start_does_not_double_advance() {
        let mut engine = engine(0.1);
        engine.start();
        engine.start();
        run(&mut engine, 3);
        assert!((engine.now() - 0.3).abs() < 1e-5);
    }

    #[test]
    fn test_stop_clears_everything() {
        let mut engine = engine(0.01);
        head_on_pair(&mut engine);
        engine.add_listener(|_: ObjectId, _: ObjectId| {});
        engine.start();
        run(&mut engine, 10);

        engine.stop();
        assert_eq!(engine.loop_state(), LoopState::Stopped);
        assert_eq!(engine.now(), 0.0);
        assert_eq!(engine.loop_index(), 1);
        assert!(engine.objects().is_empty());
        assert_eq!(engine.listener_count(), 0);

        // Same ids can come back
        head_on_pair(&mut engine);
        assert_eq!(engine.objects().len(), 2);
    }

    #[test]
    fn test_determinism() {
        let build = || {
            let mut engine = engine(1.0 / 120.0);
            for obj in crate::scene::demo() {
                engine.add(obj).unwrap();
            }
            engine.start();
            engine
        };
        let mut a = build();
        let mut b = build();

        let ca = run(&mut a, 600);
        let cb = run(&mut b, 600);
        assert_eq!(ca, cb);
        assert_eq!(a.snapshot(), b.snapshot());
    }

    #[test]
    fn test_segment_rollover_keeps_motion_continuous() {
        let settings = EngineSettings {
            loop_segment_secs: 0.5,
            ..Default::default()
        };
        let mut engine = Engine::with_clock_source(settings, FixedStep::new(0.2)).unwrap();
        engine
            .add(RoundBody::new(1, Vec2::ZERO, 1.0, 1.0).with_velocity(Vec2::new(1.0, 0.0)))
            .unwrap();
        engine.start();
        run(&mut engine, 6);
        assert_eq!(engine.loop_index(), 3);
        assert!((engine.position(ObjectId(1)).unwrap().x - 1.2).abs() < 1e-4);
    }

    #[test]
    fn test_snapshot_serializes() {
        let mut engine = engine(0.01);
        head_on_pair(&mut engine);
        engine
            .add(Boundary::new(3, Vec2::new(-5.0, -2.0), Vec2::new(5.0, -2.0)))
            .unwrap();
        let snapshot = engine.snapshot();
        assert_eq!(snapshot.len(), 3);
        assert_eq!(snapshot[2].id(), ObjectId(3));

        let json = serde_json::to_string(&snapshot).unwrap();
        let back: Vec<ObjectSnapshot> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, snapshot);
    }

    /// Host-controlled wall time, measured the way `WallClock` measures it
    #[derive(Debug)]
    struct ManualClock {
        wall: Rc<Cell<f32>>,
        last: Option<f32>,
        restarts: Rc<Cell<u32>>,
    }

    impl ClockSource for ManualClock {
        fn restart(&mut self) {
            self.restarts.set(self.restarts.get() + 1);
            self.last = Some(self.wall.get());
        }

        fn sample(&mut self) -> f32 {
            let now = self.wall.get();
            let elapsed = self.last.map(|last| now - last).unwrap_or(0.0);
            self.last = Some(now);
            elapsed
        }
    }

    #[test]
    fn test_paused_wall_time_not_counted() {
        let wall = Rc::new(Cell::new(0.0));
        let restarts = Rc::new(Cell::new(0));
        let source = ManualClock {
            wall: Rc::clone(&wall),
            last: None,
            restarts: Rc::clone(&restarts),
        };
        let mut engine = Engine::with_clock_source(EngineSettings::default(), source).unwrap();
        engine
            .add(RoundBody::new(1, Vec2::ZERO, 1.0, 1.0).with_velocity(Vec2::new(1.0, 0.0)))
            .unwrap();

        engine.start();
        assert_eq!(restarts.get(), 1);
        wall.set(0.5);
        engine.pump();
        assert!((engine.now() - 0.5).abs() < 1e-5);

        engine.pause();
        wall.set(100.5);
        engine.pump();
        assert!((engine.now() - 0.5).abs() < 1e-5);

        engine.start();
        engine.start();
        assert_eq!(restarts.get(), 2);
        wall.set(100.75);
        engine.pump();
        assert!((engine.now() - 0.75).abs() < 1e-4);
        assert_eq!(engine.loop_index(), 1);
        assert!((engine.position(ObjectId(1)).unwrap().x - 0.75).abs() < 1e-4);
    }

    #[test]
    fn test_invalid_settings_rejected() {
        let zero_segment = EngineSettings {
            loop_segment_secs: 0.0,
            ..Default::default()
        };
        let err = Engine::with_clock_source(zero_segment, FixedStep::new(0.01)).unwrap_err();
        assert!(matches!(err, SettingsError::Invalid(_)));

        let negative_backoff = EngineSettings {
            boundary_backoff_secs: -0.5,
            ..Default::default()
        };
        assert!(Engine::new(negative_backoff).is_err());
        assert!(Engine::new(EngineSettings::default()).is_ok());
    }

    #[test]
    fn test_queries_for_missing_id() {
        let engine = engine(0.01);
        assert!(engine.position(ObjectId(1)).is_none());
        assert!(engine.velocity(ObjectId(1)).is_none());
        assert!(engine.rotation(ObjectId(1)).is_none());
    }
}
