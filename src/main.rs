//! Rebound headless runner
//!
//! Runs a scene at a fixed 120 Hz sample rate, logs collisions and prints the
//! final state as JSON.
//!
//! Usage: `rebound [SECONDS] [SEED] [SETTINGS.json]`
//! Without a seed the built-in demo scene is used; with one, a random scene.

use std::cell::Cell;
use std::rc::Rc;

use glam::Vec2;
use rebound::consts::FIXED_STEP_HZ;
use rebound::sim::{FixedStep, ObjectId};
use rebound::{Engine, EngineSettings, scene};

const DEFAULT_SECONDS: f32 = 10.0;

fn main() {
    #[cfg(not(target_arch = "wasm32"))]
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let seconds: f32 = args
        .next()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_SECONDS);
    let seed: Option<u64> = args.next().and_then(|s| s.parse().ok());
    let settings = args
        .next()
        .map(EngineSettings::load)
        .unwrap_or_default();

    let mut engine = match Engine::with_clock_source(settings, FixedStep::hz(FIXED_STEP_HZ)) {
        Ok(engine) => engine,
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(1);
        }
    };

    let objects = match seed {
        Some(seed) => {
            log::info!("Random scene, seed {}", seed);
            let (min, max) = (Vec2::new(50.0, 50.0), Vec2::new(650.0, 900.0));
            let mut objects = scene::scatter(seed, 24, 1, min, max, &settings.validation);
            objects.extend(scene::walled_box(1000, min, max, 1.0));
            objects
        }
        None => {
            log::info!("Demo scene");
            scene::demo()
        }
    };
    for object in objects {
        if let Err(e) = engine.add(object) {
            log::error!("{}", e);
        }
    }

    let hits = Rc::new(Cell::new(0u32));
    let counter = Rc::clone(&hits);
    engine.add_listener(move |a: ObjectId, b: ObjectId| {
        counter.set(counter.get() + 1);
        log::debug!("collision {} <-> {}", a, b);
    });

    engine.start();
    let ticks = (seconds * FIXED_STEP_HZ).ceil() as u32;
    for _ in 0..ticks {
        for collision in engine.pump() {
            log::info!(
                "t={:.3} {:?} {} <-> {}",
                collision.time,
                collision.kind,
                collision.first,
                collision.second
            );
        }
    }
    engine.pause();

    log::info!(
        "Ran {} ticks to t={:.3} (segment {}), {} collisions",
        ticks,
        engine.now(),
        engine.loop_index(),
        hits.get()
    );

    match serde_json::to_string_pretty(&engine.snapshot()) {
        Ok(json) => println!("{json}"),
        Err(e) => log::error!("Failed to serialize snapshot: {}", e),
    }
}
