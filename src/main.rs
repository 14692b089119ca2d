//! Astro Storm headless driver
//!
//! Runs one seeded session with a scripted pilot and records the final
//! score on the local leaderboard.
//!
//! Usage: `astro-storm [seed] [frames] [tuning.json]`

use astro_storm::Tuning;
use astro_storm::highscores::FileScoreStore;
use astro_storm::sim::{EntityKind, TickInput, World};

const WIDTH: f32 = 1280.0;
const HEIGHT: f32 = 720.0;
/// Ten minutes at 60 fps
const DEFAULT_FRAMES: u64 = 60 * 60 * 10;

/// Aim at the nearest asteroid, fire when roughly lined up, nudge forward
/// now and then
fn pilot(world: &World) -> TickInput {
    let mut input = TickInput {
        boost: world.frame() % 90 < 10,
        ..Default::default()
    };

    let views: Vec<_> = world.views().collect();
    let Some(ship) = views.iter().find(|v| v.kind == EntityKind::Ship) else {
        return input;
    };
    let Some(target) = views
        .iter()
        .filter(|v| v.kind == EntityKind::Asteroid)
        .min_by(|a, b| a.pos.distance(ship.pos).total_cmp(&b.pos.distance(ship.pos)))
    else {
        return input;
    };

    let wanted = astro_storm::heading(target.pos - ship.pos);
    let diff = (wanted - ship.heading + std::f32::consts::PI).rem_euclid(std::f32::consts::TAU)
        - std::f32::consts::PI;
    input.rotate_left = diff < -0.05;
    input.rotate_right = diff > 0.05;
    input.shoot = diff.abs() < 0.2;
    input
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(1);
    let frames = args
        .next()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_FRAMES);
    let tuning = match args.next() {
        Some(path) => Tuning::load(&path).unwrap_or_else(|e| {
            log::warn!("Ignoring tuning file {}: {}", path, e);
            Tuning::default()
        }),
        None => Tuning::default(),
    };

    log::info!("Astro Storm (headless) starting, seed {}", seed);
    let mut world = World::new(WIDTH, HEIGHT, tuning, seed);
    if let Some(store) = FileScoreStore::open_default() {
        world = world.with_score_store(Box::new(store));
    }

    for _ in 0..frames {
        if world.is_game_over() {
            break;
        }
        let input = pilot(&world);
        world.tick(&input);
    }

    log::info!(
        "Finished at frame {}: score {}, level {}, lives {}/{}",
        world.frame(),
        world.score(),
        world.level(),
        world.lives(),
        world.max_lives()
    );
    if let Some(store) = world.score_store() {
        for (rank, entry) in store.top().iter().enumerate() {
            log::info!("#{:>2} {:>8} (level {})", rank + 1, entry.score, entry.level);
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Headless driver is native only
}
