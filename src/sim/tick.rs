//! Fixed timestep frame driver
//!
//! [`World`] ties the entity manager and the game state together and is the
//! single entry point for the input and render collaborators.

use super::entity::Entity;
use super::manager::EntityManager;
use super::state::{GameObserver, GameState};
use super::transform::Bounds;
use super::view::EntityView;
use crate::highscores::ScoreStore;
use crate::tuning::Tuning;

/// Held-key input for a single frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub rotate_left: bool,
    pub rotate_right: bool,
    pub boost: bool,
    pub shoot: bool,
    /// Pause request
    pub pause: bool,
}

/// Edge-triggered key presses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter,
    Space,
    Escape,
    P,
    Other,
}

pub struct World {
    state: GameState,
    entities: EntityManager,
    tuning: Tuning,
    bounds: Bounds,
    frame: u64,
    seed: u64,
    score_store: Option<Box<dyn ScoreStore>>,
    score_submitted: bool,
}

impl std::fmt::Debug for World {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("World")
            .field("state", &self.state)
            .field("entities", &self.entities.len())
            .field("frame", &self.frame)
            .field("seed", &self.seed)
            .finish()
    }
}

impl World {
    /// Start a session on a `width` x `height` torus
    pub fn new(width: f32, height: f32, tuning: Tuning, seed: u64) -> Self {
        let bounds = Bounds::new(width, height);
        log::info!("New session {}x{} (seed {})", width, height, seed);
        Self {
            state: GameState::new(&tuning),
            entities: EntityManager::new(bounds, &tuning, seed),
            tuning,
            bounds,
            frame: 0,
            seed,
            score_store: None,
            score_submitted: false,
        }
    }

    /// Hand final scores to `store` on game over
    pub fn with_score_store(mut self, store: Box<dyn ScoreStore>) -> Self {
        self.score_store = Some(store);
        self
    }

    pub fn subscribe(&mut self, observer: Box<dyn GameObserver>) {
        self.state.subscribe(observer);
    }

    /// Advance the simulation by one frame
    pub fn tick(&mut self, input: &TickInput) {
        if input.pause && !self.state.is_game_over() {
            self.state.set_paused(true);
        }

        // Don't tick if paused or game over
        if self.state.is_paused() || self.state.is_game_over() {
            return;
        }

        self.frame += 1;

        if input.rotate_left {
            self.add_rotation(-self.tuning.ship.rotation_speed);
        }
        if input.rotate_right {
            self.add_rotation(self.tuning.ship.rotation_speed);
        }
        if input.boost {
            self.boost();
        }
        if input.shoot {
            self.shoot();
        }

        self.entities.update(self.frame, &mut self.state, &self.tuning);
        self.state.update();

        if self.state.is_game_over() {
            self.submit_score();
        }
    }

    fn submit_score(&mut self) {
        if self.score_submitted {
            return;
        }
        self.score_submitted = true;
        let (score, level) = (self.state.score(), self.state.level());
        if let Some(store) = self.score_store.as_mut() {
            match store.submit(score, level) {
                Some(rank) => log::info!("Score {} ranked #{}", score, rank),
                None => log::info!("Score {} did not make the leaderboard", score),
            }
        }
    }

    /// Discrete key handling: restart, resume, pause
    pub fn on_key_press(&mut self, key: Key) {
        if self.state.is_game_over() {
            if key == Key::Enter {
                self.restart();
            }
            return;
        }

        if self.state.is_paused() {
            if matches!(key, Key::Space | Key::Enter) {
                self.state.set_paused(false);
            }
        } else if key == Key::P {
            self.state.set_paused(true);
        }
    }

    /// New session on the same world; observers stay subscribed
    pub fn restart(&mut self) {
        self.seed = self.seed.wrapping_add(1);
        self.entities = EntityManager::new(self.bounds, &self.tuning, self.seed);
        self.state.reset();
        self.frame = 0;
        self.score_submitted = false;
        log::info!("Session restarted (seed {})", self.seed);
    }

    pub fn add_rotation(&mut self, delta: f32) {
        if let Err(e) = self.entities.add_rotation(delta) {
            log::error!("Rotation input dropped: {}", e);
        }
    }

    pub fn boost(&mut self) {
        if let Err(e) = self.entities.boost(&self.tuning) {
            log::error!("Boost input dropped: {}", e);
        }
    }

    pub fn shoot(&mut self) {
        if let Err(e) = self.entities.shoot(self.frame, &self.tuning) {
            log::error!("Shoot input dropped: {}", e);
        }
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn entity_manager(&self) -> &EntityManager {
        &self.entities
    }

    pub fn entity_manager_mut(&mut self) -> &mut EntityManager {
        &mut self.entities
    }

    pub fn score_store(&self) -> Option<&dyn ScoreStore> {
        self.score_store.as_deref()
    }

    pub fn score(&self) -> u64 {
        self.state.score()
    }

    pub fn lives(&self) -> u32 {
        self.state.lives()
    }

    pub fn max_lives(&self) -> u32 {
        self.state.max_lives()
    }

    pub fn level(&self) -> u32 {
        self.state.level()
    }

    pub fn is_paused(&self) -> bool {
        self.state.is_paused()
    }

    pub fn is_game_over(&self) -> bool {
        self.state.is_game_over()
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Current ship speed (0 while dead)
    pub fn ship_speed(&self) -> f32 {
        if !self.entities.is_ship_alive() {
            return 0.0;
        }
        self.entities
            .ship()
            .and_then(Entity::transform)
            .map(|t| t.speed())
            .unwrap_or(0.0)
    }

    /// Draw list, back to front
    pub fn views(&self) -> impl Iterator<Item = EntityView<'_>> {
        let frame = self.frame;
        self.entities.entities().iter().map(move |e| EntityView::of(e, frame))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highscores::HighScores;
    use crate::sim::collision::Collider;
    use crate::sim::entities::{Asteroid, Bullet};
    use crate::sim::entity::{Body, EntityKind};
    use crate::sim::state::{EventRecorder, GameEvent};
    use glam::Vec2;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn world() -> World {
        World::new(1280.0, 720.0, Tuning::default(), 42)
    }

    /// Park a resting asteroid on top of the ship
    fn drop_rock_on_ship(world: &mut World) {
        let pos = world.entity_manager().ship().unwrap().transform().unwrap().pos;
        let mut rng = Pcg32::seed_from_u64(0);
        let rock = Asteroid::spawn(pos, 30.0, Some(Vec2::ZERO), world.tuning(), &mut rng);
        world.entity_manager_mut().add(rock);
    }

    fn make_vulnerable(world: &mut World) {
        if let Some(ship) = world.entity_manager_mut().ship_mut().unwrap().as_ship_mut() {
            ship.invincible_frames = 0;
        }
    }

    /// Lose one life and wait for the respawn and its invincibility to pass
    fn lose_life(world: &mut World) {
        make_vulnerable(world);
        drop_rock_on_ship(world);
        let lives = world.lives();
        world.tick(&TickInput::default());
        assert_eq!(world.lives(), lives - 1);
        if !world.is_game_over() {
            for _ in 0..world.tuning().session.respawn_frames {
                world.tick(&TickInput::default());
            }
        }
    }

    #[test]
    fn test_new_world_hud() {
        let world = world();
        assert_eq!(world.score(), 0);
        assert_eq!(world.lives(), world.max_lives());
        assert_eq!(world.level(), 1);
        assert_eq!(world.ship_speed(), 0.0);
        assert_eq!(world.entity_count(), 1 + world.tuning().asteroid.initial_count);
        assert_eq!(world.views().count(), world.entity_count());
    }

    #[test]
    fn test_pause_and_resume() {
        let mut world = world();
        world.tick(&TickInput::default());
        assert_eq!(world.frame(), 1);

        world.on_key_press(Key::P);
        assert!(world.is_paused());
        world.tick(&TickInput::default());
        assert_eq!(world.frame(), 1);

        // Escape does not resume
        world.on_key_press(Key::Escape);
        assert!(world.is_paused());
        world.on_key_press(Key::Space);
        assert!(!world.is_paused());

        world.tick(&TickInput {
            pause: true,
            ..Default::default()
        });
        assert!(world.is_paused());
        assert_eq!(world.frame(), 1);
        world.on_key_press(Key::Enter);
        assert!(!world.is_paused());
    }

    #[test]
    fn test_inputs_move_ship() {
        let mut world = world();
        let boost = TickInput {
            boost: true,
            rotate_right: true,
            ..Default::default()
        };
        for _ in 0..10 {
            world.tick(&boost);
        }
        assert!(world.ship_speed() > 0.0);
        assert!(world.entity_manager().count(EntityKind::Flame) > 0);

        world.tick(&TickInput {
            shoot: true,
            ..Default::default()
        });
        assert_eq!(world.entity_manager().count(EntityKind::Bullet), 1);
    }

    #[test]
    fn test_game_over_submits_once_and_restarts() {
        let recorder = EventRecorder::new();
        let mut world = world().with_score_store(Box::new(HighScores::new()));
        world.subscribe(Box::new(recorder.clone()));
        world.state.add_score(120);

        while !world.is_game_over() {
            lose_life(&mut world);
        }
        assert_eq!(world.lives(), 0);
        let top = world.score_store().unwrap().top();
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].score, 120);

        // Frozen until restarted
        let frame = world.frame();
        world.tick(&TickInput::default());
        world.on_key_press(Key::Space);
        assert_eq!(world.frame(), frame);
        assert!(world.is_game_over());

        world.on_key_press(Key::Enter);
        assert!(!world.is_game_over());
        assert_eq!(world.score(), 0);
        assert_eq!(world.lives(), world.max_lives());
        assert_eq!(world.frame(), 0);

        let game_overs = recorder
            .events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::GameOver { .. }))
            .count();
        assert_eq!(game_overs, 1);
        assert_eq!(world.score_store().unwrap().top().len(), 1);
    }

    #[test]
    fn test_faulty_entity_does_not_stall_collisions() {
        let mut tuning = Tuning::default();
        tuning.asteroid.initial_count = 0;
        let mut world = World::new(1280.0, 720.0, tuning, 42);

        // Collider without a transform; the ship meets it before the shot meets the rock
        let broken = Entity::new(Body::Bullet(Bullet::new(60)), 5).with(Collider);
        let broken = world.entity_manager_mut().add(broken);

        let mut rng = Pcg32::seed_from_u64(3);
        let pos = Vec2::new(300.0, 300.0);
        let rock = Asteroid::spawn(pos, 40.0, Some(Vec2::ZERO), world.tuning(), &mut rng);
        let shot = Bullet::spawn(pos, Vec2::ZERO, world.tuning());
        world.entity_manager_mut().add(rock);
        world.entity_manager_mut().add(shot);

        for _ in 0..5 {
            world.tick(&TickInput::default());
        }
        assert_eq!(world.frame(), 5);
        assert!(world.entity_manager().get(broken).is_none());
        assert_eq!(world.score(), 30);
        assert_eq!(world.entity_manager().count(EntityKind::Bullet), 0);
        assert_eq!(world.entity_manager().count(EntityKind::Asteroid), 2);
        assert_eq!(world.entity_manager().count(EntityKind::PointIndicator), 1);
    }

    #[test]
    fn test_same_seed_same_field() {
        let a = world();
        let b = world();
        let pa: Vec<Vec2> = a.views().map(|v| v.pos).collect();
        let pb: Vec<Vec2> = b.views().map(|v| v.pos).collect();
        assert_eq!(pa, pb);
    }
}
