//! Entity lifecycle: owns the live set and runs the per-frame pass
//!
//! One call to [`EntityManager::update`]:
//! 1. updates every entity and culls those that ask to be removed
//! 2. runs the asteroid spawner
//! 3. runs the rocket spawner (level-gated)
//! 4. scans all collidable pairs and dispatches the outcomes
//!
//! The live set is kept sorted by z-order so that renderers can draw it
//! front to back in one pass.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::collision::intersects;
use super::dispatch::{self, CollisionCtx};
use super::entities::{Asteroid, Rocket, Ship};
use super::entity::{Entity, EntityId, EntityKind, FrameContext};
use super::spawn::spawn_position;
use super::state::GameState;
use super::transform::Bounds;
use crate::error::SimError;
use crate::tuning::Tuning;

#[derive(Debug)]
pub struct EntityManager {
    /// Live entities, sorted by z-order
    entities: Vec<Entity>,
    ship_id: EntityId,
    next_id: u64,
    last_rocket_frame: u64,
    bounds: Bounds,
    rng: Pcg32,
}

impl EntityManager {
    /// New field: the ship at the center plus the opening asteroids
    pub fn new(bounds: Bounds, tuning: &Tuning, seed: u64) -> Self {
        let mut manager = Self {
            entities: Vec::new(),
            ship_id: EntityId::default(),
            next_id: 1,
            last_rocket_frame: 0,
            bounds,
            rng: Pcg32::seed_from_u64(seed),
        };

        manager.ship_id = manager.add(Ship::spawn(&bounds, tuning));
        for _ in 0..tuning.asteroid.initial_count {
            manager.spawn_asteroid(tuning);
        }
        log::debug!(
            "Field ready with {} entities (seed {})",
            manager.entities.len(),
            seed
        );
        manager
    }

    /// Insert keeping z-order; ties go after existing entities
    pub fn add(&mut self, mut entity: Entity) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        entity.assign_id(id);

        let z = entity.z_order();
        let index = self.entities.partition_point(|e| e.z_order() <= z);
        self.entities.insert(index, entity);
        id
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id() == id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|e| e.id() == id)
    }

    pub fn count(&self, kind: EntityKind) -> usize {
        self.entities.iter().filter(|e| e.kind() == kind).count()
    }

    pub fn ship_id(&self) -> EntityId {
        self.ship_id
    }

    pub fn ship(&self) -> Result<&Entity, SimError> {
        self.get(self.ship_id).ok_or(SimError::EntityNotFound(self.ship_id))
    }

    pub fn ship_mut(&mut self) -> Result<&mut Entity, SimError> {
        let id = self.ship_id;
        self.get_mut(id).ok_or(SimError::EntityNotFound(id))
    }

    /// Position of the ship while it is alive
    pub fn live_ship_position(&self) -> Option<Vec2> {
        let ship = self.ship().ok()?;
        if !ship.as_ship()?.is_alive() {
            return None;
        }
        ship.transform().ok().map(|t| t.pos)
    }

    pub fn is_ship_alive(&self) -> bool {
        self.live_ship_position().is_some()
    }

    pub fn add_rotation(&mut self, delta: f32) -> Result<(), SimError> {
        Ship::add_rotation(self.ship_mut()?, delta)
    }

    pub fn boost(&mut self, tuning: &Tuning) -> Result<(), SimError> {
        let id = self.ship_id;
        let ship = self
            .entities
            .iter_mut()
            .find(|e| e.id() == id)
            .ok_or(SimError::EntityNotFound(id))?;
        let flames = Ship::boost(ship, tuning, &mut self.rng)?;
        for flame in flames {
            self.add(flame);
        }
        Ok(())
    }

    pub fn shoot(&mut self, frame: u64, tuning: &Tuning) -> Result<(), SimError> {
        if let Some(bullet) = Ship::shoot(self.ship_mut()?, frame, tuning)? {
            self.add(bullet);
        }
        Ok(())
    }

    /// Advance the field one frame
    ///
    /// An entity whose update or collision setup fails is logged and dropped;
    /// the rest of the frame still runs.
    pub fn update(&mut self, frame: u64, state: &mut GameState, tuning: &Tuning) {
        self.update_entities(frame, tuning);
        self.spawn_asteroids(frame, tuning);
        self.spawn_rockets(frame, state.level(), tuning);
        self.check_collisions(frame, state, tuning);
    }

    fn update_entities(&mut self, frame: u64, tuning: &Tuning) {
        let target = self.live_ship_position();
        let mut ctx = FrameContext {
            frame,
            bounds: self.bounds,
            tuning,
            rng: &mut self.rng,
            target,
            spawned: Vec::new(),
        };

        for entity in &mut self.entities {
            if let Err(e) = entity.update(&mut ctx) {
                log::error!("Frame {}: dropping entity {}: {}", frame, entity.id(), e);
                entity.mark_removed();
            }
        }
        let spawned = ctx.spawned;

        self.entities.retain(|e| !e.should_remove());
        for entity in spawned {
            self.add(entity);
        }
    }

    fn spawn_asteroid(&mut self, tuning: &Tuning) -> EntityId {
        let ship = self.live_ship_position();
        let pos = spawn_position(&self.bounds, ship, &tuning.spawn, &mut self.rng);
        let (lo, hi) = (tuning.asteroid.min_radius, tuning.asteroid.max_radius);
        let radius = if hi > lo { self.rng.random_range(lo..hi) } else { lo };
        let asteroid = Asteroid::spawn(pos, radius, None, tuning, &mut self.rng);
        self.add(asteroid)
    }

    fn spawn_asteroids(&mut self, frame: u64, tuning: &Tuning) {
        let t = &tuning.asteroid;
        if t.spawn_interval == 0 || frame % t.spawn_interval != 0 {
            return;
        }
        if self.count(EntityKind::Asteroid) < t.max_count {
            let id = self.spawn_asteroid(tuning);
            log::debug!("Spawned asteroid {} at frame {}", id, frame);
        }
    }

    fn spawn_rockets(&mut self, frame: u64, level: u32, tuning: &Tuning) {
        let t = &tuning.rocket;
        if level < t.min_level || !self.is_ship_alive() {
            return;
        }
        if self.count(EntityKind::Rocket) >= t.max_count {
            return;
        }
        if frame.saturating_sub(self.last_rocket_frame) <= tuning.rocket_interval(level) {
            return;
        }

        let ship = self.live_ship_position();
        let pos = spawn_position(&self.bounds, ship, &tuning.spawn, &mut self.rng);
        let id = self.add(Rocket::spawn(pos, tuning));
        self.last_rocket_frame = frame;
        log::debug!("Spawned rocket {} at frame {} (level {})", id, frame, level);
    }

    /// Pairwise scan over collidable entities
    ///
    /// Entities removed by an earlier pair are skipped for the rest of the
    /// scan. Anything the outcomes create joins the live set afterwards.
    fn check_collisions(&mut self, frame: u64, state: &mut GameState, tuning: &Tuning) {
        let mut candidates = Vec::new();
        for (i, entity) in self.entities.iter_mut().enumerate() {
            if !entity.can_collide() {
                continue;
            }
            // Colliders need a transform to be tested at all
            match entity.transform().map(|_| ()) {
                Ok(()) => candidates.push(i),
                Err(e) => {
                    log::error!("Frame {}: dropping entity {}: {}", frame, entity.id(), e);
                    entity.mark_removed();
                }
            }
        }

        let mut spawned = Vec::new();
        let mut ctx = CollisionCtx {
            entities: &mut self.entities,
            state,
            tuning,
            rng: &mut self.rng,
            frame,
            spawned: &mut spawned,
        };

        for (n, &i) in candidates.iter().enumerate() {
            for &j in &candidates[n + 1..] {
                if !ctx.entities[i].can_collide() || !ctx.entities[j].can_collide() {
                    continue;
                }
                let overlap = match (ctx.entities[i].transform(), ctx.entities[j].transform()) {
                    (Ok(a), Ok(b)) => intersects(a, b),
                    _ => false,
                };
                if !overlap {
                    continue;
                }
                if let Err(e) = dispatch::dispatch(&mut ctx, i, j) {
                    let (a, b) = (ctx.entities[i].id(), ctx.entities[j].id());
                    log::error!("Frame {}: collision {} <-> {} skipped: {}", frame, a, b, e);
                }
            }
        }

        self.entities.retain(|e| !e.is_removed());
        for entity in spawned {
            self.add(entity);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entities::Bullet;

    fn bounds() -> Bounds {
        Bounds::new(1280.0, 720.0)
    }

    /// Manager with only the ship, parked in a corner and made vulnerable
    fn bare_manager(tuning: &Tuning) -> EntityManager {
        let mut t = tuning.clone();
        t.asteroid.initial_count = 0;
        let mut manager = EntityManager::new(bounds(), &t, 7);
        let ship = manager.ship_mut().unwrap();
        ship.transform_mut().unwrap().set_position(Vec2::new(1200.0, 650.0));
        ship.as_ship_mut().unwrap().invincible_frames = 0;
        manager
    }

    fn ids_of(manager: &EntityManager, kind: EntityKind) -> Vec<EntityId> {
        manager
            .entities()
            .iter()
            .filter(|e| e.kind() == kind)
            .map(Entity::id)
            .collect()
    }

    #[test]
    fn test_new_field() {
        let tuning = Tuning::default();
        let manager = EntityManager::new(bounds(), &tuning, 1);
        assert_eq!(manager.count(EntityKind::Ship), 1);
        assert_eq!(manager.count(EntityKind::Asteroid), tuning.asteroid.initial_count);

        let center = bounds().center();
        for entity in manager.entities() {
            if entity.kind() == EntityKind::Asteroid {
                let pos = entity.transform().unwrap().pos;
                assert!(pos.distance(center) >= tuning.spawn.min_distance - 1e-3);
            }
        }
    }

    #[test]
    fn test_live_set_sorted_by_z_order() {
        let tuning = Tuning::default();
        let mut manager = EntityManager::new(bounds(), &tuning, 3);
        manager.add(Rocket::spawn(Vec2::new(10.0, 10.0), &tuning));
        manager.add(Bullet::spawn(Vec2::new(20.0, 10.0), Vec2::ZERO, &tuning));
        let z: Vec<i32> = manager.entities().iter().map(Entity::z_order).collect();
        assert!(z.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_bullet_splits_resting_asteroid() {
        let tuning = Tuning::default();
        let mut manager = bare_manager(&tuning);
        let mut state = GameState::new(&tuning);

        let mut rng = Pcg32::seed_from_u64(4);
        let target = Vec2::new(400.0, 300.0);
        let rock = Asteroid::spawn(target, 40.0, Some(Vec2::ZERO), &tuning, &mut rng);
        manager.add(rock);
        manager.add(Bullet::spawn(Vec2::new(300.0, 300.0), Vec2::new(10.0, 0.0), &tuning));
        let original = ids_of(&manager, EntityKind::Asteroid)[0];

        let mut frame = 1;
        while manager.count(EntityKind::Bullet) > 0 && frame < 20 {
            manager.update(frame, &mut state, &tuning);
            frame += 1;
        }

        assert_eq!(manager.count(EntityKind::Bullet), 0);
        assert!(manager.get(original).is_none());
        let children: Vec<&Entity> = manager
            .entities()
            .iter()
            .filter(|e| e.kind() == EntityKind::Asteroid)
            .collect();
        assert_eq!(children.len(), 2);
        for child in children {
            assert_eq!(child.transform().unwrap().radius, 20.0);
        }
        assert_eq!(state.score(), 30);
        assert_eq!(manager.count(EntityKind::PointIndicator), 1);
        assert!(manager.count(EntityKind::ExplosionSpark) > 0);
    }

    #[test]
    fn test_ship_dies_and_respawns_invincible() {
        let tuning = Tuning::default();
        let mut manager = bare_manager(&tuning);
        let mut state = GameState::new(&tuning);

        let mut rng = Pcg32::seed_from_u64(4);
        let on_ship = Vec2::new(1200.0, 650.0);
        let rock = Asteroid::spawn(on_ship, 30.0, Some(Vec2::ZERO), &tuning, &mut rng);
        manager.add(rock);
        manager.update(1, &mut state, &tuning);

        assert!(!manager.is_ship_alive());
        assert_eq!(state.lives(), tuning.session.lives - 1);
        assert_eq!(manager.count(EntityKind::Asteroid), 0);

        // Input is ignored while dead
        manager.shoot(2, &tuning).unwrap();
        assert_eq!(manager.count(EntityKind::Bullet), 0);

        let revive_at = 1 + tuning.session.respawn_frames;
        for frame in 2..=revive_at {
            manager.update(frame, &mut state, &tuning);
        }
        assert!(manager.is_ship_alive());
        let ship = manager.ship().unwrap();
        assert_eq!(ship.transform().unwrap().pos, bounds().center());
        assert_eq!(ship.transform().unwrap().vel, Vec2::ZERO);
        assert!(ship.as_ship().unwrap().is_invincible());
    }

    #[test]
    fn test_dead_ship_is_not_hit_again() {
        let tuning = Tuning::default();
        let mut manager = bare_manager(&tuning);
        let mut state = GameState::new(&tuning);

        let mut rng = Pcg32::seed_from_u64(4);
        for _ in 0..2 {
            let on_ship = Vec2::new(1200.0, 650.0);
        let rock = Asteroid::spawn(on_ship, 30.0, Some(Vec2::ZERO), &tuning, &mut rng);
            manager.add(rock);
        }
        manager.update(1, &mut state, &tuning);
        assert_eq!(state.lives(), tuning.session.lives - 1);
    }

    #[test]
    fn test_asteroid_spawn_cadence_and_cap() {
        let mut tuning = Tuning::default();
        tuning.asteroid.max_count = 1;
        let mut manager = bare_manager(&tuning);
        let mut state = GameState::new(&tuning);

        let interval = tuning.asteroid.spawn_interval;
        for frame in 1..interval {
            manager.update(frame, &mut state, &tuning);
        }
        assert_eq!(manager.count(EntityKind::Asteroid), 0);

        manager.update(interval, &mut state, &tuning);
        assert_eq!(manager.count(EntityKind::Asteroid), 1);

        manager.update(interval * 2, &mut state, &tuning);
        assert!(manager.count(EntityKind::Asteroid) <= 1);
    }

    #[test]
    fn test_rockets_gated_by_level() {
        let tuning = Tuning::default();
        let mut manager = bare_manager(&tuning);
        if let Some(ship) = manager.ship_mut().unwrap().as_ship_mut() {
            ship.invincible_frames = u32::MAX;
        }
        let mut state = GameState::new(&tuning);
        let frame = tuning.rocket_interval(2) + 10;

        manager.spawn_rockets(frame, 1, &tuning);
        assert_eq!(manager.count(EntityKind::Rocket), 0);

        manager.spawn_rockets(frame, 2, &tuning);
        assert_eq!(manager.count(EntityKind::Rocket), 1);

        // Interval not yet elapsed since the last launch
        manager.spawn_rockets(frame + 1, 2, &tuning);
        assert_eq!(manager.count(EntityKind::Rocket), 1);

        state.add_score(tuning.session.points_per_level);
        state.update();
        assert_eq!(state.level(), 2);
    }

    #[test]
    fn test_unarmed_rocket_passes_through() {
        let tuning = Tuning::default();
        let mut manager = bare_manager(&tuning);
        let mut state = GameState::new(&tuning);

        manager.add(Rocket::spawn(Vec2::new(300.0, 300.0), &tuning));
        manager.add(Bullet::spawn(Vec2::new(300.0, 300.0), Vec2::ZERO, &tuning));
        manager.update(1, &mut state, &tuning);

        assert_eq!(manager.count(EntityKind::Rocket), 1);
        assert_eq!(manager.count(EntityKind::Bullet), 1);
        assert_eq!(state.score(), 0);
    }

    #[test]
    fn test_asteroid_pair_bounce_keeps_both() {
        let tuning = Tuning::default();
        let mut manager = bare_manager(&tuning);
        let mut state = GameState::new(&tuning);

        let mut rng = Pcg32::seed_from_u64(1);
        let (left, right) = (Vec2::new(300.0, 300.0), Vec2::new(335.0, 300.0));
        let a = Asteroid::spawn(left, 20.0, Some(Vec2::new(1.0, 0.0)), &tuning, &mut rng);
        let b = Asteroid::spawn(right, 20.0, Some(Vec2::new(-1.0, 0.0)), &tuning, &mut rng);
        let (ia, ib) = (manager.add(a), manager.add(b));
        manager.update(1, &mut state, &tuning);

        assert!(manager.get(ia).unwrap().transform().unwrap().vel.x < 0.0);
        assert!(manager.get(ib).unwrap().transform().unwrap().vel.x > 0.0);
        assert_eq!(state.score(), 0);
    }
}
