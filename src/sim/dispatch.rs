//! Game consequences of collisions, keyed by the pair of entity kinds
//!
//! Handlers are registered once per unordered pair under its canonical
//! (sorted) order. A lookup with the kinds the other way around finds the
//! same handler and swaps the arguments.

use glam::Vec2;
use rand_pcg::Pcg32;

use super::collision::resolve_collision;
use super::entities::{Asteroid, PointIndicator, Ship};
use super::entity::{Entity, EntityKind};
use super::explosion::Explosion;
use super::state::GameState;
use crate::consts::{
    ASTEROID_COLOR, EXPLOSION_SPARKS, ROCKET_COLOR, ROCKET_EXPLOSION_SPARKS, ROCKET_POINTS,
    SHIP_COLOR, SHIP_EXPLOSION_MIN_SPEED,
};
use crate::error::SimError;
use crate::tuning::Tuning;
use crate::{from_angle, with_magnitude};

/// Everything a collision outcome may touch
pub struct CollisionCtx<'a> {
    pub entities: &'a mut [Entity],
    pub state: &'a mut GameState,
    pub tuning: &'a Tuning,
    pub rng: &'a mut Pcg32,
    pub frame: u64,
    /// Entities created by outcomes, added after the scan
    pub spawned: &'a mut Vec<Entity>,
}

/// Outcome handler; the indices follow the canonical kind order of its key
pub type Handler = fn(&mut CollisionCtx<'_>, usize, usize) -> Result<(), SimError>;

const HANDLERS: &[((EntityKind, EntityKind), Handler)] = &[
    ((EntityKind::Asteroid, EntityKind::Asteroid), asteroid_asteroid),
    ((EntityKind::Asteroid, EntityKind::Bullet), asteroid_bullet),
    ((EntityKind::Bullet, EntityKind::Rocket), bullet_rocket),
    ((EntityKind::Ship, EntityKind::Asteroid), ship_asteroid),
    ((EntityKind::Ship, EntityKind::Rocket), ship_rocket),
    ((EntityKind::Asteroid, EntityKind::Rocket), asteroid_rocket),
];

/// Handler for a pair of kinds in either order
///
/// The flag is true when the caller's order is the reverse of the
/// canonical one, so its indices must be swapped.
pub fn lookup(a: EntityKind, b: EntityKind) -> Option<(Handler, bool)> {
    let swapped = a > b;
    let key = if swapped { (b, a) } else { (a, b) };
    HANDLERS
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, handler)| (*handler, swapped))
}

/// Run the outcome for entities `i` and `j`; unhandled pairs are ignored
pub fn dispatch(ctx: &mut CollisionCtx<'_>, i: usize, j: usize) -> Result<(), SimError> {
    let (a, b) = (ctx.entities[i].kind(), ctx.entities[j].kind());
    match lookup(a, b) {
        Some((handler, false)) => handler(ctx, i, j),
        Some((handler, true)) => handler(ctx, j, i),
        None => Ok(()),
    }
}

/// Two distinct elements mutably
fn pair_mut(entities: &mut [Entity], i: usize, j: usize) -> (&mut Entity, &mut Entity) {
    if i < j {
        let (head, tail) = entities.split_at_mut(j);
        (&mut head[i], &mut tail[0])
    } else {
        let (head, tail) = entities.split_at_mut(i);
        (&mut tail[0], &mut head[j])
    }
}

fn explode(ctx: &mut CollisionCtx<'_>, explosion: Explosion) {
    let sparks = explosion.sparks(ctx.rng);
    ctx.spawned.extend(sparks);
}

fn asteroid_asteroid(ctx: &mut CollisionCtx<'_>, a: usize, b: usize) -> Result<(), SimError> {
    let (first, second) = pair_mut(ctx.entities, a, b);
    resolve_collision(first.transform_mut()?, second.transform_mut()?);
    Ok(())
}

fn award(ctx: &mut CollisionCtx<'_>, points: u64, at: Vec2) {
    ctx.state.add_score(points);
    ctx.spawned.push(PointIndicator::spawn(points, at));
}

fn asteroid_bullet(
    ctx: &mut CollisionCtx<'_>,
    asteroid: usize,
    bullet: usize,
) -> Result<(), SimError> {
    let rock = ctx.entities[asteroid].transform()?.clone();
    let shot = ctx.entities[bullet].transform()?.clone();

    award(ctx, Asteroid::points(rock.radius), rock.pos);
    ctx.entities[asteroid].mark_removed();
    ctx.entities[bullet].mark_removed();

    let children = Asteroid::split(&rock, shot.vel, ctx.tuning, ctx.rng);
    ctx.spawned.extend(children);

    explode(
        ctx,
        Explosion::new(shot.pos, shot.vel.clamp_length_max(5.0), EXPLOSION_SPARKS, ASTEROID_COLOR),
    );
    Ok(())
}

fn bullet_rocket(ctx: &mut CollisionCtx<'_>, bullet: usize, rocket: usize) -> Result<(), SimError> {
    let shot = ctx.entities[bullet].transform()?.clone();
    let target = ctx.entities[rocket].transform()?.clone();

    award(ctx, ROCKET_POINTS, target.pos);
    ctx.entities[bullet].mark_removed();
    ctx.entities[rocket].mark_removed();

    explode(
        ctx,
        Explosion::new(
            target.pos,
            with_magnitude(shot.vel, 5.0),
            ROCKET_EXPLOSION_SPARKS,
            ROCKET_COLOR,
        ),
    );
    Ok(())
}

fn ship_asteroid(ctx: &mut CollisionCtx<'_>, ship: usize, asteroid: usize) -> Result<(), SimError> {
    if !is_vulnerable(&ctx.entities[ship]) {
        return Ok(());
    }
    let force = ctx.entities[asteroid].transform()?.vel;
    destroy_ship(ctx, ship, force)?;
    ctx.entities[asteroid].mark_removed();
    Ok(())
}

fn ship_rocket(ctx: &mut CollisionCtx<'_>, ship: usize, rocket: usize) -> Result<(), SimError> {
    if !is_vulnerable(&ctx.entities[ship]) {
        return Ok(());
    }
    let ship_vel = ctx.entities[ship].transform()?.vel;
    let rocket_vel = ctx.entities[rocket].transform()?.vel;
    let force = with_magnitude(rocket_vel + ship_vel, rocket_vel.length());
    destroy_ship(ctx, ship, force)?;
    ctx.entities[rocket].mark_removed();
    Ok(())
}

fn asteroid_rocket(
    ctx: &mut CollisionCtx<'_>,
    asteroid: usize,
    rocket: usize,
) -> Result<(), SimError> {
    let rock = ctx.entities[asteroid].transform()?.clone();
    let missile = ctx.entities[rocket].transform()?.clone();

    ctx.entities[asteroid].mark_removed();
    ctx.entities[rocket].mark_removed();

    let children = Asteroid::split(&rock, missile.vel, ctx.tuning, ctx.rng);
    ctx.spawned.extend(children);

    explode(
        ctx,
        Explosion::new(
            rock.pos,
            (rock.vel + missile.vel).clamp_length_max(6.0),
            EXPLOSION_SPARKS,
            ASTEROID_COLOR,
        ),
    );
    Ok(())
}

fn is_vulnerable(entity: &Entity) -> bool {
    entity.as_ship().is_some_and(Ship::is_vulnerable)
}

/// Blow up the ship, schedule its revival and take a life
pub fn destroy_ship(ctx: &mut CollisionCtx<'_>, ship: usize, force: Vec2) -> Result<(), SimError> {
    let entity = &mut ctx.entities[ship];
    let transform = entity.transform()?;
    let pos = transform.pos;
    let mut vel = transform.vel + force;
    if vel.length() < SHIP_EXPLOSION_MIN_SPEED {
        vel = if vel.length_squared() > f32::EPSILON {
            with_magnitude(vel, SHIP_EXPLOSION_MIN_SPEED)
        } else {
            from_angle(transform.heading) * SHIP_EXPLOSION_MIN_SPEED
        };
    }

    let id = entity.id();
    let respawn_at = ctx.frame + ctx.tuning.session.respawn_frames;
    entity
        .as_ship_mut()
        .ok_or(SimError::EntityNotFound(id))?
        .die(respawn_at);
    log::info!("Ship {} destroyed at frame {}, revives at {}", id, ctx.frame, respawn_at);

    explode(ctx, Explosion::new(pos, vel, EXPLOSION_SPARKS, SHIP_COLOR));
    ctx.state.decrement_lives();
    Ok(())
}
