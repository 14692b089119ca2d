//! Frame-stepped simulation core
//!
//! Everything here is single-threaded and advances only when
//! [`World::tick`] is called:
//! - Fixed timestep (one call = one frame)
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod collision;
pub mod dispatch;
pub mod entities;
pub mod entity;
pub mod explosion;
pub mod flame;
pub mod manager;
pub mod spawn;
pub mod state;
pub mod tick;
pub mod transform;
pub mod view;

pub use collision::{Collider, intersects, mass, resolve_collision};
pub use entities::{Asteroid, Bullet, Flame, PointIndicator, Rocket, Ship, Spark};
pub use entity::{Body, Entity, EntityId, EntityKind, FrameContext, Module, ModuleKind, Modules};
pub use explosion::Explosion;
pub use flame::Flammable;
pub use manager::EntityManager;
pub use state::{EventRecorder, GameEvent, GameObserver, GameState, calc_level, level_threshold};
pub use tick::{Key, TickInput, World};
pub use transform::{Bounds, Transform};
pub use view::EntityView;
