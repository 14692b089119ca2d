//! Concrete entity kinds
//!
//! Each kind owns only its own state; physics lives in the attached
//! [`Transform`](super::transform::Transform).

pub mod asteroid;
pub mod bullet;
pub mod effects;
pub mod rocket;
pub mod ship;

pub use asteroid::Asteroid;
pub use bullet::Bullet;
pub use effects::{Flame, PointIndicator, Spark};
pub use rocket::Rocket;
pub use ship::Ship;
