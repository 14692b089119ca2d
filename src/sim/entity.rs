//! Entity kernel: identity, draw order, capability modules, removal
//!
//! An entity is a kind-specific [`Body`] plus a small capability map holding
//! at most one [`Transform`], [`Collider`] and [`Flammable`]. Lookups of a
//! missing capability are invariant violations and surface as
//! [`SimError::ModuleNotFound`].

use std::fmt;

use glam::Vec2;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Collider;
use super::entities::{Asteroid, Bullet, Flame, PointIndicator, Rocket, Ship, Spark};
use super::flame::Flammable;
use super::transform::{Bounds, Transform};
use crate::error::SimError;
use crate::tuning::Tuning;

/// Opaque entity identity, assigned when the entity joins the live set
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u64);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Entity type tag
///
/// The declaration order is the canonical order used by the collision table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EntityKind {
    Ship,
    Asteroid,
    Bullet,
    Rocket,
    Flame,
    ExplosionSpark,
    PointIndicator,
}

/// Capability module tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModuleKind {
    Transform,
    Collider,
    Flammable,
}

/// A capability that can be attached to an entity
pub trait Module: Sized {
    const KIND: ModuleKind;

    /// Per-frame hook, called in attachment order
    fn update(&mut self, _bounds: &Bounds) {}

    fn slot(modules: &Modules) -> Option<&Self>;
    fn slot_mut(modules: &mut Modules) -> Option<&mut Self>;
    fn slot_option(modules: &mut Modules) -> &mut Option<Self>;
}

impl Module for Transform {
    const KIND: ModuleKind = ModuleKind::Transform;

    fn update(&mut self, bounds: &Bounds) {
        self.integrate(bounds);
    }

    fn slot(modules: &Modules) -> Option<&Self> {
        modules.transform.as_ref()
    }

    fn slot_mut(modules: &mut Modules) -> Option<&mut Self> {
        modules.transform.as_mut()
    }

    fn slot_option(modules: &mut Modules) -> &mut Option<Self> {
        &mut modules.transform
    }
}

impl Module for Collider {
    const KIND: ModuleKind = ModuleKind::Collider;

    fn slot(modules: &Modules) -> Option<&Self> {
        modules.collider.as_ref()
    }

    fn slot_mut(modules: &mut Modules) -> Option<&mut Self> {
        modules.collider.as_mut()
    }

    fn slot_option(modules: &mut Modules) -> &mut Option<Self> {
        &mut modules.collider
    }
}

impl Module for Flammable {
    const KIND: ModuleKind = ModuleKind::Flammable;

    fn slot(modules: &Modules) -> Option<&Self> {
        modules.flammable.as_ref()
    }

    fn slot_mut(modules: &mut Modules) -> Option<&mut Self> {
        modules.flammable.as_mut()
    }

    fn slot_option(modules: &mut Modules) -> &mut Option<Self> {
        &mut modules.flammable
    }
}

/// Fixed-size capability map, one slot per module kind
#[derive(Debug, Clone, Default)]
pub struct Modules {
    transform: Option<Transform>,
    collider: Option<Collider>,
    flammable: Option<Flammable>,
    order: Vec<ModuleKind>,
}

impl Modules {
    /// Attach a module, returning the one it replaced (if any)
    pub fn attach<M: Module>(&mut self, module: M) -> Option<M> {
        let previous = M::slot_option(self).replace(module);
        if previous.is_none() {
            self.order.push(M::KIND);
        }
        previous
    }

    pub fn get<M: Module>(&self) -> Option<&M> {
        M::slot(self)
    }

    pub fn get_mut<M: Module>(&mut self) -> Option<&mut M> {
        M::slot_mut(self)
    }

    pub fn has<M: Module>(&self) -> bool {
        M::slot(self).is_some()
    }

    /// Lookup that treats absence as an invariant violation
    pub fn require<M: Module>(&self, entity: EntityId) -> Result<&M, SimError> {
        M::slot(self).ok_or(SimError::ModuleNotFound {
            entity,
            module: M::KIND,
        })
    }

    pub fn require_mut<M: Module>(&mut self, entity: EntityId) -> Result<&mut M, SimError> {
        M::slot_mut(self).ok_or(SimError::ModuleNotFound {
            entity,
            module: M::KIND,
        })
    }

    /// Attachment order
    pub fn kinds(&self) -> &[ModuleKind] {
        &self.order
    }

    /// Run every attached module's hook in attachment order
    pub fn update_all(&mut self, bounds: &Bounds) {
        for i in 0..self.order.len() {
            match self.order[i] {
                ModuleKind::Transform => {
                    if let Some(m) = self.transform.as_mut() {
                        m.update(bounds);
                    }
                }
                ModuleKind::Collider => {
                    if let Some(m) = self.collider.as_mut() {
                        m.update(bounds);
                    }
                }
                ModuleKind::Flammable => {
                    if let Some(m) = self.flammable.as_mut() {
                        m.update(bounds);
                    }
                }
            }
        }
    }
}

/// Per-frame inputs and outputs shared by entity updates
pub struct FrameContext<'a> {
    pub frame: u64,
    pub bounds: Bounds,
    pub tuning: &'a Tuning,
    pub rng: &'a mut Pcg32,
    /// Position of the live ship (rocket homing target)
    pub target: Option<Vec2>,
    /// Entities created during the update pass, added after it
    pub spawned: Vec<Entity>,
}

/// Kind-specific behavior layered over the capability modules
pub trait Behavior {
    fn update(
        &mut self,
        _id: EntityId,
        modules: &mut Modules,
        ctx: &mut FrameContext<'_>,
    ) -> Result<(), SimError> {
        modules.update_all(&ctx.bounds);
        Ok(())
    }

    fn should_remove(&self, _modules: &Modules) -> bool {
        false
    }
}

/// Kind-specific entity state
#[derive(Debug, Clone)]
pub enum Body {
    Ship(Ship),
    Asteroid(Asteroid),
    Bullet(Bullet),
    Rocket(Rocket),
    Flame(Flame),
    Spark(Spark),
    PointIndicator(PointIndicator),
}

impl Body {
    pub fn kind(&self) -> EntityKind {
        match self {
            Body::Ship(_) => EntityKind::Ship,
            Body::Asteroid(_) => EntityKind::Asteroid,
            Body::Bullet(_) => EntityKind::Bullet,
            Body::Rocket(_) => EntityKind::Rocket,
            Body::Flame(_) => EntityKind::Flame,
            Body::Spark(_) => EntityKind::ExplosionSpark,
            Body::PointIndicator(_) => EntityKind::PointIndicator,
        }
    }

    fn behavior_mut(&mut self) -> &mut dyn Behavior {
        match self {
            Body::Ship(b) => b,
            Body::Asteroid(b) => b,
            Body::Bullet(b) => b,
            Body::Rocket(b) => b,
            Body::Flame(b) => b,
            Body::Spark(b) => b,
            Body::PointIndicator(b) => b,
        }
    }

    fn behavior(&self) -> &dyn Behavior {
        match self {
            Body::Ship(b) => b,
            Body::Asteroid(b) => b,
            Body::Bullet(b) => b,
            Body::Rocket(b) => b,
            Body::Flame(b) => b,
            Body::Spark(b) => b,
            Body::PointIndicator(b) => b,
        }
    }
}

/// A live simulation object
#[derive(Debug, Clone)]
pub struct Entity {
    id: EntityId,
    z_order: i32,
    modules: Modules,
    body: Body,
    removed: bool,
}

impl Entity {
    pub fn new(body: Body, z_order: i32) -> Self {
        Self {
            id: EntityId::default(),
            z_order,
            modules: Modules::default(),
            body,
            removed: false,
        }
    }

    /// Builder-style attach
    pub fn with<M: Module>(mut self, module: M) -> Self {
        self.modules.attach(module);
        self
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub(crate) fn assign_id(&mut self, id: EntityId) {
        self.id = id;
    }

    pub fn kind(&self) -> EntityKind {
        self.body.kind()
    }

    pub fn z_order(&self) -> i32 {
        self.z_order
    }

    pub fn body(&self) -> &Body {
        &self.body
    }

    pub fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    pub fn modules(&self) -> &Modules {
        &self.modules
    }

    pub fn attach<M: Module>(&mut self, module: M) -> Option<M> {
        self.modules.attach(module)
    }

    pub fn has_module<M: Module>(&self) -> bool {
        self.modules.has::<M>()
    }

    pub fn module<M: Module>(&self) -> Result<&M, SimError> {
        self.modules.require(self.id)
    }

    pub fn module_mut<M: Module>(&mut self) -> Result<&mut M, SimError> {
        self.modules.require_mut(self.id)
    }

    pub fn transform(&self) -> Result<&Transform, SimError> {
        self.module::<Transform>()
    }

    pub fn transform_mut(&mut self) -> Result<&mut Transform, SimError> {
        self.module_mut::<Transform>()
    }

    /// Advance one frame
    pub fn update(&mut self, ctx: &mut FrameContext<'_>) -> Result<(), SimError> {
        self.body.behavior_mut().update(self.id, &mut self.modules, ctx)
    }

    pub fn should_remove(&self) -> bool {
        self.removed || self.body.behavior().should_remove(&self.modules)
    }

    /// Flag for removal at the end of the current pass
    pub fn mark_removed(&mut self) {
        self.removed = true;
    }

    pub fn is_removed(&self) -> bool {
        self.removed
    }

    /// Whether the entity takes part in the collision scan this frame
    pub fn can_collide(&self) -> bool {
        if self.removed || !self.modules.has::<Collider>() {
            return false;
        }
        match &self.body {
            Body::Rocket(rocket) => rocket.armed,
            _ => true,
        }
    }

    pub fn as_ship(&self) -> Option<&Ship> {
        match &self.body {
            Body::Ship(ship) => Some(ship),
            _ => None,
        }
    }

    pub fn as_ship_mut(&mut self) -> Option<&mut Ship> {
        match &mut self.body {
            Body::Ship(ship) => Some(ship),
            _ => None,
        }
    }
}
