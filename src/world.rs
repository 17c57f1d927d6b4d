//! Entity collections owned by a session.
//!
//! Units (players first, then enemies as they spawn), projectiles and
//! obstacles live in separate arenas; every pass walks them in insertion
//! order so collision priorities never depend on hashing.

use crate::arena::{Arena, EntityId};
use crate::entities::{Castle, Facing, Obstacle, Projectile, Side, Unit};
use crate::geometry::Rect;

#[derive(Clone, Debug)]
pub struct World {
    pub width: f64,
    pub height: f64,
    pub units: Arena<Unit>,
    pub projectiles: Arena<Projectile>,
    pub obstacles: Arena<Obstacle>,
    pub castle: Castle,
    /// Handles of the player units, indexed by slot.
    pub players: Vec<EntityId>,
}

impl World {
    pub fn new(width: f64, height: f64) -> World {
        World {
            width,
            height,
            units: Arena::new(),
            projectiles: Arena::new(),
            obstacles: Arena::new(),
            castle: Castle::default(),
            players: Vec::new(),
        }
    }

    pub fn add_player(&mut self, unit: Unit) -> EntityId {
        let id = self.units.insert(unit);
        self.players.push(id);
        id
    }

    pub fn add_unit(&mut self, unit: Unit) -> EntityId {
        self.units.insert(unit)
    }

    pub fn add_obstacle(&mut self, obstacle: Obstacle) -> EntityId {
        self.obstacles.insert(obstacle)
    }

    pub fn add_projectile(&mut self, projectile: Projectile) -> EntityId {
        self.projectiles.insert(projectile)
    }

    /// Rotate a unit in place.
    pub fn turn(&mut self, id: EntityId, facing: Facing) {
        if let Some(unit) = self.units.get_mut(id) {
            unit.facing = facing;
        }
    }

    pub fn player(&self, slot: usize) -> Option<&Unit> {
        self.players.get(slot).and_then(|&id| self.units.get(id))
    }

    /// Player units in slot order, including destroyed ones.
    pub fn players(&self) -> impl Iterator<Item = (EntityId, &Unit)> {
        self.players
            .iter()
            .filter_map(|&id| self.units.get(id).map(|u| (id, u)))
    }

    pub fn enemies(&self) -> impl Iterator<Item = (EntityId, &Unit)> {
        self.units
            .iter()
            .filter(|(_, u)| u.side() == Side::Enemy && !u.destroyed)
    }

    pub fn enemy_count(&self) -> usize {
        self.enemies().count()
    }

    /// Every unit that still takes part in collisions.
    pub fn live_units(&self) -> impl Iterator<Item = (EntityId, &Unit)> {
        self.units.iter().filter(|(_, u)| !u.destroyed)
    }

    pub fn all_players_destroyed(&self) -> bool {
        self.players().all(|(_, u)| u.destroyed)
    }

    pub fn out_of_screen(&self, rect: &Rect) -> bool {
        !rect.within(self.width, self.height)
    }
}
