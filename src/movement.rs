//! Movement & collision resolver.
//!
//! A move is one speed-sized step along the unit's facing. The step is
//! validated as a whole against every other live unit, blocking terrain,
//! the castle and the screen edge, and is only committed if nothing vetoes
//! it.

use crate::arena::EntityId;
use crate::entities::Body;
use crate::geometry::{overlaps, Boundary, Rect};
use crate::world::World;

/// Touching counts: movement must never bring two boxes edge to edge.
pub fn touches(a: &Rect, b: &Rect) -> bool {
    overlaps(a, b, Boundary::Inclusive) || overlaps(b, a, Boundary::Inclusive)
}

/// Would `mover` occupying `rect` collide with anything?
///
/// Short-circuits on the first blocker found.
pub fn is_blocked(world: &World, mover: EntityId, rect: &Rect) -> bool {
    let units = world
        .live_units()
        .filter(|(id, _)| *id != mover)
        .map(|(_, u)| Body::Unit(u));
    let terrain = world
        .obstacles
        .values()
        .filter(|o| o.terrain.blocks_movement())
        .map(Body::Obstacle);

    units
        .chain(terrain)
        .chain(std::iter::once(Body::Castle(&world.castle)))
        .any(|body| touches(&body.bounds(), rect))
        || world.out_of_screen(rect)
}

/// Step `id` once along its facing. Returns whether it moved.
///
/// Destroyed or unknown units are left alone. On rejection the position is
/// untouched.
pub fn try_move(world: &mut World, id: EntityId) -> bool {
    let target = match world.units.get(id) {
        Some(unit) if !unit.destroyed => {
            let (dx, dy) = unit.facing.step(unit.speed);
            unit.bounds().offset(dx, dy)
        }
        _ => return false,
    };

    if is_blocked(world, id, &target) {
        return false;
    }

    if let Some(unit) = world.units.get_mut(id) {
        unit.x = target.x;
        unit.y = target.y;
    }
    true
}
