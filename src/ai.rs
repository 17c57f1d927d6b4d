//! AI heading selection by local greedy probing.
//!
//! Each tick an AI unit tries up to four headings in a fixed preference
//! order and takes the first one whose single step is clear.

use rand::Rng;

use crate::arena::EntityId;
use crate::config::Rules;
use crate::entities::Facing;
use crate::movement::{is_blocked, try_move};
use crate::projectiles::fire;
use crate::world::World;

/// Current facing, the two perpendiculars in coin-flip order, then reverse.
pub fn candidate_order(facing: Facing, rng: &mut impl Rng) -> [Facing; 4] {
    let (first, second) = if rng.gen_bool(0.5) {
        (facing.clockwise(), facing.counter_clockwise())
    } else {
        (facing.counter_clockwise(), facing.clockwise())
    };
    [facing, first, second, facing.opposite()]
}

/// First admissible heading for `id`, or `None` when boxed in.
pub fn choose_direction(world: &World, id: EntityId, rng: &mut impl Rng) -> Option<Facing> {
    let unit = world.units.get(id).filter(|u| !u.destroyed)?;
    let bounds = unit.bounds();
    candidate_order(unit.facing, rng).into_iter().find(|dir| {
        let (dx, dy) = dir.step(unit.speed);
        !is_blocked(world, id, &bounds.offset(dx, dy))
    })
}

/// One AI decision: reverse when boxed in, step when already facing the
/// chosen way, otherwise turn in place.
pub fn steer(world: &mut World, id: EntityId, rng: &mut impl Rng) {
    let Some(current) = world.units.get(id).filter(|u| !u.destroyed).map(|u| u.facing) else {
        return;
    };
    match choose_direction(world, id, rng) {
        Some(dir) if dir == current => {
            try_move(world, id);
        }
        Some(dir) => world.turn(id, dir),
        None => world.turn(id, current.opposite()),
    }
}

/// Steer every live AI unit in insertion order, rolling for enemy fire.
pub fn update_enemies(world: &mut World, rules: &Rules, rng: &mut impl Rng) {
    let ids: Vec<EntityId> = world.enemies().map(|(id, _)| id).collect();
    for id in ids {
        steer(world, id, rng);
        if rules.enemy_fire_odds > 0 && rng.gen_ratio(1, rules.enemy_fire_odds) {
            fire(world, id);
        }
    }
}
