//! Projectile lifecycle: firing, flight, edge removal and hit resolution.
//!
//! Hits use the exclusive overlap test, so a shot has to penetrate a box,
//! not just graze it. Targets are checked in a fixed priority order and a
//! projectile produces at most one impact per tick.

use log::trace;

use crate::arena::EntityId;
use crate::entities::{Archetype, Facing, Projectile, Side, Terrain, Unit, UnitKind};
use crate::geometry::{overlaps, Boundary, Rect};
use crate::world::World;

/// What a projectile did when it stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Impact {
    Player { slot: usize },
    Terrain { terrain: Terrain, destroyed: bool },
    /// Only player shots reach enemies.
    Enemy { archetype: Archetype },
    Castle,
}

// ── Firing ───────────────────────────────────────────────────────────────────

/// Spawn position for a shot: flush with the leading edge, centred on the
/// cross axis.
pub fn muzzle(unit: &Unit) -> (f64, f64) {
    let (bw, bh) = Projectile::size();
    let (bw, bh) = (f64::from(bw), f64::from(bh));
    let b = unit.bounds();
    let (cx, cy) = b.center();
    match unit.facing {
        Facing::Up => (cx - bw / 2.0, b.y - bh),
        Facing::Right => (b.right(), cy - bh / 2.0),
        Facing::Down => (cx - bw / 2.0, b.bottom()),
        Facing::Left => (b.x - bw, cy - bh / 2.0),
    }
}

/// Fire one projectile from `shooter`. Destroyed units cannot fire.
pub fn fire(world: &mut World, shooter: EntityId) -> Option<EntityId> {
    let unit = world.units.get(shooter).filter(|u| !u.destroyed)?;
    let (x, y) = muzzle(unit);
    let projectile = Projectile::new(x, y, unit.facing, shooter, unit.side());
    Some(world.add_projectile(projectile))
}

// ── Per-tick update ──────────────────────────────────────────────────────────

fn at_edge(world: &World, p: &Projectile) -> bool {
    p.x <= 0.0 || p.x >= world.width || p.y <= 0.0 || p.y >= world.height
}

/// Advance every projectile once and resolve what it struck.
///
/// A projectile sitting on or past a screen edge is removed without
/// moving and without hit detection.
pub fn update_projectiles(world: &mut World) -> Vec<Impact> {
    let mut impacts = Vec::new();
    for id in world.projectiles.ids() {
        let Some(p) = world.projectiles.get(id) else {
            continue;
        };
        if at_edge(world, p) {
            world.projectiles.remove(id);
            continue;
        }
        if let Some(p) = world.projectiles.get_mut(id) {
            p.advance();
        }
        if let Some(impact) = resolve_hit(world, id) {
            trace!("projectile {} stopped: {:?}", id.raw(), impact);
            impacts.push(impact);
        }
    }
    impacts
}

/// Resolve at most one hit for projectile `id`.
///
/// Priority: players, then terrain, then AI units, then the castle.
/// The firer is never hit by its own shot and enemy shots pass through
/// other enemies.
pub fn resolve_hit(world: &mut World, id: EntityId) -> Option<Impact> {
    let shot = world.projectiles.get(id)?.clone();
    let rect = shot.bounds();
    let pierces = |target: &Rect| overlaps(target, &rect, Boundary::Exclusive);

    let player = world.players().find_map(|(pid, u)| match u.kind {
        UnitKind::Player(slot) if pid != shot.owner && !u.destroyed && pierces(&u.bounds()) => {
            Some((pid, slot))
        }
        _ => None,
    });
    if let Some((pid, slot)) = player {
        if let Some(u) = world.units.get_mut(pid) {
            u.destroyed = true;
        }
        world.projectiles.remove(id);
        return Some(Impact::Player { slot });
    }

    let terrain = world
        .obstacles
        .iter()
        .find(|(_, o)| o.terrain.stops_projectiles() && pierces(&o.bounds()))
        .map(|(oid, o)| (oid, o.terrain));
    if let Some((oid, terrain)) = terrain {
        let destroyed = terrain.destructible();
        if destroyed {
            world.obstacles.remove(oid);
        }
        world.projectiles.remove(id);
        return Some(Impact::Terrain { terrain, destroyed });
    }

    if shot.owner_side != Side::Enemy {
        let enemy = world.enemies().find_map(|(eid, u)| match u.kind {
            UnitKind::Enemy(archetype) if eid != shot.owner && pierces(&u.bounds()) => {
                Some((eid, archetype))
            }
            _ => None,
        });
        if let Some((eid, archetype)) = enemy {
            world.units.remove(eid);
            world.projectiles.remove(id);
            return Some(Impact::Enemy { archetype });
        }
    }

    if world.castle.is_standing() && pierces(&world.castle.bounds()) {
        world.castle.hit();
        world.projectiles.remove(id);
        return Some(Impact::Castle);
    }

    None
}
