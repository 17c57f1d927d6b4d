use battle_city::config::Rules;
use battle_city::entities::*;
use battle_city::geometry::too_close;
use battle_city::spawn::*;
use battle_city::world::World;

use rand::rngs::StdRng;
use rand::SeedableRng;

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

fn empty_world() -> World {
    World::new(416.0, 416.0)
}

fn always_safe(_: &World, _: &Unit) -> bool {
    true
}

// ── build_queue ───────────────────────────────────────────────────────────────

#[test]
fn queue_holds_exactly_the_roster() {
    let queue = build_queue([3, 1, 0, 2], &mut seeded_rng());
    assert_eq!(queue.len(), 6);
    let count = |kind: Archetype| queue.iter().filter(|&&k| k == kind).count();
    assert_eq!(count(Archetype::Basic), 3);
    assert_eq!(count(Archetype::Fast), 1);
    assert_eq!(count(Archetype::Power), 0);
    assert_eq!(count(Archetype::Armor), 2);
}

#[test]
fn same_seed_gives_same_queue() {
    let a = build_queue([18, 2, 0, 0], &mut StdRng::seed_from_u64(7));
    let b = build_queue([18, 2, 0, 0], &mut StdRng::seed_from_u64(7));
    assert_eq!(a, b);
}

#[test]
fn empty_roster_is_exhausted_from_the_start() {
    let spawner = Spawner::for_roster([0, 0, 0, 0], &mut seeded_rng());
    assert!(spawner.is_exhausted());
    assert_eq!(spawner.remaining(), 0);
}

// ── try_release ───────────────────────────────────────────────────────────────

#[test]
fn releases_every_queued_enemy_then_stops() {
    let mut world = empty_world();
    let rules = Rules::default();
    let mut rng = seeded_rng();
    let mut spawner = Spawner::new(vec![Archetype::Basic, Archetype::Fast, Archetype::Armor]);

    for _ in 0..10 {
        spawner.try_release(&mut world, &rules, &mut rng, always_safe);
    }
    assert!(spawner.is_exhausted());
    assert_eq!(spawner.cursor(), 3);
    assert_eq!(world.enemy_count(), 3);
    assert_eq!(
        spawner.try_release(&mut world, &rules, &mut rng, always_safe),
        None
    );
    assert_eq!(spawner.cursor(), 3);
}

#[test]
fn releases_in_queue_order() {
    let mut world = empty_world();
    let rules = Rules::default();
    let queue = vec![Archetype::Power, Archetype::Basic];
    let mut spawner = Spawner::new(queue.clone());
    let mut rng = seeded_rng();
    spawner.try_release(&mut world, &rules, &mut rng, always_safe);
    spawner.try_release(&mut world, &rules, &mut rng, always_safe);

    let kinds: Vec<UnitKind> = world.units.values().map(|u| u.kind).collect();
    assert_eq!(
        kinds,
        queue.into_iter().map(UnitKind::Enemy).collect::<Vec<_>>()
    );
}

#[test]
fn live_cap_is_respected() {
    let mut world = empty_world();
    let rules = Rules {
        max_enemies: 4,
        ..Rules::default()
    };
    let mut rng = seeded_rng();
    let mut spawner = Spawner::new(vec![Archetype::Basic; 10]);

    for _ in 0..50 {
        spawner.try_release(&mut world, &rules, &mut rng, always_safe);
        assert!(world.enemy_count() <= 4);
    }
    assert_eq!(world.enemy_count(), 4);
    assert_eq!(spawner.cursor(), 4);
}

#[test]
fn small_roster_never_exceeds_its_size() {
    let mut world = empty_world();
    let rules = Rules::default();
    let mut rng = seeded_rng();
    let mut spawner = Spawner::for_roster([2, 0, 0, 0], &mut rng);

    for _ in 0..100 {
        spawner.try_release(&mut world, &rules, &mut rng, spawn_is_safe);
        assert!(world.enemy_count() <= 2);
        assert!(spawner.cursor() <= 2);
    }
    assert_eq!(spawner.cursor(), 2);
    assert_eq!(world.units.len(), 2);
}

#[test]
fn rejected_attempt_keeps_the_cursor() {
    let mut world = empty_world();
    let rules = Rules::default();
    let mut rng = seeded_rng();
    let mut spawner = Spawner::new(vec![Archetype::Basic]);

    let released = spawner.try_release(&mut world, &rules, &mut rng, |_: &World, _: &Unit| false);
    assert_eq!(released, None);
    assert_eq!(spawner.cursor(), 0);
    assert!(world.units.is_empty());
}

#[test]
fn spawned_units_use_a_spawn_point() {
    let mut world = empty_world();
    let rules = Rules::default();
    let mut rng = seeded_rng();
    let mut spawner = Spawner::new(vec![Archetype::Basic; 4]);
    for _ in 0..4 {
        spawner.try_release(&mut world, &rules, &mut rng, always_safe);
    }
    for (_, unit) in world.enemies() {
        assert!(rules.spawn_points.contains(&(unit.x, unit.y)));
        assert_eq!(unit.speed, 0.5);
    }
}

// ── spawn_is_safe ─────────────────────────────────────────────────────────────

#[test]
fn occupied_spawn_point_is_unsafe() {
    let mut world = empty_world();
    world.add_unit(Unit::enemy(Archetype::Basic, Facing::Down, 3.0, 3.0));
    let here = Unit::enemy(Archetype::Fast, Facing::Down, 3.0, 3.0);
    let there = Unit::enemy(Archetype::Fast, Facing::Down, 192.0, 3.0);
    assert!(!spawn_is_safe(&world, &here));
    assert!(spawn_is_safe(&world, &there));
}

#[test]
fn destroyed_units_do_not_block_spawns() {
    let mut world = empty_world();
    let mut wreck = Unit {
        x: 3.0,
        y: 3.0,
        ..Unit::player(0)
    };
    wreck.destroyed = true;
    world.add_player(wreck);
    let candidate = Unit::enemy(Archetype::Basic, Facing::Down, 3.0, 3.0);
    assert!(spawn_is_safe(&world, &candidate));
}

#[test]
fn second_player_is_checked_too() {
    let mut world = empty_world();
    world.add_player(Unit::player(0));
    world.add_player(Unit {
        x: 381.0,
        y: 3.0,
        ..Unit::player(1)
    });
    let candidate = Unit::enemy(Archetype::Basic, Facing::Down, 381.0, 3.0);
    assert!(!spawn_is_safe(&world, &candidate));
}

#[test]
fn corner_contact_outside_the_radius_is_unsafe() {
    // Centres 25.5 x 27 apart: beyond the player's 26x26 radius, yet the
    // enemy's taller box still lands on the player's corner.
    let mut world = empty_world();
    let player = Unit {
        x: 355.5,
        y: 32.0,
        ..Unit::player(0)
    };
    world.add_player(player.clone());
    let candidate = Unit::enemy(Archetype::Basic, Facing::Down, 381.0, 3.0);
    assert!(!too_close(&player.bounds(), &candidate.bounds()));
    assert!(!spawn_is_safe(&world, &candidate));
}
