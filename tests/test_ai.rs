use battle_city::ai::*;
use battle_city::config::Rules;
use battle_city::entities::*;
use battle_city::movement::is_blocked;
use battle_city::world::World;

use rand::rngs::StdRng;
use rand::SeedableRng;

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

// ── candidate_order ───────────────────────────────────────────────────────────

#[test]
fn candidates_are_forward_perpendiculars_then_reverse() {
    let mut rng = seeded_rng();
    for facing in Facing::ALL {
        for _ in 0..20 {
            let order = candidate_order(facing, &mut rng);
            assert_eq!(order[0], facing);
            assert_eq!(order[3], facing.opposite());
            let sides = [order[1], order[2]];
            assert!(
                sides == [facing.clockwise(), facing.counter_clockwise()]
                    || sides == [facing.counter_clockwise(), facing.clockwise()]
            );
        }
    }
}

#[test]
fn perpendicular_order_varies() {
    let mut rng = seeded_rng();
    let firsts: Vec<Facing> = (0..64)
        .map(|_| candidate_order(Facing::Up, &mut rng)[1])
        .collect();
    assert!(firsts.contains(&Facing::Right));
    assert!(firsts.contains(&Facing::Left));
}

// ── choose_direction ──────────────────────────────────────────────────────────

#[test]
fn boxed_in_unit_gets_none() {
    // Screen exactly the size of the tank: every step leaves it.
    let mut world = World::new(26.0, 30.0);
    let id = world.add_unit(Unit::enemy(Archetype::Basic, Facing::Up, 0.0, 0.0));
    let mut rng = seeded_rng();
    assert_eq!(choose_direction(&world, id, &mut rng), None);
}

/// Enemy at (100, 100) on a full screen, hemmed in a quarter pixel away on
/// every side: terrain above, left and right, a player tank below.
fn hemmed_in_world() -> (World, battle_city::arena::EntityId) {
    let mut world = World::new(416.0, 416.0);
    let id = world.add_unit(Unit::enemy(Archetype::Basic, Facing::Up, 100.0, 100.0));
    for (x, y, terrain) in [
        (100.0, 83.75, Terrain::Brick),
        (112.0, 83.75, Terrain::Brick),
        (83.75, 100.0, Terrain::Steel),
        (83.75, 116.0, Terrain::Steel),
        (126.25, 100.0, Terrain::Brick),
        (126.25, 116.0, Terrain::Water),
    ] {
        world.add_obstacle(Obstacle { x, y, terrain });
    }
    world.add_player(Unit {
        x: 100.0,
        y: 130.25,
        ..Unit::player(0)
    });
    (world, id)
}

#[test]
fn unit_hemmed_in_by_terrain_and_tanks_gets_none() {
    let (world, id) = hemmed_in_world();
    let unit = world.units.get(id).unwrap();
    for facing in Facing::ALL {
        let (dx, dy) = facing.step(unit.speed);
        assert!(is_blocked(&world, id, &unit.bounds().offset(dx, dy)));
    }
    for seed in 0..16 {
        let mut rng = StdRng::seed_from_u64(seed);
        assert_eq!(choose_direction(&world, id, &mut rng), None);
    }
}

#[test]
fn open_field_keeps_current_facing() {
    let mut world = World::new(416.0, 416.0);
    let id = world.add_unit(Unit::enemy(Archetype::Basic, Facing::Down, 100.0, 100.0));
    let mut rng = seeded_rng();
    assert_eq!(choose_direction(&world, id, &mut rng), Some(Facing::Down));
}

#[test]
fn corridor_only_offers_perpendiculars() {
    // One tank wide: left and right both leave the screen.
    let mut world = World::new(26.0, 200.0);
    let id = world.add_unit(Unit::enemy(Archetype::Basic, Facing::Right, 0.0, 50.0));
    let mut rng = seeded_rng();
    for _ in 0..20 {
        let dir = choose_direction(&world, id, &mut rng);
        assert!(matches!(dir, Some(Facing::Up) | Some(Facing::Down)));
    }
}

#[test]
fn chosen_direction_is_never_blocked() {
    let mut world = World::new(416.0, 416.0);
    let id = world.add_unit(Unit::enemy(Archetype::Basic, Facing::Up, 100.0, 100.0));
    // Terrain a quarter pixel above and to the left: close enough that a
    // half-pixel step up or left touches it.
    world.add_obstacle(Obstacle {
        x: 100.0,
        y: 83.75,
        terrain: Terrain::Brick,
    });
    world.add_obstacle(Obstacle {
        x: 83.75,
        y: 100.0,
        terrain: Terrain::Steel,
    });

    for seed in 0..32 {
        let mut rng = StdRng::seed_from_u64(seed);
        let dir = choose_direction(&world, id, &mut rng).unwrap();
        assert!(dir == Facing::Right || dir == Facing::Down);

        let unit = world.units.get(id).unwrap();
        let (dx, dy) = dir.step(unit.speed);
        assert!(!is_blocked(&world, id, &unit.bounds().offset(dx, dy)));
    }
}

// ── steer ─────────────────────────────────────────────────────────────────────

#[test]
fn steer_moves_when_facing_is_clear() {
    let mut world = World::new(416.0, 416.0);
    let id = world.add_unit(Unit::enemy(Archetype::Basic, Facing::Down, 100.0, 100.0));
    steer(&mut world, id, &mut seeded_rng());
    let u = world.units.get(id).unwrap();
    assert_eq!((u.x, u.y, u.facing), (100.0, 100.5, Facing::Down));
}

#[test]
fn steer_turns_without_moving_when_blocked_ahead() {
    let mut world = World::new(416.0, 416.0);
    let id = world.add_unit(Unit::enemy(Archetype::Basic, Facing::Up, 100.0, 0.0));
    steer(&mut world, id, &mut seeded_rng());
    let u = world.units.get(id).unwrap();
    assert_eq!((u.x, u.y), (100.0, 0.0));
    assert!(u.facing == Facing::Left || u.facing == Facing::Right);
}

#[test]
fn boxed_in_unit_reverses() {
    let mut world = World::new(26.0, 30.0);
    let id = world.add_unit(Unit::enemy(Archetype::Basic, Facing::Up, 0.0, 0.0));
    let mut rng = seeded_rng();
    steer(&mut world, id, &mut rng);
    assert_eq!(world.units.get(id).unwrap().facing, Facing::Down);
    steer(&mut world, id, &mut rng);
    assert_eq!(world.units.get(id).unwrap().facing, Facing::Up);
}

#[test]
fn hemmed_in_unit_reverses_in_place() {
    let (mut world, id) = hemmed_in_world();
    steer(&mut world, id, &mut seeded_rng());
    let u = world.units.get(id).unwrap();
    assert_eq!((u.x, u.y, u.facing), (100.0, 100.0, Facing::Down));
}

// ── update_enemies ────────────────────────────────────────────────────────────

#[test]
fn certain_fire_odds_make_every_enemy_shoot() {
    let mut world = World::new(416.0, 416.0);
    world.add_unit(Unit::enemy(Archetype::Basic, Facing::Down, 50.0, 50.0));
    world.add_unit(Unit::enemy(Archetype::Power, Facing::Down, 250.0, 50.0));
    let rules = Rules {
        enemy_fire_odds: 1,
        ..Rules::default()
    };
    update_enemies(&mut world, &rules, &mut seeded_rng());
    assert_eq!(world.projectiles.len(), 2);
    assert!(world.projectiles.values().all(|p| p.owner_side == Side::Enemy));
}

#[test]
fn zero_fire_odds_disable_enemy_fire() {
    let mut world = World::new(416.0, 416.0);
    world.add_unit(Unit::enemy(Archetype::Basic, Facing::Down, 50.0, 50.0));
    let rules = Rules {
        enemy_fire_odds: 0,
        ..Rules::default()
    };
    let mut rng = seeded_rng();
    for _ in 0..500 {
        update_enemies(&mut world, &rules, &mut rng);
    }
    assert!(world.projectiles.is_empty());
}

#[test]
fn players_are_not_steered() {
    let mut world = World::new(416.0, 416.0);
    let id = world.add_player(Unit::player(0));
    update_enemies(&mut world, &Rules::default(), &mut seeded_rng());
    assert_eq!(world.units.get(id).unwrap(), &Unit::player(0));
}
