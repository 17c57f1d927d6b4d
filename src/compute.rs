//! Game session state machine.
//!
//! Like the rest of the public API, [`tick`] takes the current [`Session`]
//! by reference and returns the next one. A renderer holding the previous
//! session therefore never observes a half-applied tick. All randomness
//! comes through the injected `rng`.

use std::sync::Arc;

use log::{debug, info};
use rand::Rng;

use crate::ai::update_enemies;
use crate::config::{kill_score, Rules};
use crate::entities::{Body, Facing, Obstacle, Sprite, SpriteKind, Terrain, Unit, UnitKind};
use crate::input::{InputSource, Key};
use crate::level::{parse_layout, LevelError, LevelSource};
use crate::movement::try_move;
use crate::projectiles::{fire, update_projectiles, Impact};
use crate::spawn::{spawn_is_safe, Spawner};
use crate::world::World;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Title,
    Playing,
    /// Terminal: no further simulation.
    GameOver,
}

/// The whole simulation. Sole owner of every entity collection.
#[derive(Clone, Debug)]
pub struct Session {
    pub mode: Mode,
    pub two_player: bool,
    /// 1-based.
    pub level: usize,
    pub world: World,
    pub spawner: Spawner,
    pub score: u32,
    pub frame: u64,
    pub rules: Arc<Rules>,
}

// ── Constructors ─────────────────────────────────────────────────────────────

/// A session sitting on the title screen, ready to start at `level`.
pub fn init_state(rules: Rules, level: usize) -> Session {
    Session {
        mode: Mode::Title,
        two_player: false,
        level: level.max(1),
        world: World::new(rules.screen_width, rules.screen_height),
        spawner: Spawner::default(),
        score: 0,
        frame: 0,
        rules: Arc::new(rules),
    }
}

/// Reset everything for a fresh game and switch to `Playing`.
pub fn start(
    state: &Session,
    levels: &dyn LevelSource,
    rng: &mut impl Rng,
) -> Result<Session, LevelError> {
    let slots = if state.two_player { 2 } else { 1 };
    let players = (0..slots).map(Unit::player);
    let (world, spawner) = build_level(&state.rules, state.level, levels, players, rng)?;
    info!(
        "starting level {} with {} player(s), {} enemies queued",
        state.level,
        slots,
        spawner.remaining()
    );
    Ok(Session {
        mode: Mode::Playing,
        world,
        spawner,
        score: 0,
        frame: 0,
        ..state.clone()
    })
}

/// Levels that have both a layout and a roster.
pub fn playable_levels(rules: &Rules, levels: &dyn LevelSource) -> usize {
    rules.level_count().min(levels.count())
}

/// Check that a game can start at `level` before any frame is drawn.
pub fn check_start_level(
    rules: &Rules,
    levels: &dyn LevelSource,
    level: usize,
) -> Result<(), LevelError> {
    if level == 0 || level > playable_levels(rules, levels) {
        return Err(LevelError::Missing { index: level });
    }
    Ok(())
}

fn build_level(
    rules: &Rules,
    level: usize,
    levels: &dyn LevelSource,
    players: impl Iterator<Item = Unit>,
    rng: &mut impl Rng,
) -> Result<(World, Spawner), LevelError> {
    let roster = rules
        .roster(level)
        .ok_or(LevelError::Missing { index: level })?;
    let obstacles = parse_layout(level, &levels.rows(level)?)?;

    let mut world = World::new(rules.screen_width, rules.screen_height);
    for player in players {
        world.add_player(player);
    }
    for obstacle in obstacles {
        world.add_obstacle(obstacle);
    }
    Ok((world, Spawner::for_roster(roster, rng)))
}

// ── Per-tick transition ──────────────────────────────────────────────────────

/// Advance the session by one frame.
///
/// Fails only when a level has to be loaded and cannot be.
pub fn tick(
    state: &Session,
    input: &impl InputSource,
    levels: &dyn LevelSource,
    rng: &mut impl Rng,
) -> Result<Session, LevelError> {
    match state.mode {
        Mode::Title => title_tick(state, input, levels, rng),
        Mode::Playing => play_tick(state, input, levels, rng),
        Mode::GameOver => Ok(state.clone()),
    }
}

fn title_tick(
    state: &Session,
    input: &impl InputSource,
    levels: &dyn LevelSource,
    rng: &mut impl Rng,
) -> Result<Session, LevelError> {
    let mut next = state.clone();
    if input.just_pressed(Key::ToggleMode) {
        next.two_player = !next.two_player;
    }
    if input.just_pressed(Key::Start) {
        return start(&next, levels, rng);
    }
    Ok(next)
}

fn play_tick(
    state: &Session,
    input: &impl InputSource,
    levels: &dyn LevelSource,
    rng: &mut impl Rng,
) -> Result<Session, LevelError> {
    let mut next = state.clone();
    let rules = Arc::clone(&next.rules);
    next.frame += 1;

    // 1. Projectiles
    for impact in update_projectiles(&mut next.world) {
        record_impact(&mut next, impact);
    }

    // 2. AI units
    update_enemies(&mut next.world, &rules, rng);

    // 3. Spawning
    next.spawner
        .try_release(&mut next.world, &rules, rng, spawn_is_safe);

    // 4. Players
    for slot in 0..next.world.players.len() {
        apply_player_input(&mut next.world, slot, input);
    }

    // 5. Base & outcome
    next.world.castle.tick();
    if next.world.castle.is_destroyed() || next.world.all_players_destroyed() {
        info!("game over on level {} with score {}", next.level, next.score);
        next.mode = Mode::GameOver;
    } else if next.spawner.is_exhausted() && next.world.enemy_count() == 0 {
        next = advance_level(&next, levels, rng)?;
    }
    Ok(next)
}

fn record_impact(state: &mut Session, impact: Impact) {
    match impact {
        Impact::Enemy { archetype } => {
            state.score += kill_score(archetype);
            debug!("{:?} destroyed, score {}", archetype, state.score);
        }
        Impact::Player { slot } => info!("player {} destroyed", slot + 1),
        Impact::Castle => info!("castle hit"),
        _ => {}
    }
}

/// Load the next level, keeping score and which players are still alive.
fn advance_level(
    state: &Session,
    levels: &dyn LevelSource,
    rng: &mut impl Rng,
) -> Result<Session, LevelError> {
    let last = playable_levels(&state.rules, levels).max(1);
    let level = if state.level >= last { 1 } else { state.level + 1 };
    info!("level {} cleared, moving on to level {}", state.level, level);

    let players = state.world.players().enumerate().map(|(slot, (_, old))| Unit {
        destroyed: old.destroyed,
        ..Unit::player(slot)
    });
    let (world, spawner) = build_level(&state.rules, level, levels, players, rng)?;
    Ok(Session {
        level,
        world,
        spawner,
        ..state.clone()
    })
}

// ── Player input ─────────────────────────────────────────────────────────────

/// Apply one frame of input to a player's tank.
///
/// The first held direction in up, right, down, left order wins: the tank
/// steps if it already faces that way and turns in place otherwise. Fire
/// is only considered when no direction is held, and only on a fresh press.
pub fn apply_player_input(world: &mut World, slot: usize, input: &impl InputSource) {
    let Some(&id) = world.players.get(slot) else {
        return;
    };
    let Some(facing) = world.units.get(id).filter(|u| !u.destroyed).map(|u| u.facing) else {
        return;
    };

    match Facing::ALL
        .into_iter()
        .find(|&dir| input.is_held(Key::Move(slot, dir)))
    {
        Some(dir) if dir == facing => {
            try_move(world, id);
        }
        Some(dir) => world.turn(id, dir),
        None => {
            if input.just_pressed(Key::Fire(slot)) {
                fire(world, id);
            }
        }
    }
}

// ── Read-only views ──────────────────────────────────────────────────────────

/// Enemies still to come plus those on the field.
pub fn enemies_left(state: &Session) -> usize {
    state.spawner.remaining() + state.world.enemy_count()
}

/// Everything the renderer draws, back to front. Grass goes last so it
/// hides tanks passing under it.
pub fn sprites(state: &Session) -> Vec<Sprite> {
    let world = &state.world;
    let mut out = Vec::new();

    let (grass, ground): (Vec<_>, Vec<_>) = world
        .obstacles
        .values()
        .partition(|o| o.terrain == Terrain::Grass);
    let terrain = |o: &Obstacle| {
        Sprite::from_body(SpriteKind::Terrain(o.terrain), Body::Obstacle(o), Facing::Up)
    };

    out.extend(ground.into_iter().map(terrain));
    out.push(Sprite::from_body(
        SpriteKind::Castle(world.castle.mode),
        Body::Castle(&world.castle),
        Facing::Up,
    ));
    out.extend(world.live_units().map(|(_, u)| {
        let kind = match u.kind {
            UnitKind::Player(slot) => SpriteKind::Player(slot),
            UnitKind::Enemy(archetype) => SpriteKind::Enemy(archetype),
        };
        Sprite::from_body(kind, Body::Unit(u), u.facing)
    }));
    out.extend(
        world
            .projectiles
            .values()
            .map(|p| Sprite::from_body(SpriteKind::Bullet, Body::Projectile(p), p.facing)),
    );
    out.extend(grass.into_iter().map(terrain));
    out
}
