//! Fixed simulation constants and the per-run [`Rules`] table.
//!
//! Physics is not configurable: speeds, sprite sizes and the screen are
//! constants. `Rules` carries the data that varies per level (enemy
//! rosters) plus the spawn layout, and is built once per session.

use crate::entities::Archetype;

// ── Screen & tiles ───────────────────────────────────────────────────────────

pub const SCREEN_WIDTH: f64 = 416.0;
pub const SCREEN_HEIGHT: f64 = 416.0;

/// Edge of one terrain tile in screen pixels.
pub const TILE_SIZE: usize = 16;

/// Every sprite is drawn at twice its source size; boxes use the scaled size.
pub const RENDER_SCALE: u32 = 2;

// ── Sprite sizes (source pixels, before RENDER_SCALE) ────────────────────────

pub const PLAYER_SPRITE: (u32, u32) = (13, 13);
pub const ENEMY_SPRITE: (u32, u32) = (13, 15);
pub const BULLET_SPRITE: (u32, u32) = (3, 4);
pub const TERRAIN_SPRITE: (u32, u32) = (8, 8);
pub const CASTLE_SPRITE: (u32, u32) = (16, 16);

// ── Speeds (pixels per tick) ─────────────────────────────────────────────────

pub const PLAYER_SPEED: f64 = 1.0;
pub const ENEMY_SPEED: f64 = 0.5;
pub const BULLET_SPEED: f64 = 2.0;

// ── Fixed placements ─────────────────────────────────────────────────────────

pub const PLAYER_STARTS: [(f64, f64); 2] = [(144.0, 384.0), (243.0, 384.0)];
pub const CASTLE_POSITION: (f64, f64) = (192.0, 384.0);

/// Ticks the castle spends exploding before it counts as destroyed.
pub const CASTLE_EXPLOSION_TICKS: u32 = 30;

pub const SPAWN_POINTS: [(f64, f64); 3] = [(3.0, 3.0), (192.0, 3.0), (381.0, 3.0)];

pub const MAX_ENEMIES: usize = 4;

/// Enemy composition per level, in [`Archetype::ALL`] order.
pub const LEVEL_ROSTERS: [[u32; 4]; 35] = [
    [18, 2, 0, 0], [14, 4, 0, 2], [14, 4, 0, 2], [2, 5, 10, 3], [8, 5, 5, 2],
    [9, 2, 7, 2], [7, 4, 6, 3], [7, 4, 7, 2], [6, 4, 7, 3], [12, 2, 4, 2],
    [5, 5, 4, 6], [0, 6, 8, 6], [0, 8, 8, 4], [0, 4, 10, 6], [0, 2, 10, 8],
    [16, 2, 0, 2], [8, 2, 8, 2], [2, 8, 6, 4], [4, 4, 4, 8], [2, 8, 2, 8],
    [6, 2, 8, 4], [6, 8, 2, 4], [0, 10, 4, 6], [10, 4, 4, 2], [0, 8, 2, 10],
    [4, 6, 4, 6], [2, 8, 2, 8], [15, 2, 2, 1], [0, 4, 10, 6], [4, 8, 4, 4],
    [3, 8, 3, 6], [6, 4, 2, 8], [4, 4, 4, 8], [0, 10, 4, 6], [0, 6, 4, 10],
];

/// An enemy fires on a given tick with probability `1 / ENEMY_FIRE_ODDS`.
pub const ENEMY_FIRE_ODDS: u32 = 120;

// ── Rules ────────────────────────────────────────────────────────────────────

/// Immutable per-session configuration, shared read-only by the simulation.
#[derive(Clone, Debug, PartialEq)]
pub struct Rules {
    pub screen_width: f64,
    pub screen_height: f64,
    /// Roster for level `n` lives at index `n - 1`.
    pub rosters: Vec<[u32; 4]>,
    pub spawn_points: Vec<(f64, f64)>,
    /// Most AI units alive at once.
    pub max_enemies: usize,
    /// `0` turns enemy fire off.
    pub enemy_fire_odds: u32,
}

impl Default for Rules {
    fn default() -> Self {
        Rules {
            screen_width: SCREEN_WIDTH,
            screen_height: SCREEN_HEIGHT,
            rosters: LEVEL_ROSTERS.to_vec(),
            spawn_points: SPAWN_POINTS.to_vec(),
            max_enemies: MAX_ENEMIES,
            enemy_fire_odds: ENEMY_FIRE_ODDS,
        }
    }
}

impl Rules {
    /// Composition for a 1-based level index.
    pub fn roster(&self, level: usize) -> Option<[u32; 4]> {
        level.checked_sub(1).and_then(|i| self.rosters.get(i)).copied()
    }

    pub fn level_count(&self) -> usize {
        self.rosters.len()
    }
}

/// Score awarded for destroying one enemy of the given kind.
pub fn kill_score(kind: Archetype) -> u32 {
    match kind {
        Archetype::Basic => 100,
        Archetype::Fast => 200,
        Archetype::Power => 300,
        Archetype::Armor => 400,
    }
}
