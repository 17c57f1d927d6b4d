//! Simulation entities: plain data plus their bounding boxes.

use crate::arena::EntityId;
use crate::config::{
    BULLET_SPEED, BULLET_SPRITE, CASTLE_EXPLOSION_TICKS, CASTLE_POSITION, CASTLE_SPRITE,
    ENEMY_SPEED, ENEMY_SPRITE, PLAYER_SPEED, PLAYER_SPRITE, PLAYER_STARTS, RENDER_SCALE,
    TERRAIN_SPRITE,
};
use crate::geometry::Rect;

fn scaled_box(x: f64, y: f64, (w, h): (u32, u32)) -> Rect {
    Rect::new(x, y, w * RENDER_SCALE, h * RENDER_SCALE)
}

// ── Facing ───────────────────────────────────────────────────────────────────

/// Cardinal heading, encoded 0 = up, 1 = right, 2 = down, 3 = left.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Facing {
    Up,
    Right,
    Down,
    Left,
}

impl Facing {
    pub const ALL: [Facing; 4] = [Facing::Up, Facing::Right, Facing::Down, Facing::Left];

    pub fn from_index(index: usize) -> Facing {
        Facing::ALL[index % 4]
    }

    pub fn index(self) -> usize {
        match self {
            Facing::Up => 0,
            Facing::Right => 1,
            Facing::Down => 2,
            Facing::Left => 3,
        }
    }

    /// `(facing + 1) mod 4`
    pub fn clockwise(self) -> Facing {
        Facing::from_index(self.index() + 1)
    }

    /// `(facing + 3) mod 4`
    pub fn counter_clockwise(self) -> Facing {
        Facing::from_index(self.index() + 3)
    }

    pub fn opposite(self) -> Facing {
        Facing::from_index(self.index() + 2)
    }

    /// Displacement of one `distance`-long step along this heading.
    pub fn step(self, distance: f64) -> (f64, f64) {
        match self {
            Facing::Up => (0.0, -distance),
            Facing::Right => (distance, 0.0),
            Facing::Down => (0.0, distance),
            Facing::Left => (-distance, 0.0),
        }
    }
}

// ── Kinds ────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    Player,
    Enemy,
}

/// Enemy variety. Only the spawn roster and kill score tell them apart.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Archetype {
    Basic,
    Fast,
    Power,
    Armor,
}

impl Archetype {
    pub const ALL: [Archetype; 4] = [
        Archetype::Basic,
        Archetype::Fast,
        Archetype::Power,
        Archetype::Armor,
    ];
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Terrain {
    /// `#`, destructible wall.
    Brick,
    /// `@`, indestructible wall.
    Steel,
    /// `%`, impassable but projectiles fly over it.
    Water,
    /// `~`, decorative cover.
    Grass,
}

impl Terrain {
    pub fn from_code(code: char) -> Option<Terrain> {
        match code {
            '#' => Some(Terrain::Brick),
            '@' => Some(Terrain::Steel),
            '%' => Some(Terrain::Water),
            '~' => Some(Terrain::Grass),
            _ => None,
        }
    }

    pub fn blocks_movement(self) -> bool {
        !matches!(self, Terrain::Grass)
    }

    pub fn stops_projectiles(self) -> bool {
        matches!(self, Terrain::Brick | Terrain::Steel)
    }

    pub fn destructible(self) -> bool {
        matches!(self, Terrain::Brick)
    }
}

// ── Units ────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnitKind {
    /// Player slot, 0 or 1.
    Player(usize),
    Enemy(Archetype),
}

/// A tank, player- or AI-controlled.
#[derive(Clone, Debug, PartialEq)]
pub struct Unit {
    pub x: f64,
    pub y: f64,
    pub facing: Facing,
    pub speed: f64,
    /// Terminal. A destroyed unit neither moves nor collides.
    pub destroyed: bool,
    pub kind: UnitKind,
}

impl Unit {
    /// Player tank at its start position, facing up.
    pub fn player(slot: usize) -> Unit {
        let (x, y) = PLAYER_STARTS[slot.min(1)];
        Unit {
            x,
            y,
            facing: Facing::Up,
            speed: PLAYER_SPEED,
            destroyed: false,
            kind: UnitKind::Player(slot),
        }
    }

    pub fn enemy(archetype: Archetype, facing: Facing, x: f64, y: f64) -> Unit {
        Unit {
            x,
            y,
            facing,
            speed: ENEMY_SPEED,
            destroyed: false,
            kind: UnitKind::Enemy(archetype),
        }
    }

    pub fn side(&self) -> Side {
        match self.kind {
            UnitKind::Player(_) => Side::Player,
            UnitKind::Enemy(_) => Side::Enemy,
        }
    }

    pub fn bounds(&self) -> Rect {
        let sprite = match self.kind {
            UnitKind::Player(_) => PLAYER_SPRITE,
            UnitKind::Enemy(_) => ENEMY_SPRITE,
        };
        scaled_box(self.x, self.y, sprite)
    }
}

// ── Projectiles ──────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Projectile {
    pub x: f64,
    pub y: f64,
    /// Copied from the firer; never changes.
    pub facing: Facing,
    pub speed: f64,
    /// Firer's handle. Only used to exempt the firer from its own shot.
    pub owner: EntityId,
    pub owner_side: Side,
}

impl Projectile {
    pub fn new(x: f64, y: f64, facing: Facing, owner: EntityId, owner_side: Side) -> Projectile {
        Projectile {
            x,
            y,
            facing,
            speed: BULLET_SPEED,
            owner,
            owner_side,
        }
    }

    pub fn advance(&mut self) {
        let (dx, dy) = self.facing.step(self.speed);
        self.x += dx;
        self.y += dy;
    }

    /// The box is not rotated with the facing.
    pub fn bounds(&self) -> Rect {
        scaled_box(self.x, self.y, BULLET_SPRITE)
    }

    pub fn size() -> (u32, u32) {
        (BULLET_SPRITE.0 * RENDER_SCALE, BULLET_SPRITE.1 * RENDER_SCALE)
    }
}

// ── Terrain & base ───────────────────────────────────────────────────────────

/// A static terrain cell from the level layout.
#[derive(Clone, Debug, PartialEq)]
pub struct Obstacle {
    pub x: f64,
    pub y: f64,
    pub terrain: Terrain,
}

impl Obstacle {
    pub fn bounds(&self) -> Rect {
        scaled_box(self.x, self.y, TERRAIN_SPRITE)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CastleMode {
    Standing,
    Exploding { ticks_left: u32 },
    Destroyed,
}

/// The defended base.
#[derive(Clone, Debug, PartialEq)]
pub struct Castle {
    pub x: f64,
    pub y: f64,
    pub mode: CastleMode,
}

impl Default for Castle {
    fn default() -> Self {
        Castle {
            x: CASTLE_POSITION.0,
            y: CASTLE_POSITION.1,
            mode: CastleMode::Standing,
        }
    }
}

impl Castle {
    pub fn bounds(&self) -> Rect {
        scaled_box(self.x, self.y, CASTLE_SPRITE)
    }

    pub fn is_standing(&self) -> bool {
        self.mode == CastleMode::Standing
    }

    pub fn is_destroyed(&self) -> bool {
        self.mode == CastleMode::Destroyed
    }

    /// Start the explosion. Only a standing castle can be hit.
    pub fn hit(&mut self) -> bool {
        if !self.is_standing() {
            return false;
        }
        self.mode = CastleMode::Exploding {
            ticks_left: CASTLE_EXPLOSION_TICKS,
        };
        true
    }

    /// Advance the explosion by one tick.
    pub fn tick(&mut self) {
        if let CastleMode::Exploding { ticks_left } = self.mode {
            self.mode = match ticks_left.saturating_sub(1) {
                0 => CastleMode::Destroyed,
                left => CastleMode::Exploding { ticks_left: left },
            };
        }
    }
}

// ── Uniform view ─────────────────────────────────────────────────────────────

/// Any collidable entity, reduced to what collision code needs.
#[derive(Clone, Copy, Debug)]
pub enum Body<'a> {
    Unit(&'a Unit),
    Projectile(&'a Projectile),
    Obstacle(&'a Obstacle),
    Castle(&'a Castle),
}

impl Body<'_> {
    pub fn bounds(&self) -> Rect {
        match self {
            Body::Unit(u) => u.bounds(),
            Body::Projectile(p) => p.bounds(),
            Body::Obstacle(o) => o.bounds(),
            Body::Castle(c) => c.bounds(),
        }
    }
}

// ── Renderer snapshot ────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpriteKind {
    Player(usize),
    Enemy(Archetype),
    Bullet,
    Terrain(Terrain),
    Castle(CastleMode),
}

/// What the renderer is allowed to see of one entity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sprite {
    pub kind: SpriteKind,
    pub x: f64,
    pub y: f64,
    pub width: u32,
    pub height: u32,
    pub facing: Facing,
}

impl Sprite {
    pub fn from_body(kind: SpriteKind, body: Body<'_>, facing: Facing) -> Sprite {
        let b = body.bounds();
        Sprite {
            kind,
            x: b.x,
            y: b.y,
            width: b.width,
            height: b.height,
            facing,
        }
    }
}
