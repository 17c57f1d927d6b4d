//! Rendering layer. All terminal I/O lives here.
//!
//! Each function receives a mutable writer and an immutable view of the
//! session. No game logic is performed; this module only turns the sprite
//! snapshot into terminal commands.

use std::io::Write;

use battle_city::compute::{enemies_left, sprites, Mode, Session};
use battle_city::config::TILE_SIZE;
use battle_city::entities::{Archetype, CastleMode, Facing, Sprite, SpriteKind, Terrain};
use crossterm::{
    cursor,
    style::{self, Color, Print},
    QueueableCommand,
};

// ── Layout ────────────────────────────────────────────────────────────────────

/// Screen pixels per terminal column / row. Cells are twice as tall as wide.
const CELL_W: f64 = (TILE_SIZE / 2) as f64;
const CELL_H: f64 = TILE_SIZE as f64;

/// Terminal row of the top border; the field starts one row below.
const TOP: u16 = 1;

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_HUD_SCORE: Color = Color::Yellow;
const C_HUD_STAGE: Color = Color::White;
const C_HUD_ENEMIES: Color = Color::Red;
const C_HINT: Color = Color::DarkGrey;
const C_BRICK: Color = Color::DarkRed;
const C_STEEL: Color = Color::Grey;
const C_WATER: Color = Color::Blue;
const C_GRASS: Color = Color::Green;
const C_BULLET: Color = Color::White;

#[derive(Clone, Copy, PartialEq)]
struct Cell {
    glyph: char,
    color: Color,
}

const BLANK: Cell = Cell {
    glyph: ' ',
    color: Color::Reset,
};

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame. The caller clears the screen on mode changes;
/// every frame overwrites the whole field so nothing is cleared here.
pub fn render<W: Write>(out: &mut W, state: &Session, high_score: u32) -> std::io::Result<()> {
    let (cols, rows) = field_size(state);
    match state.mode {
        Mode::Title => draw_title(out, state, cols, high_score)?,
        Mode::Playing => {
            draw_hud(out, state, cols)?;
            draw_border(out, cols, rows)?;
            draw_field(out, state, cols, rows)?;
            draw_controls_hint(out, state, rows)?;
        }
        Mode::GameOver => {
            draw_hud(out, state, cols)?;
            draw_border(out, cols, rows)?;
            draw_field(out, state, cols, rows)?;
            draw_game_over(out, state, cols, rows, high_score)?;
        }
    }

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, TOP + rows + 3))?;
    out.flush()?;
    Ok(())
}

fn field_size(state: &Session) -> (u16, u16) {
    (
        (state.world.width / CELL_W).ceil() as u16,
        (state.world.height / CELL_H).ceil() as u16,
    )
}

// ── Border ────────────────────────────────────────────────────────────────────

fn draw_border<W: Write>(out: &mut W, cols: u16, rows: u16) -> std::io::Result<()> {
    let w = cols as usize;
    out.queue(style::SetForegroundColor(C_BORDER))?;

    out.queue(cursor::MoveTo(0, TOP))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(w))))?;

    out.queue(cursor::MoveTo(0, TOP + rows + 1))?;
    out.queue(Print(format!("└{}┘", "─".repeat(w))))?;

    for row in TOP + 1..=TOP + rows {
        out.queue(cursor::MoveTo(0, row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(cols + 1, row))?;
        out.queue(Print("│"))?;
    }
    Ok(())
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(out: &mut W, state: &Session, cols: u16) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_SCORE))?;
    out.queue(Print(format!("Score: {:>7}", state.score)))?;

    let stage = format!("[ STAGE {:>2} ]", state.level);
    let sx = (cols / 2).saturating_sub(stage.len() as u16 / 2);
    out.queue(cursor::MoveTo(sx, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_STAGE))?;
    out.queue(Print(&stage))?;

    let players: String = state
        .world
        .players()
        .map(|(_, p)| if p.destroyed { '✗' } else { '♥' })
        .collect();
    let right = format!("Enemies: {:>2}  {}", enemies_left(state), players);
    let rx = (cols + 2).saturating_sub(right.chars().count() as u16 + 1);
    out.queue(cursor::MoveTo(rx, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_ENEMIES))?;
    out.queue(Print(&right))?;
    Ok(())
}

// ── Field ─────────────────────────────────────────────────────────────────────

fn draw_field<W: Write>(out: &mut W, state: &Session, cols: u16, rows: u16) -> std::io::Result<()> {
    let mut grid = vec![vec![BLANK; cols as usize]; rows as usize];
    for sprite in sprites(state) {
        paint(&mut grid, &sprite);
    }

    for (r, line) in grid.iter().enumerate() {
        out.queue(cursor::MoveTo(1, TOP + 1 + r as u16))?;
        let mut color = None;
        for cell in line {
            if color != Some(cell.color) {
                out.queue(style::SetForegroundColor(cell.color))?;
                color = Some(cell.color);
            }
            out.queue(Print(cell.glyph))?;
        }
    }
    Ok(())
}

/// Stamp a sprite onto the cells its box covers.
fn paint(grid: &mut [Vec<Cell>], sprite: &Sprite) {
    let cell = cell_for(sprite);
    let rows = grid.len();
    let cols = grid.first().map_or(0, Vec::len);

    let c0 = (sprite.x / CELL_W).round().max(0.0) as usize;
    let r0 = (sprite.y / CELL_H).round().max(0.0) as usize;
    let c1 = ((sprite.x + f64::from(sprite.width)) / CELL_W).round() as usize;
    let r1 = ((sprite.y + f64::from(sprite.height)) / CELL_H).round() as usize;

    for row in grid.iter_mut().take(r1.max(r0 + 1).min(rows)).skip(r0) {
        for slot in row.iter_mut().take(c1.max(c0 + 1).min(cols)).skip(c0) {
            *slot = cell;
        }
    }
}

fn arrow(facing: Facing) -> char {
    match facing {
        Facing::Up => '▲',
        Facing::Right => '▶',
        Facing::Down => '▼',
        Facing::Left => '◀',
    }
}

fn cell_for(sprite: &Sprite) -> Cell {
    let (glyph, color) = match sprite.kind {
        SpriteKind::Terrain(Terrain::Brick) => ('▓', C_BRICK),
        SpriteKind::Terrain(Terrain::Steel) => ('█', C_STEEL),
        SpriteKind::Terrain(Terrain::Water) => ('≈', C_WATER),
        SpriteKind::Terrain(Terrain::Grass) => ('♣', C_GRASS),
        SpriteKind::Castle(CastleMode::Standing) => ('♜', Color::White),
        SpriteKind::Castle(CastleMode::Exploding { .. }) => ('✶', Color::Red),
        SpriteKind::Castle(CastleMode::Destroyed) => ('✗', Color::DarkGrey),
        SpriteKind::Player(0) => (arrow(sprite.facing), Color::Yellow),
        SpriteKind::Player(_) => (arrow(sprite.facing), Color::Green),
        SpriteKind::Enemy(Archetype::Basic) => (arrow(sprite.facing), Color::White),
        SpriteKind::Enemy(Archetype::Fast) => (arrow(sprite.facing), Color::Cyan),
        SpriteKind::Enemy(Archetype::Power) => (arrow(sprite.facing), Color::Magenta),
        SpriteKind::Enemy(Archetype::Armor) => (arrow(sprite.facing), Color::DarkYellow),
        SpriteKind::Bullet => ('•', C_BULLET),
    };
    Cell { glyph, color }
}

// ── Controls hint (last row) ──────────────────────────────────────────────────

fn draw_controls_hint<W: Write>(out: &mut W, state: &Session, rows: u16) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, TOP + rows + 2))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    let hint = if state.world.players.len() > 1 {
        "1P: WASD + F   2P: arrows + Enter   Q: Quit"
    } else {
        "WASD: Move   F: Fire   Q: Quit            "
    };
    out.queue(Print(hint))?;
    Ok(())
}

// ── Title screen ──────────────────────────────────────────────────────────────

fn draw_title<W: Write>(
    out: &mut W,
    state: &Session,
    cols: u16,
    high_score: u32,
) -> std::io::Result<()> {
    let cx = (cols + 2) / 2;
    let (one, two) = if state.two_player {
        ("  1 PLAYER ", "▶ 2 PLAYERS")
    } else {
        ("▶ 1 PLAYER ", "  2 PLAYERS")
    };
    let hi = format!("HI- {:>6}", high_score);
    let stage = format!("STAGE {}", state.level);

    let lines: [(&str, Color, u16); 7] = [
        ("B A T T L E   C I T Y", Color::DarkRed, 5),
        (hi.as_str(), Color::Yellow, 8),
        (one, Color::White, 12),
        (two, Color::White, 13),
        (stage.as_str(), Color::Grey, 15),
        ("↑ ↓ : Select   SPACE : Start", C_HINT, 19),
        ("Q : Quit", C_HINT, 20),
    ];
    for (text, color, row) in lines {
        let col = cx.saturating_sub(text.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(col, row))?;
        out.queue(style::SetForegroundColor(color))?;
        out.queue(Print(text))?;
    }
    Ok(())
}

// ── Game-over overlay ─────────────────────────────────────────────────────────

fn draw_game_over<W: Write>(
    out: &mut W,
    state: &Session,
    cols: u16,
    rows: u16,
    high_score: u32,
) -> std::io::Result<()> {
    let score_line = format!("Final Score: {:>6}", state.score);
    let best = high_score.max(state.score);
    let new_best = state.score >= high_score && state.score > 0;
    let best_line = if new_best {
        format!("★ NEW BEST: {:>6} ★", best)
    } else {
        format!("Best Score:  {:>6}", best)
    };

    let lines: [(&str, Color); 6] = [
        ("╔════════════════════╗", Color::Red),
        ("║    GAME  OVER      ║", Color::Red),
        ("╚════════════════════╝", Color::Red),
        (score_line.as_str(), Color::Yellow),
        (best_line.as_str(), if new_best { Color::Yellow } else { Color::DarkGrey }),
        ("R - Title  Q - Quit", Color::White),
    ];

    let cx = (cols + 2) / 2;
    let start_row = (TOP + 1 + rows / 2).saturating_sub(lines.len() as u16 / 2);
    for (i, (msg, color)) in lines.iter().enumerate() {
        let col = cx.saturating_sub(msg.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(col, start_row + i as u16))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(*msg))?;
    }
    Ok(())
}
