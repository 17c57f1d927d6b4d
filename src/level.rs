//! Level sources: text layouts in, terrain obstacles out.
//!
//! A layout is a list of rows; each character is one tile:
//! `#` brick, `@` steel, `%` water, `~` grass, `.` empty.
//! Row index is the Y tile, column index the X tile.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::{SCREEN_HEIGHT, SCREEN_WIDTH, TILE_SIZE};
use crate::entities::{Obstacle, Terrain};

#[derive(Debug, Error)]
pub enum LevelError {
    #[error("level {index} could not be read from {}: {source}", .path.display())]
    Unreadable {
        index: usize,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("level {index} is not available")]
    Missing { index: usize },
    #[error("level {index}, row {row}, column {column}: unknown terrain code {code:?}")]
    UnknownTerrain {
        index: usize,
        row: usize,
        column: usize,
        code: char,
    },
    #[error("level {index} is {columns}x{rows} tiles, larger than the screen")]
    Oversized {
        index: usize,
        columns: usize,
        rows: usize,
    },
}

/// Where level layouts come from. Indices are 1-based.
pub trait LevelSource {
    fn rows(&self, index: usize) -> Result<Vec<String>, LevelError>;

    /// Number of consecutive levels available starting at 1.
    fn count(&self) -> usize;
}

// ── Directory source ─────────────────────────────────────────────────────────

/// Reads `<root>/<index>` text files.
#[derive(Clone, Debug)]
pub struct LevelDir {
    root: PathBuf,
    count: usize,
}

impl LevelDir {
    /// Opens `root`, requiring at least level 1 to be present.
    pub fn open(root: impl AsRef<Path>) -> Result<LevelDir, LevelError> {
        let root = root.as_ref().to_path_buf();
        let count = (1..).take_while(|i| root.join(i.to_string()).is_file()).count();
        if count == 0 {
            return Err(LevelError::Missing { index: 1 });
        }
        log::info!("found {} level(s) in {}", count, root.display());
        Ok(LevelDir { root, count })
    }
}

impl LevelSource for LevelDir {
    fn rows(&self, index: usize) -> Result<Vec<String>, LevelError> {
        let path = self.root.join(index.to_string());
        let data = fs::read_to_string(&path).map_err(|source| LevelError::Unreadable {
            index,
            path,
            source,
        })?;
        Ok(split_rows(&data))
    }

    fn count(&self) -> usize {
        self.count
    }
}

// ── In-memory source ─────────────────────────────────────────────────────────

/// Layouts held in memory; level `n` is `levels[n - 1]`.
#[derive(Clone, Debug, Default)]
pub struct LevelSet {
    levels: Vec<Vec<String>>,
}

impl LevelSet {
    pub fn new(levels: Vec<Vec<String>>) -> LevelSet {
        LevelSet { levels }
    }

    /// Builds a set from whole-file strings.
    pub fn from_texts(texts: &[&str]) -> LevelSet {
        LevelSet::new(texts.iter().map(|t| split_rows(t)).collect())
    }
}

impl LevelSource for LevelSet {
    fn rows(&self, index: usize) -> Result<Vec<String>, LevelError> {
        index
            .checked_sub(1)
            .and_then(|i| self.levels.get(i))
            .cloned()
            .ok_or(LevelError::Missing { index })
    }

    fn count(&self) -> usize {
        self.levels.len()
    }
}

fn split_rows(data: &str) -> Vec<String> {
    data.lines().map(|line| line.trim_end().to_string()).collect()
}

// ── Parsing ──────────────────────────────────────────────────────────────────

/// Turn a layout into obstacles, row by row, left to right.
pub fn parse_layout(index: usize, rows: &[String]) -> Result<Vec<Obstacle>, LevelError> {
    let columns = rows.iter().map(|r| r.chars().count()).max().unwrap_or(0);
    let height = rows.iter().rposition(|r| !r.is_empty()).map_or(0, |i| i + 1);
    if (columns * TILE_SIZE) as f64 > SCREEN_WIDTH || (height * TILE_SIZE) as f64 > SCREEN_HEIGHT {
        return Err(LevelError::Oversized {
            index,
            columns,
            rows: height,
        });
    }

    let mut obstacles = Vec::new();
    for (row, line) in rows.iter().enumerate() {
        for (column, code) in line.chars().enumerate() {
            if code == '.' {
                continue;
            }
            let terrain = Terrain::from_code(code).ok_or(LevelError::UnknownTerrain {
                index,
                row,
                column,
                code,
            })?;
            obstacles.push(Obstacle {
                x: (column * TILE_SIZE) as f64,
                y: (row * TILE_SIZE) as f64,
                terrain,
            });
        }
    }
    Ok(obstacles)
}
