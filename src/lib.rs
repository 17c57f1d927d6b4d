//! Battle City simulation core.
//!
//! Tanks on a tile grid, projectiles, destructible terrain and a base to
//! defend. Rendering, input devices and the frame clock are supplied by the
//! caller; see `main.rs` for the terminal front-end.

pub mod ai;
pub mod arena;
pub mod compute;
pub mod config;
pub mod entities;
pub mod geometry;
pub mod input;
pub mod level;
pub mod movement;
pub mod projectiles;
pub mod spawn;
pub mod world;
