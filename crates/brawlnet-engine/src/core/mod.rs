//! Core data types of the arena.
//!
//! These are plain records with no simulation logic of their own beyond local invariants:
//!
//! - [`geometry`] - 2D vectors and angle helpers
//! - [`tile_map`] - the wall grid
//! - [`weapon`] - weapon kinds, damage and ammunition
//! - [`item`] - pickups lying on the floor
//! - [`projectile`] - shots in flight

pub mod geometry;
pub mod item;
pub mod projectile;
pub mod tile_map;
pub mod weapon;
