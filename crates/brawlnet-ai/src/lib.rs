//! Network-driven agent control.
//!
//! This crate sits between the arena and the network. Each tick an agent's
//! [`AgentController`](controller::AgentController) senses the world through the
//! [`WorldQuery`](brawlnet_engine::WorldQuery) capability, runs the agent's network and turns
//! the outputs into a [`Decision`](brawlnet_engine::Decision). Afterwards the events the arena
//! reports are turned into fitness.
//!
//! # Pipeline
//!
//! ```text
//! Agent + WorldQuery
//!     ↓ observation::build_observation
//! observation vector [x, y, health, ranged, bearing_opp, dist_opp, bearing_item, rays...]
//!     ↓ FixedTopologyNetwork::predict
//! outputs [move_x, move_y, rotate, fire]
//!     ↓ decision::decide
//! Decision
//! ```
//!
//! # Modules
//!
//! - [`config`] - sensor geometry, decision thresholds, reward table and camping detection
//! - [`observation`] - fixed-order observation vector and ray casting
//! - [`decision`] - output-to-decision mapping
//! - [`fitness`] - reward events and the camping monitor
//! - [`controller`] - the per-tick entry point tying everything together

pub mod config;
pub mod controller;
pub mod decision;
pub mod fitness;
pub mod observation;
