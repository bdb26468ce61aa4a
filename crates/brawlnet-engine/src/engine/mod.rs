//! Arena simulation.
//!
//! [`Arena`] advances the world one tick at a time. Agents are steered by [`Decision`]s
//! supplied from outside, and the arena reports what happened as [`AgentEvent`]s. Sensing
//! goes through the read-only [`WorldQuery`] trait so controllers never touch the arena
//! mutably.

pub use self::{
    agent::*, arena::*, config::*, decision::*, event::*, layout::*, world_query::*,
};

mod agent;
mod arena;
mod config;
mod decision;
mod event;
mod layout;
mod world_query;
