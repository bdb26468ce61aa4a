use crate::{
    Agent,
    core::{geometry::Vec2, item::Item},
};

/// Read-only view of the world an agent can sense.
///
/// Every method is deterministic given the current world state.
pub trait WorldQuery {
    /// Size of the playable area in pixels.
    fn bounds(&self) -> Vec2;

    /// Whether the point is blocked (walls and everything outside the map).
    fn is_obstacle(&self, x: f32, y: f32) -> bool;

    /// Closest living agent other than `agent`.
    fn nearest_opponent(&self, agent: &Agent) -> Option<&Agent>;

    /// Closest item still lying on the floor.
    fn nearest_item(&self, agent: &Agent) -> Option<&Item>;
}
