use serde::{Deserialize, Serialize};

/// Physical constants of the arena.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    pub cols: usize,
    pub rows: usize,
    /// Tile edge length in pixels
    pub tile_size: usize,
    /// Probability that a generated tile is a wall
    pub wall_density: f32,
    /// Distinct spawn tiles shared by the bots (assigned round-robin)
    pub bot_spawn_count: usize,
    /// Items placed by the layout at every round start
    pub item_count: usize,
    pub agent_radius: f32,
    pub max_health: f32,
    /// Pixels per tick
    pub projectile_speed: f32,
    /// A projectile hits agents within `agent_radius + hit_margin`
    pub hit_margin: f32,
    pub melee_range: f32,
    /// Items are picked up within `agent_radius + pickup_margin`
    pub pickup_margin: f32,
    pub medkit_heal: f32,
    /// Per-tick probability of a random medkit/pistol appearing
    pub item_spawn_chance: f32,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            cols: 30,
            rows: 20,
            tile_size: 40,
            wall_density: 0.12,
            bot_spawn_count: 4,
            item_count: 6,
            agent_radius: 15.0,
            max_health: 100.0,
            projectile_speed: 12.0,
            hit_margin: 5.0,
            melee_range: 45.0,
            pickup_margin: 10.0,
            medkit_heal: 50.0,
            item_spawn_chance: 0.005,
        }
    }
}
