//! Observation vector construction.
//!
//! The layout is fixed and positional, so a trained network only makes sense together with
//! the sensor configuration it was trained with:
//!
//! | index | feature                                           |
//! |-------|---------------------------------------------------|
//! | 0     | x / world width                                   |
//! | 1     | y / world height                                  |
//! | 2     | health / max health                               |
//! | 3     | 1 when holding a ranged weapon, else 0            |
//! | 4     | bearing to nearest opponent                       |
//! | 5     | distance to nearest opponent, capped, in `[0, 1]` |
//! | 6     | bearing to nearest item                           |
//! | 7..   | one reading per ray, in `[0, 1]`                  |
//!
//! Bearings are relative to the agent's heading, wrapped to `[-π, π]` and divided by π.
//! A missing opponent or item reads as bearing 0 and distance 1.

use std::f32::consts::PI;

use brawlnet_engine::{
    Agent, WorldQuery,
    core::geometry::{Vec2, wrap_angle},
};

use crate::config::SensorConfig;

/// Features preceding the ray readings.
pub const BASE_FEATURE_COUNT: usize = 7;

/// Builds the observation vector for `agent`.
pub fn build_observation<W>(
    agent: &Agent,
    world: &W,
    sensors: &SensorConfig,
    max_health: f32,
) -> Vec<f32>
where
    W: WorldQuery + ?Sized,
{
    let bounds = world.bounds();
    let mut observation = Vec::with_capacity(BASE_FEATURE_COUNT + sensors.ray_angles.len());

    observation.push(ratio(agent.position.x, bounds.x));
    observation.push(ratio(agent.position.y, bounds.y));
    observation.push(ratio(agent.health, max_health));
    observation.push(if agent.weapon.has_ranged_weapon() {
        1.0
    } else {
        0.0
    });

    match world.nearest_opponent(agent) {
        Some(opponent) => {
            let cap = sensors.opponent_distance_cap;
            let distance = agent.position.distance(opponent.position);
            observation.push(bearing(agent, opponent.position));
            observation.push(ratio(distance.min(cap), cap));
        }
        None => observation.extend([0.0, 1.0]),
    }
    observation.push(
        world
            .nearest_item(agent)
            .map_or(0.0, |item| bearing(agent, item.position)),
    );

    observation.extend(
        sensors
            .ray_angles
            .iter()
            .map(|offset| cast_ray(world, agent.position, agent.angle + offset, sensors)),
    );
    observation
}

/// Heading-relative direction to `target`, in `[-1, 1]`.
#[must_use]
pub fn bearing(agent: &Agent, target: Vec2) -> f32 {
    let absolute = (target - agent.position).angle();
    wrap_angle(absolute - agent.angle) / PI
}

/// Marches from `origin` along `angle` and returns the distance to the first obstacle as a
/// fraction of the ray length, or 1 when nothing is hit.
pub fn cast_ray<W>(world: &W, origin: Vec2, angle: f32, sensors: &SensorConfig) -> f32
where
    W: WorldQuery + ?Sized,
{
    let max = sensors.ray_max_distance;
    if max <= 0.0 || sensors.ray_step <= 0.0 {
        return 1.0;
    }
    let direction = Vec2::from_angle(angle);
    let mut distance = 0.0;
    while distance < max {
        let sample = origin + direction * distance;
        if world.is_obstacle(sample.x, sample.y) {
            return distance / max;
        }
        distance += sensors.ray_step;
    }
    1.0
}

fn ratio(value: f32, whole: f32) -> f32 {
    if whole > 0.0 { value / whole } else { 0.0 }
}
