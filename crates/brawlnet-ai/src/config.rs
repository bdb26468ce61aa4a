use brawlnet_brain::network::Topology;
use serde::{Deserialize, Serialize};

use crate::{decision::OUTPUT_COUNT, observation::BASE_FEATURE_COUNT};

/// Everything that shapes how an agent senses, decides and is rewarded.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    pub sensors: SensorConfig,
    pub decision: DecisionConfig,
    pub rewards: RewardTable,
    pub camping: CampingConfig,
}

impl ControllerConfig {
    /// Length of the observation vector produced for these sensors.
    #[must_use]
    pub fn observation_len(&self) -> usize {
        BASE_FEATURE_COUNT + self.sensors.ray_angles.len()
    }

    /// Network shape matching this controller.
    #[must_use]
    pub fn topology(&self, hidden_count: usize) -> Topology {
        Topology::new(self.observation_len(), hidden_count, OUTPUT_COUNT)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SensorConfig {
    /// Ray directions in radians, relative to the agent heading
    pub ray_angles: Vec<f32>,
    pub ray_max_distance: f32,
    pub ray_step: f32,
    /// Opponent distances beyond this read as 1
    pub opponent_distance_cap: f32,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            ray_angles: vec![-0.8, -0.4, 0.0, 0.4, 0.8],
            ray_max_distance: 200.0,
            ray_step: 10.0,
            opponent_distance_cap: 300.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecisionConfig {
    /// Movement outputs with magnitude at or below this are ignored
    pub dead_zone: f32,
    /// Pixels per tick at full output
    pub move_speed: f32,
    /// Radians per tick at full output
    pub rotation_gain: f32,
    pub fire_threshold: f32,
}

impl Default for DecisionConfig {
    fn default() -> Self {
        Self {
            dead_zone: 0.2,
            move_speed: 3.0,
            rotation_gain: 0.15,
            fire_threshold: 0.5,
        }
    }
}

/// Fitness delta per event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewardTable {
    pub survived: f32,
    pub moved: f32,
    pub blocked: f32,
    pub item_pickup: f32,
    /// Per event, regardless of the amount of damage
    pub dealt_damage: f32,
    pub kill: f32,
    pub camping: f32,
}

impl Default for RewardTable {
    fn default() -> Self {
        Self {
            survived: 0.05,
            moved: 0.01,
            blocked: -0.1,
            item_pickup: 50.0,
            dealt_damage: 1.0,
            kill: 100.0,
            camping: -5.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CampingConfig {
    /// Displacement below this counts as staying put
    pub epsilon: f32,
    /// Ticks an agent may stay put before it is penalized
    pub window: u32,
}

impl Default for CampingConfig {
    fn default() -> Self {
        Self {
            epsilon: 10.0,
            window: 180,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_topology() {
        let config = ControllerConfig::default();
        assert_eq!(config.observation_len(), 12);
        assert_eq!(config.topology(14), Topology::new(12, 14, 4));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let json = r#"{ "sensors": { "ray_angles": [0.0] }, "rewards": { "kill": 10.0 } }"#;
        let config: ControllerConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.observation_len(), 8);
        assert!((config.sensors.ray_max_distance - 200.0).abs() < f32::EPSILON);
        assert!((config.rewards.kill - 10.0).abs() < f32::EPSILON);
        assert!((config.rewards.item_pickup - 50.0).abs() < f32::EPSILON);
        assert_eq!(config.camping, CampingConfig::default());
    }
}
