use brawlnet_brain::network::NetworkParameters;
use brawlnet_training::evolution::Champion;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Champion network as stored on disk.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ChampionModel {
    pub name: String,
    pub trained_at: DateTime<Utc>,
    pub generation: u32,
    pub fitness: f32,
    pub network: NetworkParameters,
}

impl ChampionModel {
    pub fn from_champion(name: &str, trained_at: DateTime<Utc>, champion: &Champion) -> Self {
        Self {
            name: name.to_owned(),
            trained_at,
            generation: champion.generation,
            fitness: champion.fitness,
            network: champion.network.parameters().clone(),
        }
    }
}
