//! Generational evolution of a single champion lineage.
//!
//! Evolution here is plain mutate-and-select hill climbing with strict elitism:
//!
//! 1. **Populating** - the first generation (or any generation without a champion) is drawn
//!    fresh at random; every later one consists of independently mutated champion clones
//! 2. **Running** - the round plays out and every agent accumulates fitness
//! 3. **Ranking** - AI contenders are stable-sorted by fitness, best first
//! 4. **Promoting** - the best network is cloned into the single champion slot and the
//!    generation counter advances
//!
//! There is no crossover and no diversity preservation; the only memory of the lineage is the
//! champion itself and, when enabled, a bounded history of earlier champions that
//! [`EvolutionEngine::rollback`] can return to.
//!
//! # Example
//!
//! ```
//! use brawlnet_brain::network::Topology;
//! use brawlnet_training::evolution::{Contender, EvolutionConfig, EvolutionEngine};
//!
//! let mut rng = rand::rng();
//! let mut engine = EvolutionEngine::new(EvolutionConfig::default(), Topology::new(12, 14, 4));
//!
//! let networks = engine.populate(&mut rng);
//! let contenders = networks
//!     .iter()
//!     .enumerate()
//!     .map(|(i, network)| Contender::new(network, i as f32));
//! let report = engine.advance_generation(contenders);
//!
//! assert_eq!(report.generation, 1);
//! assert_eq!(engine.generation(), 2);
//! ```

use std::collections::VecDeque;

use brawlnet_brain::{
    CorruptChampion,
    mutation::{DEFAULT_PERTURBATION_SCALE, Mutation, Perturbation},
    network::{FixedTopologyNetwork, NetworkParameters, Topology},
};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::stats::FitnessStats;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvolutionConfig {
    /// Agents per round (including the human in interactive rounds)
    pub population_size: usize,
    pub hidden_count: usize,
    /// Probability of mutating each weight of a champion clone
    pub mutation_rate: f32,
    pub perturbation_scale: f32,
    pub perturbation: Perturbation,
    /// Earlier champions kept for rollback; 0 disables the history
    pub history_capacity: usize,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            population_size: 10,
            hidden_count: 14,
            mutation_rate: 0.15,
            perturbation_scale: DEFAULT_PERTURBATION_SCALE,
            perturbation: Perturbation::Uniform,
            history_capacity: 0,
        }
    }
}

impl EvolutionConfig {
    #[must_use]
    pub fn mutation(&self) -> Mutation {
        Mutation {
            rate: self.mutation_rate,
            scale: self.perturbation_scale,
            perturbation: self.perturbation,
        }
    }
}

/// No AI agent took part in the round that just ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("generation {generation} ended without any AI contender")]
pub struct EmptyPopulation {
    pub generation: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum EvolutionPhase {
    Populating,
    Running,
    Ranking,
    Promoting,
}

/// Best network of a generation.
#[derive(Debug, Clone, PartialEq)]
pub struct Champion {
    pub network: FixedTopologyNetwork,
    pub fitness: f32,
    /// Generation the champion was selected in
    pub generation: u32,
}

/// A network together with the fitness it earned this round.
#[derive(Debug, Clone, Copy)]
pub struct Contender<'a> {
    pub network: &'a FixedTopologyNetwork,
    pub fitness: f32,
}

impl<'a> Contender<'a> {
    #[must_use]
    pub fn new(network: &'a FixedTopologyNetwork, fitness: f32) -> Self {
        Self { network, fitness }
    }
}

/// Outcome of one ranking and promotion step.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationReport {
    /// The generation that just finished
    pub generation: u32,
    /// Fitness of the newly promoted champion, `None` when there were no contenders
    pub champion_fitness: Option<f32>,
    /// Best champion fitness seen so far in this lineage
    pub best_fitness: Option<f32>,
    pub fitness: Option<FitnessStats>,
}

#[derive(Debug, Clone)]
pub struct EvolutionEngine {
    config: EvolutionConfig,
    topology: Topology,
    phase: EvolutionPhase,
    generation: u32,
    champion: Option<Champion>,
    history: VecDeque<Champion>,
    history_capacity: usize,
    best_fitness: Option<f32>,
    fresh_next: bool,
}

impl EvolutionEngine {
    #[must_use]
    pub fn new(config: EvolutionConfig, topology: Topology) -> Self {
        let history_capacity = config.history_capacity;
        Self {
            config,
            topology,
            phase: EvolutionPhase::Populating,
            generation: 1,
            champion: None,
            history: VecDeque::new(),
            history_capacity,
            best_fitness: None,
            fresh_next: false,
        }
    }

    #[must_use]
    pub fn config(&self) -> &EvolutionConfig {
        &self.config
    }

    #[must_use]
    pub fn topology(&self) -> Topology {
        self.topology
    }

    #[must_use]
    pub fn phase(&self) -> EvolutionPhase {
        self.phase
    }

    /// Current generation, starting at 1.
    #[must_use]
    pub fn generation(&self) -> u32 {
        self.generation
    }

    #[must_use]
    pub fn champion(&self) -> Option<&Champion> {
        self.champion.as_ref()
    }

    /// Best champion fitness ever promoted in this lineage.
    #[must_use]
    pub fn best_fitness(&self) -> Option<f32> {
        self.best_fitness
    }

    #[must_use]
    pub fn history(&self) -> &VecDeque<Champion> {
        &self.history
    }

    /// Creates the networks of the next round.
    ///
    /// Networks are fresh-random in generation 1, without a champion, or right after a round
    /// with no contenders; otherwise each is an independently mutated champion clone.
    pub fn populate<R>(&mut self, rng: &mut R) -> Vec<FixedTopologyNetwork>
    where
        R: Rng + ?Sized,
    {
        let count = self.config.population_size;
        let networks = match &self.champion {
            Some(champion) if self.generation > 1 && !self.fresh_next => {
                let mutation = self.config.mutation();
                (0..count)
                    .map(|_| {
                        let mut child = champion.network.clone();
                        child.mutate_with(&mutation, rng);
                        child
                    })
                    .collect()
            }
            _ => self.random_networks(count, rng),
        };
        self.fresh_next = false;
        self.phase = EvolutionPhase::Running;
        networks
    }

    /// Creates `count` unmutated champion clones, for rounds against a human.
    pub fn populate_opponents<R>(&mut self, count: usize, rng: &mut R) -> Vec<FixedTopologyNetwork>
    where
        R: Rng + ?Sized,
    {
        self.phase = EvolutionPhase::Running;
        match &self.champion {
            Some(champion) => vec![champion.network.clone(); count],
            None => self.random_networks(count, rng),
        }
    }

    /// Ranks the contenders of the round that just ended and promotes the best one.
    ///
    /// Ties keep population order. The generation counter advances even when there are no
    /// contenders; in that case the champion is left alone and the next [`populate`] draws
    /// fresh-random networks.
    ///
    /// [`populate`]: Self::populate
    pub fn advance_generation<'a, I>(&mut self, contenders: I) -> GenerationReport
    where
        I: IntoIterator<Item = Contender<'a>>,
    {
        self.phase = EvolutionPhase::Ranking;
        let mut ranked = contenders.into_iter().collect::<Vec<_>>();
        ranked.sort_by(|a, b| b.fitness.total_cmp(&a.fitness));
        let fitness = FitnessStats::new(ranked.iter().map(|c| c.fitness));

        self.phase = EvolutionPhase::Promoting;
        let finished = self.generation;
        let champion_fitness = match ranked.first() {
            Some(best) => {
                self.promote(Champion {
                    network: best.network.clone(),
                    fitness: best.fitness,
                    generation: finished,
                });
                Some(best.fitness)
            }
            None => {
                tracing::warn!(
                    error = %EmptyPopulation { generation: finished },
                    "next generation will be drawn at random"
                );
                self.fresh_next = true;
                None
            }
        };
        self.generation = self.generation.saturating_add(1);
        self.phase = EvolutionPhase::Populating;

        if let Some(champion_fitness) = champion_fitness {
            tracing::info!(
                generation = finished,
                champion_fitness,
                best_fitness = self.best_fitness,
                "generation finished"
            );
        }
        GenerationReport {
            generation: finished,
            champion_fitness,
            best_fitness: self.best_fitness,
            fitness,
        }
    }

    /// Forgets the lineage: no champion, empty history, generation 1.
    pub fn reset_lineage(&mut self) {
        self.champion = None;
        self.history.clear();
        self.best_fitness = None;
        self.generation = 1;
        self.fresh_next = false;
        self.phase = EvolutionPhase::Populating;
    }

    /// Keeps up to `max_entries` earlier champions; 0 disables the history.
    pub fn retain_history(&mut self, max_entries: usize) {
        self.history_capacity = max_entries;
        while self.history.len() > max_entries {
            self.history.pop_front();
        }
    }

    /// Replaces the champion with the most recent history entry.
    ///
    /// Returns the restored champion, or `None` (leaving the champion as is) when the history
    /// is empty.
    pub fn rollback(&mut self) -> Option<&Champion> {
        let previous = self.history.pop_back()?;
        tracing::info!(
            generation = previous.generation,
            fitness = previous.fitness,
            "rolled back champion"
        );
        self.champion = Some(previous);
        self.champion.as_ref()
    }

    /// Installs a persisted champion selected in `generation`.
    ///
    /// On error the engine is left untouched.
    pub fn restore_champion(
        &mut self,
        parameters: NetworkParameters,
        fitness: f32,
        generation: u32,
    ) -> Result<(), CorruptChampion> {
        if generation == u32::MAX {
            return Err(CorruptChampion::GenerationExhausted { generation });
        }
        if parameters.topology != self.topology {
            return Err(CorruptChampion::TopologyMismatch {
                expected: self.topology,
                actual: parameters.topology,
            });
        }
        let network = FixedTopologyNetwork::from_parameters(parameters)?;
        let generation = generation.max(1);
        self.champion = Some(Champion {
            network,
            fitness,
            generation,
        });
        self.history.clear();
        self.best_fitness = Some(fitness);
        self.generation = generation + 1;
        self.fresh_next = false;
        self.phase = EvolutionPhase::Populating;
        Ok(())
    }

    fn promote(&mut self, champion: Champion) {
        if self.history_capacity > 0
            && let Some(previous) = self.champion.take()
        {
            self.history.push_back(previous);
            while self.history.len() > self.history_capacity {
                self.history.pop_front();
            }
        }
        self.best_fitness = Some(
            self.best_fitness
                .map_or(champion.fitness, |best| best.max(champion.fitness)),
        );
        self.champion = Some(champion);
    }

    fn random_networks<R>(&self, count: usize, rng: &mut R) -> Vec<FixedTopologyNetwork>
    where
        R: Rng + ?Sized,
    {
        (0..count)
            .map(|_| FixedTopologyNetwork::random(rng, self.topology))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;

    const TOPOLOGY: Topology = Topology::new(12, 14, 4);

    fn engine(population_size: usize) -> EvolutionEngine {
        let config = EvolutionConfig {
            population_size,
            ..EvolutionConfig::default()
        };
        EvolutionEngine::new(config, TOPOLOGY)
    }

    fn rank(
        engine: &mut EvolutionEngine,
        networks: &[FixedTopologyNetwork],
        fitness: &[f32],
    ) -> GenerationReport {
        let contenders = networks
            .iter()
            .zip(fitness)
            .map(|(network, &fitness)| Contender::new(network, fitness));
        engine.advance_generation(contenders)
    }

    #[test]
    fn test_first_generation_is_random() {
        let mut rng = Pcg32::seed_from_u64(0);
        let mut engine = engine(5);
        assert!(engine.phase().is_populating());
        let networks = engine.populate(&mut rng);
        assert_eq!(networks.len(), 5);
        assert!(engine.phase().is_running());
        assert!(networks.iter().all(|n| n.topology() == TOPOLOGY));
        assert_ne!(networks[0], networks[1]);
    }

    #[test]
    fn test_best_contender_becomes_champion() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut engine = engine(3);
        let networks = engine.populate(&mut rng);
        let report = rank(&mut engine, &networks, &[10.0, 5.0, 8.0]);

        assert_eq!(report.generation, 1);
        assert_eq!(report.champion_fitness, Some(10.0));
        assert_eq!(report.fitness.map(|s| s.count), Some(3));
        assert_eq!(engine.generation(), 2);
        assert_eq!(engine.champion().map(|c| &c.network), Some(&networks[0]));
        assert!(engine.phase().is_populating());

        let champion = networks[0].clone();
        let next = engine.populate(&mut rng);
        assert_eq!(next.len(), 3);
        for child in &next {
            assert_eq!(child.topology(), TOPOLOGY);
            assert_ne!(child, &champion);
        }
    }

    #[test]
    fn test_ties_keep_population_order() {
        let mut rng = Pcg32::seed_from_u64(2);
        let mut engine = engine(3);
        let networks = engine.populate(&mut rng);
        rank(&mut engine, &networks, &[3.0, 7.0, 7.0]);
        assert_eq!(engine.champion().map(|c| &c.network), Some(&networks[1]));
    }

    #[test]
    fn test_empty_round_falls_back_to_random() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut engine = engine(4);
        let networks = engine.populate(&mut rng);
        rank(&mut engine, &networks, &[1.0, 2.0, 3.0, 4.0]);
        let champion = engine.champion().cloned().unwrap();

        let report = rank(&mut engine, &[], &[]);
        assert_eq!(report.generation, 2);
        assert_eq!(report.champion_fitness, None);
        assert_eq!(report.fitness, None);
        assert_eq!(engine.generation(), 3);
        assert_eq!(engine.champion(), Some(&champion));

        // fresh-random networks are far from the champion; mutated clones keep most weights
        let fresh = engine.populate(&mut rng);
        for network in &fresh {
            let shared = network
                .weights()
                .zip(champion.network.weights())
                .filter(|(a, b)| a == b)
                .count();
            assert_eq!(shared, 0);
        }
        let clones = engine.populate(&mut rng);
        for network in &clones {
            let shared = network
                .weights()
                .zip(champion.network.weights())
                .filter(|(a, b)| a == b)
                .count();
            assert!(shared > TOPOLOGY.weight_count() / 2);
        }
    }

    #[test]
    fn test_reset_lineage_is_idempotent() {
        let mut rng = Pcg32::seed_from_u64(4);
        let mut engine = engine(2);
        let networks = engine.populate(&mut rng);
        rank(&mut engine, &networks, &[1.0, 2.0]);
        assert!(engine.champion().is_some());

        engine.reset_lineage();
        engine.reset_lineage();
        assert_eq!(engine.generation(), 1);
        assert!(engine.champion().is_none());
        assert_eq!(engine.best_fitness(), None);
        assert!(engine.history().is_empty());
    }

    #[test]
    fn test_opponents_are_unmutated_clones() {
        let mut rng = Pcg32::seed_from_u64(5);
        let mut engine = engine(2);
        let random = engine.populate_opponents(3, &mut rng);
        assert_eq!(random.len(), 3);

        let networks = engine.populate(&mut rng);
        rank(&mut engine, &networks, &[0.0, 1.0]);
        let opponents = engine.populate_opponents(9, &mut rng);
        assert_eq!(opponents.len(), 9);
        assert!(opponents.iter().all(|n| n == &networks[1]));
    }

    #[test]
    fn test_history_and_rollback() {
        let mut rng = Pcg32::seed_from_u64(6);
        let mut engine = engine(1);
        engine.retain_history(2);

        let mut champions = vec![];
        for fitness in [1.0, 2.0, 3.0, 4.0] {
            let networks = engine.populate(&mut rng);
            rank(&mut engine, &networks, &[fitness]);
            champions.push(networks[0].clone());
        }
        assert_eq!(engine.history().len(), 2);
        assert_eq!(engine.best_fitness(), Some(4.0));

        assert_eq!(engine.rollback().map(|c| &c.network), Some(&champions[2]));
        assert_eq!(engine.rollback().map(|c| &c.network), Some(&champions[1]));
        assert!(engine.rollback().is_none());
        assert_eq!(engine.champion().map(|c| c.fitness), Some(2.0));
    }

    #[test]
    fn test_best_fitness_tracks_maximum() {
        let mut rng = Pcg32::seed_from_u64(7);
        let mut engine = engine(1);
        for fitness in [5.0, 2.0] {
            let networks = engine.populate(&mut rng);
            rank(&mut engine, &networks, &[fitness]);
        }
        assert_eq!(engine.champion().map(|c| c.fitness), Some(2.0));
        assert_eq!(engine.best_fitness(), Some(5.0));
    }

    #[test]
    fn test_restore_champion() {
        let mut rng = Pcg32::seed_from_u64(8);
        let mut engine = engine(2);
        let network = FixedTopologyNetwork::random(&mut rng, TOPOLOGY);
        engine
            .restore_champion(network.parameters().clone(), 42.0, 7)
            .unwrap();
        assert_eq!(engine.generation(), 8);
        assert_eq!(engine.best_fitness(), Some(42.0));
        assert_eq!(engine.champion().map(|c| &c.network), Some(&network));
        assert!(engine.populate(&mut rng).iter().all(|n| n != &network));
    }

    #[test]
    fn test_restore_rejects_corrupt_champion() {
        let mut rng = Pcg32::seed_from_u64(9);
        let mut engine = engine(2);

        let foreign = FixedTopologyNetwork::random(&mut rng, Topology::new(9, 14, 4));
        let err = engine
            .restore_champion(foreign.into_parameters(), 1.0, 3)
            .unwrap_err();
        assert!(matches!(err, CorruptChampion::TopologyMismatch { .. }));

        let mut truncated = FixedTopologyNetwork::random(&mut rng, TOPOLOGY).into_parameters();
        truncated.hidden_to_output.pop();
        let err = engine.restore_champion(truncated, 1.0, 3).unwrap_err();
        assert!(matches!(err, CorruptChampion::WeightCount { .. }));

        assert_eq!(engine.generation(), 1);
        assert!(engine.champion().is_none());
    }

    #[test]
    fn test_restore_rejects_exhausted_generation() {
        let mut rng = Pcg32::seed_from_u64(10);
        let mut engine = engine(2);
        let network = FixedTopologyNetwork::random(&mut rng, TOPOLOGY);

        let err = engine
            .restore_champion(network.parameters().clone(), 1.0, u32::MAX)
            .unwrap_err();
        assert_eq!(
            err,
            CorruptChampion::GenerationExhausted {
                generation: u32::MAX
            }
        );
        assert_eq!(engine.generation(), 1);
        assert!(engine.champion().is_none());

        engine
            .restore_champion(network.parameters().clone(), 1.0, u32::MAX - 1)
            .unwrap();
        assert_eq!(engine.generation(), u32::MAX);
        let networks = engine.populate(&mut rng);
        rank(&mut engine, &networks, &[3.0, 1.0]);
        assert_eq!(engine.generation(), u32::MAX);
    }
}
