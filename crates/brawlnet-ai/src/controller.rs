use brawlnet_brain::{DimensionMismatch, network::Topology};
use brawlnet_engine::{Agent, AgentEventKind, Decision, WorldQuery};

use crate::{
    config::ControllerConfig,
    decision,
    fitness::{self, CampingMonitor, FitnessEvent},
    observation,
};

/// Senses, decides and scores on behalf of network-driven agents.
///
/// The controller is stateless apart from its configuration; per-agent state (the camping
/// monitor) is owned by the caller, so one controller serves the whole population.
#[derive(Debug, Clone)]
pub struct AgentController {
    config: ControllerConfig,
    max_health: f32,
}

impl AgentController {
    #[must_use]
    pub fn new(config: ControllerConfig, max_health: f32) -> Self {
        Self { config, max_health }
    }

    #[must_use]
    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// Network shape this controller feeds and reads.
    #[must_use]
    pub fn topology(&self, hidden_count: usize) -> Topology {
        self.config.topology(hidden_count)
    }

    #[must_use]
    pub fn build_observation<W>(&self, agent: &Agent, world: &W) -> Vec<f32>
    where
        W: WorldQuery + ?Sized,
    {
        observation::build_observation(agent, world, &self.config.sensors, self.max_health)
    }

    #[must_use]
    pub fn decide(&self, outputs: &[f32]) -> Decision {
        decision::decide(outputs, &self.config.decision)
    }

    /// Runs one agent's sense-think step.
    ///
    /// Returns `None` for dead or human-piloted agents.
    pub fn tick<W>(&self, agent: &Agent, world: &W) -> Result<Option<Decision>, DimensionMismatch>
    where
        W: WorldQuery + ?Sized,
    {
        if !agent.is_alive() {
            return Ok(None);
        }
        let Some(network) = agent.network() else {
            return Ok(None);
        };
        let observation = self.build_observation(agent, world);
        let outputs = network.predict(&observation)?;
        Ok(Some(self.decide(&outputs)))
    }

    pub fn apply_fitness_delta(&self, agent: &mut Agent, event: FitnessEvent) {
        fitness::apply_fitness_delta(agent, event, &self.config.rewards);
    }

    /// Credits an arena event to the agent it names.
    pub fn apply_event(&self, agent: &mut Agent, kind: &AgentEventKind) {
        self.apply_fitness_delta(agent, FitnessEvent::from(kind));
    }

    /// Feeds the agent's position to its camping monitor and applies the penalty when due.
    ///
    /// Returns whether the agent was penalized.
    pub fn check_camping(&self, agent: &mut Agent, monitor: &mut CampingMonitor) -> bool {
        let camping = monitor.observe(agent.position, &self.config.camping);
        if camping {
            tracing::trace!(agent = %agent.id(), "camping penalty");
            self.apply_fitness_delta(agent, FitnessEvent::Camping);
        }
        camping
    }
}

#[cfg(test)]
mod tests {
    use brawlnet_brain::network::FixedTopologyNetwork;
    use brawlnet_engine::{
        AgentId, Arena, ArenaConfig, ArenaLayout, Pilot,
        core::{geometry::Vec2, tile_map::Cell},
    };
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;

    fn controller() -> AgentController {
        AgentController::new(ControllerConfig::default(), 100.0)
    }

    fn arena_with(pilots: Vec<Pilot>) -> Arena {
        let config = ArenaConfig {
            item_spawn_chance: 0.0,
            ..ArenaConfig::default()
        };
        let layout = ArenaLayout::open(10, 10, 40, Cell::new(4, 4));
        let mut arena = Arena::new(config, layout, 0);
        arena.reset_round(pilots);
        arena
    }

    #[test]
    fn test_tick_drives_network_agents_only() {
        let controller = controller();
        let mut rng = Pcg32::seed_from_u64(5);
        let network = FixedTopologyNetwork::random(&mut rng, controller.topology(14));
        let mut arena = arena_with(vec![Pilot::Human, Pilot::Network(network.clone())]);

        let human = arena.agents()[0].clone();
        assert_eq!(controller.tick(&human, &arena).unwrap(), None);

        let bot = arena.agents()[1].clone();
        let observation = controller.build_observation(&bot, &arena);
        let expected = controller.decide(&network.predict(&observation).unwrap());
        assert_eq!(controller.tick(&bot, &arena).unwrap(), Some(expected));

        arena.agent_mut(AgentId(1)).unwrap().take_damage(1000.0);
        let dead = arena.agents()[1].clone();
        assert_eq!(controller.tick(&dead, &arena).unwrap(), None);
    }

    #[test]
    fn test_tick_reports_dimension_mismatch() {
        let controller = controller();
        let mut rng = Pcg32::seed_from_u64(5);
        let network = FixedTopologyNetwork::random(&mut rng, Topology::new(9, 14, 4));
        let arena = arena_with(vec![Pilot::Network(network)]);
        let err = controller.tick(&arena.agents()[0], &arena).unwrap_err();
        assert_eq!(
            err,
            DimensionMismatch {
                expected: 9,
                actual: 12
            }
        );
    }

    #[test]
    fn test_camping_penalty_applies_reward() {
        let config = ControllerConfig {
            camping: crate::config::CampingConfig {
                epsilon: 10.0,
                window: 2,
            },
            ..ControllerConfig::default()
        };
        let controller = AgentController::new(config, 100.0);
        let mut agent = Agent::new(AgentId(0), Vec2::ZERO, 0.0, 100.0, Pilot::Human);
        let mut monitor = CampingMonitor::new(agent.position);
        let penalized = (0..3)
            .filter(|_| controller.check_camping(&mut agent, &mut monitor))
            .count();
        assert_eq!(penalized, 1);
        assert!((agent.fitness + 5.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_apply_event() {
        let controller = controller();
        let mut agent = Agent::new(AgentId(0), Vec2::ZERO, 0.0, 100.0, Pilot::Human);
        controller.apply_event(
            &mut agent,
            &AgentEventKind::DealtDamage {
                victim: AgentId(1),
                amount: 25.0,
            },
        );
        controller.apply_event(&mut agent, &AgentEventKind::Moved);
        assert!((agent.fitness - 1.01).abs() < 1e-5);
    }
}
