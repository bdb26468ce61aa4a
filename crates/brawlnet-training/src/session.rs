//! The tick loop tying arena, controller, evolution and scheduler together.
//!
//! A [`Session`] is a pure step function. Every call to [`Session::tick`] advances the world
//! by exactly one step:
//!
//! 1. random item drop and projectile flight
//! 2. each living agent, in population order, decides (network or supplied human decision)
//!    and acts immediately, so later agents see the effects of earlier ones
//! 3. camping checks
//! 4. arena events are turned into fitness
//! 5. the scheduler decides whether the round is over; if so the round is wrapped up
//!    (evolution in training, victory or defeat in interactive play, fitness statistics in
//!    evaluation) and the next round is populated right away
//!
//! All randomness comes from two [`Pcg32`] streams derived from the session seed, one for the
//! arena and one for evolution, so a session is reproducible.

use brawlnet_ai::{config::ControllerConfig, controller::AgentController, fitness::CampingMonitor};
use brawlnet_brain::{CorruptChampion, network::NetworkParameters};
use brawlnet_engine::{
    Agent, AgentEvent, AgentId, Arena, ArenaConfig, ArenaLayout, Decision, LayoutError, Pilot,
};
use rand::{Rng as _, SeedableRng as _};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::{
    evolution::{Contender, EvolutionConfig, EvolutionEngine, GenerationReport},
    scheduler::{RoundEnd, RoundEndReason, RoundScheduler, SchedulerConfig, TickStatus},
    stats::FitnessStats,
};

/// Everything a session can be configured with. Every field is optional in JSON.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub arena: ArenaConfig,
    pub controller: ControllerConfig,
    pub evolution: EvolutionConfig,
    pub scheduler: SchedulerConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum Mode {
    /// Bots only; every round ends with a generation step.
    Training,
    /// A human (agent 0) against unmutated champion clones.
    Interactive,
    /// Unmutated champion clones against each other; the lineage does not evolve.
    Evaluation,
}

#[derive(Debug, Clone, PartialEq, derive_more::IsVariant)]
pub enum RoundOutcome {
    Generation(GenerationReport),
    /// An evaluation round finished; see [`RoundReport::fitness`]
    Evaluated,
    Victory,
    Defeat,
    /// The time limit ran out with the human still alive and opponents left
    Draw,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RoundReport {
    /// 1-based round number within the session
    pub round: u32,
    pub end: RoundEnd,
    pub outcome: RoundOutcome,
    /// Fitness of the AI agents at round end
    pub fitness: Option<FitnessStats>,
}

#[derive(Debug)]
pub struct Session {
    mode: Mode,
    arena: Arena,
    controller: AgentController,
    evolution: EvolutionEngine,
    scheduler: RoundScheduler,
    monitors: Vec<CampingMonitor>,
    evolution_rng: Pcg32,
    events: Vec<AgentEvent>,
    round: u32,
}

impl Session {
    /// Builds a session and populates its first round.
    pub fn new(config: SessionConfig, mode: Mode, seed: u64) -> Result<Self, LayoutError> {
        let SessionConfig {
            arena: arena_config,
            controller: controller_config,
            evolution: evolution_config,
            scheduler: scheduler_config,
        } = config;

        let mut seeder = Pcg32::seed_from_u64(seed);
        let layout = ArenaLayout::generate(&arena_config, &mut seeder)?;
        let arena_seed = seeder.random::<u64>();
        let evolution_seed = seeder.random::<u64>();

        let topology = controller_config.topology(evolution_config.hidden_count);
        let controller = AgentController::new(controller_config, arena_config.max_health);
        let evolution = EvolutionEngine::new(evolution_config, topology);

        let mut session = Self {
            mode,
            arena: Arena::new(arena_config, layout, arena_seed),
            controller,
            evolution,
            scheduler: RoundScheduler::new(scheduler_config),
            monitors: vec![],
            evolution_rng: Pcg32::seed_from_u64(evolution_seed),
            events: vec![],
            round: 0,
        };
        session.populate_round();
        session.scheduler.start();
        tracing::debug!(
            ?mode,
            seed,
            %topology,
            walls = session.arena.map().wall_count(),
            "session started"
        );
        Ok(session)
    }

    #[must_use]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    #[must_use]
    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    #[must_use]
    pub fn controller(&self) -> &AgentController {
        &self.controller
    }

    #[must_use]
    pub fn evolution(&self) -> &EvolutionEngine {
        &self.evolution
    }

    #[must_use]
    pub fn scheduler(&self) -> &RoundScheduler {
        &self.scheduler
    }

    #[must_use]
    pub fn generation(&self) -> u32 {
        self.evolution.generation()
    }

    #[must_use]
    pub fn best_fitness(&self) -> Option<f32> {
        self.evolution.best_fitness()
    }

    /// Ticks elapsed in the current round.
    #[must_use]
    pub fn elapsed_ticks(&self) -> u32 {
        self.scheduler.elapsed()
    }

    #[must_use]
    pub fn alive_ai(&self) -> usize {
        self.arena.alive_ai_count()
    }

    /// Current round number, starting at 1.
    #[must_use]
    pub fn round(&self) -> u32 {
        self.round
    }

    /// Installs a persisted champion and restarts the current round with its offspring.
    ///
    /// A stopped session only takes the champion over; it keeps its arena and stays stopped.
    /// On error the session is left untouched.
    pub fn restore_champion(
        &mut self,
        parameters: NetworkParameters,
        fitness: f32,
        generation: u32,
    ) -> Result<(), CorruptChampion> {
        self.evolution
            .restore_champion(parameters, fitness, generation)?;
        if self.scheduler.state().is_stopped() {
            return Ok(());
        }
        self.round -= 1;
        self.populate_round();
        self.scheduler.restart_round();
        Ok(())
    }

    /// Keeps up to `max_entries` earlier champions for rollback.
    pub fn retain_history(&mut self, max_entries: usize) {
        self.evolution.retain_history(max_entries);
    }

    /// Ends the session; further ticks do nothing.
    pub fn stop(&mut self) {
        self.scheduler.stop();
    }

    /// Advances the session by one tick.
    ///
    /// `human` steers the human agent in interactive mode; `None` leaves it idle.
    /// Returns a report when this tick ended a round.
    pub fn tick(&mut self, human: Option<Decision>) -> Option<RoundReport> {
        if !self.scheduler.state().is_round_active() {
            return None;
        }
        let mut events = std::mem::take(&mut self.events);
        events.clear();

        self.arena.begin_tick(&mut events);
        for index in 0..self.arena.agents().len() {
            let id = AgentId(index);
            let Some(decision) = self.decide(id, human) else {
                continue;
            };
            self.arena.act(id, &decision, &mut events);
        }

        for (index, monitor) in self.monitors.iter_mut().enumerate() {
            let Some(agent) = self.arena.agent_mut(AgentId(index)) else {
                continue;
            };
            if agent.is_alive() && agent.is_ai() {
                self.controller.check_camping(agent, monitor);
            }
        }
        for event in &events {
            if let Some(agent) = self.arena.agent_mut(event.agent) {
                self.controller.apply_event(agent, &event.kind);
            }
        }
        self.events = events;

        let status = match self.mode {
            Mode::Training | Mode::Evaluation => TickStatus::Training {
                alive_ai: self.arena.alive_ai_count(),
            },
            Mode::Interactive => TickStatus::Interactive {
                human_alive: self.arena.human().is_some_and(Agent::is_alive),
                alive_opponents: self.arena.alive_ai_count(),
            },
        };
        let end = self.scheduler.observe_tick(status)?;
        let report = self.finish_round(end);
        self.populate_round();
        self.scheduler.begin_next_round();
        Some(report)
    }

    /// Runs `n` ticks back to back, with the human (if any) idle.
    pub fn run_ticks(&mut self, n: u32) -> Vec<RoundReport> {
        (0..n).filter_map(|_| self.tick(None)).collect()
    }

    fn decide(&self, id: AgentId, human: Option<Decision>) -> Option<Decision> {
        let agent = self.arena.agent(id)?;
        if !agent.is_alive() {
            return None;
        }
        match agent.pilot() {
            Pilot::Human => Some(human.unwrap_or(Decision::IDLE)),
            Pilot::Network(_) => match self.controller.tick(agent, &self.arena) {
                Ok(decision) => decision,
                Err(error) => {
                    tracing::error!(agent = %id, %error, "network rejected observation");
                    Some(Decision::IDLE)
                }
            },
        }
    }

    fn finish_round(&mut self, end: RoundEnd) -> RoundReport {
        let fitness = FitnessStats::new(
            self.arena
                .agents()
                .iter()
                .filter(|a| a.is_ai())
                .map(|a| a.fitness),
        );
        let outcome = match self.mode {
            Mode::Training => {
                let contenders = self.arena.agents().iter().filter_map(|agent| {
                    agent
                        .network()
                        .map(|network| Contender::new(network, agent.fitness))
                });
                RoundOutcome::Generation(self.evolution.advance_generation(contenders))
            }
            Mode::Evaluation => RoundOutcome::Evaluated,
            Mode::Interactive => match end.reason {
                RoundEndReason::OpponentsEliminated => RoundOutcome::Victory,
                RoundEndReason::HumanDefeated => RoundOutcome::Defeat,
                RoundEndReason::Timeout | RoundEndReason::Extinction => RoundOutcome::Draw,
            },
        };
        tracing::debug!(
            round = self.round,
            reason = %end.reason,
            elapsed = end.elapsed,
            alive_ai = self.arena.alive_ai_count(),
            "round ended"
        );
        RoundReport {
            round: self.round,
            end,
            outcome,
            fitness,
        }
    }

    fn populate_round(&mut self) {
        let size = self.evolution.config().population_size;
        let pilots = match self.mode {
            Mode::Training => self
                .evolution
                .populate(&mut self.evolution_rng)
                .into_iter()
                .map(Pilot::Network)
                .collect::<Vec<_>>(),
            Mode::Evaluation => self
                .evolution
                .populate_opponents(size, &mut self.evolution_rng)
                .into_iter()
                .map(Pilot::Network)
                .collect(),
            Mode::Interactive => {
                let opponents = self
                    .evolution
                    .populate_opponents(size.saturating_sub(1), &mut self.evolution_rng);
                std::iter::once(Pilot::Human)
                    .chain(opponents.into_iter().map(Pilot::Network))
                    .collect()
            }
        };
        self.arena.reset_round(pilots);
        self.monitors = self
            .arena
            .agents()
            .iter()
            .map(|agent| CampingMonitor::new(agent.position))
            .collect();
        self.round += 1;
    }
}
