use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Ticks before a round ends by timeout
    pub round_time_limit: u32,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            round_time_limit: 3600,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum SchedulerState {
    Idle,
    RoundActive,
    RoundEnding,
    Stopped,
}

/// What the scheduler needs to know about the world after a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickStatus {
    Training { alive_ai: usize },
    Interactive { human_alive: bool, alive_opponents: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::IsVariant)]
pub enum RoundEndReason {
    #[display("timeout")]
    Timeout,
    #[display("extinction")]
    Extinction,
    #[display("human defeated")]
    HumanDefeated,
    #[display("opponents eliminated")]
    OpponentsEliminated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundEnd {
    pub reason: RoundEndReason,
    /// Ticks the round lasted
    pub elapsed: u32,
}

/// Decides when a round is over.
///
/// The scheduler is a pure step function: it is told about every tick and never looks at
/// the clock, so rounds behave the same whether ticks are run in real time or fast-forwarded.
///
/// ```text
/// Idle --start--> RoundActive --observe_tick--> RoundEnding --begin_next_round--> RoundActive
///                   (any state but Stopped) --restart_round--> RoundActive
///                          (any state) --stop--> Stopped
/// ```
#[derive(Debug, Clone)]
pub struct RoundScheduler {
    config: SchedulerConfig,
    state: SchedulerState,
    elapsed: u32,
}

impl RoundScheduler {
    #[must_use]
    pub fn new(config: SchedulerConfig) -> Self {
        Self {
            config,
            state: SchedulerState::Idle,
            elapsed: 0,
        }
    }

    #[must_use]
    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    #[must_use]
    pub fn state(&self) -> SchedulerState {
        self.state
    }

    /// Ticks elapsed in the current round.
    #[must_use]
    pub fn elapsed(&self) -> u32 {
        self.elapsed
    }

    /// Starts the first round. Has no effect unless idle.
    pub fn start(&mut self) {
        if self.state.is_idle() {
            self.enter_round();
        }
    }

    /// Records one finished tick and reports whether the round is over.
    ///
    /// Extinction and defeat take precedence over a timeout reached on the same tick.
    /// Returns `None` without counting the tick unless a round is active.
    pub fn observe_tick(&mut self, status: TickStatus) -> Option<RoundEnd> {
        if !self.state.is_round_active() {
            return None;
        }
        self.elapsed += 1;

        let reason = match status {
            TickStatus::Training { alive_ai } if alive_ai <= 1 => Some(RoundEndReason::Extinction),
            TickStatus::Interactive {
                human_alive: false, ..
            } => Some(RoundEndReason::HumanDefeated),
            TickStatus::Interactive {
                alive_opponents: 0, ..
            } => Some(RoundEndReason::OpponentsEliminated),
            _ if self.elapsed >= self.config.round_time_limit => Some(RoundEndReason::Timeout),
            _ => None,
        }?;

        self.state = SchedulerState::RoundEnding;
        Some(RoundEnd {
            reason,
            elapsed: self.elapsed,
        })
    }

    /// Starts the next round after one has ended.
    pub fn begin_next_round(&mut self) {
        if self.state.is_round_ending() {
            self.enter_round();
        }
    }

    /// Throws the current round away and starts it over from tick 0.
    ///
    /// Has no effect once stopped.
    pub fn restart_round(&mut self) {
        if !self.state.is_stopped() {
            self.enter_round();
        }
    }

    pub fn stop(&mut self) {
        self.state = SchedulerState::Stopped;
    }

    fn enter_round(&mut self) {
        self.state = SchedulerState::RoundActive;
        self.elapsed = 0;
    }
}
