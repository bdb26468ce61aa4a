//! Fitness accounting.
//!
//! Fitness only ranks agents against each other at the end of a round, so the reward values
//! are relative: what matters is that kills outweigh pickups, pickups outweigh survival time,
//! and walking into walls or standing still costs something.

use brawlnet_engine::{Agent, AgentEventKind, core::geometry::Vec2};

use crate::config::{CampingConfig, RewardTable};

/// Something worth a fitness delta.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum FitnessEvent {
    Survived,
    Moved,
    Blocked,
    ItemPickup,
    DealtDamage,
    Kill,
    Camping,
}

impl From<&AgentEventKind> for FitnessEvent {
    fn from(kind: &AgentEventKind) -> Self {
        match kind {
            AgentEventKind::Survived => Self::Survived,
            AgentEventKind::Moved => Self::Moved,
            AgentEventKind::Blocked => Self::Blocked,
            AgentEventKind::PickedUp(_) => Self::ItemPickup,
            AgentEventKind::DealtDamage { .. } => Self::DealtDamage,
            AgentEventKind::Killed { .. } => Self::Kill,
        }
    }
}

impl RewardTable {
    #[must_use]
    pub fn reward(&self, event: FitnessEvent) -> f32 {
        match event {
            FitnessEvent::Survived => self.survived,
            FitnessEvent::Moved => self.moved,
            FitnessEvent::Blocked => self.blocked,
            FitnessEvent::ItemPickup => self.item_pickup,
            FitnessEvent::DealtDamage => self.dealt_damage,
            FitnessEvent::Kill => self.kill,
            FitnessEvent::Camping => self.camping,
        }
    }
}

/// Adds the reward for `event` to the agent's fitness.
pub fn apply_fitness_delta(agent: &mut Agent, event: FitnessEvent, rewards: &RewardTable) {
    agent.fitness += rewards.reward(event);
}

/// Detects agents that stay in one spot for too long.
#[derive(Debug, Clone, PartialEq)]
pub struct CampingMonitor {
    anchor: Vec2,
    idle_ticks: u32,
}

impl CampingMonitor {
    #[must_use]
    pub fn new(position: Vec2) -> Self {
        Self {
            anchor: position,
            idle_ticks: 0,
        }
    }

    /// Records one tick at `position`; returns `true` when the agent should be penalized.
    pub fn observe(&mut self, position: Vec2, config: &CampingConfig) -> bool {
        if self.anchor.distance(position) >= config.epsilon {
            *self = Self::new(position);
            return false;
        }
        self.idle_ticks += 1;
        if self.idle_ticks > config.window {
            *self = Self::new(position);
            return true;
        }
        false
    }
}
