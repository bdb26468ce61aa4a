use brawlnet_brain::network::FixedTopologyNetwork;

use crate::core::{geometry::Vec2, weapon::Weapon};

/// Index of an agent within the current round's population.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
#[display("#{_0}")]
pub struct AgentId(pub usize);

/// Who steers an agent.
#[derive(Debug, Clone, derive_more::IsVariant)]
pub enum Pilot {
    /// Driven by decisions supplied from outside the simulation.
    Human,
    /// Driven by its own network.
    Network(FixedTopologyNetwork),
}

#[derive(Debug, Clone)]
pub struct Agent {
    id: AgentId,
    pub position: Vec2,
    /// Facing angle in radians.
    pub angle: f32,
    pub health: f32,
    alive: bool,
    pilot: Pilot,
    pub weapon: Weapon,
    /// Accumulated score for the current round, used only for ranking.
    pub fitness: f32,
}

impl Agent {
    #[must_use]
    pub fn new(id: AgentId, position: Vec2, angle: f32, health: f32, pilot: Pilot) -> Self {
        Self {
            id,
            position,
            angle,
            health,
            alive: true,
            pilot,
            weapon: Weapon::default(),
            fitness: 0.0,
        }
    }

    #[must_use]
    pub fn id(&self) -> AgentId {
        self.id
    }

    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.alive
    }

    #[must_use]
    pub fn pilot(&self) -> &Pilot {
        &self.pilot
    }

    #[must_use]
    pub fn is_ai(&self) -> bool {
        self.pilot.is_network()
    }

    #[must_use]
    pub fn network(&self) -> Option<&FixedTopologyNetwork> {
        match &self.pilot {
            Pilot::Network(network) => Some(network),
            Pilot::Human => None,
        }
    }

    /// Applies damage and reports whether this blow was the killing one.
    pub fn take_damage(&mut self, amount: f32) -> bool {
        if !self.alive {
            return false;
        }
        self.health -= amount;
        if self.health <= 0.0 {
            self.health = 0.0;
            self.alive = false;
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_take_damage_kills_once() {
        let mut agent = Agent::new(AgentId(0), Vec2::ZERO, 0.0, 100.0, Pilot::Human);
        assert!(!agent.take_damage(60.0));
        assert!(agent.is_alive());
        assert!(agent.take_damage(60.0));
        assert!(!agent.is_alive());
        assert!((agent.health).abs() < f32::EPSILON);
        assert!(!agent.take_damage(10.0));
    }
}
