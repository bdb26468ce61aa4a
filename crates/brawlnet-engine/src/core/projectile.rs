use super::geometry::Vec2;
use crate::AgentId;

#[derive(Debug, Clone, PartialEq)]
pub struct Projectile {
    pub position: Vec2,
    pub velocity: Vec2,
    pub damage: f32,
    pub owner: AgentId,
    /// Destroys the wall tile it hits instead of just stopping.
    pub breaches_walls: bool,
}

impl Projectile {
    pub fn advance(&mut self) {
        self.position += self.velocity;
    }
}
