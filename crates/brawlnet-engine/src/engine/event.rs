use crate::{AgentId, core::item::ItemKind};

/// Something that happened to an agent during a tick.
///
/// The arena only reports events; turning them into fitness is up to the controller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AgentEvent {
    /// The agent credited with the event.
    pub agent: AgentId,
    pub kind: AgentEventKind,
}

#[derive(Debug, Clone, Copy, PartialEq, derive_more::IsVariant)]
pub enum AgentEventKind {
    /// The agent was alive at the start of its turn.
    Survived,
    Moved,
    /// The agent tried to move into an obstacle.
    Blocked,
    PickedUp(ItemKind),
    DealtDamage { victim: AgentId, amount: f32 },
    Killed { victim: AgentId },
}
