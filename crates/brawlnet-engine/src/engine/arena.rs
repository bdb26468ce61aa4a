use std::{f32::consts::TAU, mem};

use rand::{Rng, SeedableRng as _};
use rand_pcg::Pcg32;

use crate::{
    Agent, AgentEvent, AgentEventKind, AgentId, Decision, Pilot, WorldQuery,
    core::{
        geometry::{Vec2, wrap_angle},
        item::{Item, ItemKind},
        projectile::Projectile,
        tile_map::{Cell, Tile, TileMap},
        weapon::{Attack, Weapon},
    },
};

use super::{config::ArenaConfig, layout::ArenaLayout};

/// Items that may appear at random during a round.
const RANDOM_DROPS: [ItemKind; 2] = [ItemKind::Medkit, ItemKind::Pistol];

/// Headless arena simulation.
///
/// The arena owns the population, the map, items and projectiles. It never decides
/// anything on behalf of an agent: decisions come in through [`Arena::act`], and whatever
/// happens is reported as [`AgentEvent`]s.
///
/// # Tick Order
///
/// 1. [`Arena::begin_tick`] - random item drop, projectiles advance and hit
/// 2. [`Arena::act`] once per agent, in population order
///
/// All randomness comes from the arena's own seeded generator, so two arenas built from
/// the same layout and seed evolve identically when fed the same decisions.
#[derive(Debug, Clone)]
pub struct Arena {
    config: ArenaConfig,
    layout: ArenaLayout,
    map: TileMap,
    agents: Vec<Agent>,
    items: Vec<Item>,
    projectiles: Vec<Projectile>,
    rng: Pcg32,
}

impl Arena {
    #[must_use]
    pub fn new(config: ArenaConfig, layout: ArenaLayout, seed: u64) -> Self {
        let map = layout.map.clone();
        Self {
            config,
            layout,
            map,
            agents: vec![],
            items: vec![],
            projectiles: vec![],
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    #[must_use]
    pub fn config(&self) -> &ArenaConfig {
        &self.config
    }

    #[must_use]
    pub fn layout(&self) -> &ArenaLayout {
        &self.layout
    }

    #[must_use]
    pub fn map(&self) -> &TileMap {
        &self.map
    }

    #[must_use]
    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    #[must_use]
    pub fn agent(&self, id: AgentId) -> Option<&Agent> {
        self.agents.get(id.0)
    }

    pub fn agent_mut(&mut self, id: AgentId) -> Option<&mut Agent> {
        self.agents.get_mut(id.0)
    }

    #[must_use]
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    #[must_use]
    pub fn projectiles(&self) -> &[Projectile] {
        &self.projectiles
    }

    /// Living network-driven agents.
    pub fn alive_ai_count(&self) -> usize {
        self.agents
            .iter()
            .filter(|a| a.is_ai() && a.is_alive())
            .count()
    }

    /// The human-controlled agent, if the population has one.
    #[must_use]
    pub fn human(&self) -> Option<&Agent> {
        self.agents.iter().find(|a| a.pilot().is_human())
    }

    /// Starts a new round: restores the map and items from the layout and spawns one agent
    /// per pilot, in order.
    ///
    /// The human (if any) spawns on the player tile; bots cycle through the bot tiles.
    pub fn reset_round<I>(&mut self, pilots: I)
    where
        I: IntoIterator<Item = Pilot>,
    {
        self.map.clone_from(&self.layout.map);
        self.projectiles.clear();
        self.items = self
            .layout
            .items
            .iter()
            .map(|&(kind, cell)| Item::new(kind, self.map.center_of(cell)))
            .collect();

        let mut bot_index = 0;
        let mut agents = vec![];
        for (i, pilot) in pilots.into_iter().enumerate() {
            let cell = if pilot.is_human() {
                self.layout.player_spawn
            } else {
                let spawns = &self.layout.bot_spawns;
                let cell = spawns
                    .get(bot_index % spawns.len().max(1))
                    .copied()
                    .unwrap_or(self.layout.player_spawn);
                bot_index += 1;
                cell
            };
            let angle = self.rng.random_range(0.0..TAU);
            agents.push(Agent::new(
                AgentId(i),
                self.map.center_of(cell),
                angle,
                self.config.max_health,
                pilot,
            ));
        }
        self.agents = agents;
    }

    /// Places an item on the floor.
    pub fn spawn_item(&mut self, kind: ItemKind, position: Vec2) {
        self.items.push(Item::new(kind, position));
    }

    /// World-level part of a tick: random drops, then projectile flight.
    pub fn begin_tick(&mut self, events: &mut Vec<AgentEvent>) {
        self.maybe_drop_item();
        self.advance_projectiles(events);
    }

    /// Applies one agent's decision: rotate, move, fire, then pick up items in reach.
    ///
    /// Dead or unknown agents are ignored.
    pub fn act(&mut self, id: AgentId, decision: &Decision, events: &mut Vec<AgentEvent>) {
        let Some(agent) = self.agents.get_mut(id.0) else {
            return;
        };
        if !agent.is_alive() {
            return;
        }
        events.push(AgentEvent {
            agent: id,
            kind: AgentEventKind::Survived,
        });

        agent.angle = wrap_angle(agent.angle + decision.rotate_delta);
        if decision.is_moving() {
            let target = agent.position + Vec2::new(decision.move_x, decision.move_y);
            let kind = if self.map.is_obstacle(target) {
                AgentEventKind::Blocked
            } else {
                agent.position = target;
                AgentEventKind::Moved
            };
            events.push(AgentEvent { agent: id, kind });
        }

        if decision.wants_to_fire {
            self.fire(id, events);
        }
        self.collect_items(id, events);
    }

    fn maybe_drop_item(&mut self) {
        let chance = f64::from(self.config.item_spawn_chance.clamp(0.0, 1.0));
        if !self.rng.random_bool(chance) {
            return;
        }
        let col = self.rng.random_range(0..self.map.cols());
        let row = self.rng.random_range(0..self.map.rows());
        let kind = RANDOM_DROPS[self.rng.random_range(0..RANDOM_DROPS.len())];
        let cell = Cell::new(col, row);
        if self.map.tile(cell) == Some(Tile::Floor) {
            let position = self.map.center_of(cell);
            self.spawn_item(kind, position);
        }
    }

    fn advance_projectiles(&mut self, events: &mut Vec<AgentEvent>) {
        let mut projectiles = mem::take(&mut self.projectiles);
        projectiles.retain_mut(|p| {
            p.advance();
            if self.map.is_obstacle(p.position) {
                if p.breaches_walls
                    && let Some(cell) = self.map.cell_at(p.position)
                {
                    self.map.set_tile(cell, Tile::Floor);
                }
                return false;
            }
            let reach = self.config.agent_radius + self.config.hit_margin;
            let victims = self
                .agents
                .iter()
                .filter(|a| {
                    a.id() != p.owner
                        && a.is_alive()
                        && a.position.distance(p.position) < reach
                })
                .map(Agent::id)
                .collect::<Vec<_>>();
            for &victim in &victims {
                self.deal_damage(p.owner, victim, p.damage, events);
            }
            victims.is_empty()
        });
        self.projectiles = projectiles;
    }

    fn fire(&mut self, id: AgentId, events: &mut Vec<AgentEvent>) {
        let agent = &mut self.agents[id.0];
        let (position, angle) = (agent.position, agent.angle);
        match agent.weapon.fire() {
            Attack::Melee { damage } => {
                let range = self.config.melee_range;
                let victims = self
                    .agents
                    .iter()
                    .filter(|a| a.id() != id && a.is_alive() && a.position.distance(position) < range)
                    .map(Agent::id)
                    .collect::<Vec<_>>();
                for victim in victims {
                    self.deal_damage(id, victim, damage, events);
                }
            }
            Attack::Shot {
                damage,
                breaches_walls,
            } => {
                self.projectiles.push(Projectile {
                    position,
                    velocity: Vec2::from_angle(angle) * self.config.projectile_speed,
                    damage,
                    owner: id,
                    breaches_walls,
                });
            }
        }
    }

    fn deal_damage(
        &mut self,
        attacker: AgentId,
        victim: AgentId,
        amount: f32,
        events: &mut Vec<AgentEvent>,
    ) {
        let Some(target) = self.agents.get_mut(victim.0) else {
            return;
        };
        let killed = target.take_damage(amount);
        events.push(AgentEvent {
            agent: attacker,
            kind: AgentEventKind::DealtDamage { victim, amount },
        });
        if killed {
            tracing::debug!(%attacker, %victim, "agent killed");
            events.push(AgentEvent {
                agent: attacker,
                kind: AgentEventKind::Killed { victim },
            });
        }
    }

    fn collect_items(&mut self, id: AgentId, events: &mut Vec<AgentEvent>) {
        let agent = &mut self.agents[id.0];
        let reach = self.config.agent_radius + self.config.pickup_margin;
        for item in &mut self.items {
            if !item.active || item.position.distance(agent.position) >= reach {
                continue;
            }
            item.active = false;
            match item.kind.weapon() {
                Some(kind) => agent.weapon = Weapon::new(kind),
                None => {
                    agent.health = (agent.health + self.config.medkit_heal).min(self.config.max_health);
                }
            }
            events.push(AgentEvent {
                agent: id,
                kind: AgentEventKind::PickedUp(item.kind),
            });
        }
    }
}

impl WorldQuery for Arena {
    fn bounds(&self) -> Vec2 {
        self.map.bounds()
    }

    fn is_obstacle(&self, x: f32, y: f32) -> bool {
        self.map.is_obstacle(Vec2::new(x, y))
    }

    fn nearest_opponent(&self, agent: &Agent) -> Option<&Agent> {
        self.agents
            .iter()
            .filter(|other| other.id() != agent.id() && other.is_alive())
            .min_by(|a, b| {
                let da = a.position.distance_squared(agent.position);
                let db = b.position.distance_squared(agent.position);
                da.total_cmp(&db)
            })
    }

    fn nearest_item(&self, agent: &Agent) -> Option<&Item> {
        self.items
            .iter()
            .filter(|item| item.active)
            .min_by(|a, b| {
                let da = a.position.distance_squared(agent.position);
                let db = b.position.distance_squared(agent.position);
                da.total_cmp(&db)
            })
    }
}

#[cfg(test)]
mod tests {
    use brawlnet_brain::network::{FixedTopologyNetwork, Topology};
    use rand::SeedableRng as _;

    use super::*;
    use crate::core::weapon::WeaponKind;

    fn quiet_config() -> ArenaConfig {
        ArenaConfig {
            item_spawn_chance: 0.0,
            ..ArenaConfig::default()
        }
    }

    fn bot(seed: u64) -> Pilot {
        let mut rng = Pcg32::seed_from_u64(seed);
        Pilot::Network(FixedTopologyNetwork::random(&mut rng, Topology::new(2, 2, 2)))
    }

    /// 10x10 open arena of 40px tiles with every agent spawning at tile (2, 2).
    fn open_arena(pilots: Vec<Pilot>) -> Arena {
        let layout = ArenaLayout::open(10, 10, 40, Cell::new(2, 2));
        let mut arena = Arena::new(quiet_config(), layout, 0);
        arena.reset_round(pilots);
        arena
    }

    fn kinds(events: &[AgentEvent], id: AgentId) -> Vec<AgentEventKind> {
        events
            .iter()
            .filter(|e| e.agent == id)
            .map(|e| e.kind)
            .collect()
    }

    #[test]
    fn test_reset_round_spawns_in_order() {
        let arena = open_arena(vec![Pilot::Human, bot(1), bot(2)]);
        assert_eq!(arena.agents().len(), 3);
        assert!(arena.agents()[0].pilot().is_human());
        assert_eq!(arena.alive_ai_count(), 2);
        assert_eq!(arena.human().map(Agent::id), Some(AgentId(0)));
        for (i, agent) in arena.agents().iter().enumerate() {
            assert_eq!(agent.id(), AgentId(i));
            assert_eq!(agent.position, Vec2::new(100.0, 100.0));
            assert!((agent.fitness).abs() < f32::EPSILON);
        }
    }

    #[test]
    fn test_move_and_block() {
        let mut arena = open_arena(vec![bot(1)]);
        let id = AgentId(0);
        let mut events = vec![];

        let step = Decision {
            move_x: 3.0,
            ..Decision::IDLE
        };
        arena.act(id, &step, &mut events);
        assert_eq!(
            kinds(&events, id),
            vec![AgentEventKind::Survived, AgentEventKind::Moved]
        );
        assert_eq!(arena.agents()[0].position, Vec2::new(103.0, 100.0));

        // walk into the outer boundary
        arena.agent_mut(id).unwrap().position = Vec2::new(2.0, 100.0);
        events.clear();
        let back = Decision {
            move_x: -3.0,
            ..Decision::IDLE
        };
        arena.act(id, &back, &mut events);
        assert_eq!(
            kinds(&events, id),
            vec![AgentEventKind::Survived, AgentEventKind::Blocked]
        );
        assert_eq!(arena.agents()[0].position, Vec2::new(2.0, 100.0));
    }

    #[test]
    fn test_dead_agents_do_not_act() {
        let mut arena = open_arena(vec![bot(1)]);
        arena.agent_mut(AgentId(0)).unwrap().take_damage(1000.0);
        let mut events = vec![];
        arena.act(
            AgentId(0),
            &Decision {
                move_x: 3.0,
                ..Decision::IDLE
            },
            &mut events,
        );
        assert!(events.is_empty());
    }

    #[test]
    fn test_melee_kill_credits_attacker() {
        let mut arena = open_arena(vec![bot(1), bot(2)]);
        arena.agent_mut(AgentId(1)).unwrap().health = 10.0;
        let mut events = vec![];
        let swing = Decision {
            wants_to_fire: true,
            ..Decision::IDLE
        };
        arena.act(AgentId(0), &swing, &mut events);
        assert_eq!(
            kinds(&events, AgentId(0)),
            vec![
                AgentEventKind::Survived,
                AgentEventKind::DealtDamage {
                    victim: AgentId(1),
                    amount: 10.0
                },
                AgentEventKind::Killed { victim: AgentId(1) },
            ]
        );
        assert!(!arena.agents()[1].is_alive());
        assert_eq!(arena.alive_ai_count(), 1);
    }

    #[test]
    fn test_projectile_hits_opponent() {
        let mut arena = open_arena(vec![bot(1), bot(2)]);
        {
            let shooter = arena.agent_mut(AgentId(0)).unwrap();
            shooter.weapon = Weapon::new(WeaponKind::Rifle);
            shooter.angle = 0.0;
        }
        arena.agent_mut(AgentId(1)).unwrap().position = Vec2::new(160.0, 100.0);

        let mut events = vec![];
        let shoot = Decision {
            wants_to_fire: true,
            ..Decision::IDLE
        };
        arena.act(AgentId(0), &shoot, &mut events);
        assert_eq!(arena.projectiles().len(), 1);
        assert_eq!(arena.agents()[0].weapon.ammo(), Some(29));

        events.clear();
        for _ in 0..10 {
            arena.begin_tick(&mut events);
        }
        assert!(arena.projectiles().is_empty());
        assert!((arena.agents()[1].health - 60.0).abs() < f32::EPSILON);
        assert_eq!(
            kinds(&events, AgentId(0)),
            vec![AgentEventKind::DealtDamage {
                victim: AgentId(1),
                amount: 40.0
            }]
        );
    }

    #[test]
    fn test_bazooka_breaches_wall() {
        let mut arena = open_arena(vec![bot(1)]);
        let mut layout_map = arena.layout().map.clone();
        layout_map.set_tile(Cell::new(4, 2), Tile::Wall);
        arena.layout.map = layout_map;
        arena.reset_round(vec![bot(1)]);
        assert_eq!(arena.map().tile(Cell::new(4, 2)), Some(Tile::Wall));

        {
            let shooter = arena.agent_mut(AgentId(0)).unwrap();
            shooter.weapon = Weapon::new(WeaponKind::Bazooka);
            shooter.angle = 0.0;
        }
        let mut events = vec![];
        arena.act(
            AgentId(0),
            &Decision {
                wants_to_fire: true,
                ..Decision::IDLE
            },
            &mut events,
        );
        for _ in 0..10 {
            arena.begin_tick(&mut events);
        }
        assert_eq!(arena.map().tile(Cell::new(4, 2)), Some(Tile::Floor));

        // the next round restores the pristine layout
        arena.reset_round(vec![bot(1)]);
        assert_eq!(arena.map().tile(Cell::new(4, 2)), Some(Tile::Wall));
    }

    #[test]
    fn test_item_pickup() {
        let mut arena = open_arena(vec![bot(1)]);
        arena.spawn_item(ItemKind::Pistol, Vec2::new(110.0, 100.0));
        arena.spawn_item(ItemKind::Medkit, Vec2::new(300.0, 300.0));
        arena.agent_mut(AgentId(0)).unwrap().health = 30.0;

        let mut events = vec![];
        arena.act(AgentId(0), &Decision::IDLE, &mut events);
        assert_eq!(
            kinds(&events, AgentId(0)),
            vec![
                AgentEventKind::Survived,
                AgentEventKind::PickedUp(ItemKind::Pistol)
            ]
        );
        assert!(arena.agents()[0].weapon.has_ranged_weapon());
        assert!(!arena.items()[0].active);

        arena.agent_mut(AgentId(0)).unwrap().position = Vec2::new(300.0, 300.0);
        arena.act(AgentId(0), &Decision::IDLE, &mut events);
        assert!((arena.agents()[0].health - 80.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_world_queries() {
        let mut arena = open_arena(vec![bot(1), bot(2), bot(3)]);
        arena.agent_mut(AgentId(1)).unwrap().position = Vec2::new(200.0, 100.0);
        arena.agent_mut(AgentId(2)).unwrap().position = Vec2::new(130.0, 100.0);
        let me = arena.agents()[0].clone();
        assert_eq!(
            arena.nearest_opponent(&me).map(Agent::id),
            Some(AgentId(2))
        );
        arena.agent_mut(AgentId(2)).unwrap().take_damage(1000.0);
        assert_eq!(
            arena.nearest_opponent(&me).map(Agent::id),
            Some(AgentId(1))
        );
        assert!(arena.nearest_item(&me).is_none());
        arena.spawn_item(ItemKind::Rifle, Vec2::new(380.0, 380.0));
        assert_eq!(arena.nearest_item(&me).map(|i| i.kind), Some(ItemKind::Rifle));
        assert!(arena.is_obstacle(-1.0, 10.0));
        assert!(!arena.is_obstacle(10.0, 10.0));
        assert_eq!(arena.bounds(), Vec2::new(400.0, 400.0));
    }

    #[test]
    fn test_random_drops_are_seeded() {
        let config = ArenaConfig {
            item_spawn_chance: 0.5,
            ..ArenaConfig::default()
        };
        let layout = ArenaLayout::open(10, 10, 40, Cell::new(2, 2));
        let mut a = Arena::new(config.clone(), layout.clone(), 99);
        let mut b = Arena::new(config, layout, 99);
        a.reset_round(vec![bot(1)]);
        b.reset_round(vec![bot(1)]);
        let mut events = vec![];
        for _ in 0..50 {
            a.begin_tick(&mut events);
            b.begin_tick(&mut events);
        }
        assert!(!a.items().is_empty());
        assert_eq!(a.items(), b.items());
    }
}
