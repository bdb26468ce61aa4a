use rand::{Rng, seq::SliceRandom as _};

use crate::{
    LayoutError,
    core::{
        item::ItemKind,
        tile_map::{Cell, Tile, TileMap},
    },
};

use super::config::ArenaConfig;

/// Static description of an arena: walls, spawn tiles and initial items.
///
/// A layout is the pristine state every round starts from; damage done to the map during a
/// round (bazooka shells) is discarded at the next round start.
#[derive(Debug, Clone, PartialEq)]
pub struct ArenaLayout {
    pub map: TileMap,
    pub player_spawn: Cell,
    pub bot_spawns: Vec<Cell>,
    pub items: Vec<(ItemKind, Cell)>,
}

impl ArenaLayout {
    /// Wall-less layout with a single spawn tile for everyone, mostly useful for tests.
    #[must_use]
    pub fn open(cols: usize, rows: usize, tile_size: usize, spawn: Cell) -> Self {
        Self {
            map: TileMap::new(cols, rows, tile_size),
            player_spawn: spawn,
            bot_spawns: vec![spawn],
            items: vec![],
        }
    }

    /// Generates a random layout: scattered walls, distinct spawn tiles and items.
    pub fn generate<R>(config: &ArenaConfig, rng: &mut R) -> Result<Self, LayoutError>
    where
        R: Rng + ?Sized,
    {
        let ArenaConfig {
            cols,
            rows,
            tile_size,
            wall_density,
            bot_spawn_count,
            item_count,
            ..
        } = *config;
        if cols < 3 || rows < 3 {
            return Err(LayoutError::TooSmall { cols, rows });
        }

        let mut map = TileMap::new(cols, rows, tile_size);
        let density = f64::from(wall_density.clamp(0.0, 1.0));
        for row in 0..rows {
            for col in 0..cols {
                if rng.random_bool(density) {
                    map.set_tile(Cell::new(col, row), Tile::Wall);
                }
            }
        }

        let mut free = map.free_cells().collect::<Vec<_>>();
        free.shuffle(rng);
        let mut free = free.into_iter();

        let player_spawn = free.next().ok_or(LayoutError::NoFreeTile)?;
        let mut bot_spawns = free.by_ref().take(bot_spawn_count.max(1)).collect::<Vec<_>>();
        if bot_spawns.is_empty() {
            bot_spawns.push(player_spawn);
        }
        let items = free
            .take(item_count)
            .map(|cell| (ItemKind::ALL[rng.random_range(0..ItemKind::ALL.len())], cell))
            .collect();

        Ok(Self {
            map,
            player_spawn,
            bot_spawns,
            items,
        })
    }
}
