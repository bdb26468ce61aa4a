use serde::{Deserialize, Serialize};

use super::geometry::Vec2;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, derive_more::IsVariant)]
pub enum Tile {
    #[default]
    Floor,
    Wall,
}

/// Column/row coordinates of a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub col: usize,
    pub row: usize,
}

impl Cell {
    #[must_use]
    pub const fn new(col: usize, row: usize) -> Self {
        Self { col, row }
    }
}

/// Wall grid of the arena.
///
/// Everything outside the grid counts as an obstacle, so the playable area is always
/// enclosed even without border walls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileMap {
    cols: usize,
    rows: usize,
    tile_size: usize,
    tiles: Vec<Tile>,
}

impl TileMap {
    #[must_use]
    pub fn new(cols: usize, rows: usize, tile_size: usize) -> Self {
        Self {
            cols,
            rows,
            tile_size,
            tiles: vec![Tile::Floor; cols * rows],
        }
    }

    #[must_use]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[must_use]
    pub fn tile_size(&self) -> usize {
        self.tile_size
    }

    /// Size of the map in pixels.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn bounds(&self) -> Vec2 {
        Vec2::new(
            (self.cols * self.tile_size) as f32,
            (self.rows * self.tile_size) as f32,
        )
    }

    #[must_use]
    pub fn tile(&self, cell: Cell) -> Option<Tile> {
        self.index(cell).map(|i| self.tiles[i])
    }

    pub fn set_tile(&mut self, cell: Cell, tile: Tile) {
        if let Some(i) = self.index(cell) {
            self.tiles[i] = tile;
        }
    }

    /// Tile containing `point`, or `None` outside the grid.
    #[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    #[must_use]
    pub fn cell_at(&self, point: Vec2) -> Option<Cell> {
        if !point.x.is_finite() || !point.y.is_finite() || point.x < 0.0 || point.y < 0.0 {
            return None;
        }
        let size = self.tile_size_f32();
        let cell = Cell::new(
            (point.x / size).floor() as usize,
            (point.y / size).floor() as usize,
        );
        (cell.col < self.cols && cell.row < self.rows).then_some(cell)
    }

    /// Pixel position of the center of `cell`.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn center_of(&self, cell: Cell) -> Vec2 {
        let size = self.tile_size_f32();
        Vec2::new(
            (cell.col as f32 + 0.5) * size,
            (cell.row as f32 + 0.5) * size,
        )
    }

    #[must_use]
    pub fn is_obstacle(&self, point: Vec2) -> bool {
        self.cell_at(point)
            .and_then(|cell| self.tile(cell))
            .is_none_or(|tile| tile.is_wall())
    }

    pub fn free_cells(&self) -> impl Iterator<Item = Cell> + '_ {
        (0..self.rows)
            .flat_map(move |row| (0..self.cols).map(move |col| Cell::new(col, row)))
            .filter(|&cell| self.tile(cell) == Some(Tile::Floor))
    }

    pub fn wall_count(&self) -> usize {
        self.tiles.iter().filter(|t| t.is_wall()).count()
    }

    #[expect(clippy::cast_precision_loss)]
    fn tile_size_f32(&self) -> f32 {
        self.tile_size as f32
    }

    fn index(&self, cell: Cell) -> Option<usize> {
        (cell.col < self.cols && cell.row < self.rows).then(|| cell.row * self.cols + cell.col)
    }
}
