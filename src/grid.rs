// src/grid.rs
//! Адресация гексагональной сетки
//!
//! Квадратная сетка `width × width` гексов в offset-координатах:
//! - `x` это столбец, `y` это строка;
//! - нечётные столбцы сдвинуты на половину гекса вниз;
//! - линейный индекс тайла: `y * width + x`.
//!
//! Выход за пределы сетки всегда выражается через `None` (см. [`HexGrid::tile`]),
//! а методы, принимающие индекс тайла, паникуют на некорректном индексе.

use serde::{Deserialize, Serialize};

/// Линейный индекс тайла
pub type TileId = usize;

/// Координата гекса в offset-системе (столбец, строка)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HexCoord {
    pub x: i32,
    pub y: i32,
}

impl HexCoord {
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Осевые координаты `(q, r)`: поправка на сдвиг нечётных столбцов
    #[must_use]
    pub fn axial(self) -> (i32, i32) {
        (self.x, self.y - (self.x - (self.x & 1)) / 2)
    }

    /// Гексагональное расстояние между двумя координатами
    #[must_use]
    pub fn distance(self, other: HexCoord) -> i32 {
        let (q1, r1) = self.axial();
        let (q2, r2) = other.axial();
        let dq = q1 - q2;
        let dr = r1 - r2;
        (dq.abs() + dr.abs() + (dq + dr).abs()) / 2
    }

    /// Соседняя координата в заданном направлении (может лежать вне сетки)
    #[must_use]
    pub fn step(self, direction: Direction) -> HexCoord {
        let offsets = if self.x & 1 == 0 {
            &EVEN_COLUMN_OFFSETS
        } else {
            &ODD_COLUMN_OFFSETS
        };
        let (dx, dy) = offsets[direction as usize];
        HexCoord::new(self.x + dx, self.y + dy)
    }

    /// Все координаты на расстоянии не больше `radius`, включая центр
    #[must_use]
    pub fn disk(self, radius: i32) -> Vec<HexCoord> {
        let mut coords = Vec::new();
        for dx in -radius..=radius {
            for dy in -radius - 1..=radius + 1 {
                let c = HexCoord::new(self.x + dx, self.y + dy);
                if self.distance(c) <= radius {
                    coords.push(c);
                }
            }
        }
        coords
    }
}

/// Шесть направлений гекса (столбцы «вертикальные», поэтому есть север и юг)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    NorthEast,
    SouthEast,
    South,
    SouthWest,
    NorthWest,
    North,
}

impl Direction {
    pub const ALL: [Direction; 6] = [
        Direction::NorthEast,
        Direction::SouthEast,
        Direction::South,
        Direction::SouthWest,
        Direction::NorthWest,
        Direction::North,
    ];
}

// Порядок совпадает с Direction::ALL
const EVEN_COLUMN_OFFSETS: [(i32, i32); 6] = [(1, -1), (1, 0), (0, 1), (-1, 0), (-1, -1), (0, -1)];
const ODD_COLUMN_OFFSETS: [(i32, i32); 6] = [(1, 0), (1, 1), (0, 1), (-1, 1), (-1, 0), (0, -1)];

/// Квадратная гексагональная сетка
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HexGrid {
    width: usize,
}

impl HexGrid {
    #[must_use]
    pub fn new(width: usize) -> Self {
        Self { width }
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Общее количество тайлов (`width²`)
    #[must_use]
    pub fn size(&self) -> usize {
        self.width * self.width
    }

    #[must_use]
    pub fn contains(&self, coord: HexCoord) -> bool {
        coord.x >= 0
            && coord.y >= 0
            && (coord.x as usize) < self.width
            && (coord.y as usize) < self.width
    }

    /// Координата тайла. Паникует, если индекс вне сетки.
    #[must_use]
    pub fn coord(&self, tile: TileId) -> HexCoord {
        assert!(
            tile < self.size(),
            "tile index {tile} is outside the {0}x{0} grid",
            self.width
        );
        HexCoord::new((tile % self.width) as i32, (tile / self.width) as i32)
    }

    /// Индекс тайла по координате или `None` для координаты вне сетки
    #[must_use]
    pub fn tile(&self, coord: HexCoord) -> Option<TileId> {
        self.contains(coord)
            .then(|| coord.y as usize * self.width + coord.x as usize)
    }

    /// Индекс тайла по координате. Паникует для координаты вне сетки.
    #[must_use]
    pub fn tile_at(&self, coord: HexCoord) -> TileId {
        match self.tile(coord) {
            Some(tile) => tile,
            None => panic!(
                "coordinate ({}, {}) is outside the {2}x{2} grid",
                coord.x, coord.y, self.width
            ),
        }
    }

    #[must_use]
    pub fn neighbor(&self, tile: TileId, direction: Direction) -> Option<TileId> {
        self.tile(self.coord(tile).step(direction))
    }

    /// Южный сосед (вход в замок)
    #[must_use]
    pub fn south(&self, tile: TileId) -> Option<TileId> {
        self.neighbor(tile, Direction::South)
    }

    /// Соседи тайла внутри сетки (от трёх до шести)
    pub fn neighbors(&self, tile: TileId) -> impl Iterator<Item = TileId> + '_ {
        let coord = self.coord(tile);
        Direction::ALL
            .into_iter()
            .filter_map(move |d| self.tile(coord.step(d)))
    }

    #[must_use]
    pub fn distance(&self, a: TileId, b: TileId) -> i32 {
        self.coord(a).distance(self.coord(b))
    }
}

/// Способ указать тайл: линейным индексом или координатой.
///
/// Ключ вне сетки считается нарушением контракта и приводит к панике.
pub trait TileKey: Copy + 'static {
    fn resolve(self, grid: &HexGrid) -> TileId;
}

impl TileKey for TileId {
    fn resolve(self, grid: &HexGrid) -> TileId {
        assert!(
            self < grid.size(),
            "tile index {self} is outside the {0}x{0} grid",
            grid.width()
        );
        self
    }
}

impl TileKey for HexCoord {
    fn resolve(self, grid: &HexGrid) -> TileId {
        grid.tile_at(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tile_keys_resolve_to_the_same_tile() {
        let grid = HexGrid::new(6);
        let coord = HexCoord::new(4, 1);
        assert_eq!(coord.resolve(&grid), 10);
        assert_eq!(10usize.resolve(&grid), 10);
    }

    #[test]
    #[should_panic(expected = "outside")]
    fn off_grid_key_panics() {
        let _ = HexCoord::new(6, 0).resolve(&HexGrid::new(6));
    }

    #[test]
    fn index_and_coord_are_a_bijection() {
        let grid = HexGrid::new(7);
        for tile in 0..grid.size() {
            assert_eq!(grid.tile(grid.coord(tile)), Some(tile));
        }
    }

    #[test]
    fn off_grid_is_none() {
        let grid = HexGrid::new(4);
        assert_eq!(grid.tile(HexCoord::new(-1, 0)), None);
        assert_eq!(grid.tile(HexCoord::new(0, 4)), None);
        assert_eq!(grid.tile(HexCoord::new(4, 0)), None);
    }

    #[test]
    #[should_panic(expected = "outside")]
    fn coord_panics_on_bad_index() {
        let _ = HexGrid::new(4).coord(16);
    }

    #[test]
    fn neighbors_are_at_distance_one_and_symmetric() {
        let grid = HexGrid::new(9);
        for tile in 0..grid.size() {
            for n in grid.neighbors(tile) {
                assert_eq!(grid.distance(tile, n), 1);
                assert!(grid.neighbors(n).any(|m| m == tile));
            }
        }
    }

    #[test]
    fn interior_tile_has_six_neighbors() {
        let grid = HexGrid::new(5);
        let center = grid.tile_at(HexCoord::new(2, 2));
        assert_eq!(grid.neighbors(center).count(), 6);
        let corner = grid.tile_at(HexCoord::new(0, 0));
        assert!(grid.neighbors(corner).count() < 6);
    }

    #[test]
    fn south_is_next_row_same_column() {
        let grid = HexGrid::new(5);
        let tile = grid.tile_at(HexCoord::new(3, 1));
        assert_eq!(grid.south(tile), Some(grid.tile_at(HexCoord::new(3, 2))));
        let bottom = grid.tile_at(HexCoord::new(3, 4));
        assert_eq!(grid.south(bottom), None);
    }

    #[test]
    fn disk_sizes_follow_hex_numbers() {
        let c = HexCoord::new(10, 10);
        assert_eq!(c.disk(0).len(), 1);
        assert_eq!(c.disk(1).len(), 7);
        assert_eq!(c.disk(2).len(), 19);
        let odd = HexCoord::new(11, 10);
        assert_eq!(odd.disk(2).len(), 19);
    }
}
