// src/tiles.rs
use crate::grid::TileId;

/// Флаги тайлов в параллельных массивах.
///
/// Препятствие всегда одновременно занято и непроходимо; объект занимает тайл,
/// но обычно оставляет его проходимым.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TileState {
    pub obstacle: Vec<bool>,
    pub occupied: Vec<bool>,
    pub walkable: Vec<bool>,
}

impl TileState {
    /// Все тайлы свободны и проходимы
    #[must_use]
    pub fn new(size: usize) -> Self {
        Self {
            obstacle: vec![false; size],
            occupied: vec![false; size],
            walkable: vec![true; size],
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.walkable.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.walkable.is_empty()
    }

    pub fn set_obstacle(&mut self, tile: TileId) {
        self.obstacle[tile] = true;
        self.occupied[tile] = true;
        self.walkable[tile] = false;
    }

    pub fn clear_obstacle(&mut self, tile: TileId) {
        if self.obstacle[tile] {
            self.obstacle[tile] = false;
            self.occupied[tile] = false;
            self.walkable[tile] = true;
        }
    }

    /// Проходим ли тайл или его можно расчистить (занят не объектом, а препятствием)
    #[must_use]
    pub fn is_clearable(&self, tile: TileId) -> bool {
        self.walkable[tile] || self.obstacle[tile]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn obstacle_flags_move_together() {
        let mut tiles = TileState::new(3);
        tiles.set_obstacle(1);
        assert!(tiles.obstacle[1] && tiles.occupied[1] && !tiles.walkable[1]);
        tiles.clear_obstacle(1);
        assert!(!tiles.obstacle[1] && !tiles.occupied[1] && tiles.walkable[1]);
    }

    #[test]
    fn clearing_a_non_obstacle_keeps_objects() {
        let mut tiles = TileState::new(2);
        tiles.occupied[0] = true;
        tiles.walkable[0] = false;
        tiles.clear_obstacle(0);
        assert!(tiles.occupied[0]);
        assert!(!tiles.is_clearable(0));
    }
}
