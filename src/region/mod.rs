pub mod graph;
pub mod partition;

use crate::grid::TileId;
use crate::terrain::Terrain;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub id: u32,
    pub terrain: Terrain,
    /// тайлы региона в порядке возрастания индекса
    pub tiles: Vec<TileId>,
    pub landmass: u32,
    /// число переходов между регионами до ближайшего замка (0, если замок в самом регионе)
    pub castle_distance: u32,
}

/// Списки тайлов по регионам
#[must_use]
pub fn tiles_by_region(tile_regions: &[u32], region_count: usize) -> Vec<Vec<TileId>> {
    let mut tiles = vec![Vec::new(); region_count];
    for (tile, &r) in tile_regions.iter().enumerate() {
        tiles[r as usize].push(tile);
    }
    tiles
}
