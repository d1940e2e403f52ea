// src/castle.rs
use crate::error::{GenerationError, PlacementError};
use crate::grid::{Direction, HexGrid, TileId};
use crate::region::graph::{NeighborGraph, RegionGraph};
use crate::tiles::TileState;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Радиус шестиугольного «пятна» замка
pub const CASTLE_FOOTPRINT_RADIUS: i32 = 2;

/// Количество четвертей карты (по замку на каждую)
pub const QUADRANTS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Castle {
    pub tile: TileId,
    pub region: u32,
}

/// Случайный тайл внутри четверти карты
fn random_tile_in_quadrant(grid: &HexGrid, quadrant: usize, rng: &mut impl Rng) -> TileId {
    let width = grid.width();
    let half = width / 2;
    let span = |part: usize| {
        let lo = if part == 0 { 0 } else { half };
        let hi = if part == 0 { half } else { width };
        (lo.min(width - 1), hi.max(lo + 1).min(width))
    };
    let (x_lo, x_hi) = span(quadrant % 2);
    let (y_lo, y_hi) = span(quadrant / 2);
    let x = rng.gen_range(x_lo..x_hi);
    let y = rng.gen_range(y_lo..y_hi);
    y * width + x
}

/// Можно ли поставить замок с центром в `tile`
fn is_castle_site(
    grid: &HexGrid,
    regions: &RegionGraph,
    tile_regions: &[u32],
    tiles: &TileState,
    castles: &[Castle],
    tile: TileId,
) -> bool {
    let region = tile_regions[tile];
    if castles
        .iter()
        .any(|c| c.region == region || regions.are_adjacent(c.region, region))
    {
        return false;
    }
    grid.coord(tile)
        .disk(CASTLE_FOOTPRINT_RADIUS)
        .into_iter()
        .all(|c| match grid.tile(c) {
            Some(t) => tile_regions[t] == region && !tiles.occupied[t],
            None => false,
        })
}

/// Ищет место для замка обходом в ширину от `start`; первый подходящий тайл выигрывает
pub fn find_castle_site(
    grid: &HexGrid,
    graph: &NeighborGraph,
    tile_regions: &[u32],
    tiles: &TileState,
    castles: &[Castle],
    start: TileId,
) -> Result<TileId, PlacementError> {
    let mut seen = vec![false; grid.size()];
    let mut queue = VecDeque::new();
    seen[start] = true;
    queue.push_back(start);

    while let Some(tile) = queue.pop_front() {
        if is_castle_site(grid, graph.regions(), tile_regions, tiles, castles, tile) {
            return Ok(tile);
        }
        for n in graph.tile_neighbors(tile) {
            if !seen[n] {
                seen[n] = true;
                queue.push_back(n);
            }
        }
    }
    Err(PlacementError::NoCastleSite { start })
}

/// Занимает пятно замка; пять соседей центра, кроме южного, становятся непроходимыми
fn build_castle(grid: &HexGrid, tiles: &mut TileState, center: TileId) {
    for c in grid.coord(center).disk(CASTLE_FOOTPRINT_RADIUS) {
        if let Some(t) = grid.tile(c) {
            tiles.occupied[t] = true;
        }
    }
    for direction in Direction::ALL {
        if direction == Direction::South {
            continue;
        }
        if let Some(t) = grid.neighbor(center, direction) {
            tiles.walkable[t] = false;
        }
    }
}

/// Ставит по замку в каждую четверть карты; регионы замков попарно не соседствуют
pub fn place_castles(
    grid: &HexGrid,
    graph: &NeighborGraph,
    tile_regions: &[u32],
    tiles: &mut TileState,
    rng: &mut impl Rng,
) -> Result<Vec<Castle>, GenerationError> {
    let mut castles: Vec<Castle> = Vec::with_capacity(QUADRANTS);
    for quadrant in 0..QUADRANTS {
        let start = random_tile_in_quadrant(grid, quadrant, rng);
        let tile = find_castle_site(grid, graph, tile_regions, tiles, &castles, start)
            .map_err(|source| GenerationError::CastlePlacement { quadrant, source })?;
        build_castle(grid, tiles, tile);
        log::debug!("castle {quadrant} at tile {tile} (region {})", tile_regions[tile]);
        castles.push(Castle {
            tile,
            region: tile_regions[tile],
        });
    }
    Ok(castles)
}

/// Расстояние в переходах между регионами до ближайшего региона с замком.
///
/// Многоисточниковый обход в ширину от всех регионов с замками.
pub fn castle_distances(
    regions: &RegionGraph,
    castles: &[Castle],
) -> Result<Vec<u32>, GenerationError> {
    let mut distance: Vec<Option<u32>> = vec![None; regions.region_count()];
    let mut queue = VecDeque::new();
    for castle in castles {
        if distance[castle.region as usize].is_none() {
            distance[castle.region as usize] = Some(0);
            queue.push_back(castle.region);
        }
    }

    while let Some(region) = queue.pop_front() {
        let next = distance[region as usize].map_or(0, |d| d + 1);
        for n in regions.neighbors(region) {
            if distance[n as usize].is_none() {
                distance[n as usize] = Some(next);
                queue.push_back(n);
            }
        }
    }

    distance
        .into_iter()
        .enumerate()
        .map(|(region, d)| {
            d.ok_or(GenerationError::DisconnectedRegionGraph {
                stage: "castle distance",
                region: region as u32,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::HexCoord;
    use rand::SeedableRng;

    fn columns(width: usize, bands: usize) -> (HexGrid, Vec<u32>, NeighborGraph) {
        let grid = HexGrid::new(width);
        let band = width / bands;
        let regions: Vec<u32> = (0..grid.size())
            .map(|t| ((grid.coord(t).x as usize / band).min(bands - 1)) as u32)
            .collect();
        let graph = NeighborGraph::build(&grid, &regions, bands);
        (grid, regions, graph)
    }

    #[test]
    fn castle_footprint_marks_occupied_and_opens_south() {
        let (grid, regions, graph) = columns(9, 1);
        let mut tiles = TileState::new(grid.size());
        let start = grid.tile_at(HexCoord::new(4, 4));
        let site = find_castle_site(&grid, &graph, &regions, &tiles, &[], start).unwrap();
        assert_eq!(site, start);

        build_castle(&grid, &mut tiles, site);
        assert_eq!(tiles.occupied.iter().filter(|&&o| o).count(), 19);
        assert!(tiles.walkable[site]);
        assert!(tiles.walkable[grid.south(site).unwrap()]);
        let blocked = grid.neighbors(site).filter(|&n| !tiles.walkable[n]).count();
        assert_eq!(blocked, 5);
    }

    #[test]
    fn footprint_must_stay_on_grid_and_in_region() {
        let (grid, regions, graph) = columns(9, 1);
        let tiles = TileState::new(grid.size());
        let corner = grid.tile_at(HexCoord::new(0, 0));
        let site = find_castle_site(&grid, &graph, &regions, &tiles, &[], corner).unwrap();
        let c = grid.coord(site);
        assert!(c.x >= 2 && c.y >= 2 && c.x <= 6 && c.y <= 6);
    }

    #[test]
    fn adjacent_regions_cannot_both_host_castles() {
        // Три полосы: 0 и 2 не соседствуют, 1 соседствует с обеими
        let (grid, regions, graph) = columns(15, 3);
        let tiles = TileState::new(grid.size());
        let first = Castle {
            tile: grid.tile_at(HexCoord::new(2, 7)),
            region: 0,
        };
        let start = grid.tile_at(HexCoord::new(7, 7));
        let site = find_castle_site(&grid, &graph, &regions, &tiles, &[first], start).unwrap();
        assert_eq!(regions[site], 2);

        let second = Castle {
            tile: site,
            region: 2,
        };
        let err = find_castle_site(&grid, &graph, &regions, &tiles, &[first, second], start);
        assert_eq!(err, Err(PlacementError::NoCastleSite { start }));
    }

    #[test]
    fn distances_count_region_hops() {
        let mut graph = RegionGraph::new(5);
        for (a, b) in [(0, 1), (1, 2), (2, 3), (3, 4)] {
            graph.add_edge(a, b);
        }
        let castles = [Castle { tile: 0, region: 0 }, Castle { tile: 9, region: 4 }];
        assert_eq!(castle_distances(&graph, &castles).unwrap(), vec![0, 1, 2, 1, 0]);
    }

    #[test]
    fn unreachable_region_is_fatal() {
        let graph = RegionGraph::new(2);
        let castles = [Castle { tile: 0, region: 0 }];
        assert!(matches!(
            castle_distances(&graph, &castles),
            Err(GenerationError::DisconnectedRegionGraph { region: 1, .. })
        ));
    }

    #[test]
    fn quadrant_start_tiles_fall_in_their_quadrant() {
        let grid = HexGrid::new(10);
        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(4);
        for _ in 0..50 {
            for q in 0..QUADRANTS {
                let c = grid.coord(random_tile_in_quadrant(&grid, q, &mut rng));
                assert_eq!(c.x >= 5, q % 2 == 1);
                assert_eq!(c.y >= 5, q / 2 == 1);
            }
        }
    }
}
