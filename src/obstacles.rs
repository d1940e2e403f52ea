// src/obstacles.rs
//! Препятствия и восстановление связности
//!
//! Три прохода:
//! 1. **Рассыпание**: препятствия там, где шум выше порога.
//! 2. **`avoid_isolated_regions`**: у каждой пары соседних регионов должен быть проход через границу.
//! 3. **`avoid_isolated_tiles`**: проходимые тайлы каждого региона образуют одну компоненту связности.
//!
//! Проходы только убирают препятствия, поэтому результат предыдущего прохода не ломается следующим.

use crate::config::ObstacleSettings;
use crate::error::GenerationError;
use crate::grid::{HexGrid, TileId};
use crate::region::graph::NeighborGraph;
use crate::tiles::TileState;
use fastnoise_lite::{FastNoiseLite, NoiseType};
use rand::Rng;
use std::collections::{HashMap, HashSet, VecDeque};

/// Горизонтальный шаг между центрами гексов соседних столбцов
const HEX_COLUMN_STEP: f32 = 0.866;

/// Рассыпает препятствия по шуму. Возвращает количество новых препятствий.
pub fn scatter_obstacles(
    grid: &HexGrid,
    tiles: &mut TileState,
    settings: &ObstacleSettings,
    rng: &mut impl Rng,
) -> usize {
    let mut noise = FastNoiseLite::new();
    noise.set_seed(Some(rng.gen_range(i32::MIN..=i32::MAX)));
    noise.set_noise_type(Some(NoiseType::OpenSimplex2));
    noise.set_frequency(Some(1.0 / settings.feature_size.max(1.0)));

    let mut placed = 0;
    for tile in 0..grid.size() {
        if tiles.occupied[tile] {
            continue;
        }
        // Центр гекса: нечётные столбцы ниже на половину гекса
        let c = grid.coord(tile);
        let px = c.x as f32 * HEX_COLUMN_STEP;
        let py = c.y as f32 + 0.5 * (c.x & 1) as f32;
        if noise.get_noise_2d(px, py) > settings.threshold {
            tiles.set_obstacle(tile);
            placed += 1;
        }
    }
    placed
}

fn region_pair(a: u32, b: u32) -> (u32, u32) {
    if a < b { (a, b) } else { (b, a) }
}

/// Гарантирует проход через границу каждой пары соседних регионов.
///
/// Основной проход идёт по перемешанному списку граничных пар: пара регионов
/// считается связанной, если встретилась пара проходимых тайлов; пара из двух
/// препятствий расчищается. При `close_boundary_gaps` затем расчищается первая
/// подходящая граничная пара у каждой ещё не связанной пары регионов.
///
/// Возвращает количество расчищенных тайлов.
pub fn avoid_isolated_regions(
    graph: &NeighborGraph,
    tile_regions: &[u32],
    tiles: &mut TileState,
    close_boundary_gaps: bool,
) -> usize {
    let mut connected: HashSet<(u32, u32)> = HashSet::new();
    let mut cleared = 0;

    for &(a, b) in graph.border_tiles() {
        let key = region_pair(tile_regions[a], tile_regions[b]);
        if connected.contains(&key) {
            continue;
        }
        if tiles.walkable[a] && tiles.walkable[b] {
            connected.insert(key);
        } else if tiles.obstacle[a] && tiles.obstacle[b] {
            tiles.clear_obstacle(a);
            tiles.clear_obstacle(b);
            cleared += 2;
            connected.insert(key);
        }
    }

    if close_boundary_gaps {
        let mut gaps = 0;
        for &(a, b) in graph.border_tiles() {
            let key = region_pair(tile_regions[a], tile_regions[b]);
            if connected.contains(&key) || !tiles.is_clearable(a) || !tiles.is_clearable(b) {
                continue;
            }
            for t in [a, b] {
                if tiles.obstacle[t] {
                    tiles.clear_obstacle(t);
                    cleared += 1;
                }
            }
            connected.insert(key);
            gaps += 1;
        }
        if gaps > 0 {
            log::debug!("closed {gaps} region boundaries left blocked by the main pass");
        }
    }

    cleared
}

/// Обход проходимых тайлов региона от `start`, помечает достигнутые в `visited`
fn explore(
    graph: &NeighborGraph,
    tile_regions: &[u32],
    tiles: &TileState,
    visited: &mut [bool],
    start: TileId,
) {
    let region = tile_regions[start];
    let mut queue = VecDeque::new();
    visited[start] = true;
    queue.push_back(start);
    while let Some(t) = queue.pop_front() {
        for n in graph.tile_neighbors(t) {
            if !visited[n] && tiles.walkable[n] && tile_regions[n] == region {
                visited[n] = true;
                queue.push_back(n);
            }
        }
    }
}

/// Кратчайший путь внутри региона от `start` до уже посещённого тайла.
///
/// Путь может идти через препятствия, но не через тайлы, занятые чем-то другим.
/// Возвращает тайлы пути от `start` до найденного посещённого тайла включительно.
fn find_repair_path(
    graph: &NeighborGraph,
    tile_regions: &[u32],
    tiles: &TileState,
    visited: &[bool],
    start: TileId,
) -> Option<Vec<TileId>> {
    let region = tile_regions[start];
    let mut parent: HashMap<TileId, TileId> = HashMap::new();
    let mut queue = VecDeque::new();
    parent.insert(start, start);
    queue.push_back(start);

    while let Some(t) = queue.pop_front() {
        for n in graph.tile_neighbors(t) {
            if parent.contains_key(&n) || tile_regions[n] != region || !tiles.is_clearable(n) {
                continue;
            }
            parent.insert(n, t);
            if visited[n] {
                let mut path = vec![n];
                let mut cur = n;
                while cur != start {
                    cur = parent[&cur];
                    path.push(cur);
                }
                path.reverse();
                return Some(path);
            }
            queue.push_back(n);
        }
    }
    None
}

/// Связывает изолированные проходимые тайлы с остальной частью своего региона.
///
/// Возвращает количество расчищенных препятствий.
pub fn avoid_isolated_tiles(
    graph: &NeighborGraph,
    tile_regions: &[u32],
    tiles: &mut TileState,
) -> Result<usize, GenerationError> {
    let mut visited = vec![false; tiles.len()];
    let mut explored = vec![false; graph.regions().region_count()];
    let mut cleared = 0;

    for tile in 0..tiles.len() {
        if visited[tile] || !tiles.walkable[tile] {
            continue;
        }
        let region = tile_regions[tile];
        if explored[region as usize] {
            let path = find_repair_path(graph, tile_regions, tiles, &visited, tile)
                .ok_or(GenerationError::NoRepairPath { region, tile })?;
            for t in path {
                if tiles.obstacle[t] {
                    tiles.clear_obstacle(t);
                    cleared += 1;
                }
            }
        }
        explored[region as usize] = true;
        explore(graph, tile_regions, tiles, &mut visited, tile);
    }

    Ok(cleared)
}
