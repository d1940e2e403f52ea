// src/region/partition.rs
use crate::config::PartitionSettings;
use crate::grid::{HexCoord, HexGrid};
use rand::Rng;
#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Центр региона, у которого не осталось тайлов
const INVALID_CENTER: HexCoord = HexCoord::new(-1, -1);

/// Результат разбиения: регион каждого тайла и количество регионов
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition {
    pub tile_regions: Vec<u32>,
    pub region_count: usize,
}

impl Partition {
    /// Количество тайлов в каждом регионе
    #[must_use]
    pub fn region_sizes(&self) -> Vec<usize> {
        let mut sizes = vec![0; self.region_count];
        for &r in &self.tile_regions {
            sizes[r as usize] += 1;
        }
        sizes
    }
}

/// Индекс ближайшего центра; при равенстве побеждает первый в списке
fn nearest_center(coord: HexCoord, centers: &[HexCoord]) -> u32 {
    let mut best = 0;
    let mut best_distance = i32::MAX;
    for (i, &c) in centers.iter().enumerate() {
        let d = coord.distance(c);
        if d < best_distance {
            best_distance = d;
            best = i as u32;
        }
    }
    best
}

fn assign_tiles(grid: &HexGrid, centers: &[HexCoord]) -> Vec<u32> {
    #[cfg(feature = "parallel")]
    let tiles = (0..grid.size()).into_par_iter();
    #[cfg(not(feature = "parallel"))]
    let tiles = 0..grid.size();

    tiles
        .map(|tile| nearest_center(grid.coord(tile), centers))
        .collect()
}

/// Новые центры как покоординатное среднее тайлов региона (с отбрасыванием дробной части)
fn recenter(grid: &HexGrid, tile_regions: &[u32], region_count: usize) -> Vec<HexCoord> {
    let mut sums = vec![(0i64, 0i64, 0i64); region_count];
    for (tile, &r) in tile_regions.iter().enumerate() {
        let c = grid.coord(tile);
        let s = &mut sums[r as usize];
        s.0 += i64::from(c.x);
        s.1 += i64::from(c.y);
        s.2 += 1;
    }
    sums.into_iter()
        .map(|(sx, sy, n)| {
            if n == 0 {
                INVALID_CENTER
            } else {
                HexCoord::new((sx / n) as i32, (sy / n) as i32)
            }
        })
        .collect()
}

/// Перенумеровывает регионы, удаляя пустые
fn prune_empty(tile_regions: &mut [u32], region_count: usize) -> usize {
    let mut sizes = vec![0usize; region_count];
    for &r in tile_regions.iter() {
        sizes[r as usize] += 1;
    }
    let mut remap = vec![u32::MAX; region_count];
    let mut next = 0u32;
    for (r, &size) in sizes.iter().enumerate() {
        if size > 0 {
            remap[r] = next;
            next += 1;
        }
    }
    for r in tile_regions.iter_mut() {
        *r = remap[*r as usize];
    }
    next as usize
}

/// Разбивает сетку на регионы релаксированной диаграммой Вороного.
///
/// Центры выбираются случайно, затем `relaxation_rounds` раз: тайлы назначаются
/// ближайшему центру, центры сдвигаются в среднее своих тайлов, пустые отбрасываются.
/// Финальное назначение замораживается; пустые регионы удаляются и здесь.
pub fn partition_tiles(
    grid: &HexGrid,
    settings: &PartitionSettings,
    rng: &mut impl Rng,
) -> Partition {
    let size = grid.size();
    if size == 0 {
        return Partition {
            tile_regions: Vec::new(),
            region_count: 0,
        };
    }

    let width = grid.width() as i32;
    let mut centers: Vec<HexCoord> = (0..settings.initial_region_count(size))
        .map(|_| HexCoord::new(rng.gen_range(0..width), rng.gen_range(0..width)))
        .collect();

    for round in 0..settings.relaxation_rounds {
        let tile_regions = assign_tiles(grid, &centers);
        let before = centers.len();
        centers = recenter(grid, &tile_regions, centers.len());
        centers.retain(|&c| c != INVALID_CENTER);
        if centers.len() != before {
            log::debug!(
                "relaxation round {round}: dropped {} empty regions",
                before - centers.len()
            );
        }
    }

    let mut tile_regions = assign_tiles(grid, &centers);
    let region_count = prune_empty(&mut tile_regions, centers.len());
    Partition {
        tile_regions,
        region_count,
    }
}
