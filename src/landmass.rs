// src/landmass.rs
use crate::grid::TileId;
use crate::region::graph::RegionGraph;
use crate::terrain::Terrain;
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, VecDeque};

/// Побережье между двумя массивами (суша/вода)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coastline {
    /// Пара идентификаторов массивов, меньший первым
    pub landmasses: (u32, u32),
    /// Тайлы суши вдоль побережья (без повторов)
    pub land_tiles: Vec<TileId>,
    /// Тайлы воды вдоль побережья (без повторов)
    pub water_tiles: Vec<TileId>,
    /// Местности суши, выходящие к побережью
    pub terrains: BTreeSet<Terrain>,
}

/// Объединяет соседние регионы одного класса (вода / суша) в массивы.
///
/// Идентификаторы выдаются в порядке обнаружения, начиная с региона 0.
#[must_use]
pub fn group_landmasses(regions: &RegionGraph, terrains: &[Terrain]) -> Vec<u32> {
    let count = regions.region_count();
    let mut landmass: Vec<Option<u32>> = vec![None; count];
    let mut next_id = 0;
    let mut queue = VecDeque::new();

    for start in 0..count {
        if landmass[start].is_some() {
            continue;
        }
        landmass[start] = Some(next_id);
        queue.push_back(start as u32);
        let is_water = terrains[start].is_water();

        while let Some(region) = queue.pop_front() {
            for n in regions.neighbors(region) {
                if landmass[n as usize].is_none() && terrains[n as usize].is_water() == is_water {
                    landmass[n as usize] = Some(next_id);
                    queue.push_back(n);
                }
            }
        }
        next_id += 1;
    }

    landmass.into_iter().map(|l| l.unwrap_or(0)).collect()
}

/// Собирает побережья по граничным парам тайлов, лежащим в разных массивах.
///
/// Тайлы каждого побережья отсортированы и без повторов.
#[must_use]
pub fn build_coastlines(
    border_tiles: &[(TileId, TileId)],
    tile_regions: &[u32],
    region_landmass: &[u32],
    terrains: &[Terrain],
) -> Vec<Coastline> {
    let mut coasts: BTreeMap<(u32, u32), Coastline> = BTreeMap::new();

    for &(a, b) in border_tiles {
        let (ra, rb) = (tile_regions[a] as usize, tile_regions[b] as usize);
        let (la, lb) = (region_landmass[ra], region_landmass[rb]);
        if la == lb {
            continue;
        }
        // Соседние массивы всегда разного класса, поэтому ровно одна сторона суша
        let (land, water, land_region) = if terrains[ra].is_water() {
            (b, a, rb)
        } else {
            (a, b, ra)
        };
        let key = if la < lb { (la, lb) } else { (lb, la) };
        let coast = coasts.entry(key).or_insert_with(|| Coastline {
            landmasses: key,
            land_tiles: Vec::new(),
            water_tiles: Vec::new(),
            terrains: BTreeSet::new(),
        });
        coast.land_tiles.push(land);
        coast.water_tiles.push(water);
        coast.terrains.insert(terrains[land_region]);
    }

    coasts
        .into_values()
        .map(|mut coast| {
            coast.land_tiles.sort_unstable();
            coast.land_tiles.dedup();
            coast.water_tiles.sort_unstable();
            coast.water_tiles.dedup();
            coast
        })
        .collect()
}

/// Перемешивает тайлы суши каждого побережья
pub fn shuffle_coastlines(coastlines: &mut [Coastline], rng: &mut impl Rng) {
    for coast in coastlines {
        coast.land_tiles.shuffle(rng);
    }
}
