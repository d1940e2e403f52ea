// src/objects/placement.rs
use crate::castle::Castle;
use crate::grid::{HexGrid, TileId};
use crate::landmass::Coastline;
use crate::objects::catalog::{ObjectCatalog, ObjectType};
use crate::objects::registry::ObjectRegistry;
use crate::region::graph::NeighborGraph;
use crate::terrain::Terrain;
use crate::tiles::TileState;
use rand::Rng;
use std::collections::{HashSet, VecDeque};

/// Имя, под которым нейтральные армии хранятся в реестре объектов
pub const NEUTRAL_ARMY: &str = "neutral-army";

/// Радиус зоны контроля армии
pub const ARMY_ZONE_RADIUS: i32 = 2;

/// Количество успехов в `max` независимых испытаниях с вероятностью `probability`%
fn bernoulli_count(max: u32, probability: u8, rng: &mut impl Rng) -> u32 {
    let p = f64::from(probability.min(100)) / 100.0;
    (0..max).filter(|_| rng.gen_bool(p)).count() as u32
}

/// Размещение объектов каталога по регионам и побережьям
pub struct ObjectPlacer<'a> {
    grid: &'a HexGrid,
    graph: &'a NeighborGraph,
    tile_regions: &'a [u32],
    region_tiles: &'a [Vec<TileId>],
    terrains: &'a [Terrain],
    castle_regions: HashSet<u32>,
    village_excluded: Vec<bool>,
}

impl<'a> ObjectPlacer<'a> {
    #[must_use]
    pub fn new(
        grid: &'a HexGrid,
        graph: &'a NeighborGraph,
        tile_regions: &'a [u32],
        region_tiles: &'a [Vec<TileId>],
        terrains: &'a [Terrain],
        castles: &[Castle],
    ) -> Self {
        Self {
            grid,
            graph,
            tile_regions,
            region_tiles,
            terrains,
            castle_regions: castles.iter().map(|c| c.region).collect(),
            village_excluded: vec![false; grid.size()],
        }
    }

    /// Сколько экземпляров типа допускается в регионе
    pub fn allowed_count(&self, object: &ObjectType, region: u32, rng: &mut impl Rng) -> u32 {
        if !object.terrains.contains(self.terrains[region as usize]) {
            return 0;
        }
        let max = if self.castle_regions.contains(&region) {
            object.max_per_castle_region
        } else {
            object.max_per_region
        };
        bernoulli_count(max, object.probability, rng)
    }

    fn is_free(&self, tile: TileId, village: bool, tiles: &TileState) -> bool {
        !tiles.occupied[tile] && tiles.walkable[tile] && !(village && self.village_excluded[tile])
    }

    /// Ближайший к `start` свободный тайл региона.
    ///
    /// Обход в ширину идёт по всем тайлам региона, включая занятые; `None` только
    /// если в регионе не осталось подходящих тайлов.
    fn find_tile(
        &self,
        region: u32,
        start: TileId,
        village: bool,
        tiles: &TileState,
    ) -> Option<TileId> {
        let mut seen = HashSet::from([start]);
        let mut queue = VecDeque::from([start]);
        while let Some(tile) = queue.pop_front() {
            if self.is_free(tile, village, tiles) {
                return Some(tile);
            }
            for n in self.graph.tile_neighbors(tile) {
                if self.tile_regions[n] == region && seen.insert(n) {
                    queue.push_back(n);
                }
            }
        }
        None
    }

    fn claim(
        &mut self,
        object: &ObjectType,
        tile: TileId,
        tiles: &mut TileState,
        registry: &mut ObjectRegistry,
    ) {
        tiles.occupied[tile] = true;
        registry.insert(&object.name, tile);
        if object.village {
            self.village_excluded[tile] = true;
            for n in self.grid.neighbors(tile) {
                self.village_excluded[n] = true;
            }
        }
    }

    /// Размещает объекты каталога во всех регионах. Возвращает число размещённых объектов.
    pub fn place_in_regions(
        &mut self,
        catalog: &ObjectCatalog,
        tiles: &mut TileState,
        registry: &mut ObjectRegistry,
        rng: &mut impl Rng,
    ) -> usize {
        let mut placed = 0;
        for region in 0..self.region_tiles.len() as u32 {
            let members = &self.region_tiles[region as usize];
            for object in &catalog.types {
                let count = self.allowed_count(object, region, rng);
                for _ in 0..count {
                    let start = members[rng.gen_range(0..members.len())];
                    match self.find_tile(region, start, object.village, tiles) {
                        Some(tile) => {
                            self.claim(object, tile, tiles, registry);
                            placed += 1;
                        }
                        None => {
                            log::debug!(
                                "no free tile for `{}` near {start} in region {region}",
                                object.name
                            );
                        }
                    }
                }
            }
        }
        placed
    }

    /// Размещает объекты с лимитом на побережье на тайлах суши вдоль побережий
    pub fn place_on_coastlines(
        &mut self,
        catalog: &ObjectCatalog,
        coastlines: &[Coastline],
        tiles: &mut TileState,
        registry: &mut ObjectRegistry,
        rng: &mut impl Rng,
    ) -> usize {
        let mut placed = 0;
        for coast in coastlines {
            for object in catalog.types.iter().filter(|t| t.max_per_coastline > 0) {
                let count = bernoulli_count(object.max_per_coastline, object.probability, rng);
                for _ in 0..count {
                    let found = coast.land_tiles.iter().copied().find(|&t| {
                        object
                            .terrains
                            .contains(self.terrains[self.tile_regions[t] as usize])
                            && self.is_free(t, object.village, tiles)
                    });
                    let Some(tile) = found else { break };
                    self.claim(object, tile, tiles, registry);
                    placed += 1;
                }
            }
        }
        placed
    }
}

/// Размещает нейтральные армии на границах сухопутных регионов без замков.
///
/// Одна армия на упорядоченную пару регионов; зоны контроля армий не пересекаются.
/// Возвращает тайлы армий в порядке размещения.
pub fn place_armies(
    grid: &HexGrid,
    graph: &NeighborGraph,
    tile_regions: &[u32],
    terrains: &[Terrain],
    castles: &[Castle],
    tiles: &mut TileState,
    registry: &mut ObjectRegistry,
) -> Vec<TileId> {
    let castle_regions: HashSet<u32> = castles.iter().map(|c| c.region).collect();
    let mut claimed = vec![false; grid.size()];
    let mut armed_pairs: HashSet<(u32, u32)> = HashSet::new();
    let mut armies = Vec::new();

    for &(a, b) in graph.border_tiles() {
        let (ra, rb) = (tile_regions[a], tile_regions[b]);
        if terrains[ra as usize].is_water()
            || terrains[rb as usize].is_water()
            || castle_regions.contains(&ra)
            || castle_regions.contains(&rb)
            || armed_pairs.contains(&(ra, rb))
        {
            continue;
        }
        if tiles.occupied[a] || tiles.occupied[b] || !tiles.walkable[a] || !tiles.walkable[b] {
            continue;
        }
        let zone: Vec<TileId> = grid
            .coord(a)
            .disk(ARMY_ZONE_RADIUS)
            .into_iter()
            .filter_map(|c| grid.tile(c))
            .collect();
        if zone.iter().any(|&t| claimed[t]) {
            continue;
        }

        for &t in &zone {
            claimed[t] = true;
        }
        tiles.occupied[a] = true;
        armed_pairs.insert((ra, rb));
        registry.insert(NEUTRAL_ARMY, a);
        armies.push(a);
    }
    armies
}
