// src/world.rs
//! Сгенерированный мир и конвейер генерации
//!
//! Генерация идёт строго по стадиям; каждая уточняет результат предыдущей:
//!
//! 1. Разбиение тайлов на регионы (релаксированная диаграмма Вороного)
//! 2. Графы смежности тайлов и регионов, список граничных пар
//! 3. Высоты и местности регионов
//! 4. Препятствия и восстановление связности
//! 5. Замки и расстояния до замков
//! 6. Массивы суши/воды и побережья
//! 7. Объекты каталога и нейтральные армии
//!
//! Все стадии получают один и тот же генератор случайных чисел явным параметром,
//! поэтому одинаковый сид даёт одинаковый мир. После построения [`World`] не меняется.

use crate::castle::{Castle, castle_distances, place_castles};
use crate::config::GeneratorSettings;
use crate::error::GenerationError;
use crate::grid::{HexGrid, TileId, TileKey};
use crate::landmass::{Coastline, build_coastlines, group_landmasses, shuffle_coastlines};
use crate::objects::{ObjectCatalog, ObjectPlacer, ObjectRegistry, place_armies};
use crate::obstacles::{avoid_isolated_regions, avoid_isolated_tiles, scatter_obstacles};
use crate::region::graph::{NeighborGraph, RegionGraph};
use crate::region::partition::partition_tiles;
use crate::region::{Region, tiles_by_region};
use crate::terrain::{Terrain, assign_terrains};
use crate::tiles::TileState;
use rand::{Rng, SeedableRng};

#[derive(Debug, Clone, Default)]
pub struct World {
    grid: HexGrid,
    tile_regions: Vec<u32>,
    regions: Vec<Region>,
    tiles: TileState,
    graph: NeighborGraph,
    castles: Vec<Castle>,
    coastlines: Vec<Coastline>,
    objects: ObjectRegistry,
}

/// Сохраняемая часть мира; всё остальное из неё выводится
pub(crate) struct WorldParts {
    pub width: usize,
    pub tile_regions: Vec<u32>,
    pub terrains: Vec<Terrain>,
    pub tiles: TileState,
    pub castles: Vec<Castle>,
    pub castle_distances: Vec<u32>,
    pub objects: ObjectRegistry,
}

/// Все регионы должны быть достижимы друг из друга по графу смежности
fn check_connected(regions: &RegionGraph) -> Result<(), GenerationError> {
    match regions.first_unreachable() {
        Some(region) => Err(GenerationError::DisconnectedRegionGraph {
            stage: "region graph",
            region,
        }),
        None => Ok(()),
    }
}

fn assemble_regions(
    region_tiles: Vec<Vec<TileId>>,
    terrains: &[Terrain],
    landmass: &[u32],
    distances: &[u32],
) -> Vec<Region> {
    region_tiles
        .into_iter()
        .enumerate()
        .map(|(id, tiles)| Region {
            id: id as u32,
            terrain: terrains[id],
            tiles,
            landmass: landmass[id],
            castle_distance: distances[id],
        })
        .collect()
}

impl World {
    /// Генерирует мир с генератором `ChaCha8`, засеянным `settings.seed`
    pub fn generate(
        settings: &GeneratorSettings,
        catalog: &ObjectCatalog,
    ) -> Result<Self, GenerationError> {
        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(settings.seed);
        Self::generate_with_rng(settings, catalog, &mut rng)
    }

    /// Генерирует мир с переданным генератором случайных чисел
    pub fn generate_with_rng(
        settings: &GeneratorSettings,
        catalog: &ObjectCatalog,
        rng: &mut impl Rng,
    ) -> Result<Self, GenerationError> {
        if settings.width == 0 {
            return Err(GenerationError::EmptyGrid);
        }
        let grid = HexGrid::new(settings.width);

        let partition = partition_tiles(&grid, &settings.partition, rng);
        let region_count = partition.region_count;
        let tile_regions = partition.tile_regions;
        log::info!(
            "partitioned {}x{} grid into {region_count} regions",
            grid.width(),
            grid.width()
        );

        let mut graph = NeighborGraph::build(&grid, &tile_regions, region_count);
        check_connected(graph.regions())?;
        graph.shuffle_border_tiles(rng);
        let terrains = assign_terrains(graph.regions(), rng)?;

        let mut tiles = TileState::new(grid.size());
        let scattered = scatter_obstacles(&grid, &mut tiles, &settings.obstacles, rng);
        let opened = avoid_isolated_regions(
            &graph,
            &tile_regions,
            &mut tiles,
            settings.obstacles.close_boundary_gaps,
        );
        let repaired = avoid_isolated_tiles(&graph, &tile_regions, &mut tiles)?;
        log::info!(
            "obstacles: {scattered} scattered, {opened} cleared on region borders, {repaired} cleared inside regions"
        );

        let castles = place_castles(&grid, &graph, &tile_regions, &mut tiles, rng)?;
        let distances = castle_distances(graph.regions(), &castles)?;
        log::info!("placed {} castles", castles.len());

        let landmass = group_landmasses(graph.regions(), &terrains);
        let mut coastlines =
            build_coastlines(graph.border_tiles(), &tile_regions, &landmass, &terrains);
        shuffle_coastlines(&mut coastlines, rng);

        let region_tiles = tiles_by_region(&tile_regions, region_count);
        let mut objects = ObjectRegistry::default();
        let mut placer = ObjectPlacer::new(
            &grid,
            &graph,
            &tile_regions,
            &region_tiles,
            &terrains,
            &castles,
        );
        let in_regions = placer.place_in_regions(catalog, &mut tiles, &mut objects, rng);
        let on_coasts =
            placer.place_on_coastlines(catalog, &coastlines, &mut tiles, &mut objects, rng);
        let armies = place_armies(
            &grid,
            &graph,
            &tile_regions,
            &terrains,
            &castles,
            &mut tiles,
            &mut objects,
        );
        log::info!(
            "placed {in_regions} region objects, {on_coasts} coastline objects, {} neutral armies",
            armies.len()
        );

        let regions = assemble_regions(region_tiles, &terrains, &landmass, &distances);
        Ok(Self {
            grid,
            tile_regions,
            regions,
            tiles,
            graph,
            castles,
            coastlines,
            objects,
        })
    }

    /// Восстанавливает мир из сохранённых данных: графы и побережья строятся заново
    /// (без перемешивания), остальные стадии не выполняются
    pub(crate) fn from_parts(parts: WorldParts) -> Self {
        let grid = HexGrid::new(parts.width);
        let region_count = parts.terrains.len();
        let graph = NeighborGraph::build(&grid, &parts.tile_regions, region_count);
        let landmass = group_landmasses(graph.regions(), &parts.terrains);
        let coastlines = build_coastlines(
            graph.border_tiles(),
            &parts.tile_regions,
            &landmass,
            &parts.terrains,
        );
        let regions = assemble_regions(
            tiles_by_region(&parts.tile_regions, region_count),
            &parts.terrains,
            &landmass,
            &parts.castle_distances,
        );
        Self {
            grid,
            tile_regions: parts.tile_regions,
            regions,
            tiles: parts.tiles,
            graph,
            castles: parts.castles,
            coastlines,
            objects: parts.objects,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.grid.size() == 0
    }

    #[must_use]
    pub fn grid(&self) -> &HexGrid {
        &self.grid
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.grid.width()
    }

    #[must_use]
    pub fn size(&self) -> usize {
        self.grid.size()
    }

    #[must_use]
    pub fn region_count(&self) -> usize {
        self.regions.len()
    }

    #[must_use]
    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    #[must_use]
    pub fn region(&self, id: u32) -> &Region {
        assert!(
            (id as usize) < self.regions.len(),
            "region {id} is out of range (0..{})",
            self.regions.len()
        );
        &self.regions[id as usize]
    }

    #[must_use]
    pub fn tile_regions(&self) -> &[u32] {
        &self.tile_regions
    }

    #[must_use]
    pub fn tile_state(&self) -> &TileState {
        &self.tiles
    }

    #[must_use]
    pub fn region_of(&self, tile: impl TileKey) -> u32 {
        self.tile_regions[tile.resolve(&self.grid)]
    }

    #[must_use]
    pub fn terrain(&self, tile: impl TileKey) -> Terrain {
        self.regions[self.region_of(tile) as usize].terrain
    }

    #[must_use]
    pub fn is_obstacle(&self, tile: impl TileKey) -> bool {
        self.tiles.obstacle[tile.resolve(&self.grid)]
    }

    #[must_use]
    pub fn is_walkable(&self, tile: impl TileKey) -> bool {
        self.tiles.walkable[tile.resolve(&self.grid)]
    }

    #[must_use]
    pub fn is_occupied(&self, tile: impl TileKey) -> bool {
        self.tiles.occupied[tile.resolve(&self.grid)]
    }

    #[must_use]
    pub fn castles(&self) -> &[Castle] {
        &self.castles
    }

    #[must_use]
    pub fn castle_tiles(&self) -> Vec<TileId> {
        self.castles.iter().map(|c| c.tile).collect()
    }

    #[must_use]
    pub fn objects(&self) -> &ObjectRegistry {
        &self.objects
    }

    #[must_use]
    pub fn object_tiles(&self, name: &str) -> Vec<TileId> {
        self.objects.tiles(name).collect()
    }

    pub fn tile_neighbors(&self, tile: impl TileKey) -> impl Iterator<Item = TileId> + '_ {
        self.graph.tile_neighbors(tile.resolve(&self.grid))
    }

    pub fn region_neighbors(&self, region: u32) -> impl Iterator<Item = u32> + '_ {
        self.graph.regions().neighbors(region)
    }

    #[must_use]
    pub fn are_regions_adjacent(&self, a: u32, b: u32) -> bool {
        self.graph.regions().are_adjacent(a, b)
    }

    #[must_use]
    pub fn castle_distance(&self, region: u32) -> u32 {
        self.region(region).castle_distance
    }

    #[must_use]
    pub fn landmass(&self, region: u32) -> u32 {
        self.region(region).landmass
    }

    #[must_use]
    pub fn coastlines(&self) -> &[Coastline] {
        &self.coastlines
    }

    #[must_use]
    pub fn border_tiles(&self) -> &[(TileId, TileId)] {
        self.graph.border_tiles()
    }
}
