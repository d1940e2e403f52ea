// src/snapshot.rs
//! Снимок мира в JSON
//!
//! В снимок попадает только то, что нельзя дёшево вывести заново: принадлежность
//! тайлов регионам, местности регионов, флаги тайлов, замки, расстояния до замков и
//! реестр объектов. Графы смежности, массивы и побережья перестраиваются при загрузке.
//!
//! Флаги тайлов хранятся как `0`/`1`, местности как стабильные коды [`Terrain::code`].

use crate::castle::Castle;
use crate::error::SnapshotError;
use crate::grid::TileId;
use crate::objects::ObjectRegistry;
use crate::terrain::Terrain;
use crate::tiles::TileState;
use crate::world::{World, WorldParts};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Snapshot {
    pub tile_regions: Vec<u32>,
    pub region_terrain: Vec<u8>,
    pub tile_obstacles: Vec<u8>,
    pub tile_occupied: Vec<u8>,
    pub tile_walkable: Vec<u8>,
    pub castles: Vec<TileId>,
    pub region_castle_distance: Vec<u32>,
    pub objects: BTreeMap<String, Vec<TileId>>,
}

fn flags_to_ints(flags: &[bool]) -> Vec<u8> {
    flags.iter().map(|&f| u8::from(f)).collect()
}

fn ints_to_flags(name: &str, ints: &[u8], size: usize) -> Result<Vec<bool>, SnapshotError> {
    if ints.len() != size {
        return Err(SnapshotError::Inconsistent(format!(
            "`{name}` has {} entries, expected {size}",
            ints.len()
        )));
    }
    ints.iter()
        .enumerate()
        .map(|(tile, &v)| match v {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(SnapshotError::Inconsistent(format!(
                "`{name}` has value {other} at tile {tile}"
            ))),
        })
        .collect()
}

fn check_tile(what: &str, tile: TileId, size: usize) -> Result<(), SnapshotError> {
    if tile < size {
        Ok(())
    } else {
        Err(SnapshotError::Inconsistent(format!(
            "{what} refers to tile {tile} outside the grid of {size} tiles"
        )))
    }
}

impl Snapshot {
    #[must_use]
    pub fn from_world(world: &World) -> Self {
        let tiles = world.tile_state();
        Self {
            tile_regions: world.tile_regions().to_vec(),
            region_terrain: world.regions().iter().map(|r| r.terrain.code()).collect(),
            tile_obstacles: flags_to_ints(&tiles.obstacle),
            tile_occupied: flags_to_ints(&tiles.occupied),
            tile_walkable: flags_to_ints(&tiles.walkable),
            castles: world.castle_tiles(),
            region_castle_distance: world.regions().iter().map(|r| r.castle_distance).collect(),
            objects: world
                .objects()
                .iter()
                .map(|(name, tiles)| (name.to_string(), tiles.iter().copied().collect()))
                .collect(),
        }
    }

    /// Проверяет согласованность и собирает мир
    pub fn into_world(self) -> Result<World, SnapshotError> {
        let size = self.tile_regions.len();
        let width = size.isqrt();
        if width * width != size {
            return Err(SnapshotError::Inconsistent(format!(
                "{size} tiles do not form a square grid"
            )));
        }

        let region_count = self.region_terrain.len();
        let terrains = self
            .region_terrain
            .iter()
            .enumerate()
            .map(|(region, &code)| {
                Terrain::from_code(code).ok_or_else(|| {
                    SnapshotError::Inconsistent(format!(
                        "region {region} has unknown terrain code {code}"
                    ))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        let mut region_sizes = vec![0usize; region_count];
        for (tile, &region) in self.tile_regions.iter().enumerate() {
            let Some(count) = region_sizes.get_mut(region as usize) else {
                return Err(SnapshotError::Inconsistent(format!(
                    "tile {tile} belongs to region {region}, but only {region_count} regions exist"
                )));
            };
            *count += 1;
        }
        if let Some(region) = region_sizes.iter().position(|&n| n == 0) {
            return Err(SnapshotError::Inconsistent(format!("region {region} has no tiles")));
        }
        if self.region_castle_distance.len() != region_count {
            return Err(SnapshotError::Inconsistent(format!(
                "`region-castle-distance` has {} entries, expected {region_count}",
                self.region_castle_distance.len()
            )));
        }

        let tiles = TileState {
            obstacle: ints_to_flags("tile-obstacles", &self.tile_obstacles, size)?,
            occupied: ints_to_flags("tile-occupied", &self.tile_occupied, size)?,
            walkable: ints_to_flags("tile-walkable", &self.tile_walkable, size)?,
        };

        let mut castles = Vec::with_capacity(self.castles.len());
        for &tile in &self.castles {
            check_tile("castle", tile, size)?;
            castles.push(Castle {
                tile,
                region: self.tile_regions[tile],
            });
        }

        let mut objects = ObjectRegistry::default();
        for (name, object_tiles) in &self.objects {
            for &tile in object_tiles {
                check_tile(&format!("object `{name}`"), tile, size)?;
                objects.insert(name, tile);
            }
        }

        Ok(World::from_parts(WorldParts {
            width,
            tile_regions: self.tile_regions,
            terrains,
            tiles,
            castles,
            castle_distances: self.region_castle_distance,
            objects,
        }))
    }

    pub fn to_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_str(json)?)
    }
}

impl World {
    /// Сохраняет снимок мира в JSON-файл
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SnapshotError> {
        let json = Snapshot::from_world(self).to_json()?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Загружает мир из JSON-снимка
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SnapshotError> {
        let json = fs::read_to_string(path)?;
        Snapshot::from_json(&json)?.into_world()
    }

    /// Как [`World::load`], но при ошибке пишет её в лог и возвращает пустой мир
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        Self::load(path).unwrap_or_else(|e| {
            log::error!("failed to load world snapshot {}: {e}", path.display());
            Self::default()
        })
    }
}
