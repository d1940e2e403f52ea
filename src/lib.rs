pub mod castle;
pub mod config;
pub mod error;
pub mod grid;
pub mod landmass;
pub mod multimap;
pub mod objects;
pub mod obstacles;
pub mod png;
pub mod region;
pub mod snapshot;
pub mod terrain;
pub mod tiles;
pub mod world;

pub use castle::Castle;
pub use config::{GeneratorSettings, ObstacleSettings, PartitionSettings};
pub use error::{CatalogError, ConfigError, GenerationError, PlacementError, SnapshotError};
pub use grid::{Direction, HexCoord, HexGrid, TileId, TileKey};
pub use landmass::Coastline;
pub use objects::{NEUTRAL_ARMY, ObjectCatalog, ObjectRegistry, ObjectType};
pub use region::Region;
pub use snapshot::Snapshot;
pub use terrain::{Terrain, TerrainMask};
pub use world::World;
