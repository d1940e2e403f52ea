// src/error.rs
//! Ошибки генерации, загрузки снимков, каталога и конфигурации.

use thiserror::Error;

use crate::grid::TileId;

/// Неудача размещения одного объекта
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlacementError {
    #[error("no valid castle site reachable from tile {start}")]
    NoCastleSite { start: TileId },
}

/// Фатальные нарушения инвариантов генерации.
///
/// Вызывающий код может повторить генерацию с другим сидом.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    #[error("grid width must be positive")]
    EmptyGrid,

    #[error("castle placement failed in quadrant {quadrant}")]
    CastlePlacement {
        quadrant: usize,
        #[source]
        source: PlacementError,
    },

    #[error("no repair path from isolated tile {tile} in region {region}")]
    NoRepairPath { region: u32, tile: TileId },

    #[error("region graph is disconnected during {stage}: region {region} unreachable")]
    DisconnectedRegionGraph { stage: &'static str, region: u32 },
}

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("snapshot I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed snapshot: {0}")]
    Json(#[from] serde_json::Error),

    #[error("inconsistent snapshot: {0}")]
    Inconsistent(String),
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed catalog: {0}")]
    Toml(#[from] toml::de::Error),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed config: {0}")]
    Toml(#[from] toml::de::Error),
}
