// src/objects/registry.rs
use crate::grid::TileId;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Имя типа объекта → множество занятых им тайлов
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectRegistry {
    objects: BTreeMap<String, BTreeSet<TileId>>,
}

impl ObjectRegistry {
    /// Регистрирует объект; `false`, если тайл уже записан за этим типом
    pub fn insert(&mut self, name: &str, tile: TileId) -> bool {
        self.objects.entry(name.to_string()).or_default().insert(tile)
    }

    pub fn tiles(&self, name: &str) -> impl Iterator<Item = TileId> + '_ {
        self.objects.get(name).into_iter().flatten().copied()
    }

    #[must_use]
    pub fn count(&self, name: &str) -> usize {
        self.objects.get(name).map_or(0, BTreeSet::len)
    }

    #[must_use]
    pub fn contains(&self, name: &str, tile: TileId) -> bool {
        self.objects.get(name).is_some_and(|tiles| tiles.contains(&tile))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.objects.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &BTreeSet<TileId>)> {
        self.objects.iter().map(|(k, v)| (k.as_str(), v))
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.objects.values().map(BTreeSet::len).sum()
    }
}
