// src/objects/catalog.rs
//! Каталог типов объектов
//!
//! Каталог задаётся внешним файлом: для каждого типа объекта задаются допустимые местности,
//! максимальное количество на регион / регион с замком / побережье и вероятность
//! появления. Формат: TOML с массивом таблиц `[[object]]`:
//!
//! ```toml
//! [[object]]
//! name = "village"
//! terrains = ["grass", "dirt"]
//! per-region = 1
//! per-castle-region = 0
//! probability = 40
//! village = true
//! action = "recruit"
//! ```
//!
//! Некорректные поля не прерывают загрузку: они пропускаются с предупреждением,
//! а запись без имени пропускается целиком.

use crate::error::CatalogError;
use crate::terrain::{Terrain, TerrainMask};
use std::fs;
use std::path::Path;
use toml::Value;

/// Тип объекта, размещаемого на карте
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectType {
    pub name: String,
    pub terrains: TerrainMask,
    pub max_per_region: u32,
    pub max_per_castle_region: u32,
    pub max_per_coastline: u32,
    /// вероятность каждого экземпляра, 0–100
    pub probability: u8,
    /// деревни не ставятся рядом друг с другом
    pub village: bool,
    /// описание действия при посещении (не интерпретируется генератором)
    pub action: Option<String>,
}

impl ObjectType {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            terrains: TerrainMask::ALL,
            max_per_region: 0,
            max_per_castle_region: 0,
            max_per_coastline: 0,
            probability: 100,
            village: false,
            action: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectCatalog {
    pub types: Vec<ObjectType>,
}

impl ObjectCatalog {
    /// Загружает каталог; при ошибке чтения или разбора пишет в лог и возвращает пустой каталог
    #[must_use]
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::from_toml_file(path) {
            Ok(catalog) => catalog,
            Err(e) => {
                log::error!("cannot load object catalog {}: {e}", path.display());
                Self::default()
            }
        }
    }

    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, CatalogError> {
        let table: toml::Table = contents.parse()?;
        let mut types = Vec::new();

        for (key, value) in &table {
            if key != "object" {
                log::warn!("catalog: unknown top-level key `{key}` ignored");
                continue;
            }
            let Some(entries) = value.as_array() else {
                log::warn!("catalog: `object` must be an array of tables");
                continue;
            };
            for (index, entry) in entries.iter().enumerate() {
                match entry.as_table() {
                    Some(fields) => types.extend(parse_entry(index, fields)),
                    None => log::warn!("catalog entry {index}: not a table, skipped"),
                }
            }
        }

        log::debug!("catalog: {} object types", types.len());
        Ok(Self { types })
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ObjectType> {
        self.types.iter().find(|t| t.name == name)
    }
}

fn parse_entry(index: usize, fields: &toml::Table) -> Option<ObjectType> {
    let name = match fields.get("name").and_then(Value::as_str) {
        Some(name) if !name.is_empty() => name,
        _ => {
            log::warn!("catalog entry {index}: missing `name`, skipped");
            return None;
        }
    };
    let mut object = ObjectType::new(name);

    for (key, value) in fields {
        match key.as_str() {
            "name" => {}
            "terrains" => {
                if let Some(mask) = parse_terrains(name, value) {
                    object.terrains = mask;
                }
            }
            "per-region" => set_count(name, key, value, &mut object.max_per_region),
            "per-castle-region" => set_count(name, key, value, &mut object.max_per_castle_region),
            "per-coastline" => set_count(name, key, value, &mut object.max_per_coastline),
            "probability" => match value.as_integer() {
                Some(p) if (0..=100).contains(&p) => object.probability = p as u8,
                Some(p) if p > 100 => {
                    log::warn!("catalog `{name}`: probability {p} clamped to 100");
                    object.probability = 100;
                }
                _ => log::warn!("catalog `{name}`: invalid probability {value}, ignored"),
            },
            "village" => match value.as_bool() {
                Some(v) => object.village = v,
                None => log::warn!("catalog `{name}`: `village` must be a boolean"),
            },
            "action" => match value.as_str() {
                Some(a) => object.action = Some(a.to_string()),
                None => log::warn!("catalog `{name}`: `action` must be a string"),
            },
            other => log::warn!("catalog `{name}`: unknown field `{other}` ignored"),
        }
    }
    Some(object)
}

fn set_count(name: &str, key: &str, value: &Value, target: &mut u32) {
    match value.as_integer().and_then(|v| u32::try_from(v).ok()) {
        Some(v) => *target = v,
        None => log::warn!("catalog `{name}`: `{key}` must be a non-negative integer"),
    }
}

/// Маска местностей: список имён или целое число
fn parse_terrains(name: &str, value: &Value) -> Option<TerrainMask> {
    if let Some(bits) = value.as_integer() {
        return match u32::try_from(bits) {
            Ok(bits) if bits & !TerrainMask::ALL.0 == 0 => Some(TerrainMask(bits)),
            _ => {
                log::warn!("catalog `{name}`: terrain mask {bits} out of range");
                None
            }
        };
    }
    let Some(list) = value.as_array() else {
        log::warn!("catalog `{name}`: `terrains` must be a list or a bitmask");
        return None;
    };
    Some(
        list.iter()
            .filter_map(|v| {
                let terrain = v.as_str().and_then(Terrain::from_name);
                if terrain.is_none() {
                    log::warn!("catalog `{name}`: unknown terrain {v} skipped");
                }
                terrain
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_entry() {
        let catalog = ObjectCatalog::from_toml_str(
            r#"
            [[object]]
            name = "village"
            terrains = ["grass", "Dirt"]
            per-region = 2
            per-castle-region = 1
            per-coastline = 3
            probability = 40
            village = true
            action = "recruit"
            "#,
        )
        .unwrap();
        let village = catalog.get("village").unwrap();
        assert!(village.terrains.contains(Terrain::Grass));
        assert!(village.terrains.contains(Terrain::Dirt));
        assert!(!village.terrains.contains(Terrain::Water));
        assert_eq!(village.max_per_region, 2);
        assert_eq!(village.max_per_castle_region, 1);
        assert_eq!(village.max_per_coastline, 3);
        assert_eq!(village.probability, 40);
        assert!(village.village);
        assert_eq!(village.action.as_deref(), Some("recruit"));
    }

    #[test]
    fn malformed_fields_are_skipped_not_fatal() {
        let catalog = ObjectCatalog::from_toml_str(
            r#"
            colour = "red"

            [[object]]
            name = "mine"
            per-region = -1
            probability = 250
            terrains = ["lava", "snow"]
            sparkle = true

            [[object]]
            per-region = 1

            [[object]]
            name = "shrine"
            terrains = 4
            village = "yes"
            "#,
        )
        .unwrap();
        assert_eq!(catalog.types.len(), 2);

        let mine = catalog.get("mine").unwrap();
        assert_eq!(mine.max_per_region, 0);
        assert_eq!(mine.probability, 100);
        assert!(mine.terrains.contains(Terrain::Snow));
        assert!(!mine.terrains.contains(Terrain::Grass));

        let shrine = catalog.get("shrine").unwrap();
        assert_eq!(shrine.terrains, TerrainMask(Terrain::Swamp.bit()));
        assert!(!shrine.village);
    }

    #[test]
    fn unreadable_file_gives_empty_catalog() {
        let catalog = ObjectCatalog::load("/nonexistent/objects.toml");
        assert!(catalog.types.is_empty());
    }

    #[test]
    fn broken_toml_is_an_error() {
        assert!(ObjectCatalog::from_toml_str("[[object]\nname=").is_err());
    }
}
