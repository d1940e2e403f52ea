// src/config.rs
//! Конфигурация генерации мира
//!
//! Этот модуль определяет все параметры, управляющие процедурной генерацией:
//! - Размер сетки и сид генератора случайных чисел
//! - Разбиение тайлов на регионы (релаксированная диаграмма Вороного)
//! - Рассыпание препятствий и политика восстановления связности
//!
//! Все структуры поддерживают сериализацию в TOML для удобной настройки через конфигурационные файлы.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Настройки разбиения сетки на регионы
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PartitionSettings {
    /// Целевое количество тайлов на регион (начальное число регионов: `size / tiles_per_region`)
    #[serde(default = "default_tiles_per_region")]
    pub tiles_per_region: usize,

    /// Количество раундов релаксации Ллойда перед финальным назначением
    #[serde(default = "default_relaxation_rounds")]
    pub relaxation_rounds: usize,

    /// Минимальное число начальных центров.
    ///
    /// Для маленьких сеток `size / tiles_per_region` округляется до нуля,
    /// поэтому количество центров ограничено снизу этим значением.
    #[serde(default = "default_min_regions")]
    pub min_regions: usize,
}

fn default_tiles_per_region() -> usize {
    64
}
fn default_relaxation_rounds() -> usize {
    4
}
fn default_min_regions() -> usize {
    1
}

impl Default for PartitionSettings {
    fn default() -> Self {
        Self {
            tiles_per_region: 64,
            relaxation_rounds: 4,
            min_regions: 1,
        }
    }
}

impl PartitionSettings {
    /// Количество начальных центров для сетки из `size` тайлов.
    ///
    /// # Примеры
    /// ```
    /// use hexmapgen::config::PartitionSettings;
    /// let settings = PartitionSettings::default();
    /// assert_eq!(settings.initial_region_count(256), 4);
    /// assert_eq!(settings.initial_region_count(16), 1);
    /// ```
    #[must_use]
    pub fn initial_region_count(&self, size: usize) -> usize {
        (size / self.tiles_per_region.max(1)).max(self.min_regions.max(1))
    }
}

/// Настройки препятствий и восстановления связности
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ObstacleSettings {
    /// Порог шума: тайлы со значением выше становятся препятствиями.
    ///
    /// Шум лежит в диапазоне `[-1.0, 1.0]`:
    /// - `1.0`: препятствий нет,
    /// - `0.0`: примерно половина карты,
    /// - `<0.0`: препятствия преобладают.
    #[serde(default = "default_obstacle_threshold")]
    pub threshold: f32,

    /// Характерный размер пятен препятствий в тайлах (частота шума = `1 / feature_size`)
    #[serde(default = "default_feature_size")]
    pub feature_size: f32,

    /// Закрывать ли оставшиеся разрывы между соседними регионами после
    /// основного прохода `avoid_isolated_regions`.
    ///
    /// При `false` сохраняется «best-effort» поведение: пара регионов, у которой
    /// граница проходит только по парам «препятствие/проходимый тайл», может
    /// остаться без прохода.
    #[serde(default = "default_close_boundary_gaps")]
    pub close_boundary_gaps: bool,
}

fn default_obstacle_threshold() -> f32 {
    0.3
}
fn default_feature_size() -> f32 {
    6.0
}
fn default_close_boundary_gaps() -> bool {
    true
}

impl Default for ObstacleSettings {
    fn default() -> Self {
        Self {
            threshold: 0.3,
            feature_size: 6.0,
            close_boundary_gaps: true,
        }
    }
}

/// Основные параметры генерации мира
///
/// Полная конфигурация для генерации одного мира. Поддерживает загрузку из TOML-файлов.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GeneratorSettings {
    /// Сид генератора случайных чисел (детерминированная генерация)
    #[serde(default)]
    pub seed: u64,

    /// Ширина квадратной сетки в гексах (по умолчанию 64, то есть 4096 тайлов)
    #[serde(default = "default_width")]
    pub width: usize,

    /// Путь к каталогу объектов (TOML). Без каталога объекты не размещаются, только армии.
    #[serde(default)]
    pub catalog: Option<PathBuf>,

    /// Настройки разбиения на регионы
    #[serde(default)]
    pub partition: PartitionSettings,

    /// Настройки препятствий
    #[serde(default)]
    pub obstacles: ObstacleSettings,
}

impl GeneratorSettings {
    /// Загружает параметры из TOML-файла
    ///
    /// # Ошибки
    /// Возвращает ошибку, если файл не найден или содержит недопустимый формат.
    ///
    /// # Пример
    /// ```toml
    /// # world.toml
    /// seed = 42
    /// width = 48
    /// catalog = "objects.toml"
    ///
    /// [obstacles]
    /// threshold = 0.4
    /// ```
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Разбирает параметры из строки TOML; отсутствующие поля получают значения по умолчанию.
    ///
    /// # Примеры
    /// ```
    /// use hexmapgen::config::GeneratorSettings;
    /// let settings = GeneratorSettings::from_toml_str("seed = 7\nwidth = 16").unwrap();
    /// assert_eq!(settings.seed, 7);
    /// assert_eq!(settings.width, 16);
    /// assert_eq!(settings.partition.tiles_per_region, 64);
    /// ```
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    #[must_use]
    pub fn with_width(mut self, width: usize) -> Self {
        self.width = width;
        self
    }
}

fn default_width() -> usize {
    64
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            seed: 0,
            width: 64,
            catalog: None,
            partition: PartitionSettings::default(),
            obstacles: ObstacleSettings::default(),
        }
    }
}
