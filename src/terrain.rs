// src/terrain.rs
use crate::error::GenerationError;
use crate::region::graph::RegionGraph;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Максимальная «высота» региона
pub const MAX_ALTITUDE: u8 = 3;

/// Тип местности региона. Дискриминант служит стабильным кодом в снимке мира.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub enum Terrain {
    Water = 0,
    Desert = 1,
    Swamp = 2,
    Snow = 3,
    #[default]
    Dirt = 4,
    Grass = 5,
}

impl Terrain {
    pub const ALL: [Terrain; 6] = [
        Terrain::Water,
        Terrain::Desert,
        Terrain::Swamp,
        Terrain::Snow,
        Terrain::Dirt,
        Terrain::Grass,
    ];

    #[must_use]
    pub fn code(self) -> u8 {
        self as u8
    }

    #[must_use]
    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.get(code as usize).copied()
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Terrain::Water => "water",
            Terrain::Desert => "desert",
            Terrain::Swamp => "swamp",
            Terrain::Snow => "snow",
            Terrain::Dirt => "dirt",
            Terrain::Grass => "grass",
        }
    }

    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|t| t.name().eq_ignore_ascii_case(name))
    }

    #[must_use]
    pub fn is_water(self) -> bool {
        self == Terrain::Water
    }

    /// Бит местности в маске каталога объектов
    #[must_use]
    pub fn bit(self) -> u32 {
        1 << self.code()
    }

    #[must_use]
    pub fn to_rgb(self) -> [u8; 3] {
        match self {
            Terrain::Water => [0, 64, 128],
            Terrain::Desert => [200, 180, 120],
            Terrain::Swamp => [80, 100, 60],
            Terrain::Snow => [220, 220, 255],
            Terrain::Dirt => [140, 110, 70],
            Terrain::Grass => [110, 170, 70],
        }
    }
}

/// Набор допустимых местностей (битовая маска по [`Terrain::bit`])
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerrainMask(pub u32);

impl TerrainMask {
    pub const ALL: TerrainMask = TerrainMask((1 << Terrain::ALL.len()) - 1);

    #[must_use]
    pub fn contains(self, terrain: Terrain) -> bool {
        self.0 & terrain.bit() != 0
    }
}

impl Default for TerrainMask {
    fn default() -> Self {
        Self::ALL
    }
}

impl FromIterator<Terrain> for TerrainMask {
    fn from_iter<I: IntoIterator<Item = Terrain>>(iter: I) -> Self {
        TerrainMask(iter.into_iter().fold(0, |mask, t| mask | t.bit()))
    }
}

/// Распространяет высоту по графу регионов обходом в глубину от региона 0.
///
/// Сосед получает высоту текущего региона плюс случайный шаг из `{-1, 0, +1}`,
/// ограниченную диапазоном `[0, MAX_ALTITUDE]`.
pub fn assign_altitudes(
    graph: &RegionGraph,
    rng: &mut impl Rng,
) -> Result<Vec<u8>, GenerationError> {
    let count = graph.region_count();
    let mut altitude: Vec<Option<u8>> = vec![None; count];
    if count == 0 {
        return Ok(Vec::new());
    }

    altitude[0] = Some(1);
    let mut stack = vec![0u32];
    while let Some(region) = stack.pop() {
        let current = altitude[region as usize].unwrap_or(1) as i32;
        for n in graph.neighbors(region) {
            if altitude[n as usize].is_none() {
                let step = rng.gen_range(-1..=1);
                altitude[n as usize] = Some((current + step).clamp(0, MAX_ALTITUDE as i32) as u8);
                stack.push(n);
            }
        }
    }

    altitude
        .into_iter()
        .enumerate()
        .map(|(region, a)| {
            a.ok_or(GenerationError::DisconnectedRegionGraph {
                stage: "altitude propagation",
                region: region as u32,
            })
        })
        .collect()
}

/// Выбирает местность из пула, соответствующего диапазону высот
pub fn terrain_for_altitude(altitude: u8, rng: &mut impl Rng) -> Terrain {
    let pool: &[Terrain] = match altitude {
        0 => &[Terrain::Water, Terrain::Desert, Terrain::Swamp],
        MAX_ALTITUDE => &[Terrain::Snow, Terrain::Dirt],
        _ => &[Terrain::Grass, Terrain::Dirt],
    };
    pool[rng.gen_range(0..pool.len())]
}

/// Назначает каждому региону ровно одну местность
pub fn assign_terrains(
    graph: &RegionGraph,
    rng: &mut impl Rng,
) -> Result<Vec<Terrain>, GenerationError> {
    let altitudes = assign_altitudes(graph, rng)?;
    Ok(altitudes
        .into_iter()
        .map(|a| terrain_for_altitude(a, rng))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn chain(len: usize) -> RegionGraph {
        let mut graph = RegionGraph::new(len);
        for i in 1..len {
            graph.add_edge(i as u32 - 1, i as u32);
        }
        graph
    }

    #[test]
    fn altitudes_stay_in_range_and_change_by_at_most_one() {
        let graph = chain(40);
        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(9);
        let altitudes = assign_altitudes(&graph, &mut rng).unwrap();
        assert_eq!(altitudes[0], 1);
        for w in altitudes.windows(2) {
            assert!(w[0] <= MAX_ALTITUDE && w[1] <= MAX_ALTITUDE);
            assert!((w[0] as i32 - w[1] as i32).abs() <= 1);
        }
    }

    #[test]
    fn disconnected_graph_is_fatal() {
        let graph = RegionGraph::new(2);
        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(0);
        let err = assign_altitudes(&graph, &mut rng).unwrap_err();
        assert_eq!(
            err,
            GenerationError::DisconnectedRegionGraph {
                stage: "altitude propagation",
                region: 1
            }
        );
    }

    #[test]
    fn terrain_pools_follow_altitude_bands() {
        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(5);
        for _ in 0..100 {
            assert!(matches!(
                terrain_for_altitude(0, &mut rng),
                Terrain::Water | Terrain::Desert | Terrain::Swamp
            ));
            assert!(matches!(
                terrain_for_altitude(MAX_ALTITUDE, &mut rng),
                Terrain::Snow | Terrain::Dirt
            ));
            assert!(matches!(
                terrain_for_altitude(2, &mut rng),
                Terrain::Grass | Terrain::Dirt
            ));
        }
    }

    #[test]
    fn every_terrain_has_its_own_color() {
        let colors: std::collections::HashSet<_> =
            Terrain::ALL.into_iter().map(Terrain::to_rgb).collect();
        assert_eq!(colors.len(), Terrain::ALL.len());
    }

    #[test]
    fn codes_names_and_masks() {
        for t in Terrain::ALL {
            assert_eq!(Terrain::from_code(t.code()), Some(t));
            assert_eq!(Terrain::from_name(t.name()), Some(t));
        }
        assert_eq!(Terrain::from_code(6), None);
        let mask: TerrainMask = [Terrain::Grass, Terrain::Dirt].into_iter().collect();
        assert!(mask.contains(Terrain::Grass));
        assert!(!mask.contains(Terrain::Water));
        assert!(TerrainMask::ALL.contains(Terrain::Snow));
    }
}
