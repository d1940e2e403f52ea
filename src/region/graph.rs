// src/region/graph.rs
use crate::grid::{HexGrid, TileId};
use crate::multimap::SortedMultimap;
use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::Bfs;
use rand::Rng;
use rand::seq::SliceRandom;
use std::collections::HashSet;

/// Граф смежности регионов: узел `i` соответствует региону `i`.
#[derive(Debug, Clone, Default)]
pub struct RegionGraph {
    graph: UnGraph<u32, ()>,
    edges: HashSet<(u32, u32)>,
}

impl RegionGraph {
    #[must_use]
    pub fn new(region_count: usize) -> Self {
        let mut graph = UnGraph::with_capacity(region_count, region_count * 3);
        for id in 0..region_count {
            graph.add_node(id as u32);
        }
        Self {
            graph,
            edges: HashSet::new(),
        }
    }

    /// Добавляет ребро; повторные рёбра и петли игнорируются
    pub fn add_edge(&mut self, a: u32, b: u32) -> bool {
        if a == b {
            return false;
        }
        let key = if a < b { (a, b) } else { (b, a) };
        if !self.edges.insert(key) {
            return false;
        }
        self.graph.add_edge(
            NodeIndex::new(key.0 as usize),
            NodeIndex::new(key.1 as usize),
            (),
        );
        true
    }

    #[must_use]
    pub fn region_count(&self) -> usize {
        self.graph.node_count()
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn neighbors(&self, region: u32) -> impl Iterator<Item = u32> + '_ {
        assert!(
            (region as usize) < self.region_count(),
            "region {region} is out of range"
        );
        self.graph
            .neighbors(NodeIndex::new(region as usize))
            .map(|n| self.graph[n])
    }

    #[must_use]
    pub fn are_adjacent(&self, a: u32, b: u32) -> bool {
        let key = if a < b { (a, b) } else { (b, a) };
        self.edges.contains(&key)
    }

    /// Регион с наименьшим номером, недостижимый из региона 0
    #[must_use]
    pub fn first_unreachable(&self) -> Option<u32> {
        if self.region_count() == 0 {
            return None;
        }
        let mut reached = vec![false; self.region_count()];
        let mut bfs = Bfs::new(&self.graph, NodeIndex::new(0));
        while let Some(node) = bfs.next(&self.graph) {
            reached[node.index()] = true;
        }
        reached.iter().position(|&r| !r).map(|r| r as u32)
    }
}

/// Смежность тайлов, смежность регионов и список граничных пар тайлов.
#[derive(Debug, Clone, Default)]
pub struct NeighborGraph {
    tile_neighbors: SortedMultimap<TileId, TileId>,
    regions: RegionGraph,
    border_tiles: Vec<(TileId, TileId)>,
}

impl NeighborGraph {
    /// Строит графы по готовому разбиению. Граничные пары идут в порядке индексов тайлов;
    /// для генерации их нужно перемешать через [`NeighborGraph::shuffle_border_tiles`].
    #[must_use]
    pub fn build(grid: &HexGrid, tile_regions: &[u32], region_count: usize) -> Self {
        let mut tile_neighbors = SortedMultimap::with_capacity(grid.size() * 6);
        let mut regions = RegionGraph::new(region_count);
        let mut border_tiles = Vec::new();

        for tile in 0..grid.size() {
            let region = tile_regions[tile];
            for n in grid.neighbors(tile) {
                tile_neighbors.insert(tile, n);
                let n_region = tile_regions[n];
                if n_region != region {
                    regions.add_edge(region, n_region);
                    border_tiles.push((tile, n));
                }
            }
        }
        tile_neighbors.finalize();

        Self {
            tile_neighbors,
            regions,
            border_tiles,
        }
    }

    /// Перемешивает граничные пары, чтобы последующие проходы не зависели от направления обхода
    pub fn shuffle_border_tiles(&mut self, rng: &mut impl Rng) {
        self.border_tiles.shuffle(rng);
    }

    pub fn tile_neighbors(&self, tile: TileId) -> impl Iterator<Item = TileId> + '_ {
        self.tile_neighbors.get(tile)
    }

    #[must_use]
    pub fn are_tiles_adjacent(&self, a: TileId, b: TileId) -> bool {
        self.tile_neighbors.contains(a, b)
    }

    #[must_use]
    pub fn regions(&self) -> &RegionGraph {
        &self.regions
    }

    #[must_use]
    pub fn border_tiles(&self) -> &[(TileId, TileId)] {
        &self.border_tiles
    }
}
