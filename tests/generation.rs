use hexmapgen::{
    GenerationError, GeneratorSettings, NEUTRAL_ARMY, ObjectCatalog, ObjectType, Snapshot,
    Terrain, World,
};
use std::collections::{HashSet, VecDeque};

fn catalog() -> ObjectCatalog {
    let mut village = ObjectType::new("village");
    village.terrains = [Terrain::Grass, Terrain::Dirt].into_iter().collect();
    village.max_per_region = 2;
    village.probability = 70;
    village.village = true;

    let mut mine = ObjectType::new("mine");
    mine.max_per_region = 1;
    mine.max_per_castle_region = 2;
    mine.probability = 50;

    let mut port = ObjectType::new("port");
    port.max_per_coastline = 1;

    ObjectCatalog {
        types: vec![village, mine, port],
    }
}

/// Успешно сгенерированные миры для набора сидов; единственная допустимая ошибка:
/// неудача размещения замка
fn generate_worlds(width: usize, seeds: std::ops::Range<u64>) -> Vec<World> {
    let catalog = catalog();
    let mut worlds = Vec::new();
    for seed in seeds {
        let settings = GeneratorSettings::default()
            .with_width(width)
            .with_seed(seed);
        match World::generate(&settings, &catalog) {
            Ok(world) => worlds.push(world),
            Err(GenerationError::CastlePlacement { .. }) => {}
            Err(e) => panic!("seed {seed}: unexpected generation error: {e}"),
        }
    }
    worlds
}

fn large_worlds() -> Vec<World> {
    let worlds = generate_worlds(64, 0..6);
    assert!(!worlds.is_empty(), "no seed produced a complete world");
    worlds
}

#[test]
fn partition_is_complete() {
    for world in large_worlds() {
        let count = world.region_count();
        assert!(count > 1);
        assert!(world.tile_regions().iter().all(|&r| (r as usize) < count));
        assert!(world.regions().iter().all(|r| !r.tiles.is_empty()));
        let total: usize = world.regions().iter().map(|r| r.tiles.len()).sum();
        assert_eq!(total, world.size());
    }
}

#[test]
fn walkable_tiles_of_each_region_are_connected() {
    for world in large_worlds() {
        let tiles = world.tile_state();
        for region in world.regions() {
            let walkable: Vec<_> = region
                .tiles
                .iter()
                .copied()
                .filter(|&t| tiles.walkable[t])
                .collect();
            let Some(&start) = walkable.first() else {
                continue;
            };
            let mut seen = HashSet::from([start]);
            let mut queue = VecDeque::from([start]);
            while let Some(tile) = queue.pop_front() {
                for n in world.tile_neighbors(tile) {
                    if world.region_of(n) == region.id && tiles.walkable[n] && seen.insert(n) {
                        queue.push_back(n);
                    }
                }
            }
            assert_eq!(
                seen.len(),
                walkable.len(),
                "region {} has isolated walkable tiles",
                region.id
            );
        }
    }
}

#[test]
fn adjacent_regions_share_a_walkable_border() {
    for world in large_worlds() {
        let mut connected = HashSet::new();
        for &(a, b) in world.border_tiles() {
            if world.is_walkable(a) && world.is_walkable(b) {
                connected.insert((world.region_of(a), world.region_of(b)));
            }
        }
        for region in 0..world.region_count() as u32 {
            for neighbor in world.region_neighbors(region) {
                assert!(
                    connected.contains(&(region, neighbor)),
                    "regions {region} and {neighbor} have no walkable crossing"
                );
            }
        }
    }
}

#[test]
fn castles_are_spread_over_non_adjacent_regions() {
    for world in large_worlds() {
        let castles = world.castles();
        assert_eq!(castles.len(), 4);
        for (i, a) in castles.iter().enumerate() {
            assert_eq!(world.region_of(a.tile), a.region);
            assert!(world.is_walkable(a.tile));
            for b in &castles[i + 1..] {
                assert_ne!(a.region, b.region);
                assert!(!world.are_regions_adjacent(a.region, b.region));
            }
        }
    }
}

#[test]
fn castle_distances_match_region_graph() {
    for world in large_worlds() {
        let mut expected = vec![u32::MAX; world.region_count()];
        let mut queue = VecDeque::new();
        for castle in world.castles() {
            expected[castle.region as usize] = 0;
            queue.push_back(castle.region);
        }
        while let Some(region) = queue.pop_front() {
            for n in world.region_neighbors(region) {
                if expected[n as usize] == u32::MAX {
                    expected[n as usize] = expected[region as usize] + 1;
                    queue.push_back(n);
                }
            }
        }
        for region in 0..world.region_count() as u32 {
            assert_ne!(expected[region as usize], u32::MAX);
            assert_eq!(world.castle_distance(region), expected[region as usize]);
        }
    }
}

#[test]
fn villages_are_never_adjacent() {
    let mut seen_villages = 0;
    for world in large_worlds() {
        let villages = world.object_tiles("village");
        seen_villages += villages.len();
        for (i, &a) in villages.iter().enumerate() {
            assert!(world.is_occupied(a) && world.is_walkable(a));
            for &b in &villages[i + 1..] {
                assert!(world.grid().distance(a, b) > 1);
            }
        }
    }
    assert!(seen_villages > 0);
}

#[test]
fn army_zones_are_disjoint() {
    for world in large_worlds() {
        let armies = world.object_tiles(NEUTRAL_ARMY);
        for (i, &a) in armies.iter().enumerate() {
            let (ra, rb) = world
                .border_tiles()
                .iter()
                .find(|&&(t, _)| t == a)
                .map(|&(t, n)| (world.region_of(t), world.region_of(n)))
                .expect("army stands on a border tile");
            assert!(!world.terrain(a).is_water());
            assert_ne!(ra, rb);
            for &b in &armies[i + 1..] {
                assert!(world.grid().distance(a, b) > 4);
            }
        }
    }
}

#[test]
fn coastlines_separate_land_and_water() {
    for world in large_worlds() {
        for coast in world.coastlines() {
            let (a, b) = coast.landmasses;
            assert!(a < b);
            assert!(!coast.land_tiles.is_empty() && !coast.water_tiles.is_empty());
            assert!(coast.land_tiles.iter().all(|&t| !world.terrain(t).is_water()));
            assert!(coast.water_tiles.iter().all(|&t| world.terrain(t).is_water()));
        }
    }
}

#[test]
fn snapshot_round_trip_preserves_world() {
    let world = large_worlds().remove(0);
    let path = std::env::temp_dir().join(format!(
        "hexmapgen-roundtrip-{}.json",
        std::process::id()
    ));
    world.save(&path).unwrap();
    let loaded = World::load(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(Snapshot::from_world(&loaded), Snapshot::from_world(&world));
    assert_eq!(loaded.objects(), world.objects());
    assert_eq!(loaded.castles(), world.castles());
    for region in 0..world.region_count() as u32 {
        assert_eq!(loaded.landmass(region), world.landmass(region));
    }

    let sorted = |mut pairs: Vec<(usize, usize)>| {
        pairs.sort_unstable();
        pairs
    };
    assert_eq!(
        sorted(loaded.border_tiles().to_vec()),
        sorted(world.border_tiles().to_vec())
    );

    assert_eq!(loaded.coastlines().len(), world.coastlines().len());
    for (l, w) in loaded.coastlines().iter().zip(world.coastlines()) {
        let mut land = w.land_tiles.clone();
        land.sort_unstable();
        assert_eq!(l.landmasses, w.landmasses);
        assert_eq!(l.land_tiles, land);
        assert_eq!(l.water_tiles, w.water_tiles);
    }
}

#[test]
fn same_seed_gives_same_world() {
    let settings = GeneratorSettings::default().with_width(32).with_seed(11);
    let a = World::generate(&settings, &catalog());
    let b = World::generate(&settings, &catalog());
    match (a, b) {
        (Ok(a), Ok(b)) => assert_eq!(Snapshot::from_world(&a), Snapshot::from_world(&b)),
        (Err(a), Err(b)) => assert_eq!(a, b),
        _ => panic!("same seed produced different outcomes"),
    }
}

#[test]
fn small_grid_succeeds_or_reports_castle_failure() {
    let catalog = catalog();
    for seed in 0..8 {
        let settings = GeneratorSettings::default().with_width(16).with_seed(seed);
        match World::generate(&settings, &catalog) {
            Ok(world) => {
                assert!((1..=4).contains(&world.region_count()));
                assert!(world.regions().iter().all(|r| !r.tiles.is_empty()));
                assert_eq!(world.castles().len(), 4);
            }
            Err(GenerationError::CastlePlacement { quadrant, .. }) => assert!(quadrant < 4),
            Err(e) => panic!("seed {seed}: unexpected generation error: {e}"),
        }
    }
}

#[test]
fn missing_snapshot_loads_empty_world() {
    let world = World::load_or_default(std::env::temp_dir().join("hexmapgen-missing.json"));
    assert!(world.is_empty());
    assert!(world.castles().is_empty());
}
