// src/png.rs
//! Предпросмотр мира в PNG
//!
//! Каждый гекс рисуется квадратной ячейкой `cell × cell` пикселей; нечётные столбцы
//! сдвинуты вниз на половину ячейки, как и в самой сетке.
//!
//! - ячейка окрашена цветом местности региона, препятствия затемнены;
//! - внутренность замка серая, сам замок отмечен красным кругом;
//! - объекты отмечены кругами цвета своего типа, нейтральные армии чёрными.

use crate::grid::TileId;
use crate::objects::NEUTRAL_ARMY;
use crate::world::World;
use image::{ImageResult, Rgba, RgbaImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_filled_rect_mut};
use imageproc::rect::Rect;
use std::path::Path;

/// Размер ячейки по умолчанию
pub const DEFAULT_CELL_SIZE: u32 = 8;

const CASTLE_INTERIOR: Rgba<u8> = Rgba([128, 128, 128, 255]);
const CASTLE_MARK: Rgba<u8> = Rgba([200, 30, 30, 255]);
const ARMY_MARK: Rgba<u8> = Rgba([0, 0, 0, 255]);

// Цвета типов объектов по порядку имён в реестре
const OBJECT_PALETTE: [[u8; 3]; 6] = [
    [250, 210, 40],
    [255, 255, 255],
    [150, 60, 200],
    [40, 200, 220],
    [255, 140, 0],
    [240, 100, 180],
];

fn darken([r, g, b]: [u8; 3]) -> [u8; 3] {
    [r / 2, g / 2, b / 2]
}

/// Левый верхний угол ячейки тайла
fn cell_origin(world: &World, tile: TileId, cell: u32) -> (i32, i32) {
    let coord = world.grid().coord(tile);
    let shift = if coord.x & 1 == 1 { cell / 2 } else { 0 };
    (coord.x * cell as i32, coord.y * cell as i32 + shift as i32)
}

fn cell_center(world: &World, tile: TileId, cell: u32) -> (i32, i32) {
    let (x, y) = cell_origin(world, tile, cell);
    let half = (cell / 2) as i32;
    (x + half, y + half)
}

fn fill_cell(img: &mut RgbaImage, world: &World, tile: TileId, cell: u32, color: Rgba<u8>) {
    let (x, y) = cell_origin(world, tile, cell);
    draw_filled_rect_mut(img, Rect::at(x, y).of_size(cell, cell), color);
}

/// Рисует мир в RGBA-изображение
#[must_use]
pub fn render(world: &World, cell: u32) -> RgbaImage {
    let cell = cell.max(2);
    let side = world.width() as u32 * cell;
    let mut img = RgbaImage::from_pixel(side.max(1), (side + cell / 2).max(1), Rgba([0, 0, 0, 0]));

    for tile in 0..world.size() {
        let rgb = world.terrain(tile).to_rgb();
        let [r, g, b] = if world.is_obstacle(tile) { darken(rgb) } else { rgb };
        fill_cell(&mut img, world, tile, cell, Rgba([r, g, b, 255]));
    }

    for castle in world.castles() {
        let interior = world.grid().coord(castle.tile).disk(1);
        for tile in interior.into_iter().filter_map(|c| world.grid().tile(c)) {
            fill_cell(&mut img, world, tile, cell, CASTLE_INTERIOR);
        }
    }

    let radius = (cell / 3).max(1) as i32;
    let mut palette = OBJECT_PALETTE.iter().cycle();
    for (name, tiles) in world.objects().iter() {
        let color = if name == NEUTRAL_ARMY {
            ARMY_MARK
        } else {
            let [r, g, b] = palette.next().copied().unwrap_or([255, 255, 255]);
            Rgba([r, g, b, 255])
        };
        for &tile in tiles {
            draw_filled_circle_mut(&mut img, cell_center(world, tile, cell), radius, color);
        }
    }

    for castle in world.castles() {
        draw_filled_circle_mut(
            &mut img,
            cell_center(world, castle.tile, cell),
            radius + 1,
            CASTLE_MARK,
        );
    }

    img
}

/// Сохраняет предпросмотр мира в PNG
pub fn save_as_png(world: &World, path: impl AsRef<Path>, cell: u32) -> ImageResult<()> {
    render(world, cell).save(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::Snapshot;
    use crate::terrain::Terrain;
    use std::collections::BTreeMap;

    fn two_band_world() -> World {
        Snapshot {
            tile_regions: vec![0, 0, 1, 1],
            region_terrain: vec![Terrain::Grass.code(), Terrain::Water.code()],
            tile_obstacles: vec![0, 1, 0, 0],
            tile_occupied: vec![0, 1, 0, 0],
            tile_walkable: vec![1, 0, 1, 1],
            castles: Vec::new(),
            region_castle_distance: vec![0, 0],
            objects: BTreeMap::new(),
        }
        .into_world()
        .unwrap()
    }

    #[test]
    fn image_covers_shifted_columns() {
        let img = render(&two_band_world(), 8);
        assert_eq!(img.dimensions(), (16, 20));
    }

    #[test]
    fn terrain_and_obstacle_colors() {
        let world = two_band_world();
        let img = render(&world, 8);
        let [r, g, b] = Terrain::Grass.to_rgb();
        assert_eq!(img.get_pixel(1, 1), &Rgba([r, g, b, 255]));

        // тайл 1 в точке (1, 0) сдвинут на пол-ячейки вниз
        let [r, g, b] = darken(Terrain::Grass.to_rgb());
        assert_eq!(img.get_pixel(9, 5), &Rgba([r, g, b, 255]));

        let [r, g, b] = Terrain::Water.to_rgb();
        assert_eq!(img.get_pixel(1, 9), &Rgba([r, g, b, 255]));
    }

    #[test]
    fn empty_world_renders() {
        let img = render(&World::default(), DEFAULT_CELL_SIZE);
        assert!(img.width() >= 1 && img.height() >= 1);
    }
}
