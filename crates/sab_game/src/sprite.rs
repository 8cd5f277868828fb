use glam::Vec2;
use sab_core::geometry::Rect;
use sab_core::render::RenderList;

use crate::assets::ImageName;

/// A rectangle cut out of a named sprite sheet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sprite {
    pub image: ImageName,
    pub source: Rect,
}

impl Sprite {
    pub const fn new(image: ImageName, x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            image,
            source: Rect::new(x, y, w, h),
        }
    }

    pub fn render(&self, out: &mut RenderList, position: Vec2) {
        self.render_flipped(out, position, false);
    }

    pub fn render_flipped(&self, out: &mut RenderList, position: Vec2, flip_x: bool) {
        let dest = Rect::new(position.x, position.y, self.source.w, self.source.h);
        out.push_sprite(self.image.as_str(), self.source, dest, flip_x);
    }
}

/// `count` equally sized cells laid out left to right starting at `(0, y)`.
pub fn row_strip(image: ImageName, y: f32, w: f32, h: f32, count: usize) -> Vec<Sprite> {
    (0..count)
        .map(|i| Sprite::new(image, i as f32 * w, y, w, h))
        .collect()
}

/// `count` equally sized cells laid out top to bottom starting at `(x, 0)`.
pub fn column_strip(image: ImageName, x: f32, w: f32, h: f32, count: usize) -> Vec<Sprite> {
    (0..count)
        .map(|i| Sprite::new(image, x, i as f32 * h, w, h))
        .collect()
}

/// Slice a sheet made of `sets_x` by `sets_y` tile sets, each `size_x` by
/// `size_y` square tiles. Sets are numbered row-major; tiles inside a set are
/// row-major too.
pub fn tile_sets(
    image: ImageName,
    sets_x: usize,
    sets_y: usize,
    size_x: usize,
    size_y: usize,
    tile_size: f32,
) -> Vec<Vec<Sprite>> {
    let mut sets = Vec::with_capacity(sets_x * sets_y);
    for set_y in 0..sets_y {
        for set_x in 0..sets_x {
            let mut set = Vec::with_capacity(size_x * size_y);
            for y in size_y * set_y..size_y * (set_y + 1) {
                for x in size_x * set_x..size_x * (set_x + 1) {
                    set.push(Sprite::new(
                        image,
                        x as f32 * tile_size,
                        y as f32 * tile_size,
                        tile_size,
                        tile_size,
                    ));
                }
            }
            sets.push(set);
        }
    }
    sets
}
