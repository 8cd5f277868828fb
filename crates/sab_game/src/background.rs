use glam::Vec2;
use rand::Rng;
use sab_core::render::RenderList;

use crate::assets::ImageName;
use crate::sprite::{column_strip, Sprite};

pub const BACKGROUND_WIDTH: f32 = 256.0;
pub const BACKGROUND_HEIGHT: f32 = 128.0;
pub const BACKGROUND_VARIANTS: usize = 3;

/// Sky image repeated across the whole level.
#[derive(Debug, Clone)]
pub struct Background {
    sprite: Sprite,
    canvas: Vec2,
}

impl Background {
    pub fn new(canvas: Vec2, rng: &mut impl Rng) -> Self {
        let variants = column_strip(
            ImageName::Backgrounds,
            0.0,
            BACKGROUND_WIDTH,
            BACKGROUND_HEIGHT,
            BACKGROUND_VARIANTS,
        );
        let sprite = variants[rng.gen_range(0..variants.len())];
        Self { sprite, canvas }
    }

    pub fn render(&self, out: &mut RenderList) {
        let copies_x = (self.canvas.x / BACKGROUND_WIDTH).ceil().max(1.0) as usize;
        let copies_y = (self.canvas.y / BACKGROUND_HEIGHT).ceil().max(1.0) as usize;
        for y in 0..copies_y {
            for x in 0..copies_x {
                let position = Vec2::new(x as f32 * BACKGROUND_WIDTH, y as f32 * BACKGROUND_HEIGHT);
                self.sprite.render(out, position);
            }
        }
    }
}
