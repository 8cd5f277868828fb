use glam::Vec2;
use rand::Rng;
use sab_core::render::RenderList;

use super::{ObjectBody, ObjectFlags, ObjectId, Renderable};
use crate::assets::ImageName;
use crate::sprite::{column_strip, Sprite};
use crate::tilemap::TILE_SIZE;

const BUSH_SPRITES: usize = 5;

/// Scenery. Never collides.
#[derive(Debug, Clone)]
pub struct Bush {
    pub body: ObjectBody,
    sprite: Sprite,
}

impl Bush {
    pub fn new(id: ObjectId, position: Vec2, rng: &mut impl Rng) -> Self {
        let variants = column_strip(ImageName::Bushes, 0.0, TILE_SIZE, TILE_SIZE, BUSH_SPRITES);
        Self {
            body: ObjectBody::new(
                id,
                Vec2::splat(TILE_SIZE),
                position,
                ObjectFlags::default(),
            ),
            sprite: variants[rng.gen_range(0..BUSH_SPRITES)],
        }
    }

    pub fn sprite(&self) -> &Sprite {
        &self.sprite
    }
}

impl Renderable for Bush {
    fn render(&self, out: &mut RenderList) {
        self.sprite.render(out, self.body.position);
    }
}
