use glam::Vec2;
use rand::RngCore;
use sab_core::render::RenderList;
use sab_core::timer::{Timer, Tween};

use super::{Coin, GameObject, Mushroom, ObjectBody, ObjectFlags, ObjectId, Renderable};
use crate::assets::{ImageName, SoundName};
use crate::level::{LevelSignal, TweenTarget};
use crate::services::{did_succeed_chance, SoundQueue};
use crate::sprite::{column_strip, Sprite};
use crate::tilemap::TILE_SIZE;

pub const BLOCK_SPRITES: usize = 5;
pub const BLOCK_NOT_HIT_FRAME: usize = 1;
pub const BLOCK_HIT_FRAME: usize = 4;

/// How far the block jumps when hit, in pixels.
pub const BLOCK_BOUNCE: f32 = 5.0;
pub const BLOCK_BOUNCE_DURATION: f64 = 0.1;
pub const POWER_UP_RISE_DURATION: f64 = 0.1;
/// Odds that a block releases a coin rather than a mushroom.
pub const COIN_CHANCE: f64 = 0.5;

/// What a block needs from the level while it is being hit.
pub struct BlockHit<'h> {
    pub sounds: &'h mut SoundQueue,
    pub rng: &'h mut dyn RngCore,
    pub tweens: &'h mut Timer<LevelSignal, TweenTarget>,
    /// Id the spawned power-up will carry.
    pub power_up_id: ObjectId,
}

/// Question block. The first hit from below releases a coin or a mushroom.
#[derive(Debug, Clone)]
pub struct Block {
    pub body: ObjectBody,
    sprites: Vec<Sprite>,
    current_frame: usize,
}

impl Block {
    pub fn new(id: ObjectId, position: Vec2) -> Self {
        Self {
            body: ObjectBody::new(
                id,
                Vec2::splat(TILE_SIZE),
                position,
                ObjectFlags::solid(),
            ),
            sprites: column_strip(ImageName::Blocks, 0.0, TILE_SIZE, TILE_SIZE, BLOCK_SPRITES),
            current_frame: BLOCK_NOT_HIT_FRAME,
        }
    }

    pub fn current_frame(&self) -> usize {
        self.current_frame
    }

    /// Handle a hit from below. Returns the power-up released by the first
    /// hit; later hits only play the empty cue.
    pub fn on_collision(&mut self, hit: &mut BlockHit<'_>) -> Option<GameObject> {
        if self.body.flags.was_collided {
            hit.sounds.play(SoundName::EmptyBlock);
            return None;
        }
        self.body.flags.was_collided = true;

        let origin = self.body.position;
        let power_up = if did_succeed_chance(&mut hit.rng, COIN_CHANCE) {
            GameObject::Coin(Coin::new(hit.power_up_id, origin))
        } else {
            GameObject::Mushroom(Mushroom::new(hit.power_up_id, origin))
        };

        // Up now, back down once the first tween completes.
        hit.tweens.tween(
            vec![Tween::new(
                TweenTarget::ObjectY(self.body.id),
                origin.y,
                origin.y - BLOCK_BOUNCE,
            )],
            BLOCK_BOUNCE_DURATION,
            Some(LevelSignal::BlockRaised {
                block: self.body.id,
                rest_y: origin.y,
            }),
        );

        let rise = power_up.body().dimensions.y;
        hit.tweens.tween(
            vec![Tween::new(
                TweenTarget::ObjectY(hit.power_up_id),
                origin.y,
                origin.y - rise,
            )],
            POWER_UP_RISE_DURATION,
            None,
        );

        hit.sounds.play(SoundName::Reveal);
        self.current_frame = BLOCK_HIT_FRAME;
        log::debug!(
            "Block {:?} released {:?}",
            self.body.id,
            match power_up {
                GameObject::Coin(_) => "coin",
                _ => "mushroom",
            }
        );
        Some(power_up)
    }
}

impl Renderable for Block {
    fn render(&self, out: &mut RenderList) {
        if let Some(sprite) = self.sprites.get(self.current_frame) {
            sprite.render(out, self.body.position);
        }
    }
}
