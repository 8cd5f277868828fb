use glam::Vec2;
use sab_core::animation::Animation;
use sab_core::render::RenderList;

use super::{Consumable, Consumer, ObjectBody, ObjectFlags, ObjectId, Renderable, Updatable};
use crate::assets::{ImageName, SoundName};
use crate::sprite::{row_strip, Sprite};
use crate::tilemap::TILE_SIZE;

pub const COIN_POINTS: u32 = 10;
const COIN_SPRITES: usize = 5;

#[derive(Debug, Clone)]
pub struct Coin {
    pub body: ObjectBody,
    sprites: Vec<Sprite>,
    animation: Animation,
}

impl Coin {
    pub fn new(id: ObjectId, position: Vec2) -> Self {
        Self {
            body: ObjectBody::new(
                id,
                Vec2::splat(TILE_SIZE),
                position,
                ObjectFlags::consumable(),
            ),
            sprites: row_strip(ImageName::Coin, 0.0, TILE_SIZE, TILE_SIZE, COIN_SPRITES),
            animation: Animation::new(vec![0, 1, 2, 3, 4], 0.1),
        }
    }
}

impl Updatable for Coin {
    fn update(&mut self, dt: f64) {
        self.animation.update(dt);
    }
}

impl Renderable for Coin {
    fn render(&self, out: &mut RenderList) {
        if let Some(sprite) = self.sprites.get(self.animation.current_frame()) {
            sprite.render(out, self.body.position);
        }
    }
}

impl Consumable for Coin {
    fn on_consume(&mut self, consumer: &mut Consumer<'_>) {
        if self.body.flags.was_consumed {
            return;
        }
        self.body.flags.was_consumed = true;
        consumer.sounds.play(SoundName::PickUp);
        consumer.player.score += COIN_POINTS;
        self.body.flags.clean_up = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PlayerConfig;
    use crate::entities::player::PlayerBody;
    use crate::entities::EntityId;
    use crate::services::SoundQueue;

    #[test]
    fn consuming_twice_scores_once() {
        let mut coin = Coin::new(ObjectId(1), Vec2::new(16.0, 16.0));
        let mut player = PlayerBody::new(EntityId(0), Vec2::ZERO, &PlayerConfig::default());
        let mut sounds = SoundQueue::new();
        let mut won = false;

        for _ in 0..2 {
            let mut consumer = Consumer {
                player: &mut player,
                sounds: &mut sounds,
                level_won: &mut won,
            };
            coin.on_consume(&mut consumer);
        }

        assert_eq!(player.score, COIN_POINTS);
        assert_eq!(sounds.play_count(SoundName::PickUp), 1);
        assert!(coin.body.flags.clean_up);
        assert!(!won);
    }

    #[test]
    fn spins_through_five_frames() {
        let mut coin = Coin::new(ObjectId(1), Vec2::ZERO);
        let mut seen = Vec::new();
        for _ in 0..5 {
            seen.push(coin.animation.current_frame());
            coin.update(0.1);
        }
        assert_eq!(seen, vec![0, 1, 2, 3, 4]);
        assert_eq!(coin.animation.current_frame(), 0);
    }
}
