use glam::Vec2;
use sab_core::render::RenderList;

use super::{Consumable, Consumer, ObjectBody, ObjectFlags, ObjectId, Renderable};
use crate::assets::{ImageName, SoundName};
use crate::sprite::Sprite;
use crate::tilemap::TILE_SIZE;

const MUSHROOM_SPRITE: Sprite = Sprite::new(ImageName::PowerUps, 0.0, 0.0, TILE_SIZE, TILE_SIZE);

/// Power-up that makes the player big.
#[derive(Debug, Clone)]
pub struct Mushroom {
    pub body: ObjectBody,
}

impl Mushroom {
    pub fn new(id: ObjectId, position: Vec2) -> Self {
        Self {
            body: ObjectBody::new(
                id,
                Vec2::splat(TILE_SIZE),
                position,
                ObjectFlags::consumable(),
            ),
        }
    }
}

impl Renderable for Mushroom {
    fn render(&self, out: &mut RenderList) {
        MUSHROOM_SPRITE.render(out, self.body.position);
    }
}

impl Consumable for Mushroom {
    fn on_consume(&mut self, consumer: &mut Consumer<'_>) {
        if self.body.flags.was_consumed {
            return;
        }
        self.body.flags.was_consumed = true;
        consumer.sounds.play(SoundName::PickUp);
        consumer.player.grow();
        self.body.flags.clean_up = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PlayerConfig;
    use crate::entities::player::{PlayerBody, PLAYER_BIG_HEIGHT};
    use crate::entities::EntityId;
    use crate::services::SoundQueue;

    #[test]
    fn grows_the_player_once() {
        let mut mushroom = Mushroom::new(ObjectId(3), Vec2::ZERO);
        let mut player = PlayerBody::new(EntityId(0), Vec2::new(16.0, 100.0), &PlayerConfig::default());
        let mut sounds = SoundQueue::new();
        let mut won = false;

        for _ in 0..2 {
            mushroom.on_consume(&mut Consumer {
                player: &mut player,
                sounds: &mut sounds,
                level_won: &mut won,
            });
        }

        assert_eq!(player.life, 1);
        assert_eq!(player.entity.dimensions.y, PLAYER_BIG_HEIGHT);
        assert_eq!(player.score, 0);
        assert_eq!(sounds.play_count(SoundName::PickUp), 1);
        assert!(mushroom.body.flags.clean_up);
    }
}
