use glam::Vec2;
use sab_core::animation::Animation;
use sab_core::render::RenderList;

use super::{Consumable, Consumer, ObjectBody, ObjectFlags, ObjectId, Renderable, Updatable};
use crate::assets::{ImageName, SoundName};
use crate::sprite::{row_strip, Sprite};
use crate::tilemap::TILE_SIZE;

pub const FLAGPOLE_WIDTH: f32 = TILE_SIZE * 2.0;
pub const FLAGPOLE_HEIGHT: f32 = TILE_SIZE * 6.0;
pub const FLAGPOLE_POINTS: u32 = 100;
/// Horizontal distance from the pole to its waving flag.
pub const FLAG_OFFSET_X: f32 = 10.0;
/// Flag frames start this many tiles into the sheet.
const FLAG_SHEET_COLUMN: f32 = 6.0;
const FLAG_FRAMES: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagpolePart {
    Pole,
    Flag,
}

/// Goal post. Touching either part wins the level.
#[derive(Debug, Clone)]
pub struct Flagpole {
    pub body: ObjectBody,
    part: FlagpolePart,
    sprites: Vec<Sprite>,
    animation: Animation,
}

impl Flagpole {
    pub fn new(id: ObjectId, part: FlagpolePart, position: Vec2) -> Self {
        let (sprites, animation) = match part {
            FlagpolePart::Pole => (
                vec![Sprite::new(ImageName::Flagpole, 0.0, 0.0, TILE_SIZE, FLAGPOLE_HEIGHT)],
                Animation::new(vec![0], 0.1),
            ),
            FlagpolePart::Flag => (
                row_strip(ImageName::Flagpole, 0.0, TILE_SIZE, TILE_SIZE, FLAG_SHEET_COLUMN as usize + FLAG_FRAMES)
                    .split_off(FLAG_SHEET_COLUMN as usize),
                Animation::new(vec![0, 1, 2], 0.1),
            ),
        };
        Self {
            body: ObjectBody::new(
                id,
                Vec2::new(FLAGPOLE_WIDTH, FLAGPOLE_HEIGHT),
                position,
                ObjectFlags::consumable(),
            ),
            part,
            sprites,
            animation,
        }
    }

    pub fn part(&self) -> FlagpolePart {
        self.part
    }
}

impl Updatable for Flagpole {
    fn update(&mut self, dt: f64) {
        self.animation.update(dt);
    }
}

impl Renderable for Flagpole {
    fn render(&self, out: &mut RenderList) {
        if let Some(sprite) = self.sprites.get(self.animation.current_frame()) {
            sprite.render(out, self.body.position);
        }
    }
}

impl Consumable for Flagpole {
    fn on_consume(&mut self, consumer: &mut Consumer<'_>) {
        if self.body.flags.was_consumed {
            return;
        }
        self.body.flags.was_consumed = true;
        consumer.sounds.play(SoundName::PickUp);
        consumer.player.score += FLAGPOLE_POINTS;
        *consumer.level_won = true;
        log::info!("Flagpole reached, score {}", consumer.player.score);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PlayerConfig;
    use crate::entities::player::PlayerBody;
    use crate::entities::EntityId;
    use crate::services::SoundQueue;
    use sab_core::geometry::Rect;

    #[test]
    fn touching_the_pole_wins_once() {
        let mut pole = Flagpole::new(ObjectId(1), FlagpolePart::Pole, Vec2::new(320.0, 128.0));
        let mut player = PlayerBody::new(EntityId(0), Vec2::ZERO, &PlayerConfig::default());
        let mut sounds = SoundQueue::new();
        let mut won = false;

        for _ in 0..3 {
            pole.on_consume(&mut Consumer {
                player: &mut player,
                sounds: &mut sounds,
                level_won: &mut won,
            });
        }

        assert!(won);
        assert_eq!(player.score, FLAGPOLE_POINTS);
        assert_eq!(sounds.play_count(SoundName::PickUp), 1);
        assert!(!pole.body.flags.clean_up);
    }

    #[test]
    fn flag_waves_through_three_frames() {
        let mut flag = Flagpole::new(ObjectId(2), FlagpolePart::Flag, Vec2::ZERO);
        assert_eq!(flag.part(), FlagpolePart::Flag);
        assert_eq!(flag.sprites[0].source, Rect::new(96.0, 0.0, 16.0, 16.0));

        flag.update(0.1);
        flag.update(0.1);
        assert_eq!(flag.animation.current_frame(), 2);
        flag.update(0.1);
        assert_eq!(flag.animation.current_frame(), 0);
    }
}
