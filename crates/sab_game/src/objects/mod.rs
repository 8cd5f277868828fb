//! Level props: blocks, bushes, coins, mushrooms and the flagpole.
//!
//! Every prop shares an `ObjectBody` (box plus lifecycle flags). Behaviour is
//! opted into through small capability traits rather than a base class:
//! coins animate (`Updatable`) and can be picked up (`Consumable`), a bush
//! only draws (`Renderable`). `GameObject` is the closed set the level stores
//! and dispatches over.
//!
//! One-shot effects are guarded by `was_collided` / `was_consumed`. Calling a
//! hook a second time is a no-op, except that an emptied block plays its
//! "empty" cue.

mod block;
mod bush;
mod coin;
mod flagpole;
mod mushroom;

pub use block::{Block, BlockHit, BLOCK_BOUNCE_DURATION, BLOCK_HIT_FRAME, BLOCK_NOT_HIT_FRAME};
pub use bush::Bush;
pub use coin::{Coin, COIN_POINTS};
pub use flagpole::{Flagpole, FlagpolePart, FLAGPOLE_HEIGHT, FLAGPOLE_POINTS, FLAG_OFFSET_X};
pub use mushroom::Mushroom;

use glam::Vec2;
use sab_core::geometry::{Collidable, Rect};
use sab_core::render::RenderList;

use crate::entities::player::PlayerBody;
use crate::services::SoundQueue;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ObjectFlags {
    pub is_solid: bool,
    pub is_collidable: bool,
    pub is_consumable: bool,
    pub was_collided: bool,
    pub was_consumed: bool,
    pub clean_up: bool,
}

impl ObjectFlags {
    pub fn solid() -> Self {
        Self {
            is_solid: true,
            is_collidable: true,
            ..Self::default()
        }
    }

    pub fn consumable() -> Self {
        Self {
            is_consumable: true,
            ..Self::default()
        }
    }

    /// Solid or collidable objects stop entities instead of being picked up.
    pub fn blocks(&self) -> bool {
        self.is_solid || self.is_collidable
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ObjectBody {
    pub id: ObjectId,
    pub dimensions: Vec2,
    pub position: Vec2,
    pub flags: ObjectFlags,
}

impl ObjectBody {
    pub fn new(id: ObjectId, dimensions: Vec2, position: Vec2, flags: ObjectFlags) -> Self {
        Self {
            id,
            dimensions,
            position,
            flags,
        }
    }
}

impl Collidable for ObjectBody {
    fn hitbox(&self) -> Rect {
        Rect::from_position(self.position, self.dimensions)
    }
}

pub trait Updatable {
    fn update(&mut self, dt: f64);
}

pub trait Renderable {
    fn render(&self, out: &mut RenderList);
}

/// Whoever picked an object up, plus what a pickup may touch.
pub struct Consumer<'c> {
    pub player: &'c mut PlayerBody,
    pub sounds: &'c mut SoundQueue,
    pub level_won: &'c mut bool,
}

pub trait Consumable {
    fn on_consume(&mut self, consumer: &mut Consumer<'_>);
}

#[derive(Debug, Clone)]
pub enum GameObject {
    Block(Block),
    Bush(Bush),
    Coin(Coin),
    Mushroom(Mushroom),
    Flagpole(Flagpole),
}

impl GameObject {
    pub fn body(&self) -> &ObjectBody {
        match self {
            Self::Block(block) => &block.body,
            Self::Bush(bush) => &bush.body,
            Self::Coin(coin) => &coin.body,
            Self::Mushroom(mushroom) => &mushroom.body,
            Self::Flagpole(flagpole) => &flagpole.body,
        }
    }

    pub fn body_mut(&mut self) -> &mut ObjectBody {
        match self {
            Self::Block(block) => &mut block.body,
            Self::Bush(bush) => &mut bush.body,
            Self::Coin(coin) => &mut coin.body,
            Self::Mushroom(mushroom) => &mut mushroom.body,
            Self::Flagpole(flagpole) => &mut flagpole.body,
        }
    }

    pub fn id(&self) -> ObjectId {
        self.body().id
    }

    pub fn update(&mut self, dt: f64) {
        match self {
            Self::Coin(coin) => coin.update(dt),
            Self::Flagpole(flagpole) => flagpole.update(dt),
            Self::Block(_) | Self::Bush(_) | Self::Mushroom(_) => {}
        }
    }

    pub fn render(&self, out: &mut RenderList) {
        match self {
            Self::Block(block) => block.render(out),
            Self::Bush(bush) => bush.render(out),
            Self::Coin(coin) => coin.render(out),
            Self::Mushroom(mushroom) => mushroom.render(out),
            Self::Flagpole(flagpole) => flagpole.render(out),
        }
    }

    /// Pick the object up. Objects that cannot be consumed ignore the call.
    pub fn consume(&mut self, consumer: &mut Consumer<'_>) {
        if !self.body().flags.is_consumable {
            return;
        }
        match self {
            Self::Coin(coin) => coin.on_consume(consumer),
            Self::Mushroom(mushroom) => mushroom.on_consume(consumer),
            Self::Flagpole(flagpole) => flagpole.on_consume(consumer),
            Self::Block(_) | Self::Bush(_) => {}
        }
    }
}

impl Collidable for GameObject {
    fn hitbox(&self) -> Rect {
        self.body().hitbox()
    }
}
