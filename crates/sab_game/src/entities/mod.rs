//! Moving actors and the view of the level they update against.
//!
//! The level owns every entity in one vector. While one entity updates it gets
//! a `World`: shared access to the tilemap, mutable access to the props and
//! level flags, and the *other* entities split around it. Entities refer to
//! each other by `EntityId`, never by reference, so a snail can look its
//! player up each tick without holding on to it.

pub mod player;
mod player_states;
pub mod snail;
mod snail_states;

pub use player::{Player, PlayerBody, PlayerContext, PlayerStateName};
pub use snail::{Snail, SnailBody, SnailContext, SnailStateName};

use glam::Vec2;
use sab_core::animation::Animation;
use sab_core::geometry::{Collidable, Rect};
use sab_core::render::RenderList;

use crate::level::Playfield;
use crate::services::Services;
use crate::tilemap::Tilemap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Left,
    Right,
}

/// Fields every actor carries.
#[derive(Debug, Clone)]
pub struct EntityBody {
    pub id: EntityId,
    pub dimensions: Vec2,
    pub position: Vec2,
    pub velocity: Vec2,
    pub velocity_limit: Vec2,
    pub direction: Direction,
    pub is_dead: bool,
    pub clean_up: bool,
    pub animation: Animation,
}

impl EntityBody {
    pub fn new(id: EntityId, dimensions: Vec2, position: Vec2, velocity_limit: Vec2) -> Self {
        Self {
            id,
            dimensions,
            position,
            velocity: Vec2::ZERO,
            velocity_limit,
            direction: Direction::Right,
            is_dead: false,
            clean_up: false,
            animation: Animation::new(vec![0], 1.0),
        }
    }

    /// Distance between the two top-left corners.
    pub fn distance_to(&self, other: &EntityBody) -> f32 {
        self.position.distance(other.position)
    }
}

impl Collidable for EntityBody {
    fn hitbox(&self) -> Rect {
        Rect::from_position(self.position, self.dimensions)
    }
}

#[derive(Debug, Clone)]
pub enum Entity {
    Player(Player),
    Snail(Snail),
}

impl Entity {
    pub fn body(&self) -> &EntityBody {
        match self {
            Self::Player(player) => &player.body.entity,
            Self::Snail(snail) => &snail.body.entity,
        }
    }

    pub fn body_mut(&mut self) -> &mut EntityBody {
        match self {
            Self::Player(player) => &mut player.body.entity,
            Self::Snail(snail) => &mut snail.body.entity,
        }
    }

    pub fn id(&self) -> EntityId {
        self.body().id
    }

    pub fn as_player(&self) -> Option<&Player> {
        match self {
            Self::Player(player) => Some(player),
            Self::Snail(_) => None,
        }
    }

    pub fn as_player_mut(&mut self) -> Option<&mut Player> {
        match self {
            Self::Player(player) => Some(player),
            Self::Snail(_) => None,
        }
    }

    pub fn as_snail(&self) -> Option<&Snail> {
        match self {
            Self::Snail(snail) => Some(snail),
            Self::Player(_) => None,
        }
    }

    pub fn update(&mut self, world: &mut World<'_>, dt: f64) {
        match self {
            Self::Player(player) => player.update(world, dt),
            Self::Snail(snail) => snail.update(world, dt),
        }
    }

    pub fn render(&self, out: &mut RenderList) {
        match self {
            Self::Player(player) => player.render(out),
            Self::Snail(snail) => snail.render(out),
        }
    }
}

impl Collidable for Entity {
    fn hitbox(&self) -> Rect {
        self.body().hitbox()
    }
}

/// Every entity except the one currently updating.
pub struct Others<'a> {
    before: &'a mut [Entity],
    after: &'a mut [Entity],
}

impl<'a> Others<'a> {
    pub fn new(before: &'a mut [Entity], after: &'a mut [Entity]) -> Self {
        Self { before, after }
    }

    pub fn len(&self) -> usize {
        self.before.len() + self.after.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> + '_ {
        self.before.iter().chain(self.after.iter())
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Entity> + '_ {
        self.before.iter_mut().chain(self.after.iter_mut())
    }

    pub fn find(&self, id: EntityId) -> Option<&Entity> {
        self.iter().find(|entity| entity.id() == id)
    }

    pub fn find_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.iter_mut().find(|entity| entity.id() == id)
    }
}

/// What an entity may see and touch during its update.
pub struct World<'a> {
    pub tilemap: &'a Tilemap,
    pub playfield: &'a mut Playfield,
    pub others: Others<'a>,
    pub services: &'a mut Services,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_is_euclidean_between_corners() {
        let a = EntityBody::new(EntityId(0), Vec2::splat(16.0), Vec2::new(0.0, 0.0), Vec2::ONE);
        let b = EntityBody::new(EntityId(1), Vec2::splat(16.0), Vec2::new(30.0, 40.0), Vec2::ONE);
        assert_eq!(a.distance_to(&b), 50.0);
        assert!(a.hitbox().overlaps(&Rect::new(16.0, 16.0, 1.0, 1.0)));
    }
}
