//! The hero: movement tuning, collision resolution and rendering.
//!
//! Collision is resolved axis by axis against three layers in fixed order:
//! the map boundary, then tiles, then solid objects. The first layer that
//! reports a hit wins for that axis. Entity contacts are handled separately
//! through a policy that depends on the player's size and the other entity's
//! state.

use glam::Vec2;
use sab_core::geometry::{Collidable, Rect, Side};
use sab_core::input::{InputState, Key};
use sab_core::render::RenderList;
use sab_core::state_machine::{StateMachine, Transition};

use super::player_states::{FallingState, IdleState, JumpingState, PlayerState, WalkingState};
use super::{Direction, Entity, EntityBody, EntityId, World};
use crate::assets::{ImageName, SoundName};
use crate::config::PlayerConfig;
use crate::level::Contact;
use crate::objects::ObjectId;
use crate::sprite::{row_strip, Sprite};
use crate::tilemap::{Tile, TILE_SIZE};

pub const PLAYER_WIDTH: f32 = 16.0;
pub const PLAYER_HEIGHT: f32 = 20.0;
pub const PLAYER_BIG_HEIGHT: f32 = 24.0;
const PLAYER_SPRITES: usize = 11;

pub const LEFT_KEYS: &[Key] = &[Key::A, Key::Left];
pub const RIGHT_KEYS: &[Key] = &[Key::D, Key::Right];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlayerStateName {
    Idle,
    Walking,
    Jumping,
    Falling,
}

/// Jumping takes an optional launch speed; `None` means the current jump
/// force.
pub type PlayerTransition = Transition<PlayerStateName, Option<f32>>;

/// Sample points around the hitbox, inset by one pixel so that a box flush
/// against a wall does not read the tiles diagonally past its corners.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Probe {
    LeftTop,
    LeftBottom,
    RightTop,
    RightBottom,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

#[derive(Debug, Clone)]
pub struct PlayerBody {
    pub entity: EntityBody,
    /// 0 while small, 1 while big.
    pub life: u8,
    pub score: u32,
    /// Vertical launch speed used by the next jump (negative is up).
    pub jump_force: f32,
    pub gravity_force: f32,
    pub speed_scalar: f32,
    pub friction_scalar: f32,
    /// Seconds left during which live enemies cannot hurt the player.
    pub shrink_grace: f64,
    tuning: PlayerConfig,
}

impl PlayerBody {
    pub fn new(id: EntityId, position: Vec2, config: &PlayerConfig) -> Self {
        Self {
            entity: EntityBody::new(
                id,
                Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT),
                position,
                Vec2::splat(config.velocity_limit),
            ),
            life: 0,
            score: 0,
            jump_force: -config.jump_speed,
            gravity_force: config.gravity,
            speed_scalar: config.speed_scalar,
            friction_scalar: config.friction_scalar,
            shrink_grace: 0.0,
            tuning: config.clone(),
        }
    }

    pub fn hitbox(&self) -> Rect {
        self.entity.hitbox()
    }

    pub fn is_big(&self) -> bool {
        self.life > 0
    }

    pub fn probe(&self, probe: Probe) -> Vec2 {
        let Rect { x, y, w, h } = self.hitbox();
        match probe {
            Probe::LeftTop => Vec2::new(x, y + 1.0),
            Probe::LeftBottom => Vec2::new(x, y + h - 1.0),
            Probe::RightTop => Vec2::new(x + w, y + 1.0),
            Probe::RightBottom => Vec2::new(x + w, y + h - 1.0),
            Probe::TopLeft => Vec2::new(x + 1.0, y),
            Probe::TopRight => Vec2::new(x + w - 1.0, y),
            Probe::BottomLeft => Vec2::new(x + 1.0, y + h),
            Probe::BottomRight => Vec2::new(x + w - 1.0, y + h),
        }
    }

    pub fn move_left(&mut self) {
        self.accelerate(Direction::Left, 1.0);
    }

    pub fn move_right(&mut self) {
        self.accelerate(Direction::Right, 1.0);
    }

    pub fn run_left(&mut self) {
        self.accelerate(Direction::Left, 2.0);
    }

    pub fn run_right(&mut self) {
        self.accelerate(Direction::Right, 2.0);
    }

    fn accelerate(&mut self, direction: Direction, factor: f32) {
        let step = self.speed_scalar * self.friction_scalar * factor;
        let limit = self.entity.velocity_limit.x * factor;
        let velocity = &mut self.entity.velocity.x;
        self.entity.direction = direction;
        *velocity = match direction {
            Direction::Left => (*velocity - step).max(-limit),
            Direction::Right => (*velocity + step).min(limit),
        };
    }

    /// Bleed horizontal speed off through friction.
    pub fn stop(&mut self) {
        let velocity = &mut self.entity.velocity.x;
        if velocity.abs() > 0.0 {
            *velocity *= self.friction_scalar;
        }
        if velocity.abs() < 0.1 {
            *velocity = 0.0;
        }
    }

    /// Become big. The box grows upward so the feet stay put.
    pub fn grow(&mut self) {
        if self.is_big() {
            return;
        }
        self.life = 1;
        self.entity.position.y -= PLAYER_BIG_HEIGHT - PLAYER_HEIGHT;
        self.entity.dimensions.y = PLAYER_BIG_HEIGHT;
    }

    /// Become small again and start the grace period.
    pub fn shrink(&mut self) {
        if !self.is_big() {
            return;
        }
        self.life = 0;
        self.entity.position.y += PLAYER_BIG_HEIGHT - PLAYER_HEIGHT;
        self.entity.dimensions.y = PLAYER_HEIGHT;
        self.shrink_grace = self.tuning.shrink_grace;
    }

    pub fn is_invulnerable(&self) -> bool {
        self.shrink_grace > 0.0
    }

    pub fn reset_jump_force(&mut self) {
        self.jump_force = -self.tuning.jump_speed;
    }

    pub fn sprint_jump_force(&mut self) {
        self.jump_force = -self.tuning.sprint_jump_speed;
    }

    pub fn bounce_force(&self) -> f32 {
        -self.tuning.bounce_speed
    }

    fn advance(&mut self, dt: f64) {
        self.entity.position += self.entity.velocity * dt as f32;
        self.entity.animation.update(dt);
        if self.shrink_grace > 0.0 {
            self.shrink_grace = (self.shrink_grace - dt).max(0.0);
        }
    }
}

/// What a player state gets to work with for one call.
pub struct PlayerContext<'w, 'a> {
    pub player: &'w mut PlayerBody,
    pub world: &'w mut World<'a>,
}

impl PlayerContext<'_, '_> {
    pub fn input(&self) -> &InputState {
        &self.world.services.input
    }

    pub fn holds_left(&self) -> bool {
        self.input().is_any_held(LEFT_KEYS)
    }

    pub fn holds_right(&self) -> bool {
        self.input().is_any_held(RIGHT_KEYS)
    }

    pub fn holds_direction(&self) -> bool {
        self.holds_left() || self.holds_right()
    }

    pub fn holds_jump(&self) -> bool {
        self.input().is_held(Key::Space)
    }

    pub fn holds_run(&self) -> bool {
        self.input().is_held(Key::Shift)
    }

    pub fn tile_at(&self, probe: Probe) -> Option<Tile> {
        self.world
            .tilemap
            .point_to_tile(self.player.probe(probe))
            .copied()
    }

    /// The first collidable tile under any of `probes`.
    pub fn collidable_tile(&self, probes: &[Probe]) -> Option<Tile> {
        probes
            .iter()
            .filter_map(|probe| self.tile_at(*probe))
            .find(|tile| tile.is_collidable())
    }

    pub fn did_collide_with_tiles(&self, probes: &[Probe]) -> bool {
        self.collidable_tile(probes).is_some()
    }

    /// Touch every overlapping object. Pickups are consumed on the spot;
    /// solid objects come back for the axis checks.
    pub fn check_object_collisions(&mut self) -> Vec<Contact> {
        self.world
            .playfield
            .touch_objects(self.player, &mut self.world.services.sounds)
    }

    /// Bump an object from below.
    pub fn hit_object(&mut self, id: ObjectId) {
        self.world.playfield.hit(id, self.world.services);
    }

    pub fn check_left_collisions(&mut self, contacts: &[Contact]) {
        if self.player.entity.position.x < 0.0 {
            self.player.entity.velocity.x = 0.0;
            self.player.entity.position.x = 0.0;
        } else if let Some(tile) = self.collidable_tile(&[Probe::LeftBottom, Probe::LeftTop]) {
            self.player.entity.velocity.x = 0.0;
            self.player.entity.position.x = (tile.grid_x + 1) as f32 * TILE_SIZE;
        } else if let Some(contact) = contacts.iter().find(|contact| contact.side == Side::Right) {
            self.player.entity.velocity.x = 0.0;
            self.player.entity.position.x = contact.hitbox.right();
        }
    }

    pub fn check_right_collisions(&mut self, contacts: &[Contact]) {
        let max_x = self.world.tilemap.canvas_dimensions().x - self.player.entity.dimensions.x;
        if self.player.entity.position.x > max_x {
            self.player.entity.velocity.x = 0.0;
            self.player.entity.position.x = max_x;
        } else if let Some(tile) = self.collidable_tile(&[Probe::RightBottom, Probe::RightTop]) {
            self.player.entity.velocity.x = 0.0;
            self.player.entity.position.x =
                tile.grid_x as f32 * TILE_SIZE - self.player.entity.dimensions.x;
        } else if let Some(contact) = contacts.iter().find(|contact| contact.side == Side::Left) {
            self.player.entity.velocity.x = 0.0;
            self.player.entity.position.x = contact.hitbox.x - self.player.entity.dimensions.x;
        }
    }

    /// Standing on a collidable tile or on top of a solid object.
    pub fn is_supported(&self, contacts: &[Contact]) -> bool {
        contacts.iter().any(|contact| contact.side == Side::Top)
            || self.did_collide_with_tiles(&[Probe::BottomLeft, Probe::BottomRight])
    }

    /// Run the contact policy against every overlapping snail.
    ///
    /// Live snails kill a small player and shrink a big one. Touching an
    /// already dead snail bounces the player and removes the snail. With
    /// `stomp` set (falling onto enemies) a live snail is killed instead.
    pub fn check_entity_collisions(&mut self, stomp: bool) -> Option<PlayerTransition> {
        let hitbox = self.player.hitbox();
        let mut transition = None;

        for other in self.world.others.iter_mut() {
            if self.player.entity.is_dead {
                break;
            }
            let Entity::Snail(snail) = other else {
                continue;
            };
            let enemy = &mut snail.body.entity;
            if enemy.clean_up || !enemy.hitbox().overlaps(&hitbox) {
                continue;
            }

            if enemy.is_dead {
                enemy.clean_up = true;
                transition = Some(Transition::with(
                    PlayerStateName::Jumping,
                    Some(self.player.bounce_force()),
                ));
            } else if stomp {
                log::debug!("Player {:?} stomped snail {:?}", self.player.entity.id, enemy.id);
                enemy.is_dead = true;
            } else if self.player.is_big() {
                self.player.shrink();
            } else if !self.player.is_invulnerable() {
                self.world.services.sounds.play(SoundName::Death);
                self.player.entity.is_dead = true;
                log::info!("Player died with score {}", self.player.score);
            }
        }

        transition
    }

    /// Mark the player dead after falling off the map.
    pub fn fall_out_of_world(&mut self) -> bool {
        if self.player.entity.position.y <= self.world.tilemap.canvas_dimensions().y {
            return false;
        }
        if !self.player.entity.is_dead {
            self.world.services.sounds.play(SoundName::Death);
            self.player.entity.is_dead = true;
            log::info!("Player fell out of the world with score {}", self.player.score);
        }
        true
    }
}

#[derive(Debug, Clone)]
pub struct Player {
    pub body: PlayerBody,
    machine: StateMachine<PlayerStateName, PlayerState>,
    small_sprites: Vec<Sprite>,
    big_sprites: Vec<Sprite>,
}

impl Player {
    pub fn new(id: EntityId, position: Vec2, config: &PlayerConfig) -> Self {
        let mut machine = StateMachine::new();
        for (name, state) in [
            (PlayerStateName::Idle, PlayerState::Idle(IdleState)),
            (PlayerStateName::Walking, PlayerState::Walking(WalkingState)),
            (PlayerStateName::Jumping, PlayerState::Jumping(JumpingState)),
            (PlayerStateName::Falling, PlayerState::Falling(FallingState)),
        ] {
            if let Err(err) = machine.add(name, state) {
                log::error!("Player setup: {err}");
            }
        }

        Self {
            body: PlayerBody::new(id, position, config),
            machine,
            small_sprites: row_strip(
                ImageName::Character,
                0.0,
                PLAYER_WIDTH,
                PLAYER_HEIGHT,
                PLAYER_SPRITES,
            ),
            big_sprites: row_strip(
                ImageName::BigCharacter,
                0.0,
                PLAYER_WIDTH,
                PLAYER_BIG_HEIGHT,
                PLAYER_SPRITES,
            ),
        }
    }

    pub fn id(&self) -> EntityId {
        self.body.entity.id
    }

    pub fn state(&self) -> Option<PlayerStateName> {
        self.machine.current()
    }

    /// Force a state change from outside the machine.
    pub fn change_state(
        &mut self,
        name: PlayerStateName,
        params: Option<f32>,
        world: &mut World<'_>,
    ) -> Result<(), String> {
        let mut ctx = PlayerContext {
            player: &mut self.body,
            world,
        };
        self.machine.change(name, params, &mut ctx)
    }

    /// Players drop in: the first update enters Falling.
    pub fn update(&mut self, world: &mut World<'_>, dt: f64) {
        let mut ctx = PlayerContext {
            player: &mut self.body,
            world,
        };
        if self.machine.current().is_none() {
            if let Err(err) = self.machine.change(PlayerStateName::Falling, None, &mut ctx) {
                log::error!("Player {:?} could not start: {}", ctx.player.entity.id, err);
            }
        }
        self.machine.update(&mut ctx, dt);
        self.body.advance(dt);
    }

    pub fn render(&self, out: &mut RenderList) {
        let sprites = if self.body.is_big() {
            &self.big_sprites
        } else {
            &self.small_sprites
        };
        let frame = self.body.entity.animation.current_frame();
        if let Some(sprite) = sprites.get(frame) {
            sprite.render_flipped(
                out,
                self.body.entity.position,
                self.body.entity.direction == Direction::Left,
            );
        }
    }
}
