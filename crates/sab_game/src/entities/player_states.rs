use sab_core::animation::Animation;
use sab_core::geometry::Side;
use sab_core::state_machine::{State, Transition};

use super::player::{PlayerContext, PlayerStateName, PlayerTransition, Probe};
use crate::assets::SoundName;
use crate::level::Contact;
use crate::tilemap::TILE_SIZE;

#[derive(Debug, Clone)]
pub enum PlayerState {
    Idle(IdleState),
    Walking(WalkingState),
    Jumping(JumpingState),
    Falling(FallingState),
}

impl<'w, 'a> State<PlayerStateName, PlayerContext<'w, 'a>> for PlayerState {
    type Params = Option<f32>;

    fn enter(&mut self, ctx: &mut PlayerContext<'w, 'a>, params: Option<f32>) {
        match self {
            Self::Idle(state) => state.enter(ctx, params),
            Self::Walking(state) => state.enter(ctx, params),
            Self::Jumping(state) => state.enter(ctx, params),
            Self::Falling(state) => state.enter(ctx, params),
        }
    }

    fn update(&mut self, ctx: &mut PlayerContext<'w, 'a>, dt: f64) -> Option<PlayerTransition> {
        match self {
            Self::Idle(state) => state.update(ctx, dt),
            Self::Walking(state) => state.update(ctx, dt),
            Self::Jumping(state) => state.update(ctx, dt),
            Self::Falling(state) => state.update(ctx, dt),
        }
    }
}

/// Standing still on something solid.
#[derive(Debug, Clone, Default)]
pub struct IdleState;

impl<'w, 'a> State<PlayerStateName, PlayerContext<'w, 'a>> for IdleState {
    type Params = Option<f32>;

    fn enter(&mut self, ctx: &mut PlayerContext<'w, 'a>, _params: Option<f32>) {
        ctx.player.entity.animation = Animation::new(vec![0], 1.0);
    }

    fn update(&mut self, ctx: &mut PlayerContext<'w, 'a>, _dt: f64) -> Option<PlayerTransition> {
        let contacts = ctx.check_object_collisions();
        ctx.check_left_collisions(&contacts);
        ctx.check_right_collisions(&contacts);
        if let Some(bounce) = ctx.check_entity_collisions(false) {
            return Some(bounce);
        }
        if ctx.player.entity.is_dead {
            return None;
        }

        if !ctx.is_supported(&contacts) {
            return Some(Transition::to(PlayerStateName::Falling));
        }
        if ctx.holds_jump() {
            return Some(Transition::to(PlayerStateName::Jumping));
        }
        if ctx.holds_direction() {
            return Some(Transition::to(PlayerStateName::Walking));
        }
        None
    }
}

/// On the ground with horizontal input or leftover momentum.
#[derive(Debug, Clone, Default)]
pub struct WalkingState;

impl<'w, 'a> State<PlayerStateName, PlayerContext<'w, 'a>> for WalkingState {
    type Params = Option<f32>;

    fn enter(&mut self, ctx: &mut PlayerContext<'w, 'a>, _params: Option<f32>) {
        ctx.player.entity.animation = Animation::new(vec![9, 10], 0.2);
    }

    fn update(&mut self, ctx: &mut PlayerContext<'w, 'a>, _dt: f64) -> Option<PlayerTransition> {
        let contacts = ctx.check_object_collisions();
        ctx.check_left_collisions(&contacts);
        ctx.check_right_collisions(&contacts);
        if let Some(bounce) = ctx.check_entity_collisions(false) {
            return Some(bounce);
        }
        if ctx.player.entity.is_dead {
            return None;
        }

        if ctx.holds_jump() {
            return Some(Transition::to(PlayerStateName::Jumping));
        }

        let running = ctx.holds_run();
        if !running && !ctx.holds_direction() && ctx.player.entity.velocity.x == 0.0 {
            ctx.player.reset_jump_force();
            return Some(Transition::to(PlayerStateName::Idle));
        }
        if !ctx.is_supported(&contacts) {
            return Some(Transition::to(PlayerStateName::Falling));
        }

        match (ctx.holds_left(), ctx.holds_right(), running) {
            (true, _, true) => ctx.player.run_left(),
            (true, _, false) => ctx.player.move_left(),
            (false, true, true) => ctx.player.run_right(),
            (false, true, false) => ctx.player.move_right(),
            (false, false, _) => ctx.player.stop(),
        }
        if running {
            ctx.player.sprint_jump_force();
        }
        None
    }
}

/// Rising after a jump or a bounce.
#[derive(Debug, Clone, Default)]
pub struct JumpingState;

impl<'w, 'a> State<PlayerStateName, PlayerContext<'w, 'a>> for JumpingState {
    type Params = Option<f32>;

    /// `Some(impulse)` launches with that speed instead of the jump force.
    fn enter(&mut self, ctx: &mut PlayerContext<'w, 'a>, impulse: Option<f32>) {
        ctx.player.entity.velocity.y = impulse.unwrap_or(ctx.player.jump_force);
        ctx.player.entity.animation = Animation::new(vec![2], 1.0);
        ctx.world.services.sounds.play(SoundName::Jump);
    }

    fn update(&mut self, ctx: &mut PlayerContext<'w, 'a>, dt: f64) -> Option<PlayerTransition> {
        ctx.player.entity.velocity.y += ctx.player.gravity_force * dt as f32;

        if let Some(tile) = ctx.collidable_tile(&[Probe::TopLeft, Probe::TopRight]) {
            ctx.player.entity.velocity.y = 0.0;
            ctx.player.entity.position.y = (tile.grid_y + 1) as f32 * TILE_SIZE;
            return Some(Transition::to(PlayerStateName::Falling));
        }

        let contacts = ctx.check_object_collisions();
        if let Some(overhead) = contacts.iter().find(|contact| contact.side == Side::Bottom) {
            ctx.hit_object(overhead.id);
            ctx.player.entity.velocity.y = 0.0;
            ctx.player.entity.position.y = overhead.hitbox.bottom();
            return Some(Transition::to(PlayerStateName::Falling));
        }

        if ctx.player.entity.velocity.y >= 0.0 {
            return Some(Transition::to(PlayerStateName::Falling));
        }

        air_control(ctx, &contacts);
        ctx.check_entity_collisions(false)
    }
}

/// Airborne and moving down.
#[derive(Debug, Clone, Default)]
pub struct FallingState;

impl<'w, 'a> State<PlayerStateName, PlayerContext<'w, 'a>> for FallingState {
    type Params = Option<f32>;

    fn enter(&mut self, ctx: &mut PlayerContext<'w, 'a>, _params: Option<f32>) {
        ctx.player.entity.animation = Animation::new(vec![2], 1.0);
    }

    fn update(&mut self, ctx: &mut PlayerContext<'w, 'a>, dt: f64) -> Option<PlayerTransition> {
        ctx.player.entity.velocity.y += ctx.player.gravity_force * dt as f32;

        if let Some(bounce) = ctx.check_entity_collisions(true) {
            return Some(bounce);
        }

        let contacts = ctx.check_object_collisions();
        let height = ctx.player.entity.dimensions.y;
        if let Some(tile) = ctx.collidable_tile(&[Probe::BottomLeft, Probe::BottomRight]) {
            ctx.player.entity.position.y = tile.grid_y as f32 * TILE_SIZE - height;
            return Some(land(ctx));
        }
        if let Some(below) = contacts.iter().find(|contact| contact.side == Side::Top) {
            ctx.player.entity.position.y = below.hitbox.y - height;
            return Some(land(ctx));
        }

        if ctx.fall_out_of_world() {
            return None;
        }

        air_control(ctx, &contacts);
        None
    }
}

fn land(ctx: &mut PlayerContext<'_, '_>) -> PlayerTransition {
    ctx.player.entity.velocity.y = 0.0;
    if ctx.holds_direction() {
        Transition::to(PlayerStateName::Walking)
    } else {
        Transition::to(PlayerStateName::Idle)
    }
}

fn air_control(ctx: &mut PlayerContext<'_, '_>, contacts: &[Contact]) {
    if ctx.holds_left() {
        ctx.player.move_left();
    } else if ctx.holds_right() {
        ctx.player.move_right();
    }
    ctx.check_left_collisions(contacts);
    ctx.check_right_collisions(contacts);
}
