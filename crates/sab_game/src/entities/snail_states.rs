use sab_core::animation::Animation;
use sab_core::geometry::Collidable;
use sab_core::particle::{burst, Particle};
use sab_core::render::RenderList;
use sab_core::state_machine::{State, Transition};
use sab_core::timer::TaskHandle;

use super::snail::{SnailContext, SnailSignal, SnailStateName, DEATH_PARTICLES};
use super::Direction;
use crate::assets::SoundName;
use crate::services::{did_succeed_chance, random_int};

type SnailTransition = Transition<SnailStateName, ()>;

#[derive(Debug, Clone)]
pub enum SnailState {
    Idle(IdleState),
    Moving(MovingState),
    Chasing(ChasingState),
    Dying(DyingState),
}

impl<'w, 'a> State<SnailStateName, SnailContext<'w, 'a>> for SnailState {
    type Params = ();

    fn enter(&mut self, ctx: &mut SnailContext<'w, 'a>, params: ()) {
        match self {
            Self::Idle(state) => state.enter(ctx, params),
            Self::Moving(state) => state.enter(ctx, params),
            Self::Chasing(state) => state.enter(ctx, params),
            Self::Dying(state) => state.enter(ctx, params),
        }
    }

    fn exit(&mut self, ctx: &mut SnailContext<'w, 'a>) {
        match self {
            Self::Idle(state) => state.exit(ctx),
            Self::Moving(state) => state.exit(ctx),
            Self::Chasing(state) => state.exit(ctx),
            Self::Dying(state) => state.exit(ctx),
        }
    }

    fn update(&mut self, ctx: &mut SnailContext<'w, 'a>, dt: f64) -> Option<SnailTransition> {
        match self {
            Self::Idle(state) => state.update(ctx, dt),
            Self::Moving(state) => state.update(ctx, dt),
            Self::Chasing(state) => state.update(ctx, dt),
            Self::Dying(state) => state.update(ctx, dt),
        }
    }
}

fn cancel_task(ctx: &mut SnailContext<'_, '_>, task: &mut Option<TaskHandle>) {
    if let Some(handle) = task.take() {
        ctx.snail.timer.cancel(handle);
    }
}

/// Sitting still for a random number of seconds.
#[derive(Debug, Clone, Default)]
pub struct IdleState {
    task: Option<TaskHandle>,
}

impl<'w, 'a> State<SnailStateName, SnailContext<'w, 'a>> for IdleState {
    type Params = ();

    fn enter(&mut self, ctx: &mut SnailContext<'w, 'a>, _params: ()) {
        ctx.snail.entity.animation = Animation::new(vec![4], 2.0);
        let tuning = &ctx.snail.tuning;
        let (low, high) = (tuning.min_idle, tuning.max_idle);
        let seconds = random_int(&mut ctx.world.services.rng, low, high);
        self.task = Some(ctx.snail.timer.wait(f64::from(seconds), SnailSignal::IdleOver));
    }

    fn exit(&mut self, ctx: &mut SnailContext<'w, 'a>) {
        cancel_task(ctx, &mut self.task);
    }

    fn update(&mut self, ctx: &mut SnailContext<'w, 'a>, _dt: f64) -> Option<SnailTransition> {
        if ctx.observe_death() {
            return Some(Transition::to(SnailStateName::Dying));
        }
        if ctx.is_target_in_range() {
            return Some(Transition::to(SnailStateName::Chasing));
        }
        if ctx.received(SnailSignal::IdleOver) {
            self.task = None;
            return Some(Transition::to(SnailStateName::Moving));
        }
        None
    }
}

/// Wandering at half speed, turning around at walls and drops.
#[derive(Debug, Clone, Default)]
pub struct MovingState {
    task: Option<TaskHandle>,
}

impl MovingState {
    /// Face a random way and book the next decision point.
    fn pick_leg(&mut self, ctx: &mut SnailContext<'_, '_>) {
        let rng = &mut ctx.world.services.rng;
        ctx.snail.entity.direction = if did_succeed_chance(rng, 0.5) {
            Direction::Left
        } else {
            Direction::Right
        };
        let seconds = random_int(rng, ctx.snail.tuning.min_move, ctx.snail.tuning.max_move);
        self.task = Some(ctx.snail.timer.wait(f64::from(seconds), SnailSignal::MoveOver));
    }
}

impl<'w, 'a> State<SnailStateName, SnailContext<'w, 'a>> for MovingState {
    type Params = ();

    fn enter(&mut self, ctx: &mut SnailContext<'w, 'a>, _params: ()) {
        ctx.snail.entity.animation = Animation::new(vec![6, 7], 1.0);
        self.pick_leg(ctx);
    }

    fn exit(&mut self, ctx: &mut SnailContext<'w, 'a>) {
        cancel_task(ctx, &mut self.task);
    }

    fn update(&mut self, ctx: &mut SnailContext<'w, 'a>, dt: f64) -> Option<SnailTransition> {
        if ctx.observe_death() {
            return Some(Transition::to(SnailStateName::Dying));
        }

        if ctx.received(SnailSignal::MoveOver) {
            self.task = None;
            if did_succeed_chance(&mut ctx.world.services.rng, 0.5) {
                return Some(Transition::to(SnailStateName::Idle));
            }
            self.pick_leg(ctx);
        }

        let step = ctx.snail.entity.velocity_limit.x / 2.0 * dt as f32;
        match ctx.snail.entity.direction {
            Direction::Left => {
                ctx.snail.entity.position.x -= step;
                if ctx.is_collision_left() {
                    ctx.snail.entity.position.x += step;
                    ctx.snail.entity.direction = Direction::Right;
                }
            }
            Direction::Right => {
                ctx.snail.entity.position.x += step;
                if ctx.is_collision_right() {
                    ctx.snail.entity.position.x -= step;
                    ctx.snail.entity.direction = Direction::Left;
                }
            }
        }

        if ctx.is_target_in_range() {
            return Some(Transition::to(SnailStateName::Chasing));
        }
        None
    }
}

/// Heading for the target at full speed while it stays in range.
#[derive(Debug, Clone, Default)]
pub struct ChasingState;

impl<'w, 'a> State<SnailStateName, SnailContext<'w, 'a>> for ChasingState {
    type Params = ();

    fn enter(&mut self, ctx: &mut SnailContext<'w, 'a>, _params: ()) {
        ctx.snail.entity.animation = Animation::new(vec![6, 7], 0.25);
    }

    fn update(&mut self, ctx: &mut SnailContext<'w, 'a>, dt: f64) -> Option<SnailTransition> {
        if ctx.observe_death() {
            return Some(Transition::to(SnailStateName::Dying));
        }
        if !ctx.is_target_in_range() {
            return Some(Transition::to(SnailStateName::Moving));
        }
        let Some(target_x) = ctx.target().map(|target| target.position.x) else {
            return Some(Transition::to(SnailStateName::Moving));
        };

        let step = ctx.snail.entity.velocity_limit.x * dt as f32;
        if target_x < ctx.snail.entity.position.x {
            ctx.snail.entity.direction = Direction::Left;
            if !ctx.is_collision_left() {
                ctx.snail.entity.position.x -= step;
            }
        } else {
            ctx.snail.entity.direction = Direction::Right;
            if !ctx.is_collision_right() {
                ctx.snail.entity.position.x += step;
            }
        }
        None
    }
}

/// Stomped: a particle burst, then removal once it burns out.
#[derive(Debug, Clone, Default)]
pub struct DyingState {
    particles: Vec<Particle>,
}

impl DyingState {
    pub fn render_particles(&self, out: &mut RenderList) {
        for particle in &self.particles {
            particle.render(out);
        }
    }
}

impl<'w, 'a> State<SnailStateName, SnailContext<'w, 'a>> for DyingState {
    type Params = ();

    fn enter(&mut self, ctx: &mut SnailContext<'w, 'a>, _params: ()) {
        ctx.snail.entity.velocity = glam::Vec2::ZERO;
        self.particles = burst(
            ctx.snail.entity.hitbox().center(),
            ctx.snail.tuning.death_particles,
            &DEATH_PARTICLES,
            &mut ctx.world.services.rng,
        );
        ctx.world.services.sounds.play(SoundName::Kill);
        ctx.world.services.sounds.play(SoundName::Kill2);
        let points = ctx.snail.tuning.points;
        ctx.award_target(points);
    }

    fn update(&mut self, ctx: &mut SnailContext<'w, 'a>, dt: f64) -> Option<SnailTransition> {
        for particle in &mut self.particles {
            particle.update(dt);
        }
        self.particles.retain(Particle::is_alive);
        if self.particles.is_empty() {
            ctx.snail.entity.clean_up = true;
        }
        None
    }
}
