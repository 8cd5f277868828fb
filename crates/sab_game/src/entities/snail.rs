//! Snail enemy.
//!
//! A snail wanders (Idle and Moving), chases its target player when it gets
//! within range, and plays a particle burst once stomped. Each snail owns a
//! small timer for its idle and move durations; the states that schedule on
//! it cancel their task when they exit, so a stale expiry can never reach a
//! different state.

use glam::Vec2;
use sab_core::geometry::{Collidable, Rect};
use sab_core::particle::ParticleProfile;
use sab_core::render::RenderList;
use sab_core::state_machine::StateMachine;
use sab_core::timer::{Timer, TimerEvent};

use super::snail_states::{ChasingState, DyingState, IdleState, MovingState, SnailState};
use super::{Direction, Entity, EntityBody, EntityId, World};
use crate::assets::ImageName;
use crate::config::SnailConfig;
use crate::sprite::{row_strip, Sprite};
use crate::tilemap::{Tilemap, TILE_SIZE};

pub const SNAIL_WIDTH: f32 = 16.0;
pub const SNAIL_HEIGHT: f32 = 16.0;
const SNAIL_SPRITES: usize = 8;
/// Row of the creature sheet that holds the snail frames.
const SNAIL_SHEET_ROW: f32 = 6.0;

pub const DEATH_PARTICLES: ParticleProfile = ParticleProfile {
    color: [255, 50, 150],
    radius: 2.0,
    lifetime: 100.0,
    speed: 40.0,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SnailStateName {
    Idle,
    Moving,
    Chasing,
    Dying,
}

/// Expiries delivered by the snail's own timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnailSignal {
    IdleOver,
    MoveOver,
}

#[derive(Debug, Clone)]
pub struct SnailBody {
    pub entity: EntityBody,
    /// The player this snail chases and rewards when it dies.
    pub target: EntityId,
    /// Set once the level's live-snail count has been decremented for this
    /// snail.
    pub death_counted: bool,
    pub timer: Timer<SnailSignal>,
    pub tuning: SnailConfig,
}

impl SnailBody {
    pub fn chase_distance(&self) -> f32 {
        self.tuning.chase_distance_tiles * TILE_SIZE
    }

    /// Blocked on the left by the map edge, a wall, or a drop.
    pub fn is_collision_left(&self, tilemap: &Tilemap) -> bool {
        let Rect { x, y, h, .. } = self.entity.hitbox();
        if x < 0.0 {
            return true;
        }
        Self::is_blocked(tilemap, Vec2::new(x, y), Vec2::new(x, y + h))
    }

    /// Blocked on the right by the map edge, a wall, or a drop.
    pub fn is_collision_right(&self, tilemap: &Tilemap) -> bool {
        let Rect { x, y, w, h } = self.entity.hitbox();
        if x > tilemap.canvas_dimensions().x - w {
            return true;
        }
        Self::is_blocked(tilemap, Vec2::new(x + w, y), Vec2::new(x + w, y + h))
    }

    fn is_blocked(tilemap: &Tilemap, front: Vec2, front_bottom: Vec2) -> bool {
        match (tilemap.point_to_tile(front), tilemap.point_to_tile(front_bottom)) {
            (Some(front), Some(below)) => front.is_collidable() || !below.is_collidable(),
            _ => false,
        }
    }
}

/// What a snail state gets to work with for one call.
pub struct SnailContext<'w, 'a> {
    pub snail: &'w mut SnailBody,
    pub world: &'w mut World<'a>,
    /// Timer expiries that fired at the start of this update.
    pub signals: &'w [SnailSignal],
}

impl SnailContext<'_, '_> {
    pub fn received(&self, signal: SnailSignal) -> bool {
        self.signals.contains(&signal)
    }

    /// True once the snail has been killed. The first call for a dead snail
    /// takes it off the level's live count.
    pub fn observe_death(&mut self) -> bool {
        if !self.snail.entity.is_dead {
            return false;
        }
        if !self.snail.death_counted {
            self.snail.death_counted = true;
            let live = &mut self.world.playfield.num_of_snails;
            *live = live.saturating_sub(1);
            log::debug!("Snail {:?} died, {} left", self.snail.entity.id, live);
        }
        true
    }

    pub fn target(&self) -> Option<&EntityBody> {
        self.world
            .others
            .find(self.snail.target)
            .map(|entity| entity.body())
    }

    pub fn distance_to_target(&self) -> Option<f32> {
        self.target()
            .map(|target| self.snail.entity.distance_to(target))
    }

    pub fn is_target_in_range(&self) -> bool {
        self.distance_to_target()
            .is_some_and(|distance| distance <= self.snail.chase_distance())
    }

    pub fn award_target(&mut self, points: u32) {
        if let Some(Entity::Player(player)) = self.world.others.find_mut(self.snail.target) {
            player.body.score += points;
        }
    }

    pub fn is_collision_left(&self) -> bool {
        self.snail.is_collision_left(self.world.tilemap)
    }

    pub fn is_collision_right(&self) -> bool {
        self.snail.is_collision_right(self.world.tilemap)
    }
}

#[derive(Debug, Clone)]
pub struct Snail {
    pub body: SnailBody,
    machine: StateMachine<SnailStateName, SnailState>,
    sprites: Vec<Sprite>,
}

impl Snail {
    pub fn new(id: EntityId, position: Vec2, target: EntityId, config: &SnailConfig) -> Self {
        let mut machine = StateMachine::new();
        for (name, state) in [
            (SnailStateName::Idle, SnailState::Idle(IdleState::default())),
            (SnailStateName::Moving, SnailState::Moving(MovingState::default())),
            (SnailStateName::Chasing, SnailState::Chasing(ChasingState)),
            (SnailStateName::Dying, SnailState::Dying(DyingState::default())),
        ] {
            if let Err(err) = machine.add(name, state) {
                log::error!("Snail setup: {err}");
            }
        }

        Self {
            body: SnailBody {
                entity: EntityBody::new(
                    id,
                    Vec2::new(SNAIL_WIDTH, SNAIL_HEIGHT),
                    position,
                    Vec2::splat(config.velocity_limit),
                ),
                target,
                death_counted: false,
                timer: Timer::new(),
                tuning: config.clone(),
            },
            machine,
            sprites: row_strip(
                ImageName::Creatures,
                SNAIL_HEIGHT * SNAIL_SHEET_ROW,
                SNAIL_WIDTH,
                SNAIL_HEIGHT,
                SNAIL_SPRITES,
            ),
        }
    }

    pub fn id(&self) -> EntityId {
        self.body.entity.id
    }

    pub fn state(&self) -> Option<SnailStateName> {
        self.machine.current()
    }

    /// Snails start idle on their first update.
    pub fn update(&mut self, world: &mut World<'_>, dt: f64) {
        if self.machine.current().is_none() {
            let mut ctx = SnailContext {
                snail: &mut self.body,
                world: &mut *world,
                signals: &[],
            };
            if let Err(err) = self.machine.change(SnailStateName::Idle, (), &mut ctx) {
                log::error!("Snail {:?} could not start: {}", ctx.snail.entity.id, err);
            }
        }

        let signals: Vec<SnailSignal> = self
            .body
            .timer
            .update(dt)
            .into_iter()
            .filter_map(|event| match event {
                TimerEvent::Fired(signal) => Some(signal),
                TimerEvent::Tweened { .. } => None,
            })
            .collect();

        let mut ctx = SnailContext {
            snail: &mut self.body,
            world,
            signals: &signals,
        };
        self.machine.update(&mut ctx, dt);
        self.body.entity.animation.update(dt);
    }

    pub fn render(&self, out: &mut RenderList) {
        if let Some(SnailState::Dying(dying)) = self.machine.current_state() {
            dying.render_particles(out);
            return;
        }
        let frame = self.body.entity.animation.current_frame();
        if let Some(sprite) = self.sprites.get(frame) {
            sprite.render_flipped(
                out,
                self.body.entity.position,
                self.body.entity.direction == Direction::Left,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PlayerConfig;
    use crate::entities::Player;
    use crate::level::test_support::flat_level;
    use crate::level::Level;
    use crate::services::Services;
    use crate::assets::SoundName;
    use sab_core::render::DrawCommand;

    const GROUND_Y: f32 = 160.0;

    fn fixed_idle() -> SnailConfig {
        SnailConfig {
            min_idle: 2,
            max_idle: 2,
            ..SnailConfig::default()
        }
    }

    /// A 40x12 flat level with a player at `player_x` and one snail at
    /// `snail_x`. The snail is added first so it updates before the player.
    fn setup(player_x: f32, snail_x: f32, config: &SnailConfig) -> (Level, EntityId, EntityId) {
        let mut level = flat_level(40, 12, 10);
        let player_id = level.allocate_entity_id();
        let snail_id = level.allocate_entity_id();
        level.add_snail(Snail::new(
            snail_id,
            Vec2::new(snail_x, GROUND_Y - SNAIL_HEIGHT),
            player_id,
            config,
        ));
        level.add_entity(Entity::Player(Player::new(
            player_id,
            Vec2::new(player_x, GROUND_Y - 20.0),
            &PlayerConfig::default(),
        )));
        (level, player_id, snail_id)
    }

    fn snail(level: &Level, id: EntityId) -> &Snail {
        level
            .entity(id)
            .and_then(Entity::as_snail)
            .expect("snail in level")
    }

    #[test]
    fn idle_snail_starts_moving_after_its_idle_duration() {
        let (mut level, _, snail_id) = setup(560.0, 100.0, &fixed_idle());
        let mut services = Services::seeded(21);

        for _ in 0..19 {
            level.update(&mut services, 0.1);
        }
        assert_eq!(snail(&level, snail_id).state(), Some(SnailStateName::Idle));

        level.update(&mut services, 0.1);
        assert_eq!(snail(&level, snail_id).state(), Some(SnailStateName::Moving));
    }

    #[test]
    fn idle_snail_chases_a_nearby_player_and_drops_its_timer() {
        let (mut level, _, snail_id) = setup(160.0, 100.0, &fixed_idle());
        let mut services = Services::seeded(22);

        level.update(&mut services, 1.0 / 60.0);

        let snail = snail(&level, snail_id);
        assert_eq!(snail.state(), Some(SnailStateName::Chasing));
        assert!(snail.body.timer.is_empty());
    }

    #[test]
    fn chasing_snail_heads_for_the_player_then_gives_up() {
        let (mut level, player_id, snail_id) = setup(160.0, 100.0, &fixed_idle());
        let mut services = Services::seeded(23);

        for _ in 0..30 {
            level.update(&mut services, 1.0 / 60.0);
        }
        let chasing = snail(&level, snail_id);
        assert_eq!(chasing.state(), Some(SnailStateName::Chasing));
        assert_eq!(chasing.body.entity.direction, Direction::Right);
        assert!(chasing.body.entity.position.x > 100.0);

        level
            .player_mut(player_id)
            .expect("player")
            .body
            .entity
            .position
            .x = 600.0;
        level.update(&mut services, 1.0 / 60.0);
        assert_eq!(snail(&level, snail_id).state(), Some(SnailStateName::Moving));
    }

    #[test]
    fn dead_snail_is_counted_once_and_rewards_the_player() {
        let (mut level, player_id, snail_id) = setup(560.0, 100.0, &fixed_idle());
        let mut services = Services::seeded(24);
        level.update(&mut services, 1.0 / 60.0);
        assert_eq!(level.playfield.num_of_snails, 1);

        level
            .entity_mut(snail_id)
            .expect("snail")
            .body_mut()
            .is_dead = true;
        level.update(&mut services, 1.0 / 60.0);
        level.update(&mut services, 1.0 / 60.0);

        assert_eq!(level.playfield.num_of_snails, 0);
        assert_eq!(snail(&level, snail_id).state(), Some(SnailStateName::Dying));
        assert_eq!(services.sounds.play_count(SoundName::Kill), 1);
        assert_eq!(services.sounds.play_count(SoundName::Kill2), 1);
        assert_eq!(
            level.player(player_id).expect("player").body.score,
            SnailConfig::default().points
        );

        let mut out = RenderList::new();
        snail(&level, snail_id).render(&mut out);
        assert_eq!(out.len(), SnailConfig::default().death_particles);
        assert!(out
            .commands()
            .iter()
            .all(|command| matches!(command, DrawCommand::Circle { color: [255, 50, 150], .. })));

        // Particles burn out after about a second, then the snail is removed.
        for _ in 0..120 {
            level.update(&mut services, 1.0 / 60.0);
        }
        assert!(level.entity(snail_id).is_none());
        assert_eq!(level.playfield.num_of_snails, 0);
    }

    #[test]
    fn edges_walls_and_drops_block_movement() {
        let mut level = flat_level(10, 12, 10);
        let config = SnailConfig::default();

        let at_left_edge = Snail::new(EntityId(0), Vec2::new(-1.0, GROUND_Y - 16.0), EntityId(9), &config);
        assert!(at_left_edge.body.is_collision_left(&level.tilemap));

        let at_right_edge = Snail::new(EntityId(1), Vec2::new(145.0, GROUND_Y - 16.0), EntityId(9), &config);
        assert!(at_right_edge.body.is_collision_right(&level.tilemap));

        let open_ground = Snail::new(EntityId(2), Vec2::new(64.0, GROUND_Y - 16.0), EntityId(9), &config);
        assert!(!open_ground.body.is_collision_left(&level.tilemap));
        assert!(!open_ground.body.is_collision_right(&level.tilemap));

        // Knock out the ground to the right: the snail sees a drop ahead.
        level = crate::level::test_support::level_with_hole(10, 12, 10, 5);
        let before_hole = Snail::new(EntityId(3), Vec2::new(64.0, GROUND_Y - 16.0), EntityId(9), &config);
        assert!(before_hole.body.is_collision_right(&level.tilemap));
        assert!(!before_hole.body.is_collision_left(&level.tilemap));
    }
}
