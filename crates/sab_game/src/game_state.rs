//! Top-level game flow: a title screen over a freshly generated level, and
//! the play state that runs it.
//!
//! `Game` is what a host drives. It owns the services and the flow machine,
//! takes one `update(dt)` and one `render()` per frame, and reports what
//! happened through `GameEvent`s and the running score.

use glam::Vec2;
use sab_core::input::{InputState, Key};
use sab_core::render::RenderList;
use sab_core::state_machine::{State, StateMachine, Transition};

use crate::assets::SoundName;
use crate::camera::Camera;
use crate::config::{validate_config, GameConfig};
use crate::entities::{Entity, EntityId, Player};
use crate::level::Level;
use crate::level_maker::{generate_session, spawn_flag};
use crate::services::{Services, SoundCommand};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameStateName {
    Title,
    Play,
}

/// A level together with the player about to enter it.
#[derive(Debug, Clone)]
pub struct Session {
    pub level: Level,
    pub player: Player,
}

/// Things the host may want to react to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    PlayerDied { score: u32 },
    FlagSpawned,
    LevelWon { score: u32 },
}

pub struct GameContext<'g> {
    pub services: &'g mut Services,
    pub config: &'g GameConfig,
    pub events: &'g mut Vec<GameEvent>,
}

impl GameContext<'_> {
    fn new_session(&mut self) -> Session {
        generate_session(self.config, &mut self.services.rng)
    }
}

type GameTransition = Transition<GameStateName, Option<Session>>;

#[derive(Debug, Clone)]
pub enum GameState {
    Title(TitleState),
    Play(PlayState),
}

impl<'g> State<GameStateName, GameContext<'g>> for GameState {
    type Params = Option<Session>;

    fn enter(&mut self, ctx: &mut GameContext<'g>, params: Option<Session>) {
        match self {
            Self::Title(state) => state.enter(ctx, params),
            Self::Play(state) => state.enter(ctx, params),
        }
    }

    fn exit(&mut self, ctx: &mut GameContext<'g>) {
        match self {
            Self::Title(state) => state.exit(ctx),
            Self::Play(state) => state.exit(ctx),
        }
    }

    fn update(&mut self, ctx: &mut GameContext<'g>, dt: f64) -> Option<GameTransition> {
        match self {
            Self::Title(state) => state.update(ctx, dt),
            Self::Play(state) => state.update(ctx, dt),
        }
    }

    fn render(&self, _ctx: &GameContext<'g>, out: &mut RenderList) {
        self.draw(out);
    }
}

impl GameState {
    /// Drawing needs nothing from the context, so the game can render
    /// through a shared borrow.
    fn draw(&self, out: &mut RenderList) {
        match self {
            Self::Title(state) => state.draw(out),
            Self::Play(state) => state.draw(out),
        }
    }
}

/// Shows a new level behind a dimmed title until Enter is pressed.
#[derive(Debug, Clone, Default)]
pub struct TitleState {
    session: Option<Session>,
}

impl<'g> State<GameStateName, GameContext<'g>> for TitleState {
    type Params = Option<Session>;

    fn enter(&mut self, ctx: &mut GameContext<'g>, params: Option<Session>) {
        self.session = Some(params.unwrap_or_else(|| ctx.new_session()));
    }

    fn update(&mut self, ctx: &mut GameContext<'g>, _dt: f64) -> Option<GameTransition> {
        if ctx.services.input.is_just_pressed(Key::Enter) {
            return Some(Transition::with(GameStateName::Play, self.session.take()));
        }
        None
    }

    fn render(&self, _ctx: &GameContext<'g>, out: &mut RenderList) {
        self.draw(out);
    }
}

impl TitleState {
    fn draw(&self, out: &mut RenderList) {
        if let Some(session) = &self.session {
            session.level.render(out);
        }
        out.push_overlay([0, 0, 0], 0.5);
    }
}

#[derive(Debug, Clone)]
pub struct PlayState {
    level: Option<Level>,
    player: EntityId,
    camera: Camera,
}

impl Default for PlayState {
    fn default() -> Self {
        Self {
            level: None,
            player: EntityId(0),
            camera: Camera::new(Vec2::ZERO, Vec2::ZERO),
        }
    }
}

impl PlayState {
    fn player(&self) -> Option<&Player> {
        self.level.as_ref()?.player(self.player)
    }

    pub fn score(&self) -> u32 {
        self.player().map_or(0, |player| player.body.score)
    }

    fn draw(&self, out: &mut RenderList) {
        out.camera_offset = self.camera.position;
        if let Some(level) = &self.level {
            level.render(out);
        }
    }
}

impl<'g> State<GameStateName, GameContext<'g>> for PlayState {
    type Params = Option<Session>;

    fn enter(&mut self, ctx: &mut GameContext<'g>, params: Option<Session>) {
        let Session { mut level, player } = params.unwrap_or_else(|| ctx.new_session());
        let viewport = Vec2::new(ctx.config.viewport.width, ctx.config.viewport.height);
        self.camera = Camera::new(viewport, level.canvas_dimensions());
        self.camera.follow(player.body.hitbox());
        self.player = player.id();
        level.add_entity(Entity::Player(player));
        self.level = Some(level);
        ctx.services.sounds.play(SoundName::Music);
    }

    fn exit(&mut self, ctx: &mut GameContext<'g>) {
        ctx.services.sounds.stop(SoundName::Music);
    }

    fn update(&mut self, ctx: &mut GameContext<'g>, dt: f64) -> Option<GameTransition> {
        let level = self.level.as_mut()?;
        level.update(ctx.services, dt);

        let Some(player) = level.player(self.player) else {
            log::error!("Player {:?} vanished from the level", self.player);
            return Some(Transition::to(GameStateName::Title));
        };
        self.camera.follow(player.body.hitbox());
        let score = player.body.score;

        if player.body.entity.is_dead {
            log::info!("Player died with score {}", score);
            ctx.events.push(GameEvent::PlayerDied { score });
            return Some(Transition::to(GameStateName::Title));
        }

        if level.num_of_snails() == 0 && !level.playfield.flag_spawned {
            let ground_row = ctx.config.level.ground_row(level.tilemap.height());
            if spawn_flag(level, ground_row) {
                ctx.events.push(GameEvent::FlagSpawned);
            }
            level.playfield.flag_spawned = true;
        } else if level.is_won() {
            log::info!("Level won with score {}", score);
            ctx.events.push(GameEvent::LevelWon { score });
            return Some(Transition::with(GameStateName::Play, Some(ctx.new_session())));
        }
        None
    }

    fn render(&self, _ctx: &GameContext<'g>, out: &mut RenderList) {
        self.draw(out);
    }
}

pub struct Game {
    config: GameConfig,
    services: Services,
    machine: StateMachine<GameStateName, GameState>,
    events: Vec<GameEvent>,
}

impl Game {
    /// Validates `config` and opens on the title screen.
    pub fn new(config: GameConfig, services: Services) -> Result<Self, String> {
        validate_config(&config)?;
        let mut machine = StateMachine::new();
        machine.add(GameStateName::Title, GameState::Title(TitleState::default()))?;
        machine.add(GameStateName::Play, GameState::Play(PlayState::default()))?;

        let mut game = Self {
            config,
            services,
            machine,
            events: Vec::new(),
        };
        let Self {
            config,
            services,
            machine,
            events,
        } = &mut game;
        let mut ctx = GameContext {
            services,
            config,
            events,
        };
        machine.change(GameStateName::Title, None, &mut ctx)?;
        Ok(game)
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Keyboard snapshot the host writes into before each update.
    pub fn input_mut(&mut self) -> &mut InputState {
        &mut self.services.input
    }

    pub fn state(&self) -> Option<GameStateName> {
        self.machine.current()
    }

    pub fn update(&mut self, dt: f64) {
        let mut ctx = GameContext {
            services: &mut self.services,
            config: &self.config,
            events: &mut self.events,
        };
        self.machine.update(&mut ctx, dt);
        self.services.input.end_frame();
    }

    pub fn render(&self) -> RenderList {
        let mut out = RenderList::new();
        if let Some(state) = self.machine.current_state() {
            state.draw(&mut out);
        }
        out
    }

    /// Score of the player currently in play; zero on the title screen.
    pub fn score(&self) -> u32 {
        match self.machine.current_state() {
            Some(GameState::Play(play)) => play.score(),
            _ => 0,
        }
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn drain_sounds(&mut self) -> Vec<SoundCommand> {
        self.services.sounds.drain()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sab_core::render::DrawCommand;

    /// Flat ground everywhere, no props, no snails.
    fn calm_config() -> GameConfig {
        let mut config = GameConfig::default();
        config.level.pillar_chance = 0.0;
        config.level.chasm_chance = 0.0;
        config.level.block_chance = 0.0;
        config.level.bush_chance = 0.0;
        config.level.snail_chance = 0.0;
        config
    }

    fn start_playing(config: GameConfig, seed: u64) -> Game {
        let mut game = Game::new(config, Services::seeded(seed)).expect("valid config");
        game.input_mut().key_down(Key::Enter);
        game.update(1.0 / 60.0);
        game.input_mut().key_up(Key::Enter);
        assert_eq!(game.state(), Some(GameStateName::Play));
        game
    }

    fn play_level(game: &mut Game) -> &mut Level {
        match game.machine.state_mut(GameStateName::Play) {
            Some(GameState::Play(play)) => play.level.as_mut().expect("level in play"),
            _ => panic!("play state missing"),
        }
    }

    fn player_id(game: &Game) -> EntityId {
        match game.machine.state(GameStateName::Play) {
            Some(GameState::Play(play)) => play.player,
            _ => panic!("play state missing"),
        }
    }

    #[test]
    fn rejects_invalid_config() {
        let mut config = GameConfig::default();
        config.level.snail_chance = 2.0;
        assert!(Game::new(config, Services::seeded(0)).is_err());
    }

    #[test]
    fn title_waits_for_enter_then_plays_music() {
        let mut game = Game::new(calm_config(), Services::seeded(1)).expect("valid config");
        assert_eq!(game.state(), Some(GameStateName::Title));

        game.update(1.0 / 60.0);
        assert_eq!(game.state(), Some(GameStateName::Title));
        let title = game.render();
        assert!(matches!(title.commands().last(), Some(DrawCommand::Overlay { .. })));

        game.input_mut().key_down(Key::Enter);
        game.update(1.0 / 60.0);
        assert_eq!(game.state(), Some(GameStateName::Play));
        assert_eq!(game.drain_sounds(), vec![SoundCommand::Play(SoundName::Music)]);

        let id = player_id(&game);
        assert!(play_level(&mut game).player(id).is_some());
    }

    #[test]
    fn empty_level_spawns_the_flag_once() {
        let mut game = start_playing(calm_config(), 2);
        for _ in 0..10 {
            game.update(1.0 / 60.0);
        }
        assert_eq!(game.drain_events(), vec![GameEvent::FlagSpawned]);
        let flags = play_level(&mut game)
            .playfield
            .objects()
            .iter()
            .filter(|object| matches!(object, crate::objects::GameObject::Flagpole(_)))
            .count();
        assert_eq!(flags, 2);
    }

    #[test]
    fn death_returns_to_a_fresh_title() {
        let mut game = start_playing(calm_config(), 3);
        game.drain_sounds();
        let id = player_id(&game);
        play_level(&mut game)
            .player_mut(id)
            .expect("player")
            .body
            .entity
            .is_dead = true;

        game.update(1.0 / 60.0);

        assert_eq!(game.state(), Some(GameStateName::Title));
        assert!(game
            .drain_events()
            .contains(&GameEvent::PlayerDied { score: 0 }));
        assert_eq!(game.drain_sounds(), vec![SoundCommand::Stop(SoundName::Music)]);
        assert_eq!(game.score(), 0);
    }

    #[test]
    fn winning_builds_a_new_level_with_a_fresh_player() {
        let mut game = start_playing(calm_config(), 4);
        game.update(1.0 / 60.0);
        game.drain_events();
        game.drain_sounds();

        let id = player_id(&game);
        let level = play_level(&mut game);
        level.player_mut(id).expect("player").body.score = 123;
        level.playfield.is_won = true;

        game.update(1.0 / 60.0);

        assert_eq!(game.state(), Some(GameStateName::Play));
        assert_eq!(game.drain_events(), vec![GameEvent::LevelWon { score: 123 }]);
        assert_eq!(game.score(), 0);
        assert!(!play_level(&mut game).is_won());
        assert_eq!(
            game.drain_sounds(),
            vec![
                SoundCommand::Stop(SoundName::Music),
                SoundCommand::Play(SoundName::Music),
            ]
        );
    }

    #[test]
    fn play_render_uses_the_camera() {
        let mut game = start_playing(calm_config(), 5);
        game.update(1.0 / 60.0);
        let shown: &Game = &game;
        let out = shown.render();
        assert_eq!(shown.render().len(), out.len());

        // 45x18 map in a 384x288 view: the camera sits at the bottom edge.
        assert_eq!(out.camera_offset.y, 18.0 * 16.0 - 288.0);
        assert_eq!(out.camera_offset.x, 0.0);
        assert!(out
            .commands()
            .iter()
            .any(|command| matches!(command, DrawCommand::Sprite { image: "character", .. })));
    }
}
