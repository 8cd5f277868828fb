//! Headless runner for Super Alien Bros.
//!
//! Usage: `sab_game [replay.json] [config.json]`
//!
//! Plays a replay (or a built-in walk-right script) through the full game
//! flow at a fixed timestep and logs what happened. With the same seed and
//! inputs every run is identical, which makes this the quickest way to check
//! a tuning change without a renderer attached.

use std::path::Path;

use sab_game::config::{load_config_from_path, GameConfig};
use sab_game::game_state::{Game, GameEvent};
use sab_game::replay::{load_replay_from_path, ReplaySequence};
use sab_game::services::{Services, SoundCommand};

const DEFAULT_SEED: u64 = 1;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Super Alien Bros. headless runner starting...");

    if let Err(err) = run() {
        log::error!("{err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let mut args = std::env::args().skip(1);
    let replay = match args.next() {
        Some(path) => load_replay_from_path(Path::new(&path))?,
        None => {
            log::info!("No replay given, walking right with seed {}", DEFAULT_SEED);
            ReplaySequence::walk_right(DEFAULT_SEED)
        }
    };
    let config = match args.next() {
        Some(path) => load_config_from_path(Path::new(&path))?,
        None => GameConfig::default(),
    };

    let mut game = Game::new(config, Services::seeded(replay.seed))?;
    let inputs = replay.expanded_inputs();
    let mut sounds_played = 0usize;

    for (step, keys) in inputs.iter().enumerate() {
        game.input_mut().apply_snapshot(keys);
        game.update(replay.fixed_dt);
        let frame = game.render();

        for event in game.drain_events() {
            match event {
                GameEvent::PlayerDied { score } => {
                    log::info!("step {step}: player died (score {score})")
                }
                GameEvent::FlagSpawned => log::info!("step {step}: flag spawned"),
                GameEvent::LevelWon { score } => {
                    log::info!("step {step}: level won (score {score})")
                }
            }
        }
        for command in game.drain_sounds() {
            if let SoundCommand::Play(sound) = command {
                log::debug!("step {step}: play {sound}");
                sounds_played += 1;
            }
        }
        log::trace!(
            "step {step}: {:?}, {} draw commands",
            game.state(),
            frame.len()
        );
    }

    log::info!(
        "Finished {} steps in {:?}: score {}, {} sounds",
        inputs.len(),
        game.state(),
        game.score(),
        sounds_played
    );
    Ok(())
}
