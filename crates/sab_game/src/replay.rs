use sab_core::input::Key;
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize, Clone)]
pub struct ReplaySequence {
    #[serde(default = "sixty_hz")]
    pub fixed_dt: f64,
    #[serde(default)]
    pub seed: u64,
    pub frames: Vec<ReplayFrame>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ReplayFrame {
    /// Keys held during this frame, by name (`"d"`, `"space"`, ...).
    #[serde(default)]
    pub keys: Vec<String>,
    #[serde(default = "once")]
    pub repeat: u32,
}

/// Longest step a replay may ask for. Collisions are sampled once per step.
pub const MAX_STEP: f64 = 1.0 / 20.0;

impl ReplaySequence {
    pub fn from_json(raw: &str) -> Result<Self, String> {
        let replay: Self =
            serde_json::from_str(raw).map_err(|e| format!("Replay JSON is malformed: {e}"))?;
        replay.check()?;
        Ok(replay)
    }

    fn check(&self) -> Result<(), String> {
        if !(self.fixed_dt > 0.0 && self.fixed_dt <= MAX_STEP) {
            return Err(format!(
                "Replay step {} is outside (0, {MAX_STEP:.3}]",
                self.fixed_dt
            ));
        }
        if self.frames.is_empty() {
            return Err("Replay has no frames".to_string());
        }
        for (index, frame) in self.frames.iter().enumerate() {
            if let Some(name) = frame.keys.iter().find(|name| Key::from_name(name).is_none()) {
                return Err(format!("Replay frame {index} names unknown key {name:?}"));
            }
        }
        Ok(())
    }

    /// Number of simulation steps the replay covers.
    pub fn step_count(&self) -> usize {
        self.frames
            .iter()
            .map(|frame| frame.repeat.max(1) as usize)
            .sum()
    }

    /// One key set per simulation step.
    pub fn expanded_inputs(&self) -> Vec<Vec<Key>> {
        let mut out = Vec::with_capacity(self.step_count());
        for frame in &self.frames {
            let keys: Vec<Key> = frame.keys.iter().filter_map(|name| Key::from_name(name)).collect();
            out.extend(std::iter::repeat(keys).take(frame.repeat.max(1) as usize));
        }
        out
    }

    /// Press Enter on the title, walk right, then run and jump.
    pub fn walk_right(seed: u64) -> Self {
        let frame = |keys: &[&str], repeat| ReplayFrame {
            keys: keys.iter().map(|key| key.to_string()).collect(),
            repeat,
        };
        Self {
            fixed_dt: sixty_hz(),
            seed,
            frames: vec![
                frame(&[], 1),
                frame(&["enter"], 1),
                frame(&["d"], 240),
                frame(&["d", "space"], 20),
                frame(&["d"], 120),
            ],
        }
    }
}

pub fn load_replay_from_path(path: &Path) -> Result<ReplaySequence, String> {
    let raw = fs::read_to_string(path)
        .map_err(|e| format!("Could not read replay {}: {e}", path.display()))?;
    ReplaySequence::from_json(&raw).map_err(|e| format!("{}: {e}", path.display()))
}

const fn sixty_hz() -> f64 {
    1.0 / 60.0
}

const fn once() -> u32 {
    1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::game_state::Game;
    use crate::services::Services;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_file_path(name_hint: &str) -> std::path::PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before unix epoch")
            .as_nanos();
        std::env::temp_dir().join(format!(
            "sab_replay_test_{}_{}_{}.json",
            name_hint,
            std::process::id(),
            nanos
        ))
    }

    fn run(replay: &ReplaySequence) -> (u32, Vec<crate::game_state::GameEvent>) {
        let mut game =
            Game::new(GameConfig::default(), Services::seeded(replay.seed)).expect("valid config");
        let mut events = Vec::new();
        for keys in replay.expanded_inputs() {
            game.input_mut().apply_snapshot(&keys);
            game.update(replay.fixed_dt);
            events.extend(game.drain_events());
        }
        (game.score(), events)
    }

    #[test]
    fn replay_file_parses_and_expands() {
        let path = temp_file_path("parse");
        fs::write(
            &path,
            r#"{
              "seed": 7,
              "frames": [
                { "keys": ["d"], "repeat": 3 },
                { "keys": ["d", "space"] },
                { "repeat": 0 }
              ]
            }"#,
        )
        .expect("write replay file");

        let replay = load_replay_from_path(&path).expect("replay should load");
        assert_eq!(replay.seed, 7);
        assert!((replay.fixed_dt - 1.0 / 60.0).abs() < 1e-12);
        assert_eq!(replay.step_count(), 5);

        let expanded = replay.expanded_inputs();
        assert_eq!(expanded.len(), 5);
        assert_eq!(expanded[0], vec![Key::D]);
        assert_eq!(expanded[3], vec![Key::D, Key::Space]);
        assert!(expanded[4].is_empty());

        let _ = fs::remove_file(path);
    }

    #[test]
    fn unusable_replays_are_rejected() {
        let err = ReplaySequence::from_json(r#"{ "fixed_dt": 0.0, "frames": [{}] }"#)
            .expect_err("zero step");
        assert!(err.contains("step"));

        let err = ReplaySequence::from_json(r#"{ "fixed_dt": 0.5, "frames": [{}] }"#)
            .expect_err("step long enough to tunnel");
        assert!(err.contains("step"));

        let err = ReplaySequence::from_json(r#"{ "frames": [] }"#).expect_err("no frames");
        assert!(err.contains("no frames"));

        let err = ReplaySequence::from_json(r#"{ "frames": [{}, { "keys": ["warp"] }] }"#)
            .expect_err("unknown key");
        assert!(err.contains("frame 1") && err.contains("warp"));

        let missing = temp_file_path("missing");
        let err = load_replay_from_path(&missing).expect_err("missing file");
        assert!(err.contains("Could not read replay"));
    }

    #[test]
    fn same_seed_and_inputs_replay_identically() {
        let replay = ReplaySequence::walk_right(11);
        assert_eq!(run(&replay), run(&replay));
    }
}
