//! Gameplay tuning loaded from JSON.
//!
//! Every field has a default matching the shipped game, so a config file only
//! needs the values it wants to change. Files are validated after parsing so
//! the simulation can trust ranges and probabilities without re-checking.

use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct GameConfig {
    pub level: LevelConfig,
    pub player: PlayerConfig,
    pub snail: SnailConfig,
    pub viewport: ViewportConfig,
}

/// Procedural generation parameters. Rows count from the top of the map.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct LevelConfig {
    pub width: usize,
    pub height: usize,
    /// Rows of ground below the walking surface; the ground row is
    /// `height - ground_depth`.
    pub ground_depth: usize,
    pub pillar_chance: f64,
    /// How many rows above the ground row a pillar may start.
    pub max_pillar_rise: usize,
    pub chasm_chance: f64,
    pub min_chasm_width: u32,
    pub max_chasm_width: u32,
    pub block_chance: f64,
    /// Rows between a column's top and a block floating over it.
    pub block_height: usize,
    pub bush_chance: f64,
    pub bush_height: usize,
    pub snail_chance: f64,
    /// Column the player drops into; never part of a chasm.
    pub spawn_column: usize,
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            width: 45,
            height: 18,
            ground_depth: 4,
            pillar_chance: 0.2,
            max_pillar_rise: 6,
            chasm_chance: 0.1,
            min_chasm_width: 2,
            max_chasm_width: 5,
            block_chance: 0.15,
            block_height: 4,
            bush_chance: 0.25,
            bush_height: 1,
            snail_chance: 0.1,
            spawn_column: 1,
        }
    }
}

impl LevelConfig {
    pub fn ground_row(&self, height: usize) -> usize {
        height.saturating_sub(self.ground_depth)
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct PlayerConfig {
    pub velocity_limit: f32,
    pub gravity: f32,
    pub speed_scalar: f32,
    pub friction_scalar: f32,
    /// Upward launch speeds in px/s.
    pub jump_speed: f32,
    pub sprint_jump_speed: f32,
    pub bounce_speed: f32,
    /// Seconds of immunity after shrinking.
    pub shrink_grace: f64,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            velocity_limit: 100.0,
            gravity: 1000.0,
            speed_scalar: 5.0,
            friction_scalar: 0.9,
            jump_speed: 350.0,
            sprint_jump_speed: 500.0,
            bounce_speed: 150.0,
            shrink_grace: 1.0,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct SnailConfig {
    pub velocity_limit: f32,
    pub chase_distance_tiles: f32,
    pub min_idle: i32,
    pub max_idle: i32,
    pub min_move: i32,
    pub max_move: i32,
    pub points: u32,
    pub death_particles: usize,
}

impl Default for SnailConfig {
    fn default() -> Self {
        Self {
            velocity_limit: 40.0,
            chase_distance_tiles: 5.0,
            min_idle: 2,
            max_idle: 5,
            min_move: 2,
            max_move: 5,
            points: 25,
            death_particles: 20,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ViewportConfig {
    pub width: f32,
    pub height: f32,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            width: 384.0,
            height: 288.0,
        }
    }
}

pub fn load_config_from_path(path: &Path) -> Result<GameConfig, String> {
    let raw = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
    let config: GameConfig = serde_json::from_str(&raw)
        .map_err(|e| format!("Failed to parse config {}: {e}", path.display()))?;
    validate_config(&config)?;
    Ok(config)
}

pub fn validate_config(config: &GameConfig) -> Result<(), String> {
    let level = &config.level;
    for (name, value) in [
        ("pillar_chance", level.pillar_chance),
        ("chasm_chance", level.chasm_chance),
        ("block_chance", level.block_chance),
        ("bush_chance", level.bush_chance),
        ("snail_chance", level.snail_chance),
    ] {
        if !(0.0..=1.0).contains(&value) {
            return Err(format!(
                "Config validation failed: level.{} must be within [0, 1], got {}",
                name, value
            ));
        }
    }
    if level.width < 2 || level.height < 2 {
        return Err("Config validation failed: level width and height must be >= 2".to_string());
    }
    if level.ground_depth == 0 || level.ground_depth >= level.height {
        return Err(format!(
            "Config validation failed: level.ground_depth must be within [1, {}]",
            level.height - 1
        ));
    }
    if level.min_chasm_width == 0 || level.min_chasm_width > level.max_chasm_width {
        return Err(
            "Config validation failed: chasm width range must be non-empty and start at >= 1"
                .to_string(),
        );
    }
    if level.spawn_column >= level.width {
        return Err(format!(
            "Config validation failed: level.spawn_column {} is outside the map",
            level.spawn_column
        ));
    }

    let player = &config.player;
    if player.velocity_limit <= 0.0 || player.gravity <= 0.0 {
        return Err("Config validation failed: player speeds must be > 0".to_string());
    }
    if !(0.0..=1.0).contains(&player.friction_scalar) {
        return Err("Config validation failed: player.friction_scalar must be within [0, 1]".to_string());
    }
    if player.bounce_speed >= player.jump_speed {
        log::warn!(
            "player.bounce_speed ({}) is not smaller than jump_speed ({})",
            player.bounce_speed,
            player.jump_speed
        );
    }

    let snail = &config.snail;
    if snail.min_idle > snail.max_idle || snail.min_move > snail.max_move {
        return Err("Config validation failed: snail duration ranges are inverted".to_string());
    }
    if snail.min_idle < 0 || snail.min_move < 0 {
        return Err("Config validation failed: snail durations must be >= 0".to_string());
    }

    if config.viewport.width <= 0.0 || config.viewport.height <= 0.0 {
        return Err("Config validation failed: viewport must be > 0".to_string());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_file_path(name_hint: &str) -> std::path::PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before unix epoch")
            .as_nanos();
        std::env::temp_dir().join(format!(
            "sab_config_test_{}_{}_{}.json",
            name_hint,
            std::process::id(),
            nanos
        ))
    }

    #[test]
    fn defaults_are_valid() {
        validate_config(&GameConfig::default()).expect("defaults should validate");
        assert_eq!(LevelConfig::default().ground_row(18), 14);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let path = temp_file_path("partial");
        fs::write(
            &path,
            r#"{ "level": { "width": 10, "snail_chance": 0.0 }, "snail": { "points": 50 } }"#,
        )
        .expect("write temp file");

        let config = load_config_from_path(&path).expect("partial config should load");
        assert_eq!(config.level.width, 10);
        assert_eq!(config.level.height, 18);
        assert_eq!(config.level.snail_chance, 0.0);
        assert_eq!(config.snail.points, 50);
        assert_eq!(config.player, PlayerConfig::default());

        let _ = fs::remove_file(path);
    }

    #[test]
    fn rejects_probability_out_of_range() {
        let path = temp_file_path("bad_chance");
        fs::write(&path, r#"{ "level": { "chasm_chance": 1.5 } }"#).expect("write temp file");
        let err = load_config_from_path(&path).expect_err("chance > 1 should fail");
        assert!(err.contains("chasm_chance"));
        let _ = fs::remove_file(path);
    }

    #[test]
    fn rejects_inverted_chasm_range() {
        let mut config = GameConfig::default();
        config.level.min_chasm_width = 6;
        let err = validate_config(&config).expect_err("inverted range should fail");
        assert!(err.contains("chasm width"));
    }

    #[test]
    fn rejects_ground_deeper_than_map() {
        let mut config = GameConfig::default();
        config.level.ground_depth = 18;
        assert!(validate_config(&config).is_err());
    }
}
