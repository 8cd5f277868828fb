//! Procedural level generation.
//!
//! Levels are built one column at a time. A column is either part of a chasm
//! (no ground at all) or a single run of ground from its start row down to
//! the bottom of the map, optionally raised into a pillar and decorated with
//! a block and/or a bush above it. Snails and the goal flag are placed in
//! separate passes over the finished map.

use glam::Vec2;
use rand::Rng;

use crate::assets::ImageName;
use crate::background::Background;
use crate::config::{GameConfig, LevelConfig};
use crate::entities::{EntityId, Player, Snail};
use crate::game_state::Session;
use crate::level::Level;
use crate::objects::{Block, Bush, Flagpole, FlagpolePart, GameObject, FLAGPOLE_HEIGHT, FLAG_OFFSET_X};
use crate::services::{did_succeed_chance, random_int};
use crate::sprite::tile_sets;
use crate::tilemap::{Tile, TileKind, Tilemap, TILE_SIZE};

/// Tiles per set on the tile and topper sheets.
pub const TILE_SET_WIDTH: usize = 5;
pub const TILE_SET_HEIGHT: usize = 4;
pub const TILE_SETS_WIDTH: usize = 6;
pub const TILE_SETS_HEIGHT: usize = 10;
pub const TOPPER_SETS_WIDTH: usize = 6;
pub const TOPPER_SETS_HEIGHT: usize = 18;

/// Build a `width` x `height` level from the probabilities in `config`.
pub fn generate_level(
    width: usize,
    height: usize,
    config: &LevelConfig,
    rng: &mut impl Rng,
) -> Level {
    let ground_row = config.ground_row(height);
    let ground_sets = tile_sets(
        ImageName::Tiles,
        TILE_SETS_WIDTH,
        TILE_SETS_HEIGHT,
        TILE_SET_WIDTH,
        TILE_SET_HEIGHT,
        TILE_SIZE,
    );
    let topper_sets = tile_sets(
        ImageName::Toppers,
        TOPPER_SETS_WIDTH,
        TOPPER_SETS_HEIGHT,
        TILE_SET_WIDTH,
        TILE_SET_HEIGHT,
        TILE_SIZE,
    );
    let tile_set = rng.gen_range(0..ground_sets.len());
    let topper_set = rng.gen_range(0..topper_sets.len());

    let mut tiles: Vec<Tile> = (0..height)
        .flat_map(|y| {
            (0..width).map(move |x| Tile::new(x, y, TileKind::Empty, false, tile_set, topper_set))
        })
        .collect();
    let mut objects = Vec::new();

    let mut chasm_counter: u32 = 0;
    let mut chasm_columns = 0;
    for x in 0..width {
        if chasm_counter > 0 {
            chasm_counter -= 1;
        } else if did_succeed_chance(rng, config.chasm_chance) {
            chasm_counter = random_int(
                rng,
                config.min_chasm_width as i32,
                config.max_chasm_width as i32,
            )
            .max(0) as u32;
        }

        if chasm_counter > 0 && x != config.spawn_column {
            chasm_columns += 1;
            continue;
        }

        let column_start = if did_succeed_chance(rng, config.pillar_chance) {
            let highest = ground_row.saturating_sub(config.max_pillar_rise);
            random_int(rng, highest as i32, ground_row as i32).max(0) as usize
        } else {
            ground_row
        };

        if let Some(row) = column_start.checked_sub(config.block_height) {
            if did_succeed_chance(rng, config.block_chance) {
                objects.push(Placement::Block(column_origin(x, row)));
            }
        }
        if let Some(row) = column_start.checked_sub(config.bush_height) {
            if did_succeed_chance(rng, config.bush_chance) {
                objects.push(Placement::Bush(column_origin(x, row)));
            }
        }

        for y in column_start..height {
            tiles[y * width + x] = Tile::new(x, y, TileKind::Ground, y == column_start, tile_set, topper_set);
        }
    }

    let tilemap = Tilemap::new(width, height, tiles, ground_sets, topper_sets);
    let background = Background::new(tilemap.canvas_dimensions(), rng);
    let mut level = Level::new(tilemap, background);
    for placement in objects {
        let id = level.playfield.allocate_object_id();
        let object = match placement {
            Placement::Block(position) => GameObject::Block(Block::new(id, position)),
            Placement::Bush(position) => GameObject::Bush(Bush::new(id, position, rng)),
        };
        level.playfield.add_object(object);
    }

    log::info!(
        "Generated {}x{} level: {} chasm columns, {} objects",
        width,
        height,
        chasm_columns,
        level.playfield.objects().len()
    );
    level
}

enum Placement {
    Block(Vec2),
    Bush(Vec2),
}

fn column_origin(grid_x: usize, grid_y: usize) -> Vec2 {
    Vec2::new(grid_x as f32 * TILE_SIZE, grid_y as f32 * TILE_SIZE)
}

/// Roll for a snail on top of every column, targeting `target`. The spawn
/// column is left clear. Returns how many snails were added.
pub fn generate_snails(
    level: &mut Level,
    target: EntityId,
    config: &GameConfig,
    rng: &mut impl Rng,
) -> usize {
    let mut spawned = Vec::new();
    for x in 0..level.tilemap.width() {
        if x == config.level.spawn_column {
            continue;
        }
        let Some(top) = level.tilemap.column(x).find(|tile| tile.is_collidable()) else {
            continue;
        };
        let Some(row) = top.grid_y.checked_sub(1) else {
            continue;
        };
        if did_succeed_chance(rng, config.level.snail_chance) {
            spawned.push(column_origin(x, row));
        }
    }

    let count = spawned.len();
    for position in spawned {
        let id = level.allocate_entity_id();
        level.add_snail(Snail::new(id, position, target, &config.snail));
    }
    log::debug!("Spawned {} snails", count);
    count
}

/// Plant the goal on the right-most column whose ground row is exposed.
/// Returns false when no column qualifies.
pub fn spawn_flag(level: &mut Level, ground_row: usize) -> bool {
    let Some(above) = ground_row.checked_sub(1) else {
        return false;
    };
    let width = level.tilemap.width();
    let column = (1..width.saturating_sub(1)).rev().find(|&x| {
        let ground = level.tilemap.tile(x, ground_row);
        let sky = level.tilemap.tile(x, above);
        matches!(
            (ground, sky),
            (Some(ground), Some(sky)) if ground.kind == TileKind::Ground && sky.kind == TileKind::Empty
        )
    });
    let Some(x) = column else {
        log::warn!("No exposed ground column for the flag");
        return false;
    };

    let origin = Vec2::new(
        x as f32 * TILE_SIZE,
        ground_row as f32 * TILE_SIZE - FLAGPOLE_HEIGHT,
    );
    let pole_id = level.playfield.allocate_object_id();
    level
        .playfield
        .add_object(GameObject::Flagpole(Flagpole::new(pole_id, FlagpolePart::Pole, origin)));
    let flag_id = level.playfield.allocate_object_id();
    level.playfield.add_object(GameObject::Flagpole(Flagpole::new(
        flag_id,
        FlagpolePart::Flag,
        origin + Vec2::new(FLAG_OFFSET_X, 0.0),
    )));
    level.playfield.flag_spawned = true;
    log::info!("Flag planted at column {}", x);
    true
}

/// A fresh level with its snails, plus the player they hunt. The player is
/// not added to the level yet.
pub fn generate_session(config: &GameConfig, rng: &mut impl Rng) -> Session {
    let mut level = generate_level(config.level.width, config.level.height, &config.level, rng);
    let player_id = level.allocate_entity_id();
    let spawn = Vec2::new(config.level.spawn_column as f32 * TILE_SIZE, 0.0);
    let player = Player::new(player_id, spawn, &config.player);
    generate_snails(&mut level, player_id, config, rng);
    Session { level, player }
}
