//! Game logic for Super Alien Bros.: procedural levels, props, the player
//! and snail state machines, and the title/play flow. Rendering, audio and
//! asset loading belong to the host; this crate only emits draw commands and
//! sound requests.

pub mod assets;
pub mod background;
pub mod camera;
pub mod config;
pub mod entities;
pub mod game_state;
pub mod level;
pub mod level_maker;
pub mod objects;
pub mod replay;
pub mod services;
pub mod sprite;
pub mod tilemap;
