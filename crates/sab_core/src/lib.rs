//! Engine-level building blocks shared by the game crate: geometry, the
//! cooperative timer, frame animation, the generic state machine, keyboard
//! snapshots, particles, and the draw-command list handed to the renderer.

pub mod animation;
pub mod geometry;
pub mod input;
pub mod particle;
pub mod render;
pub mod state_machine;
pub mod timer;

pub use glam::Vec2;
