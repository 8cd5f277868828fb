//! Per-frame render data.
//!
//! The simulation never touches pixels. It fills a `RenderList` with draw
//! commands in back-to-front order; the host walks the list and resolves
//! image keys against its own texture registry.

use glam::Vec2;

use crate::geometry::Rect;

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Copy `source` out of the image registered under `image` into `dest`.
    Sprite {
        image: &'static str,
        source: Rect,
        dest: Rect,
        flip_x: bool,
    },
    /// Filled circle, used for particles.
    Circle {
        center: Vec2,
        radius: f32,
        color: [u8; 3],
        alpha: f32,
    },
    /// Full-screen tint drawn in screen space.
    Overlay { color: [u8; 3], alpha: f32 },
}

#[derive(Debug, Clone, Default)]
pub struct RenderList {
    commands: Vec<DrawCommand>,
    /// World-to-screen translation the host applies to world-space commands.
    pub camera_offset: Vec2,
}

impl RenderList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }

    pub fn push_sprite(&mut self, image: &'static str, source: Rect, dest: Rect, flip_x: bool) {
        self.commands.push(DrawCommand::Sprite {
            image,
            source,
            dest,
            flip_x,
        });
    }

    pub fn push_circle(&mut self, center: Vec2, radius: f32, color: [u8; 3], alpha: f32) {
        self.commands.push(DrawCommand::Circle {
            center,
            radius,
            color,
            alpha,
        });
    }

    pub fn push_overlay(&mut self, color: [u8; 3], alpha: f32) {
        self.commands.push(DrawCommand::Overlay { color, alpha });
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
        self.camera_offset = Vec2::ZERO;
    }
}
