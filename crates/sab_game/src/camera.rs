use glam::Vec2;
use sab_core::geometry::Rect;

/// Viewport that tracks a target horizontally, never showing past the map
/// edges.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub position: Vec2,
    viewport: Vec2,
    canvas: Vec2,
}

impl Camera {
    pub fn new(viewport: Vec2, canvas: Vec2) -> Self {
        Self {
            position: Vec2::new(0.0, (canvas.y - viewport.y).max(0.0)),
            viewport,
            canvas,
        }
    }

    pub fn viewport(&self) -> Vec2 {
        self.viewport
    }

    /// Center the view on `target`, clamped to the map.
    pub fn follow(&mut self, target: Rect) {
        let max_x = (self.canvas.x - self.viewport.x).max(0.0);
        let x = target.center().x - self.viewport.x / 2.0;
        self.position.x = x.clamp(0.0, max_x);
    }
}
