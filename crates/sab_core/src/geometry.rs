//! Axis-aligned boxes in canvas space (top-left origin, y grows downward).
//!
//! Overlap tests are inclusive: two boxes that share an edge count as touching.
//! Entities standing on a solid object rely on this to keep reporting the
//! object underneath them while their velocity is zero.

use glam::Vec2;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn from_position(position: Vec2, dimensions: Vec2) -> Self {
        Self {
            x: position.x,
            y: position.y,
            w: dimensions.x,
            h: dimensions.y,
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x <= other.right()
            && self.right() >= other.x
            && self.y <= other.bottom()
            && self.bottom() >= other.y
    }

    /// Which side of `self` the box `other` is pressing against, picked by the
    /// smallest penetration depth. Equal depths resolve to Top, then Bottom,
    /// so a box resting exactly on a corner still stands on it.
    pub fn contact_side(&self, other: &Rect) -> Side {
        let from_top = other.bottom() - self.y;
        let from_bottom = self.bottom() - other.y;
        let from_left = other.right() - self.x;
        let from_right = self.right() - other.x;

        let mut side = Side::Top;
        let mut depth = from_top;
        for (candidate, candidate_depth) in [
            (Side::Bottom, from_bottom),
            (Side::Left, from_left),
            (Side::Right, from_right),
        ] {
            if candidate_depth < depth {
                side = candidate;
                depth = candidate_depth;
            }
        }
        side
    }
}

/// Side of a box, as seen from outside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Right,
    Top,
    Bottom,
}

/// Anything with a hitbox in canvas space.
pub trait Collidable {
    fn hitbox(&self) -> Rect;

    fn collides_with<O: Collidable + ?Sized>(&self, other: &O) -> bool {
        self.hitbox().overlaps(&other.hitbox())
    }
}

impl Collidable for Rect {
    fn hitbox(&self) -> Rect {
        *self
    }
}
