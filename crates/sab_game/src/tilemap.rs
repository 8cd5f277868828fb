//! Static grid of typed cells.
//!
//! Tiles never move once the generator has placed them, so the map is a flat
//! row-major vector addressed by grid coordinates. Point lookups outside the
//! grid return `None`; callers treat an absent tile as "no collision".

use glam::Vec2;
use sab_core::geometry::Rect;
use sab_core::render::RenderList;

use crate::sprite::Sprite;

pub const TILE_SIZE: f32 = 16.0;

/// Index of the ground sprite inside a tile set.
pub const GROUND_SPRITE: usize = 3;
/// Index of the grass cap inside a topper set.
pub const TOPPER_SPRITE: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TileKind {
    Empty,
    Ground,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile {
    pub grid_x: usize,
    pub grid_y: usize,
    pub kind: TileKind,
    pub is_topper: bool,
    pub tile_set: usize,
    pub topper_set: usize,
}

impl Tile {
    pub fn new(
        grid_x: usize,
        grid_y: usize,
        kind: TileKind,
        is_topper: bool,
        tile_set: usize,
        topper_set: usize,
    ) -> Self {
        Self {
            grid_x,
            grid_y,
            kind,
            is_topper,
            tile_set,
            topper_set,
        }
    }

    pub fn is_collidable(&self) -> bool {
        self.kind == TileKind::Ground
    }

    /// Top-left corner in canvas pixels.
    pub fn position(&self) -> Vec2 {
        Vec2::new(self.grid_x as f32 * TILE_SIZE, self.grid_y as f32 * TILE_SIZE)
    }

    pub fn hitbox(&self) -> Rect {
        let position = self.position();
        Rect::new(position.x, position.y, TILE_SIZE, TILE_SIZE)
    }
}

#[derive(Debug, Clone)]
pub struct Tilemap {
    width: usize,
    height: usize,
    tiles: Vec<Tile>,
    tile_sets: Vec<Vec<Sprite>>,
    topper_sets: Vec<Vec<Sprite>>,
}

impl Tilemap {
    /// `tiles` must be row-major and hold exactly `width * height` entries.
    pub fn new(
        width: usize,
        height: usize,
        tiles: Vec<Tile>,
        tile_sets: Vec<Vec<Sprite>>,
        topper_sets: Vec<Vec<Sprite>>,
    ) -> Self {
        debug_assert_eq!(tiles.len(), width * height);
        Self {
            width,
            height,
            tiles,
            tile_sets,
            topper_sets,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn canvas_dimensions(&self) -> Vec2 {
        Vec2::new(
            self.width as f32 * TILE_SIZE,
            self.height as f32 * TILE_SIZE,
        )
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn tile(&self, grid_x: usize, grid_y: usize) -> Option<&Tile> {
        if grid_x >= self.width || grid_y >= self.height {
            return None;
        }
        self.tiles.get(grid_y * self.width + grid_x)
    }

    /// The tile under a canvas-space point.
    pub fn point_to_tile(&self, point: Vec2) -> Option<&Tile> {
        if point.x < 0.0 || point.y < 0.0 {
            return None;
        }
        let grid_x = (point.x / TILE_SIZE).floor() as usize;
        let grid_y = (point.y / TILE_SIZE).floor() as usize;
        self.tile(grid_x, grid_y)
    }

    pub fn is_collidable_at(&self, point: Vec2) -> bool {
        self.point_to_tile(point)
            .is_some_and(|tile| tile.is_collidable())
    }

    /// Tiles of column `grid_x`, top to bottom.
    pub fn column(&self, grid_x: usize) -> impl Iterator<Item = &Tile> + '_ {
        (0..self.height).filter_map(move |grid_y| self.tile(grid_x, grid_y))
    }

    pub fn render(&self, out: &mut RenderList) {
        for tile in &self.tiles {
            if !tile.is_collidable() {
                continue;
            }
            let position = tile.position();
            if let Some(sprite) = self
                .tile_sets
                .get(tile.tile_set)
                .and_then(|set| set.get(GROUND_SPRITE))
            {
                sprite.render(out, position);
            }
            if tile.is_topper {
                if let Some(sprite) = self
                    .topper_sets
                    .get(tile.topper_set)
                    .and_then(|set| set.get(TOPPER_SPRITE))
                {
                    sprite.render(out, position);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::ImageName;
    use crate::sprite::tile_sets;

    /// 4x3 map with ground on the bottom row and a pillar in column 2.
    fn small_map() -> Tilemap {
        let mut tiles = Vec::new();
        for y in 0..3 {
            for x in 0..4 {
                let ground = y == 2 || (x == 2 && y == 1);
                let kind = if ground { TileKind::Ground } else { TileKind::Empty };
                let topper = (y == 2 && x != 2) || (x == 2 && y == 1);
                tiles.push(Tile::new(x, y, kind, topper, 0, 0));
            }
        }
        Tilemap::new(
            4,
            3,
            tiles,
            tile_sets(ImageName::Tiles, 1, 1, 5, 4, TILE_SIZE),
            tile_sets(ImageName::Toppers, 1, 1, 5, 4, TILE_SIZE),
        )
    }

    #[test]
    fn canvas_dimensions_scale_by_tile_size() {
        assert_eq!(small_map().canvas_dimensions(), Vec2::new(64.0, 48.0));
    }

    #[test]
    fn point_lookup_maps_pixels_to_cells() {
        let map = small_map();
        let tile = map.point_to_tile(Vec2::new(35.0, 17.0)).expect("inside grid");
        assert_eq!((tile.grid_x, tile.grid_y), (2, 1));
        assert!(tile.is_collidable());

        let edge = map.point_to_tile(Vec2::new(16.0, 0.0)).expect("inside grid");
        assert_eq!((edge.grid_x, edge.grid_y), (1, 0));
        assert!(!edge.is_collidable());
    }

    #[test]
    fn points_outside_the_grid_have_no_tile() {
        let map = small_map();
        assert!(map.point_to_tile(Vec2::new(-0.5, 10.0)).is_none());
        assert!(map.point_to_tile(Vec2::new(10.0, -3.0)).is_none());
        assert!(map.point_to_tile(Vec2::new(64.0, 10.0)).is_none());
        assert!(map.point_to_tile(Vec2::new(10.0, 48.0)).is_none());
        assert!(!map.is_collidable_at(Vec2::new(100.0, 100.0)));
    }

    #[test]
    fn column_walks_top_to_bottom() {
        let map = small_map();
        let kinds: Vec<TileKind> = map.column(2).map(|tile| tile.kind).collect();
        assert_eq!(kinds, vec![TileKind::Empty, TileKind::Ground, TileKind::Ground]);
    }

    #[test]
    fn render_draws_ground_and_toppers_only() {
        let map = small_map();
        let mut out = RenderList::new();
        map.render(&mut out);
        // Five ground tiles, four of them capped.
        assert_eq!(out.len(), 9);
    }
}
