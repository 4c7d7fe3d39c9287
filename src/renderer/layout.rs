//! Board geometry on the canvas

use glam::Vec2;

use crate::consts::{CANVAS_GAME_SIZE, CANVAS_HEIGHT, CANVAS_WIDTH, GRID_SIZE};
use crate::field::{ClickTarget, GridLocation};

/// A square board of `grid_size` cells centered on the canvas
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layout {
    pub canvas_size: Vec2,
    pub game_size: f32,
    pub grid_size: u32,
}

impl Default for Layout {
    fn default() -> Self {
        Self::new(GRID_SIZE)
    }
}

impl Layout {
    pub fn new(grid_size: u32) -> Self {
        Self {
            canvas_size: Vec2::new(CANVAS_WIDTH, CANVAS_HEIGHT),
            game_size: CANVAS_GAME_SIZE,
            grid_size,
        }
    }

    /// Top-left corner of the board
    #[inline]
    pub fn offset(&self) -> Vec2 {
        (self.canvas_size - Vec2::splat(self.game_size)) / 2.0
    }

    /// Side of one cell in pixels
    #[inline]
    pub fn cell_size(&self) -> f32 {
        self.game_size / self.grid_size as f32
    }

    /// Board center (where the axes cross)
    pub fn center(&self) -> Vec2 {
        self.offset() + Vec2::splat(self.game_size / 2.0)
    }

    /// Pixel position of a (possibly fractional) grid coordinate
    #[inline]
    pub fn grid_to_pixel(&self, x: f32, y: f32) -> Vec2 {
        Vec2::new(x, y) * self.cell_size() + self.offset()
    }

    /// Which cell a canvas pixel falls in
    pub fn hit_test(&self, pixel: Vec2) -> ClickTarget {
        let local = (pixel - self.offset()) / self.cell_size();
        if !local.is_finite() || local.x < 0.0 || local.y < 0.0 {
            return ClickTarget::Outside;
        }
        let cell = GridLocation::new(local.x.floor() as i32, local.y.floor() as i32);
        if cell.in_bounds(self.grid_size) {
            ClickTarget::Cell(cell)
        } else {
            ClickTarget::Outside
        }
    }
}
