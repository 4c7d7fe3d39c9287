//! Omega Flux - A vector field flux guessing game
//!
//! Core modules:
//! - `field`: Pure round logic (equations, arrows, scoring, reveal pacing, game phases)
//! - `renderer`: Draw command generation and 2D canvas backend
//! - `platform`: Browser/native platform abstraction
//! - `settings`: Data-driven game configuration

pub mod field;
pub mod platform;
pub mod renderer;
pub mod settings;

pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Cells per side of the square arrow grid
    pub const GRID_SIZE: u32 = 10;
    /// Largest accepted grid size
    pub const MAX_GRID_SIZE: u32 = 100;

    /// Width of the centered coordinate plane (grid maps onto [-5, 5))
    pub const PLANE_EXTENT: f64 = 10.0;
    pub const PLANE_HALF_EXTENT: f64 = PLANE_EXTENT / 2.0;

    /// Template placeholder range (inclusive)
    pub const PLACEHOLDER_MIN: i32 = 1;
    pub const PLACEHOLDER_MAX: i32 = 5;

    /// Monte Carlo samples drawn when scoring a guess
    pub const SCORE_SAMPLES: u32 = 1000;

    /// Reveal pacing: delay = max(BASE - speed * PER_SPEED, MIN) milliseconds
    pub const REVEAL_BASE_DELAY_MS: f64 = 1000.0;
    pub const REVEAL_DELAY_PER_SPEED_MS: f64 = 100.0;
    pub const REVEAL_MIN_DELAY_MS: f64 = 10.0;
    /// Speed multiplier applied after each revealed arrow
    pub const REVEAL_ACCELERATION: f64 = 1.1;
    /// Starting speed of the slow reveal
    pub const REVEAL_START_SPEED: f64 = 1.0;
    /// Starting speed of the reveal that follows an answer
    pub const ANSWER_REVEAL_SPEED: f64 = 10_000.0;

    /// Score count-up increment per animation frame
    pub const SCORE_COUNTUP_STEP: f64 = 200.0;

    /// Canvas dimensions (pixels)
    pub const CANVAS_WIDTH: f32 = 1200.0;
    pub const CANVAS_HEIGHT: f32 = 600.0;
    /// Side of the square board centered on the canvas
    pub const CANVAS_GAME_SIZE: f32 = 600.0;
}

/// Map a grid coordinate onto the centered plane: `(c / n) * 10 - 5`
#[inline]
pub fn grid_to_plane(c: f64, grid_size: u32) -> f64 {
    (c / grid_size as f64) * consts::PLANE_EXTENT - consts::PLANE_HALF_EXTENT
}

/// Map a grid location onto the plane with the vertical axis flipped (up is positive)
#[inline]
pub fn grid_point_to_plane(x: f64, y: f64, grid_size: u32) -> (f64, f64) {
    (grid_to_plane(x, grid_size), -grid_to_plane(y, grid_size))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_center_maps_to_origin() {
        assert_eq!(grid_point_to_plane(5.0, 5.0, 10), (0.0, 0.0));
    }

    #[test]
    fn test_grid_edges() {
        assert_eq!(grid_to_plane(0.0, 10), -5.0);
        assert_eq!(grid_to_plane(10.0, 10), 5.0);
        // Top row is the top of the plane
        let (_, y) = grid_point_to_plane(0.0, 0.0, 10);
        assert_eq!(y, 5.0);
    }

    #[test]
    fn test_other_grid_sizes() {
        assert_eq!(grid_to_plane(10.0, 20), 0.0);
        assert_eq!(grid_to_plane(1.0, 4), -2.5);
    }
}
