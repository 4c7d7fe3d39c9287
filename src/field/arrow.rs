//! Field evaluation at grid locations
//!
//! An arrow carries the field direction as a unit vector and the raw
//! magnitude separately, so renderers can scale arrow length against the
//! strongest arrow on the board rather than the true field strength.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::equation::Equation;
use crate::grid_point_to_plane;

/// A cell of the square grid. Score sampling may produce locations
/// outside `[0, grid_size)`, so coordinates are signed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridLocation {
    pub x: i32,
    pub y: i32,
}

impl GridLocation {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Whether the location lies on a board of the given size
    pub fn in_bounds(&self, grid_size: u32) -> bool {
        let n = side(grid_size);
        (0..n).contains(&self.x) && (0..n).contains(&self.y)
    }

    /// Position on the centered plane (y up)
    pub fn to_plane(&self, grid_size: u32) -> DVec2 {
        let (x, y) = grid_point_to_plane(self.x as f64, self.y as f64, grid_size);
        DVec2::new(x, y)
    }
}

/// Board side as a signed coordinate bound
#[inline]
fn side(grid_size: u32) -> i32 {
    i32::try_from(grid_size).unwrap_or(i32::MAX)
}

/// Every location of a `grid_size` x `grid_size` board, column-major
pub fn all_locations(grid_size: u32) -> Vec<GridLocation> {
    let n = side(grid_size);
    (0..n)
        .flat_map(|x| (0..n).map(move |y| GridLocation::new(x, y)))
        .collect()
}

/// Field sample at one location
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Arrow {
    /// Unit direction, or zero where the field vanishes
    pub direction: DVec2,
    /// Field magnitude before normalization
    pub magnitude: f64,
    pub location: GridLocation,
    /// Reveal speed at the time the arrow was produced (pacing only)
    pub speed: f64,
}

/// Split a vector into unit direction and magnitude.
/// The zero vector maps to a zero direction with magnitude 0.
pub fn normalize(fx: f64, fy: f64) -> (DVec2, f64) {
    let v = DVec2::new(fx, fy);
    if v == DVec2::ZERO {
        return (DVec2::ZERO, 0.0);
    }
    let magnitude = v.length();
    (v / magnitude, magnitude)
}

/// Evaluate the field at a grid location.
/// NaN or infinite components pass through; aggregation filters them.
pub fn evaluate(equation: &Equation, location: GridLocation, grid_size: u32, speed: f64) -> Arrow {
    let p = location.to_plane(grid_size);
    let (fx, fy) = equation.eval(p.x, p.y);
    let (direction, magnitude) = normalize(fx, fy);
    Arrow {
        direction,
        magnitude,
        location,
        speed,
    }
}

/// Largest finite magnitude over the whole board (0 when none is finite)
pub fn max_magnitude(equation: &Equation, grid_size: u32) -> f64 {
    all_locations(grid_size)
        .into_iter()
        .map(|loc| evaluate(equation, loc, grid_size, 0.0).magnitude)
        .filter(|m| m.is_finite())
        .fold(0.0, f64::max)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_center_of_vanishing_field() {
        let eq = Equation::parse("3x^2", "-x").unwrap();
        let arrow = evaluate(&eq, GridLocation::new(5, 5), 10, 1.0);
        assert_eq!(arrow.direction, DVec2::ZERO);
        assert_eq!(arrow.magnitude, 0.0);
        assert_eq!(arrow.location, GridLocation::new(5, 5));
        assert_eq!(arrow.speed, 1.0);
    }

    #[test]
    fn test_pure_x_field_at_right_edge() {
        let eq = Equation::parse("1x^1", "0y^1").unwrap();
        let arrow = evaluate(&eq, GridLocation::new(10, 5), 10, 0.0);
        assert!((arrow.magnitude - 5.0).abs() < EPS);
        assert!((arrow.direction - DVec2::new(1.0, 0.0)).length() < EPS);
    }

    #[test]
    fn test_vertical_axis_points_up() {
        // Row 0 is the top of the board, y = +5
        let eq = Equation::parse("0", "y").unwrap();
        let arrow = evaluate(&eq, GridLocation::new(3, 0), 10, 0.0);
        assert!((arrow.direction - DVec2::Y).length() < EPS);
        assert!((arrow.magnitude - 5.0).abs() < EPS);
    }

    #[test]
    fn test_normalize() {
        let (dir, mag) = normalize(3.0, -4.0);
        assert!((mag - 5.0).abs() < EPS);
        assert!((dir - DVec2::new(0.6, -0.8)).length() < EPS);

        let (dir, mag) = normalize(-0.0, 0.0);
        assert_eq!(dir, DVec2::ZERO);
        assert_eq!(mag, 0.0);
    }

    #[test]
    fn test_nan_passes_through() {
        let eq = Equation::parse("x^0.5", "0").unwrap();
        let arrow = evaluate(&eq, GridLocation::new(0, 0), 10, 0.0);
        assert!(arrow.magnitude.is_nan());
    }

    #[test]
    fn test_max_magnitude_skips_non_finite() {
        let eq = Equation::parse("1/x", "0").unwrap();
        // Column 5 sits on x = 0 (infinite); elsewhere |1/x| peaks at x = ±1
        let max = max_magnitude(&eq, 10);
        assert!((max - 1.0).abs() < EPS);
    }

    #[test]
    fn test_max_magnitude_of_zero_field() {
        let eq = Equation::parse("0", "0").unwrap();
        assert_eq!(max_magnitude(&eq, 10), 0.0);
    }

    #[test]
    fn test_in_bounds_on_huge_grid() {
        // Sizes past i32::MAX must not wrap into an empty board
        assert!(GridLocation::new(0, 0).in_bounds(u32::MAX));
        assert!(!GridLocation::new(-1, 0).in_bounds(u32::MAX));
    }

    #[test]
    fn test_all_locations() {
        let locs = all_locations(10);
        assert_eq!(locs.len(), 100);
        assert!(locs.iter().all(|l| l.in_bounds(10)));
        assert!(!GridLocation::new(10, 0).in_bounds(10));
        assert!(!GridLocation::new(0, -1).in_bounds(10));
    }

    mod proptests {
        use super::*;
        use crate::field::equation::generate;
        use proptest::prelude::*;
        use rand::SeedableRng;
        use rand_pcg::Pcg32;

        proptest! {
            #[test]
            fn directions_are_unit_or_zero(seed in any::<u64>(), x in 0i32..10, y in 0i32..10) {
                let eq = generate(&mut Pcg32::seed_from_u64(seed));
                let arrow = evaluate(&eq, GridLocation::new(x, y), 10, 1.0);
                if arrow.magnitude == 0.0 {
                    prop_assert_eq!(arrow.direction, DVec2::ZERO);
                } else if arrow.magnitude.is_finite() {
                    prop_assert!((arrow.direction.length() - 1.0).abs() < EPS);
                }
            }
        }
    }
}
