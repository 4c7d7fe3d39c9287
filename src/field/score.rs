//! Monte Carlo flux scoring for a guessed cell
//!
//! The sampling region is derived from the guessed cell as
//! `[0, x - 5)` by `[0, (5 - y) - 1)` in grid units (either bound may be
//! negative or zero). This does not line up with the highlighted cell on
//! the board; the formula is kept as-is because the scoring balance was
//! tuned against it.

use rand::Rng;

use super::arrow::{GridLocation, evaluate};
use super::equation::Equation;
use crate::consts::{PLANE_HALF_EXTENT, SCORE_SAMPLES};

/// Sampling extents `(x_bound, y_bound)` for a guessed cell
pub fn sampling_bounds(cell: GridLocation) -> (f64, f64) {
    let x_bound = cell.x as f64 - PLANE_HALF_EXTENT;
    let y_bound = (PLANE_HALF_EXTENT - cell.y as f64) - 1.0;
    (x_bound, y_bound)
}

/// Draw one sample location: `floor(random * bound)` per axis, x first
pub fn sample_location<R: Rng + ?Sized>(rng: &mut R, bounds: (f64, f64)) -> GridLocation {
    let x = (rng.random::<f64>() * bounds.0).floor() as i32;
    let y = (rng.random::<f64>() * bounds.1).floor() as i32;
    GridLocation::new(x, y)
}

/// Sum of finite field magnitudes over `samples` random locations
pub fn flux_sum<R: Rng + ?Sized>(
    equation: &Equation,
    cell: GridLocation,
    grid_size: u32,
    samples: u32,
    rng: &mut R,
) -> f64 {
    let bounds = sampling_bounds(cell);
    (0..samples)
        .map(|_| {
            let location = sample_location(rng, bounds);
            evaluate(equation, location, grid_size, 1.0).magnitude
        })
        .filter(|m| m.is_finite())
        .sum()
}

/// Score a guess with the default sample count.
///
/// `score = log10(remaining) * 10 * (sum / max_magnitude)` where `remaining`
/// is the number of cells still hidden when the player answered. Degenerate
/// inputs propagate: `remaining == 0` gives -inf, `max_magnitude == 0` NaN.
pub fn score<R: Rng + ?Sized>(
    equation: &Equation,
    cell: GridLocation,
    remaining: usize,
    max_magnitude: f64,
    grid_size: u32,
    rng: &mut R,
) -> f64 {
    score_with_samples(equation, cell, remaining, max_magnitude, grid_size, SCORE_SAMPLES, rng)
}

pub fn score_with_samples<R: Rng + ?Sized>(
    equation: &Equation,
    cell: GridLocation,
    remaining: usize,
    max_magnitude: f64,
    grid_size: u32,
    samples: u32,
    rng: &mut R,
) -> f64 {
    let sum = flux_sum(equation, cell, grid_size, samples, rng);
    let score = (remaining as f64).log10() * 10.0 * sum / max_magnitude;
    log::debug!(
        "Scored cell ({}, {}): flux sum {:.3}, max {:.3}, remaining {} -> {:.3}",
        cell.x,
        cell.y,
        sum,
        max_magnitude,
        remaining,
        score
    );
    score
}
