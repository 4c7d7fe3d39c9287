//! Per-round state
//!
//! A round owns its equation, the set of cells not yet revealed, the board
//! maximum magnitude used to normalize arrows and scores, and the player's
//! answer once given.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::arrow::{Arrow, GridLocation, all_locations, evaluate, max_magnitude};
use super::equation::Equation;
use super::score::score_with_samples;

/// Cells not yet revealed this round. Unique and in bounds; only shrinks.
/// Each round starts from a full board.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemainingLocations {
    grid_size: u32,
    cells: Vec<GridLocation>,
}

impl RemainingLocations {
    /// Every cell of the board
    pub fn full(grid_size: u32) -> Self {
        Self {
            grid_size,
            cells: all_locations(grid_size),
        }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn contains(&self, location: GridLocation) -> bool {
        self.cells.contains(&location)
    }

    pub fn iter(&self) -> impl Iterator<Item = &GridLocation> {
        self.cells.iter()
    }

    /// Remove and return a uniformly chosen cell
    pub fn take_random<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<GridLocation> {
        if self.cells.is_empty() {
            return None;
        }
        let index = rng.random_range(0..self.cells.len());
        Some(self.cells.remove(index))
    }
}

/// The player's guess and its outcome
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Answer {
    pub cell: GridLocation,
    /// Cells still hidden when the player clicked (speed bonus)
    pub remaining_at_answer: usize,
    pub score: f64,
}

/// State of a single round
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Round {
    pub equation: Equation,
    pub grid_size: u32,
    /// Largest finite arrow magnitude on the board
    pub max_magnitude: f64,
    pub remaining: RemainingLocations,
    pub answer: Option<Answer>,
}

impl Round {
    pub fn new(equation: Equation, grid_size: u32) -> Self {
        let max_magnitude = max_magnitude(&equation, grid_size);
        log::info!("New round: {} (max magnitude {:.3})", equation, max_magnitude);
        Self {
            equation,
            grid_size,
            max_magnitude,
            remaining: RemainingLocations::full(grid_size),
            answer: None,
        }
    }

    /// Reveal one random hidden cell, tagging the arrow with `speed`
    pub fn reveal_next<R: Rng + ?Sized>(&mut self, rng: &mut R, speed: f64) -> Option<Arrow> {
        let location = self.remaining.take_random(rng)?;
        Some(evaluate(&self.equation, location, self.grid_size, speed))
    }

    /// Cells already revealed, in board order
    pub fn revealed(&self) -> Vec<GridLocation> {
        all_locations(self.grid_size)
            .into_iter()
            .filter(|loc| !self.remaining.contains(*loc))
            .collect()
    }

    /// Record the player's guess and score it. A second answer is ignored
    /// and the first one returned.
    pub fn answer<R: Rng + ?Sized>(&mut self, cell: GridLocation, samples: u32, rng: &mut R) -> Answer {
        if let Some(answer) = self.answer {
            log::warn!("Round already answered at ({}, {})", answer.cell.x, answer.cell.y);
            return answer;
        }

        let remaining_at_answer = self.remaining.len();
        let score = score_with_samples(
            &self.equation,
            cell,
            remaining_at_answer,
            self.max_magnitude,
            self.grid_size,
            samples,
            rng,
        );
        let answer = Answer {
            cell,
            remaining_at_answer,
            score,
        };
        log::info!(
            "Answered ({}, {}) with {} cells hidden: score {:.1}",
            cell.x,
            cell.y,
            remaining_at_answer,
            score
        );
        self.answer = Some(answer);
        answer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;
    use std::collections::HashSet;

    fn round() -> Round {
        Round::new(Equation::parse("1x^1", "0y^1").unwrap(), 10)
    }

    #[test]
    fn test_full_grid() {
        let remaining = RemainingLocations::full(10);
        assert_eq!(remaining.len(), 100);
        let unique: HashSet<_> = remaining.iter().collect();
        assert_eq!(unique.len(), 100);
    }

    #[test]
    fn test_take_random_drains_every_cell_once() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut remaining = RemainingLocations::full(4);
        let mut seen = HashSet::new();
        let mut last_len = remaining.len();
        while let Some(loc) = remaining.take_random(&mut rng) {
            assert!(loc.in_bounds(4));
            assert!(seen.insert(loc), "{loc:?} taken twice");
            assert_eq!(remaining.len(), last_len - 1);
            last_len = remaining.len();
        }
        assert_eq!(seen.len(), 16);
        assert!(remaining.take_random(&mut rng).is_none());
    }

    #[test]
    fn test_round_max_magnitude() {
        // Column 0 maps to x = -5
        assert!((round().max_magnitude - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_reveal_next_tracks_revealed() {
        let mut rng = Pcg32::seed_from_u64(2);
        let mut round = round();
        let arrow = round.reveal_next(&mut rng, 2.5).unwrap();
        assert_eq!(arrow.speed, 2.5);
        assert_eq!(round.remaining.len(), 99);
        assert_eq!(round.revealed(), vec![arrow.location]);
    }

    #[test]
    fn test_answer_captures_remaining_count() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut round = round();
        for _ in 0..10 {
            round.reveal_next(&mut rng, 1.0);
        }
        let answer = round.answer(GridLocation::new(9, 2), 100, &mut rng);
        assert_eq!(answer.remaining_at_answer, 90);
        assert!(answer.score.is_finite());
        assert_eq!(round.answer, Some(answer));

        // Later reveals don't change the recorded answer
        round.reveal_next(&mut rng, 1.0);
        let again = round.answer(GridLocation::new(0, 0), 100, &mut rng);
        assert_eq!(again, answer);
    }
}
