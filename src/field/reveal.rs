//! Arrow reveal pacing and cancellation
//!
//! Arrows are disclosed one at a time in random order. After each arrow the
//! reveal waits `max(1000 - speed * 100, 10)` ms, checks its cancellation
//! token, and multiplies the speed by 1.1.

use std::cell::Cell;
use std::future::Future;
use std::rc::Rc;

use super::arrow::Arrow;
use crate::consts::{
    ANSWER_REVEAL_SPEED, REVEAL_ACCELERATION, REVEAL_BASE_DELAY_MS, REVEAL_DELAY_PER_SPEED_MS,
    REVEAL_MIN_DELAY_MS, REVEAL_START_SPEED,
};

/// Speed/delay law of a reveal
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RevealPacer {
    speed: f64,
    acceleration: f64,
}

impl RevealPacer {
    pub fn new(speed: f64, acceleration: f64) -> Self {
        Self {
            speed,
            acceleration,
        }
    }

    /// Slow reveal while the player is thinking
    pub fn slow() -> Self {
        Self::new(REVEAL_START_SPEED, REVEAL_ACCELERATION)
    }

    /// Fast reveal of whatever is left after an answer
    pub fn fast() -> Self {
        Self::new(ANSWER_REVEAL_SPEED, REVEAL_ACCELERATION)
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// Wait after the current arrow, in milliseconds
    pub fn delay_ms(&self) -> u32 {
        (REVEAL_BASE_DELAY_MS - self.speed * REVEAL_DELAY_PER_SPEED_MS)
            .max(REVEAL_MIN_DELAY_MS)
            .round() as u32
    }

    pub fn accelerate(&mut self) {
        self.speed *= self.acceleration;
    }
}

/// Cooperative cancellation flag shared between a reveal task and the
/// input handler that stops it. Single-threaded by construction.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Rc<Cell<bool>>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.get()
    }
}

/// How a reveal ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealOutcome {
    /// Every cell was revealed
    Completed { revealed: usize },
    /// Stopped early by the token
    Cancelled { revealed: usize },
}

impl RevealOutcome {
    pub fn revealed(&self) -> usize {
        match *self {
            RevealOutcome::Completed { revealed } | RevealOutcome::Cancelled { revealed } => {
                revealed
            }
        }
    }
}

/// Drive a reveal to completion or cancellation.
///
/// `next` produces the arrow for the current speed (and draws it), returning
/// `None` once nothing is hidden. `sleep` suspends for the given number of
/// milliseconds. The token is checked before the first arrow and after
/// every suspension.
pub async fn drive<N, S, F>(
    mut pacer: RevealPacer,
    cancel: &CancelToken,
    mut next: N,
    mut sleep: S,
) -> RevealOutcome
where
    N: FnMut(f64) -> Option<Arrow>,
    S: FnMut(u32) -> F,
    F: Future<Output = ()>,
{
    let mut revealed = 0;
    if cancel.is_cancelled() {
        return RevealOutcome::Cancelled { revealed };
    }

    while let Some(arrow) = next(pacer.speed()) {
        revealed += 1;
        log::debug!(
            "Revealed ({}, {}) at speed {:.2}",
            arrow.location.x,
            arrow.location.y,
            arrow.speed
        );

        sleep(pacer.delay_ms()).await;
        if cancel.is_cancelled() {
            return RevealOutcome::Cancelled { revealed };
        }
        pacer.accelerate();
    }

    RevealOutcome::Completed { revealed }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::arrow::all_locations;
    use crate::field::equation::Equation;
    use crate::field::round::Round;
    use futures::executor::block_on;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;
    use std::collections::HashSet;

    fn round() -> Round {
        Round::new(Equation::parse("sin(y)^2 + 1", "2x^3").unwrap(), 10)
    }

    #[test]
    fn test_delay_law() {
        let mut pacer = RevealPacer::slow();
        assert_eq!(pacer.delay_ms(), 900);
        pacer.accelerate();
        assert!((pacer.speed() - 1.1).abs() < 1e-12);
        assert_eq!(pacer.delay_ms(), 890);

        assert_eq!(RevealPacer::new(9.95, 1.1).delay_ms(), 10);
        assert_eq!(RevealPacer::fast().delay_ms(), 10);
    }

    #[test]
    fn test_delays_shrink_monotonically() {
        let mut pacer = RevealPacer::slow();
        let mut last = pacer.delay_ms();
        for _ in 0..100 {
            pacer.accelerate();
            let delay = pacer.delay_ms();
            assert!(delay <= last);
            last = delay;
        }
        assert_eq!(last, 10);
    }

    #[test]
    fn test_uncancelled_reveal_covers_grid() {
        let mut rng = Pcg32::seed_from_u64(4);
        let mut round = round();
        let cancel = CancelToken::new();
        let mut delays = Vec::new();

        let outcome = block_on(drive(
            RevealPacer::slow(),
            &cancel,
            |speed| round.reveal_next(&mut rng, speed),
            |ms| {
                delays.push(ms);
                std::future::ready(())
            },
        ));

        assert_eq!(outcome, RevealOutcome::Completed { revealed: 100 });
        assert_eq!(outcome.revealed(), 100);
        assert!(round.remaining.is_empty());
        assert_eq!(round.revealed(), all_locations(10));
        assert_eq!(delays.len(), 100);
        assert_eq!(delays[0], 900);
    }

    #[test]
    fn test_pre_cancelled_reveal_does_nothing() {
        let mut rng = Pcg32::seed_from_u64(4);
        let mut round = round();
        let cancel = CancelToken::new();
        cancel.cancel();

        let outcome = block_on(drive(
            RevealPacer::slow(),
            &cancel,
            |speed| round.reveal_next(&mut rng, speed),
            |_| std::future::ready(()),
        ));
        assert_eq!(outcome, RevealOutcome::Cancelled { revealed: 0 });
        assert_eq!(round.remaining.len(), 100);
    }

    #[test]
    fn test_speed_tags_grow() {
        let mut rng = Pcg32::seed_from_u64(8);
        let mut round = round();
        let mut speeds = Vec::new();
        block_on(drive(
            RevealPacer::slow(),
            &CancelToken::new(),
            |speed| {
                let arrow = round.reveal_next(&mut rng, speed)?;
                speeds.push(arrow.speed);
                Some(arrow)
            },
            |_| std::future::ready(()),
        ));
        assert_eq!(speeds[0], 1.0);
        assert!(speeds.windows(2).all(|w| w[1] > w[0]));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn cancelled_reveal_is_strict_subset(seed in any::<u64>(), stop_after in 1usize..100) {
                let mut rng = Pcg32::seed_from_u64(seed);
                let mut round = round();
                let cancel = CancelToken::new();
                let stopper = cancel.clone();
                let mut sleeps = 0;

                let outcome = block_on(drive(
                    RevealPacer::slow(),
                    &cancel,
                    |speed| round.reveal_next(&mut rng, speed),
                    |_| {
                        sleeps += 1;
                        if sleeps == stop_after {
                            stopper.cancel();
                        }
                        std::future::ready(())
                    },
                ));

                prop_assert_eq!(outcome, RevealOutcome::Cancelled { revealed: stop_after });
                let revealed: HashSet<_> = round.revealed().into_iter().collect();
                prop_assert_eq!(revealed.len(), stop_after);
                prop_assert!(revealed.len() < 100);
                prop_assert_eq!(round.remaining.len(), 100 - stop_after);
            }
        }
    }
}
