//! Game phases and click dispatch
//!
//! Start → Playing → Scoring → GameOver → Playing → ...
//! Every transition is driven by a click (or the end of the score count-up).

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::arrow::{Arrow, GridLocation};
use super::equation::generate;
use super::reveal::CancelToken;
use super::round::{Answer, Round};
use crate::settings::Settings;

/// Current screen of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen, waiting for the first click
    Start,
    /// Arrows are being revealed, waiting for a guess
    Playing,
    /// Guess submitted, score being shown
    Scoring,
    /// Round over, click to play again
    GameOver,
}

/// Where a click landed, already translated from pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickTarget {
    Cell(GridLocation),
    Outside,
}

/// What a click (or timer) did, for the shell to act on
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    /// A new round began; start the slow reveal with the current token
    RoundStarted,
    /// The guess was scored; the slow reveal is cancelled and a fast one
    /// should run with the new token
    Answered(Answer),
    /// The score screen ended
    ScoreDismissed,
    /// Nothing happened
    Ignored,
}

/// Complete game state
#[derive(Debug)]
pub struct Game {
    pub phase: GamePhase,
    pub settings: Settings,
    pub round: Option<Round>,
    pub rounds_played: u32,
    rng: Pcg32,
    reveal_token: CancelToken,
}

impl Game {
    pub fn new(settings: Settings, seed: u64) -> Self {
        let settings = settings.sanitized();
        let seed = settings.seed.unwrap_or(seed);
        log::info!("Game created with seed {}", seed);
        Self {
            phase: GamePhase::Start,
            settings,
            round: None,
            rounds_played: 0,
            rng: Pcg32::seed_from_u64(seed),
            reveal_token: CancelToken::new(),
        }
    }

    /// Token the currently running reveal should watch
    pub fn reveal_token(&self) -> CancelToken {
        self.reveal_token.clone()
    }

    /// Cancel the running reveal and hand out a fresh token
    fn restart_reveal(&mut self) {
        self.reveal_token.cancel();
        self.reveal_token = CancelToken::new();
    }

    fn start_round(&mut self) {
        self.restart_reveal();
        let equation = self
            .settings
            .override_equation()
            .unwrap_or_else(|| generate(&mut self.rng));
        self.round = Some(Round::new(equation, self.settings.grid_size));
        self.rounds_played += 1;
        self.phase = GamePhase::Playing;
    }

    /// Dispatch a click according to the current phase
    pub fn click(&mut self, target: ClickTarget) -> GameEvent {
        match self.phase {
            GamePhase::Start | GamePhase::GameOver => {
                self.start_round();
                GameEvent::RoundStarted
            }
            GamePhase::Playing => match target {
                ClickTarget::Cell(cell) if cell.in_bounds(self.settings.grid_size) => {
                    self.submit_answer(cell)
                }
                _ => GameEvent::Ignored,
            },
            GamePhase::Scoring => {
                self.phase = GamePhase::GameOver;
                GameEvent::ScoreDismissed
            }
        }
    }

    fn submit_answer(&mut self, cell: GridLocation) -> GameEvent {
        let samples = self.settings.score_samples;
        let Some(round) = self.round.as_mut() else {
            return GameEvent::Ignored;
        };
        let answer = round.answer(cell, samples, &mut self.rng);
        self.restart_reveal();
        self.phase = GamePhase::Scoring;
        GameEvent::Answered(answer)
    }

    /// The score count-up finished on its own
    pub fn finish_scoring(&mut self) -> GameEvent {
        if self.phase != GamePhase::Scoring {
            return GameEvent::Ignored;
        }
        self.phase = GamePhase::GameOver;
        GameEvent::ScoreDismissed
    }

    /// Reveal the next hidden arrow of the current round
    pub fn reveal_next(&mut self, speed: f64) -> Option<Arrow> {
        let round = self.round.as_mut()?;
        round.reveal_next(&mut self.rng, speed)
    }
}
