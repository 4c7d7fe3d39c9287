//! Vector field round logic
//!
//! Everything here is pure and reproducible:
//! - Seeded RNG only (passed in, never global)
//! - No rendering or platform dependencies
//! - Degenerate arithmetic is absorbed, never reported as an error

pub mod arrow;
pub mod equation;
pub mod expr;
pub mod reveal;
pub mod round;
pub mod score;
pub mod state;

pub use arrow::{Arrow, GridLocation, all_locations, evaluate, max_magnitude, normalize};
pub use equation::{Component, Equation, TEMPLATE_SOURCES, Template, generate};
pub use expr::{BinaryOp, Expr, Func, ParseError, Var};
pub use reveal::{CancelToken, RevealOutcome, RevealPacer, drive};
pub use round::{Answer, RemainingLocations, Round};
pub use score::{flux_sum, sample_location, sampling_bounds, score, score_with_samples};
pub use state::{ClickTarget, Game, GameEvent, GamePhase};
