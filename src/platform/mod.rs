//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Input events (pixel → board cell)
//! - Time (reveal delays, session seed)

pub mod input;

#[cfg(target_arch = "wasm32")]
pub mod time;

pub use input::{click_target, css_to_canvas};
