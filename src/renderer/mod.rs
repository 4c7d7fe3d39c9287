//! Rendering module
//!
//! Screen elements are described as backend-independent draw commands; the
//! browser build executes them on a 2D canvas.

pub mod commands;
pub mod layout;

#[cfg(target_arch = "wasm32")]
pub mod canvas;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasRenderer;
pub use commands::{DrawCommand, TextAlign};
pub use layout::Layout;
