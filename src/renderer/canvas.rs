//! 2D canvas backend
//!
//! Executes draw commands on a `CanvasRenderingContext2d`.

use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::commands::DrawCommand;

/// Canvas target for draw commands
pub struct CanvasRenderer {
    ctx: CanvasRenderingContext2d,
}

impl CanvasRenderer {
    /// Acquire the 2D context of a canvas
    pub fn new(canvas: &HtmlCanvasElement) -> Option<Self> {
        let ctx = canvas
            .get_context("2d")
            .ok()
            .flatten()?
            .dyn_into::<CanvasRenderingContext2d>()
            .ok()?;
        Some(Self { ctx })
    }

    pub fn draw(&self, commands: &[DrawCommand]) {
        for command in commands {
            self.draw_one(command);
        }
    }

    pub fn draw_one(&self, command: &DrawCommand) {
        let ctx = &self.ctx;
        ctx.save();
        match command {
            DrawCommand::FillRect { min, size, color } => {
                ctx.set_fill_style_str(color);
                ctx.fill_rect(min.x as f64, min.y as f64, size.x as f64, size.y as f64);
            }
            DrawCommand::Line {
                from,
                to,
                width,
                color,
            } => {
                ctx.set_stroke_style_str(color);
                ctx.set_line_width(*width as f64);
                ctx.begin_path();
                ctx.move_to(from.x as f64, from.y as f64);
                ctx.line_to(to.x as f64, to.y as f64);
                ctx.stroke();
            }
            DrawCommand::Polygon { points, color } => {
                if let Some((first, rest)) = points.split_first() {
                    ctx.set_fill_style_str(color);
                    ctx.begin_path();
                    ctx.move_to(first.x as f64, first.y as f64);
                    for p in rest {
                        ctx.line_to(p.x as f64, p.y as f64);
                    }
                    ctx.close_path();
                    ctx.fill();
                }
            }
            DrawCommand::Text {
                text,
                pos,
                font,
                align,
                color,
            } => {
                ctx.set_fill_style_str(color);
                ctx.set_font(font);
                ctx.set_text_align(align.as_str());
                ctx.set_text_baseline("alphabetic");
                if let Err(e) = ctx.fill_text(text, pos.x as f64, pos.y as f64) {
                    log::warn!("fill_text failed: {:?}", e);
                }
            }
        }
        ctx.restore();
    }
}
