//! Draw command generation for every screen element
//!
//! The game never talks to a drawing API directly; it produces a list of
//! [`DrawCommand`]s that a backend (the 2D canvas in the browser) executes.

use glam::Vec2;

use super::layout::Layout;
use crate::consts::SCORE_COUNTUP_STEP;
use crate::field::{Arrow, Equation, GridLocation};

/// Palette (CSS colors)
pub mod colors {
    pub const BLACK: &str = "#092327";
    pub const WHITE: &str = "#eeeeee";
    pub const THEME: &str = "#00A9A5";
    pub const HIGHLIGHT: &str = "#dac0f8";
    pub const BACKGROUND: &str = "#0e0e0e";
}

/// Smallest drawn arrow, as a fraction of a cell
pub const MIN_ARROW_LENGTH: f32 = 0.1;
/// Arrowhead circumradius in pixels
pub const ARROWHEAD_RADIUS: f32 = 5.0;

const FONT_TITLE: &str = "bold 30px IBM Plex Mono";
const FONT_BODY: &str = "bold 16px IBM Plex Mono";
const FONT_SCORE_LABEL: &str = "28px IBM Plex Mono";
const FONT_SCORE_VALUE: &str = "24px IBM Plex Mono";

/// Horizontal text anchor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
}

impl TextAlign {
    pub fn as_str(&self) -> &'static str {
        match self {
            TextAlign::Left => "left",
            TextAlign::Center => "center",
        }
    }
}

/// A single backend-independent drawing operation
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    FillRect {
        min: Vec2,
        size: Vec2,
        color: &'static str,
    },
    Line {
        from: Vec2,
        to: Vec2,
        width: f32,
        color: &'static str,
    },
    /// Filled closed polygon
    Polygon {
        points: Vec<Vec2>,
        color: &'static str,
    },
    Text {
        text: String,
        pos: Vec2,
        font: &'static str,
        align: TextAlign,
        color: &'static str,
    },
}

/// Background, grid lines and axes
pub fn board(layout: &Layout) -> Vec<DrawCommand> {
    let n = layout.grid_size;
    let offset = layout.offset();
    let size = layout.game_size;
    let mut commands = Vec::with_capacity(2 * (n as usize + 1) + 3);

    commands.push(DrawCommand::FillRect {
        min: Vec2::ZERO,
        size: layout.canvas_size,
        color: colors::BACKGROUND,
    });

    for i in 0..=n {
        let t = i as f32 * layout.cell_size();
        // Vertical
        commands.push(DrawCommand::Line {
            from: offset + Vec2::new(t, 0.0),
            to: offset + Vec2::new(t, size),
            width: 1.0,
            color: colors::BLACK,
        });
        // Horizontal
        commands.push(DrawCommand::Line {
            from: offset + Vec2::new(0.0, t),
            to: offset + Vec2::new(size, t),
            width: 1.0,
            color: colors::BLACK,
        });
    }

    let center = layout.center();
    commands.push(DrawCommand::Line {
        from: Vec2::new(center.x, offset.y),
        to: Vec2::new(center.x, offset.y + size),
        width: 6.0,
        color: colors::THEME,
    });
    commands.push(DrawCommand::Line {
        from: Vec2::new(offset.x, center.y),
        to: Vec2::new(offset.x + size, center.y),
        width: 6.0,
        color: colors::THEME,
    });

    commands
}

/// Triangle centered on `tip`, pointing along `from → tip`
pub fn arrowhead(from: Vec2, tip: Vec2, radius: f32) -> Vec<Vec2> {
    let d = tip - from;
    let angle = d.y.atan2(d.x);
    (0..3)
        .map(|k| {
            let a = angle + k as f32 * std::f32::consts::TAU / 3.0;
            tip + Vec2::new(a.cos(), a.sin()) * radius
        })
        .collect()
}

/// Shaft and head of one arrow. Length is the magnitude relative to the
/// board maximum, never shorter than a tenth of a cell. Arrows with
/// non-finite geometry are skipped.
pub fn arrow(layout: &Layout, arrow: &Arrow, max_magnitude: f64) -> Vec<DrawCommand> {
    let length = ((arrow.magnitude / max_magnitude).abs() as f32).max(MIN_ARROW_LENGTH);
    let loc = Vec2::new(arrow.location.x as f32, arrow.location.y as f32);
    let dir = arrow.direction.as_vec2();

    let start = layout.grid_to_pixel(loc.x, loc.y);
    // Screen y grows downward
    let end = layout.grid_to_pixel(loc.x + length * dir.x, loc.y - length * dir.y);
    if !start.is_finite() || !end.is_finite() {
        return Vec::new();
    }

    vec![
        DrawCommand::Line {
            from: start,
            to: end,
            width: 2.0,
            color: colors::HIGHLIGHT,
        },
        DrawCommand::Polygon {
            points: arrowhead(start, end, ARROWHEAD_RADIUS),
            color: colors::HIGHLIGHT,
        },
    ]
}

/// Fill the guessed cell
pub fn answer_highlight(layout: &Layout, cell: GridLocation) -> DrawCommand {
    DrawCommand::FillRect {
        min: layout.grid_to_pixel(cell.x as f32, cell.y as f32),
        size: Vec2::splat(layout.cell_size()),
        color: colors::THEME,
    }
}

/// `F = <i, j>` in the top-left corner
pub fn equation_banner(equation: &Equation) -> DrawCommand {
    DrawCommand::Text {
        text: equation.to_string(),
        pos: Vec2::new(20.0, 30.0),
        font: FONT_BODY,
        align: TextAlign::Left,
        color: colors::WHITE,
    }
}

/// Title screen text
pub fn start_screen(layout: &Layout) -> Vec<DrawCommand> {
    let center = layout.center();
    let line = |text: &str, dy: f32, font: &'static str| DrawCommand::Text {
        text: text.to_string(),
        pos: center + Vec2::new(0.0, dy),
        font,
        align: TextAlign::Center,
        color: colors::WHITE,
    };

    vec![
        line("Welcome to OMEGA FLUX", -100.0, FONT_TITLE),
        line(
            "Maximize total FLUX through the provided vector field by selecting a square",
            0.0,
            FONT_BODY,
        ),
        line("The quicker you choose, the higher your SCORE will be", 50.0, FONT_BODY),
        line("- Click anywhere to start -", 100.0, FONT_BODY),
    ]
}

/// `Score:` heading in the side panel
pub fn score_label() -> DrawCommand {
    DrawCommand::Text {
        text: "Score:".to_string(),
        pos: Vec2::new(20.0, 90.0),
        font: FONT_SCORE_LABEL,
        align: TextAlign::Left,
        color: colors::WHITE,
    }
}

/// Clear the score box and print a value in it
pub fn score_value(value: f64) -> Vec<DrawCommand> {
    vec![
        DrawCommand::FillRect {
            min: Vec2::new(20.0, 100.0),
            size: Vec2::splat(150.0),
            color: colors::BACKGROUND,
        },
        DrawCommand::Text {
            text: format!("{}", value.floor()),
            pos: Vec2::new(20.0, 120.0),
            font: FONT_SCORE_VALUE,
            align: TextAlign::Left,
            color: colors::WHITE,
        },
    ]
}

/// Intermediate values shown while the score counts up: 0, 200, 400, ...
/// strictly below the final score. Empty for non-finite scores.
pub fn score_countup(score: f64) -> impl Iterator<Item = f64> {
    let limit = if score.is_finite() { score } else { f64::NEG_INFINITY };
    (0u32..)
        .map(|k| k as f64 * SCORE_COUNTUP_STEP)
        .take_while(move |v| *v < limit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{Equation, evaluate};
    use glam::DVec2;

    fn arrow_at(x: i32, y: i32, direction: DVec2, magnitude: f64) -> Arrow {
        Arrow {
            direction,
            magnitude,
            location: GridLocation::new(x, y),
            speed: 1.0,
        }
    }

    #[test]
    fn test_board_lines() {
        let layout = Layout::default();
        let commands = board(&layout);
        let lines = commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Line { .. }))
            .count();
        // 11 vertical + 11 horizontal + 2 axes
        assert_eq!(lines, 24);
        assert!(matches!(commands[0], DrawCommand::FillRect { .. }));
    }

    #[test]
    fn test_full_length_arrow_points_right() {
        let layout = Layout::default();
        let commands = arrow(&layout, &arrow_at(2, 3, DVec2::X, 4.0), 4.0);
        let DrawCommand::Line { from, to, .. } = commands[0] else {
            panic!("expected shaft first");
        };
        assert_eq!(from, layout.grid_to_pixel(2.0, 3.0));
        assert_eq!(to - from, Vec2::new(layout.cell_size(), 0.0));
    }

    #[test]
    fn test_upward_field_points_up_on_screen() {
        let layout = Layout::default();
        let commands = arrow(&layout, &arrow_at(5, 5, DVec2::Y, 1.0), 1.0);
        let DrawCommand::Line { from, to, .. } = commands[0] else {
            panic!("expected shaft first");
        };
        assert!(to.y < from.y);
    }

    #[test]
    fn test_weak_arrows_keep_minimum_length() {
        let layout = Layout::default();
        let commands = arrow(&layout, &arrow_at(0, 0, DVec2::X, 0.001), 100.0);
        let DrawCommand::Line { from, to, .. } = commands[0] else {
            panic!("expected shaft first");
        };
        assert!(((to - from).length() - MIN_ARROW_LENGTH * layout.cell_size()).abs() < 1e-3);
    }

    #[test]
    fn test_nan_arrow_is_skipped() {
        let layout = Layout::default();
        let eq = Equation::parse("x^0.5", "0").unwrap();
        let a = evaluate(&eq, GridLocation::new(0, 0), 10, 1.0);
        assert!(arrow(&layout, &a, 5.0).is_empty());
    }

    #[test]
    fn test_arrowhead_points_are_on_circle() {
        let tip = Vec2::new(10.0, 10.0);
        let points = arrowhead(Vec2::ZERO, tip, 5.0);
        assert_eq!(points.len(), 3);
        for p in &points {
            assert!(((*p - tip).length() - 5.0).abs() < 1e-4);
        }
        // First vertex leads along the shaft
        assert!(points[0].x > tip.x && points[0].y > tip.y);
    }

    #[test]
    fn test_score_countup() {
        let steps: Vec<f64> = score_countup(450.0).collect();
        assert_eq!(steps, vec![0.0, 200.0, 400.0]);
        assert_eq!(score_countup(0.0).count(), 0);
        assert_eq!(score_countup(f64::NAN).count(), 0);
        assert_eq!(score_countup(f64::INFINITY).count(), 0);
    }

    #[test]
    fn test_score_value_is_floored() {
        let commands = score_value(1234.9);
        assert!(matches!(
            &commands[1],
            DrawCommand::Text { text, .. } if text == "1234"
        ));
    }

    #[test]
    fn test_equation_banner() {
        let eq = Equation::parse("3x^2", "-x").unwrap();
        assert!(matches!(
            equation_banner(&eq),
            DrawCommand::Text { text, .. } if text == "F = \u{2329}3x^2, -x\u{232A}"
        ));
    }
}
