//! Pointer input translation
//!
//! Clicks arrive in CSS pixels relative to the canvas box; the board is laid
//! out in canvas pixels. The two differ whenever the canvas is scaled by CSS.

use glam::Vec2;

use crate::field::ClickTarget;
use crate::renderer::Layout;

/// Scale a CSS-pixel offset inside the canvas box to canvas pixels
pub fn css_to_canvas(offset: Vec2, css_size: Vec2, canvas_size: Vec2) -> Vec2 {
    if css_size.x <= 0.0 || css_size.y <= 0.0 {
        return offset;
    }
    offset * (canvas_size / css_size)
}

/// Translate a click inside the canvas box into a board target
pub fn click_target(layout: &Layout, offset: Vec2, css_size: Vec2) -> ClickTarget {
    let pixel = css_to_canvas(offset, css_size, layout.canvas_size);
    let target = layout.hit_test(pixel);
    log::debug!("Click at ({:.0}, {:.0}) -> {:?}", pixel.x, pixel.y, target);
    target
}

/// Translate a DOM mouse event on the canvas
#[cfg(target_arch = "wasm32")]
pub fn mouse_target(
    event: &web_sys::MouseEvent,
    canvas: &web_sys::HtmlCanvasElement,
    layout: &Layout,
) -> ClickTarget {
    let rect = canvas.get_bounding_client_rect();
    let offset = Vec2::new(
        (event.client_x() as f64 - rect.left()) as f32,
        (event.client_y() as f64 - rect.top()) as f32,
    );
    let css_size = Vec2::new(rect.width() as f32, rect.height() as f32);
    click_target(layout, offset, css_size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::GridLocation;

    #[test]
    fn test_unscaled_canvas() {
        let layout = Layout::default();
        let target = click_target(&layout, Vec2::new(330.0, 30.0), layout.canvas_size);
        assert_eq!(target, ClickTarget::Cell(GridLocation::new(0, 0)));
    }

    #[test]
    fn test_half_size_canvas() {
        let layout = Layout::default();
        // Displayed at 600x300 CSS pixels: (449, 149) is canvas (898, 298)
        let target = click_target(&layout, Vec2::new(449.0, 149.0), Vec2::new(600.0, 300.0));
        assert_eq!(target, ClickTarget::Cell(GridLocation::new(9, 4)));
    }

    #[test]
    fn test_zero_css_size_passes_through() {
        assert_eq!(
            css_to_canvas(Vec2::new(5.0, 6.0), Vec2::ZERO, Vec2::new(100.0, 100.0)),
            Vec2::new(5.0, 6.0)
        );
    }

    #[test]
    fn test_side_panel_click() {
        let layout = Layout::default();
        assert_eq!(
            click_target(&layout, Vec2::new(50.0, 50.0), layout.canvas_size),
            ClickTarget::Outside
        );
    }
}
