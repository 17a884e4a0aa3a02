use tilestream_common::TileCoord;

use crate::grid::LayeredGrid;

/// Rectangular region of the grid to render, in cells.
#[derive(Debug, Clone, Copy)]
pub struct RenderView {
    /// Bottom-left cell of the region.
    pub origin: TileCoord,
    pub width: u32,
    pub height: u32,
}

impl RenderView {
    /// View of `half_x`/`half_y` cells around a center cell.
    pub fn centered(center: TileCoord, half_x: u32, half_y: u32) -> Self {
        Self {
            origin: center.offset(-(half_x as i32), -(half_y as i32)),
            width: half_x * 2 + 1,
            height: half_y * 2 + 1,
        }
    }
}

impl Default for RenderView {
    fn default() -> Self {
        Self {
            origin: TileCoord::new(0, 0),
            width: 16,
            height: 16,
        }
    }
}

/// Renderer-agnostic interface over the visual grid.
///
/// A renderer reads the grid and a view and produces output. It never
/// mutates the grid.
pub trait Renderer {
    type Output;

    fn render(&self, grid: &LayeredGrid, view: &RenderView) -> Self::Output;
}

/// Debug text renderer: one character per cell, top row first.
///
/// Empty cells print as a space. An optional overlay wins over soil, which is
/// how callers mark interactables or the viewpoint.
#[derive(Default)]
pub struct AsciiRenderer {
    overlay: Option<Box<dyn Fn(TileCoord) -> Option<char>>>,
}

impl AsciiRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_overlay(overlay: impl Fn(TileCoord) -> Option<char> + 'static) -> Self {
        Self {
            overlay: Some(Box::new(overlay)),
        }
    }
}

impl Renderer for AsciiRenderer {
    type Output = String;

    fn render(&self, grid: &LayeredGrid, view: &RenderView) -> String {
        let mut out = String::with_capacity(((view.width + 1) * view.height) as usize);
        for row in (0..view.height as i32).rev() {
            for col in 0..view.width as i32 {
                let coord = view.origin.offset(col, row);
                let glyph = self
                    .overlay
                    .as_ref()
                    .and_then(|overlay| overlay(coord))
                    .or_else(|| grid.top_at(coord).map(|soil| soil.glyph()))
                    .unwrap_or(' ');
                out.push(glyph);
            }
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tilestream_common::{GridLayer, SoilType};
    use tilestream_kernel::VisualGrid;

    #[test]
    fn renders_top_row_first() {
        let mut grid = LayeredGrid::new();
        grid.draw_layer(GridLayer::Ground, TileCoord::new(0, 1), SoilType::Sand);
        grid.draw_layer(GridLayer::Water, TileCoord::new(1, 0), SoilType::Water);

        let view = RenderView {
            origin: TileCoord::new(0, 0),
            width: 2,
            height: 2,
        };
        let out = AsciiRenderer::new().render(&grid, &view);
        assert_eq!(out, ": \n ~\n");
    }

    #[test]
    fn overlay_wins_over_soil() {
        let mut grid = LayeredGrid::new();
        grid.draw_layer(GridLayer::Ground, TileCoord::new(0, 0), SoilType::Sand);
        let renderer =
            AsciiRenderer::with_overlay(|c| (c == TileCoord::new(0, 0)).then_some('@'));
        let view = RenderView {
            origin: TileCoord::new(0, 0),
            width: 1,
            height: 1,
        };
        assert_eq!(renderer.render(&grid, &view), "@\n");
    }

    #[test]
    fn centered_view_spans_both_sides() {
        let view = RenderView::centered(TileCoord::new(10, 10), 2, 1);
        assert_eq!(view.origin, TileCoord::new(8, 9));
        assert_eq!(view.width, 5);
        assert_eq!(view.height, 3);
    }
}
