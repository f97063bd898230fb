//! Turns a sample set into primitive draw calls.
//!
//! A [`RenderPass`] always emits, in this order: one background fill covering the
//! canvas, the optional grid lines, then one filled circle per sample in input order.
//! Later primitives paint over earlier ones, so the grid is always beneath the data.

use serde::{ Deserialize, Serialize };
use tracing::trace;

use crate::ply::Sample;
use crate::projection::{ CanvasSize, ProjectionTransform };

/// 8-bit RGBA colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    /// Red.
    pub r: u8,
    /// Green.
    pub g: u8,
    /// Blue.
    pub b: u8,
    /// Alpha, 255 is opaque.
    #[serde(default = "opaque")]
    pub a: u8,
}

fn opaque() -> u8 {
    255
}

impl Color {
    /// Opaque white.
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    /// Opaque light gray.
    pub const LIGHT_GRAY: Color = Color::rgb(211, 211, 211);
    /// Opaque blue.
    pub const BLUE: Color = Color::rgb(0, 0, 255);

    /// Opaque colour from its channels.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color { r, g, b, a: 255 }
    }
}

/// Grid drawn beneath the data, in canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridStyle {
    /// Distance between neighbouring lines; independent of the data scale.
    pub spacing: f64,
    /// Line colour.
    pub color: Color,
    /// Line width.
    pub stroke_width: f64,
}

impl Default for GridStyle {
    fn default() -> Self {
        GridStyle { spacing: 50.0, color: Color::LIGHT_GRAY, stroke_width: 1.0 }
    }
}

/// Everything a render pass needs besides the samples.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderStyle {
    /// Colour of the full-canvas fill.
    pub background: Color,
    /// Grid, if any.
    pub grid: Option<GridStyle>,
    /// Colour of the sample marks.
    pub mark_color: Color,
    /// Radius of the sample marks in pixels.
    pub mark_radius: f64,
}

impl RenderStyle {
    /// White background, grid, radius 5 blue marks.
    pub fn measurements() -> Self {
        RenderStyle {
            background: Color::WHITE,
            grid: Some(GridStyle::default()),
            mark_color: Color::BLUE,
            mark_radius: 5.0,
        }
    }

    /// Light gray background, no grid, radius 1 blue marks.
    pub fn point_cloud() -> Self {
        RenderStyle {
            background: Color::LIGHT_GRAY,
            grid: None,
            mark_color: Color::BLUE,
            mark_radius: 1.0,
        }
    }
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self::measurements()
    }
}

/// A drawing surface.
///
/// Coordinates are canvas pixels with the origin in the top-left corner.
pub trait Canvas {
    /// Fills an axis-aligned rectangle.
    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: Color);
    /// Strokes a straight line.
    fn draw_line(&mut self, from: (f64, f64), to: (f64, f64), color: Color, width: f64);
    /// Fills a circle.
    fn fill_circle(&mut self, center: (f64, f64), radius: f64, color: Color);
}

/// A recorded draw call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Primitive {
    /// See [`Canvas::fill_rect`].
    Rect {
        /// Left edge.
        x: f64,
        /// Top edge.
        y: f64,
        /// Width.
        width: f64,
        /// Height.
        height: f64,
        /// Fill colour.
        color: Color,
    },
    /// See [`Canvas::draw_line`].
    Line {
        /// Start point.
        from: (f64, f64),
        /// End point.
        to: (f64, f64),
        /// Stroke colour.
        color: Color,
        /// Stroke width.
        width: f64,
    },
    /// See [`Canvas::fill_circle`].
    Circle {
        /// Centre.
        center: (f64, f64),
        /// Radius.
        radius: f64,
        /// Fill colour.
        color: Color,
    },
}

/// Canvas that records every call, for hand-over to a UI toolkit or for inspection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DrawList {
    /// Primitives in emission order.
    pub primitives: Vec<Primitive>,
}

impl DrawList {
    /// Creates an empty list.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Canvas for DrawList {
    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: Color) {
        self.primitives.push(Primitive::Rect { x, y, width, height, color });
    }
    fn draw_line(&mut self, from: (f64, f64), to: (f64, f64), color: Color, width: f64) {
        self.primitives.push(Primitive::Line { from, to, color, width });
    }
    fn fill_circle(&mut self, center: (f64, f64), radius: f64, color: Color) {
        self.primitives.push(Primitive::Circle { center, radius, color });
    }
}

/// Draws one frame of a sample set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderPass {
    /// Styling of the frame.
    pub style: RenderStyle,
}

impl RenderPass {
    /// Creates a pass with the given style.
    pub fn new(style: RenderStyle) -> Self {
        RenderPass { style }
    }

    /// Renders `samples` onto `canvas`.
    ///
    /// The projection is derived from `samples` and `size` on every call. Returns it,
    /// or `None` if no samples were drawn because the set was empty.
    pub fn render<S: Sample, C: Canvas + ?Sized>(&self, canvas: &mut C, size: CanvasSize, samples: &[S]) -> Option<ProjectionTransform> {
        canvas.fill_rect(0.0, 0.0, size.width, size.height, self.style.background);
        if let Some(grid) = self.style.grid {
            draw_grid(canvas, size, &grid);
        }

        let transform = ProjectionTransform::fit(samples, size)?;
        for sample in samples {
            let (x, y) = transform.project(sample);
            if !(x.is_finite() && y.is_finite()) {
                trace!("skipping sample with non-finite canvas position");
                continue;
            }
            canvas.fill_circle((x, y), self.style.mark_radius, self.style.mark_color);
        }
        Some(transform)
    }
}

/// Most lines drawn along one axis, whatever the spacing.
const MAX_GRID_LINES: usize = 1024;

fn draw_grid<C: Canvas + ?Sized>(canvas: &mut C, size: CanvasSize, grid: &GridStyle) {
    if !(grid.spacing.is_finite() && grid.spacing > 0.0) || !size.is_drawable() {
        return;
    }
    for x in grid_positions(size.width, grid.spacing) {
        canvas.draw_line((x, 0.0), (x, size.height), grid.color, grid.stroke_width);
    }
    for y in grid_positions(size.height, grid.spacing) {
        canvas.draw_line((0.0, y), (size.width, y), grid.color, grid.stroke_width);
    }
}

fn grid_positions(extent: f64, spacing: f64) -> impl Iterator<Item = f64> {
    (0..MAX_GRID_LINES)
        .map(move |i| i as f64 * spacing)
        .take_while(move |p| *p < extent)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ply::Measurement;

    #[test]
    fn grid_lines_every_spacing() {
        let mut list = DrawList::new();
        draw_grid(&mut list, CanvasSize::new(120.0, 50.0), &GridStyle::default());
        let lines: Vec<((f64, f64), (f64, f64))> = list.primitives.iter()
            .map(|p| match *p {
                Primitive::Line { from, to, .. } => (from, to),
                _ => panic!("only lines expected"),
            })
            .collect();
        assert_eq!(lines, vec![
            ((0.0, 0.0), (0.0, 50.0)),
            ((50.0, 0.0), (50.0, 50.0)),
            ((100.0, 0.0), (100.0, 50.0)),
            ((0.0, 0.0), (120.0, 0.0)),
        ]);
    }

    #[test]
    fn zero_spacing_draws_no_grid() {
        let mut list = DrawList::new();
        let grid = GridStyle { spacing: 0.0, ..GridStyle::default() };
        draw_grid(&mut list, CanvasSize::new(100.0, 100.0), &grid);
        assert!(list.primitives.is_empty());
    }

    #[test]
    fn tiny_spacing_is_capped() {
        let mut list = DrawList::new();
        let grid = GridStyle { spacing: 1e-9, ..GridStyle::default() };
        draw_grid(&mut list, CanvasSize::new(300.0, 300.0), &grid);
        assert_eq!(list.primitives.len(), 2 * MAX_GRID_LINES);
    }

    #[test]
    fn empty_set_draws_background_and_grid_only() {
        let mut list = DrawList::new();
        let empty: Vec<Measurement> = Vec::new();
        let pass = RenderPass::new(RenderStyle::measurements());
        assert!(pass.render(&mut list, CanvasSize::new(100.0, 100.0), &empty).is_none());
        assert!(matches!(list.primitives[0], Primitive::Rect { color: Color::WHITE, .. }));
        assert_eq!(list.primitives.len(), 1 + 2 + 2);
        assert!(list.primitives.iter().all(|p| !matches!(p, Primitive::Circle { .. })));
    }

    #[test]
    fn point_cloud_style_has_no_grid() {
        let mut list = DrawList::new();
        let points = [Measurement::new(0.0, 0.0), Measurement::new(1.0, 1.0)];
        RenderPass::new(RenderStyle::point_cloud()).render(&mut list, CanvasSize::new(300.0, 300.0), &points);
        assert_eq!(list.primitives.len(), 3);
        assert_eq!(list.primitives[1], Primitive::Circle { center: (0.0, 300.0), radius: 1.0, color: Color::BLUE });
        assert_eq!(list.primitives[2], Primitive::Circle { center: (300.0, 0.0), radius: 1.0, color: Color::BLUE });
    }
}
