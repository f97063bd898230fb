//! Aspect-correct mapping from data space onto a canvas.
//!
//! A [`ProjectionTransform`] scales both axes by the same factor, centres the
//! bounding box of the data inside the canvas and flips Y: data Y grows upward,
//! canvas Y grows downward. It is cheap to compute and must be derived again
//! whenever the data or the canvas size changes.

use serde::{ Deserialize, Serialize };
use crate::ply::Sample;

/// Size of the drawing surface in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasSize {
    /// Width in pixels.
    pub width: f64,
    /// Height in pixels.
    pub height: f64,
}

impl CanvasSize {
    /// Creates a new canvas size.
    pub fn new(width: f64, height: f64) -> Self {
        CanvasSize { width, height }
    }

    /// `true` if both sides are finite and strictly positive.
    pub fn is_drawable(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

/// Axis-aligned extents of a sample set in data space. Z is never looked at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    /// Smallest X.
    pub min_x: f64,
    /// Largest X.
    pub max_x: f64,
    /// Smallest Y.
    pub min_y: f64,
    /// Largest Y.
    pub max_y: f64,
}

impl Bounds {
    /// Extents of all samples with finite planar coordinates, `None` if there are none.
    pub fn of<'a, S, I>(samples: I) -> Option<Bounds>
    where
        S: Sample + 'a,
        I: IntoIterator<Item = &'a S>,
    {
        samples.into_iter()
            .map(Sample::planar)
            .filter(|(x, y)| x.is_finite() && y.is_finite())
            .fold(None, |bounds: Option<Bounds>, (x, y)| Some(match bounds {
                None => Bounds { min_x: x, max_x: x, min_y: y, max_y: y },
                Some(b) => Bounds {
                    min_x: b.min_x.min(x),
                    max_x: b.max_x.max(x),
                    min_y: b.min_y.min(y),
                    max_y: b.max_y.max(y),
                },
            }))
    }

    /// Extent along X.
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    /// Extent along Y.
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }
}

/// Uniform scale plus offset mapping data coordinates to canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectionTransform {
    /// Pixels per data unit, identical on both axes.
    pub scale: f64,
    /// Data-space X that maps to the canvas' left edge.
    pub offset_x: f64,
    /// Data-space Y that maps to the canvas' bottom edge.
    pub offset_y: f64,
    /// Height of the canvas, needed for the Y flip.
    pub canvas_height: f64,
}

impl ProjectionTransform {
    /// Fits `samples` into `canvas`.
    ///
    /// Returns `None`, meaning "draw no samples", when there is nothing finite to draw
    /// or the canvas has no area.
    pub fn fit<S: Sample>(samples: &[S], canvas: CanvasSize) -> Option<Self> {
        Self::from_bounds(Bounds::of(samples)?, canvas)
    }

    /// Fits a bounding box into `canvas`.
    ///
    /// An axis without extent (a single point, or all points on one line) falls back
    /// to a scale of `1.0` instead of dividing by zero.
    pub fn from_bounds(bounds: Bounds, canvas: CanvasSize) -> Option<Self> {
        if !canvas.is_drawable() {
            return None;
        }
        let data_width = bounds.width();
        let data_height = bounds.height();
        let scale_x = if data_width > 0.0 { canvas.width / data_width } else { 1.0 };
        let scale_y = if data_height > 0.0 { canvas.height / data_height } else { 1.0 };
        let scale = scale_x.min(scale_y);

        Some(ProjectionTransform {
            scale,
            offset_x: bounds.min_x - (canvas.width / scale - data_width) / 2.0,
            offset_y: bounds.min_y - (canvas.height / scale - data_height) / 2.0,
            canvas_height: canvas.height,
        })
    }

    /// Canvas position of a data-space point.
    pub fn project_xy(&self, x: f64, y: f64) -> (f64, f64) {
        (
            (x - self.offset_x) * self.scale,
            self.canvas_height - (y - self.offset_y) * self.scale,
        )
    }

    /// Canvas position of a sample.
    pub fn project<S: Sample>(&self, sample: &S) -> (f64, f64) {
        let (x, y) = sample.planar();
        self.project_xy(x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ply::{ Measurement, PointSample };

    fn m(x: f64, y: f64) -> Measurement {
        Measurement::new(x, y)
    }

    #[test]
    fn bounds_ignore_z() {
        let points = [PointSample::new(1.0, 2.0, -100.0), PointSample::new(3.0, -4.0, 100.0)];
        let b = Bounds::of(&points).unwrap();
        assert_eq!(b, Bounds { min_x: 1.0, max_x: 3.0, min_y: -4.0, max_y: 2.0 });
        assert_eq!(b.width(), 2.0);
        assert_eq!(b.height(), 6.0);
    }

    #[test]
    fn bounds_skip_non_finite() {
        let points = [m(f64::NAN, 1.0), m(2.0, 3.0), m(4.0, f64::INFINITY)];
        assert_eq!(Bounds::of(&points), Some(Bounds { min_x: 2.0, max_x: 2.0, min_y: 3.0, max_y: 3.0 }));
        assert_eq!(Bounds::of(&[m(f64::NAN, 0.0)]), None);
    }

    #[test]
    fn empty_set_is_no_draw() {
        let empty: [Measurement; 0] = [];
        assert!(ProjectionTransform::fit(&empty, CanvasSize::new(100.0, 100.0)).is_none());
    }

    #[test]
    fn empty_canvas_is_no_draw() {
        let points = [m(0.0, 0.0), m(1.0, 1.0)];
        assert!(ProjectionTransform::fit(&points, CanvasSize::new(0.0, 100.0)).is_none());
        assert!(ProjectionTransform::fit(&points, CanvasSize::new(100.0, -1.0)).is_none());
    }

    #[test]
    fn square_data_fills_square_canvas() {
        let points = [m(0.0, 0.0), m(10.0, 10.0)];
        let t = ProjectionTransform::fit(&points, CanvasSize::new(100.0, 100.0)).unwrap();
        assert_eq!(t.scale, 10.0);
        assert_eq!(t.project(&points[0]), (0.0, 100.0));
        assert_eq!(t.project(&points[1]), (100.0, 0.0));
    }

    #[test]
    fn wide_data_is_centred_vertically() {
        let points = [m(0.0, 0.0), m(20.0, 10.0)];
        let t = ProjectionTransform::fit(&points, CanvasSize::new(100.0, 100.0)).unwrap();
        assert_eq!(t.scale, 5.0);
        assert_eq!(t.project(&points[0]), (0.0, 75.0));
        assert_eq!(t.project(&points[1]), (100.0, 25.0));
    }

    #[test]
    fn tall_data_is_centred_horizontally() {
        let points = [m(0.0, 0.0), m(10.0, 40.0)];
        let t = ProjectionTransform::fit(&points, CanvasSize::new(200.0, 100.0)).unwrap();
        assert_eq!(t.scale, 2.5);
        assert_eq!(t.project(&points[0]), (87.5, 100.0));
        assert_eq!(t.project(&points[1]), (112.5, 0.0));
    }

    #[test]
    fn degenerate_x_falls_back_to_unit_scale() {
        let points = [m(5.0, 0.0), m(5.0, 10.0)];
        let t = ProjectionTransform::fit(&points, CanvasSize::new(100.0, 100.0)).unwrap();
        assert_eq!(t.scale, 1.0);
        for p in &points {
            let (x, y) = t.project(p);
            assert!(x.is_finite() && y.is_finite());
        }
        assert_eq!(t.project(&points[0]), (50.0, 55.0));
        assert_eq!(t.project(&points[1]), (50.0, 45.0));
    }

    #[test]
    fn single_point_lands_in_the_middle() {
        let points = [PointSample::new(-3.0, 7.0, 1.0)];
        let t = ProjectionTransform::fit(&points, CanvasSize::new(300.0, 200.0)).unwrap();
        assert_eq!(t.scale, 1.0);
        assert_eq!(t.project(&points[0]), (150.0, 100.0));
    }

    #[test]
    fn every_point_stays_inside_the_canvas() {
        let points: Vec<Measurement> = (0..50)
            .map(|i| m(f64::from(i) * 1.7 - 20.0, (f64::from(i) * 0.37).sin() * 13.0))
            .collect();
        let size = CanvasSize::new(320.0, 240.0);
        let t = ProjectionTransform::fit(&points, size).unwrap();
        for p in &points {
            let (x, y) = t.project(p);
            assert!((-1e-9..=size.width + 1e-9).contains(&x), "x = {}", x);
            assert!((-1e-9..=size.height + 1e-9).contains(&y), "y = {}", y);
        }
    }
}
