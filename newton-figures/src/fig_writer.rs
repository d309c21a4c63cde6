use std::io::Result;
use std::ops::Range;
use std::path::PathBuf;

use indicatif::ProgressBar;
use itertools::{Itertools, MinMaxResult};
use newton::Frame;
use plotters::prelude::*;

use crate::utils::{error, Settings, Size, GIF_EXT};

fn draw_error(e: impl std::fmt::Display) -> std::io::Error {
    error(&e.to_string())
}

#[derive(Debug, Clone, PartialEq)]
pub struct Bounds {
    pub x_range: Range<f64>,
    pub y_range: Range<f64>,
}

impl Bounds {
    const MARGIN: f64 = 0.05;

    pub fn new(x_range: Range<f64>, y_range: Range<f64>) -> Self {
        Self { x_range, y_range }
    }

    /// Widen `x_range` to contain every frame. The y range is left empty and
    /// filled in by [`Bounds::fit_y`] once the curve is known.
    pub fn around(x_range: Range<f64>, frames: &[Frame]) -> Self {
        let (x_min, x_max) = frames
            .iter()
            .filter(|frame| frame.x.is_finite())
            .fold((x_range.start, x_range.end), |(lo, hi), frame| {
                (lo.min(frame.x), hi.max(frame.x))
            });
        Self::new(x_min..x_max, 0.0..0.0)
    }

    /// Set `y_range` to cover the x axis, the curve and every frame, with a
    /// small margin on both sides.
    pub fn fit_y(mut self, curve: &[(f64, f64)], frames: &[Frame]) -> Self {
        let ys = curve
            .iter()
            .map(|&(_, y)| y)
            .chain(frames.iter().map(|frame| frame.y))
            .chain(std::iter::once(0.0))
            .filter(|y| y.is_finite());

        let (y_min, y_max) = match ys.minmax_by(|a, b| a.total_cmp(b)) {
            MinMaxResult::NoElements => (-1.0, 1.0),
            MinMaxResult::OneElement(y) => (y - 1.0, y + 1.0),
            MinMaxResult::MinMax(lo, hi) if lo == hi => (lo - 1.0, hi + 1.0),
            MinMaxResult::MinMax(lo, hi) => (lo, hi),
        };

        let pad = (y_max - y_min) * Self::MARGIN;
        self.y_range = (y_min - pad)..(y_max + pad);
        self
    }

    fn width(&self) -> f64 {
        self.x_range.end - self.x_range.start
    }
}

/// Foot on the x axis and tip of the marker for `frame`, if it can be placed.
fn connector(frame: &Frame) -> Option<[(f64, f64); 2]> {
    (frame.x.is_finite() && frame.y.is_finite()).then_some([(frame.x, 0.0), (frame.x, frame.y)])
}

#[derive(Debug)]
pub struct FinishedFigure {
    pub name: String,
    pub frame_count: u64,
    pub cached: bool,
}

#[derive(Debug)]
pub struct FigureWriter {
    pub name: String,
    pub bounds: Bounds,
    pub size: Size,
    path: PathBuf,
    delay: u32,
    curve: Vec<(f64, f64)>,
}

impl FigureWriter {
    const CURVE_COLOR: RGBColor = BLACK;
    const AXIS_COLOR: RGBColor = RGBColor(128, 128, 128);
    const POINT_COLOR: RGBColor = RED;

    pub fn new(name: &str, bounds: Bounds, size: Size, settings: &Settings) -> Self {
        let path = settings.path(GIF_EXT);

        log::info!("[{name}]: Creating file {}", path.to_string_lossy());

        Self {
            name: name.to_owned(),
            bounds,
            size,
            path,
            delay: settings.delay,
            curve: vec![],
        }
    }

    pub fn add_curve(&mut self, curve: Vec<(f64, f64)>) {
        self.curve = curve;
    }

    fn point_radius(&self) -> i32 {
        (self.size.width as f64 / 150.0).round().max(2.0) as i32
    }

    fn dash(&self) -> (f64, f64) {
        let unit = self.size.width as f64 / 100.0;
        (unit, unit * 0.6)
    }

    fn draw_frame<DB: DrawingBackend>(
        &self,
        root: &DrawingArea<DB, plotters::coord::Shift>,
        frame: &Frame,
    ) -> Result<()> {
        root.fill(&WHITE).map_err(draw_error)?;

        let mut chart = ChartBuilder::on(root)
            .caption(format!("Iteration {}", frame.index), ("sans-serif", 20))
            .margin(10)
            .x_label_area_size(40)
            .y_label_area_size(50)
            .build_cartesian_2d(self.bounds.x_range.clone(), self.bounds.y_range.clone())
            .map_err(draw_error)?;

        chart
            .configure_mesh()
            .x_desc("C")
            .y_desc("f(C)")
            .draw()
            .map_err(draw_error)?;

        let (dash, gap) = self.dash();

        chart
            .draw_series(LineSeries::new(
                self.curve.iter().copied(),
                Self::CURVE_COLOR.stroke_width(2),
            ))
            .map_err(draw_error)?
            .label("f(C)")
            .legend(|(x, y)| {
                PathElement::new(vec![(x, y), (x + 20, y)], Self::CURVE_COLOR.stroke_width(2))
            });

        chart
            .draw_series(DashedLineSeries::new(
                vec![(self.bounds.x_range.start, 0.0), (self.bounds.x_range.end, 0.0)],
                dash,
                gap,
                Self::AXIS_COLOR.into(),
            ))
            .map_err(draw_error)?;

        if let Some([foot, point]) = connector(frame) {
            chart
                .draw_series(DashedLineSeries::new(
                    vec![foot, point],
                    dash,
                    gap,
                    Self::POINT_COLOR.mix(0.5).into(),
                ))
                .map_err(draw_error)?;

            chart
                .draw_series(std::iter::once(Circle::new(
                    point,
                    self.point_radius(),
                    Self::POINT_COLOR.filled(),
                )))
                .map_err(draw_error)?;
        } else {
            log::warn!(
                "[{}]: Iterate {} is not finite ({}, {}), not marked",
                self.name,
                frame.index,
                frame.x,
                frame.y
            );
        }

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()
            .map_err(draw_error)?;

        root.present().map_err(draw_error)
    }

    /// Render one GIF frame per entry of `frames`, in order.
    pub fn finish(self, frames: &[Frame], pb: &ProgressBar) -> Result<FinishedFigure> {
        if frames.is_empty() {
            return Err(error(&format!("[{}]: Nothing to draw", self.name)));
        }
        if self.bounds.width().is_nan() || self.bounds.width() <= 0.0 {
            return Err(error(&format!("[{}]: Empty x range", self.name)));
        }

        pb.set_length(frames.len() as u64);
        pb.set_message(format!("Rendering {}.{GIF_EXT}", self.name));

        let root = BitMapBackend::gif(&self.path, (self.size.width, self.size.height), self.delay)
            .map_err(draw_error)?
            .into_drawing_area();

        for frame in frames {
            log::debug!("[{}]: Frame {} at ({}, {})", self.name, frame.index, frame.x, frame.y);
            self.draw_frame(&root, frame)?;
            pb.inc(1);
        }
        drop(root);

        log::info!("[{}]: Wrote {} frames", self.name, frames.len());

        Ok(FinishedFigure {
            name: self.name,
            frame_count: frames.len() as u64,
            cached: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(index: usize, x: f64, y: f64) -> Frame {
        Frame { index, x, y }
    }

    #[test]
    fn marks_finite_frames() {
        assert_eq!(
            connector(&frame(1, 1.0, 0.5)),
            Some([(1.0, 0.0), (1.0, 0.5)])
        );
    }

    #[test]
    fn skips_non_finite_frames() {
        let q = newton::Quadratic::default();
        let trace = newton::Func::trace(
            &q,
            &newton::Run {
                initial_guess: 1e200,
                max_iterations: 3,
                tolerance: 1e-6,
            },
        );
        let frames = newton::frame::frames(&trace, &q);
        assert!(frames.iter().any(|frame| connector(frame).is_none()));

        assert_eq!(connector(&frame(2, f64::NAN, f64::NAN)), None);
        assert_eq!(connector(&frame(3, 1e200, f64::INFINITY)), None);

        let bounds = Bounds::around(-1.0..2.0, &frames);
        assert!(bounds.x_range.start.is_finite() && bounds.x_range.end.is_finite());
    }

    #[test]
    fn keeps_default_range() {
        let bounds = Bounds::around(-1.0..2.0, &[frame(0, 0.0, 1.0), frame(1, 1.0, 0.5)]);
        assert_eq!(bounds.x_range, -1.0..2.0);
    }

    #[test]
    fn widens_to_frames() {
        let bounds = Bounds::around(-1.0..2.0, &[frame(0, -3.0, 0.0), frame(1, 5.5, 0.0)]);
        assert_eq!(bounds.x_range, -3.0..5.5);
    }

    #[test]
    fn y_range_includes_axis_and_margin() {
        let curve = [(-1.0, 2.5), (1.0, 0.5), (2.0, 1.0)];
        let bounds = Bounds::around(-1.0..2.0, &[]).fit_y(&curve, &[frame(0, 0.0, 1.0)]);
        let pad = 2.5 * Bounds::MARGIN;
        assert!((bounds.y_range.start + pad).abs() < 1e-12);
        assert!((bounds.y_range.end - 2.5 - pad).abs() < 1e-12);
    }

    #[test]
    fn flat_curve_gets_height() {
        let bounds = Bounds::around(0.0..1.0, &[]).fit_y(&[(0.0, 0.0), (1.0, 0.0)], &[]);
        assert!(bounds.y_range.end > bounds.y_range.start);
    }
}
