//! Figure layout and rendering
//!
//! Rendering is split in two. Each renderer module turns artifacts into a
//! plain figure description (panels, traces as point lists, axis ranges and
//! labels); a [`Canvas`] then draws that description to an image file. The
//! layout half is where all the decisions live and is tested directly; the
//! drawing half is a mechanical consumer.
//!
//! - [`series`]: overlay or stacked time-series figures
//! - [`matrix`]: small-multiples grid for a sweep family
//! - [`spectrogram`]: STFT of a sibling WAV file
//! - [`trajectory`]: X/Y path of panner position columns
//! - [`bitmap`]: the PNG [`Canvas`] backed by `plotters`

pub mod bitmap;
pub mod matrix;
pub mod series;
pub mod spectrogram;
pub mod trajectory;

pub use bitmap::BitmapCanvas;

use crate::artifact::TraceStyle;
use crate::error::Result;
use std::path::{Path, PathBuf};

/// Fixed amplitude window for normalized LFO output.
pub const AMPLITUDE_RANGE: (f64, f64) = (-1.1, 1.1);

/// Image file extension for every figure
pub const IMAGE_EXTENSION: &str = "png";

/// Draws figure descriptions to files.
pub trait Canvas {
    fn draw_series(&mut self, figure: &SeriesFigure, out: &Path) -> Result<()>;
    fn draw_matrix(&mut self, figure: &MatrixFigure, out: &Path) -> Result<()>;
    fn draw_spectrogram(&mut self, figure: &SpectrogramFigure, out: &Path) -> Result<()>;
    fn draw_trajectory(&mut self, figure: &TrajectoryFigure, out: &Path) -> Result<()>;
}

/// An image written to disk and the logical name the report refers to it by.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedFigure {
    pub name: String,
    pub path: PathBuf,
}

impl RenderedFigure {
    pub fn new(plots_dir: &Path, name: impl Into<String>) -> Self {
        let name = name.into();
        let path = image_path(plots_dir, &name);
        Self { name, path }
    }
}

/// `<plots_dir>/<name>.png`
pub fn image_path(plots_dir: &Path, name: &str) -> PathBuf {
    plots_dir.join(format!("{}.{}", name, IMAGE_EXTENSION))
}

/// One drawn line.
#[derive(Debug, Clone, PartialEq)]
pub struct Trace {
    pub label: String,
    pub style: TraceStyle,
    /// Points already expanded for the style; the canvas joins them with
    /// straight segments.
    pub points: Vec<(f64, f64)>,
}

impl Trace {
    pub fn new(label: impl Into<String>, style: TraceStyle, xs: &[f64], ys: &[f64]) -> Self {
        let points = match style {
            TraceStyle::Linear => linear_points(xs, ys),
            TraceStyle::Step => step_points(xs, ys),
        };
        Self {
            label: label.into(),
            style,
            points,
        }
    }
}

/// One set of axes.
#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
    pub title: Option<String>,
    pub traces: Vec<Trace>,
    pub y_range: (f64, f64),
    pub x_desc: Option<String>,
    pub y_desc: Option<String>,
    pub zero_line: bool,
    pub legend: bool,
    /// Palette index of the first trace; later traces follow on from it
    pub color_index: usize,
}

/// A figure made of vertically stacked panels sharing one x range.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesFigure {
    pub caption: String,
    pub x_range: (f64, f64),
    pub panels: Vec<Panel>,
}

/// A rows x cols grid of panels sharing both ranges. `None` cells are blank.
#[derive(Debug, Clone, PartialEq)]
pub struct MatrixFigure {
    pub caption: String,
    pub rows: usize,
    pub cols: usize,
    pub x_range: (f64, f64),
    pub y_range: (f64, f64),
    /// Row-major, `rows * cols` entries
    pub cells: Vec<Option<Panel>>,
}

impl MatrixFigure {
    pub fn cell(&self, row: usize, col: usize) -> Option<&Panel> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        self.cells.get(row * self.cols + col)?.as_ref()
    }
}

/// A time-frequency magnitude image.
#[derive(Debug, Clone, PartialEq)]
pub struct SpectrogramFigure {
    pub caption: String,
    /// Window center times in seconds, one per column
    pub times: Vec<f64>,
    /// Bin center frequencies in Hz, one per row
    pub frequencies: Vec<f64>,
    /// dB magnitudes, `[time_idx * frequencies.len() + freq_idx]`
    pub magnitudes_db: Vec<f64>,
    pub time_range: (f64, f64),
    pub freq_range: (f64, f64),
    pub db_range: (f64, f64),
}

/// A position path on the unit square.
#[derive(Debug, Clone, PartialEq)]
pub struct TrajectoryFigure {
    pub caption: String,
    pub x_desc: String,
    pub y_desc: String,
    pub points: Vec<(f64, f64)>,
}

/// Join samples with straight segments, dropping non-finite samples.
pub fn linear_points(xs: &[f64], ys: &[f64]) -> Vec<(f64, f64)> {
    xs.iter()
        .zip(ys.iter())
        .filter(|(x, y)| x.is_finite() && y.is_finite())
        .map(|(&x, &y)| (x, y))
        .collect()
}

/// Expand samples into a right-continuous step function.
///
/// For samples `(t0, v0), (t1, v1)` the path is `(t0, v0) -> (t1, v0) ->
/// (t1, v1)`: the value is held until the next sample time and only then
/// jumps, so no point between `t0` and `t1` is an interpolation of `v0` and
/// `v1`.
pub fn step_points(xs: &[f64], ys: &[f64]) -> Vec<(f64, f64)> {
    let samples = linear_points(xs, ys);
    let mut points = Vec::with_capacity(samples.len() * 2);
    for (i, &(x, y)) in samples.iter().enumerate() {
        if i > 0 {
            let (_, prev_y) = samples[i - 1];
            points.push((x, prev_y));
        }
        points.push((x, y));
    }
    points
}

/// Value of a drawn path at `x`, following its segments. Used to check what
/// a trace shows between samples.
pub fn value_at(points: &[(f64, f64)], x: f64) -> Option<f64> {
    points.windows(2).find_map(|w| {
        let (x0, y0) = w[0];
        let (x1, y1) = w[1];
        if x < x0 || x > x1 {
            return None;
        }
        if x1 == x0 {
            return Some(y1);
        }
        Some(y0 + (y1 - y0) * (x - x0) / (x1 - x0))
    })
}

/// Min/max of the finite values, or `None` if there are none.
pub fn finite_bounds<'a, I>(values: I) -> Option<(f64, f64)>
where
    I: IntoIterator<Item = &'a f64>,
{
    values
        .into_iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

/// Axis range for the given bounds, widened when degenerate.
pub fn axis_range(bounds: Option<(f64, f64)>) -> (f64, f64) {
    match bounds {
        Some((lo, hi)) if hi > lo => (lo, hi),
        Some((v, _)) => (v - 0.5, v + 0.5),
        None => (0.0, 1.0),
    }
}

/// Y range for an overlay chart: the fixed amplitude window when everything
/// fits inside it, otherwise the window grown to the padded data range.
pub fn overlay_y_range(bounds: Option<(f64, f64)>) -> (f64, f64) {
    let (lo, hi) = AMPLITUDE_RANGE;
    match bounds {
        Some((min, max)) if min >= lo && max <= hi => AMPLITUDE_RANGE,
        Some((min, max)) => {
            let pad = ((max - min) * 0.05).max(0.05);
            ((min - pad).min(lo), (max + pad).max(hi))
        }
        None => AMPLITUDE_RANGE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==========================================================================
    // STEP EXPANSION TESTS
    // ==========================================================================
    //
    // A step trace holds each value until the next sample:
    //
    //   v1         +------
    //              |
    //   v0  -------+
    //       t0     t1
    // ==========================================================================

    #[test]
    fn test_step_points_hold_previous_value() {
        let points = step_points(&[0.0, 1.0], &[0.0, 1.0]);
        assert_eq!(points, vec![(0.0, 0.0), (1.0, 0.0), (1.0, 1.0)]);
    }

    #[test]
    fn test_step_value_between_samples_is_left_value() {
        let points = step_points(&[0.0, 1.0, 2.0], &[0.25, -0.75, 1.0]);
        for x in [0.0, 0.1, 0.5, 0.99] {
            assert_eq!(value_at(&points, x), Some(0.25), "at x={}", x);
        }
        for x in [1.01, 1.5, 1.99] {
            assert_eq!(value_at(&points, x), Some(-0.75), "at x={}", x);
        }
    }

    #[test]
    fn test_linear_value_between_samples_interpolates() {
        let points = linear_points(&[0.0, 1.0], &[0.0, 1.0]);
        let mid = value_at(&points, 0.5).unwrap();
        assert!((mid - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_points_skip_non_finite_samples() {
        let xs = [0.0, 1.0, 2.0];
        let ys = [0.0, f64::NAN, 1.0];
        assert_eq!(linear_points(&xs, &ys), vec![(0.0, 0.0), (2.0, 1.0)]);
        assert_eq!(step_points(&xs, &ys), vec![(0.0, 0.0), (2.0, 0.0), (2.0, 1.0)]);
    }

    #[test]
    fn test_trace_new_dispatches_on_style() {
        let xs = [0.0, 1.0];
        let ys = [1.0, 0.0];
        assert_eq!(Trace::new("a", TraceStyle::Linear, &xs, &ys).points.len(), 2);
        assert_eq!(Trace::new("a", TraceStyle::Step, &xs, &ys).points.len(), 3);
    }

    // ==========================================================================
    // RANGE TESTS
    // ==========================================================================

    #[test]
    fn test_finite_bounds() {
        let values = [0.5, f64::NAN, -2.0, f64::INFINITY, 3.0];
        assert_eq!(finite_bounds(&values), Some((-2.0, 3.0)));
        assert_eq!(finite_bounds(&[f64::NAN]), None);
    }

    #[test]
    fn test_axis_range_degenerate() {
        assert_eq!(axis_range(Some((2.0, 2.0))), (1.5, 2.5));
        assert_eq!(axis_range(None), (0.0, 1.0));
        assert_eq!(axis_range(Some((0.0, 4.0))), (0.0, 4.0));
    }

    #[test]
    fn test_overlay_y_range_fixed_when_data_fits() {
        assert_eq!(overlay_y_range(Some((-1.0, 1.0))), AMPLITUDE_RANGE);
        assert_eq!(overlay_y_range(Some((0.0, 0.0))), AMPLITUDE_RANGE);
        assert_eq!(overlay_y_range(None), AMPLITUDE_RANGE);
    }

    #[test]
    fn test_overlay_y_range_grows_for_large_data() {
        let (lo, hi) = overlay_y_range(Some((0.0, 2.0)));
        assert_eq!(lo, -1.1);
        assert!(hi > 2.0);
    }

    #[test]
    fn test_matrix_cell_lookup() {
        let panel = Panel {
            title: None,
            traces: vec![],
            y_range: AMPLITUDE_RANGE,
            x_desc: None,
            y_desc: None,
            zero_line: false,
            legend: false,
            color_index: 0,
        };
        let figure = MatrixFigure {
            caption: String::new(),
            rows: 2,
            cols: 2,
            x_range: (0.0, 1.0),
            y_range: AMPLITUDE_RANGE,
            cells: vec![Some(panel.clone()), None, None, Some(panel)],
        };
        assert!(figure.cell(0, 0).is_some());
        assert!(figure.cell(0, 1).is_none());
        assert!(figure.cell(1, 1).is_some());
        assert!(figure.cell(2, 0).is_none());
    }

    #[test]
    fn test_image_path() {
        assert_eq!(
            image_path(Path::new("tests/plots"), "gate_pattern_spec"),
            PathBuf::from("tests/plots/gate_pattern_spec.png")
        );
    }
}
