//! PNG canvas backed by `plotters`' bitmap backend

use super::{Canvas, MatrixFigure, Panel, SeriesFigure, SpectrogramFigure, TrajectoryFigure};
use crate::error::{ReportError, Result};
use plotters::coord::Shift;
use plotters::prelude::*;
use std::error::Error;
use std::path::Path;

type Area<'a> = DrawingArea<BitMapBackend<'a>, Shift>;

const OVERLAY_SIZE: (u32, u32) = (1200, 600);
const STACKED_PANEL_HEIGHT: u32 = 280;
const MATRIX_SIZE: (u32, u32) = (1500, 1000);
const SPECTROGRAM_SIZE: (u32, u32) = (1200, 600);
const COLORBAR_WIDTH: u32 = 130;
const TRAJECTORY_SIZE: (u32, u32) = (800, 800);

/// Inferno colormap control points, evenly spaced over [0, 1]
const INFERNO: [(u8, u8, u8); 8] = [
    (0, 0, 4),
    (40, 11, 84),
    (101, 21, 110),
    (159, 42, 99),
    (212, 72, 66),
    (245, 125, 21),
    (250, 193, 39),
    (252, 255, 164),
];

/// Writes figures as PNG files.
#[derive(Debug, Default, Clone, Copy)]
pub struct BitmapCanvas;

impl BitmapCanvas {
    pub fn new() -> Self {
        Self
    }
}

impl Canvas for BitmapCanvas {
    fn draw_series(&mut self, figure: &SeriesFigure, out: &Path) -> Result<()> {
        draw_series_png(figure, out).map_err(|e| image_error(out, e))
    }

    fn draw_matrix(&mut self, figure: &MatrixFigure, out: &Path) -> Result<()> {
        draw_matrix_png(figure, out).map_err(|e| image_error(out, e))
    }

    fn draw_spectrogram(&mut self, figure: &SpectrogramFigure, out: &Path) -> Result<()> {
        draw_spectrogram_png(figure, out).map_err(|e| image_error(out, e))
    }

    fn draw_trajectory(&mut self, figure: &TrajectoryFigure, out: &Path) -> Result<()> {
        draw_trajectory_png(figure, out).map_err(|e| image_error(out, e))
    }
}

fn image_error(out: &Path, e: Box<dyn Error>) -> ReportError {
    ReportError::Image(format!("{}: {}", out.display(), e))
}

fn draw_series_png(figure: &SeriesFigure, out: &Path) -> std::result::Result<(), Box<dyn Error>> {
    let size = if figure.panels.len() > 1 {
        (OVERLAY_SIZE.0, STACKED_PANEL_HEIGHT * figure.panels.len() as u32 + 60)
    } else {
        OVERLAY_SIZE
    };

    let root = BitMapBackend::new(out, size).into_drawing_area();
    root.fill(&WHITE)?;
    let body = root.titled(&figure.caption, ("sans-serif", 24))?;

    let areas = body.split_evenly((figure.panels.len().max(1), 1));
    for (area, panel) in areas.iter().zip(figure.panels.iter()) {
        draw_panel(area, panel, figure.x_range)?;
    }

    root.present()?;
    Ok(())
}

fn draw_matrix_png(figure: &MatrixFigure, out: &Path) -> std::result::Result<(), Box<dyn Error>> {
    let root = BitMapBackend::new(out, MATRIX_SIZE).into_drawing_area();
    root.fill(&WHITE)?;
    let body = root.titled(&figure.caption, ("sans-serif", 24))?;

    let areas = body.split_evenly((figure.rows.max(1), figure.cols.max(1)));
    for (idx, area) in areas.iter().enumerate() {
        if let Some(Some(panel)) = figure.cells.get(idx) {
            let panel = Panel {
                y_range: figure.y_range,
                ..panel.clone()
            };
            draw_panel(area, &panel, figure.x_range)?;
        }
    }

    root.present()?;
    Ok(())
}

fn draw_panel(area: &Area, panel: &Panel, x_range: (f64, f64)) -> std::result::Result<(), Box<dyn Error>> {
    let (x0, x1) = x_range;
    let (y0, y1) = panel.y_range;

    let mut builder = ChartBuilder::on(area);
    builder
        .margin(8)
        .x_label_area_size(if panel.x_desc.is_some() { 40 } else { 25 })
        .y_label_area_size(if panel.y_desc.is_some() { 60 } else { 45 });
    if let Some(title) = &panel.title {
        builder.caption(title, ("sans-serif", 16));
    }
    let mut chart = builder.build_cartesian_2d(x0..x1, y0..y1)?;

    let mut mesh = chart.configure_mesh();
    mesh.light_line_style(BLACK.mix(0.05));
    match &panel.x_desc {
        Some(desc) => {
            mesh.x_desc(desc.as_str());
        }
        None => {
            mesh.x_labels(0);
        }
    }
    if let Some(desc) = &panel.y_desc {
        mesh.y_desc(desc.as_str());
    }
    mesh.draw()?;

    if panel.zero_line && y0 < 0.0 && y1 > 0.0 {
        chart.draw_series(std::iter::once(PathElement::new(
            vec![(x0, 0.0), (x1, 0.0)],
            BLACK.mix(0.4),
        )))?;
    }

    for (i, trace) in panel.traces.iter().enumerate() {
        let color = Palette99::pick(panel.color_index + i).to_rgba();
        let series = chart.draw_series(LineSeries::new(
            trace.points.iter().copied(),
            color.stroke_width(2),
        ))?;
        if panel.legend {
            series
                .label(trace.label.as_str())
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
        }
    }

    if panel.legend && !panel.traces.is_empty() {
        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()?;
    }

    Ok(())
}

fn draw_spectrogram_png(
    figure: &SpectrogramFigure,
    out: &Path,
) -> std::result::Result<(), Box<dyn Error>> {
    let root = BitMapBackend::new(out, SPECTROGRAM_SIZE).into_drawing_area();
    root.fill(&WHITE)?;
    let body = root.titled(&figure.caption, ("sans-serif", 24))?;
    let (plot_area, bar_area) = body.split_horizontally(SPECTROGRAM_SIZE.0 - COLORBAR_WIDTH);

    let (t0, t1) = figure.time_range;
    let (f0, f1) = figure.freq_range;
    let (db_lo, db_hi) = figure.db_range;

    let mut chart = ChartBuilder::on(&plot_area)
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(t0..t1, f0..f1)?;

    chart
        .configure_mesh()
        .disable_mesh()
        .x_desc("Time (s)")
        .y_desc("Frequency (Hz)")
        .draw()?;

    let num_bins = figure.frequencies.len();
    if num_bins > 0 {
        let dt = half_step(&figure.times, t1 - t0);
        let df = half_step(&figure.frequencies, f1 - f0);
        let cells = figure.times.iter().enumerate().flat_map(|(ti, &t)| {
            figure.frequencies.iter().enumerate().map(move |(fi, &f)| (ti, t, fi, f))
        });
        chart.draw_series(cells.map(|(ti, t, fi, f)| {
            let db = figure.magnitudes_db[ti * num_bins + fi];
            let color = inferno((db - db_lo) / (db_hi - db_lo));
            Rectangle::new(
                [((t - dt).max(t0), (f - df).max(f0)), ((t + dt).min(t1), (f + df).min(f1))],
                color.filled(),
            )
        }))?;
    }

    let mut bar = ChartBuilder::on(&bar_area)
        .margin(10)
        .margin_top(20)
        .x_label_area_size(40)
        .y_label_area_size(70)
        .build_cartesian_2d(0.0..1.0, db_lo..db_hi)?;

    bar.configure_mesh()
        .disable_mesh()
        .x_labels(0)
        .y_desc("dB")
        .y_label_style(("sans-serif", 12))
        .y_label_formatter(&|v| format!("{:+.0}", v))
        .draw()?;

    const BAR_STEPS: usize = 128;
    let step = (db_hi - db_lo) / BAR_STEPS as f64;
    bar.draw_series((0..BAR_STEPS).map(|i| {
        let lo = db_lo + i as f64 * step;
        Rectangle::new(
            [(0.0, lo), (1.0, lo + step)],
            inferno((i as f64 + 0.5) / BAR_STEPS as f64).filled(),
        )
    }))?;

    root.present()?;
    Ok(())
}

fn draw_trajectory_png(
    figure: &TrajectoryFigure,
    out: &Path,
) -> std::result::Result<(), Box<dyn Error>> {
    let root = BitMapBackend::new(out, TRAJECTORY_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(&figure.caption, ("sans-serif", 20))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(50)
        .build_cartesian_2d(0.0..1.0, 0.0..1.0)?;

    chart
        .configure_mesh()
        .light_line_style(BLACK.mix(0.05))
        .x_desc(figure.x_desc.as_str())
        .y_desc(figure.y_desc.as_str())
        .draw()?;

    chart.draw_series(LineSeries::new(
        figure.points.iter().copied(),
        BLUE.stroke_width(2),
    ))?;

    root.present()?;
    Ok(())
}

/// Half the spacing between consecutive centers, or half the extent when
/// there is only one.
fn half_step(centers: &[f64], extent: f64) -> f64 {
    match centers {
        [a, b, ..] => (b - a).abs() / 2.0,
        _ => extent / 2.0,
    }
}

/// Inferno colormap lookup; `t` is clamped to [0, 1].
fn inferno(t: f64) -> RGBColor {
    let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
    let scaled = t * (INFERNO.len() - 1) as f64;
    let idx = (scaled.floor() as usize).min(INFERNO.len() - 2);
    let frac = scaled - idx as f64;

    let (r0, g0, b0) = INFERNO[idx];
    let (r1, g1, b1) = INFERNO[idx + 1];
    let lerp = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * frac).round() as u8;
    RGBColor(lerp(r0, r1), lerp(g0, g1), lerp(b0, b1))
}
