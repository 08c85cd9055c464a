//! Sweep matrix: one composite figure for a whole parameter-sweep family

use super::{axis_range, Canvas, MatrixFigure, Panel, RenderedFigure, Trace, AMPLITUDE_RANGE};
use crate::artifact::{SweepFamily, SweepGrid, Table, TraceStyle};
use crate::error::Result;
use std::path::Path;
use tracing::{info, warn};

/// Independent column of every sweep member
pub const TIME_COLUMN: &str = "Time";

/// Dependent column of every sweep member
pub const VALUE_COLUMN: &str = "Value";

/// Lay out the grid. Cells whose table cannot be read or lacks the expected
/// columns are left blank.
///
/// The time description goes on the lowest present cell of each column, so a
/// blank bottom cell does not leave its column unlabelled.
pub fn layout(family: &SweepFamily, grid: &SweepGrid) -> MatrixFigure {
    let rows = grid.rows();
    let cols = grid.cols();
    let mut cells = Vec::with_capacity(rows * cols);
    let mut x_bounds: Option<(f64, f64)> = None;

    for row in 0..rows {
        for col in 0..cols {
            let Some(path) = grid.cell(row, col) else {
                cells.push(None);
                continue;
            };

            let kind = &grid.kinds()[row];
            let param = grid.params()[col];
            match load_cell(path) {
                Ok(trace) => {
                    if let Some((lo, hi)) = super::finite_bounds(trace.points.iter().map(|(x, _)| x)) {
                        x_bounds = Some(match x_bounds {
                            None => (lo, hi),
                            Some((a, b)) => (a.min(lo), b.max(hi)),
                        });
                    }
                    cells.push(Some(Panel {
                        title: Some(family.cell_title(kind, param)),
                        traces: vec![trace],
                        y_range: AMPLITUDE_RANGE,
                        x_desc: None,
                        y_desc: (col == 0).then(|| VALUE_COLUMN.to_string()),
                        zero_line: false,
                        legend: false,
                        color_index: 0,
                    }));
                }
                Err(e) => {
                    warn!(
                        artifact = %path.display(),
                        reason = %e,
                        "sweep cell left blank"
                    );
                    cells.push(None);
                }
            }
        }
    }

    for col in 0..cols {
        let lowest = (0..rows)
            .rev()
            .map(|row| row * cols + col)
            .find(|&idx| cells[idx].is_some());
        if let Some(Some(panel)) = lowest.map(|idx| &mut cells[idx]) {
            panel.x_desc = Some(TIME_COLUMN.to_string());
        }
    }

    MatrixFigure {
        caption: family.title.clone(),
        rows,
        cols,
        x_range: axis_range(x_bounds),
        y_range: AMPLITUDE_RANGE,
        cells,
    }
}

fn load_cell(path: &Path) -> Result<Trace> {
    let table = Table::from_path(path)?;
    let xs = table.require(TIME_COLUMN)?;
    let ys = table.require(VALUE_COLUMN)?;
    Ok(Trace::new(VALUE_COLUMN, TraceStyle::Linear, xs, ys))
}

/// Draw the matrix for `grid`, or return `Ok(None)` when the family has no
/// members.
pub fn render(
    canvas: &mut dyn Canvas,
    family: &SweepFamily,
    grid: &SweepGrid,
    plots_dir: &Path,
) -> Result<Option<RenderedFigure>> {
    if grid.is_empty() {
        return Ok(None);
    }

    let figure = layout(family, grid);
    let rendered = RenderedFigure::new(plots_dir, family.output_name.as_str());
    canvas.draw_matrix(&figure, &rendered.path)?;
    info!(
        path = %rendered.path.display(),
        rows = figure.rows,
        cols = figure.cols,
        "generated matrix plot"
    );
    Ok(Some(rendered))
}
