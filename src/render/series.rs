//! Time-series figures for individual artifacts

use super::{
    axis_range, finite_bounds, overlay_y_range, Canvas, Panel, RenderedFigure, SeriesFigure,
    Trace, AMPLITUDE_RANGE,
};
use crate::artifact::classify::{dependent_columns, select_x_axis_with};
use crate::artifact::{Classification, Layout, Table};
use crate::error::{ReportError, Result};
use std::path::Path;
use tracing::debug;

/// Dependent columns that get their own panel, in file order.
///
/// Returns one entry per panel: a stacked layout with at least two dependent
/// columns yields one single-column panel per column, anything else a single
/// panel holding every column.
pub fn panel_columns<'a>(
    columns: &'a [String],
    x_axis: &str,
    classification: &Classification,
) -> Vec<Vec<&'a str>> {
    let dependents = dependent_columns(columns, x_axis);
    if classification.layout == Layout::Stacked && dependents.len() > 1 {
        dependents.into_iter().map(|c| vec![c]).collect()
    } else {
        vec![dependents]
    }
}

/// Lay out the figure for one table.
pub fn layout(base_name: &str, table: &Table, classification: &Classification) -> Result<SeriesFigure> {
    let x_axis = select_x_axis_with(classification.x_axis_priority, table.columns())
        .ok_or_else(|| ReportError::Empty("table has no columns".to_string()))?;
    if table.is_empty() {
        return Err(ReportError::Empty("table has no rows".to_string()));
    }

    let xs = table.require(&x_axis.column)?;
    let groups = panel_columns(table.columns(), &x_axis.column, classification);
    if groups.iter().all(|g| g.is_empty()) {
        return Err(ReportError::Empty(format!(
            "no dependent columns besides '{}'",
            x_axis.column
        )));
    }

    let x_range = axis_range(finite_bounds(xs));
    let stacked = groups.len() > 1;
    let last = groups.len() - 1;

    let mut panels = Vec::with_capacity(groups.len());
    for (i, group) in groups.iter().enumerate() {
        let mut traces = Vec::with_capacity(group.len());
        for column in group {
            let ys = table.require(column)?;
            traces.push(Trace::new(*column, classification.trace, xs, ys));
        }

        let panel = if stacked {
            Panel {
                title: Some(group[0].to_string()),
                traces,
                y_range: AMPLITUDE_RANGE,
                x_desc: (i == last).then(|| x_axis.label.clone()),
                y_desc: Some(group[0].to_string()),
                zero_line: true,
                legend: false,
                color_index: i,
            }
        } else {
            let y_bounds = finite_bounds(group.iter().filter_map(|c| table.column(c)).flatten());
            Panel {
                title: None,
                traces,
                y_range: overlay_y_range(y_bounds),
                x_desc: Some(x_axis.label.clone()),
                y_desc: Some("Amplitude".to_string()),
                zero_line: true,
                legend: true,
                color_index: 0,
            }
        };
        panels.push(panel);
    }

    debug!(
        artifact = base_name,
        x_axis = %x_axis.column,
        panels = panels.len(),
        layout = ?classification.layout,
        trace = ?classification.trace,
        "laid out series figure"
    );

    Ok(SeriesFigure {
        caption: format!("LFO Test: {}", base_name),
        x_range,
        panels,
    })
}

/// Lay out a loaded table and draw it to `<plots_dir>/<base>.png`.
pub fn render(
    canvas: &mut dyn Canvas,
    table: &Table,
    base_name: &str,
    classification: &Classification,
    plots_dir: &Path,
) -> Result<RenderedFigure> {
    let figure = layout(base_name, table, classification)?;
    let rendered = RenderedFigure::new(plots_dir, base_name);
    canvas.draw_series(&figure, &rendered.path)?;
    Ok(rendered)
}
