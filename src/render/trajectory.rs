//! Panner trajectories: the path traced by a 2-D pan position over time

use super::{linear_points, Canvas, RenderedFigure, TrajectoryFigure};
use crate::artifact::Table;
use crate::error::Result;
use std::path::Path;
use tracing::info;

pub const PAN_X_COLUMN: &str = "PanX";
pub const PAN_Y_COLUMN: &str = "PanY";

/// Suffix appended to the table's base name for the trajectory image
pub const TRAJECTORY_SUFFIX: &str = "_trajectory";

/// Whether the table carries both position columns.
pub fn has_trajectory(table: &Table) -> bool {
    table.has_column(PAN_X_COLUMN) && table.has_column(PAN_Y_COLUMN)
}

/// PanY against PanX, or `None` when the table has no position columns or
/// no finite samples.
pub fn layout(base_name: &str, table: &Table) -> Option<TrajectoryFigure> {
    let xs = table.column(PAN_X_COLUMN)?;
    let ys = table.column(PAN_Y_COLUMN)?;
    let points = linear_points(xs, ys);
    if points.is_empty() {
        return None;
    }

    Some(TrajectoryFigure {
        caption: format!("Panner Trajectory: {}", base_name),
        x_desc: "Pan X".to_string(),
        y_desc: "Pan Y".to_string(),
        points,
    })
}

/// Draw `<plots_dir>/<base>_trajectory.png` if the table has a trajectory.
pub fn render(
    canvas: &mut dyn Canvas,
    table: &Table,
    base_name: &str,
    plots_dir: &Path,
) -> Result<Option<RenderedFigure>> {
    let Some(figure) = layout(base_name, table) else {
        return Ok(None);
    };

    let rendered = RenderedFigure::new(plots_dir, format!("{}{}", base_name, TRAJECTORY_SUFFIX));
    canvas.draw_trajectory(&figure, &rendered.path)?;
    info!(path = %rendered.path.display(), points = figure.points.len(), "generated trajectory");
    Ok(Some(rendered))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(csv: &str) -> Table {
        Table::from_reader(csv.as_bytes()).unwrap()
    }

    #[test]
    fn test_has_trajectory_needs_both_columns() {
        assert!(has_trajectory(&table("Time,PanX,PanY\n0,0.5,0.5\n")));
        assert!(!has_trajectory(&table("Time,PanX\n0,0.5\n")));
        assert!(!has_trajectory(&table("Time,FL,FR\n0,1,0\n")));
    }

    #[test]
    fn test_layout_circular_sweep() {
        let t = table("Time,FL,FR,BL,BR,PanX,PanY\n0,0,0,0,0,1.0,0.5\n1,0,0,0,0,0.5,1.0\n2,0,0,0,0,0.0,0.5\n");
        let figure = layout("quad_panner_sweep", &t).unwrap();

        assert_eq!(figure.caption, "Panner Trajectory: quad_panner_sweep");
        assert_eq!(figure.x_desc, "Pan X");
        assert_eq!(figure.y_desc, "Pan Y");
        assert_eq!(figure.points, vec![(1.0, 0.5), (0.5, 1.0), (0.0, 0.5)]);
    }

    #[test]
    fn test_layout_skips_unparsable_positions() {
        let t = table("PanX,PanY\n0.1,0.2\n,0.3\n0.4,0.5\n");
        let figure = layout("cleat", &t).unwrap();
        assert_eq!(figure.points, vec![(0.1, 0.2), (0.4, 0.5)]);
    }

    #[test]
    fn test_layout_without_positions() {
        assert!(layout("gate_pattern", &table("Step,Value\n0,1\n")).is_none());
        assert!(layout("empty", &table("PanX,PanY\n")).is_none());
    }
}
