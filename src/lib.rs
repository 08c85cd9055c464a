//! lfo-report - Turn LFO/panner test artifacts into a browsable report
//!
//! The DSP test harness leaves CSV tables (and sometimes WAV renders) in an
//! output directory. This crate classifies every table by its file name,
//! draws the matching plots to PNG and writes a single static HTML page that
//! shows them next to an audio player for each rendered tone.
//!
//! # Overview
//!
//! The interesting part is deciding how to draw each table:
//!
//! - **X axis**: `Time`, then `Beat`, then `Step`, else the first column
//! - **Layout**: known multi-variant tests (`clocked_mode`, `basic_waveform`,
//!   ...) get one stacked panel per column; everything else is overlaid
//! - **Trace style**: gate-like tests (`euclidean`, `square`, `gate`) are
//!   drawn as held steps instead of interpolated lines
//! - **Sweeps**: `width_<type>_<param>` tables are pulled out of the list and
//!   drawn together as one grid
//!
//! # Quick Start
//!
//! ```no_run
//! use lfo_report::{report, BitmapCanvas, ReportConfig};
//!
//! let config = ReportConfig::default().with_input_dir("tests/output");
//! let run = report::generate(&config, &mut BitmapCanvas::new())?;
//!
//! println!("{} rendered, {} skipped", run.summary().rendered, run.summary().skipped);
//! # Ok::<(), lfo_report::ReportError>(())
//! ```
//!
//! # Output Layout
//!
//! | Path | Content |
//! |------|---------|
//! | `tests/plots/<base>.png` | Series plot |
//! | `tests/plots/<base>_spec.png` | Spectrogram of `<base>.wav` |
//! | `tests/plots/<base>_trajectory.png` | PanX/PanY path |
//! | `tests/plots/width_matrix.png` | Sweep matrix |
//! | `tests/report/index.html` | The report |
//! | `tests/report/manifest.json` | Outcome manifest |
//!
//! # Modules
//!
//! - [`artifact`]: Discovery, table loading, classification and sweep grids
//! - [`render`]: Figure layout and the PNG canvas
//! - [`report`]: Pipeline orchestration and output formatters (HTML, JSON)
//! - [`config`]: Input and output locations

pub mod artifact;
pub mod config;
pub mod error;
pub mod render;
pub mod report;

pub use artifact::{classify, Classification, Layout, SweepFamily, SweepGrid, Table, TraceStyle};
pub use config::ReportConfig;
pub use error::{ReportError, Result};
pub use render::{BitmapCanvas, Canvas};
pub use report::{ArtifactOutcome, RunSummary, Section, Summary};
