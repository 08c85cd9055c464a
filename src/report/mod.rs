//! Report assembly
//!
//! [`generate`] runs the whole pipeline once, in a fixed order:
//!
//! 1. create the image and document directories
//! 2. draw the sweep matrix, if the input has any sweep members
//! 3. discover the remaining table artifacts
//! 4. render each artifact in file-name order (series plot, then the
//!    optional trajectory, spectrogram and audio reference)
//! 5. write `index.html` and `manifest.json`
//!
//! A failure inside step 4 only costs that artifact: it is logged and kept
//! as an [`ArtifactOutcome::Skipped`]. Failures in steps 1 and 5 end the run.
//!
//! Output formats:
//!
//! - **HTML**: the browsable report ([`html`])
//! - **JSON**: a manifest of every outcome ([`json`])

pub mod html;
pub mod json;

use crate::artifact::{self, classify, SweepGrid, Table};
use crate::config::ReportConfig;
use crate::error::{ReportError, Result};
use crate::render::{matrix, series, spectrogram, trajectory, Canvas};
use indicatif::ProgressBar;
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Document title and page heading
pub const REPORT_TITLE: &str = "LFO DSP Test Report";

/// One artifact's block in the report. All references are relative to the
/// document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section {
    pub name: String,
    pub plot: String,
    pub spectrogram: Option<String>,
    pub trajectory: Option<String>,
    pub audio: Option<String>,
}

impl Section {
    pub fn new(name: impl Into<String>, plot: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            plot: plot.into(),
            spectrogram: None,
            trajectory: None,
            audio: None,
        }
    }
}

/// What happened to one table artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ArtifactOutcome {
    Rendered(Section),
    Skipped { name: String, reason: String },
}

impl ArtifactOutcome {
    pub fn name(&self) -> &str {
        match self {
            ArtifactOutcome::Rendered(section) => &section.name,
            ArtifactOutcome::Skipped { name, .. } => name,
        }
    }

    pub fn section(&self) -> Option<&Section> {
        match self {
            ArtifactOutcome::Rendered(section) => Some(section),
            ArtifactOutcome::Skipped { .. } => None,
        }
    }

    pub fn is_rendered(&self) -> bool {
        matches!(self, ArtifactOutcome::Rendered(_))
    }
}

/// The full-width sweep section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatrixSection {
    pub title: String,
    pub image: String,
    /// Number of sweep artifacts drawn into the matrix
    pub members: usize,
}

/// Counts shown in the document header and printed by the CLI
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub total: usize,
    pub rendered: usize,
    pub skipped: usize,
    pub spectrograms: usize,
    pub audio: usize,
}

impl Summary {
    pub fn from_outcomes(outcomes: &[ArtifactOutcome]) -> Self {
        let mut summary = Self {
            total: outcomes.len(),
            ..Self::default()
        };

        for outcome in outcomes {
            match outcome {
                ArtifactOutcome::Rendered(section) => {
                    summary.rendered += 1;
                    if section.spectrogram.is_some() {
                        summary.spectrograms += 1;
                    }
                    if section.audio.is_some() {
                        summary.audio += 1;
                    }
                }
                ArtifactOutcome::Skipped { .. } => summary.skipped += 1,
            }
        }

        summary
    }
}

/// Everything the document and manifest are written from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportDocument {
    pub title: String,
    pub summary: Summary,
    pub matrix: Option<MatrixSection>,
    pub outcomes: Vec<ArtifactOutcome>,
}

impl ReportDocument {
    pub fn new(matrix: Option<MatrixSection>, outcomes: Vec<ArtifactOutcome>) -> Self {
        Self {
            title: REPORT_TITLE.to_string(),
            summary: Summary::from_outcomes(&outcomes),
            matrix,
            outcomes,
        }
    }

    /// Rendered sections in document order
    pub fn sections(&self) -> impl Iterator<Item = &Section> {
        self.outcomes.iter().filter_map(ArtifactOutcome::section)
    }
}

/// Result of a completed run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub document: ReportDocument,
    pub document_path: PathBuf,
    pub manifest_path: PathBuf,
}

impl RunSummary {
    pub fn summary(&self) -> &Summary {
        &self.document.summary
    }

    pub fn has_matrix(&self) -> bool {
        self.document.matrix.is_some()
    }

    pub fn outcomes(&self) -> &[ArtifactOutcome] {
        &self.document.outcomes
    }
}

/// Run the pipeline without progress output.
pub fn generate(config: &ReportConfig, canvas: &mut dyn Canvas) -> Result<RunSummary> {
    generate_with_progress(config, canvas, &ProgressBar::hidden())
}

/// Run the pipeline, advancing `progress` once per table artifact.
pub fn generate_with_progress(
    config: &ReportConfig,
    canvas: &mut dyn Canvas,
    progress: &ProgressBar,
) -> Result<RunSummary> {
    fs::create_dir_all(&config.plots_dir)?;
    fs::create_dir_all(&config.report_dir)?;

    let tables = artifact::discover_tables(&config.input_dir);
    let grid = SweepGrid::collect(&config.family, &tables);
    let matrix = render_matrix(config, canvas, &grid);

    let remaining: Vec<&PathBuf> = tables.iter().filter(|p| !grid.contains(p)).collect();
    progress.set_length(remaining.len() as u64);

    let mut outcomes = Vec::with_capacity(remaining.len());
    for path in remaining {
        let name = display_name(path);
        progress.set_message(name.clone());

        let outcome = match render_artifact(config, canvas, path, &name) {
            Ok(section) => ArtifactOutcome::Rendered(section),
            Err(e) => {
                warn!(artifact = %path.display(), reason = %e, "skipping artifact");
                ArtifactOutcome::Skipped {
                    name,
                    reason: e.to_string(),
                }
            }
        };
        outcomes.push(outcome);
        progress.inc(1);
    }

    let document = ReportDocument::new(matrix, outcomes);
    let document_path = config.document_path();
    let manifest_path = config.manifest_path();

    write_file(&document_path, |w| html::write(w, &document).map_err(ReportError::from))?;
    write_file(&manifest_path, |w| json::write(w, &document))?;

    info!(
        path = %document_path.display(),
        rendered = document.summary.rendered,
        skipped = document.summary.skipped,
        matrix = document.matrix.is_some(),
        "report written"
    );

    Ok(RunSummary {
        document,
        document_path,
        manifest_path,
    })
}

fn render_matrix(config: &ReportConfig, canvas: &mut dyn Canvas, grid: &SweepGrid) -> Option<MatrixSection> {
    match matrix::render(canvas, &config.family, grid, &config.plots_dir) {
        Ok(Some(figure)) => Some(MatrixSection {
            title: config.family.title.clone(),
            image: config.href(&figure.path),
            members: grid.member_count(),
        }),
        Ok(None) => None,
        Err(e) => {
            warn!(
                matrix = %config.family.output_name,
                reason = %e,
                "skipping sweep matrix"
            );
            None
        }
    }
}

fn render_artifact(
    config: &ReportConfig,
    canvas: &mut dyn Canvas,
    path: &Path,
    name: &str,
) -> Result<Section> {
    let classification = classify(name);
    let table = Table::from_path(path)?;
    let plot = series::render(canvas, &table, name, &classification, &config.plots_dir)?;
    info!(artifact = name, path = %plot.path.display(), "generated plot");

    let mut section = Section::new(name, config.href(&plot.path));

    if trajectory::has_trajectory(&table) {
        match trajectory::render(canvas, &table, name, &config.plots_dir) {
            Ok(Some(figure)) => section.trajectory = Some(config.href(&figure.path)),
            Ok(None) => {}
            Err(e) => warn!(artifact = %path.display(), reason = %e, "trajectory not rendered"),
        }
    }

    if let Some(audio) = artifact::sibling_audio(path) {
        match spectrogram::render(canvas, &audio, name, &config.plots_dir) {
            Ok(figure) => section.spectrogram = Some(config.href(&figure.path)),
            Err(e) => warn!(artifact = %audio.display(), reason = %e, "spectrogram not rendered"),
        }
        section.audio = Some(config.href(&audio));
    }

    Ok(section)
}

fn display_name(path: &Path) -> String {
    artifact::base_name(path).unwrap_or_else(|| path.display().to_string())
}

fn write_file<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut BufWriter<File>) -> Result<()>,
{
    let mut writer = BufWriter::new(File::create(path)?);
    write(&mut writer)?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rendered(name: &str, spectrogram: bool, audio: bool) -> ArtifactOutcome {
        let mut section = Section::new(name, format!("../plots/{}.png", name));
        if spectrogram {
            section.spectrogram = Some(format!("../plots/{}_spec.png", name));
        }
        if audio {
            section.audio = Some(format!("../output/{}.wav", name));
        }
        ArtifactOutcome::Rendered(section)
    }

    fn skipped(name: &str) -> ArtifactOutcome {
        ArtifactOutcome::Skipped {
            name: name.to_string(),
            reason: "malformed table".to_string(),
        }
    }

    // ==========================================================================
    // SUMMARY STATISTICS TESTS
    // ==========================================================================
    //
    // The Summary struct aggregates outcome counts for one run. It is shown
    // at the top of the document and printed by the CLI.
    // ==========================================================================

    #[test]
    fn test_summary_empty() {
        let summary = Summary::from_outcomes(&[]);
        assert_eq!(summary, Summary::default());
    }

    #[test]
    fn test_summary_mixed() {
        let outcomes = vec![
            rendered("basic_waveform", true, true),
            rendered("gate_pattern", false, false),
            rendered("broken_audio", false, true),
            skipped("garbage"),
        ];
        let summary = Summary::from_outcomes(&outcomes);

        assert_eq!(summary.total, 4);
        assert_eq!(summary.rendered, 3);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.spectrograms, 1);
        assert_eq!(summary.audio, 2);
    }

    #[test]
    fn test_summary_all_skipped() {
        let summary = Summary::from_outcomes(&[skipped("a"), skipped("b")]);
        assert_eq!(summary.total, 2);
        assert_eq!(summary.rendered, 0);
        assert_eq!(summary.skipped, 2);
    }

    // ==========================================================================
    // OUTCOME TESTS
    // ==========================================================================

    #[test]
    fn test_outcome_accessors() {
        let ok = rendered("gate_pattern", false, false);
        let bad = skipped("garbage");

        assert_eq!(ok.name(), "gate_pattern");
        assert_eq!(bad.name(), "garbage");
        assert!(ok.is_rendered());
        assert!(!bad.is_rendered());
        assert!(ok.section().is_some());
        assert!(bad.section().is_none());
    }

    #[test]
    fn test_document_sections_skip_failures_in_order() {
        let document = ReportDocument::new(
            None,
            vec![rendered("a", false, false), skipped("b"), rendered("c", false, false)],
        );
        let names: Vec<_> = document.sections().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["a", "c"]);
        assert_eq!(document.title, REPORT_TITLE);
        assert_eq!(document.summary.skipped, 1);
    }

    #[test]
    fn test_outcome_serializes_with_status_tag() {
        let value = serde_json::to_value(skipped("garbage")).unwrap();
        assert_eq!(value["status"], "skipped");
        assert_eq!(value["name"], "garbage");
        assert_eq!(value["reason"], "malformed table");

        let value = serde_json::to_value(rendered("tone", true, true)).unwrap();
        assert_eq!(value["status"], "rendered");
        assert_eq!(value["plot"], "../plots/tone.png");
        assert_eq!(value["audio"], "../output/tone.wav");
    }
}
