use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use lfo_report::{report, ArtifactOutcome, BitmapCanvas, ReportConfig};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "lfo-report")]
#[command(author, version, about = "Render LFO/panner test artifacts into an HTML report")]
struct Args {
    /// Directory holding the harness CSV/WAV output (default: tests/output)
    input_dir: Option<PathBuf>,
}

fn main() {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let mut config = ReportConfig::default();
    if let Some(dir) = args.input_dir {
        config = config.with_input_dir(dir);
    }

    eprintln!("\x1b[1mLFO Report - Test Artifact Plotter\x1b[0m");
    eprintln!("{}", "─".repeat(70));
    eprintln!("Reading artifacts from {}\n", config.input_dir.display());

    let pb = ProgressBar::new(0);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-"),
    );

    let mut canvas = BitmapCanvas::new();
    let run = match report::generate_with_progress(&config, &mut canvas, &pb) {
        Ok(run) => run,
        Err(e) => {
            pb.finish_and_clear();
            eprintln!("\x1b[31mFailed to generate report: {}\x1b[0m", e);
            std::process::exit(1);
        }
    };
    pb.finish_and_clear();

    for outcome in run.outcomes() {
        match outcome {
            ArtifactOutcome::Rendered(section) => {
                let extras: Vec<&str> = [
                    section.trajectory.as_ref().map(|_| "trajectory"),
                    section.spectrogram.as_ref().map(|_| "spectrogram"),
                    section.audio.as_ref().map(|_| "audio"),
                ]
                .into_iter()
                .flatten()
                .collect();
                let extras = if extras.is_empty() { "-".to_string() } else { extras.join(",") };
                println!("\x1b[32m{:<10}\x1b[0m {:<40} {}", "[OK]", section.name, extras);
            }
            ArtifactOutcome::Skipped { name, reason } => {
                println!("\x1b[33m{:<10}\x1b[0m {:<40} {}", "[SKIP]", name, reason);
            }
        }
    }

    let summary = run.summary();
    eprintln!("\n{}", "─".repeat(70));
    eprintln!("\x1b[1mSummary:\x1b[0m");
    if let Some(ref matrix) = run.document.matrix {
        eprintln!("  \x1b[36m▦ Matrix:\x1b[0m    {} member(s)", matrix.members);
    }
    eprintln!("  \x1b[32m✓ Rendered:\x1b[0m  {}", summary.rendered);
    eprintln!("  \x1b[34m♪ Audio:\x1b[0m     {}", summary.audio);
    if summary.skipped > 0 {
        eprintln!("  \x1b[33m✗ Skipped:\x1b[0m   {}", summary.skipped);
    }

    eprintln!("\n\x1b[32mReport saved: {}\x1b[0m", run.document_path.display());
    eprintln!("\x1b[90mManifest: {}\x1b[0m", run.manifest_path.display());
}
