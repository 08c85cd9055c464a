//! Artifact discovery

use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Extension of table artifacts
pub const TABLE_EXTENSION: &str = "csv";

/// Extension of audio artifacts
pub const AUDIO_EXTENSION: &str = "wav";

/// File name without directory or extension.
pub fn base_name(path: &Path) -> Option<String> {
    path.file_stem()
        .and_then(|s| s.to_str())
        .map(str::to_string)
}

/// All table artifacts directly inside `dir`, sorted by file name.
///
/// A missing or unreadable directory yields an empty list (the run then
/// produces an empty report); subdirectories are not descended into.
pub fn discover_tables(dir: &Path) -> Vec<PathBuf> {
    if !dir.is_dir() {
        warn!(dir = %dir.display(), "artifact directory not found");
        return Vec::new();
    }

    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| has_extension(e.path(), TABLE_EXTENSION))
        .map(|e| e.path().to_path_buf())
        .collect();

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    debug!(count = files.len(), dir = %dir.display(), "discovered tables");
    files
}

/// The audio file sharing `table`'s base name, if one exists next to it.
pub fn sibling_audio(table: &Path) -> Option<PathBuf> {
    let audio = table.with_extension(AUDIO_EXTENSION);
    audio.is_file().then_some(audio)
}

fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case(ext))
        .unwrap_or(false)
}
