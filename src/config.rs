//! Run configuration: where artifacts are read from and where output goes

use crate::artifact::SweepFamily;
use std::path::{Component, Path, PathBuf};

/// Default artifact directory, relative to the working directory
pub const DEFAULT_INPUT_DIR: &str = "tests/output";
/// Default image directory
pub const DEFAULT_PLOTS_DIR: &str = "tests/plots";
/// Default document directory
pub const DEFAULT_REPORT_DIR: &str = "tests/report";

pub const DOCUMENT_FILE: &str = "index.html";
pub const MANIFEST_FILE: &str = "manifest.json";

/// Paths and the sweep family for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportConfig {
    pub input_dir: PathBuf,
    pub plots_dir: PathBuf,
    pub report_dir: PathBuf,
    pub family: SweepFamily,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from(DEFAULT_INPUT_DIR),
            plots_dir: PathBuf::from(DEFAULT_PLOTS_DIR),
            report_dir: PathBuf::from(DEFAULT_REPORT_DIR),
            family: SweepFamily::default(),
        }
    }
}

impl ReportConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// The default layout below `root` instead of the working directory.
    pub fn under<P: AsRef<Path>>(root: P) -> Self {
        let root = root.as_ref();
        Self {
            input_dir: root.join(DEFAULT_INPUT_DIR),
            plots_dir: root.join(DEFAULT_PLOTS_DIR),
            report_dir: root.join(DEFAULT_REPORT_DIR),
            family: SweepFamily::default(),
        }
    }

    pub fn with_input_dir<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.input_dir = dir.into();
        self
    }

    pub fn with_plots_dir<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.plots_dir = dir.into();
        self
    }

    pub fn with_report_dir<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.report_dir = dir.into();
        self
    }

    pub fn with_family(mut self, family: SweepFamily) -> Self {
        self.family = family;
        self
    }

    /// `<report_dir>/index.html`
    pub fn document_path(&self) -> PathBuf {
        self.report_dir.join(DOCUMENT_FILE)
    }

    /// `<report_dir>/manifest.json`
    pub fn manifest_path(&self) -> PathBuf {
        self.report_dir.join(MANIFEST_FILE)
    }

    /// Reference to `target` as written in the document.
    pub fn href(&self, target: &Path) -> String {
        relative_href(&self.report_dir, target)
    }
}

/// Relative URL from directory `from_dir` to `target`, `/`-separated.
///
/// When only one of the two paths is absolute, both are resolved against
/// the working directory first.
pub fn relative_href(from_dir: &Path, target: &Path) -> String {
    let (from, to) = if from_dir.is_absolute() == target.is_absolute() {
        (from_dir.to_path_buf(), target.to_path_buf())
    } else {
        let cwd = std::env::current_dir().unwrap_or_default();
        (cwd.join(from_dir), cwd.join(target))
    };

    let from = normalize(&from);
    let to = normalize(&to);
    let common = from
        .iter()
        .zip(to.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut parts: Vec<String> = vec!["..".to_string(); from.len() - common];
    parts.extend(to[common..].iter().cloned());
    parts.join("/")
}

/// Lexical path components with `.` dropped and `..` folded where possible.
fn normalize(path: &Path) -> Vec<String> {
    let mut parts: Vec<String> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let foldable = parts.last().is_some_and(|last| last != ".." && last != "/");
                if foldable {
                    parts.pop();
                } else {
                    parts.push("..".to_string());
                }
            }
            Component::RootDir => parts.push("/".to_string()),
            Component::Prefix(p) => parts.push(p.as_os_str().to_string_lossy().into_owned()),
            Component::Normal(s) => parts.push(s.to_string_lossy().into_owned()),
        }
    }
    parts
}
