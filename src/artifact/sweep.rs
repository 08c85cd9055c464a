//! Parameter-sweep families
//!
//! The harness writes one table per point of a two-dimensional sweep, named
//! `<prefix>_<type>_<param>` (for example `width_Sine_25`). This module turns
//! that sparse set of files into a dense grid: rows are the sorted distinct
//! types, columns the sorted distinct integer parameters, and each cell
//! either holds the artifact for that pair or is absent.

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use super::base_name;

/// Naming and labelling of one sweep family.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SweepFamily {
    /// First token of every member's base name
    pub prefix: String,
    /// Figure caption and report section heading
    pub title: String,
    /// Logical name of the composite figure
    pub output_name: String,
    /// Label used in cell titles, e.g. `Width` -> "Sine Width=25%"
    pub param_label: String,
}

impl Default for SweepFamily {
    fn default() -> Self {
        Self {
            prefix: "width".to_string(),
            title: "Width Parameter Matrix".to_string(),
            output_name: "width_matrix".to_string(),
            param_label: "Width".to_string(),
        }
    }
}

impl SweepFamily {
    /// Parse a base name into `(type, param)` if it belongs to this family.
    ///
    /// Exactly three `_`-separated tokens are required and the last must be a
    /// base-10 integer; anything else is not a member.
    pub fn parse_member(&self, base_name: &str) -> Option<(String, i64)> {
        let parts: Vec<&str> = base_name.split('_').collect();
        if parts.len() != 3 || parts[0] != self.prefix || parts[1].is_empty() {
            return None;
        }
        let param = parts[2].parse::<i64>().ok()?;
        Some((parts[1].to_string(), param))
    }

    pub fn cell_title(&self, kind: &str, param: i64) -> String {
        format!("{} {}={}%", kind, self.param_label, param)
    }
}

/// Dense view over a sparse set of sweep members.
#[derive(Debug, Clone, Default)]
pub struct SweepGrid {
    kinds: Vec<String>,
    params: Vec<i64>,
    cells: BTreeMap<(String, i64), PathBuf>,
}

impl SweepGrid {
    /// Collect the members of `family` from a list of table paths.
    ///
    /// Non-members are ignored. If two paths map to the same cell the
    /// lexicographically first one wins, so the grid does not depend on
    /// discovery order.
    pub fn collect(family: &SweepFamily, paths: &[PathBuf]) -> Self {
        let mut sorted: Vec<&PathBuf> = paths.iter().collect();
        sorted.sort();

        let mut cells = BTreeMap::new();
        for path in sorted {
            let Some(name) = base_name(path) else {
                continue;
            };
            if let Some(key) = family.parse_member(&name) {
                cells.entry(key).or_insert_with(|| path.clone());
            }
        }
        Self::from_cells(cells)
    }

    /// Build a grid from `(type, param) -> path` pairs.
    pub fn from_cells(cells: BTreeMap<(String, i64), PathBuf>) -> Self {
        let kinds: BTreeSet<String> = cells.keys().map(|(k, _)| k.clone()).collect();
        let params: BTreeSet<i64> = cells.keys().map(|(_, p)| *p).collect();
        Self {
            kinds: kinds.into_iter().collect(),
            params: params.into_iter().collect(),
            cells,
        }
    }

    /// Row axis: sorted distinct types
    pub fn kinds(&self) -> &[String] {
        &self.kinds
    }

    /// Column axis: sorted distinct parameters
    pub fn params(&self) -> &[i64] {
        &self.params
    }

    pub fn rows(&self) -> usize {
        self.kinds.len()
    }

    pub fn cols(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// The artifact at `(row, col)`, or `None` for a blank cell or an
    /// out-of-range index.
    pub fn cell(&self, row: usize, col: usize) -> Option<&Path> {
        let kind = self.kinds.get(row)?;
        let param = *self.params.get(col)?;
        self.cells.get(&(kind.clone(), param)).map(PathBuf::as_path)
    }

    /// Whether `path` was consumed by this grid.
    pub fn contains(&self, path: &Path) -> bool {
        self.cells.values().any(|p| p == path)
    }

    /// Number of present cells
    pub fn member_count(&self) -> usize {
        self.cells.len()
    }
}
