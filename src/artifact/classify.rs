//! Name-based artifact classification
//!
//! The harness encodes intent in file names: `basic_waveform_Square` wants
//! one subplot per rate and gate-style drawing, `clocked_mode` wants stacked
//! panels, everything else is a plain overlay. Two independent decisions are
//! made from the base name, each by walking an ordered rule table and taking
//! the first match:
//!
//! | Decision | Rule table | Default |
//! |----------|------------|---------|
//! | Layout | [`LAYOUT_RULES`] | [`Layout::Overlay`] |
//! | Trace style | [`TRACE_RULES`] | [`TraceStyle::Linear`] |
//!
//! Matching is an ASCII case-insensitive substring test, so `gate_pattern`
//! and `basic_waveform_Gate` classify the same way.
//!
//! Column roles are inferred separately from the header: the x-axis is the
//! first of [`X_AXIS_PRIORITY`] present (falling back to the first column),
//! and every other column except [`AUXILIARY_COLUMNS`] is a dependent series.

use serde::Serialize;

/// X-axis candidates in precedence order. A table with both `Time` and
/// `Step` plots against `Time`.
pub const X_AXIS_PRIORITY: &[&str] = &["Time", "Beat", "Step"];

/// Index/bookkeeping columns that are never plotted as a series.
pub const AUXILIARY_COLUMNS: &[&str] = &["Phase", "Step"];

/// How the dependent columns of one artifact are arranged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Layout {
    /// Every dependent column on one chart with a legend
    Overlay,
    /// One vertically stacked subplot per dependent column, shared x-axis
    Stacked,
}

/// How samples are joined when drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TraceStyle {
    /// Straight segments between consecutive samples
    Linear,
    /// Right-continuous hold: each value persists until the next sample
    Step,
}

/// One row of a classification table.
#[derive(Debug, Clone, Copy)]
pub struct Rule<T> {
    /// Substring looked for in the base name (case-insensitive)
    pub pattern: &'static str,
    pub value: T,
}

impl<T: Copy> Rule<T> {
    const fn new(pattern: &'static str, value: T) -> Self {
        Self { pattern, value }
    }

    pub fn matches(&self, name: &str) -> bool {
        contains_ignore_case(name, self.pattern)
    }
}

/// Artifacts whose dependent columns are independent enough to deserve their
/// own panel.
pub const LAYOUT_RULES: &[Rule<Layout>] = &[
    Rule::new("clocked_mode", Layout::Stacked),
    Rule::new("basic_waveform", Layout::Stacked),
    Rule::new("slop_humanization", Layout::Stacked),
    Rule::new("delay_param", Layout::Stacked),
    Rule::new("level_polarity", Layout::Stacked),
];

/// Artifacts carrying discrete/gate values.
pub const TRACE_RULES: &[Rule<TraceStyle>] = &[
    Rule::new("euclidean", TraceStyle::Step),
    Rule::new("square", TraceStyle::Step),
    Rule::new("gate", TraceStyle::Step),
];

/// Everything the renderers need to know about an artifact that can be
/// derived from its name alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Classification {
    #[serde(skip)]
    pub x_axis_priority: &'static [&'static str],
    pub layout: Layout,
    pub trace: TraceStyle,
}

impl Default for Classification {
    fn default() -> Self {
        Self {
            x_axis_priority: X_AXIS_PRIORITY,
            layout: Layout::Overlay,
            trace: TraceStyle::Linear,
        }
    }
}

/// The column chosen as independent variable, with its axis description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XAxis {
    pub column: String,
    pub label: String,
}

/// Classify an artifact by its base name (extension already stripped).
pub fn classify(base_name: &str) -> Classification {
    Classification {
        layout: layout_for(base_name),
        trace: trace_style_for(base_name),
        ..Classification::default()
    }
}

/// First-match lookup over [`LAYOUT_RULES`].
pub fn layout_for(base_name: &str) -> Layout {
    first_match(LAYOUT_RULES, base_name).unwrap_or(Layout::Overlay)
}

/// First-match lookup over [`TRACE_RULES`].
pub fn trace_style_for(base_name: &str) -> TraceStyle {
    first_match(TRACE_RULES, base_name).unwrap_or(TraceStyle::Linear)
}

pub fn is_stacked(base_name: &str) -> bool {
    layout_for(base_name) == Layout::Stacked
}

pub fn is_step(base_name: &str) -> bool {
    trace_style_for(base_name) == TraceStyle::Step
}

fn first_match<T: Copy>(rules: &[Rule<T>], name: &str) -> Option<T> {
    rules.iter().find(|rule| rule.matches(name)).map(|rule| rule.value)
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack
        .to_ascii_lowercase()
        .contains(&needle.to_ascii_lowercase())
}

/// Pick the x-axis column.
///
/// Returns `None` only for a table with no columns at all; any other header
/// resolves to some existing column.
pub fn select_x_axis(columns: &[String]) -> Option<XAxis> {
    select_x_axis_with(X_AXIS_PRIORITY, columns)
}

/// [`select_x_axis`] with an explicit priority list.
pub fn select_x_axis_with(priority: &[&str], columns: &[String]) -> Option<XAxis> {
    let column = priority
        .iter()
        .find(|name| columns.iter().any(|c| c.as_str() == **name))
        .map(|name| name.to_string())
        .or_else(|| columns.first().cloned())?;

    let label = axis_label(&column);
    Some(XAxis { column, label })
}

fn axis_label(column: &str) -> String {
    match column {
        "Time" => "Time (s)".to_string(),
        "Beat" => "Beats".to_string(),
        other => other.to_string(),
    }
}

/// Columns plotted as series against `x_axis`, in file order.
pub fn dependent_columns<'a>(columns: &'a [String], x_axis: &str) -> Vec<&'a str> {
    columns
        .iter()
        .map(String::as_str)
        .filter(|c| *c != x_axis && !AUXILIARY_COLUMNS.contains(c))
        .collect()
}
