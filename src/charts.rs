//! Projection of a [`StatsSnapshot`] into chart view models.
//!
//! Pure and synchronous. Only a snapshot that was successfully parsed can
//! reach [`ChartProjector::project`], so an error body is never charted.

use serde::Serialize;

use crate::models::StatsSnapshot;

pub const BAR_TITLE: &str = "CVEs per Event Name";
pub const BAR_SERIES_LABEL: &str = "Number of CVEs";
pub const LINE_TITLE: &str = "CVEs Over Time";
pub const LINE_SERIES_LABEL: &str = "CVEs Over Time";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Bar,
    Line,
}

/// Presentation attributes of a single series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartStyle {
    pub background_color: &'static str,
    pub border_color: &'static str,
    pub border_width: u32,
    pub fill: bool,
    /// Bezier curve tension; 0 draws straight segments.
    pub tension: f32,
}

impl ChartStyle {
    pub fn bar() -> Self {
        Self {
            background_color: "rgba(75, 192, 192, 0.6)",
            border_color: "rgba(75, 192, 192, 1)",
            border_width: 1,
            fill: false,
            tension: 0.0,
        }
    }

    pub fn line() -> Self {
        Self {
            background_color: "rgba(255, 99, 132, 0.2)",
            border_color: "rgba(255, 99, 132, 1)",
            border_width: 1,
            fill: true,
            tension: 0.3,
        }
    }
}

/// One chart with a single series. `labels` and `values` have equal length.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartViewModel {
    pub kind: ChartKind,
    pub title: &'static str,
    pub series_label: &'static str,
    pub labels: Vec<String>,
    pub values: Vec<u64>,
    pub style: ChartStyle,
}

impl ChartViewModel {
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn max_value(&self) -> u64 {
        self.values.iter().copied().max().unwrap_or(0)
    }

    pub fn points(&self) -> impl Iterator<Item = (&str, u64)> {
        self.labels
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().copied())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Charts {
    pub bar: ChartViewModel,
    pub line: ChartViewModel,
}

pub struct ChartProjector;

impl ChartProjector {
    /// Bar chart of counts per event name, line chart of counts per date.
    ///
    /// Both maps are ordered, so labels come out ascending: event names
    /// alphabetically, dates chronologically for any ISO-8601 prefix.
    pub fn project(snapshot: &StatsSnapshot) -> Charts {
        let (bar_labels, bar_values) = snapshot
            .counts_by_event
            .iter()
            .map(|(name, count)| (name.clone(), *count))
            .unzip();
        let (line_labels, line_values) = snapshot
            .counts_by_date
            .iter()
            .map(|(date, count)| (date.clone(), *count))
            .unzip();

        Charts {
            bar: ChartViewModel {
                kind: ChartKind::Bar,
                title: BAR_TITLE,
                series_label: BAR_SERIES_LABEL,
                labels: bar_labels,
                values: bar_values,
                style: ChartStyle::bar(),
            },
            line: ChartViewModel {
                kind: ChartKind::Line,
                title: LINE_TITLE,
                series_label: LINE_SERIES_LABEL,
                labels: line_labels,
                values: line_values,
                style: ChartStyle::line(),
            },
        }
    }
}
