//! Plain-text rendering of dashboard data for stdout.

use std::fmt::Write;

use crate::charts::{ChartViewModel, Charts};
use crate::models::ListPage;
use crate::state::QueryState;

const BAR_WIDTH: usize = 40;

/// The event table followed by a pager line.
pub fn render_list(page: &ListPage, query: &QueryState) -> String {
    let mut out = String::new();

    if page.is_empty() {
        out.push_str("No CVE events match the current filter.\n");
    } else {
        let _ = writeln!(
            out,
            "{:<8} {:<18} {:<28} {:<36} {:<19}",
            "ID", "CVE ID", "Event Name", "Source", "Created"
        );
        for record in &page.records {
            let _ = writeln!(
                out,
                "{:<8} {:<18} {:<28} {:<36} {:<19}",
                record.id,
                record.cve_id,
                record.event_name,
                record.source_identifier,
                record.created_display()
            );
            for line in record.details_summary().lines() {
                let _ = writeln!(out, "         {}", line);
            }
        }
    }

    let _ = writeln!(out, "\n{}", render_pager(query));
    out
}

pub fn render_pager(query: &QueryState) -> String {
    let mut line = format!("Page {} of {}", query.page(), query.total_pages());
    if let Some(cve_id) = query.applied().cve_id_constraint() {
        let _ = write!(line, "  cve_id={}", cve_id);
    }
    if let Some(name) = query.applied().event_name_constraint() {
        let _ = write!(line, "  event_name={}", name);
    }
    let mut hints = Vec::new();
    if query.can_go_previous() {
        hints.push(format!("--page {} for previous", query.page() - 1));
    }
    if query.can_go_next() {
        hints.push(format!("--page {} for next", query.page() + 1));
    }
    if !hints.is_empty() {
        let _ = write!(line, "  ({})", hints.join(", "));
    }
    line
}

/// Horizontal bar rendering of one chart, scaled to its largest value.
pub fn render_chart(chart: &ChartViewModel) -> String {
    let mut out = format!("{}\n", chart.title);
    if chart.is_empty() {
        out.push_str("  (no data)\n");
        return out;
    }

    let label_width = chart.labels.iter().map(|l| l.len()).max().unwrap_or(0);
    let max = chart.max_value().max(1);
    for (label, value) in chart.points() {
        let len = (value as usize * BAR_WIDTH).div_ceil(max as usize);
        let _ = writeln!(
            out,
            "  {:<width$} {} {}",
            label,
            "#".repeat(len),
            value,
            width = label_width
        );
    }
    out
}

pub fn render_charts(charts: &Charts) -> String {
    format!("{}\n{}", render_chart(&charts.bar), render_chart(&charts.line))
}
