//! Hours report document.

use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use onyx_ext_core::{
    format_creation_hours, format_hours, rate_minutes_to_hours, FolderRollup, HoursReport,
    HoursTotals, QualityTier,
};

use crate::chart::{render_chart_svg, ChartSegment, ChartStyle};
use crate::html::{escape_html, page};

#[derive(Debug, Clone)]
pub struct ReportMeta {
    pub title: String,
    /// e.g. the folder a scoped report covers.
    pub scope_label: Option<String>,
    pub generated_at: DateTime<Utc>,
}

/// Creation hours by tier, as drawn in the report chart.
#[must_use]
pub(crate) fn tier_segments(report: &HoursReport) -> Vec<ChartSegment> {
    report
        .tiers
        .rows()
        .iter()
        .map(|row| ChartSegment {
            label: row.tier.label().to_owned(),
            value: rate_minutes_to_hours(row.creation_rate_minutes),
        })
        .collect()
}

fn totals_cells(totals: &HoursTotals) -> String {
    format!(
        "<td class=\"num\">{}</td><td class=\"num\">{}</td><td class=\"num\">{}</td><td class=\"num\">{}</td>",
        totals.lesson_count,
        format_hours(totals.learning_minutes),
        format_hours(totals.completion_minutes),
        format_creation_hours(totals.creation_rate_minutes)
    )
}

fn folder_rows(out: &mut String, folder: &FolderRollup, depth: usize) {
    let _ = writeln!(
        out,
        "<tr><td style=\"padding-left:{}px\">{}</td><td class=\"num\">{}</td>{}</tr>",
        8 + depth * 16,
        escape_html(&folder.name),
        folder.totals.project_count,
        totals_cells(&folder.totals)
    );
    for child in &folder.children {
        folder_rows(out, child, depth + 1);
    }
}

/// Render a full HTML report from an already computed rollup.
#[must_use]
pub fn render_hours_report(report: &HoursReport, meta: &ReportMeta) -> String {
    let mut body = String::new();
    let _ = writeln!(body, "<h1>{}</h1>", escape_html(&meta.title));
    let scope = meta
        .scope_label
        .as_deref()
        .map(|s| format!("{} &middot; ", escape_html(s)))
        .unwrap_or_default();
    let _ = writeln!(
        body,
        "<div class=\"meta\">{scope}Generated {}</div>",
        meta.generated_at.format("%Y-%m-%d %H:%M UTC")
    );

    let summary = &report.summary;
    body.push_str("<h2>Summary</h2>\n<table>\n");
    for (label, value) in [
        ("Projects", summary.project_count.to_string()),
        ("Modules", summary.module_count.to_string()),
        ("Lessons", summary.lesson_count.to_string()),
        ("Learning hours", format_hours(summary.learning_minutes)),
        ("Completion hours", format_hours(summary.completion_minutes)),
        ("Creation hours", format_creation_hours(summary.creation_rate_minutes)),
    ] {
        let _ = writeln!(body, "<tr><th>{label}</th><td class=\"num\">{value}</td></tr>");
    }
    body.push_str("</table>\n");

    body.push_str(
        "<h2>By quality tier</h2>\n<table>\n<tr><th>Tier</th><th class=\"num\">Rate</th><th class=\"num\">Lessons</th><th class=\"num\">Completion</th><th class=\"num\">Creation</th></tr>\n",
    );
    for row in report.tiers.rows() {
        let _ = writeln!(
            body,
            "<tr><td>{}</td><td class=\"num\">{}%</td><td class=\"num\">{}</td><td class=\"num\">{}</td><td class=\"num\">{}</td></tr>",
            row.tier.label(),
            row.tier.rate_percent(),
            row.lesson_count,
            format_hours(row.completion_minutes),
            format_creation_hours(row.creation_rate_minutes)
        );
    }
    let _ = writeln!(
        body,
        "<tr class=\"total\"><td>Total</td><td></td><td class=\"num\">{}</td><td class=\"num\">{}</td><td class=\"num\">{}</td></tr>\n</table>",
        summary.lesson_count,
        format_hours(summary.completion_minutes),
        format_creation_hours(summary.creation_rate_minutes)
    );

    let _ = writeln!(
        body,
        "<div class=\"chart\">{}</div>",
        render_chart_svg("Creation hours by tier", &tier_segments(report), ChartStyle::Pie)
    );

    if !report.folders.is_empty() {
        body.push_str(
            "<h2>Folders</h2>\n<table>\n<tr><th>Folder</th><th class=\"num\">Projects</th><th class=\"num\">Lessons</th><th class=\"num\">Learning</th><th class=\"num\">Completion</th><th class=\"num\">Creation</th></tr>\n",
        );
        for folder in &report.folders {
            folder_rows(&mut body, folder, 0);
        }
        body.push_str("</table>\n");
    }

    if !report.projects.is_empty() {
        body.push_str(
            "<h2>Projects</h2>\n<table>\n<tr><th>Project</th><th>Default tier</th><th class=\"num\">Lessons</th><th class=\"num\">Learning</th><th class=\"num\">Completion</th><th class=\"num\">Creation</th></tr>\n",
        );
        for project in &report.projects {
            let _ = writeln!(
                body,
                "<tr><td>{}</td><td>{}</td>{}</tr>",
                escape_html(&project.name),
                project.default_tier.label(),
                totals_cells(&project.totals)
            );
        }
        body.push_str("</table>\n");
    }

    page(&meta.title, &body)
}

/// Rate legend shown under tier tables elsewhere.
#[must_use]
pub(crate) fn rate_legend() -> String {
    QualityTier::ALL
        .iter()
        .map(|t| format!("{} {}%", t.label(), t.rate_percent()))
        .collect::<Vec<_>>()
        .join(" · ")
}
