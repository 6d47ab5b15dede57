//! SVG pie and donut charts.

use std::f64::consts::PI;
use std::fmt::Write as _;

use onyx_ext_core::MAX_CHART_SEGMENTS;
use serde::{Deserialize, Serialize};

use crate::error::RenderError;
use crate::html::escape_html;

const PALETTE: [&str; 8] =
    ["#2563eb", "#16a34a", "#f59e0b", "#dc2626", "#7c3aed", "#0891b2", "#db2777", "#65a30d"];

const CX: f64 = 150.0;
const CY: f64 = 170.0;
const RADIUS: f64 = 120.0;
const DONUT_INNER: f64 = 70.0;
const LEGEND_X: f64 = 300.0;
const WIDTH: u32 = 560;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSegment {
    pub label: String,
    pub value: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartStyle {
    #[default]
    Pie,
    Donut,
}

/// Parse `labels=a,b` / `values=1,2` style inputs.
///
/// # Errors
/// `InvalidChart` on mismatched lengths, too many segments, or a value that
/// is not a finite non-negative number.
pub fn parse_chart_segments(labels: &str, values: &str) -> Result<Vec<ChartSegment>, RenderError> {
    let labels: Vec<&str> = labels.split(',').map(str::trim).filter(|l| !l.is_empty()).collect();
    let values: Vec<&str> = values.split(',').map(str::trim).filter(|v| !v.is_empty()).collect();
    if labels.is_empty() {
        return Err(RenderError::InvalidChart("at least one label is required".to_owned()));
    }
    if labels.len() != values.len() {
        return Err(RenderError::InvalidChart(format!(
            "{} labels but {} values",
            labels.len(),
            values.len()
        )));
    }
    if labels.len() > MAX_CHART_SEGMENTS {
        return Err(RenderError::InvalidChart(format!(
            "at most {MAX_CHART_SEGMENTS} segments are supported"
        )));
    }
    labels
        .into_iter()
        .zip(values)
        .map(|(label, raw)| match raw.parse::<f64>() {
            Ok(value) if value.is_finite() && value >= 0.0 => {
                Ok(ChartSegment { label: label.to_owned(), value })
            },
            _ => Err(RenderError::InvalidChart(format!("invalid value for {label}: {raw}"))),
        })
        .collect()
}

fn point(radius: f64, angle: f64) -> (f64, f64) {
    (CX + radius * angle.cos(), CY + radius * angle.sin())
}

fn slice_path(start: f64, end: f64, style: ChartStyle) -> String {
    let large = u8::from(end - start > PI);
    let (ox1, oy1) = point(RADIUS, start);
    let (ox2, oy2) = point(RADIUS, end);
    match style {
        ChartStyle::Pie => format!(
            "M {CX:.2} {CY:.2} L {ox1:.2} {oy1:.2} A {RADIUS} {RADIUS} 0 {large} 1 {ox2:.2} {oy2:.2} Z"
        ),
        ChartStyle::Donut => {
            let (ix1, iy1) = point(DONUT_INNER, start);
            let (ix2, iy2) = point(DONUT_INNER, end);
            format!(
                "M {ox1:.2} {oy1:.2} A {RADIUS} {RADIUS} 0 {large} 1 {ox2:.2} {oy2:.2} \
                 L {ix2:.2} {iy2:.2} A {DONUT_INNER} {DONUT_INNER} 0 {large} 0 {ix1:.2} {iy1:.2} Z"
            )
        },
    }
}

fn full_circle(color: &str, style: ChartStyle) -> String {
    match style {
        ChartStyle::Pie => {
            format!("<circle cx=\"{CX}\" cy=\"{CY}\" r=\"{RADIUS}\" fill=\"{color}\"/>")
        },
        ChartStyle::Donut => format!(
            "<circle cx=\"{CX}\" cy=\"{CY}\" r=\"{:.2}\" fill=\"none\" stroke=\"{color}\" stroke-width=\"{:.2}\"/>",
            (RADIUS + DONUT_INNER) / 2.0,
            RADIUS - DONUT_INNER
        ),
    }
}

/// Render segments as a standalone SVG document with a legend.
#[must_use]
pub fn render_chart_svg(title: &str, segments: &[ChartSegment], style: ChartStyle) -> String {
    let total: f64 = segments.iter().map(|s| s.value).filter(|v| v.is_finite() && *v > 0.0).sum();
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, reason = "bounded segment count")]
    let height = (60 + segments.len() * 22).max(320) as u32;

    let mut svg = format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{WIDTH}\" height=\"{height}\" viewBox=\"0 0 {WIDTH} {height}\" font-family=\"Arial, sans-serif\">\n"
    );
    let _ = writeln!(
        svg,
        "<text x=\"{}\" y=\"24\" font-size=\"16\" font-weight=\"bold\" text-anchor=\"middle\">{}</text>",
        WIDTH / 2,
        escape_html(title)
    );

    if total <= 0.0 {
        let _ = writeln!(
            svg,
            "<text x=\"{CX}\" y=\"{CY}\" font-size=\"14\" text-anchor=\"middle\" fill=\"#6b7280\">No data</text>"
        );
    } else {
        let mut angle = -PI / 2.0;
        for (i, segment) in segments.iter().enumerate() {
            if !(segment.value.is_finite() && segment.value > 0.0) {
                continue;
            }
            let color = PALETTE[i % PALETTE.len()];
            let fraction = segment.value / total;
            if fraction >= 0.9999 {
                let _ = writeln!(svg, "{}", full_circle(color, style));
                break;
            }
            let end = angle + fraction * 2.0 * PI;
            let _ = writeln!(
                svg,
                "<path d=\"{}\" fill=\"{color}\" stroke=\"#ffffff\" stroke-width=\"1\"/>",
                slice_path(angle, end, style)
            );
            angle = end;
        }
    }

    for (i, segment) in segments.iter().enumerate() {
        let y = 60 + i * 22;
        let percent = if total > 0.0 && segment.value > 0.0 { segment.value / total * 100.0 } else { 0.0 };
        let _ = writeln!(
            svg,
            "<rect x=\"{LEGEND_X}\" y=\"{}\" width=\"14\" height=\"14\" fill=\"{}\"/><text x=\"{}\" y=\"{y}\" font-size=\"12\">{} ({percent:.1}%)</text>",
            y - 11,
            PALETTE[i % PALETTE.len()],
            LEGEND_X + 20.0,
            escape_html(&segment.label)
        );
    }
    svg.push_str("</svg>\n");
    svg
}
