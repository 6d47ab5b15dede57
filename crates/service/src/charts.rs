//! Chart endpoints: demo data, style comparison and ad-hoc charts from query
//! parameters.

use onyx_ext_render::{page, parse_chart_segments, render_chart_svg, ChartSegment, ChartStyle};

use crate::ServiceError;

const DEFAULT_TITLE: &str = "Chart";

fn demo_segments() -> Vec<ChartSegment> {
    [("Slide decks", 42.0), ("Lesson plans", 27.0), ("Quizzes", 18.0), ("Videos", 13.0)]
        .into_iter()
        .map(|(label, value)| ChartSegment { label: label.to_owned(), value })
        .collect()
}

#[must_use]
pub fn demo_svg() -> String {
    render_chart_svg("Products by type", &demo_segments(), ChartStyle::Pie)
}

/// HTML page with the demo data drawn as pie and as donut side by side.
#[must_use]
pub fn compare_html() -> String {
    let segments = demo_segments();
    let body = format!(
        "<h1>Pie vs donut</h1>\n<div class=\"compare\">\n<figure>{}<figcaption>Pie</figcaption></figure>\n<figure>{}<figcaption>Donut</figcaption></figure>\n</div>\n",
        render_chart_svg("Products by type", &segments, ChartStyle::Pie),
        render_chart_svg("Products by type", &segments, ChartStyle::Donut),
    );
    page("Chart comparison", &body)
}

/// `labels` and `values` are comma separated and must line up.
pub fn generate(
    labels: &str,
    values: &str,
    title: Option<&str>,
    style: ChartStyle,
) -> Result<String, ServiceError> {
    let segments = parse_chart_segments(labels, values)?;
    let title = title.map(str::trim).filter(|t| !t.is_empty()).unwrap_or(DEFAULT_TITLE);
    Ok(render_chart_svg(title, &segments, style))
}
