//! Rendering for onyx-ext: HTML documents, SVG charts and PDF conversion.

pub mod chart;
mod error;
mod html;
mod pdf;
mod project;
mod report;

pub use chart::{parse_chart_segments, render_chart_svg, ChartSegment, ChartStyle};
pub use error::RenderError;
pub use html::{escape_html, page};
pub use pdf::{ChromiumPdf, PdfRenderer};
pub use project::render_project_html;
pub use report::{render_hours_report, ReportMeta};
