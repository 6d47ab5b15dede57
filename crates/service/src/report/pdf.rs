//! PDF adapter: the same rollup rendered as an HTML document for the
//! headless browser.

use onyx_ext_core::HoursReport;
use onyx_ext_render::{render_hours_report, ReportMeta};

#[must_use]
pub fn to_html(report: &HoursReport, meta: &ReportMeta) -> String {
    render_hours_report(report, meta)
}
