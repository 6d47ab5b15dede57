//! HTML helpers shared by every document.

/// Escape text for use in element content and quoted attributes.
#[must_use]
pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

const STYLE: &str = r#"
body { font-family: "Helvetica Neue", Arial, sans-serif; color: #1f2937; margin: 32px; font-size: 12px; }
h1 { font-size: 22px; margin: 0 0 4px; }
h2 { font-size: 16px; margin: 24px 0 8px; border-bottom: 1px solid #e5e7eb; padding-bottom: 4px; }
.meta { color: #6b7280; margin-bottom: 16px; }
table { border-collapse: collapse; width: 100%; margin-bottom: 12px; }
th, td { border: 1px solid #e5e7eb; padding: 6px 8px; text-align: left; }
th { background: #f3f4f6; }
td.num, th.num { text-align: right; }
tr.total td { font-weight: bold; background: #f9fafb; }
.slide { page-break-after: always; border: 1px solid #e5e7eb; border-radius: 6px; padding: 24px; margin-bottom: 24px; }
.slide:last-child { page-break-after: auto; }
.notes { color: #6b7280; font-style: italic; margin-top: 12px; }
.chart { text-align: center; margin: 12px 0; }
pre { white-space: pre-wrap; background: #f9fafb; padding: 12px; }
"#;

/// Wrap a body fragment into a standalone UTF-8 document.
#[must_use]
pub fn page(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n<style>{STYLE}</style>\n</head>\n<body>\n{body}</body>\n</html>\n",
        escape_html(title)
    )
}
