//! HTML output format for fit reports
//!
//! A single styled table: heading cells as `<th>`, one row per group.

use crate::report::FitReport;

/// Right-align the numeric columns
const STYLE: &str =
    "<style>.benchls tbody td:nth-child(1n+2) { text-align: right; padding: 0em 1em; }</style>";

/// HTML output formatter
#[derive(Debug)]
pub struct HtmlOutput<'r> {
    report: &'r FitReport,
}

impl<'r> HtmlOutput<'r> {
    pub fn new(report: &'r FitReport) -> Self {
        Self { report }
    }

    /// Escape HTML special characters to prevent XSS
    fn escape_html(text: &str) -> String {
        text.replace('&', "&amp;")
            .replace('<', "&lt;")
            .replace('>', "&gt;")
            .replace('"', "&#34;")
            .replace('\'', "&#39;")
    }

    fn format_row(cells: &[String], tag: &str) -> String {
        let mut row = String::from("<tr>");
        for cell in cells {
            row.push_str(&format!("<{tag}>{}</{tag}>", Self::escape_html(cell)));
        }
        row.push_str("</tr>\n");
        row
    }

    /// Generate the table; empty when the report has no groups
    pub fn to_html(&self) -> String {
        if self.report.groups.is_empty() {
            return String::new();
        }

        let mut html = String::new();
        html.push_str(STYLE);
        html.push('\n');
        html.push_str("<table class='benchls'>\n");
        html.push_str(&Self::format_row(&self.report.heading(), "th"));
        for (group, fit) in &self.report.groups {
            html.push_str(&Self::format_row(&self.report.cells(group, fit), "td"));
        }
        html.push_str("</table>\n");
        html
    }
}
