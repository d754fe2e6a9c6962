//! Fit report: table model, number formatting and the text renderer
//!
//! Every format renders the same table: a heading of
//! `group \ <response> ~`, one column per explanatory term and `R^2`, then
//! one row per group in sorted order. HTML, CSV and JSON live in their own
//! modules.

use crate::cli::OutputFormat;
use crate::csv_output::CsvOutput;
use crate::fit::GroupFit;
use crate::html_output::HtmlOutput;
use crate::json_output::JsonOutput;
use anyhow::Result;

/// Placeholder for a value that could not be computed
pub const PLACEHOLDER: &str = "~";

/// Significant digits beyond which a coefficient carries no more information
const MAX_PRECISION: usize = 16;

/// Fits for every group plus the labels needed to display them
#[derive(Debug, Clone, PartialEq)]
pub struct FitReport {
    /// Response transform source
    pub response: String,
    /// Explanatory term sources, in column order
    pub terms: Vec<String>,
    /// Group fits in sorted group order
    pub groups: Vec<(String, GroupFit)>,
}

impl FitReport {
    pub fn new(response: impl Into<String>, terms: Vec<String>, groups: Vec<(String, GroupFit)>) -> Self {
        Self {
            response: response.into(),
            terms,
            groups,
        }
    }

    pub fn heading(&self) -> Vec<String> {
        let mut heading = Vec::with_capacity(self.terms.len() + 2);
        heading.push(format!("group \\ {} ~", self.response));
        heading.extend(self.terms.iter().cloned());
        heading.push("R^2".to_string());
        heading
    }

    /// Display cells for one group, aligned with `heading`
    pub fn cells(&self, group: &str, fit: &GroupFit) -> Vec<String> {
        let mut cells = Vec::with_capacity(self.terms.len() + 2);
        cells.push(group.to_string());
        match fit {
            GroupFit::NoModel { .. } => {
                cells.extend((0..=self.terms.len()).map(|_| PLACEHOLDER.to_string()));
            }
            GroupFit::Fitted {
                model,
                r_squared,
                half_widths,
                ..
            } => {
                for (i, &b) in model.coefficients().iter().enumerate() {
                    let h = half_widths.as_ref().ok().and_then(|h| h.get(i).copied());
                    cells.push(format_coefficient(b, h));
                }
                cells.push(format_general(*r_squared));
            }
        }
        cells
    }

    /// Heading followed by one cell row per group
    pub fn table(&self) -> Vec<Vec<String>> {
        std::iter::once(self.heading())
            .chain(self.groups.iter().map(|(group, fit)| self.cells(group, fit)))
            .collect()
    }

    /// Aligned text table; empty when there are no groups
    ///
    /// Heading cells are left aligned, data cells right aligned, columns
    /// separated by two spaces. Widths count characters, not bytes.
    pub fn to_text(&self) -> String {
        if self.groups.is_empty() {
            return String::new();
        }

        let table = self.table();
        let columns = table.iter().map(Vec::len).max().unwrap_or(0);
        let mut widths = vec![0; columns];
        for row in &table {
            for (i, cell) in row.iter().enumerate() {
                widths[i] = widths[i].max(cell.chars().count());
            }
        }

        let mut out = String::new();
        let heading = &table[0];
        for (i, cell) in heading.iter().enumerate() {
            if i == 0 {
                out.push_str(&format!("{:<width$}", cell, width = widths[i]));
            } else if i == heading.len() - 1 {
                out.push_str(&format!("  {}", cell));
            } else {
                out.push_str(&format!("  {:<width$}", cell, width = widths[i]));
            }
        }
        out.push('\n');

        for row in &table[1..] {
            for (i, cell) in row.iter().enumerate() {
                if i == 0 {
                    out.push_str(&format!("{:<width$}", cell, width = widths[i]));
                } else {
                    out.push_str(&format!("  {:>width$}", cell, width = widths[i]));
                }
            }
            out.push('\n');
        }
        out
    }

    pub fn render(&self, format: OutputFormat) -> Result<String> {
        Ok(match format {
            OutputFormat::Text => self.to_text(),
            OutputFormat::Html => HtmlOutput::new(self).to_html(),
            OutputFormat::Csv => CsvOutput::new(self).to_csv(),
            OutputFormat::Json => JsonOutput::new(self).to_json()?,
        })
    }
}

/// `b±h` with as many digits of `b` as the interval supports
///
/// Digits shown are `trunc(log10|b| - log10 h + 1)` when positive, one
/// otherwise. Without an interval the coefficient gets one digit and the
/// half-width is the placeholder.
///
/// ```
/// use benchls::report::format_coefficient;
///
/// assert_eq!(format_coefficient(22.54, Some(0.064)), "2.254e+01±6.4e-02");
/// assert_eq!(format_coefficient(-2e6, Some(3.9e6)), "-2e+06±3.9e+06");
/// assert_eq!(format_coefficient(5.0, None), "5.0e+00±~");
/// ```
pub fn format_coefficient(b: f64, half_width: Option<f64>) -> String {
    let Some(h) = half_width else {
        return format!("{}±{}", format_exp(b, 1), PLACEHOLDER);
    };

    let digits = b.abs().log10() - h.log10() + 1.0;
    let precision = if digits > 0.0 {
        // NaN fails the comparison above; +inf (h == 0) is capped
        digits.min(MAX_PRECISION as f64) as usize
    } else {
        1
    };
    format!("{}±{}", format_exp(b, precision), format_exp(h, 1))
}

/// Scientific notation with a signed exponent of at least two digits
///
/// ```
/// use benchls::report::format_exp;
///
/// assert_eq!(format_exp(428.2534, 3), "4.283e+02");
/// assert_eq!(format_exp(0.00064, 1), "6.4e-04");
/// assert_eq!(format_exp(1.7e123, 0), "2e+123");
/// ```
pub fn format_exp(value: f64, precision: usize) -> String {
    if let Some(special) = non_finite(value) {
        return special.to_string();
    }
    let formatted = format!("{:.*e}", precision, value);
    with_signed_exponent(&formatted)
}

/// Shortest round-trip form, switching to scientific notation for
/// exponents below -4 or from 6 up
///
/// ```
/// use benchls::report::format_general;
///
/// assert_eq!(format_general(0.9999949426719544), "0.9999949426719544");
/// assert_eq!(format_general(1e6), "1e+06");
/// assert_eq!(format_general(-0.00001), "-1e-05");
/// assert_eq!(format_general(f64::NAN), "NaN");
/// ```
pub fn format_general(value: f64) -> String {
    if let Some(special) = non_finite(value) {
        return special.to_string();
    }
    if value == 0.0 {
        return if value.is_sign_negative() { "-0" } else { "0" }.to_string();
    }

    let scientific = format!("{:e}", value);
    let exponent = scientific
        .split_once('e')
        .and_then(|(_, e)| e.parse::<i32>().ok())
        .unwrap_or(0);
    if !(-4..6).contains(&exponent) {
        with_signed_exponent(&scientific)
    } else {
        value.to_string()
    }
}

fn non_finite(value: f64) -> Option<&'static str> {
    if value.is_nan() {
        Some("NaN")
    } else if value == f64::INFINITY {
        Some("+Inf")
    } else if value == f64::NEG_INFINITY {
        Some("-Inf")
    } else {
        None
    }
}

/// `1.5e-3` -> `1.5e-03`, `2e10` -> `2e+10`
fn with_signed_exponent(formatted: &str) -> String {
    match formatted.split_once('e') {
        Some((mantissa, exponent)) => match exponent.parse::<i32>() {
            Ok(exp) => format!(
                "{}e{}{:02}",
                mantissa,
                if exp < 0 { '-' } else { '+' },
                exp.unsigned_abs()
            ),
            Err(_) => formatted.to_string(),
        },
        None => formatted.to_string(),
    }
}
