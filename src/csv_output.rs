//! CSV output format for fit reports
//!
//! Unlike the text table, values are written at full precision in separate
//! columns so they can be loaded into a spreadsheet without reparsing `b±h`.
//! Unavailable values are empty fields.

use crate::fit::GroupFit;
use crate::report::FitReport;

/// CSV output formatter
#[derive(Debug)]
pub struct CsvOutput<'r> {
    report: &'r FitReport,
}

impl<'r> CsvOutput<'r> {
    pub fn new(report: &'r FitReport) -> Self {
        Self { report }
    }

    /// `group,rows,<term> coef,<term> half_width,...,r_squared`
    fn header(&self) -> String {
        let mut headers = vec!["group".to_string(), "rows".to_string()];
        for term in &self.report.terms {
            headers.push(Self::escape_field(&format!("{} coef", term)));
            headers.push(Self::escape_field(&format!("{} half_width", term)));
        }
        headers.push("r_squared".to_string());
        headers.join(",")
    }

    /// Escape CSV field (handle commas, quotes, newlines)
    fn escape_field(field: &str) -> String {
        if field.contains(',') || field.contains('"') || field.contains('\n') {
            format!("\"{}\"", field.replace('"', "\"\""))
        } else {
            field.to_string()
        }
    }

    fn format_group(&self, group: &str, fit: &GroupFit) -> String {
        let mut fields = vec![Self::escape_field(group), fit.rows().to_string()];

        match fit {
            GroupFit::NoModel { .. } => {
                fields.extend((0..self.report.terms.len() * 2 + 1).map(|_| String::new()));
            }
            GroupFit::Fitted {
                model,
                r_squared,
                half_widths,
                ..
            } => {
                for (i, b) in model.coefficients().iter().enumerate() {
                    fields.push(b.to_string());
                    fields.push(
                        half_widths
                            .as_ref()
                            .ok()
                            .and_then(|h| h.get(i))
                            .map(f64::to_string)
                            .unwrap_or_default(),
                    );
                }
                fields.push(r_squared.to_string());
            }
        }

        fields.join(",")
    }

    /// Generate complete CSV output
    pub fn to_csv(&self) -> String {
        let mut output = self.header();
        output.push('\n');
        for (group, fit) in &self.report.groups {
            output.push_str(&self.format_group(group, fit));
            output.push('\n');
        }
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fit::{Model, StatsError};

    fn report(groups: Vec<(String, GroupFit)>) -> FitReport {
        FitReport::new(
            "Y",
            vec!["math.Pow(N, 2)".to_string(), "1.0".to_string()],
            groups,
        )
    }

    #[test]
    fn test_csv_escape_field() {
        assert_eq!(CsvOutput::escape_field("simple"), "simple");
        assert_eq!(CsvOutput::escape_field("a,b"), "\"a,b\"");
        assert_eq!(CsvOutput::escape_field("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn test_csv_header_escapes_terms() {
        let csv = CsvOutput::new(&report(Vec::new())).to_csv();
        assert_eq!(
            csv,
            "group,rows,\"math.Pow(N, 2) coef\",\"math.Pow(N, 2) half_width\",1.0 coef,1.0 half_width,r_squared\n"
        );
    }

    #[test]
    fn test_csv_rows() {
        let csv = CsvOutput::new(&report(vec![
            (
                "BenchmarkA".to_string(),
                GroupFit::Fitted {
                    model: Model::new(vec![2.5, -1.0]),
                    r_squared: 0.98,
                    half_widths: Ok(vec![0.25, 3.0]),
                    rows: 5,
                },
            ),
            (
                "BenchmarkB".to_string(),
                GroupFit::Fitted {
                    model: Model::new(vec![1.0, 2.0]),
                    r_squared: 1.0,
                    half_widths: Err(StatsError::SingularGramMatrix),
                    rows: 2,
                },
            ),
            ("BenchmarkC".to_string(), GroupFit::NoModel { rows: 1 }),
        ]))
        .to_csv();

        let lines: Vec<_> = csv.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[1], "BenchmarkA,5,2.5,0.25,-1,3,0.98");
        assert_eq!(lines[2], "BenchmarkB,2,1,,2,,1");
        assert_eq!(lines[3], "BenchmarkC,1,,,,,");
    }
}
