/*!
 * Reporting functionality for evbgen
 *
 * Renders a short summary of a generation run with the tabled library.
 */

use std::time::Duration;

use tabled::{
    settings::{object::Columns, Alignment, Modify, Padding, Style},
    Table, Tabled,
};

use crate::generator::Summary;
use crate::utils::format_file_size;

/// Statistics for a finished run
#[derive(Debug, Clone)]
pub struct GenerateReport {
    /// Project file path
    pub output_file: String,
    /// Directory that was packed
    pub pack_dir: String,
    /// Time taken to read, render and write
    pub duration: Duration,
    /// File entries written to the project
    pub files: usize,
    /// Directory entries written to the project
    pub dirs: usize,
    /// Entries dropped by the filter
    pub skipped: usize,
    /// Size of the project file
    pub bytes_written: u64,
}

impl GenerateReport {
    pub fn new(summary: &Summary, pack_dir: String, duration: Duration) -> Self {
        Self {
            output_file: summary.output_file.display().to_string(),
            pack_dir,
            duration,
            files: summary.stats.files,
            dirs: summary.stats.dirs,
            skipped: summary.stats.skipped,
            bytes_written: summary.bytes_written,
        }
    }
}

/// Format of the report output
pub enum ReportFormat {
    /// Console table output
    ConsoleTable,
}

/// Report generator for run results
pub struct Reporter {
    format: ReportFormat,
}

impl Reporter {
    /// Create a new reporter
    pub fn new(format: ReportFormat) -> Self {
        Self { format }
    }

    /// Format a number with human-readable units
    fn format_number(&self, num: usize) -> String {
        if num >= 1_000_000 {
            format!("{:.1}M", num as f64 / 1_000_000.0)
        } else if num >= 1_000 {
            format!("{:.1}K", num as f64 / 1_000.0)
        } else {
            num.to_string()
        }
    }

    /// Generate a report string
    pub fn generate_report(&self, report: &GenerateReport) -> String {
        match self.format {
            ReportFormat::ConsoleTable => self.generate_console_report(report),
        }
    }

    /// Print the report to stdout
    pub fn print_report(&self, report: &GenerateReport) {
        println!("\n{}", self.generate_report(report));
    }

    fn generate_console_report(&self, report: &GenerateReport) -> String {
        #[derive(Tabled)]
        struct SummaryRow {
            #[tabled(rename = "Metric")]
            key: &'static str,

            #[tabled(rename = "Value")]
            value: String,
        }

        let rows = vec![
            SummaryRow {
                key: "📂 Project File",
                value: report.output_file.clone(),
            },
            SummaryRow {
                key: "📦 Packed Directory",
                value: report.pack_dir.clone(),
            },
            SummaryRow {
                key: "📄 Files",
                value: self.format_number(report.files),
            },
            SummaryRow {
                key: "📁 Directories",
                value: self.format_number(report.dirs),
            },
            SummaryRow {
                key: "🚫 Filtered Out",
                value: self.format_number(report.skipped),
            },
            SummaryRow {
                key: "💾 Project Size",
                value: format_file_size(report.bytes_written),
            },
            SummaryRow {
                key: "⏱️ Process Time",
                value: format!("{:.4?}", report.duration),
            },
        ];

        let mut table = Table::new(rows);
        table
            .with(Style::rounded())
            .with(Padding::new(1, 1, 0, 0))
            .with(Modify::new(Columns::new(..)).with(Alignment::left()));

        format!("✅  PROJECT GENERATED\n{}", table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_console_report_lists_counts() {
        let report = GenerateReport {
            output_file: "/build/app.evb".to_string(),
            pack_dir: "/build/app".to_string(),
            duration: Duration::from_millis(12),
            files: 1_500,
            dirs: 12,
            skipped: 0,
            bytes_written: 4096,
        };
        let text = Reporter::new(ReportFormat::ConsoleTable).generate_report(&report);
        assert!(text.contains("/build/app.evb"));
        assert!(text.contains("1.5K"));
        assert!(text.contains("12"));
        assert!(text.contains("4.00 KB"));
    }
}
