//! Output formatting for the CLI.

use crate::commands::status::StatusSummary;
use colored::*;
use rootcause_pipeline::{GroundTruthReport, MinibatchReport};
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Message printed once every minibatch of a run has been stored.
pub const RUN_COMPLETE: &str = "All batches processed and stored to database.";

/// Output formatter.
pub struct Formatter {
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(color_enabled: bool) -> Self {
        Self { color_enabled }
    }

    /// Progress line for a committed minibatch.
    pub fn minibatch_done(&self, report: &MinibatchReport) -> String {
        let mut line = format!(
            "Processing batch {}, records {}:{}... {}",
            report.index,
            report.start,
            report.end,
            self.colorize("Done!", "green")
        );
        if report.skipped > 0 {
            line.push_str(&format!(" ({} already classified)", report.skipped));
        }
        line
    }

    /// Final line of a successful run.
    pub fn run_complete(&self) -> String {
        self.colorize(RUN_COMPLETE, "green")
    }

    /// Ticket and store counts as a table.
    pub fn status_table(&self, summary: &StatusSummary) -> String {
        let mut builder = Builder::default();
        builder.push_record(["Metric", "Count"]);

        let rows = [
            ("Tickets in source", summary.tickets),
            ("Classified", summary.classified),
            ("Remaining", summary.remaining),
            ("Stored rows", summary.stored_rows),
            ("Duplicated numbers", summary.duplicated),
        ];
        for (metric, count) in rows {
            builder.push_record([metric.to_string(), count.to_string()]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        table.to_string()
    }

    /// Ground-truth outcome: a table of violations, or a success line.
    pub fn ground_truth(&self, report: &GroundTruthReport) -> String {
        let mut lines = Vec::new();

        for number in &report.missing {
            lines.push(self.warning(&format!("{} has no stored verdict", number)));
        }

        if report.is_ok() {
            lines.push(self.success(&format!(
                "{} known-positive ticket(s) classified as yes",
                report.checked
            )));
            return lines.join("\n");
        }

        let mut builder = Builder::default();
        builder.push_record(["Number", "Read as", "Stored verdict"]);
        for violation in &report.violations {
            builder.push_record([
                violation.number.clone(),
                format!("{:?}", violation.parsed),
                truncate(&violation.verdict, 60),
            ]);
        }
        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        lines.push(self.error(&format!(
            "{} of {} known-positive ticket(s) not classified as yes",
            report.violations.len(),
            report.checked
        )));
        lines.push(table.to_string());
        lines.join("\n")
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}

/// Shorten to `max` characters, single line.
fn truncate(text: &str, max: usize) -> String {
    let flat = text.replace('\n', " ");
    if flat.chars().count() <= max {
        return flat;
    }
    let mut short: String = flat.chars().take(max).collect();
    short.push('…');
    short
}
