//! CLI UI utilities for terminal output.
//!
//! This module provides colored status lines, a progress bar for scans,
//! and the duplicate table printed by the `refdedupe` binary.

use comfy_table::{Attribute, Cell, Table};
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use std::io::IsTerminal;

use crate::dedupe::{Duplicate, ScanError, ScanObserver, ScanSummary};
use crate::models::{Reference, Verdict};

/// Check if stdout is a terminal.
pub fn is_terminal() -> bool {
    std::io::stdout().is_terminal()
}

/// Status icons for different outcomes.
pub fn status_icon(status: Status) -> &'static str {
    match status {
        Status::Success => "✓",
        Status::Error => "✗",
        Status::Warning => "⚠",
        Status::Info => "ℹ",
    }
}

/// Status types for colored output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Success,
    Error,
    Warning,
    Info,
}

/// Print a styled status message to stderr.
pub fn print_status(status: Status, msg: &str) {
    let icon = status_icon(status);
    match status {
        Status::Success => eprintln!("{} {}", icon.green().bold(), msg),
        Status::Error => eprintln!("{} {}", icon.red().bold(), msg),
        Status::Warning => eprintln!("{} {}", icon.yellow().bold(), msg),
        Status::Info => eprintln!("{} {}", icon.cyan().bold(), msg),
    }
}

/// Print a section header.
pub fn print_section(title: &str) {
    println!();
    println!("{}", format!("━━━ {} ━━━", title).bold().cyan());
}

/// Print the verdict for a single comparison.
pub fn print_verdict(a: &Reference, b: &Reference, verdict: &Verdict) {
    print_section("Comparison");
    println!("  {} {}", "A:".dimmed(), a.label());
    println!("  {} {}", "B:".dimmed(), b.label());
    if verdict.is_dupe {
        println!("  {} duplicate ({})", status_icon(Status::Success).green().bold(), verdict.reason);
    } else {
        println!("  {} distinct ({})", status_icon(Status::Info).cyan().bold(), verdict.reason);
    }
}

/// Render duplicate pairs as a table.
pub fn duplicates_table(dupes: &[Duplicate]) -> Table {
    let mut table = Table::new();
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.set_header(vec!["#", "Left", "#", "Right", "Reason"]);

    for dupe in dupes {
        table.add_row(vec![
            Cell::new(dupe.left_index),
            Cell::new(truncate_with_ellipsis(dupe.left.label(), 50)).add_attribute(Attribute::Bold),
            Cell::new(dupe.right_index),
            Cell::new(truncate_with_ellipsis(dupe.right.label(), 50)),
            Cell::new(dupe.verdict.reason),
        ]);
    }

    table
}

/// Format a number with commas.
pub fn format_number(n: usize) -> String {
    n.to_string()
        .chars()
        .rev()
        .collect::<Vec<_>>()
        .chunks(3)
        .map(|c| c.iter().collect::<String>())
        .collect::<Vec<_>>()
        .join(",")
        .chars()
        .rev()
        .collect()
}

/// Truncate text to at most `max_chars` characters, ending with an ellipsis if cut.
pub fn truncate_with_ellipsis(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    if max_chars <= 3 {
        return "...".to_string();
    }

    let truncated: String = text.chars().take(max_chars - 3).collect();
    format!("{}...", truncated.trim_end())
}

/// Progress bar over the pairs of a scan
#[derive(Debug)]
pub struct ScanProgress {
    bar: ProgressBar,
    found: usize,
}

impl ScanProgress {
    /// Create a bar for `total` pairs; hidden when `visible` is false
    pub fn new(total: usize, visible: bool) -> Self {
        let bar = if visible {
            ProgressBar::new(total as u64)
        } else {
            ProgressBar::hidden()
        };

        if let Ok(style) = ProgressStyle::with_template(
            "{spinner:.cyan} {wide_bar:.cyan/blue} {pos}/{len} pairs ({eta}) {msg}",
        ) {
            bar.set_style(style.progress_chars("█▉▊▋▌▍▎▏  "));
        }

        Self { bar, found: 0 }
    }
}

impl ScanObserver for ScanProgress {
    fn on_progress(&mut self, index: usize, total: usize) {
        self.bar.set_length(total as u64);
        self.bar.set_position(index as u64 + 1);
    }

    fn on_dupe(&mut self, _duplicate: &Duplicate) {
        self.found += 1;
        self.bar.set_message(format!("{} duplicates", self.found));
    }

    fn on_error(&mut self, error: &ScanError) {
        self.bar.abandon_with_message(format!("{}", error));
    }

    fn on_end(&mut self, summary: &ScanSummary) {
        self.bar.finish_and_clear();
        print_status(
            Status::Success,
            &format!(
                "Compared {} pairs across {} references, {} duplicates",
                format_number(summary.compared),
                format_number(summary.records),
                format_number(summary.duplicates)
            ),
        );
    }
}
