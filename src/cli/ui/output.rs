use console::style;

use crate::pipeline::{RankedName, ResultsReport};
use crate::types::{Availability, SocialAvailability};

pub struct Output;

impl Output {
    pub fn new() -> Self {
        Self
    }

    pub fn success(&self, message: &str) {
        println!("{} {}", style("✓").green(), message);
    }

    pub fn error(&self, message: &str) {
        eprintln!("{} {}", style("✗").red(), message);
    }

    pub fn warning(&self, message: &str) {
        println!("{} {}", style("⚠").yellow(), message);
    }

    pub fn info(&self, message: &str) {
        println!("{} {}", style("ℹ").blue(), message);
    }

    pub fn header(&self, message: &str) {
        println!("\n{}", style(message).bold().underlined());
    }

    pub fn section(&self, message: &str) {
        println!("\n{}", style(message).bold());
        println!("{}", "─".repeat(40));
    }

    /// Top `limit` names followed by cache statistics
    pub fn results(&self, report: &ResultsReport, limit: usize) {
        self.header("=== TOP AVAILABLE DOMAINS ===");
        for (i, name) in report.top(limit).iter().enumerate() {
            println!("{}", self.ranked_row(name, i + 1));
        }
        println!("\nTotal available domains: {}", report.total());

        self.section("=== CACHE STATISTICS ===");
        for (kind, count) in &report.cache_sizes {
            println!("{}: {} entries", kind.field_name(), count);
        }
    }

    fn ranked_row(&self, name: &RankedName, index: usize) -> String {
        let row = name.row(index);
        if name.rating >= 80.0 {
            style(row).green().to_string()
        } else {
            row
        }
    }

    /// Per-platform availability of one handle
    pub fn social(&self, name: &str, results: &SocialAvailability) {
        println!("Social media availability for '{}':", name);
        for (platform, availability) in results {
            let status = match availability {
                Availability::Available => style("✓ Available").green(),
                _ => style("✗ Taken").red(),
            };
            println!("  {:10}: {}", platform, status);
        }
    }
}

impl Default for Output {
    fn default() -> Self {
        Self::new()
    }
}
