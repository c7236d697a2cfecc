//! Console reporter with colored output

use std::path::Path;

use colored::Colorize;

use crate::compare::{Report, TotalTrendRow};

/// Reporter for terminal output
pub struct ConsoleReporter {
    /// Whether to show the common-respondent list
    verbose: bool,
}

impl ConsoleReporter {
    pub fn new() -> Self {
        Self { verbose: false }
    }

    /// Enable verbose output
    pub fn verbose(mut self) -> Self {
        self.verbose = true;
        self
    }

    /// Print the full set of views for one run
    pub fn report(&self, report: &Report, pre: &Path, post: &Path) {
        self.print_header(report, pre, post);

        if self.verbose {
            self.print_respondent_list(report);
        }

        if let (Some(factors), Some(items)) =
            (&report.factor_comparison, &report.item_comparison)
        {
            let id = report.respondent.as_deref().unwrap_or("?");
            println!("   {}", format!("Factor scores - respondent {}:", id).bold());
            for row in factors {
                println!(
                    "   {:<28} {:>3} \u{2192} {:<3} {}",
                    row.factor.label(),
                    row.pre,
                    row.post,
                    colorize_delta(row.delta)
                );
            }
            println!();

            println!("   {}", format!("Item scores - respondent {}:", id).bold());
            for row in items {
                println!(
                    "   {:>2}. {} {} \u{2192} {} {}",
                    row.id,
                    row.text,
                    row.pre,
                    row.post,
                    colorize_delta(row.delta as i64)
                );
            }
            println!();
        }

        println!("   {}", "Cohort factor trend (mean):".bold());
        for row in &report.factor_trend {
            println!(
                "   {:<28} {:>5.2} \u{2192} {:<5.2} {}",
                row.factor.label(),
                row.pre_mean,
                row.post_mean,
                colorize_mean_delta(row.delta)
            );
        }
        println!();

        println!("   {}", "Cohort total trend:".bold());
        for row in &report.total_trend {
            self.print_total_row(row);
        }
        println!();

        println!("   {}", "Cohort item trend (mean):".bold());
        for row in &report.item_trend {
            println!(
                "   {:>2}. {} {:.2} \u{2192} {:.2} {}",
                row.id,
                row.text,
                row.pre_mean,
                row.post_mean,
                colorize_mean_delta(row.delta)
            );
        }
        println!();
    }

    /// One line per respondent: totals only
    pub fn report_quiet(&self, report: &Report) {
        for row in &report.total_trend {
            let delta = row
                .delta
                .map(format_delta)
                .unwrap_or_else(|| "-".to_string());
            println!(
                "{}: {} \u{2192} {} ({})",
                row.respondent,
                opt(row.pre),
                opt(row.post),
                delta
            );
        }
    }

    fn print_header(&self, report: &Report, pre: &Path, post: &Path) {
        println!();
        println!(
            "{}",
            format!(
                "\u{1F4CA} Survey Comparison: {} \u{2192} {}",
                pre.display(),
                post.display()
            )
            .bold()
        );
        println!(
            "   Respondents: {} common (initial {}, final {})",
            report.respondents.len(),
            report.pre_count,
            report.post_count
        );
        println!();
    }

    fn print_respondent_list(&self, report: &Report) {
        println!("   {}", "Common respondents:".bold());
        for id in &report.respondents {
            println!("   {}", id);
        }
        println!();
    }

    fn print_total_row(&self, row: &TotalTrendRow) {
        let delta = match row.delta {
            Some(d) => colorize_delta(d).to_string(),
            None => "-".dimmed().to_string(),
        };
        println!(
            "   {:<12} {:>3} \u{2192} {:<3} {}",
            row.respondent,
            opt(row.pre),
            opt(row.post),
            delta
        );
    }
}

impl Default for ConsoleReporter {
    fn default() -> Self {
        Self::new()
    }
}

fn opt(value: Option<u32>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
}

/// Format a delta for console: "+2", "-1", or "±0"
pub fn format_delta(delta: i64) -> String {
    if delta > 0 {
        format!("+{}", delta)
    } else if delta < 0 {
        delta.to_string()
    } else {
        "\u{00B1}0".to_string()
    }
}

/// Format a mean delta for console: "+0.25", "-0.50", or "±0.00"
pub fn format_mean_delta(delta: f64) -> String {
    if delta > 0.0 {
        format!("+{:.2}", delta)
    } else if delta < 0.0 {
        format!("{:.2}", delta)
    } else {
        "\u{00B1}0.00".to_string()
    }
}

fn colorize_delta(delta: i64) -> colored::ColoredString {
    let text = format_delta(delta);
    if delta > 0 {
        text.green()
    } else if delta < 0 {
        text.red()
    } else {
        text.dimmed()
    }
}

fn colorize_mean_delta(delta: f64) -> colored::ColoredString {
    let text = format_mean_delta(delta);
    if delta > 0.0 {
        text.green()
    } else if delta < 0.0 {
        text.red()
    } else {
        text.dimmed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // --- format_delta ---

    #[test]
    fn format_delta_positive() {
        assert_eq!(format_delta(2), "+2");
    }

    #[test]
    fn format_delta_negative() {
        assert_eq!(format_delta(-3), "-3");
    }

    #[test]
    fn format_delta_zero() {
        assert_eq!(format_delta(0), "\u{00B1}0");
    }

    // --- format_mean_delta ---

    #[test]
    fn format_mean_delta_positive() {
        assert_eq!(format_mean_delta(0.25), "+0.25");
    }

    #[test]
    fn format_mean_delta_negative() {
        assert_eq!(format_mean_delta(-0.5), "-0.50");
    }

    #[test]
    fn format_mean_delta_zero() {
        assert_eq!(format_mean_delta(0.0), "\u{00B1}0.00");
    }

    #[test]
    fn opt_renders_missing_as_dash() {
        assert_eq!(opt(None), "-");
        assert_eq!(opt(Some(7)), "7");
    }
}
