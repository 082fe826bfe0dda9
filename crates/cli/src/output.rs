//! Output formatting for CLI

use clap::ValueEnum;
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};

use journeycheck_common::{TestResult, TestSuiteResult};

/// Output format
#[derive(Debug, Clone, Copy, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable table format
    #[default]
    Table,
    /// JSON format
    Json,
}

const ERROR_WIDTH: usize = 80;

/// Print suite results
pub fn print_suite(suite: &TestSuiteResult, format: OutputFormat) {
    match format {
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic);

            table.set_header(vec!["Test", "Result", "Duration", "Error"]);
            for result in &suite.results {
                table.add_row(row(result));
            }

            println!("{table}");
            print_artifacts(suite);
            print_summary(suite);
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(suite).unwrap_or_default());
        }
    }
}

fn row(result: &TestResult) -> Vec<String> {
    let outcome = if result.success {
        "✓ passed".green().to_string()
    } else {
        "✗ failed".red().to_string()
    };
    vec![
        result.name.clone(),
        outcome,
        format_duration(result.duration_ms),
        result.error.as_deref().map(summarize_error).unwrap_or_default(),
    ]
}

fn print_artifacts(suite: &TestSuiteResult) {
    for result in suite.results.iter().filter(|r| !r.artifacts.is_empty()) {
        println!("{} {}", "Artifacts for".dimmed(), result.name.bold());
        for artifact in &result.artifacts {
            println!("  {}", artifact.display());
        }
    }
}

fn print_summary(suite: &TestSuiteResult) {
    let summary = format!(
        "{} passed, {} failed, {} total in {}",
        suite.passed,
        suite.failed,
        suite.total,
        format_duration(suite.duration_ms)
    );
    if suite.all_passed() {
        print_success(&summary);
    } else {
        print_error(&summary);
    }
}

/// First line of an error, shortened to fit a table cell
fn summarize_error(error: &str) -> String {
    let line = error.lines().next().unwrap_or_default();
    if line.chars().count() <= ERROR_WIDTH {
        return line.to_string();
    }
    let mut short: String = line.chars().take(ERROR_WIDTH - 1).collect();
    short.push('…');
    short
}

fn format_duration(ms: u64) -> String {
    if ms < 1000 {
        format!("{}ms", ms)
    } else {
        format!("{:.2}s", ms as f64 / 1000.0)
    }
}

/// Print success message
pub fn print_success(message: &str) {
    println!("✅ {}", message);
}

/// Print error message
pub fn print_error(message: &str) {
    eprintln!("❌ {}", message);
}
