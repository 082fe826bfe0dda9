//! Journeycheck CLI - Main Entry Point
//!
//! Runs the browser journey and ToDo Tasks API suites, prints a per-test
//! summary and writes `test-results.json`.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::debug;

mod commands;
mod output;

use commands::{api, gui};
use journeycheck_common::config::{CONFIG_DIR_VAR, DEFAULT_PROFILE, PROFILE_VAR};
use journeycheck_common::report::write_results;
use journeycheck_common::{init_logging, Settings, TestSuiteResult};

/// Journeycheck - end-to-end checks for the career journey and Task API
#[derive(Parser)]
#[command(name = "journeycheck")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Settings profile, read from <config-dir>/<env>.yaml
    #[arg(long, env = PROFILE_VAR, default_value = DEFAULT_PROFILE, global = true)]
    env: String,

    /// Directory holding the profile settings files
    #[arg(long, env = CONFIG_DIR_VAR, default_value = "config", global = true)]
    config_dir: PathBuf,

    /// Directory for test-results.json and failure artifacts
    #[arg(long, default_value = "test-results", global = true)]
    output: PathBuf,

    /// Output format
    #[arg(long, default_value = "table", global = true)]
    format: output::OutputFormat,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the search → MoroSystems → career journey in a browser
    Gui(gui::GuiArgs),

    /// Run the ToDo Tasks API scenarios
    Api,

    /// Run the browser journey, then the API scenarios
    All(gui::GuiArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(if cli.verbose { "debug" } else { "info" });

    let settings = match Settings::load_profile(&cli.config_dir, &cli.env) {
        Ok(settings) => settings,
        Err(e) => {
            output::print_error(&format!("Configuration error: {}", e));
            std::process::exit(2);
        }
    };

    debug!("Loaded settings for profile '{}'", cli.env);

    let outcome = match &cli.command {
        Commands::Gui(args) => gui::execute(args, &settings, &cli.output).await,
        Commands::Api => api::execute(&settings).await,
        Commands::All(args) => {
            let gui_suite = gui::or_failed_setup(gui::execute(args, &settings, &cli.output).await);
            api::execute(&settings)
                .await
                .map(|api_suite| gui_suite.merge(api_suite))
        }
    };

    let suite = match outcome {
        Ok(suite) => suite,
        Err(e) => {
            output::print_error(&format!("{:#}", e));
            std::process::exit(2);
        }
    };

    write_results(&cli.output, &suite)?;
    output::print_suite(&suite, cli.format);

    match exit_code(&suite) {
        0 => Ok(()),
        code => std::process::exit(code),
    }
}

fn exit_code(suite: &TestSuiteResult) -> i32 {
    if suite.all_passed() {
        0
    } else {
        1
    }
}
