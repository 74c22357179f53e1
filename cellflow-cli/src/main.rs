mod config;
mod errors;
mod logging;
mod render;
mod runner;
mod tui;

use std::path::PathBuf;

use cellflow::Notebook;
use clap::{Parser, Subcommand};
use tracing::{debug, info};

use crate::config::AppConfig;
use crate::errors::Result;

#[derive(Parser)]
#[command(name = "cellflow")]
#[command(version)]
#[command(about = "A reactive sample-size notebook for the terminal")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Seed for the noise source, for reproducible datasets
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Starting sample size
    #[arg(long, global = true, allow_negative_numbers = true)]
    sample_size: Option<i64>,

    /// Config file to use instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand, Clone, Copy, PartialEq, Eq)]
enum Commands {
    /// Interactive terminal UI (default)
    Tui,
    /// Line-based runner
    Repl,
    /// Evaluate once and print the report
    Report {
        /// Print every cell value as JSON
        #[arg(long)]
        json: bool,
    },
    /// Write the default config file
    InitConfig {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let command = cli.command.unwrap_or(Commands::Tui);
    let _log_guard = logging::init(command == Commands::Tui)?;

    if let Commands::InitConfig { force } = command {
        let path = config::write_default(cli.config.as_deref(), force)?;
        println!("Wrote {}", path.display());
        return Ok(());
    }

    let app_config = config::load(cli.config.as_deref())?;
    let mut notebook = Notebook::new(notebook_config(&app_config, &cli))?;
    info!(sample_size = notebook.sample_size()?, "notebook ready");

    match command {
        Commands::Tui => tui::run(&mut notebook, &app_config.keybindings).await?,
        Commands::Repl => runner::run_repl(&mut notebook).await?,
        Commands::Report { json } => print_report(&notebook, json)?,
        Commands::InitConfig { .. } => {}
    }

    Ok(())
}

/// Notebook settings from the config file with command-line overrides.
///
/// The start size is snapped onto the slider grid so `reset` lands on it too.
fn notebook_config(app_config: &AppConfig, cli: &Cli) -> cellflow::Config {
    let mut config = app_config.notebook.clone();
    if let Some(seed) = cli.seed {
        config = config.seed(seed);
    }
    if let Some(sample_size) = cli.sample_size {
        config = config.default_sample_size(sample_size);
    }

    let start = config.snap(config.default_sample_size);
    if start != config.default_sample_size {
        debug!(requested = config.default_sample_size, start, "start size snapped to the slider");
    }
    config.default_sample_size(start)
}

fn print_report(notebook: &Notebook, json: bool) -> Result<()> {
    if json {
        let snapshot = notebook.snapshot()?;
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
        return Ok(());
    }

    let stats = notebook.statistics()?;
    let report = notebook.report()?;
    for line in render::statistics_lines(&stats) {
        println!("{}", line);
    }
    println!();
    println!("{}", render::report_text(&report));
    Ok(())
}
