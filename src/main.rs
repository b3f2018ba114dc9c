use std::fs::OpenOptions;

use clap::Parser;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use ticklist::cli::commands::Cli;
use ticklist::cli::handlers;
use ticklist::io::config_io;
use ticklist::io::todo_io::DataDir;

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let data_dir = DataDir::resolve(cli.data_dir.as_deref())?;
    data_dir.ensure()?;
    init_logging(&data_dir, cli.verbose);

    match cli.command {
        None => {
            // No subcommand → launch TUI
            let config = config_io::load_config(&data_dir)?;
            log::info!("tick starting in {}", data_dir.root().display());
            ticklist::tui::run(data_dir, config)
        }
        Some(command) => handlers::dispatch(command, cli.json, &data_dir),
    }
}

/// Append log records to `ticklist.log` in the data directory
fn init_logging(data_dir: &DataDir, verbose: bool) {
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    if let Ok(log_file) = OpenOptions::new()
        .create(true)
        .append(true)
        .open(data_dir.log_path())
    {
        let _ = WriteLogger::init(level, log_config, log_file);
    }
}
