use clap::Parser;
use tagpick::cli::commands::Cli;
use tagpick::cli::handlers;
use tagpick::io::{config_io, logging};

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let cwd = std::env::current_dir()?;
    let resolved = config_io::load_config(cli.config.as_deref(), &cwd)?;

    // Logging failures are not fatal; the tool works without a log file
    if let Err(e) = logging::init(&resolved.log_path, &resolved.config.log.level) {
        eprintln!(
            "warning: cannot open log file {}: {}",
            resolved.log_path.display(),
            e
        );
    }
    tracing::info!(
        config = ?resolved.source,
        store = %resolved.store_path.display(),
        "config resolved"
    );

    match cli.command {
        // No subcommand → launch TUI
        None => tagpick::tui::run(&resolved, cli.ephemeral),
        Some(command) => handlers::dispatch(command, &resolved, cli.json, cli.ephemeral),
    }
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
