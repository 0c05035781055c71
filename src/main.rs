//! cpcat CLI entry point.

use clap::Parser;
use cpcat::cli::commands;
use cpcat::cli::{Cli, Commands};
use cpcat::error::Error;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.silent {
        cpcat::SILENT.store(true, std::sync::atomic::Ordering::Relaxed);
    }
    if cli.dry_run {
        cpcat::DRY_RUN.store(true, std::sync::atomic::Ordering::Relaxed);
    }
    if cli.no_color {
        colored::control::set_override(false);
    }

    // Set up tracing based on verbosity
    init_tracing(cli.verbose, cli.quiet);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if cli.json {
                eprintln!("{}", e.to_structured_json());
            } else if !cli.quiet {
                if let Some(hint) = e.hint() {
                    eprintln!("Error: {e}\n  Hint: {hint}");
                } else {
                    eprintln!("Error: {e}");
                }
            }
            ExitCode::from(e.exit_code())
        }
    }
}

fn init_tracing(verbose: u8, quiet: bool) {
    use tracing_subscriber::EnvFilter;

    if quiet {
        return;
    }

    // Honor RUST_LOG if set, otherwise use verbosity flag
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        match verbose {
            0 => EnvFilter::new("warn"),
            1 => EnvFilter::new("info"),
            2 => EnvFilter::new("debug,rusqlite=info"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

fn run(cli: &Cli) -> Result<(), Error> {
    let db = cli.db.as_deref();
    let json = cli.json;

    match &cli.command {
        Commands::Init { force } => commands::init::execute(*force, db, json),
        Commands::Version => commands::version::execute(json),

        // Problems
        Commands::Add(args) => commands::problem::add(args, db, json),
        Commands::Edit { id, args } => commands::problem::edit(*id, args, db, json),
        Commands::Show { id } => commands::problem::show(*id, db, json),
        Commands::List(args) => commands::problem::list(args, db, json),
        Commands::Delete { ids } => commands::problem::delete(ids, db, json),

        // Exchange files
        Commands::Export { format, path, ids } => {
            commands::sync::export(*format, path, ids, db, json)
        }
        Commands::Import { path } => commands::sync::import(path, db, json),

        Commands::Stats { by, top } => commands::stats::execute(*by, *top, db, json),
        Commands::Check { reset } => commands::check::execute(*reset, db, json),
        Commands::Completions { shell } => commands::completions::execute(shell),
    }
}
