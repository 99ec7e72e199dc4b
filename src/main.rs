//! Hybrid Todo CLI entry point.

use clap::Parser;
use htodo::cli::commands;
use htodo::cli::{Cli, Commands, OutputFormat};
use htodo::error::Error;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.silent {
        htodo::SILENT.store(true, std::sync::atomic::Ordering::Relaxed);
    }
    if cli.format == OutputFormat::Csv {
        htodo::CSV_OUTPUT.store(true, std::sync::atomic::Ordering::Relaxed);
    }
    if cli.no_color {
        colored::control::set_override(false);
    }

    // Set up tracing based on verbosity
    init_tracing(cli.verbose, cli.quiet);

    // Resolve effective JSON mode: --json OR --format json OR non-TTY stdout
    let json = cli.json
        || cli.format == OutputFormat::Json
        || !std::io::IsTerminal::is_terminal(&std::io::stdout());

    match run(&cli, json) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if json {
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
            2 => EnvFilter::new("debug,rusqlite=info,hyper=info,reqwest=info"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

fn run(cli: &Cli, json: bool) -> Result<(), Error> {
    let store = cli.store.as_ref();
    let endpoint = cli.endpoint.as_deref();

    match &cli.command {
        Commands::List(view) => commands::list::execute(view, store, endpoint, json),

        // Local mutations
        Commands::Add { text } => commands::todo::add(text, store, endpoint, json),
        Commands::Edit { id, text } => commands::todo::edit(*id, text, store, endpoint, json),
        Commands::Toggle { id } => commands::todo::toggle(*id, store, endpoint, json),
        Commands::Delete { id, view } => {
            commands::todo::delete(*id, view, store, endpoint, json)
        }
        Commands::Reset { yes } => commands::reset::execute(*yes, store, endpoint, json),

        Commands::Patches => commands::patches::execute(store, json),
        Commands::Config { command } => commands::config::execute(command, store, endpoint, json),
        Commands::Version => commands::version::execute(json),

        // Shell completions
        Commands::Completions { shell } => commands::completions::execute(shell),
    }
}
