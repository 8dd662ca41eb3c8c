use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use domainterm::cli::commands::{results, run, social};
use domainterm::TermError;
use domainterm::constants::pipeline::DEFAULT_RESULTS_LIMIT;

#[derive(Parser)]
#[command(name = "domainterm")]
#[command(
    version,
    about = "DomainTerm - An intelligent domain name discovery tool"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[arg(long, short, global = true, help = "Config file (default: domainterm.toml)")]
    config: Option<PathBuf>,

    #[arg(long, global = true)]
    verbose: bool,

    #[arg(long, short, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the discovery pipeline until Ctrl+C
    Run {
        #[arg(long = "min", alias = "min-length", help = "Minimum domain length")]
        min_length: Option<usize>,
        #[arg(long = "max", alias = "max-length", help = "Maximum domain length")]
        max_length: Option<usize>,
    },

    /// Show top available domains from the cache
    Results {
        #[arg(long, short, default_value_t = DEFAULT_RESULTS_LIMIT, help = "Rows to show")]
        limit: usize,
    },

    /// Check a handle on every supported social platform
    Social {
        #[arg(help = "Handle to check")]
        name: String,
    },
}

/// Set up panic handler for graceful error reporting
fn setup_panic_handler() {
    let default_hook = std::panic::take_hook();

    std::panic::set_hook(Box::new(move |panic_info| {
        let message = if let Some(s) = panic_info.payload().downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = panic_info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic".to_string()
        };

        eprintln!("\n\x1b[1;31m━━━ PANIC ━━━\x1b[0m");
        eprintln!("\x1b[31mDomainTerm encountered an unexpected error:\x1b[0m");
        eprintln!("  {}", message);

        if let Some(location) = panic_info.location() {
            eprintln!(
                "\x1b[90mLocation: {}:{}:{}\x1b[0m",
                location.file(),
                location.line(),
                location.column()
            );
        }
        eprintln!();

        // Backtrace when RUST_BACKTRACE=1
        default_hook(panic_info);
    }));
}

fn main() -> ExitCode {
    setup_panic_handler();

    match run_cli() {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("\x1b[31mError:\x1b[0m {}", e);
            if let Some(hint) = e.downcast_ref::<TermError>().and_then(TermError::hint) {
                eprintln!("{}", hint);
            }
            ExitCode::FAILURE
        }
    }
}

/// Returns `false` when the command completed with a negative answer
fn run_cli() -> anyhow::Result<bool> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = cli.config.as_deref();
    let Some(command) = cli.command else {
        use clap::CommandFactory;
        Cli::command().print_help()?;
        return Ok(true);
    };

    match command {
        Commands::Run {
            min_length,
            max_length,
        } => {
            run::run(
                config,
                run::RunOptions {
                    min_length,
                    max_length,
                },
            )?;
        }
        Commands::Results { limit } => {
            results::run(config, limit)?;
        }
        Commands::Social { name } => {
            return Ok(social::run(config, &name)?);
        }
    }

    Ok(true)
}
