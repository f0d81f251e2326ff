#![forbid(unsafe_code)]

mod cmd;
mod output;

use clap::{CommandFactory, Parser, Subcommand};
use output::{CliError, OutputMode, render_error, resolve_output_mode};
use shelf_core::config::{self, UserConfig};
use shelf_core::{CatalogStore, ErrorCode};
use std::env;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "shelf: bounded media backlogs, one catalog per file",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format.
    #[arg(long, global = true, value_enum)]
    format: Option<OutputMode>,

    /// Shorthand for `--format json`.
    #[arg(long, global = true, hide = true)]
    json: bool,

    /// Directory holding `.shelf` files (overrides SHELF_DIR and config).
    #[arg(long, global = true, value_name = "PATH")]
    dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        next_help_heading = "Catalogs",
        about = "Create an empty catalog",
        after_help = "EXAMPLES:\n    # Start a new catalog\n    shelf new media\n\n    # Replace an existing one\n    shelf new media --force"
    )]
    New(cmd::new::NewArgs),

    #[command(
        next_help_heading = "Catalogs",
        about = "List saved catalogs",
        after_help = "EXAMPLES:\n    shelf catalogs\n    shelf catalogs --json"
    )]
    Catalogs,

    #[command(
        next_help_heading = "Catalogs",
        about = "Show a catalog",
        long_about = "Show every category's backlog and recent completions. Positions shown here are the ones other commands take.",
        after_help = "EXAMPLES:\n    # Whole catalog\n    shelf show media\n\n    # One category, backlog sorted by price\n    shelf show media --category Books --sort price"
    )]
    Show(cmd::show::ShowArgs),

    #[command(
        next_help_heading = "Catalogs",
        about = "Add, remove or rename categories",
        after_help = "EXAMPLES:\n    shelf category add media Books\n    shelf category rename media Books Novels\n    shelf category remove media Novels"
    )]
    Category(cmd::category::CategoryArgs),

    #[command(
        next_help_heading = "Items",
        about = "Add, edit or remove items",
        after_help = "EXAMPLES:\n    shelf item add media Books --name Dune --author Herbert --genre SF --price 9.99 --release 1965 --priority 4\n    shelf item edit media Books 1 --priority 5\n    shelf item remove media Books 1"
    )]
    Item(cmd::item::ItemArgs),

    #[command(
        next_help_heading = "Items",
        about = "Mark a backlog item complete",
        after_help = "EXAMPLES:\n    # Complete the first backlog item\n    shelf done media Books 1"
    )]
    Done(cmd::done::DoneArgs),

    #[command(
        next_help_heading = "Items",
        about = "Move a completed item back to the backlog",
        after_help = "EXAMPLES:\n    shelf reopen media Books 1"
    )]
    Reopen(cmd::reopen::ReopenArgs),

    #[command(
        next_help_heading = "Maintenance",
        about = "Generate shell completion scripts",
        after_help = "EXAMPLES:\n    shelf completions bash\n    shelf completions zsh"
    )]
    Completions(cmd::completions::CompletionsArgs),
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env("SHELF_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if verbose || env::var("DEBUG").is_ok() {
            "shelf=debug,info"
        } else {
            "shelf=info,warn"
        })
    });

    let format = env::var("SHELF_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}

fn run(cli: Cli, config: &UserConfig, output: OutputMode) -> anyhow::Result<()> {
    let dir = config::resolve_data_dir(cli.dir.as_deref(), config);
    debug!(dir = %dir.display(), ?output, "resolved data directory");
    let ctx = cmd::Context {
        store: CatalogStore::new(dir),
        output,
        default_catalog: config.default_catalog.clone(),
    };

    match cli.command {
        Commands::New(ref args) => cmd::new::run_new(args, &ctx),
        Commands::Catalogs => cmd::catalogs::run_catalogs(&ctx),
        Commands::Show(ref args) => cmd::show::run_show(args, &ctx),
        Commands::Category(ref args) => cmd::category::run_category(args, &ctx),
        Commands::Item(args) => cmd::item::run_item(args, &ctx),
        Commands::Done(ref args) => cmd::done::run_done(args, &ctx),
        Commands::Reopen(ref args) => cmd::reopen::run_reopen(args, &ctx),
        Commands::Completions(ref args) => {
            let mut command = Cli::command();
            cmd::completions::run_completions(args.shell, &mut command)
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if cli.verbose {
        info!("Verbose mode enabled");
    }

    let config = match config::load_user_config() {
        Ok(config) => config,
        Err(e) => {
            let output = resolve_output_mode(cli.format, cli.json, None);
            let _ = render_error(
                output,
                &CliError::coded(format!("{e:#}"), ErrorCode::ConfigParseError),
            );
            return ExitCode::FAILURE;
        }
    };
    let output = resolve_output_mode(cli.format, cli.json, config.output.as_deref());

    match run(cli, &config, output) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let _ = render_error(output, &CliError::from(&e));
            ExitCode::FAILURE
        }
    }
}
