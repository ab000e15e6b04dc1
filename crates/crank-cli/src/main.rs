mod cmd;
mod output;
mod root;

use clap::{Parser, Subcommand};
use crank_core::CrankError;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "crank",
    about = "Run the named recipes of a crank.yaml manifest",
    version,
    propagate_version = true
)]
struct Cli {
    /// Directory recipes run relative to (default: auto-detect from crank.yaml or .git/)
    #[arg(long, global = true, env = "CRANK_ROOT")]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    /// Print the resolved command instead of running it
    #[arg(long, global = true, short = 'n')]
    dry_run: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the recipes in the manifest
    List,

    /// Show the command a recipe would run, without running it
    Show {
        recipe: String,
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },

    /// Run a recipe (use when a recipe name collides with a crank command)
    Run {
        recipe: String,
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },

    /// Write the built-in recipes to crank.yaml
    Init {
        /// Replace an existing crank.yaml
        #[arg(long)]
        force: bool,
    },

    /// Validate the manifest and look for each recipe's program on PATH
    Check,

    /// Run a recipe: crank <recipe> [args...]
    #[command(external_subcommand)]
    Recipe(Vec<String>),
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let root = root::resolve_root(cli.root.as_deref());

    let result = match cli.command {
        Commands::List => cmd::list::run(&root, cli.json),
        Commands::Show { recipe, args } => cmd::show::run(&root, &recipe, &args, cli.json),
        Commands::Run { recipe, args } => {
            cmd::run::run(&root, &recipe, &args, cli.dry_run, cli.json)
        }
        Commands::Init { force } => cmd::init::run(&root, force),
        Commands::Check => cmd::check::run(&root, cli.json),
        Commands::Recipe(argv) => match argv.split_first() {
            Some((recipe, args)) => cmd::run::run(&root, recipe, args, cli.dry_run, cli.json),
            None => Err(anyhow::anyhow!(
                "no recipe specified; run 'crank list'"
            )),
        },
    };

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        let code = e
            .chain()
            .find_map(|cause| cause.downcast_ref::<CrankError>())
            .map_or(1, CrankError::exit_code);
        std::process::exit(code);
    }
}
