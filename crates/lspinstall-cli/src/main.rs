mod install;
mod list;
mod update;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::process::ExitCode;

use lspinstall_core::{Backends, Environment, SourceRegistry, UserConfig};

#[derive(Parser, Debug)]
#[command(name = "lspinstall")]
#[command(about = "Install and update language servers")]
#[command(version)]
struct Args {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show every known server and whether it is installed
    List(list::ListArgs),

    /// Install one or more servers
    Install(install::InstallArgs),

    /// Update an installed server
    Update(update::UpdateArgs),
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn load_registry() -> Result<SourceRegistry> {
    let env = Environment::detect()?;
    env.ensure_dirs()
        .context("Failed to create the cache and bin directories")?;
    log::debug!("Cache dir: {}", env.cache_dir.display());
    log::debug!("Bin dir: {}", env.bin_dir.display());

    let config = match UserConfig::default_path() {
        Some(path) => UserConfig::load(&path)?,
        None => UserConfig::default(),
    };

    let backends = Backends::system(env)?;
    Ok(SourceRegistry::load(&backends, &config)?)
}

fn run() -> Result<i32> {
    let args = Args::parse();
    init_logging(args.verbose);

    let registry = load_registry()?;

    match args.command {
        Commands::List(args) => list::execute(args, &registry),
        Commands::Install(args) => install::execute(args, &registry),
        Commands::Update(args) => update::execute(args, &registry),
    }
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => ExitCode::from(code as u8),
        Err(e) => {
            eprintln!("{} {}", console::style("Error:").red().bold(), e);
            for cause in e.chain().skip(1) {
                eprintln!("  Caused by: {}", cause);
            }
            ExitCode::FAILURE
        }
    }
}
