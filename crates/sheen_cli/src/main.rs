//! Sheen CLI
//!
//! Command-line tools for widget style sheets:
//! - `sheen check`: parse a sheet and report diagnostics
//! - `sheen resolve`: compute the style a widget would receive
//! - `sheen gallery`: browse the built-in style variants
//! - `sheen config`: print the effective configuration

mod check;
mod config;
mod gallery;
mod resolve;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use sheen_gallery::Gallery;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::SheenConfig;

#[derive(Parser)]
#[command(name = "sheen")]
#[command(author, version, about = "Widget style sheet tools", long_about = None)]
struct Cli {
    /// Config file (defaults to ./sheen.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a style sheet and report errors and warnings
    Check {
        /// Style sheet file
        file: PathBuf,
    },

    /// Print the computed style of a widget
    Resolve(resolve::ResolveArgs),

    /// List gallery kinds and variants, or print a variant's sheet
    Gallery(gallery::GalleryArgs),

    /// Print the effective configuration as TOML
    Config,
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env("SHEEN_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn read_sheet(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = SheenConfig::load(cli.config.as_deref())?;
    let mut stdout = io::stdout().lock();

    match cli.command {
        Commands::Check { file } => {
            info!("Checking {}", file.display());
            let css = read_sheet(&file)?;
            let summary = check::run(
                &file.display().to_string(),
                &css,
                &config.engine,
                &mut stdout,
            )?;
            if !summary.is_clean() {
                anyhow::bail!(
                    "{} error(s) in {}",
                    summary.errors,
                    file.display()
                );
            }
        }
        Commands::Resolve(args) => {
            let css = read_sheet(&args.file)?;
            resolve::run(
                &args,
                &css,
                &config.engine,
                &mut stdout,
                &mut io::stderr(),
            )?;
        }
        Commands::Gallery(args) => {
            let gallery = Gallery::embedded().context("Failed to load the style gallery")?;
            gallery::run(&args, &gallery, &mut stdout)?;
        }
        Commands::Config => {
            write!(stdout, "{}", config.to_toml()?)?;
        }
    }

    Ok(())
}
