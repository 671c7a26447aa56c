//! Aurora Dia CLI
//!
//! Headless tooling for the mascot engine: replay pointer/scheme scenarios
//! on a virtual clock and inspect the style variables a theme resolves to.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dia_mascot::MascotOptions;
use dia_theme::{detect_system_color_scheme, resolve, ColorScheme, ThemeConfig};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod report;
mod runner;
mod scenario;

use scenario::Scenario;

#[derive(Parser)]
#[command(name = "aurora-dia")]
#[command(author, version, about = "Aurora Dia mascot engine tools")]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a JSON scenario against a headless mascot
    Run {
        /// Scenario file
        scenario: PathBuf,

        /// Mascot options file (TOML, or JSON by extension)
        #[arg(short, long)]
        options: Option<PathBuf>,

        /// Print the report as a single JSON line
        #[arg(long)]
        compact: bool,
    },

    /// Print the style variables a theme resolves to
    Resolve {
        /// Ambient scheme (light or dark); detected from the environment when omitted
        #[arg(short, long)]
        scheme: Option<ColorScheme>,

        /// Theme file (TOML); the stock theme when omitted
        #[arg(short, long)]
        theme: Option<PathBuf>,

        /// Print an inline CSS declaration list instead of JSON
        #[arg(long)]
        css: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    match cli.command {
        Commands::Run {
            scenario,
            options,
            compact,
        } => cmd_run(&scenario, options.as_deref(), compact),
        Commands::Resolve { scheme, theme, css } => cmd_resolve(scheme, theme.as_deref(), css),
    }
}

fn cmd_run(path: &Path, options: Option<&Path>, compact: bool) -> Result<()> {
    let scenario = Scenario::from_path(path)?;
    let options = match options {
        Some(p) => MascotOptions::from_path(p)
            .with_context(|| format!("failed to load options from {}", p.display()))?,
        None => MascotOptions::default(),
    };

    info!("Running {} ({} steps)", path.display(), scenario.steps.len());
    let outcome = runner::run_scenario(&scenario, options);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for snapshot in &outcome.snapshots {
        serde_json::to_writer(&mut out, snapshot)?;
        out.write_all(b"\n")?;
    }
    outcome.report.write_json(&mut out, compact)?;
    out.flush()?;

    if let Some(failure) = &outcome.report.failure {
        anyhow::bail!(
            "scenario failed at step {} ({}): {}",
            failure.step_index,
            failure.step,
            failure.message
        );
    }
    Ok(())
}

fn cmd_resolve(scheme: Option<ColorScheme>, theme: Option<&Path>, css: bool) -> Result<()> {
    let theme = match theme {
        Some(p) => load_theme(p)?,
        None => ThemeConfig::default(),
    };
    if let Err(err) = theme.validate() {
        tracing::warn!("{}", err);
    }

    let scheme = scheme.unwrap_or_else(detect_system_color_scheme);
    info!("Resolving for {} scheme", scheme);
    let vars = resolve(&theme, scheme);

    if css {
        println!("{}", vars.to_inline_css());
    } else {
        println!("{}", serde_json::to_string_pretty(&vars)?);
    }
    Ok(())
}

fn load_theme(path: &Path) -> Result<ThemeConfig> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read theme {}", path.display()))?;
    toml::from_str(&raw).with_context(|| format!("invalid theme {}", path.display()))
}
