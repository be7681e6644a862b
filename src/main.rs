// ============================================================================
// src/main.rs – CLI entry point and interactive flow
// ============================================================================

mod cmd;
mod config;
mod menu;
mod space;
mod sweep;
mod ui;
mod util;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use dialoguer::{Confirm, Input};
use std::path::PathBuf;

use crate::config::ProbeConfig;
use crate::menu::MenuChoice;
use crate::space::Algorithm;
use crate::ui::{Timing, UX};
use crate::util::atomic::atomic_write_toml;

#[derive(Parser)]
#[command(
    name = "hashprobe",
    version,
    about = "Offline PBKDF2 parameter recovery: sweep PRF, iteration and key-length candidates against a known password hash."
)]
struct Cli {
    /// Config file (TOML or YAML); defaults to ./hashprobe.toml when present
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Suppress banner and flourish
    #[arg(long, global = true)]
    quiet: bool,

    /// Skip the paced output delays
    #[arg(long, global = true)]
    fast: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the parameter sweep against the configured target
    Probe(ProbeArgs),
    /// Verify the evaluator against published PBKDF2 vectors
    Selftest,
}

#[derive(Args, Default)]
struct ProbeArgs {
    /// Known plaintext candidate
    #[arg(long)]
    password: Option<String>,

    /// Salt, base64 as stored
    #[arg(long)]
    salt: Option<String>,

    /// Target digest, base64 as stored
    #[arg(long)]
    target: Option<String>,

    /// Iteration ladder, lowest rung first
    #[arg(long, value_delimiter = ',')]
    iterations: Vec<u32>,

    /// PRF roster (sha1, sha256, sha512)
    #[arg(long, value_delimiter = ',')]
    algorithms: Vec<String>,

    /// Extra derived-key length tried for every PRF
    #[arg(long)]
    fallback_dklen: Option<usize>,

    /// Emit the full report as JSON on stdout
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut cfg = ProbeConfig::load_or_default(cli.config.as_deref())?;

    match cli.command {
        Some(Command::Probe(args)) => {
            let json = args.json;
            merge_overrides(&mut cfg, args)?;
            let ui = if json {
                UX::silenced()
            } else {
                UX::new(cli.quiet)
            };
            let timing = Timing::new(cli.fast || cli.quiet || json);
            // Normal termination whether or not a match was found.
            cmd::run_probe(&ui, &timing, &cfg, json)?;
            Ok(())
        }
        Some(Command::Selftest) => {
            let ui = UX::new(cli.quiet);
            let timing = Timing::new(cli.fast || cli.quiet);
            cmd::run_selftest(&ui, &timing)
        }
        None => {
            let interactive = atty::is(atty::Stream::Stdin) && atty::is(atty::Stream::Stdout);
            let ui = UX::new(cli.quiet);
            let timing = Timing::new(cli.fast || cli.quiet);
            if interactive && !cli.quiet {
                menu_loop(&ui, &timing, &mut cfg)
            } else {
                // Non-interactive default: behave like `probe` with the
                // configured target.
                cmd::run_probe(&ui, &timing, &cfg, false)?;
                Ok(())
            }
        }
    }
}

// ----------------------------------------------------------------------------
// CLI override merge
// ----------------------------------------------------------------------------

fn merge_overrides(cfg: &mut ProbeConfig, args: ProbeArgs) -> Result<()> {
    if args.password.is_some() {
        cfg.target.password = args.password;
    }
    if args.salt.is_some() {
        cfg.target.salt_b64 = args.salt;
    }
    if args.target.is_some() {
        cfg.target.hash_b64 = args.target;
    }
    if !args.iterations.is_empty() {
        cfg.search.iterations = args.iterations;
    }
    if !args.algorithms.is_empty() {
        cfg.search.algorithms = args
            .algorithms
            .iter()
            .map(|s| s.parse::<Algorithm>())
            .collect::<Result<Vec<_>, _>>()
            .context("parse --algorithms")?;
    }
    if let Some(dklen) = args.fallback_dklen {
        cfg.search.fallback_dklen = dklen;
    }
    Ok(())
}

// ----------------------------------------------------------------------------
// Interactive flow
// ----------------------------------------------------------------------------

fn menu_loop(ui: &UX, timing: &Timing, cfg: &mut ProbeConfig) -> Result<()> {
    loop {
        match menu::show_main_menu(ui, timing) {
            Some(MenuChoice::Probe) => {
                if let Err(err) = interactive_probe(ui, timing, cfg) {
                    ui.error(&format!("Probe failed: {err:#}"));
                }
            }
            Some(MenuChoice::SelfTest) => {
                if let Err(err) = cmd::run_selftest(ui, timing) {
                    ui.error(&format!("Self-test failed: {err:#}"));
                }
            }
            Some(MenuChoice::Quit) | None => {
                ui.note("Session closed. Nothing retained beyond the audit trail.");
                return Ok(());
            }
        }
        ui.gap();
    }
}

fn interactive_probe(ui: &UX, timing: &Timing, cfg: &mut ProbeConfig) -> Result<()> {
    prompt_missing_inputs(cfg)?;
    let report = cmd::run_probe(ui, timing, cfg, false)?;

    if !report.matched() {
        let broaden = Confirm::new()
            .with_prompt("No match. Broaden the iteration ladder and retry?")
            .default(false)
            .interact()?;
        if broaden {
            let added = cfg.search.broaden();
            ui.info(&format!("Ladder extended with {added} rung(s)."));
            offer_config_persist(ui, cfg)?;
            cmd::run_probe(ui, timing, cfg, false)?;
        }
    }
    Ok(())
}

/// Collect any missing target material before the sweep starts; the
/// values pasted here are exactly what a DBA reads out of the user row.
fn prompt_missing_inputs(cfg: &mut ProbeConfig) -> Result<()> {
    if cfg.target.password.is_none() {
        let value: String = Input::new()
            .with_prompt("Candidate password (plaintext)")
            .interact_text()?;
        cfg.target.password = Some(value);
    }
    if cfg.target.salt_b64.is_none() {
        let value: String = Input::new()
            .with_prompt("Salt (base64, as stored)")
            .interact_text()?;
        cfg.target.salt_b64 = Some(value);
    }
    if cfg.target.hash_b64.is_none() {
        let value: String = Input::new()
            .with_prompt("Target hash (base64, as stored)")
            .interact_text()?;
        cfg.target.hash_b64 = Some(value);
    }
    Ok(())
}

fn offer_config_persist(ui: &UX, cfg: &ProbeConfig) -> Result<()> {
    let Some(path) = cfg.path.clone() else {
        return Ok(());
    };
    let save = Confirm::new()
        .with_prompt(format!("Persist the broadened ladder to {}?", path.display()))
        .default(false)
        .interact()?;
    if save {
        atomic_write_toml(&path, cfg)
            .with_context(|| format!("persist config to {}", path.display()))?;
        ui.success(&format!("Config updated atomically at {}.", path.display()));
    }
    Ok(())
}
