use std::{io, path::PathBuf, sync::Arc};

mod backend_bridge;
mod config;
mod controller;
mod media;
mod shell;

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use client_core::{GeminiClient, ImageGenerator};
use crossbeam_channel::bounded;
use shared::domain::{AspectRatio, Function, ImageSlot, Mode};
use tracing_subscriber::EnvFilter;

use crate::{backend_bridge::commands::BackendCommand, controller::events::UiEvent, shell::Shell};

#[derive(Parser, Debug)]
#[command(name = "gerador", version, about = "Prompt-driven image creation and editing")]
struct Args {
    /// TOML settings file (defaults to ./gerador.toml when present).
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[arg(long, global = true)]
    api_key: Option<String>,
    /// Directory for saved results.
    #[arg(long, global = true)]
    out: Option<PathBuf>,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Interactive session (default).
    Session,
    /// Run one generation and save the result.
    Generate(GenerateArgs),
}

#[derive(clap::Args, Debug)]
struct GenerateArgs {
    #[arg(long, default_value = "")]
    prompt: String,
    #[arg(long, default_value = "create")]
    mode: Mode,
    /// Function tag; defaults to the mode's first function.
    #[arg(long)]
    function: Option<Function>,
    #[arg(long, default_value = "1:1")]
    ratio: AspectRatio,
    #[arg(long)]
    image1: Option<PathBuf>,
    #[arg(long)]
    image2: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();
    let args = Args::parse();

    let mut settings = config::load_settings(args.config.as_deref())?;
    if let Some(api_key) = args.api_key {
        settings.api_key = Some(api_key);
    }
    if let Some(out) = args.out {
        settings.output_dir = out;
    }
    if settings.api_key.is_none() {
        tracing::warn!("no API key configured; generation requests will fail");
    }

    let generator: Arc<dyn ImageGenerator> =
        Arc::new(GeminiClient::new(settings.gemini_config()));
    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(16);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(64);
    let worker = backend_bridge::runtime::launch(generator, cmd_rx, ui_tx);

    let mut shell = Shell::new(cmd_tx, ui_rx, settings.output_dir.clone());
    let outcome = match args.command.unwrap_or(Command::Session) {
        Command::Session => shell.run(io::stdin().lock(), &mut io::stdout()),
        Command::Generate(generate) => generate_once(&mut shell, generate),
    };

    drop(shell);
    worker
        .join()
        .map_err(|_| anyhow!("backend worker panicked"))?;
    outcome
}

fn generate_once(shell: &mut Shell, args: GenerateArgs) -> Result<()> {
    let state = shell.state_mut();
    state.set_mode(args.mode);
    if let Some(function) = args.function {
        state.select_function(function);
    }
    state.select_aspect_ratio(args.ratio);
    state.set_prompt(args.prompt);

    for (slot, path) in [(ImageSlot::First, args.image1), (ImageSlot::Second, args.image2)] {
        let Some(path) = path else { continue };
        if state.mode != Mode::Edit {
            bail!("reference images require --mode edit");
        }
        let image = media::load_image(&path)?;
        state.set_image(slot, image);
    }

    if !state.can_generate() {
        bail!("--prompt must not be empty in create mode");
    }

    let mut stdout = io::stdout();
    if !shell.generate(&mut stdout)? {
        bail!("no image was generated");
    }
    shell
        .save(None, &mut stdout)?
        .context("result image could not be saved")?;
    Ok(())
}
