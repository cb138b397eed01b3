//! Line-oriented front end: parses typed commands and drives the controller.

use std::{
    io::{BufRead, Write},
    path::{Path, PathBuf},
};

use anyhow::{bail, Result};
use crossbeam_channel::{Receiver, Sender};
use shared::{
    domain::{AspectRatio, Function, ImageData, ImageSlot, Mode},
    error::ParseTagError,
};
use thiserror::Error;

use crate::{
    backend_bridge::commands::BackendCommand,
    controller::{
        events::{UiError, UiErrorContext, UiEvent},
        orchestration::dispatch_backend_command,
        reducer::SessionState,
    },
    media,
};

const HELP: &str = "\
commands:
  mode create|edit        switch mode (resets function and images)
  function <tag>          free, sticker, text, comic | add-remove, retouch, style, compose
  ratio <W:H>             1:1, 3:4, 4:3, 9:16, 16:9
  prompt <text>           describe your design
  image <1|2> <path>      load a reference image (edit mode; slot 2 for compose)
  generate                send the request
  edit                    keep editing the current result
  save [dir]              write the current result as gerador30-<timestamp>.png
  show                    print the current session
  help                    this text
  quit                    leave";

#[derive(Debug, Clone, PartialEq)]
pub enum ShellCommand {
    Mode(Mode),
    Function(Function),
    Ratio(AspectRatio),
    Prompt(String),
    Image { slot: ImageSlot, path: PathBuf },
    Generate,
    Edit,
    Save(Option<PathBuf>),
    Show,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShellError {
    #[error("unknown command '{0}' (try `help`)")]
    UnknownCommand(String),
    #[error("missing {0}")]
    MissingArgument(&'static str),
    #[error(transparent)]
    InvalidArgument(#[from] ParseTagError),
}

/// Parses one input line. Blank lines yield `Ok(None)`.
pub fn parse_line(line: &str) -> Result<Option<ShellCommand>, ShellError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };
    let required = |what: &'static str| {
        if rest.is_empty() {
            Err(ShellError::MissingArgument(what))
        } else {
            Ok(rest)
        }
    };

    let command = match word.to_ascii_lowercase().as_str() {
        "mode" => ShellCommand::Mode(required("mode")?.parse()?),
        "function" | "fn" => ShellCommand::Function(required("function tag")?.parse()?),
        "ratio" => ShellCommand::Ratio(required("aspect ratio")?.parse()?),
        // The prompt is kept verbatim; clearing it is allowed.
        "prompt" => ShellCommand::Prompt(rest.to_string()),
        "image" => {
            let (slot, path) = required("image slot and path")?
                .split_once(char::is_whitespace)
                .ok_or(ShellError::MissingArgument("image path"))?;
            ShellCommand::Image {
                slot: slot.parse()?,
                path: PathBuf::from(path.trim()),
            }
        }
        "generate" | "gen" => ShellCommand::Generate,
        "edit" => ShellCommand::Edit,
        "save" | "download" => {
            ShellCommand::Save((!rest.is_empty()).then(|| PathBuf::from(rest)))
        }
        "show" | "status" => ShellCommand::Show,
        "help" | "?" => ShellCommand::Help,
        "quit" | "exit" => ShellCommand::Quit,
        other => return Err(ShellError::UnknownCommand(other.to_string())),
    };
    Ok(Some(command))
}

pub struct Shell {
    state: SessionState,
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    output_dir: PathBuf,
    status: String,
}

impl Shell {
    pub fn new(
        cmd_tx: Sender<BackendCommand>,
        ui_rx: Receiver<UiEvent>,
        output_dir: PathBuf,
    ) -> Self {
        Self {
            state: SessionState::default(),
            cmd_tx,
            ui_rx,
            output_dir,
            status: String::new(),
        }
    }

    pub fn state_mut(&mut self) -> &mut SessionState {
        &mut self.state
    }

    /// Reads commands until `quit` or end of input.
    pub fn run(&mut self, input: impl BufRead, out: &mut impl Write) -> Result<()> {
        writeln!(out, "gerador studio. Type `help` for commands.")?;
        for line in input.lines() {
            let line = line?;
            match parse_line(&line) {
                Ok(None) => {}
                Ok(Some(command)) => {
                    if !self.execute(command, out)? {
                        break;
                    }
                }
                Err(err) => writeln!(out, "{err}")?,
            }
        }
        Ok(())
    }

    /// Applies one command. Returns false when the shell should exit.
    pub fn execute(&mut self, command: ShellCommand, out: &mut impl Write) -> Result<bool> {
        match command {
            ShellCommand::Mode(mode) => {
                self.state.set_mode(mode);
                let available: Vec<&str> =
                    mode.functions().iter().map(|function| function.as_str()).collect();
                writeln!(
                    out,
                    "mode {mode}, function {} (available: {})",
                    self.state.selected_function.label(),
                    available.join(", ")
                )?;
            }
            ShellCommand::Function(function) => {
                self.state.select_function(function);
                writeln!(out, "function {}", function.label())?;
            }
            ShellCommand::Ratio(ratio) => {
                self.state.select_aspect_ratio(ratio);
                writeln!(out, "ratio {ratio}")?;
            }
            ShellCommand::Prompt(text) => self.state.set_prompt(text),
            ShellCommand::Image { slot, path } => self.load_image(slot, &path, out)?,
            ShellCommand::Generate => {
                self.generate(out)?;
            }
            ShellCommand::Edit => {
                if self.state.promote_result_to_edit_source() {
                    writeln!(out, "result moved to image 1; mode edit, function RETOUCH")?;
                } else {
                    writeln!(out, "nothing to edit yet")?;
                }
            }
            ShellCommand::Save(dir) => {
                self.save(dir, out)?;
            }
            ShellCommand::Show => self.show(out)?,
            ShellCommand::Help => writeln!(out, "{HELP}")?,
            ShellCommand::Quit => return Ok(false),
        }
        Ok(true)
    }

    fn load_image(
        &mut self,
        slot: ImageSlot,
        path: &Path,
        out: &mut impl Write,
    ) -> Result<()> {
        if self.state.mode != Mode::Edit {
            writeln!(out, "images are used in edit mode; run `mode edit` first")?;
            return Ok(());
        }
        if slot == ImageSlot::Second && !self.state.selected_function.uses_second_image() {
            writeln!(out, "slot 2 is only used by `function compose`")?;
            return Ok(());
        }

        match media::load_image(path) {
            Ok(image) => {
                writeln!(out, "image {} loaded ({})", slot_number(slot), image.mime_type)?;
                self.state.set_image(slot, image);
            }
            Err(err) => {
                let err = UiError::from_message(UiErrorContext::Upload, format!("{err:#}"));
                writeln!(out, "{}", err.summary())?;
            }
        }
        Ok(())
    }

    /// Runs one generation cycle. Returns true when a result image was produced.
    pub fn generate(&mut self, out: &mut impl Write) -> Result<bool> {
        if self.state.is_loading {
            writeln!(out, "a generation is already running")?;
            return Ok(false);
        }
        let Some(request) = self.state.begin_generate() else {
            tracing::debug!("blank prompt in create mode; nothing dispatched");
            return Ok(false);
        };

        writeln!(out, "{}", self.state.status_message)?;
        if !dispatch_backend_command(
            &self.cmd_tx,
            BackendCommand::Generate(request),
            &mut self.status,
        ) {
            self.state.is_loading = false;
            let err = UiError::from_message(UiErrorContext::Generate, self.status.clone());
            writeln!(out, "{}", err.summary())?;
            return Ok(false);
        }

        loop {
            match self.next_event() {
                Some(UiEvent::GenerationFinished(outcome)) => {
                    self.state.complete_generate(outcome);
                    break;
                }
                Some(UiEvent::Error(err)) => writeln!(out, "{}", err.summary())?,
                Some(_) => {}
                None => {
                    self.state.is_loading = false;
                    bail!("backend worker stopped during generation");
                }
            }
        }

        match self.state.result_image.as_deref() {
            Some(uri) => {
                let media_type = ImageData::from_data_uri(uri)
                    .map(|image| image.mime_type)
                    .unwrap_or_else(|_| "unknown type".to_string());
                writeln!(
                    out,
                    "result ready ({media_type}); `save` to download, `edit` to keep editing"
                )?;
                Ok(true)
            }
            None => {
                writeln!(out, "no result")?;
                Ok(false)
            }
        }
    }

    /// Saves the current result. Returns the written path on success.
    pub fn save(
        &mut self,
        dir: Option<PathBuf>,
        out: &mut impl Write,
    ) -> Result<Option<PathBuf>> {
        let Some(data_uri) = self.state.download_target() else {
            writeln!(out, "nothing to save yet")?;
            return Ok(None);
        };
        let command = BackendCommand::Download {
            data_uri: data_uri.to_string(),
            dir: dir.unwrap_or_else(|| self.output_dir.clone()),
        };
        if !dispatch_backend_command(&self.cmd_tx, command, &mut self.status) {
            let err = UiError::from_message(UiErrorContext::Download, self.status.clone());
            writeln!(out, "{}", err.summary())?;
            return Ok(None);
        }

        loop {
            match self.next_event() {
                Some(UiEvent::Saved(path)) => {
                    writeln!(out, "saved {}", path.display())?;
                    return Ok(Some(path));
                }
                Some(UiEvent::Error(err)) => {
                    writeln!(out, "{}", err.summary())?;
                    return Ok(None);
                }
                Some(_) => {}
                None => bail!("backend worker stopped during save"),
            }
        }
    }

    fn show(&self, out: &mut impl Write) -> Result<()> {
        let state = &self.state;
        writeln!(out, "mode:     {}", state.mode)?;
        writeln!(
            out,
            "function: {} ({})",
            state.selected_function.label(),
            state.selected_function
        )?;
        writeln!(out, "ratio:    {}", state.aspect_ratio)?;
        writeln!(out, "prompt:   {}", state.prompt)?;
        for (slot, image) in [(1, &state.image1), (2, &state.image2)] {
            if let Some(image) = image {
                writeln!(
                    out,
                    "image {slot}:  {} ({} base64 chars)",
                    image.mime_type,
                    image.base64.len()
                )?;
            }
        }
        let result = if state.result_image.is_some() {
            "ready"
        } else {
            "none"
        };
        writeln!(out, "result:   {result}")?;
        Ok(())
    }

    fn next_event(&self) -> Option<UiEvent> {
        loop {
            match self.ui_rx.recv().ok()? {
                UiEvent::Info(message) => tracing::debug!("{message}"),
                event => return Some(event),
            }
        }
    }
}

fn slot_number(slot: ImageSlot) -> u8 {
    match slot {
        ImageSlot::First => 1,
        ImageSlot::Second => 2,
    }
}

#[cfg(test)]
#[path = "tests/shell_tests.rs"]
mod tests;
