//! Backend-to-UI events and error modeling for the studio controller.

use std::path::PathBuf;

use client_core::GenerationError;

pub enum UiEvent {
    Info(String),
    GenerationFinished(Result<String, GenerationError>),
    Saved(PathBuf),
    Error(UiError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    Auth,
    Transport,
    Response,
    Validation,
    Io,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    BackendStartup,
    Generate,
    Download,
    Upload,
}

#[derive(Debug, Clone)]
pub struct UiError {
    category: UiErrorCategory,
    context: UiErrorContext,
    message: String,
}

impl UiError {
    pub fn from_message(context: UiErrorContext, message: impl Into<String>) -> Self {
        let message = message.into();
        let lower = message.to_ascii_lowercase();
        let category = if lower.contains("api key")
            || lower.contains("401")
            || lower.contains("403")
            || lower.contains("permission")
        {
            UiErrorCategory::Auth
        } else if lower.contains("no image in response") || lower.contains("malformed response")
        {
            UiErrorCategory::Response
        } else if lower.contains("invalid")
            || lower.contains("unsupported")
            || lower.contains("unknown")
            || lower.contains("not an image")
        {
            UiErrorCategory::Validation
        } else if lower.contains("transport")
            || lower.contains("connection")
            || lower.contains("timed out")
            || lower.contains("dns")
            || lower.contains("unavailable")
        {
            UiErrorCategory::Transport
        } else if lower.contains("failed to read")
            || lower.contains("failed to write")
            || lower.contains("no such file")
        {
            UiErrorCategory::Io
        } else {
            UiErrorCategory::Unknown
        };

        Self {
            category,
            context,
            message,
        }
    }

    /// One line for the shell, with a hint for categories the user can fix.
    pub fn summary(&self) -> String {
        let action = match self.context {
            UiErrorContext::BackendStartup => "startup",
            UiErrorContext::Generate => "generation",
            UiErrorContext::Download => "save",
            UiErrorContext::Upload => "image load",
        };
        let hint = match self.category {
            UiErrorCategory::Auth => " (check GEMINI_API_KEY or api_key in gerador.toml)",
            UiErrorCategory::Io => " (check the path and its permissions)",
            _ => "",
        };
        format!("{action} failed: {}{hint}", self.message)
    }
}
