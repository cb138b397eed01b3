use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context};
use client_core::{GeminiConfig, DEFAULT_API_BASE, DEFAULT_MODEL};
use serde::Deserialize;
use url::Url;

pub const DEFAULT_CONFIG_FILE: &str = "gerador.toml";

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub api_key: Option<String>,
    pub api_base: String,
    pub model: String,
    pub output_dir: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base: DEFAULT_API_BASE.into(),
            model: DEFAULT_MODEL.into(),
            output_dir: dirs::download_dir().unwrap_or_else(|| PathBuf::from(".")),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileSettings {
    api_key: Option<String>,
    api_base: Option<String>,
    model: Option<String>,
    output_dir: Option<PathBuf>,
}

impl Settings {
    pub fn gemini_config(&self) -> GeminiConfig {
        GeminiConfig {
            api_base: self.api_base.clone(),
            model: self.model.clone(),
            api_key: self.api_key.clone(),
        }
    }

    fn apply_file(&mut self, raw: &str) -> anyhow::Result<()> {
        let file_cfg: FileSettings = toml::from_str(raw)?;
        if let Some(v) = file_cfg.api_key {
            self.api_key = Some(v);
        }
        if let Some(v) = file_cfg.api_base {
            self.api_base = v;
        }
        if let Some(v) = file_cfg.model {
            self.model = v;
        }
        if let Some(v) = file_cfg.output_dir {
            self.output_dir = v;
        }
        Ok(())
    }

    fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        // Later names win.
        for name in ["API_KEY", "GEMINI_API_KEY", "APP__API_KEY"] {
            if let Some(v) = var(name).filter(|v| !v.trim().is_empty()) {
                self.api_key = Some(v);
            }
        }
        if let Some(v) = var("APP__API_BASE") {
            self.api_base = v;
        }
        if let Some(v) = var("APP__MODEL") {
            self.model = v;
        }
        if let Some(v) = var("APP__OUTPUT_DIR") {
            self.output_dir = PathBuf::from(v);
        }
    }

    fn validate(&self) -> anyhow::Result<()> {
        let url = Url::parse(&self.api_base)
            .with_context(|| format!("invalid api_base '{}'", self.api_base))?;
        if !matches!(url.scheme(), "http" | "https") {
            bail!("invalid api_base '{}': expected http or https", self.api_base);
        }
        if self.model.trim().is_empty() {
            bail!("invalid model: must not be empty");
        }
        Ok(())
    }
}

/// Defaults, then the TOML file, then environment overrides.
/// An explicit `path` must exist; the default `gerador.toml` is optional.
pub fn load_settings(path: Option<&Path>) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    match path {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("failed to read config '{}'", path.display()))?;
            settings
                .apply_file(&raw)
                .with_context(|| format!("invalid config '{}'", path.display()))?;
        }
        None => {
            if let Ok(raw) = fs::read_to_string(DEFAULT_CONFIG_FILE) {
                settings
                    .apply_file(&raw)
                    .with_context(|| format!("invalid config '{DEFAULT_CONFIG_FILE}'"))?;
            }
        }
    }

    settings.apply_env(|name| std::env::var(name).ok());
    settings.validate()?;
    Ok(settings)
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
