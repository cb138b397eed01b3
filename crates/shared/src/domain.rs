use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::{DataUriError, ParseTagError};

/// Top-level operating context: generate from scratch or transform an existing image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    #[default]
    Create,
    Edit,
}

impl Mode {
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Create => "create",
            Mode::Edit => "edit",
        }
    }

    /// Function selected when the mode is entered.
    pub fn default_function(self) -> Function {
        match self {
            Mode::Create => Function::Create(CreateFunction::Free),
            Mode::Edit => Function::Edit(EditFunction::AddRemove),
        }
    }

    pub fn functions(self) -> &'static [Function] {
        match self {
            Mode::Create => &[
                Function::Create(CreateFunction::Free),
                Function::Create(CreateFunction::Sticker),
                Function::Create(CreateFunction::Text),
                Function::Create(CreateFunction::Comic),
            ],
            Mode::Edit => &[
                Function::Edit(EditFunction::AddRemove),
                Function::Edit(EditFunction::Retouch),
                Function::Edit(EditFunction::Style),
                Function::Edit(EditFunction::Compose),
            ],
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = ParseTagError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "create" => Ok(Mode::Create),
            "edit" => Ok(Mode::Edit),
            other => Err(ParseTagError::Mode(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CreateFunction {
    Free,
    Sticker,
    Text,
    Comic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EditFunction {
    AddRemove,
    Retouch,
    Style,
    Compose,
}

/// A function tag. Each variant carries the mode it belongs to, but a session
/// may hold a function from the other mode (selection is not validated).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Function {
    Create(CreateFunction),
    Edit(EditFunction),
}

impl Function {
    pub fn mode(self) -> Mode {
        match self {
            Function::Create(_) => Mode::Create,
            Function::Edit(_) => Mode::Edit,
        }
    }

    pub fn belongs_to(self, mode: Mode) -> bool {
        self.mode() == mode
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Function::Create(CreateFunction::Free) => "free",
            Function::Create(CreateFunction::Sticker) => "sticker",
            Function::Create(CreateFunction::Text) => "text",
            Function::Create(CreateFunction::Comic) => "comic",
            Function::Edit(EditFunction::AddRemove) => "add-remove",
            Function::Edit(EditFunction::Retouch) => "retouch",
            Function::Edit(EditFunction::Style) => "style",
            Function::Edit(EditFunction::Compose) => "compose",
        }
    }

    /// Short label shown to the user.
    pub fn label(self) -> &'static str {
        match self {
            Function::Create(CreateFunction::Free) => "FREE",
            Function::Create(CreateFunction::Sticker) => "STICKER",
            Function::Create(CreateFunction::Text) => "LOGO",
            Function::Create(CreateFunction::Comic) => "COMIC",
            Function::Edit(EditFunction::AddRemove) => "OBJECTS",
            Function::Edit(EditFunction::Retouch) => "RETOUCH",
            Function::Edit(EditFunction::Style) => "STYLE",
            Function::Edit(EditFunction::Compose) => "MERGE",
        }
    }

    pub fn uses_second_image(self) -> bool {
        matches!(self, Function::Edit(EditFunction::Compose))
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Function {
    type Err = ParseTagError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let function = match value.trim().to_ascii_lowercase().as_str() {
            "free" => Function::Create(CreateFunction::Free),
            "sticker" => Function::Create(CreateFunction::Sticker),
            "text" | "logo" => Function::Create(CreateFunction::Text),
            "comic" => Function::Create(CreateFunction::Comic),
            "add-remove" | "objects" => Function::Edit(EditFunction::AddRemove),
            "retouch" => Function::Edit(EditFunction::Retouch),
            "style" => Function::Edit(EditFunction::Style),
            "compose" | "merge" => Function::Edit(EditFunction::Compose),
            other => return Err(ParseTagError::Function(other.to_string())),
        };
        Ok(function)
    }
}

/// Requested output proportions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AspectRatio {
    #[default]
    #[serde(rename = "1:1")]
    Square,
    #[serde(rename = "3:4")]
    Portrait,
    #[serde(rename = "4:3")]
    Landscape,
    #[serde(rename = "9:16")]
    Tall,
    #[serde(rename = "16:9")]
    Wide,
}

impl AspectRatio {
    /// Display order of the ratio picker.
    pub const ALL: [AspectRatio; 5] = [
        AspectRatio::Square,
        AspectRatio::Landscape,
        AspectRatio::Wide,
        AspectRatio::Tall,
        AspectRatio::Portrait,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            AspectRatio::Square => "1:1",
            AspectRatio::Portrait => "3:4",
            AspectRatio::Landscape => "4:3",
            AspectRatio::Tall => "9:16",
            AspectRatio::Wide => "16:9",
        }
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AspectRatio {
    type Err = ParseTagError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        AspectRatio::ALL
            .into_iter()
            .find(|ratio| ratio.as_str() == trimmed)
            .ok_or_else(|| ParseTagError::AspectRatio(trimmed.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageSlot {
    First,
    Second,
}

impl FromStr for ImageSlot {
    type Err = ParseTagError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "1" => Ok(ImageSlot::First),
            "2" => Ok(ImageSlot::Second),
            other => Err(ParseTagError::ImageSlot(other.to_string())),
        }
    }
}

/// A base64-encoded image with its media type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageData {
    pub base64: String,
    pub mime_type: String,
}

impl ImageData {
    pub fn new(base64: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Self {
            base64: base64.into(),
            mime_type: mime_type.into(),
        }
    }

    pub fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.base64)
    }

    /// Parses `data:<mime>;base64,<payload>`.
    pub fn from_data_uri(uri: &str) -> Result<Self, DataUriError> {
        let rest = uri.strip_prefix("data:").ok_or(DataUriError::MissingScheme)?;
        let (header, payload) = rest.split_once(',').ok_or(DataUriError::MissingPayload)?;
        let mime_type = header
            .strip_suffix(";base64")
            .ok_or(DataUriError::NotBase64)?;
        if payload.is_empty() {
            return Err(DataUriError::MissingPayload);
        }
        Ok(Self::new(payload, mime_type))
    }
}
