//! Session state and the transitions the user can trigger on it.

use client_core::{GenerationError, GenerationRequest};
use shared::domain::{AspectRatio, EditFunction, Function, ImageData, ImageSlot, Mode};

pub const DEFAULT_STATUS_MESSAGE: &str = "Generating your design...";

/// Media type assigned to a result promoted back into the edit slot.
const PROMOTED_RESULT_MIME: &str = "image/png";

#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    pub mode: Mode,
    pub selected_function: Function,
    pub aspect_ratio: AspectRatio,
    pub prompt: String,
    pub image1: Option<ImageData>,
    pub image2: Option<ImageData>,
    pub result_image: Option<String>,
    pub is_loading: bool,
    pub status_message: String,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            mode: Mode::Create,
            selected_function: Mode::Create.default_function(),
            aspect_ratio: AspectRatio::default(),
            prompt: String::new(),
            image1: None,
            image2: None,
            result_image: None,
            is_loading: false,
            status_message: DEFAULT_STATUS_MESSAGE.to_string(),
        }
    }
}

impl SessionState {
    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
        self.selected_function = mode.default_function();
        self.image1 = None;
        self.image2 = None;
        tracing::debug!(mode = mode.as_str(), "mode switched");
    }

    /// Accepts any function, including one from the other mode.
    pub fn select_function(&mut self, function: Function) {
        if !function.belongs_to(self.mode) {
            tracing::debug!(
                mode = self.mode.as_str(),
                function = function.as_str(),
                "selected function belongs to the other mode"
            );
        }
        self.selected_function = function;
    }

    pub fn select_aspect_ratio(&mut self, ratio: AspectRatio) {
        self.aspect_ratio = ratio;
    }

    pub fn set_prompt(&mut self, text: impl Into<String>) {
        self.prompt = text.into();
    }

    pub fn set_image(&mut self, slot: ImageSlot, image: ImageData) {
        match slot {
            ImageSlot::First => self.image1 = Some(image),
            ImageSlot::Second => self.image2 = Some(image),
        }
    }

    pub fn can_generate(&self) -> bool {
        self.mode == Mode::Edit || !self.prompt.trim().is_empty()
    }

    /// Enters the loading state and snapshots the request to dispatch.
    /// Returns `None` (and changes nothing) for a blank prompt in create mode.
    pub fn begin_generate(&mut self) -> Option<GenerationRequest> {
        if !self.can_generate() {
            return None;
        }

        self.is_loading = true;
        self.result_image = None;

        Some(GenerationRequest {
            prompt: self.prompt.clone(),
            mode: self.mode,
            function: self.selected_function,
            aspect_ratio: self.aspect_ratio,
            image1: self.image1.clone(),
            image2: self.image2.clone(),
        })
    }

    pub fn complete_generate(&mut self, outcome: Result<String, GenerationError>) {
        self.is_loading = false;
        match outcome {
            Ok(data_uri) => self.result_image = Some(data_uri),
            Err(err) => tracing::error!("generation failed: {err}"),
        }
    }

    /// Moves the current result into the first edit slot for retouching.
    /// Returns false when there is no result.
    pub fn promote_result_to_edit_source(&mut self) -> bool {
        let Some(result) = self.result_image.take() else {
            return false;
        };

        let payload = result
            .split_once(',')
            .map(|(_, payload)| payload.to_string())
            .unwrap_or_default();
        self.mode = Mode::Edit;
        self.selected_function = Function::Edit(EditFunction::Retouch);
        self.image1 = Some(ImageData::new(payload, PROMOTED_RESULT_MIME));
        true
    }

    pub fn download_target(&self) -> Option<&str> {
        self.result_image.as_deref()
    }
}

#[cfg(test)]
#[path = "tests/reducer_tests.rs"]
mod tests;
