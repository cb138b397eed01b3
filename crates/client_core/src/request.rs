//! Prompt templating and payload assembly for a single generation.

use serde::{Deserialize, Serialize};
use shared::{
    domain::{AspectRatio, CreateFunction, EditFunction, Function, ImageData, Mode},
    protocol::{Content, GenerateContentRequest, GenerationConfig, ImageConfig, Part},
};
use tracing::warn;

/// Snapshot of everything the service needs for one generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub prompt: String,
    pub mode: Mode,
    pub function: Function,
    pub aspect_ratio: AspectRatio,
    pub image1: Option<ImageData>,
    pub image2: Option<ImageData>,
}

impl GenerationRequest {
    pub fn rendered_prompt(&self) -> String {
        render_prompt(self.mode, self.function, &self.prompt)
    }

    /// Text first, then `image1`, then `image2`.
    pub fn parts(&self) -> Vec<Part> {
        let mut parts = vec![Part::text(self.rendered_prompt())];
        parts.extend(self.image1.iter().map(Part::inline_image));
        parts.extend(self.image2.iter().map(Part::inline_image));
        parts
    }

    pub fn to_wire(&self) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![Content {
                role: None,
                parts: self.parts(),
            }],
            generation_config: GenerationConfig {
                image_config: ImageConfig {
                    aspect_ratio: self.aspect_ratio,
                },
            },
        }
    }
}

/// Applies the per-function template. A function selected outside its own
/// mode matches no template and leaves the prompt untouched.
pub fn render_prompt(mode: Mode, function: Function, prompt: &str) -> String {
    match (mode, function) {
        (Mode::Create, Function::Create(create)) => match create {
            CreateFunction::Free => prompt.to_string(),
            CreateFunction::Sticker => format!(
                "Sticker die-cut style: {prompt}. High quality, white border, isolated."
            ),
            CreateFunction::Text => {
                format!("Professional minimalist logo: {prompt}. Vector style, clean lines.")
            }
            CreateFunction::Comic => {
                format!("Comic book art style: {prompt}. Vibrant, dynamic shadows.")
            }
        },
        (Mode::Edit, Function::Edit(edit)) => match edit {
            EditFunction::AddRemove => {
                format!("Modify this image: {prompt}. Preserve original style and lighting.")
            }
            EditFunction::Retouch => {
                format!("Enhance and retouch: {prompt}. Fix details, lighting and clarity.")
            }
            EditFunction::Style => {
                format!("Re-style this image as: {prompt}. Artistic transformation.")
            }
            EditFunction::Compose => {
                format!("Merge these two images based on: {prompt}. Seamless composite.")
            }
        },
        (mode, function) => {
            warn!(
                mode = mode.as_str(),
                function = function.as_str(),
                "function does not belong to mode; sending prompt without template"
            );
            prompt.to_string()
        }
    }
}
