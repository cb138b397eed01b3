//! Reading reference images from disk into session image slots.

use std::{fs, path::Path};

use anyhow::{bail, Context, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use mime_guess::mime;
use shared::domain::ImageData;

pub fn load_image(path: &Path) -> Result<ImageData> {
    let media_type = mime_guess::from_path(path).first_or_octet_stream();
    if media_type.type_() != mime::IMAGE {
        bail!("'{}' is not an image ({media_type})", path.display());
    }

    let bytes = fs::read(path).with_context(|| format!("failed to read '{}'", path.display()))?;
    if bytes.is_empty() {
        bail!("'{}' is empty", path.display());
    }

    tracing::debug!(path = %path.display(), bytes = bytes.len(), %media_type, "loaded image");
    Ok(ImageData::new(STANDARD.encode(&bytes), media_type.essence_str()))
}
