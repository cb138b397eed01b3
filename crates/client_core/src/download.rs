//! Saving a result image to disk.

use std::{
    fs,
    path::{Path, PathBuf},
};

use base64::{engine::general_purpose::STANDARD, Engine as _};
use shared::domain::ImageData;
use tracing::info;

use crate::error::DownloadError;

const DOWNLOAD_PREFIX: &str = "gerador30";

pub fn download_file_name(timestamp_millis: i64) -> String {
    format!("{DOWNLOAD_PREFIX}-{timestamp_millis}.png")
}

/// Decodes `data_uri` and writes it to `dir/gerador30-<timestamp>.png`.
pub fn save_data_uri(
    data_uri: &str,
    dir: &Path,
    timestamp_millis: i64,
) -> Result<PathBuf, DownloadError> {
    let image = ImageData::from_data_uri(data_uri)?;
    let bytes = STANDARD.decode(image.base64.as_bytes())?;

    fs::create_dir_all(dir).map_err(|source| DownloadError::Io {
        path: dir.display().to_string(),
        source,
    })?;

    let path = dir.join(download_file_name(timestamp_millis));
    fs::write(&path, &bytes).map_err(|source| DownloadError::Io {
        path: path.display().to_string(),
        source,
    })?;

    info!(path = %path.display(), bytes = bytes.len(), "saved result image");
    Ok(path)
}
