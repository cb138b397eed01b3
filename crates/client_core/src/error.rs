use thiserror::Error;

/// Failure of one generation round trip.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("image service API key is not configured")]
    MissingApiKey,
    #[error("transport error talking to image service: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("image service returned {status}: {message}")]
    Service { status: u16, message: String },
    #[error("malformed response from image service: {0}")]
    MalformedResponse(String),
    #[error("no image in response")]
    NoImageInResponse,
}

#[derive(Debug, Error)]
pub enum DownloadError {
    #[error(transparent)]
    DataUri(#[from] shared::error::DataUriError),
    #[error("result image payload is not valid base64: {0}")]
    Decode(#[from] base64::DecodeError),
    #[error("failed to write '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
}
