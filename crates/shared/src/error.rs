use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseTagError {
    #[error("unknown mode '{0}' (expected create or edit)")]
    Mode(String),
    #[error("unknown function '{0}'")]
    Function(String),
    #[error("unsupported aspect ratio '{0}' (expected 1:1, 3:4, 4:3, 9:16 or 16:9)")]
    AspectRatio(String),
    #[error("invalid image slot '{0}' (expected 1 or 2)")]
    ImageSlot(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DataUriError {
    #[error("malformed data uri: missing 'data:' scheme")]
    MissingScheme,
    #[error("malformed data uri: missing payload")]
    MissingPayload,
    #[error("malformed data uri: payload is not base64")]
    NotBase64,
}
