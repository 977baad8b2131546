use thiserror::Error;

pub type CodecResult<T> = Result<T, CodecError>;

#[derive(Error, Debug)]
pub enum CodecError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The value has no JSON representation (e.g. complex elements).
    #[error("Unsupported type: {0}")]
    UnsupportedType(String),

    /// The marker key is present but the envelope body cannot be turned
    /// into an array.
    #[error("Malformed envelope: {0}")]
    MalformedEnvelope(String),

    #[error("Shape error: {0}")]
    Shape(String),

    #[error("Type conversion error: {0}")]
    TypeConversion(String),
}
