use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, LuaresError>;
pub type InputResult<T> = std::result::Result<T, InputError>;
pub type SerializationResult<T> = std::result::Result<T, SerializationError>;

/// Errors raised while acquiring a source blob.
///
/// The scanning core itself never fails (malformed spans are skipped, and
/// malformed scalars degrade to strings), so everything here sits at the
/// filesystem boundary.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("Invalid input path, cannot canonicalize: {path}: {source}")]
    InvalidInputPath {
        source: std::io::Error,
        // Not a `PathBuf` because it is invalid
        path: String,
    },

    #[error("Failed to read file {}: {source}", path.display())]
    FailedToReadFile {
        source: std::io::Error,
        path: PathBuf,
    },

    #[error("Input is not valid UTF-8: {source}")]
    InputNotUtf8 { source: std::string::FromUtf8Error },
}

/// Errors raised while emitting the output document.
#[derive(Debug, Error)]
pub enum SerializationError {
    #[error("`serde_json` failed with error: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },

    #[error("An I/O error has occurred while writing output: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

/// Umbrella error for all `luares` operations.
#[derive(Debug, Error)]
pub enum LuaresError {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Serialization(#[from] SerializationError),
}
