/// Error types for catalog operations
///
/// Every failure a caller can see is a variant here. None of them are fatal
/// to the host; the binary turns them into user-facing messages.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("unknown category '{0}', use food or drink")]
    UnknownCategory(String),

    #[error("no image provided, attach or quote one image")]
    NoImageProvided,

    #[error("only one image can be added at a time (got {0})")]
    TooManyImages(usize),

    #[error("'{0}' already exists")]
    AlreadyExists(String),

    #[error("'{0}' does not exist")]
    NotFound(String),

    #[error("invalid item name '{0}'")]
    InvalidName(String),

    #[error("invalid image: {0}")]
    InvalidImage(#[from] image::ImageError),

    #[error("image normalization failed: {0}")]
    NormalizationFailed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config error: {0}")]
    Config(String),

    #[error("background task failed: {0}")]
    Task(String),
}

pub type Result<T> = std::result::Result<T, CatalogError>;
