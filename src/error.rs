//! Error types for the card engine

use thiserror::Error;

/// Result type alias for card operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while configuring, compositing, or exporting a card
#[derive(Error, Debug)]
pub enum Error {
    /// A required config key was left as the unset sentinel
    #[error("Config key '{0}' is required but unset")]
    ConfigKeyError(String),

    /// A surface was already provisioned for this instance
    #[error("A surface already exists for this instance")]
    DuplicateSurfaceError,

    /// The configured container target resolved to nothing
    #[error("Container '{0}' could not be resolved")]
    ContainerNotFoundError(String),

    /// Background color paint was requested without a color
    #[error("No color given for background fill")]
    MissingColorError,

    /// Background image paint was requested without a loaded image
    #[error("No image given for background draw")]
    MissingImageError,

    /// An operation needed a surface before one was provisioned
    #[error("No surface exists for this instance")]
    NoSurfaceError,

    /// The configured download trigger resolved to nothing
    #[error("Download trigger '{0}' could not be resolved")]
    TriggerNotFoundError(String),

    /// Failed to fetch an image source
    #[error("Failed to load image source: {0}")]
    LoadError(String),

    /// Fetched bytes could not be decoded as an image
    #[error("Failed to decode image data: {0}")]
    DecodeError(String),

    /// The surface could not be serialized to the requested format
    #[error("Failed to encode surface: {0}")]
    EncodeError(String),

    /// A font face could not be parsed or registered
    #[error("Font error: {0}")]
    FontError(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl From<image::ImageError> for Error {
    fn from(err: image::ImageError) -> Self {
        Error::DecodeError(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::ConfigError(err.to_string())
    }
}
