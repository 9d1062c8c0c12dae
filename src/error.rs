//! @ai:module:intent Define error types for the annotation extraction engine and its callers
//! @ai:module:layer domain
//! @ai:module:public_api Error, Result
//! @ai:module:stateless true

use std::path::PathBuf;
use thiserror::Error;

/// @ai:intent Unified error type for all todoscan operations
/// @ai:context only `InvalidProfile` and `InvalidMarkers` can come out of the engine itself;
///             recoverable anomalies are reported as `Warning` values instead
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid comment syntax profile `{profile}`: {reason}")]
    InvalidProfile { profile: String, reason: String },

    #[error("Invalid marker configuration: {0}")]
    InvalidMarkers(String),

    #[error("Marker pattern error: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    #[error("Failed to walk {path}: {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("Unsupported file type: {0}")]
    UnsupportedFileType(String),

    #[error("Unknown language: {0}")]
    UnknownLanguage(String),

    #[error("Failed to parse config {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl Error {
    /// @ai:intent Shorthand for a profile configuration error
    pub(crate) fn invalid_profile(profile: &str, reason: impl Into<String>) -> Self {
        Error::InvalidProfile {
            profile: profile.to_string(),
            reason: reason.into(),
        }
    }

    /// @ai:intent Whether this error is a fatal configuration problem rather than an I/O failure
    /// @ai:effects pure
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Error::InvalidProfile { .. }
                | Error::InvalidMarkers(_)
                | Error::Pattern(_)
                | Error::UnknownLanguage(_)
                | Error::Config { .. }
                | Error::Toml(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
