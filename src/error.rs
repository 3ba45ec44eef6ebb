//! # Error Types
//!
//! [`StegoError`] covers every way an encode or decode can fail. Nothing is
//! written to the output path once one of these has been raised.

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while hiding or revealing a message image.
#[derive(Debug, Error)]
pub enum StegoError {
    /// The file exists but is not something the image library can decode.
    #[error("{}: not a decodable image ({reason})", path.display())]
    Format { path: PathBuf, reason: String },

    /// The message holds more pixels than the carrier, or the carrier is empty.
    #[error(
        "message image {message_width}x{message_height} does not fit carrier {carrier_width}x{carrier_height}"
    )]
    Capacity {
        message_width: u32,
        message_height: u32,
        carrier_width: u32,
        carrier_height: u32,
    },

    /// Reading or writing a file failed.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A configuration value is out of range or unknown.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl StegoError {
    pub(crate) fn io(path: &Path, source: io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Classify an `image` crate error raised while decoding `path`.
    pub(crate) fn from_decode(path: &Path, err: image::ImageError) -> Self {
        match err {
            image::ImageError::IoError(source) => Self::io(path, source),
            other => Self::Format {
                path: path.to_path_buf(),
                reason: other.to_string(),
            },
        }
    }

    /// Classify an `image` crate error raised while writing `path`.
    pub(crate) fn from_encode(path: &Path, err: image::ImageError) -> Self {
        match err {
            image::ImageError::IoError(source) => Self::io(path, source),
            other => Self::io(path, io::Error::new(io::ErrorKind::Other, other)),
        }
    }

    pub fn is_format(&self) -> bool {
        matches!(self, Self::Format { .. })
    }

    pub fn is_capacity(&self) -> bool {
        matches!(self, Self::Capacity { .. })
    }
}
