//! Error model for the conversion pipeline.
//!
//! Every failure the tool can hit is a variant of [`BadgeError`]. Library code
//! returns it as a value; only `main` decides that an error ends the process.

use std::num::ParseIntError;
use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, BadgeError>;

#[derive(Debug, thiserror::Error)]
pub enum BadgeError {
    /// A required option was given neither on the command line nor in the config file
    #[error("a {0} must be provided")]
    MissingArgument(&'static str),

    #[error("invalid outmode `{0}` (expected one of: rice, bin, base64, none)")]
    InvalidOutMode(String),

    #[error("invalid source language `{0}` (expected one of: rust, go, c)")]
    InvalidSourceLang(String),

    #[error("could not stat {}: {source}", path.display())]
    InputNotFound {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("error loading source image {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("invalid ratio string provided: `{0}`")]
    InvalidRatio(String),

    #[error("could not parse {axis} coordinate count `{value}`: {source}")]
    InvalidDimension {
        axis: &'static str,
        value: String,
        source: ParseIntError,
    },

    #[error("width and height must be greater than 0, got {width}x{height}")]
    ZeroDimension { width: u32, height: u32 },

    #[error("height/y value must be divisible by 8, got {0}")]
    HeightNotByteAligned(u32),

    #[error("bitmap size mismatch for {dimensions}: expected {expected} bytes, got {actual}")]
    SizeMismatch {
        dimensions: String,
        expected: usize,
        actual: usize,
    },

    #[error("failed to resize image: {0}")]
    Resize(String),

    #[error("config file {}: {message}", path.display())]
    Config { path: PathBuf, message: String },

    #[error("failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl BadgeError {
    /// Errors caused by how the tool was invoked, answered with a usage hint
    pub fn is_usage(&self) -> bool {
        matches!(
            self,
            Self::MissingArgument(_) | Self::InvalidOutMode(_) | Self::InvalidSourceLang(_)
        )
    }

    /// Wrap an I/O error with the path it happened on
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
