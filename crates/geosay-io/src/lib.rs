#![deny(missing_docs)]
//! Image input/output for the geosay boundary saliency pipeline

/// Error types for the io module.
pub mod error;

/// High-level read and write functions for images.
pub mod functional;

pub use crate::error::IoError;
