#![deny(missing_docs)]
//! Image processing primitives for the geosay boundary saliency pipeline

/// color transformations module.
pub mod color;

/// utilities to draw on images.
pub mod draw;

/// image filtering module.
pub mod filter;

/// morphological operations module.
pub mod morphology;

/// module containing parallization utilities.
pub mod parallel;
