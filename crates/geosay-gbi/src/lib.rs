#![deny(missing_docs)]
//! # Geosay GBI
//!
//! Turns the junctions found by an external detector into a dense Good Boundary Indicator
//! map: junctions are linked to their close, scale compatible neighbors, each junction gets a
//! saliency weight from its angle, its significance and its neighbors, and the weight is
//! painted over the wedge spanned by its first two branches.

/// Error types for the boundary saliency pipeline.
pub mod error;

/// Angle and distance helpers.
pub mod geometry;

/// Reader for detection files.
pub mod asj;

/// Junctions and their branches.
pub mod junction;

/// Distance matrix and neighbor selection.
pub mod neighbors;

/// Angle probability lookup table.
pub mod prob;

/// Per-junction weights and wedge accumulation.
pub mod saliency;

/// Luminance, black-hat suppression and smoothing of the saliency map.
pub mod postprocess;

/// Running the external junction detector.
pub mod detector;

/// Configuration of a run.
pub mod config;

mod pipeline;

pub use crate::config::GbiConfig;
pub use crate::detector::{load_junctions, JunctionDetector, ProcessDetector};
pub use crate::error::{GbiError, JunctionDefect};
pub use crate::junction::{Branch, Junction};
pub use crate::pipeline::GbiEstimator;
pub use crate::prob::AngleProbTable;
