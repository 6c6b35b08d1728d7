use std::path::PathBuf;

/// A defect that makes a junction unusable for the geometry downstream.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum JunctionDefect {
    /// The junction has fewer than two branches.
    #[error("expected at least 2 branches, found {0}")]
    TooFewBranches(usize),

    /// A branch has a zero, negative or non-finite length.
    #[error("branch {branch} has non-positive scale {scale}")]
    NonPositiveScale {
        /// Index of the offending branch.
        branch: usize,
        /// The scale read for that branch.
        scale: f32,
    },
}

/// Errors that can occur while building the junction graph or the boundary map.
#[derive(Debug, thiserror::Error)]
pub enum GbiError {
    /// The detection file is malformed or truncated.
    #[error("Malformed detection file at line {line}: {message}")]
    Parse {
        /// 1-based line of the offending token.
        line: usize,
        /// What was expected.
        message: String,
    },

    /// A parsed junction violates the geometric preconditions.
    #[error("Invalid junction #{index}: {defect}")]
    InvalidJunction {
        /// Position of the junction in the detection file.
        index: usize,
        /// What is wrong with it.
        defect: JunctionDefect,
    },

    /// The distance matrix does not cover the junction list.
    #[error("Neighbor graph built for {distances} junctions, got {junctions}")]
    NeighborGraphMismatch {
        /// Number of junctions passed in.
        junctions: usize,
        /// Number of junctions the distance matrix was built for.
        distances: usize,
    },

    /// The external junction detector is missing, failed or timed out.
    #[error("Junction detector unavailable: {0}")]
    DetectorUnavailable(String),

    /// The angle probability table could not be loaded.
    #[error("Invalid probability table: {0}")]
    ProbTable(String),

    /// Failed to read a file.
    #[error("Failed to read {0}: {1}")]
    FileError(PathBuf, #[source] std::io::Error),

    /// Error related to image.
    #[error(transparent)]
    ImageError(#[from] geosay_image::ImageError),
}
