use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Parameters of a boundary saliency run.
///
/// Missing fields take their default value when deserializing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GbiConfig {
    /// Path to the junction detector executable.
    pub detector_path: PathBuf,
    /// Whether to attenuate the map with the black-hat of the luminance.
    pub use_black_hat: bool,
    /// Seconds after which the detector is killed.
    pub detector_timeout_secs: u64,
    /// Side of the square black-hat structuring element.
    pub black_hat_kernel_size: usize,
    /// Side of the square gaussian smoothing kernel.
    pub blur_kernel_size: usize,
    /// Standard deviation of the gaussian smoothing kernel.
    pub blur_sigma: f32,
}

impl Default for GbiConfig {
    fn default() -> Self {
        Self {
            detector_path: PathBuf::from("ASJDetector"),
            use_black_hat: true,
            detector_timeout_secs: 600,
            black_hat_kernel_size: 50,
            blur_kernel_size: 5,
            blur_sigma: 1.0,
        }
    }
}

impl GbiConfig {
    /// The detector timeout as a [`Duration`].
    pub fn detector_timeout(&self) -> Duration {
        Duration::from_secs(self.detector_timeout_secs)
    }
}
