use geosay_image::Image;

use crate::config::GbiConfig;
use crate::error::GbiError;
use crate::junction::Junction;
use crate::neighbors::build_neighbor_graph;
use crate::postprocess;
use crate::prob::AngleProbTable;
use crate::saliency::accumulate_gbi;

/// Computes Good Boundary Indicator maps from an image and its junctions.
///
/// # Example
///
/// ```
/// use geosay_image::{Image, ImageSize};
/// use geosay_gbi::{AngleProbTable, GbiConfig, GbiEstimator};
///
/// let table = AngleProbTable::from_fn(|_| 0.5).unwrap();
/// let estimator = GbiEstimator::new(GbiConfig::default(), table);
///
/// let image = Image::<u8, 3>::from_size_val(ImageSize { width: 8, height: 6 }, 128).unwrap();
/// let gbi = estimator.compute(&image, &mut []).unwrap();
/// assert_eq!(gbi.size(), image.size());
/// ```
#[derive(Debug, Clone)]
pub struct GbiEstimator {
    config: GbiConfig,
    prob_table: AngleProbTable,
}

impl GbiEstimator {
    /// Create an estimator from its configuration and the angle probability table.
    pub fn new(config: GbiConfig, prob_table: AngleProbTable) -> Self {
        Self { config, prob_table }
    }

    /// The configuration of the estimator.
    pub fn config(&self) -> &GbiConfig {
        &self.config
    }

    /// The angle probability table of the estimator.
    pub fn prob_table(&self) -> &AngleProbTable {
        &self.prob_table
    }

    /// Compute the saliency map of `image`.
    ///
    /// Builds the neighbor graph of `junctions` (filling their neighbor lists), accumulates the
    /// junction wedges, optionally attenuates the result with the black-hat of the luminance
    /// and smooths it.
    pub fn compute<const C: usize>(
        &self,
        image: &Image<u8, C>,
        junctions: &mut [Junction],
    ) -> Result<Image<f32, 1>, GbiError> {
        let distances = build_neighbor_graph(junctions);
        let mut map = accumulate_gbi(junctions, &distances, &self.prob_table, image.size())?;

        if self.config.use_black_hat {
            let lum = postprocess::luminance(image)?;
            postprocess::suppress_black_hat(&mut map, &lum, self.config.black_hat_kernel_size)?;
        }

        let gbi = postprocess::smooth(&map, self.config.blur_kernel_size, self.config.blur_sigma)?;

        log::debug!(
            "computed gbi {} from {} junctions",
            gbi.size(),
            junctions.len()
        );

        Ok(gbi)
    }
}
