use serde::{Deserialize, Serialize};

use crate::consts::{
    MASK_DENOISE_ITERATIONS, MASK_MIN_NEIGHBORS, MASK_THRESHOLD_FACTOR, MIN_SPOT_WIDTH,
    PROJECTION_MIN_PIXELS,
};

/// Configuration for diffraction-spot detection.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DetectionConfig {
    /// A pixel is "on" where the mean image exceeds this multiple of
    /// the image-wide mean intensity.
    #[serde(default = "default_threshold_factor")]
    pub threshold_factor: f64,
    /// Minimum "on" neighbors for a mask pixel to survive denoising.
    #[serde(default = "default_min_neighbors")]
    pub min_neighbors: i32,
    /// Number of denoise passes.
    #[serde(default = "default_denoise_iterations")]
    pub denoise_iterations: usize,
    /// A projected row/column counts as "on" when strictly more than
    /// this many mask pixels are set along the other axis.
    #[serde(default = "default_projection_min_pixels")]
    pub projection_min_pixels: usize,
    /// Regions narrower than this are rejected as noise slivers.
    #[serde(default = "default_min_region_width")]
    pub min_region_width: usize,
}

fn default_threshold_factor() -> f64 {
    MASK_THRESHOLD_FACTOR
}
fn default_min_neighbors() -> i32 {
    MASK_MIN_NEIGHBORS
}
fn default_denoise_iterations() -> usize {
    MASK_DENOISE_ITERATIONS
}
fn default_projection_min_pixels() -> usize {
    PROJECTION_MIN_PIXELS
}
fn default_min_region_width() -> usize {
    MIN_SPOT_WIDTH
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            threshold_factor: MASK_THRESHOLD_FACTOR,
            min_neighbors: MASK_MIN_NEIGHBORS,
            denoise_iterations: MASK_DENOISE_ITERATIONS,
            projection_min_pixels: PROJECTION_MIN_PIXELS,
            min_region_width: MIN_SPOT_WIDTH,
        }
    }
}
