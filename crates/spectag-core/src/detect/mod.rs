pub mod config;
pub mod image;
pub mod mask;
pub mod regions;

pub use config::DetectionConfig;
pub use image::CalibrationImage;
pub use regions::PrimitiveRegion;

use ndarray::Array2;
use tracing::debug;

/// Detect candidate diffraction-order spots in a calibration image.
///
/// The std image is part of the detector's input contract but the
/// threshold is a single global scalar over the mean image; no per-pixel
/// adaptive thresholding is applied.
///
/// Returns regions sorted by ascending x-position; empty when nothing
/// survives the mask, projection, and width filters.
pub fn detect_spots(
    mean_image: &Array2<f32>,
    std_image: &Array2<f32>,
    config: &DetectionConfig,
) -> Vec<PrimitiveRegion> {
    let raw = mask::threshold_mask(mean_image, std_image, config.threshold_factor);
    let cleaned = mask::denoise_mask(&raw, config.denoise_iterations, config.min_neighbors);
    let regions = regions::extract_regions(&cleaned, config);
    debug!("spot detection found {} regions", regions.len());
    regions
}
