/// Minimum pixel count (h*w) to use row-level Rayon parallelism.
pub const PARALLEL_PIXEL_THRESHOLD: usize = 65_536;

/// Minimum frame count to use frame-level Rayon parallelism.
pub const PARALLEL_FRAME_THRESHOLD: usize = 4;

/// Mask threshold factor: a pixel is "on" where the mean image exceeds
/// this multiple of the image-wide mean intensity.
pub const MASK_THRESHOLD_FACTOR: f64 = std::f64::consts::SQRT_2;

/// Minimum number of "on" neighbors for a mask pixel to survive denoising.
pub const MASK_MIN_NEIGHBORS: i32 = 3;

/// Number of denoise passes over the mask.
pub const MASK_DENOISE_ITERATIONS: usize = 2;

/// Center weight of the 3x3 denoise kernel. Must exceed 8 so an isolated
/// center pixel can never satisfy the neighbor count on its own.
pub const MASK_CENTER_WEIGHT: i32 = 16;

/// A projected mask row/column counts as "on" when strictly more than
/// this many pixels are set along the other axis.
pub const PROJECTION_MIN_PIXELS: usize = 2;

/// Detected spot regions narrower than this are rejected as noise slivers.
pub const MIN_SPOT_WIDTH: usize = 4;

/// Per-row centroid deviations above this (in pixels) mark the row as
/// unreliable; such rows are replaced by the region's reliable-row mean.
pub const CENTROID_DEV_THRESHOLD: f64 = 4.0;

/// Wavelength of the calibration illumination line, in nanometers.
/// Instrument constant with zero assumed error.
pub const REFERENCE_WAVELENGTH: f64 = 532.0;

/// Pole of the cubic B-spline prefilter: sqrt(3) - 2.
pub const CUBIC_SPLINE_POLE: f64 = -0.267_949_192_431_122_7;

/// Truncation tolerance for the prefilter's causal initialization horizon.
pub const SPLINE_PREFILTER_TOLERANCE: f64 = 1e-12;

/// Version tag written into every exported descriptor record.
pub const DESCRIPTOR_FORMAT_VERSION: &str = "0.2";
