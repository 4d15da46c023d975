//! Pixel-to-wavelength calibration from detected diffraction-order spots.
//!
//! Each region's per-row intensity-weighted centroid and width are
//! fitted, low-confidence rows are replaced by the region's reliable-row
//! mean, inter-order shifts are normalized by order index, and the
//! order-weighted average reduces to a single pixel-reference with an
//! error estimate.

use ndarray::Array2;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::consts::{CENTROID_DEV_THRESHOLD, REFERENCE_WAVELENGTH};
use crate::detect::PrimitiveRegion;
use crate::error::{Result, SpectagError};

/// Derived pixel↔wavelength scale: reference pixel shift and reference
/// wavelength with their error estimates. Immutable once produced.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Calibration {
    pub px_ref: f64,
    pub px_err: f64,
    pub lambda_ref: f64,
    pub lambda_err: f64,
}

impl Calibration {
    /// Degenerate all-1.0 calibration: conversions become the identity.
    pub fn identity() -> Self {
        Self {
            px_ref: 1.0,
            px_err: 0.0,
            lambda_ref: 1.0,
            lambda_err: 0.0,
        }
    }

    /// Wavelength units per pixel.
    pub fn factor(&self) -> f64 {
        if self.px_ref == 0.0 {
            1.0
        } else {
            self.lambda_ref / self.px_ref
        }
    }

    pub fn px_to_wavelength(&self, px: f64) -> f64 {
        px * self.factor()
    }

    pub fn wavelength_to_px(&self, wavelength: f64) -> f64 {
        wavelength / self.factor()
    }
}

/// Fit a calibration from a mean calibration image and the spot regions
/// detected in it, ordered by ascending x (order 0 first).
///
/// Needs at least two regions (the zero-order reference plus one
/// diffracted order); fewer is an [`SpectagError::InsufficientRegions`]
/// error the caller must handle.
pub fn calibrate(image: &Array2<f32>, regions: &[PrimitiveRegion]) -> Result<Calibration> {
    if regions.len() < 2 {
        return Err(SpectagError::InsufficientRegions {
            found: regions.len(),
        });
    }

    let rows = regions[0].height();
    let n_regions = regions.len();

    // Per-region, per-row centroid and width, in region-local columns.
    let mut mids = Array2::<f64>::zeros((n_regions, rows));
    let mut devs = Array2::<f64>::zeros((n_regions, rows));
    for (i, region) in regions.iter().enumerate() {
        let view = region.slice(image);
        for y in 0..rows {
            let (mid, dev) = row_centroid(view.row(y));
            mids[[i, y]] = mid;
            devs[[i, y]] = dev;
        }
    }

    // Rows with too wide a centroid estimate are unreliable; replace
    // them by the region's mean over reliable rows.
    for i in 0..n_regions {
        let reliable: Vec<usize> = (0..rows)
            .filter(|&y| devs[[i, y]] <= CENTROID_DEV_THRESHOLD)
            .collect();
        if reliable.is_empty() {
            return Err(SpectagError::DegenerateNormalization(format!(
                "no reliable rows in calibration region {i}"
            )));
        }
        let count = reliable.len() as f64;
        let mean_mid: f64 = reliable.iter().map(|&y| mids[[i, y]]).sum::<f64>() / count;
        let mean_dev: f64 = reliable.iter().map(|&y| devs[[i, y]]).sum::<f64>() / count;
        for y in 0..rows {
            if devs[[i, y]] > CENTROID_DEV_THRESHOLD {
                mids[[i, y]] = mean_mid;
                devs[[i, y]] = mean_dev;
            }
        }
        debug!(
            "region {i}: {} of {} rows reliable, mean centroid {:.3}",
            reliable.len(),
            rows,
            mean_mid
        );
    }

    // Per-row shift of each diffracted order relative to order 0, in
    // absolute image columns, normalized by the order index.
    let orders = n_regions - 1;
    let mut shift = Array2::<f64>::zeros((orders, rows));
    let mut shift_dev = Array2::<f64>::zeros((orders, rows));
    for n in 1..n_regions {
        let order = n as f64;
        let offset = regions[n].xmin as f64 - regions[0].xmin as f64;
        for y in 0..rows {
            shift[[n - 1, y]] = (mids[[n, y]] - mids[[0, y]] + offset) / order;
            shift_dev[[n - 1, y]] = (devs[[n, y]] + devs[[0, y]]) / order;
        }
    }

    // Average over orders, weighting order n by n: higher orders are
    // more sensitive to the scale but noisier.
    let weight_total: f64 = (1..=orders).map(|n| n as f64).sum();
    let mut px_sum = 0.0;
    let mut err_sum = 0.0;
    for y in 0..rows {
        let mut shift_y = 0.0;
        let mut dev_y = 0.0;
        for n in 0..orders {
            let weight = (n + 1) as f64;
            shift_y += shift[[n, y]] * weight;
            dev_y += shift_dev[[n, y]] * weight;
        }
        px_sum += shift_y / weight_total;
        err_sum += dev_y / weight_total;
    }

    Ok(Calibration {
        px_ref: px_sum / rows as f64,
        px_err: err_sum / rows as f64,
        lambda_ref: REFERENCE_WAVELENGTH,
        lambda_err: 0.0,
    })
}

/// Intensity-weighted centroid and spread of one region row, in
/// region-local column units. A row with no signal is reported as
/// maximally unreliable instead of dividing by zero.
fn row_centroid(row: ndarray::ArrayView1<'_, f32>) -> (f64, f64) {
    let norm: f64 = row.iter().map(|&v| v as f64).sum();
    if norm <= 0.0 {
        return (0.0, f64::INFINITY);
    }

    let mut mid = 0.0f64;
    for (x, &v) in row.iter().enumerate() {
        mid += v as f64 / norm * x as f64;
    }

    let mut var = 0.0f64;
    for (x, &v) in row.iter().enumerate() {
        let d = x as f64 - mid;
        var += v as f64 / norm * d * d;
    }

    (mid, var.sqrt())
}
