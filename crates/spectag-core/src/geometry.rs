use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SpectagError};

/// Operator-chosen ROI geometry: center, rotation, width, and the
/// pixel-to-wavelength reference pair. One per tagging session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeometryDescriptor {
    /// ROI center (zero-order spot position), x in pixel columns.
    pub center_x: f64,
    /// ROI center, y in pixel rows.
    pub center_y: f64,
    /// Rotation of the dispersion axis, degrees counter-clockwise.
    #[serde(default)]
    pub angle_deg: f64,
    /// ROI width in pixels; odd, square cross-section.
    #[serde(default = "default_roi_width")]
    pub roi_width: usize,
    /// Pixel shift of the reference wavelength's first diffraction order.
    #[serde(default)]
    pub ref_shift: f64,
    /// Reference wavelength, nanometers.
    #[serde(default = "default_ref_wavelength")]
    pub ref_wavelength: f64,
}

fn default_roi_width() -> usize {
    21
}

fn default_ref_wavelength() -> f64 {
    crate::consts::REFERENCE_WAVELENGTH
}

impl Default for GeometryDescriptor {
    fn default() -> Self {
        Self {
            center_x: 0.0,
            center_y: 0.0,
            angle_deg: 0.0,
            roi_width: default_roi_width(),
            ref_shift: 0.0,
            ref_wavelength: default_ref_wavelength(),
        }
    }
}

/// Paired target coordinate arrays plus the wavelength axis along the
/// column (dispersion) dimension.
#[derive(Clone, Debug)]
pub struct SamplingGrid {
    /// Source x (column) coordinate per output sample, shape = (roi_width, cols).
    pub x: Array2<f64>,
    /// Source y (row) coordinate per output sample, same shape as `x`.
    pub y: Array2<f64>,
    /// Wavelength per output column, length = cols.
    pub wavelength: Array1<f64>,
}

impl GeometryDescriptor {
    /// Check the ROI fits the frame and has an odd square cross-section.
    pub fn validate(&self, width: usize, height: usize) -> Result<()> {
        if self.roi_width == 0 || self.roi_width % 2 == 0 || self.roi_width > width.min(height) {
            return Err(SpectagError::InvalidRoiWidth {
                roi_width: self.roi_width,
                width,
                height,
            });
        }
        Ok(())
    }

    /// Wavelength units per pixel along the dispersion axis.
    /// Identity (1.0) when the reference shift is zero.
    pub fn wavelength_per_px(&self) -> f64 {
        if self.ref_shift == 0.0 {
            1.0
        } else {
            self.ref_wavelength / self.ref_shift
        }
    }

    /// Number of columns the ROI spans once extended out to
    /// `max_wavelength`: the square width plus `ref_shift * max / ref`.
    pub fn column_count(&self, max_wavelength: f64) -> usize {
        let extension = if self.ref_wavelength > 0.0 {
            (self.ref_shift * max_wavelength / self.ref_wavelength).round() as usize
        } else {
            0
        };
        self.roi_width + extension
    }

    /// Column index separating the zero-order spot slice from the
    /// dispersed streak.
    pub fn split_index(&self) -> usize {
        self.roi_width
    }

    /// Build the rotated, translated sampling coordinates for the ROI.
    ///
    /// The local frame runs the dispersion axis along columns starting at
    /// the zero-order spot, centered on the narrow axis, then rotates by
    /// the stored angle and translates to the stored center.
    pub fn sampling_grid(&self, max_wavelength: f64) -> SamplingGrid {
        let rows = self.roi_width;
        let cols = self.column_count(max_wavelength);
        let theta = self.angle_deg.to_radians();
        let (sin, cos) = theta.sin_cos();
        let half = (rows as f64 - 1.0) / 2.0;

        let mut x = Array2::<f64>::zeros((rows, cols));
        let mut y = Array2::<f64>::zeros((rows, cols));
        for row in 0..rows {
            let v = row as f64 - half;
            for col in 0..cols {
                let u = col as f64;
                x[[row, col]] = self.center_x + u * cos - v * sin;
                y[[row, col]] = self.center_y + u * sin + v * cos;
            }
        }

        let scale = self.wavelength_per_px();
        let wavelength = Array1::from_iter((0..cols).map(|c| c as f64 * scale));

        SamplingGrid { x, y, wavelength }
    }
}
