use ndarray::{Array1, Array3, ArrayView3};

/// Column-axis slice of an ROI cube.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RegionKind {
    /// The full ROI.
    Whole,
    /// The undiffracted zero-order spot: the leading square block.
    Spot,
    /// The wavelength-dispersed streak beyond the split index.
    Streak,
}

/// A calibrated, resampled region-of-interest data cube:
/// (frame, row, column) with a wavelength axis along columns.
#[derive(Clone, Debug)]
pub struct RoiCube {
    pub data: Array3<f32>,
    /// Wavelength per column, length = data.dim().2.
    pub wavelength: Array1<f64>,
    /// Column index separating the zero-order spot from the streak.
    pub split: usize,
}

impl RoiCube {
    /// View of the requested region; regions are slices of the same
    /// underlying cube, not separate storage.
    pub fn region(&self, kind: RegionKind) -> ArrayView3<'_, f32> {
        let cols = self.data.dim().2;
        let split = self.split.min(cols);
        match kind {
            RegionKind::Whole => self.data.view(),
            RegionKind::Spot => self.data.slice(ndarray::s![.., .., ..split]),
            RegionKind::Streak => self.data.slice(ndarray::s![.., .., split..]),
        }
    }

    /// Wavelengths covered by the streak columns.
    pub fn streak_wavelengths(&self) -> ndarray::ArrayView1<'_, f64> {
        let cols = self.wavelength.len();
        let split = self.split.min(cols);
        self.wavelength.slice(ndarray::s![split..])
    }
}
