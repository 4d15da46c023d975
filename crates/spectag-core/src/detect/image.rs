use ndarray::Array2;

use crate::frame::FrameStack;

/// Per-pixel temporal statistics of a calibration exposure, the input
/// pair for spot detection and calibration fitting.
#[derive(Clone, Debug)]
pub struct CalibrationImage {
    /// Temporal mean, constant background guess removed.
    pub mean: Array2<f32>,
    /// Temporal standard deviation.
    pub std: Array2<f32>,
}

impl CalibrationImage {
    /// Reduce a calibration stack to its mean/std images and subtract a
    /// constant background guess: the average of the top and bottom
    /// edge-row means.
    pub fn from_stack(stack: &FrameStack) -> Self {
        let mut mean = stack.mean_projection();
        let std = stack.std_projection();

        let rows = mean.nrows();
        let top = row_mean(&mean, 0);
        let bottom = row_mean(&mean, rows - 1);
        let background = 0.5 * (top + bottom);
        mean.mapv_inplace(|v| v - background);

        Self { mean, std }
    }
}

fn row_mean(image: &Array2<f32>, row: usize) -> f32 {
    let line = image.row(row);
    let n = line.len() as f64;
    let sum: f64 = line.iter().map(|&v| v as f64).sum();
    (sum / n) as f32
}
