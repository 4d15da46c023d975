//! Background removal for resampled ROI cubes.
//!
//! The baseline is assumed row-linear: the cube's first and last rows
//! serve as upper/lower background profiles, a full plane is
//! interpolated between them per frame, and subtracted everywhere.

use ndarray::{Array3, Axis};

/// Subtract the row-interpolated background plane from every frame,
/// in place.
pub fn subtract_background(cube: &mut Array3<f32>) {
    let (frames, rows, cols) = cube.dim();
    if rows < 2 {
        return;
    }

    for f in 0..frames {
        let mut frame = cube.index_axis_mut(Axis(0), f);

        // Profiles must be copied out before the subtraction touches them.
        let top: Vec<f32> = frame.row(0).to_vec();
        let bottom: Vec<f32> = frame.row(rows - 1).to_vec();

        for row in 0..rows {
            let fraction = row as f32 / (rows - 1) as f32;
            for col in 0..cols {
                let bg = top[col] * (1.0 - fraction) + bottom[col] * fraction;
                frame[[row, col]] -= bg;
            }
        }
    }
}

/// Copying variant of [`subtract_background`].
pub fn corrected(cube: &Array3<f32>) -> Array3<f32> {
    let mut out = cube.clone();
    subtract_background(&mut out);
    out
}
