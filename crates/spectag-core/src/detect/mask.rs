use ndarray::Array2;

use crate::consts::MASK_CENTER_WEIGHT;

/// Threshold the mean image into a binary mask: "on" where the pixel
/// exceeds `factor` times the image-wide mean intensity. One global
/// scalar cutoff; the std image is accepted by the caller's contract
/// but takes no part here.
pub fn threshold_mask(mean_image: &Array2<f32>, _std_image: &Array2<f32>, factor: f64) -> Array2<bool> {
    let n = mean_image.len() as f64;
    if n == 0.0 {
        return Array2::from_elem((0, 0), false);
    }
    let global_mean: f64 = mean_image.iter().map(|&v| v as f64).sum::<f64>() / n;
    let cutoff = (factor * global_mean) as f32;
    mean_image.mapv(|v| v > cutoff)
}

/// Erode isolated mask points: convolve with a 3x3 kernel whose corners
/// and edges weigh 1 and whose center weighs [`MASK_CENTER_WEIGHT`],
/// subtract the center contribution, and keep pixels whose remaining
/// neighbor sum reaches `min_neighbors`. Repeated `iterations` times.
pub fn denoise_mask(mask: &Array2<bool>, iterations: usize, min_neighbors: i32) -> Array2<bool> {
    let mut current = mask.clone();
    for _ in 0..iterations {
        current = denoise_pass(&current, min_neighbors);
    }
    current
}

fn denoise_pass(mask: &Array2<bool>, min_neighbors: i32) -> Array2<bool> {
    let (h, w) = mask.dim();
    let mut result = Array2::from_elem((h, w), false);

    for row in 0..h {
        for col in 0..w {
            let mut weighted = 0i32;
            for dr in -1..=1_i32 {
                for dc in -1..=1_i32 {
                    let nr = row as i32 + dr;
                    let nc = col as i32 + dc;
                    if nr < 0 || nr >= h as i32 || nc < 0 || nc >= w as i32 {
                        continue;
                    }
                    if mask[[nr as usize, nc as usize]] {
                        weighted += if dr == 0 && dc == 0 {
                            MASK_CENTER_WEIGHT
                        } else {
                            1
                        };
                    }
                }
            }
            // Subtracting the full center weight means an "off" center can
            // never reach the cutoff: the pass only erodes, never grows.
            result[[row, col]] = weighted - MASK_CENTER_WEIGHT >= min_neighbors;
        }
    }

    result
}
