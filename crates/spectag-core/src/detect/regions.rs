use ndarray::{Array2, ArrayView2};

use super::config::DetectionConfig;

/// Axis-aligned bounding box of one detected spot; bounds inclusive.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PrimitiveRegion {
    pub xmin: usize,
    pub xmax: usize,
    pub ymin: usize,
    pub ymax: usize,
}

impl PrimitiveRegion {
    pub fn width(&self) -> usize {
        self.xmax - self.xmin + 1
    }

    pub fn height(&self) -> usize {
        self.ymax - self.ymin + 1
    }

    /// Mean column position of the box.
    pub fn xmid(&self) -> f64 {
        0.5 * (self.xmin + self.xmax) as f64
    }

    pub fn ymid(&self) -> f64 {
        0.5 * (self.ymin + self.ymax) as f64
    }

    /// View of the region's pixels within `image`.
    pub fn slice<'a>(&self, image: &'a Array2<f32>) -> ArrayView2<'a, f32> {
        image.slice(ndarray::s![self.ymin..=self.ymax, self.xmin..=self.xmax])
    }
}

/// Extract candidate spot regions from a denoised mask.
///
/// The mask is projected onto each axis (counting set pixels along the
/// other axis, cutoff strictly greater than `projection_min_pixels`),
/// the x-projection is walked for contiguous "on" runs, and every run
/// becomes a region spanning that x-run and the *global* y-extent of
/// the y-projection. The shared y-extent is an instrument constraint:
/// all diffraction orders lie on one horizontal band. Runs narrower
/// than `min_region_width` are discarded.
pub fn extract_regions(mask: &Array2<bool>, config: &DetectionConfig) -> Vec<PrimitiveRegion> {
    let (h, w) = mask.dim();
    if h == 0 || w == 0 {
        return Vec::new();
    }

    let x_on: Vec<bool> = (0..w)
        .map(|col| (0..h).filter(|&row| mask[[row, col]]).count() > config.projection_min_pixels)
        .collect();
    let y_on: Vec<bool> = (0..h)
        .map(|row| (0..w).filter(|&col| mask[[row, col]]).count() > config.projection_min_pixels)
        .collect();

    let ymin = match y_on.iter().position(|&on| on) {
        Some(i) => i,
        None => return Vec::new(),
    };
    let ymax = y_on.iter().rposition(|&on| on).unwrap_or(ymin);

    let mut regions = Vec::new();
    let mut run_start: Option<usize> = None;
    for col in 0..=w {
        let on = col < w && x_on[col];
        match (run_start, on) {
            (None, true) => run_start = Some(col),
            (Some(start), false) => {
                regions.push(PrimitiveRegion {
                    xmin: start,
                    xmax: col - 1,
                    ymin,
                    ymax,
                });
                run_start = None;
            }
            _ => {}
        }
    }

    regions.retain(|r| r.width() >= config.min_region_width);
    regions
}
