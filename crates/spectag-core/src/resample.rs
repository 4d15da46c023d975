//! Per-frame 2-D spline resampling of frame stacks onto arbitrary
//! (rotated, sub-pixel) coordinate grids.
//!
//! For every frame a separable spline surface is fitted once over the
//! frame's native integer pixel grid, then evaluated at the paired
//! target coordinate arrays. The cubic (default) path runs the standard
//! recursive B-spline prefilter so the surface interpolates the samples
//! exactly; the linear path samples the raw grid directly.
//!
//! Out-of-bounds policy: cubic clamps target coordinates to the source
//! domain edge; linear substitutes the stack's per-pixel temporal
//! minimum, evaluated at the clamped coordinate.

use ndarray::{Array2, Array3, ArrayView2, Axis};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::consts::{
    CUBIC_SPLINE_POLE, PARALLEL_FRAME_THRESHOLD, PARALLEL_PIXEL_THRESHOLD,
    SPLINE_PREFILTER_TOLERANCE,
};
use crate::error::{Result, SpectagError};
use crate::frame::FrameStack;
use crate::geometry::SamplingGrid;
use crate::store::FrameStore;

/// Interpolation degree for the per-frame spline surface.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SplineDegree {
    /// Bilinear sampling of the raw pixel grid.
    Linear,
    /// Interpolating bicubic B-spline (prefiltered coefficients).
    #[default]
    Cubic,
}

/// A fitted separable spline surface over one frame's pixel grid.
pub struct SplineSurface {
    coeffs: Array2<f64>,
    degree: SplineDegree,
}

impl SplineSurface {
    /// Fit the surface. For the cubic degree this runs the recursive
    /// prefilter along rows, then columns; for linear the coefficients
    /// are the samples themselves.
    pub fn fit(frame: ArrayView2<'_, f32>, degree: SplineDegree) -> Self {
        let mut coeffs = frame.mapv(|v| v as f64);
        if degree == SplineDegree::Cubic {
            prefilter_2d(&mut coeffs);
        }
        Self { coeffs, degree }
    }

    /// Evaluate at a (row, col) coordinate inside the domain
    /// `[0, h-1] x [0, w-1]`. Callers clamp beforehand.
    pub fn eval(&self, y: f64, x: f64) -> f64 {
        match self.degree {
            SplineDegree::Linear => self.eval_linear(y, x),
            SplineDegree::Cubic => self.eval_cubic(y, x),
        }
    }

    fn eval_linear(&self, y: f64, x: f64) -> f64 {
        let (h, w) = self.coeffs.dim();
        let y0 = (y.floor() as usize).min(h - 1);
        let x0 = (x.floor() as usize).min(w - 1);
        let y1 = (y0 + 1).min(h - 1);
        let x1 = (x0 + 1).min(w - 1);
        let fy = y - y0 as f64;
        let fx = x - x0 as f64;

        let v00 = self.coeffs[[y0, x0]];
        let v01 = self.coeffs[[y0, x1]];
        let v10 = self.coeffs[[y1, x0]];
        let v11 = self.coeffs[[y1, x1]];

        v00 * (1.0 - fy) * (1.0 - fx)
            + v01 * (1.0 - fy) * fx
            + v10 * fy * (1.0 - fx)
            + v11 * fy * fx
    }

    fn eval_cubic(&self, y: f64, x: f64) -> f64 {
        let (h, w) = self.coeffs.dim();
        let iy = y.floor() as isize;
        let ix = x.floor() as isize;
        let wy = bspline_weights(y - iy as f64);
        let wx = bspline_weights(x - ix as f64);

        let mut sum = 0.0;
        for (m, &wym) in wy.iter().enumerate() {
            let row = mirror(iy - 1 + m as isize, h as isize);
            for (n, &wxn) in wx.iter().enumerate() {
                let col = mirror(ix - 1 + n as isize, w as isize);
                sum += self.coeffs[[row, col]] * wym * wxn;
            }
        }
        sum
    }
}

/// Cubic B-spline basis weights for fractional offset `t` in [0, 1),
/// covering support points floor-1 .. floor+2.
fn bspline_weights(t: f64) -> [f64; 4] {
    let t2 = t * t;
    let t3 = t2 * t;
    let omt = 1.0 - t;
    [
        omt * omt * omt / 6.0,
        (3.0 * t3 - 6.0 * t2 + 4.0) / 6.0,
        (-3.0 * t3 + 3.0 * t2 + 3.0 * t + 1.0) / 6.0,
        t3 / 6.0,
    ]
}

/// Whole-sample mirror of an index into `[0, n)`.
fn mirror(index: isize, n: isize) -> usize {
    if n == 1 {
        return 0;
    }
    let period = 2 * (n - 1);
    let mut i = index.rem_euclid(period);
    if i >= n {
        i = period - i;
    }
    i as usize
}

/// In-place separable cubic B-spline prefilter (rows, then columns).
fn prefilter_2d(coeffs: &mut Array2<f64>) {
    let (h, w) = coeffs.dim();
    let mut buf = vec![0.0f64; h.max(w)];

    if w > 1 {
        for row in 0..h {
            for col in 0..w {
                buf[col] = coeffs[[row, col]];
            }
            prefilter_line(&mut buf[..w]);
            for col in 0..w {
                coeffs[[row, col]] = buf[col];
            }
        }
    }
    if h > 1 {
        for col in 0..w {
            for row in 0..h {
                buf[row] = coeffs[[row, col]];
            }
            prefilter_line(&mut buf[..h]);
            for row in 0..h {
                coeffs[[row, col]] = buf[row];
            }
        }
    }
}

/// Recursive causal/anticausal filter turning samples into interpolating
/// cubic B-spline coefficients (mirror boundary).
fn prefilter_line(line: &mut [f64]) {
    let n = line.len();
    let pole = CUBIC_SPLINE_POLE;
    let lambda = (1.0 - pole) * (1.0 - 1.0 / pole);

    for v in line.iter_mut() {
        *v *= lambda;
    }

    line[0] = causal_init(line, pole);
    for i in 1..n {
        line[i] += pole * line[i - 1];
    }

    line[n - 1] = anticausal_init(line, pole);
    for i in (0..n - 1).rev() {
        line[i] = pole * (line[i + 1] - line[i]);
    }
}

fn causal_init(line: &[f64], pole: f64) -> f64 {
    let horizon = (SPLINE_PREFILTER_TOLERANCE.ln() / pole.abs().ln()).ceil() as usize;
    let horizon = horizon.min(line.len());
    let mut zn = pole;
    let mut sum = line[0];
    for &v in &line[1..horizon] {
        sum += zn * v;
        zn *= pole;
    }
    sum
}

fn anticausal_init(line: &[f64], pole: f64) -> f64 {
    let n = line.len();
    (pole / (pole * pole - 1.0)) * (pole * line[n - 2] + line[n - 1])
}

/// Resample one frame onto the grid. `oob_floor`, when given, supplies
/// the value for out-of-domain coordinates (linear path); otherwise
/// coordinates are clamped to the domain edge.
pub fn resample_frame(
    frame: ArrayView2<'_, f32>,
    grid: &SamplingGrid,
    degree: SplineDegree,
    oob_floor: Option<&Array2<f32>>,
) -> Array2<f32> {
    let (h, w) = frame.dim();
    let (rows, cols) = grid.x.dim();
    let surface = SplineSurface::fit(frame, degree);
    let y_max = (h - 1) as f64;
    let x_max = (w - 1) as f64;

    let sample_row = |row: usize, out: &mut [f32]| {
        for (col, slot) in out.iter_mut().enumerate() {
            let x = grid.x[[row, col]];
            let y = grid.y[[row, col]];
            let inside = (0.0..=x_max).contains(&x) && (0.0..=y_max).contains(&y);
            let cx = x.clamp(0.0, x_max);
            let cy = y.clamp(0.0, y_max);
            *slot = if inside {
                surface.eval(cy, cx) as f32
            } else {
                match oob_floor {
                    Some(floor) => {
                        floor[[cy.round() as usize, cx.round() as usize]]
                    }
                    None => surface.eval(cy, cx) as f32,
                }
            };
        }
    };

    let mut out = Array2::<f32>::zeros((rows, cols));
    if rows * cols >= PARALLEL_PIXEL_THRESHOLD {
        let row_data: Vec<Vec<f32>> = (0..rows)
            .into_par_iter()
            .map(|row| {
                let mut line = vec![0.0f32; cols];
                sample_row(row, &mut line);
                line
            })
            .collect();
        for (row, line) in row_data.into_iter().enumerate() {
            for (col, val) in line.into_iter().enumerate() {
                out[[row, col]] = val;
            }
        }
    } else {
        let mut line = vec![0.0f32; cols];
        for row in 0..rows {
            sample_row(row, &mut line);
            for col in 0..cols {
                out[[row, col]] = line[col];
            }
        }
    }
    out
}

/// Resample every frame of a stack onto the grid, producing a
/// (frames, rows, cols) cube. One spline fit per frame; evaluation is
/// vectorized over the grid.
pub fn resample_stack(
    stack: &FrameStack,
    grid: &SamplingGrid,
    degree: SplineDegree,
) -> Result<Array3<f32>> {
    if grid.x.dim() != grid.y.dim() {
        return Err(SpectagError::DegenerateNormalization(
            "sampling grid coordinate arrays disagree in shape".into(),
        ));
    }
    let (rows, cols) = grid.x.dim();
    let floor = match degree {
        SplineDegree::Linear => Some(stack.min_projection()),
        SplineDegree::Cubic => None,
    };
    debug!(
        "resampling {} frames onto {}x{} grid ({:?})",
        stack.frames, rows, cols, degree
    );

    let frame_outputs: Vec<Array2<f32>> = if stack.frames >= PARALLEL_FRAME_THRESHOLD {
        (0..stack.frames)
            .into_par_iter()
            .map(|i| {
                let frame = stack.data.index_axis(Axis(0), i);
                resample_frame(frame, grid, degree, floor.as_ref())
            })
            .collect()
    } else {
        (0..stack.frames)
            .map(|i| {
                let frame = stack.data.index_axis(Axis(0), i);
                resample_frame(frame, grid, degree, floor.as_ref())
            })
            .collect()
    };

    let mut cube = Array3::<f32>::zeros((stack.frames, rows, cols));
    for (i, frame_out) in frame_outputs.into_iter().enumerate() {
        cube.index_axis_mut(Axis(0), i).assign(&frame_out);
    }
    Ok(cube)
}

/// Resample every stack in a store, concatenating along the frame axis
/// in insertion order. Reports fractional progress after each stack.
pub fn resample_store<F>(
    store: &FrameStore,
    grid: &SamplingGrid,
    degree: SplineDegree,
    mut on_progress: F,
) -> Result<Array3<f32>>
where
    F: FnMut(f32),
{
    let (rows, cols) = grid.x.dim();
    let total = store.total_frames();
    let mut cube = Array3::<f32>::zeros((total, rows, cols));

    let mut done = 0usize;
    for stack in store.stacks() {
        let part = resample_stack(stack, grid, degree)?;
        cube.slice_mut(ndarray::s![done..done + stack.frames, .., ..])
            .assign(&part);
        done += stack.frames;
        on_progress(done as f32 / total as f32);
    }
    Ok(cube)
}
