use ndarray::{Array2, Array3, ArrayView2, Axis};

use crate::error::{Result, SpectagError};

/// Output of the external recording decoder (§6 collaborator contract):
/// raw intensity counts plus the scalar acquisition metadata.
#[derive(Clone, Debug)]
pub struct DecodedRecording {
    pub width: usize,
    pub height: usize,
    pub frames: usize,
    pub binning: u32,
    /// Kinetic cycle time between frame starts, in seconds.
    pub frame_interval: f64,
    /// Exposure time per frame, in seconds.
    pub exposure: f64,
    /// Raw counts, shape = (frames, height, width).
    pub data: Array3<f32>,
}

/// One aligned recording: an ordered sequence of frames normalized to
/// [0.0, 1.0] by the stack's global maximum, immutable after construction.
#[derive(Clone, Debug)]
pub struct FrameStack {
    /// Normalized intensities, shape = (frames, height, width).
    pub data: Array3<f32>,
    pub width: usize,
    pub height: usize,
    pub frames: usize,
    /// Kinetic cycle time between frame starts, in seconds.
    pub kinetic_cycle: f64,
    /// Exposure time per frame, in seconds.
    pub exposure: f64,
    pub binning: u32,
}

impl FrameStack {
    /// Build a stack from decoded counts, normalizing by the global maximum.
    pub fn from_decoded(rec: DecodedRecording) -> Result<Self> {
        let (frames, height, width) = rec.data.dim();
        if frames == 0 || height == 0 || width == 0 {
            return Err(SpectagError::EmptySequence);
        }
        if frames != rec.frames || height != rec.height || width != rec.width {
            return Err(SpectagError::InvalidRecording(format!(
                "decoded shape ({frames}, {height}, {width}) disagrees with metadata \
                 ({}, {}, {})",
                rec.frames, rec.height, rec.width
            )));
        }

        let max = rec.data.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
        let data = if max > 0.0 {
            rec.data.mapv(|v| v / max)
        } else {
            rec.data
        };

        Ok(Self {
            data,
            width,
            height,
            frames,
            kinetic_cycle: rec.frame_interval,
            exposure: rec.exposure,
            binning: rec.binning,
        })
    }

    /// View of a single frame, shape = (height, width).
    pub fn frame(&self, index: usize) -> Result<ArrayView2<'_, f32>> {
        if index >= self.frames {
            return Err(SpectagError::FrameIndexOutOfRange {
                index,
                total: self.frames,
            });
        }
        Ok(self.data.index_axis(Axis(0), index))
    }

    /// Frames per second. Zero when the kinetic cycle is unknown.
    pub fn framerate(&self) -> f64 {
        if self.kinetic_cycle > 0.0 {
            1.0 / self.kinetic_cycle
        } else {
            0.0
        }
    }

    /// Per-pixel maximum across all frames.
    pub fn max_projection(&self) -> Array2<f32> {
        self.fold_frames(f32::NEG_INFINITY, f32::max)
    }

    /// Per-pixel minimum across all frames.
    pub fn min_projection(&self) -> Array2<f32> {
        self.fold_frames(f32::INFINITY, f32::min)
    }

    /// Per-pixel temporal mean.
    pub fn mean_projection(&self) -> Array2<f32> {
        let mut sum = Array2::<f64>::zeros((self.height, self.width));
        for frame in self.data.axis_iter(Axis(0)) {
            sum.zip_mut_with(&frame, |acc, &v| *acc += v as f64);
        }
        let n = self.frames as f64;
        sum.mapv(|v| (v / n) as f32)
    }

    /// Per-pixel temporal standard deviation (population).
    pub fn std_projection(&self) -> Array2<f32> {
        let mean = self.mean_projection();
        let mut sum_sq = Array2::<f64>::zeros((self.height, self.width));
        for frame in self.data.axis_iter(Axis(0)) {
            for ((row, col), &v) in frame.indexed_iter() {
                let d = v as f64 - mean[[row, col]] as f64;
                sum_sq[[row, col]] += d * d;
            }
        }
        let n = self.frames as f64;
        sum_sq.mapv(|v| (v / n).sqrt() as f32)
    }

    fn fold_frames(&self, init: f32, f: fn(f32, f32) -> f32) -> Array2<f32> {
        let mut acc = Array2::<f32>::from_elem((self.height, self.width), init);
        for frame in self.data.axis_iter(Axis(0)) {
            acc.zip_mut_with(&frame, |a, &v| *a = f(*a, v));
        }
        acc
    }
}
