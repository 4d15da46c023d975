use ndarray::{Array2, ArrayView2};
use tracing::{info, warn};

use crate::error::{Result, SpectagError};
use crate::frame::FrameStack;

/// Aggregate view over one or more composed frame stacks: a unified
/// logical frame sequence plus per-pixel statistics across all stacks.
#[derive(Clone, Debug)]
pub struct FrameStore {
    stacks: Vec<FrameStack>,
    total_frames: usize,
    max_image: Array2<f32>,
    mean_image: Array2<f32>,
}

impl FrameStore {
    /// Compose stacks into one aggregate. Stacks disagreeing with the
    /// first stack's width/height/binning are excluded with a warning;
    /// frame-interval or exposure drift is tolerated but logged.
    /// Fails only when no stack survives.
    pub fn compose(stacks: Vec<FrameStack>) -> Result<Self> {
        let mut accepted: Vec<FrameStack> = Vec::with_capacity(stacks.len());

        for stack in stacks {
            if let Some(reference) = accepted.first().map(|r| {
                (
                    r.width,
                    r.height,
                    r.binning,
                    r.kinetic_cycle,
                    r.exposure,
                )
            }) {
                let (width, height, binning, kinetic_cycle, exposure) = reference;
                if stack.width != width || stack.height != height || stack.binning != binning {
                    warn!(
                        "excluding stack: {}",
                        SpectagError::DimensionMismatch {
                            width,
                            height,
                            binning,
                            found_width: stack.width,
                            found_height: stack.height,
                            found_binning: stack.binning,
                        }
                    );
                    continue;
                }
                if (stack.kinetic_cycle - kinetic_cycle).abs() > f64::EPSILON
                    || (stack.exposure - exposure).abs() > f64::EPSILON
                {
                    warn!(
                        "stack timing differs from aggregate (interval {} vs {}, \
                         exposure {} vs {}); pooling anyway",
                        stack.kinetic_cycle, kinetic_cycle, stack.exposure, exposure
                    );
                }
            }
            accepted.push(stack);
        }

        if accepted.is_empty() {
            return Err(SpectagError::EmptySequence);
        }

        let total_frames = accepted.iter().map(|s| s.frames).sum();
        let (max_image, mean_image) = aggregate_projections(&accepted);
        info!(
            "composed {} stacks, {} frames total",
            accepted.len(),
            total_frames
        );

        Ok(Self {
            stacks: accepted,
            total_frames,
            max_image,
            mean_image,
        })
    }

    /// Map a logical frame index onto (stack index, local frame index)
    /// by walking stacks in insertion order.
    pub fn locate(&self, frame: usize) -> Result<(usize, usize)> {
        if frame >= self.total_frames {
            return Err(SpectagError::FrameIndexOutOfRange {
                index: frame,
                total: self.total_frames,
            });
        }
        let mut remaining = frame;
        for (stack_index, stack) in self.stacks.iter().enumerate() {
            if remaining < stack.frames {
                return Ok((stack_index, remaining));
            }
            remaining -= stack.frames;
        }
        unreachable!("frame index checked against total")
    }

    /// View of the logical frame `index`.
    pub fn frame(&self, index: usize) -> Result<ArrayView2<'_, f32>> {
        let (stack_index, local) = self.locate(index)?;
        self.stacks[stack_index].frame(local)
    }

    pub fn stacks(&self) -> &[FrameStack] {
        &self.stacks
    }

    pub fn total_frames(&self) -> usize {
        self.total_frames
    }

    pub fn width(&self) -> usize {
        self.stacks[0].width
    }

    pub fn height(&self) -> usize {
        self.stacks[0].height
    }

    pub fn binning(&self) -> u32 {
        self.stacks[0].binning
    }

    /// Elementwise maximum of the per-stack max projections.
    pub fn max_image(&self) -> &Array2<f32> {
        &self.max_image
    }

    /// Elementwise mean of the per-stack mean projections.
    pub fn mean_image(&self) -> &Array2<f32> {
        &self.mean_image
    }
}

fn aggregate_projections(stacks: &[FrameStack]) -> (Array2<f32>, Array2<f32>) {
    let (h, w) = (stacks[0].height, stacks[0].width);
    let mut max_image = Array2::<f32>::from_elem((h, w), f32::NEG_INFINITY);
    let mut mean_sum = Array2::<f64>::zeros((h, w));

    for stack in stacks {
        let stack_max = stack.max_projection();
        max_image.zip_mut_with(&stack_max, |a, &v| *a = a.max(v));
        let stack_mean = stack.mean_projection();
        mean_sum.zip_mut_with(&stack_mean, |a, &v| *a += v as f64);
    }

    let n = stacks.len() as f64;
    (max_image, mean_sum.mapv(|v| (v / n) as f32))
}
