#![allow(dead_code)]

use ndarray::Array3;

use spectag_core::frame::{DecodedRecording, FrameStack};

/// Build a decoded recording with per-sample values from `f(frame, row, col)`.
pub fn decoded(
    frames: usize,
    height: usize,
    width: usize,
    f: impl Fn(usize, usize, usize) -> f32,
) -> DecodedRecording {
    let mut data = Array3::<f32>::zeros((frames, height, width));
    for fi in 0..frames {
        for row in 0..height {
            for col in 0..width {
                data[[fi, row, col]] = f(fi, row, col);
            }
        }
    }
    DecodedRecording {
        width,
        height,
        frames,
        binning: 1,
        frame_interval: 0.01,
        exposure: 0.005,
        data,
    }
}

/// Normalized stack built from `f(frame, row, col)`.
pub fn stack(
    frames: usize,
    height: usize,
    width: usize,
    f: impl Fn(usize, usize, usize) -> f32,
) -> FrameStack {
    FrameStack::from_decoded(decoded(frames, height, width, f)).unwrap()
}

/// Deterministic pseudo-noise in [-amplitude, amplitude].
pub struct Lcg(pub u64);

impl Lcg {
    pub fn next_noise(&mut self, amplitude: f32) -> f32 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        let unit = (self.0 >> 33) as f32 / (1u64 << 31) as f32;
        (unit - 0.5) * 2.0 * amplitude
    }
}
