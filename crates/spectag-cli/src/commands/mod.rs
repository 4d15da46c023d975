pub mod calibrate;
pub mod detect;
pub mod export;
pub mod extract;
pub mod import;
pub mod info;

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use spectag_core::detect::CalibrationImage;
use spectag_core::frame::FrameStack;
use spectag_core::geometry::GeometryDescriptor;
use spectag_core::io::{RawDecoder, RecordingDecoder, RecordingSource};

/// ROI geometry taken from a TOML file or assembled from flags.
#[derive(Args)]
pub struct GeometryArgs {
    /// Geometry TOML file (overrides the individual flags)
    #[arg(long)]
    pub geometry: Option<PathBuf>,

    /// ROI center, pixel columns
    #[arg(long, default_value = "0")]
    pub center_x: f64,

    /// ROI center, pixel rows
    #[arg(long, default_value = "0")]
    pub center_y: f64,

    /// Dispersion-axis rotation, degrees counter-clockwise
    #[arg(long, default_value = "0")]
    pub angle: f64,

    /// ROI width in pixels (odd)
    #[arg(long, default_value = "21")]
    pub roi_width: usize,

    /// Reference pixel shift of the first diffraction order
    #[arg(long, default_value = "0")]
    pub ref_shift: f64,

    /// Reference wavelength, nanometers
    #[arg(long, default_value = "532")]
    pub ref_wavelength: f64,
}

impl GeometryArgs {
    pub fn resolve(&self) -> Result<GeometryDescriptor> {
        if let Some(path) = &self.geometry {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading geometry file {}", path.display()))?;
            return Ok(toml::from_str(&text)?);
        }
        Ok(GeometryDescriptor {
            center_x: self.center_x,
            center_y: self.center_y,
            angle_deg: self.angle,
            roi_width: self.roi_width,
            ref_shift: self.ref_shift,
            ref_wavelength: self.ref_wavelength,
        })
    }
}

/// Decode one recording file into a normalized frame stack.
pub fn load_stack(path: &PathBuf) -> Result<FrameStack> {
    let source = RecordingSource::classify(path)?;
    let decoded = RawDecoder.decode(&source)?;
    let stack = FrameStack::from_decoded(decoded)?;
    tracing::debug!(
        "loaded {} frames ({}x{}) from {}",
        stack.frames,
        stack.width,
        stack.height,
        path.display()
    );
    Ok(stack)
}

/// Decode a calibration recording into its mean/std image pair.
pub fn load_calibration_image(path: &PathBuf) -> Result<CalibrationImage> {
    let stack = load_stack(path)?;
    Ok(CalibrationImage::from_stack(&stack))
}
