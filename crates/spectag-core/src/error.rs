use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SpectagError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid recording container: {0}")]
    InvalidRecording(String),

    #[error("Frame index {index} out of range (total: {total})")]
    FrameIndexOutOfRange { index: usize, total: usize },

    #[error(
        "Stack dimensions {found_width}x{found_height} (binning {found_binning}) \
         do not match aggregate {width}x{height} (binning {binning})"
    )]
    DimensionMismatch {
        width: usize,
        height: usize,
        binning: u32,
        found_width: usize,
        found_height: usize,
        found_binning: u32,
    },

    #[error("File name matches neither the _video nor the _module convention: {0}")]
    UnrecognizedFile(PathBuf),

    #[error("Module recording is missing its metadata partner: {0}")]
    MissingMetadata(PathBuf),

    #[error("Empty frame sequence")]
    EmptySequence,

    #[error("ROI width {roi_width} invalid for {width}x{height} frames (must be odd and fit)")]
    InvalidRoiWidth {
        roi_width: usize,
        width: usize,
        height: usize,
    },

    #[error("Calibration needs at least 2 spot regions, found {found}")]
    InsufficientRegions { found: usize },

    #[error("Degenerate normalization: {0}")]
    DegenerateNormalization(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::ser::Error),

    #[error("Image format error: {0}")]
    ImageError(#[from] image::ImageError),
}

pub type Result<T> = std::result::Result<T, SpectagError>;
