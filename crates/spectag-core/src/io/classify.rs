//! Import-batch classification by filename suffix convention.
//!
//! `<name>_video.<ext>` is a complete recording (data and metadata in
//! one container); `<name>_module.<ext>` is an ROI recording whose
//! scalar metadata lives in the sibling `<name>_metadata.<ext>`.

use std::path::{Path, PathBuf};

use tracing::warn;

use crate::descriptor::VideoFileRecord;
use crate::error::{Result, SpectagError};

const VIDEO_SUFFIX: &str = "_video";
const MODULE_SUFFIX: &str = "_module";
const METADATA_SUFFIX: &str = "_metadata";

/// A classified input recording. Each variant carries exactly the files
/// it needs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RecordingSource {
    /// Complete recording: one container holds data and metadata.
    Full { data: PathBuf },
    /// ROI recording plus its separate metadata container.
    Roi { data: PathBuf, metadata: PathBuf },
}

impl RecordingSource {
    /// Classify a single file. Fails with `UnrecognizedFile` when the
    /// name matches neither suffix, or `MissingMetadata` when a module
    /// recording's partner file is absent.
    pub fn classify(path: &Path) -> Result<Self> {
        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| SpectagError::UnrecognizedFile(path.to_path_buf()))?;

        if stem.ends_with(VIDEO_SUFFIX) {
            return Ok(Self::Full {
                data: path.to_path_buf(),
            });
        }

        if let Some(base) = stem.strip_suffix(MODULE_SUFFIX) {
            let mut partner = path.to_path_buf();
            let mut name = format!("{base}{METADATA_SUFFIX}");
            if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
                name.push('.');
                name.push_str(ext);
            }
            partner.set_file_name(name);
            if !partner.is_file() {
                return Err(SpectagError::MissingMetadata(path.to_path_buf()));
            }
            return Ok(Self::Roi {
                data: path.to_path_buf(),
                metadata: partner,
            });
        }

        Err(SpectagError::UnrecognizedFile(path.to_path_buf()))
    }

    pub fn data_path(&self) -> &Path {
        match self {
            Self::Full { data } | Self::Roi { data, .. } => data,
        }
    }

    /// Format code used in the export record: 0 = full, 1 = ROI.
    pub fn format_code(&self) -> u8 {
        match self {
            Self::Full { .. } => 0,
            Self::Roi { .. } => 1,
        }
    }

    /// Export-record entry for this source. A full recording repeats the
    /// data path as its metadata path (one file carries both payloads).
    pub fn to_file_record(&self) -> VideoFileRecord {
        match self {
            Self::Full { data } => VideoFileRecord {
                format: 0,
                data: data.display().to_string(),
                meta: data.display().to_string(),
            },
            Self::Roi { data, metadata } => VideoFileRecord {
                format: 1,
                data: data.display().to_string(),
                meta: metadata.display().to_string(),
            },
        }
    }
}

/// Classify an import batch with a partial-success policy: items that
/// fail classification are dropped with a warning, the rest proceed.
pub fn classify_files(paths: &[PathBuf]) -> Vec<RecordingSource> {
    let mut sources = Vec::with_capacity(paths.len());
    for path in paths {
        match RecordingSource::classify(path) {
            Ok(source) => sources.push(source),
            Err(err) => warn!("skipping import item: {err}"),
        }
    }
    sources
}
