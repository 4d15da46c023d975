//! The export record tying geometry, device tags, and particle metadata
//! together: one descriptor per tagged particle, filled incrementally
//! and serialized as a versioned structured record.

use std::time::SystemTime;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::consts::DESCRIPTOR_FORMAT_VERSION;
use crate::error::Result;
use crate::geometry::GeometryDescriptor;

/// Particle metadata. Canonical field set; the original tool's free-form
/// key aliases are resolved only through [`ParticleInfo::set_aliased`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticleInfo {
    pub size: String,
    pub material: String,
    #[serde(rename = "class")]
    pub class: String,
    pub comment: String,
}

impl Default for ParticleInfo {
    fn default() -> Self {
        Self {
            size: "unknown sized".into(),
            material: "unknown".into(),
            class: "unknown".into(),
            comment: String::new(),
        }
    }
}

impl ParticleInfo {
    /// Boundary adapter for `key=value` operator input. Accepted aliases
    /// (case-insensitive): `s`/`size`, `m`/`mat`/`material`,
    /// `t`/`type`/`c`/`class`, `comment`. Returns false for unknown keys.
    pub fn set_aliased(&mut self, key: &str, value: &str) -> bool {
        match key.to_ascii_lowercase().as_str() {
            "s" | "size" => self.size = value.to_string(),
            "m" | "mat" | "material" => self.material = value.to_string(),
            "t" | "type" | "c" | "class" => self.class = value.to_string(),
            "comment" => self.comment = value.to_string(),
            _ => return false,
        }
        true
    }

    /// One-line human description.
    pub fn describe(&self) -> String {
        if self.comment.is_empty() {
            format!("{} {} {}", self.size, self.material, self.class)
        } else {
            format!(
                "{} {} {} ({})",
                self.size, self.material, self.class, self.comment
            )
        }
    }
}

/// One source recording referenced by the descriptor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoFileRecord {
    /// 0 = full recording, 1 = ROI recording with separate metadata.
    pub format: u8,
    pub data: String,
    pub meta: String,
}

/// The session's export record, owned by the tagging session and filled
/// incrementally by operator actions.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Descriptor {
    pub videos: Vec<VideoFileRecord>,
    /// Zero-order spot position, pixel columns.
    pub x: f64,
    /// Zero-order spot position, pixel rows.
    pub y: f64,
    pub angle: f64,
    pub ref_offset: f64,
    pub ref_wavelength: f64,
    pub roi_width: usize,
    pub particle: ParticleInfo,
    /// Unique identifiers of the devices in the optical path.
    pub devices: Vec<String>,
}

/// Wire shape of the exported record; field order and key names are the
/// contract.
#[derive(Serialize, Deserialize)]
struct ExportRecord {
    version: String,
    files: Vec<VideoFileRecord>,
    #[serde(rename = "0th-order")]
    zeroth_order: [f64; 2],
    #[serde(rename = "1st-order")]
    first_order: FirstOrderRecord,
    img_width: usize,
    particle: ParticleInfo,
    devices: Vec<String>,
}

#[derive(Serialize, Deserialize)]
struct FirstOrderRecord {
    angle: f64,
    #[serde(rename = "ref-offset")]
    ref_offset: f64,
    #[serde(rename = "ref-wavelength")]
    ref_wavelength: f64,
}

/// Output encoding for [`Descriptor::serialize`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Toml,
}

impl Descriptor {
    /// Copy the session geometry into the export fields.
    pub fn apply_geometry(&mut self, geometry: &GeometryDescriptor) {
        self.x = geometry.center_x;
        self.y = geometry.center_y;
        self.angle = geometry.angle_deg;
        self.ref_offset = geometry.ref_shift;
        self.ref_wavelength = geometry.ref_wavelength;
        self.roi_width = geometry.roi_width;
    }

    /// The versioned structured record (deterministic key set).
    pub fn to_record(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self.export_record())?)
    }

    /// Rebuild a descriptor from a previously exported record.
    pub fn from_record(record: serde_json::Value) -> Result<Self> {
        let record: ExportRecord = serde_json::from_value(record)?;
        if record.version != DESCRIPTOR_FORMAT_VERSION {
            warn!(
                "descriptor record version {} (expected {})",
                record.version, DESCRIPTOR_FORMAT_VERSION
            );
        }
        Ok(Self {
            videos: record.files,
            x: record.zeroth_order[0],
            y: record.zeroth_order[1],
            angle: record.first_order.angle,
            ref_offset: record.first_order.ref_offset,
            ref_wavelength: record.first_order.ref_wavelength,
            roi_width: record.img_width,
            particle: record.particle,
            devices: record.devices,
        })
    }

    /// Pretty-printed structured text (2-space indent for JSON).
    pub fn serialize(&self, format: ExportFormat) -> Result<String> {
        let record = self.export_record();
        match format {
            ExportFormat::Json => Ok(serde_json::to_string_pretty(&record)?),
            ExportFormat::Toml => Ok(toml::to_string_pretty(&record)?),
        }
    }

    fn export_record(&self) -> ExportRecord {
        ExportRecord {
            version: DESCRIPTOR_FORMAT_VERSION.to_string(),
            files: self.videos.clone(),
            zeroth_order: [self.x, self.y],
            first_order: FirstOrderRecord {
                angle: self.angle,
                ref_offset: self.ref_offset,
                ref_wavelength: self.ref_wavelength,
            },
            img_width: self.roi_width,
            particle: self.particle.clone(),
            devices: self.devices.clone(),
        }
    }
}

/// File name for an exported descriptor: `<date>-object<NNNN>.<ext>`,
/// the date taken from the source recording's modification timestamp
/// and NNNN the operator-incremented counter.
pub fn export_file_name(source_mtime: SystemTime, counter: u32, extension: &str) -> String {
    let date: DateTime<Local> = source_mtime.into();
    format!(
        "{}-object{:04}.{}",
        date.format("%Y-%m-%d"),
        counter,
        extension
    )
}
