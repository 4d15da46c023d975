//! Memory-mapped reader/writer for the decoded-recording interchange
//! container the external decoder collaborator emits.
//!
//! Layout: 40-byte header (magic, version, binning, width, height,
//! frame count, kinetic cycle, exposure) followed by frames × height ×
//! width little-endian u16 samples. Not the instrument's native
//! container; that format is decoded upstream.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use memmap2::Mmap;
use ndarray::Array3;

use crate::error::{Result, SpectagError};
use crate::frame::DecodedRecording;
use crate::io::{RecordingDecoder, RecordingSource};

const RAW_HEADER_SIZE: usize = 40;
const RAW_MAGIC: &[u8; 8] = b"SPECTREC";
const RAW_VERSION: u16 = 1;

/// Parsed interchange header.
#[derive(Clone, Debug)]
pub struct RawHeader {
    pub version: u16,
    pub binning: u16,
    pub width: u32,
    pub height: u32,
    pub frames: u32,
    pub frame_interval: f64,
    pub exposure: f64,
}

/// Memory-mapped interchange container.
pub struct RawRecording {
    mmap: Mmap,
    pub header: RawHeader,
}

impl RawRecording {
    /// Open a container, parse its header, and repair a zero frame
    /// count from the payload size (ROI-mode writers leave the field
    /// unset).
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        let mmap = unsafe { Mmap::map(&file)? };

        if mmap.len() < RAW_HEADER_SIZE {
            return Err(SpectagError::InvalidRecording(
                "file too small for header".into(),
            ));
        }
        if &mmap[0..8] != RAW_MAGIC {
            return Err(SpectagError::InvalidRecording(
                "missing SPECTREC magic".into(),
            ));
        }

        let mut header = parse_header(&mmap[..RAW_HEADER_SIZE])?;

        let pixel_count = header.width as usize * header.height as usize;
        if header.frames == 0 && pixel_count > 0 {
            header.frames = ((mmap.len() - RAW_HEADER_SIZE) / (2 * pixel_count)) as u32;
        }

        let expected = RAW_HEADER_SIZE + 2 * pixel_count * header.frames as usize;
        if mmap.len() < expected {
            return Err(SpectagError::InvalidRecording(format!(
                "file truncated: expected at least {} bytes, got {}",
                expected,
                mmap.len()
            )));
        }

        Ok(Self { mmap, header })
    }

    pub fn frame_count(&self) -> usize {
        self.header.frames as usize
    }

    /// Decode the full payload into raw counts plus metadata.
    pub fn decode(&self) -> Result<DecodedRecording> {
        let w = self.header.width as usize;
        let h = self.header.height as usize;
        let frames = self.frame_count();
        if frames == 0 || w == 0 || h == 0 {
            return Err(SpectagError::EmptySequence);
        }

        let mut data = Array3::<f32>::zeros((frames, h, w));
        let payload = &self.mmap[RAW_HEADER_SIZE..];
        for f in 0..frames {
            for row in 0..h {
                for col in 0..w {
                    let idx = 2 * ((f * h + row) * w + col);
                    let sample = u16::from_le_bytes([payload[idx], payload[idx + 1]]);
                    data[[f, row, col]] = sample as f32;
                }
            }
        }

        Ok(DecodedRecording {
            width: w,
            height: h,
            frames,
            binning: self.header.binning as u32,
            frame_interval: self.header.frame_interval,
            exposure: self.header.exposure,
            data,
        })
    }
}

fn parse_header(buf: &[u8]) -> Result<RawHeader> {
    let mut cursor = std::io::Cursor::new(&buf[8..]);
    let version = cursor.read_u16::<LittleEndian>()?;
    let binning = cursor.read_u16::<LittleEndian>()?;
    let width = cursor.read_u32::<LittleEndian>()?;
    let height = cursor.read_u32::<LittleEndian>()?;
    let frames = cursor.read_u32::<LittleEndian>()?;
    let frame_interval = cursor.read_f64::<LittleEndian>()?;
    let exposure = cursor.read_f64::<LittleEndian>()?;

    if version != RAW_VERSION {
        return Err(SpectagError::InvalidRecording(format!(
            "unsupported container version {version}"
        )));
    }

    Ok(RawHeader {
        version,
        binning,
        width,
        height,
        frames,
        frame_interval,
        exposure,
    })
}

/// Write a recording into the interchange container. Samples are
/// rounded and clamped to the u16 range. Metadata-only containers
/// (empty payload) are produced by writing a recording with zero-sized
/// data.
pub fn write_raw(path: &Path, rec: &DecodedRecording) -> Result<()> {
    let file = File::create(path)?;
    let mut out = BufWriter::new(&file);

    out.write_all(RAW_MAGIC)?;
    out.write_u16::<LittleEndian>(RAW_VERSION)?;
    out.write_u16::<LittleEndian>(rec.binning as u16)?;
    out.write_u32::<LittleEndian>(rec.width as u32)?;
    out.write_u32::<LittleEndian>(rec.height as u32)?;
    out.write_u32::<LittleEndian>(rec.frames as u32)?;
    out.write_f64::<LittleEndian>(rec.frame_interval)?;
    out.write_f64::<LittleEndian>(rec.exposure)?;

    for &v in rec.data.iter() {
        out.write_u16::<LittleEndian>(v.round().clamp(0.0, 65_535.0) as u16)?;
    }
    out.flush()?;
    Ok(())
}

/// [`RecordingDecoder`] over interchange containers. ROI sources take
/// their scalar metadata from the partner container.
pub struct RawDecoder;

impl RecordingDecoder for RawDecoder {
    fn decode(&self, source: &RecordingSource) -> Result<DecodedRecording> {
        match source {
            RecordingSource::Full { data } => RawRecording::open(data)?.decode(),
            RecordingSource::Roi { data, metadata } => {
                let rec = RawRecording::open(data)?.decode()?;
                let meta = RawRecording::open(metadata)?;
                Ok(DecodedRecording {
                    binning: meta.header.binning as u32,
                    frame_interval: meta.header.frame_interval,
                    exposure: meta.header.exposure,
                    ..rec
                })
            }
        }
    }
}
