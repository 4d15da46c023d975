pub mod classify;
pub mod image_io;
pub mod raw;

pub use classify::{classify_files, RecordingSource};
pub use raw::{RawDecoder, RawRecording};

use crate::error::Result;
use crate::frame::DecodedRecording;

/// The external decoder collaborator's contract: turn a classified
/// source into raw counts plus scalar acquisition metadata.
pub trait RecordingDecoder {
    fn decode(&self, source: &RecordingSource) -> Result<DecodedRecording>;
}
