//! Errors returned while constructing or reading an [`Mp3Stream`](crate::Mp3Stream).
//!
//! Header corruption never shows up here: the frame scanner recovers from it
//! by resynchronizing one byte at a time. A frame cut short at the end of the
//! source is likewise reported as a clean end of stream, not as an error.

use std::io;

use crate::common::assert_error_traits;
use crate::decoder::FrameDecodeError;
use crate::header::Layer;

/// Convenience alias for results produced by this crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Error that can happen while demultiplexing an MP3 stream.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The source contains no decodable audio frame, or declares an ID3
    /// container that it cannot deliver.
    #[error("invalid mp3 stream: {0}")]
    StreamInvalid(&'static str),

    /// A frame header declares an MPEG layer other than Layer III.
    #[error("unsupported mpeg layer: {layer}")]
    UnsupportedLayer {
        /// The layer found in the header.
        layer: Layer,
    },

    /// The underlying byte source failed.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// The frame decoder produced more samples than the PCM buffers can hold.
    #[error("pcm buffer holds {capacity} samples per channel but the frame needs {needed}")]
    PcmBufferTooSmall {
        /// Samples per channel produced by the frame.
        needed: usize,
        /// Samples per channel the buffer can hold.
        capacity: usize,
    },

    /// The frame decoder failed in a way that cannot be skipped.
    #[error("frame decoder failed")]
    FrameDecode(#[source] FrameDecodeError),

    /// The builder was given settings that cannot work.
    #[error("invalid settings: {0}")]
    InvalidSettings(&'static str),

    /// No frame decoder was supplied and no built-in decoder is enabled.
    #[error("no frame decoder available, enable the `symphonia-mp3` feature or supply one")]
    NoFrameDecoder,
}
assert_error_traits!(Error);

impl From<FrameDecodeError> for Error {
    fn from(err: FrameDecodeError) -> Self {
        match err {
            FrameDecodeError::BufferTooSmall { needed, capacity } => {
                Error::PcmBufferTooSmall { needed, capacity }
            }
            other => Error::FrameDecode(other),
        }
    }
}
