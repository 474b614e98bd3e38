//! The boundary to the engine that turns one compressed frame into PCM.
//!
//! The demultiplexer never looks inside a frame body. It hands each validated
//! frame to a [`FrameDecoder`] and gets back per-channel 16-bit samples.
//! Any engine can sit behind the trait; [`SymphoniaFrameDecoder`] is the
//! built-in one.

use crate::common::assert_error_traits;

#[cfg(feature = "symphonia-mp3")]
mod symphonia;

#[cfg(feature = "symphonia-mp3")]
pub use self::symphonia::SymphoniaFrameDecoder;

/// Error returned by a [`FrameDecoder`].
#[derive(Debug, thiserror::Error)]
pub enum FrameDecodeError {
    /// The frame could not be decoded but the stream may continue. It is
    /// treated like a frame that produced no samples.
    #[error("corrupt frame: {0}")]
    Corrupt(String),

    /// The output buffers are too small for the decoded frame.
    #[error("frame decodes to {needed} samples per channel, buffer holds {capacity}")]
    BufferTooSmall {
        /// Samples per channel the frame decodes to.
        needed: usize,
        /// Samples per channel the output buffers can hold.
        capacity: usize,
    },

    /// The engine failed and cannot continue.
    #[error("frame decoder backend failed")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
}
assert_error_traits!(FrameDecodeError);

/// Decodes one compressed MPEG audio frame at a time.
///
/// Implementations may keep state between calls (Layer III frames borrow
/// bits from their predecessors), so frames are always passed in stream order.
pub trait FrameDecoder {
    /// Decodes the frame occupying the first `frame_size` bytes of `data`.
    ///
    /// `data` starts at a verified frame header and holds at least
    /// `frame_size` bytes. On success the first `n` samples of `left` (and,
    /// for stereo frames, of `right`) hold the decoded PCM, where `n` is the
    /// returned count. Mono frames only fill `left`.
    ///
    /// Returning `Ok(0)` is legal: decoders commonly consume a few priming
    /// frames at the start of a stream without producing output.
    fn decode(
        &mut self,
        data: &[u8],
        frame_size: usize,
        left: &mut [i16],
        right: &mut [i16],
    ) -> Result<usize, FrameDecodeError>;
}

impl<D: FrameDecoder + ?Sized> FrameDecoder for Box<D> {
    #[inline]
    fn decode(
        &mut self,
        data: &[u8],
        frame_size: usize,
        left: &mut [i16],
        right: &mut [i16],
    ) -> Result<usize, FrameDecodeError> {
        (**self).decode(data, frame_size, left, right)
    }
}

/// The decoder used when none is supplied to the builder.
pub(crate) fn default_frame_decoder() -> Option<Box<dyn FrameDecoder + Send>> {
    #[cfg(feature = "symphonia-mp3")]
    {
        Some(Box::new(SymphoniaFrameDecoder::new()))
    }
    #[cfg(not(feature = "symphonia-mp3"))]
    {
        None
    }
}
