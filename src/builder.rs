//! Builder pattern for configuring and constructing an [`Mp3Stream`].
//!
//! # Examples
//!
//! ```no_run
//! use std::fs::File;
//! use streamp3::Mp3Stream;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let file = File::open("audio.mp3")?;
//!
//!     let stream = Mp3Stream::builder()
//!         .with_data(file)
//!         .with_pcm_buffer_size(16 * 1024) // bytes per channel
//!         .with_chunk_size(4096)           // bytes per source read
//!         .with_raw_copy(true)             // keep the compressed bytes too
//!         .build()?;
//!
//!     // Use the stream...
//!     Ok(())
//! }
//! ```
//!
//! # Settings
//!
//! - `pcm_buffer_size` - Bytes per channel of decoded PCM the stream can hold
//! - `chunk_size` - Bytes requested from the source per read
//! - `raw_copy` - Return the consumed source bytes alongside the PCM
//! - `frame_sizing` - How frame lengths are derived from headers

use std::fmt;
use std::io::Read;

use crate::decoder::{default_frame_decoder, FrameDecoder};
use crate::error::{Error, Result};
use crate::header::FrameSizing;
use crate::stream::Mp3Stream;

/// Default size of each per-channel PCM buffer, in bytes.
pub const PCM_BUFFER_SIZE: usize = 65536;

/// Default number of bytes requested from the source per read.
pub const CHUNK_SIZE: usize = 8192;

/// Stream configuration settings.
#[derive(Clone, Debug)]
pub(crate) struct Settings {
    /// Capacity of each per-channel PCM buffer in bytes. Must hold the largest
    /// frame the stream decodes: 1152 samples, so 2304 bytes, for MPEG-1.
    pub(crate) pcm_buffer_size: usize,

    /// Number of bytes requested from the source per read.
    pub(crate) chunk_size: usize,

    /// Whether consumed source bytes are returned by `read_chunk`.
    pub(crate) raw_copy: bool,

    /// How frame lengths are computed from headers.
    pub(crate) frame_sizing: FrameSizing,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            pcm_buffer_size: PCM_BUFFER_SIZE,
            chunk_size: CHUNK_SIZE,
            raw_copy: false,
            frame_sizing: FrameSizing::default(),
        }
    }
}

/// Builder for configuring and creating an [`Mp3Stream`].
pub struct Mp3StreamBuilder<R> {
    /// The input data source to decode.
    data: Option<R>,
    /// Configuration settings for the stream.
    settings: Settings,
    /// Frame decoder to use instead of the built-in one.
    decoder: Option<Box<dyn FrameDecoder + Send>>,
}

impl<R> Default for Mp3StreamBuilder<R> {
    fn default() -> Self {
        Self {
            data: None,
            settings: Settings::default(),
            decoder: None,
        }
    }
}

impl<R> fmt::Debug for Mp3StreamBuilder<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mp3StreamBuilder")
            .field("has_data", &self.data.is_some())
            .field("settings", &self.settings)
            .field("custom_decoder", &self.decoder.is_some())
            .finish()
    }
}

impl<R: Read> Mp3StreamBuilder<R> {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the input data source to decode.
    pub fn with_data(mut self, data: R) -> Self {
        self.data = Some(data);
        self
    }

    /// Sets the capacity of each per-channel PCM buffer, in bytes.
    ///
    /// Defaults to [`PCM_BUFFER_SIZE`]. A frame that decodes to more samples
    /// than fit makes reads fail with [`Error::PcmBufferTooSmall`].
    pub fn with_pcm_buffer_size(mut self, bytes: usize) -> Self {
        self.settings.pcm_buffer_size = bytes;
        self
    }

    /// Sets how many bytes are requested from the source per read.
    ///
    /// Defaults to [`CHUNK_SIZE`]. Smaller chunks lower latency on live
    /// sources; larger ones mean fewer reads.
    pub fn with_chunk_size(mut self, bytes: usize) -> Self {
        self.settings.chunk_size = bytes;
        self
    }

    /// Enables or disables raw copy. This is disabled by default.
    ///
    /// When enabled, [`Mp3Stream::read_chunk`] and [`Mp3Stream::chunks`] return
    /// the compressed source bytes consumed for every chunk of PCM.
    pub fn with_raw_copy(mut self, raw_copy: bool) -> Self {
        self.settings.raw_copy = raw_copy;
        self
    }

    /// Selects how frame lengths are derived from frame headers.
    pub fn with_frame_sizing(mut self, frame_sizing: FrameSizing) -> Self {
        self.settings.frame_sizing = frame_sizing;
        self
    }

    /// Replaces the built-in frame decoder.
    pub fn with_frame_decoder<D>(mut self, decoder: D) -> Self
    where
        D: FrameDecoder + Send + 'static,
    {
        self.decoder = Some(Box::new(decoder));
        self
    }

    /// Creates the stream and decodes its first frame.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidSettings`] without a data source, with a zero chunk
    ///   size, or with a PCM buffer smaller than one sample.
    /// - [`Error::NoFrameDecoder`] when no decoder was supplied and the
    ///   `symphonia-mp3` feature is disabled.
    /// - [`Error::StreamInvalid`] when no audio frame can be decoded.
    pub fn build(self) -> Result<Mp3Stream<R>> {
        let data = self
            .data
            .ok_or(Error::InvalidSettings("no data source supplied"))?;
        if self.settings.chunk_size == 0 {
            return Err(Error::InvalidSettings("chunk size must be non-zero"));
        }
        if self.settings.pcm_buffer_size < 2 {
            return Err(Error::InvalidSettings(
                "pcm buffer must hold at least one sample",
            ));
        }
        let decoder = self
            .decoder
            .or_else(default_frame_decoder)
            .ok_or(Error::NoFrameDecoder)?;

        Mp3Stream::open(data, self.settings, decoder)
    }
}
