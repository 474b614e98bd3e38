//! Streaming MP3 decoding to 16-bit PCM.
//!
//! An [`Mp3Stream`] wraps any [`std::io::Read`] source, such as a file, a
//! socket or an in-memory buffer, and turns the MPEG audio frames it carries
//! into raw PCM bytes on demand. Bytes are pulled from the source in chunks only
//! when the decoder needs them, so the stream works with live sources whose
//! total length is unknown.
//!
//! Along the way the stream:
//!
//! - skips a leading ID3v2 tag container,
//! - resynchronizes byte by byte over garbage between frames,
//! - reports the bit rate, sample rate and channel count of the latest frame,
//! - and ends cleanly on a truncated final frame.
//!
//! Decoding of frame bodies happens behind the [`FrameDecoder`] trait. With the
//! default `symphonia-mp3` feature, [`SymphoniaFrameDecoder`] is used unless
//! another decoder is given to [`Mp3StreamBuilder::with_frame_decoder`].
//!
//! # Usage
//!
//! ```no_run
//! use std::fs::File;
//! use streamp3::Mp3Stream;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut stream = Mp3Stream::new(File::open("music.mp3")?)?;
//!     println!(
//!         "{} kbps, {} Hz, {} channel(s)",
//!         stream.bit_rate() / 1000,
//!         stream.sample_rate(),
//!         stream.num_channels(),
//!     );
//!
//!     // At most 4096 bytes of interleaved little-endian PCM per read.
//!     while let Some(pcm) = stream.read(Some(4096))? {
//!         // hand the bytes to an audio sink...
//!         # let _ = pcm;
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Raw copy
//!
//! A stream built with [`Mp3StreamBuilder::with_raw_copy`] also returns the
//! compressed bytes it consumed for each chunk of PCM, which is useful to relay
//! the compressed stream while listening to it:
//!
//! ```no_run
//! use std::fs::File;
//! use streamp3::Mp3Stream;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut stream = Mp3Stream::builder()
//!         .with_data(File::open("music.mp3")?)
//!         .with_raw_copy(true)
//!         .build()?;
//!
//!     for chunk in stream.chunks() {
//!         let chunk = chunk?;
//!         println!("{} pcm bytes from {} mp3 bytes", chunk.pcm.len(), chunk.raw.len());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Features
//!
//! - `symphonia-mp3` (default): the built-in frame decoder.
//! - `symphonia-simd`: SIMD optimizations inside Symphonia.
//! - `tracing`: debug and trace events for resynchronization, skipped
//!   containers and decoded frames.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]

mod backlog;
mod builder;
mod common;
mod error;
mod id3;
mod pcm;
mod stream;
mod sync;

pub mod decoder;
pub mod header;

pub use crate::builder::{Mp3StreamBuilder, CHUNK_SIZE, PCM_BUFFER_SIZE};
pub use crate::common::{BitRate, ChannelCount, SampleRate};
#[cfg(feature = "symphonia-mp3")]
pub use crate::decoder::SymphoniaFrameDecoder;
pub use crate::decoder::{FrameDecodeError, FrameDecoder};
pub use crate::error::{Error, Result};
pub use crate::header::{ChannelMode, FrameHeader, FrameSizing, Layer, MpegVersion};
pub use crate::stream::{Chunks, DecodedChunk, Mp3Stream};
