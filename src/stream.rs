//! The streaming decoder.
//!
//! [`Mp3Stream`] owns the whole pipeline: it pulls chunks from the source into
//! the backlog, skips a leading ID3 container once, locates and sizes frames,
//! feeds them to the frame decoder and slices the decoded samples into PCM
//! chunks of whatever size the caller asks for.
//!
//! The stream is pull based and single threaded. Every method that advances it
//! takes `&mut self`, and the only place it may block is the source's `read`.

use std::fs::File;
use std::io::{Cursor, Read};
use std::iter::FusedIterator;

use crate::backlog::{ByteBacklog, ChunkReader};
use crate::builder::{Mp3StreamBuilder, Settings};
use crate::common::{BitRate, ChannelCount, SampleRate};
use crate::decoder::{FrameDecodeError, FrameDecoder};
use crate::error::{Error, Result};
use crate::header::FrameSizing;
use crate::id3;
use crate::pcm::PcmAssembler;
use crate::sync::{self, FrameScan};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum StreamState {
    Ready,
    Exhausted,
}

/// One step of a stream read with [`Mp3Stream::read_chunk`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DecodedChunk {
    /// 16-bit little-endian PCM, interleaved when stereo.
    pub pcm: Vec<u8>,
    /// Source bytes consumed since the previous chunk. Empty unless raw copy
    /// was enabled on the builder.
    pub raw: Vec<u8>,
}

/// Streaming MP3 decoder producing 16-bit PCM.
///
/// Built from any [`Read`]er, either directly with [`Mp3Stream::new`] or
/// through [`Mp3Stream::builder`]. Construction fails unless at least one
/// audio frame can be decoded.
///
/// # Example
///
/// ```no_run
/// use std::fs::File;
/// use streamp3::Mp3Stream;
///
/// fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let stream = Mp3Stream::new(File::open("music.mp3")?)?;
///     println!("{} Hz, {} channel(s)", stream.sample_rate(), stream.num_channels());
///
///     for chunk in stream {
///         let _pcm = chunk?;
///         // hand the pcm bytes to an audio sink...
///     }
///     Ok(())
/// }
/// ```
pub struct Mp3Stream<R> {
    reader: ChunkReader<R>,
    backlog: ByteBacklog,
    decoder: Box<dyn FrameDecoder + Send>,
    pcm: PcmAssembler,
    sizing: FrameSizing,
    state: StreamState,

    bit_rate: BitRate,
    sample_rate: SampleRate,
    num_channels: ChannelCount,

    frames_decoded: u64,
    skipped_bytes: u64,
    container_len: usize,

    /// Set once the `Iterator` impl has yielded `None` or an error.
    iter_done: bool,
}

impl<R: Read> Mp3Stream<R> {
    /// Attaches a decoder to `data` with default settings.
    ///
    /// # Errors
    ///
    /// [`Error::StreamInvalid`] if no audio frame can be decoded, and any
    /// error the source or the frame decoder raises on the way.
    pub fn new(data: R) -> Result<Self> {
        Mp3StreamBuilder::new().with_data(data).build()
    }

    /// Returns a builder to configure buffer sizes, raw copy and the frame
    /// decoder.
    pub fn builder() -> Mp3StreamBuilder<R> {
        Mp3StreamBuilder::new()
    }

    pub(crate) fn open(
        data: R,
        settings: Settings,
        decoder: Box<dyn FrameDecoder + Send>,
    ) -> Result<Self> {
        let mut stream = Mp3Stream {
            reader: ChunkReader::new(data, settings.chunk_size),
            backlog: ByteBacklog::new(settings.raw_copy),
            decoder,
            pcm: PcmAssembler::new(settings.pcm_buffer_size / 2),
            sizing: settings.frame_sizing,
            state: StreamState::Ready,
            bit_rate: 0,
            sample_rate: 0,
            num_channels: 0,
            frames_decoded: 0,
            skipped_bytes: 0,
            container_len: 0,
            iter_done: false,
        };

        stream.container_len = id3::skip_container(&mut stream.reader, &mut stream.backlog)?
            .map_or(0, |container| container.size);

        if !stream.decode_frame()? {
            return Err(Error::StreamInvalid("no audio frame found"));
        }
        Ok(stream)
    }

    /// Reads the next block of decoded PCM.
    ///
    /// Returns at most `max_bytes` bytes, or the rest of the current frame when
    /// `max_bytes` is `None` or `Some(0)`. The block always holds whole
    /// samples, and for stereo streams an equal number of left and right
    /// samples. When fewer bytes than one sample frame are requested (1 byte
    /// for mono, 1 to 3 bytes for stereo) the block is empty and the stream
    /// does not advance, so such a request repeated in a loop never ends.
    ///
    /// Returns `Ok(None)` once the source is exhausted and every decoded sample
    /// has been handed out; every later call returns `Ok(None)` again.
    ///
    /// With raw copy enabled, the source bytes consumed for this block are
    /// discarded; use [`Mp3Stream::read_chunk`] to receive them.
    ///
    /// # Errors
    ///
    /// Source errors, [`Error::UnsupportedLayer`], and fatal frame decoder
    /// errors. The stream is left where it failed, so a read may be retried
    /// after a transient source error.
    pub fn read(&mut self, max_bytes: Option<usize>) -> Result<Option<Vec<u8>>> {
        let filled = self.fill_pcm()?;
        self.backlog.discard_consumed();
        if !filled {
            return Ok(None);
        }
        Ok(Some(self.pcm.assemble(unbounded_if_zero(max_bytes), self.num_channels)))
    }

    /// Like [`Mp3Stream::read`], but also returns the source bytes consumed to
    /// produce the block when raw copy is enabled.
    ///
    /// At the end of the stream, unparsed trailing bytes are returned in one
    /// last chunk with empty `pcm`. When the stream is read only through this
    /// method, the concatenated `raw` fields of all chunks reproduce the source
    /// exactly.
    pub fn read_chunk(&mut self, max_bytes: Option<usize>) -> Result<Option<DecodedChunk>> {
        let filled = self.fill_pcm()?;
        if !filled && !self.backlog.has_consumed() {
            return Ok(None);
        }
        let pcm = if filled {
            self.pcm.assemble(unbounded_if_zero(max_bytes), self.num_channels)
        } else {
            Vec::new()
        };
        let raw = self.backlog.take_consumed();
        Ok(Some(DecodedChunk { pcm, raw }))
    }

    /// Iterates over whole-frame [`DecodedChunk`]s until the end of the stream.
    pub fn chunks(&mut self) -> Chunks<'_, R> {
        Chunks {
            stream: self,
            done: false,
        }
    }

    /// Decodes frames until samples are available. Returns `false` at the end
    /// of the stream.
    fn fill_pcm(&mut self) -> Result<bool> {
        while self.pcm.is_drained() {
            if self.state == StreamState::Exhausted || !self.decode_frame()? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Locates and decodes the next frame into the PCM buffers.
    ///
    /// Returns `false` at the end of the stream. A frame the decoder reports as
    /// corrupt still counts as decoded, with zero samples.
    fn decode_frame(&mut self) -> Result<bool> {
        let scan = sync::next_frame(
            &mut self.reader,
            &mut self.backlog,
            self.sizing,
            &mut self.skipped_bytes,
        )?;
        if let Some(header) = scan.header() {
            self.bit_rate = header.bit_rate;
            self.sample_rate = header.sample_rate;
            self.num_channels = header.num_channels();
        }
        let FrameScan::Complete(frame) = scan else {
            self.finish();
            return Ok(false);
        };

        let (left, right) = self.pcm.buffers_mut();
        let samples = match self
            .decoder
            .decode(self.backlog.as_slice(), frame.size, left, right)
        {
            Ok(samples) => samples,
            Err(FrameDecodeError::Corrupt(_reason)) => {
                #[cfg(feature = "tracing")]
                tracing::debug!(reason = %_reason, "skipping undecodable frame");
                0
            }
            Err(e) => return Err(e.into()),
        };
        if samples > self.pcm.capacity() {
            return Err(Error::PcmBufferTooSmall {
                needed: samples,
                capacity: self.pcm.capacity(),
            });
        }
        self.pcm.reset(samples);
        self.backlog.consume(frame.size);
        self.frames_decoded += 1;

        #[cfg(feature = "tracing")]
        tracing::trace!(
            bit_rate = self.bit_rate,
            sample_rate = self.sample_rate,
            channels = self.num_channels,
            frame_size = frame.size,
            samples,
            "decoded frame"
        );

        Ok(true)
    }

    fn finish(&mut self) {
        self.state = StreamState::Exhausted;
        let _tail = self.backlog.consume_all();

        #[cfg(feature = "tracing")]
        tracing::debug!(
            frames = self.frames_decoded,
            skipped = self.skipped_bytes,
            tail = _tail,
            "end of stream"
        );
    }
}

impl<R> Mp3Stream<R> {
    /// Compressed bit rate of the most recent frame, in bits per second.
    ///
    /// May change from frame to frame in variable bit rate streams.
    #[inline]
    pub fn bit_rate(&self) -> BitRate {
        self.bit_rate
    }

    /// Sample rate of the decoded audio, in Hz.
    #[inline]
    pub fn sample_rate(&self) -> SampleRate {
        self.sample_rate
    }

    /// Number of channels in the decoded audio: 1 for mono, 2 for stereo.
    #[inline]
    pub fn num_channels(&self) -> ChannelCount {
        self.num_channels
    }

    /// Number of frames handed to the frame decoder so far.
    #[inline]
    pub fn frames_decoded(&self) -> u64 {
        self.frames_decoded
    }

    /// Number of bytes dropped while searching for frame headers.
    #[inline]
    pub fn skipped_bytes(&self) -> u64 {
        self.skipped_bytes
    }

    /// Size of the ID3 container skipped at the start, 0 if there was none.
    #[inline]
    pub fn container_len(&self) -> usize {
        self.container_len
    }

    /// Whether the end of the stream has been reached. Samples decoded before
    /// that point are still returned by [`Mp3Stream::read`].
    #[inline]
    pub fn is_exhausted(&self) -> bool {
        self.state == StreamState::Exhausted
    }

    /// Gets a reference to the underlying source.
    pub fn get_ref(&self) -> &R {
        self.reader.get_ref()
    }

    /// Unwraps the underlying source. Buffered bytes are lost.
    pub fn into_inner(self) -> R {
        self.reader.into_inner()
    }
}

/// `Some(0)` asks for no particular size, like `None`.
fn unbounded_if_zero(max_bytes: Option<usize>) -> Option<usize> {
    max_bytes.filter(|&n| n != 0)
}

impl Mp3Stream<Cursor<Vec<u8>>> {
    /// Attaches a decoder to an in-memory MP3 blob.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Result<Self> {
        Self::new(Cursor::new(bytes.into()))
    }
}

impl TryFrom<File> for Mp3Stream<File> {
    type Error = Error;

    fn try_from(file: File) -> Result<Self> {
        Self::new(file)
    }
}

// Yields whole-frame PCM chunks. Iteration stops at the end of the stream and
// after the first error.
impl<R: Read> Iterator for Mp3Stream<R> {
    type Item = Result<Vec<u8>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.iter_done {
            return None;
        }
        match self.read(None) {
            Ok(Some(pcm)) => Some(Ok(pcm)),
            Ok(None) => {
                self.iter_done = true;
                None
            }
            Err(e) => {
                self.iter_done = true;
                Some(Err(e))
            }
        }
    }
}

impl<R: Read> FusedIterator for Mp3Stream<R> {}

/// Iterator over [`DecodedChunk`]s, returned by [`Mp3Stream::chunks`].
pub struct Chunks<'a, R> {
    stream: &'a mut Mp3Stream<R>,
    done: bool,
}

impl<R: Read> Iterator for Chunks<'_, R> {
    type Item = Result<DecodedChunk>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.stream.read_chunk(None) {
            Ok(Some(chunk)) => Some(Ok(chunk)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

impl<R: Read> FusedIterator for Chunks<'_, R> {}
