//! Locating frames in the backlog.
//!
//! The scanner looks for the first window that decodes as a Layer III header.
//! On a mismatch it drops exactly one byte and tries again, so a valid header
//! starting inside a run of junk is never skipped over.

use std::io::Read;

use crate::backlog::{ByteBacklog, ChunkReader};
use crate::error::{Error, Result};
use crate::header::{FrameHeader, FrameSizing, HeaderReject, HEADER_LEN};

/// A frame whose header is at the front of the backlog and whose bytes are
/// fully buffered.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct LocatedFrame {
    pub(crate) header: FrameHeader,
    /// Byte length of the frame, header included.
    pub(crate) size: usize,
}

/// Outcome of a search for the next frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum FrameScan {
    /// A whole frame is buffered.
    Complete(LocatedFrame),
    /// A header was found but the source ended inside its frame.
    Truncated(FrameHeader),
    /// The source ended without another header.
    End,
}

impl FrameScan {
    /// The header found by the scan, complete or not.
    pub(crate) fn header(&self) -> Option<&FrameHeader> {
        match self {
            FrameScan::Complete(frame) => Some(&frame.header),
            FrameScan::Truncated(header) => Some(header),
            FrameScan::End => None,
        }
    }
}

/// Advances the backlog to the next valid frame header.
///
/// The header itself is left in the backlog. Returns `Ok(None)` when the
/// source is exhausted before a header is found. Every byte dropped while
/// resynchronizing is added to `skipped`.
///
/// # Errors
///
/// [`Error::UnsupportedLayer`] when the next header is Layer I or II. Source
/// errors are propagated.
pub(crate) fn next_header<R: Read>(
    reader: &mut ChunkReader<R>,
    backlog: &mut ByteBacklog,
    skipped: &mut u64,
) -> Result<Option<FrameHeader>> {
    #[cfg(feature = "tracing")]
    let start = *skipped;
    loop {
        if !reader.fill_to(backlog, HEADER_LEN)? {
            #[cfg(feature = "tracing")]
            {
                if *skipped > start {
                    let run = *skipped - start;
                    tracing::trace!(skipped = run, "no frame header before end of stream");
                }
            }
            return Ok(None);
        }

        match FrameHeader::decode(backlog.as_slice()) {
            Ok(header) => {
                #[cfg(feature = "tracing")]
                {
                    if *skipped > start {
                        let run = *skipped - start;
                        tracing::trace!(skipped = run, "resynchronized on frame header");
                    }
                }
                return Ok(Some(header));
            }
            Err(HeaderReject::Unsupported(layer)) => {
                return Err(Error::UnsupportedLayer { layer });
            }
            Err(HeaderReject::Corrupt) => {
                backlog.consume(1);
                *skipped += 1;
            }
        }
    }
}

/// Finds the next frame and buffers all of its bytes.
///
/// A frame cut short by the end of the source is reported as
/// [`FrameScan::Truncated`]; its bytes stay in the backlog.
pub(crate) fn next_frame<R: Read>(
    reader: &mut ChunkReader<R>,
    backlog: &mut ByteBacklog,
    sizing: FrameSizing,
    skipped: &mut u64,
) -> Result<FrameScan> {
    let Some(header) = next_header(reader, backlog, skipped)? else {
        return Ok(FrameScan::End);
    };
    let size = header.frame_size(sizing);
    if !reader.fill_to(backlog, size)? {
        #[cfg(feature = "tracing")]
        tracing::debug!(
            frame_size = size,
            buffered = backlog.len(),
            "final frame is truncated"
        );
        return Ok(FrameScan::Truncated(header));
    }
    Ok(FrameScan::Complete(LocatedFrame { header, size }))
}
