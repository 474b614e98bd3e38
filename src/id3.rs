//! Skipping of a leading ID3v2 container.
//!
//! Only the container's extent is decoded; tag frames are never parsed.

use std::io::Read;

use crate::backlog::{ByteBacklog, ChunkReader};
use crate::error::{Error, Result};

/// Length of the ID3v2 header and of the optional footer.
pub(crate) const ID3_HEADER_LEN: usize = 10;

const ID3_MARKER: &[u8; 3] = b"ID3";
const FOOTER_FLAG: u8 = 0x10;

/// Extent of an ID3v2 container at the start of a stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Id3Container {
    /// Total bytes taken by the container: header, body and footer.
    pub(crate) size: usize,
    pub(crate) has_footer: bool,
}

impl Id3Container {
    /// Parses a container header from the front of `bytes`.
    ///
    /// Returns `None` when `bytes` does not start with a complete header.
    pub(crate) fn parse(bytes: &[u8]) -> Option<Self> {
        let header = bytes.get(..ID3_HEADER_LEN)?;
        if &header[..3] != ID3_MARKER {
            return None;
        }
        let has_footer = header[5] & FOOTER_FLAG != 0;
        let body = synchsafe(&header[6..10]);

        let mut size = body + ID3_HEADER_LEN;
        if has_footer {
            size += ID3_HEADER_LEN;
        }
        Some(Id3Container { size, has_footer })
    }
}

/// Decodes a 4-byte synchsafe integer (7 significant bits per byte).
fn synchsafe(bytes: &[u8]) -> usize {
    bytes
        .iter()
        .fold(0, |acc, &b| (acc << 7) | (b & 0x7F) as usize)
}

/// Pulls the first chunk and drops a leading ID3v2 container, if any.
///
/// Returns the skipped container. A stream that starts with anything other
/// than a container header is left untouched.
///
/// # Errors
///
/// [`Error::StreamInvalid`] when the source ends before the declared container
/// does. Source errors are propagated.
pub(crate) fn skip_container<R: Read>(
    reader: &mut ChunkReader<R>,
    backlog: &mut ByteBacklog,
) -> Result<Option<Id3Container>> {
    if backlog.is_empty() && !reader.fill(backlog)? {
        return Ok(None);
    }
    // The first chunk may be shorter than a container header.
    reader.fill_to(backlog, ID3_HEADER_LEN)?;

    let Some(container) = backlog.peek(ID3_HEADER_LEN).and_then(Id3Container::parse) else {
        return Ok(None);
    };
    if !reader.fill_to(backlog, container.size)? {
        return Err(Error::StreamInvalid("id3 container is truncated"));
    }
    backlog.consume(container.size);

    #[cfg(feature = "tracing")]
    tracing::debug!(
        size = container.size,
        has_footer = container.has_footer,
        "skipped id3 container"
    );

    Ok(Some(container))
}
