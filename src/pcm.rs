//! Repackaging of decoded samples into caller-sized PCM byte chunks.
//!
//! Decoded frames land in two per-channel sample buffers. [`PcmAssembler`]
//! tracks how much of the current frame has been handed out and slices it into
//! chunks of whole sample frames: 2 bytes per sample frame for mono, 4 bytes
//! (one left and one right sample) for stereo, interleaved left first.
//! Samples are serialized as little-endian 16-bit integers.

use crate::common::{ChannelCount, BYTES_PER_SAMPLE};

pub(crate) struct PcmAssembler {
    left: Vec<i16>,
    right: Vec<i16>,
    /// Next sample to hand out.
    offset: usize,
    /// Samples per channel decoded into the buffers.
    length: usize,
}

impl PcmAssembler {
    /// Allocates two buffers of `capacity` samples each.
    pub(crate) fn new(capacity: usize) -> Self {
        PcmAssembler {
            left: vec![0; capacity],
            right: vec![0; capacity],
            offset: 0,
            length: 0,
        }
    }

    /// Samples per channel each buffer can hold.
    #[inline]
    pub(crate) fn capacity(&self) -> usize {
        self.left.len()
    }

    /// Samples per channel decoded but not handed out yet.
    #[inline]
    pub(crate) fn available(&self) -> usize {
        self.length - self.offset
    }

    #[inline]
    pub(crate) fn is_drained(&self) -> bool {
        self.available() == 0
    }

    /// Both buffers, for a decoder to write a new frame into.
    ///
    /// Callers must follow up with [`PcmAssembler::reset`].
    pub(crate) fn buffers_mut(&mut self) -> (&mut [i16], &mut [i16]) {
        (&mut self.left, &mut self.right)
    }

    /// Points the cursor at the start of a freshly decoded frame.
    ///
    /// # Panics
    ///
    /// Panics if `length` exceeds the buffer capacity.
    pub(crate) fn reset(&mut self, length: usize) {
        assert!(length <= self.capacity(), "decoded past the end of the pcm buffer");
        self.offset = 0;
        self.length = length;
    }

    /// Hands out the next chunk of PCM bytes.
    ///
    /// With `max_bytes` of `None` everything available is returned. Otherwise
    /// the chunk holds as many whole sample frames as fit in `max_bytes`, which
    /// may be none at all when `max_bytes` is smaller than one sample frame.
    pub(crate) fn assemble(&mut self, max_bytes: Option<usize>, channels: ChannelCount) -> Vec<u8> {
        let frame_bytes = BYTES_PER_SAMPLE * channels as usize;
        let samples = match max_bytes {
            Some(max_bytes) => self.available().min(max_bytes / frame_bytes),
            None => self.available(),
        };

        let span = self.offset..self.offset + samples;
        let mut data = Vec::with_capacity(samples * frame_bytes);
        if channels == 1 {
            // Mono frames are decoded into the left buffer only.
            for sample in &self.left[span] {
                data.extend_from_slice(&sample.to_le_bytes());
            }
        } else {
            for (l, r) in self.left[span.clone()].iter().zip(&self.right[span]) {
                data.extend_from_slice(&l.to_le_bytes());
                data.extend_from_slice(&r.to_le_bytes());
            }
        }

        self.offset += samples;
        data
    }
}
