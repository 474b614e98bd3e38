#![allow(dead_code)]
/// in separate folder so its not ran as integration test
use std::io::{self, Cursor, Read};

use streamp3::{FrameDecodeError, FrameDecoder, FrameHeader, FrameSizing};

/// MPEG-1 Layer III, 128 kbps, 44.1 kHz, stereo: 417 byte frames.
pub const STEREO_128K: [u8; 4] = [0xFF, 0xFB, 0x90, 0x00];
/// MPEG-1 Layer III, 32 kbps, 44.1 kHz, stereo: 104 byte frames.
pub const STEREO_32K: [u8; 4] = [0xFF, 0xFB, 0x10, 0x00];
/// MPEG-1 Layer III, 128 kbps, 44.1 kHz, mono: 208 byte frames.
pub const MONO_128K: [u8; 4] = [0xFF, 0xFB, 0x90, 0xC0];
/// MPEG-2 Layer III, 32 kbps, 16 kHz, mono: 144 byte frames.
pub const MONO_MPEG2_32K: [u8; 4] = [0xFF, 0xF3, 0x48, 0xC4];
/// MPEG-1 Layer II, 128 kbps, 44.1 kHz, stereo.
pub const LAYER2: [u8; 4] = [0xFF, 0xFD, 0x90, 0x00];

/// Samples per channel the mock decoder produces for an MPEG-1 frame.
pub const SAMPLES_PER_FRAME: usize = 1152;

/// A frame with the given header and a zero body, sized like the stream
/// sizes it.
pub fn frame(header: [u8; 4]) -> Vec<u8> {
    let size = FrameHeader::parse(&header)
        .unwrap()
        .frame_size(FrameSizing::ChannelScaled);
    let mut frame = vec![0u8; size];
    frame[..4].copy_from_slice(&header);
    frame
}

/// `count` consecutive frames with the same header.
pub fn frames(header: [u8; 4], count: usize) -> Vec<u8> {
    (0..count).flat_map(|_| frame(header)).collect()
}

/// An ID3v2.4 container with a zeroed body of `body_len` bytes.
pub fn id3_container(body_len: usize) -> Vec<u8> {
    let size = [
        (body_len >> 21) as u8 & 0x7F,
        (body_len >> 14) as u8 & 0x7F,
        (body_len >> 7) as u8 & 0x7F,
        body_len as u8 & 0x7F,
    ];
    let mut tag = b"ID3\x04\x00\x00".to_vec();
    tag.extend_from_slice(&size);
    tag.resize(10 + body_len, 0);
    tag
}

/// Deterministic stand-in for a real MPEG decoder.
///
/// The first `priming` frames decode to nothing. Every later frame decodes to
/// `samples` samples per channel: the left channel counts up from the number of
/// samples produced so far, the right channel holds the negated value. Mono
/// frames only write the left channel.
#[derive(Debug, Clone)]
pub struct MockDecoder {
    pub priming: usize,
    pub samples: usize,
    /// Zero-based indices of frames reported as corrupt.
    pub corrupt: Vec<usize>,
    frames_seen: usize,
    produced: usize,
}

impl MockDecoder {
    pub fn new() -> Self {
        Self {
            priming: 0,
            samples: SAMPLES_PER_FRAME,
            corrupt: Vec::new(),
            frames_seen: 0,
            produced: 0,
        }
    }

    pub fn with_priming(mut self, priming: usize) -> Self {
        self.priming = priming;
        self
    }

    pub fn with_samples(mut self, samples: usize) -> Self {
        self.samples = samples;
        self
    }

    pub fn with_corrupt_frames(mut self, corrupt: &[usize]) -> Self {
        self.corrupt = corrupt.to_vec();
        self
    }
}

impl FrameDecoder for MockDecoder {
    fn decode(
        &mut self,
        data: &[u8],
        frame_size: usize,
        left: &mut [i16],
        right: &mut [i16],
    ) -> Result<usize, FrameDecodeError> {
        assert!(data.len() >= frame_size, "frame handed over incomplete");
        let header = FrameHeader::parse(data).expect("frame starts at a header");

        let index = self.frames_seen;
        self.frames_seen += 1;
        if self.corrupt.contains(&index) {
            return Err(FrameDecodeError::Corrupt(format!("frame {index}")));
        }
        if index < self.priming {
            return Ok(0);
        }

        let capacity = left.len().min(right.len());
        if self.samples > capacity {
            return Err(FrameDecodeError::BufferTooSmall {
                needed: self.samples,
                capacity,
            });
        }
        for i in 0..self.samples {
            let value = (self.produced + i) as i16;
            left[i] = value;
            if header.num_channels() == 2 {
                right[i] = value.wrapping_neg();
            }
        }
        self.produced += self.samples;
        Ok(self.samples)
    }
}

/// The PCM bytes the mock decoder produces for `samples` sample frames.
pub fn expected_pcm(samples: usize, channels: u16) -> Vec<u8> {
    let mut pcm = Vec::new();
    for i in 0..samples {
        let value = i as i16;
        pcm.extend_from_slice(&value.to_le_bytes());
        if channels == 2 {
            pcm.extend_from_slice(&value.wrapping_neg().to_le_bytes());
        }
    }
    pcm
}

/// Hands out at most `step` bytes per read and interrupts every other call.
pub struct Trickle {
    inner: Cursor<Vec<u8>>,
    step: usize,
    interrupt: bool,
}

impl Trickle {
    pub fn new(data: Vec<u8>, step: usize) -> Self {
        Self {
            inner: Cursor::new(data),
            step,
            interrupt: false,
        }
    }
}

impl Read for Trickle {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.interrupt = !self.interrupt;
        if self.interrupt {
            return Err(io::ErrorKind::Interrupted.into());
        }
        let len = buf.len().min(self.step);
        self.inner.read(&mut buf[..len])
    }
}

/// Serves `data`, then fails every read with `kind` instead of reporting the
/// end of the stream.
pub struct FailingReader {
    inner: Cursor<Vec<u8>>,
    kind: io::ErrorKind,
}

impl FailingReader {
    pub fn new(data: Vec<u8>, kind: io::ErrorKind) -> Self {
        Self {
            inner: Cursor::new(data),
            kind,
        }
    }
}

impl Read for FailingReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self.inner.read(buf)? {
            0 => Err(io::Error::new(self.kind, "source failed")),
            n => Ok(n),
        }
    }
}
