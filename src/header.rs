//! MPEG audio frame header decoding.
//!
//! A frame header is 4 bytes:
//!
//! ```text
//! byte 0  1111 1111   sync
//! byte 1  111v vllp   sync, version (vv), layer (ll), protection (p)
//! byte 2  bbbb ssp_   bit rate index, sample rate index, padding
//! byte 3  cc__ ____   channel mode (11 = mono)
//! ```
//!
//! Bit rates and sample rates are resolved through the fixed Layer III tables
//! of ISO/IEC 11172-3 and 13818-3.

use std::fmt;

use crate::common::{BitRate, ChannelCount, SampleRate};
use crate::error::{Error, Result};

/// Length of a frame header in bytes.
pub const HEADER_LEN: usize = 4;

/// Layer III bit rates in kbps, indexed by the 4-bit bit rate index.
/// Index 0 is free format and index 15 is forbidden.
const MPEG1_BIT_RATES: [u32; 16] = [
    0, 32, 40, 48, 56, 64, 80, 96, 112, 128, 160, 192, 224, 256, 320, 0,
];
const MPEG2_BIT_RATES: [u32; 16] = [
    0, 8, 16, 24, 32, 40, 48, 56, 64, 80, 96, 112, 128, 144, 160, 0,
];

const MPEG1_SAMPLE_RATES: [u32; 3] = [44100, 48000, 32000];
const MPEG2_SAMPLE_RATES: [u32; 3] = [22050, 24000, 16000];
const MPEG2_5_SAMPLE_RATES: [u32; 3] = [11025, 12000, 8000];

/// MPEG audio version.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MpegVersion {
    /// MPEG-1 (ISO/IEC 11172-3).
    Mpeg1,
    /// MPEG-2 low sampling frequency extension (ISO/IEC 13818-3).
    Mpeg2,
    /// Unofficial MPEG-2.5 extension for very low sample rates.
    Mpeg2_5,
}

impl MpegVersion {
    /// Maps the 2-bit version code. Code `01` is reserved.
    pub fn from_code(code: u8) -> Option<Self> {
        match code & 0b11 {
            0b00 => Some(MpegVersion::Mpeg2_5),
            0b10 => Some(MpegVersion::Mpeg2),
            0b11 => Some(MpegVersion::Mpeg1),
            _ => None,
        }
    }

    /// Bit rate in bits per second for a Layer III bit rate index.
    ///
    /// Returns `None` for the free-format and forbidden indices.
    pub fn bit_rate(self, index: u8) -> Option<BitRate> {
        let table = match self {
            MpegVersion::Mpeg1 => &MPEG1_BIT_RATES,
            MpegVersion::Mpeg2 | MpegVersion::Mpeg2_5 => &MPEG2_BIT_RATES,
        };
        match table.get(index as usize).copied() {
            Some(0) | None => None,
            Some(kbps) => Some(kbps * 1000),
        }
    }

    /// Sample rate in Hz for a sample rate index. Index 3 is reserved.
    pub fn sample_rate(self, index: u8) -> Option<SampleRate> {
        let table = match self {
            MpegVersion::Mpeg1 => &MPEG1_SAMPLE_RATES,
            MpegVersion::Mpeg2 => &MPEG2_SAMPLE_RATES,
            MpegVersion::Mpeg2_5 => &MPEG2_5_SAMPLE_RATES,
        };
        table.get(index as usize).copied()
    }
}

/// MPEG audio layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Layer {
    /// Layer I.
    Layer1,
    /// Layer II.
    Layer2,
    /// Layer III, the only layer this crate decodes.
    Layer3,
}

impl Layer {
    /// Maps the 2-bit layer code. Code `00` is reserved.
    pub fn from_code(code: u8) -> Option<Self> {
        match code & 0b11 {
            0b01 => Some(Layer::Layer3),
            0b10 => Some(Layer::Layer2),
            0b11 => Some(Layer::Layer1),
            _ => None,
        }
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Layer::Layer1 => f.write_str("Layer I"),
            Layer::Layer2 => f.write_str("Layer II"),
            Layer::Layer3 => f.write_str("Layer III"),
        }
    }
}

/// Channel mode of a frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ChannelMode {
    /// Two independent channels.
    Stereo,
    /// Mid/side or intensity coded stereo.
    JointStereo,
    /// Two unrelated mono channels.
    DualChannel,
    /// Single channel.
    Mono,
}

impl ChannelMode {
    fn from_code(code: u8) -> Self {
        match code & 0b11 {
            0b00 => ChannelMode::Stereo,
            0b01 => ChannelMode::JointStereo,
            0b10 => ChannelMode::DualChannel,
            _ => ChannelMode::Mono,
        }
    }

    /// Number of PCM channels the mode decodes to.
    #[inline]
    pub fn channels(self) -> ChannelCount {
        match self {
            ChannelMode::Mono => 1,
            _ => 2,
        }
    }
}

/// How the byte length of a frame is derived from its header.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FrameSizing {
    /// `144 * bit_rate / sample_rate / (3 - channels)`: 144 slots for stereo
    /// frames and 72 for mono frames.
    #[default]
    ChannelScaled,
    /// ISO slot count: 144 for MPEG-1 and 72 for MPEG-2/2.5, whatever the
    /// channel mode.
    Standard,
}

/// Why a 4-byte window is not a usable frame header.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum HeaderReject {
    /// No sync word, or a reserved/forbidden field value. Resync past it.
    Corrupt,
    /// A well-formed header of a layer this crate cannot decode.
    Unsupported(Layer),
}

/// Decoded view of a Layer III frame header.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameHeader {
    /// MPEG version of the frame.
    pub version: MpegVersion,
    /// Always [`Layer::Layer3`] for a decoded header.
    pub layer: Layer,
    /// Raw 4-bit bit rate index.
    pub bit_rate_index: u8,
    /// Raw 2-bit sample rate index.
    pub sample_rate_index: u8,
    /// Whether the frame carries one extra slot.
    pub padding: bool,
    /// Channel mode of the frame.
    pub channel_mode: ChannelMode,
    /// Resolved bit rate in bits per second.
    pub bit_rate: BitRate,
    /// Resolved sample rate in Hz.
    pub sample_rate: SampleRate,
}

/// Whether `bytes` starts with the 11-bit frame sync word.
#[inline]
pub fn is_sync(bytes: &[u8]) -> bool {
    matches!(bytes, [0xFF, b1, ..] if b1 >> 5 == 0b111)
}

impl FrameHeader {
    /// Decodes the first four bytes of `bytes` as a Layer III frame header.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedLayer`] for a Layer I or Layer II header
    /// and [`Error::StreamInvalid`] for any window that is not a valid header.
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        Self::decode(bytes).map_err(|reject| match reject {
            HeaderReject::Unsupported(layer) => Error::UnsupportedLayer { layer },
            HeaderReject::Corrupt => Error::StreamInvalid("not a frame header"),
        })
    }

    pub(crate) fn decode(bytes: &[u8]) -> std::result::Result<Self, HeaderReject> {
        let [b0, b1, b2, b3] = match bytes.get(..HEADER_LEN) {
            Some(&[b0, b1, b2, b3]) => [b0, b1, b2, b3],
            _ => return Err(HeaderReject::Corrupt),
        };
        if !is_sync(&[b0, b1]) {
            return Err(HeaderReject::Corrupt);
        }

        let version_code = (b1 & 0b0001_1000) >> 3;
        let layer_code = (b1 & 0b0000_0110) >> 1;
        let bit_rate_index = (b2 & 0b1111_0000) >> 4;
        let sample_rate_index = (b2 & 0b0000_1100) >> 2;
        let padding = (b2 & 0b0000_0010) != 0;
        let channel_code = (b3 & 0b1100_0000) >> 6;

        let layer = Layer::from_code(layer_code).ok_or(HeaderReject::Corrupt)?;
        let version = MpegVersion::from_code(version_code).ok_or(HeaderReject::Corrupt)?;
        // Free-format, forbidden and reserved values are invalid in every layer.
        if bit_rate_index == 0 || bit_rate_index == 0b1111 || sample_rate_index == 0b11 {
            return Err(HeaderReject::Corrupt);
        }
        if layer != Layer::Layer3 {
            return Err(HeaderReject::Unsupported(layer));
        }
        let bit_rate = version
            .bit_rate(bit_rate_index)
            .ok_or(HeaderReject::Corrupt)?;
        let sample_rate = version
            .sample_rate(sample_rate_index)
            .ok_or(HeaderReject::Corrupt)?;

        Ok(FrameHeader {
            version,
            layer,
            bit_rate_index,
            sample_rate_index,
            padding,
            channel_mode: ChannelMode::from_code(channel_code),
            bit_rate,
            sample_rate,
        })
    }

    /// Number of PCM channels: 1 for mono frames, 2 otherwise.
    #[inline]
    pub fn num_channels(&self) -> ChannelCount {
        self.channel_mode.channels()
    }

    /// Byte length of the whole frame, header included.
    pub fn frame_size(&self, sizing: FrameSizing) -> usize {
        let bit_rate = self.bit_rate as usize;
        let sample_rate = self.sample_rate as usize;
        let size = match sizing {
            FrameSizing::ChannelScaled => {
                144 * bit_rate / sample_rate / (3 - self.num_channels() as usize)
            }
            FrameSizing::Standard => match self.version {
                MpegVersion::Mpeg1 => 144 * bit_rate / sample_rate,
                MpegVersion::Mpeg2 | MpegVersion::Mpeg2_5 => 72 * bit_rate / sample_rate,
            },
        };
        size + usize::from(self.padding)
    }
}
