use symphonia::core::{
    audio::{Channels, SampleBuffer},
    codecs::{CodecParameters, Decoder, DecoderOptions, CODEC_TYPE_MP3},
    errors::Error,
    formats::Packet,
};
use symphonia::default::get_codecs;

use super::{FrameDecodeError, FrameDecoder};
use crate::header::FrameHeader;

/// [`FrameDecoder`] backed by Symphonia's MPEG audio decoder.
///
/// Every frame is fed to Symphonia as one packet. The codec is created when the
/// first frame arrives, using that frame's sample rate and channel layout.
#[derive(Default)]
pub struct SymphoniaFrameDecoder {
    decoder: Option<Box<dyn Decoder>>,
    reset_pending: bool,
    ts: u64,
}

impl SymphoniaFrameDecoder {
    /// Creates a decoder. Nothing is allocated until the first frame.
    pub fn new() -> Self {
        Self::default()
    }
}

fn make_decoder(header: &FrameHeader) -> Result<Box<dyn Decoder>, FrameDecodeError> {
    let channels = if header.num_channels() == 1 {
        Channels::FRONT_LEFT
    } else {
        Channels::FRONT_LEFT | Channels::FRONT_RIGHT
    };
    let mut params = CodecParameters::new();
    params
        .for_codec(CODEC_TYPE_MP3)
        .with_sample_rate(header.sample_rate)
        .with_channels(channels);

    get_codecs()
        .make(&params, &DecoderOptions::default())
        .map_err(|e| FrameDecodeError::Backend(Box::new(e)))
}

impl FrameDecoder for SymphoniaFrameDecoder {
    fn decode(
        &mut self,
        data: &[u8],
        frame_size: usize,
        left: &mut [i16],
        right: &mut [i16],
    ) -> Result<usize, FrameDecodeError> {
        let frame = data.get(..frame_size).ok_or_else(|| {
            FrameDecodeError::Corrupt(format!(
                "frame needs {frame_size} bytes, {} available",
                data.len()
            ))
        })?;
        let header = FrameHeader::decode(frame)
            .map_err(|_| FrameDecodeError::Corrupt("invalid frame header".to_owned()))?;

        let decoder = match self.decoder.take() {
            Some(decoder) => decoder,
            None => make_decoder(&header)?,
        };
        let decoder = self.decoder.insert(decoder);
        if self.reset_pending {
            decoder.reset();
            self.reset_pending = false;
        }

        let packet = Packet::new_from_slice(0, self.ts, 0, frame);
        let decoded = match decoder.decode(&packet) {
            Ok(decoded) => decoded,
            // Decode errors are not fatal: the bit reservoir may reference data
            // from before the start of the stream, or the frame is damaged.
            Err(Error::DecodeError(e)) => return Err(FrameDecodeError::Corrupt(e.to_owned())),
            Err(Error::IoError(e)) => return Err(FrameDecodeError::Corrupt(e.to_string())),
            Err(Error::ResetRequired) => {
                self.reset_pending = true;
                return Ok(0);
            }
            Err(e) => return Err(FrameDecodeError::Backend(Box::new(e))),
        };

        let frames = decoded.frames();
        if frames == 0 {
            return Ok(0);
        }
        let capacity = left.len().min(right.len());
        if frames > capacity {
            return Err(FrameDecodeError::BufferTooSmall {
                needed: frames,
                capacity,
            });
        }

        let spec = *decoded.spec();
        let mut buffer = SampleBuffer::<i16>::new(decoded.capacity() as u64, spec);
        buffer.copy_planar_ref(decoded);

        // Planar layout: all left samples, then all right samples.
        let samples = buffer.samples();
        left[..frames].copy_from_slice(&samples[..frames]);
        if spec.channels.count() > 1 {
            right[..frames].copy_from_slice(&samples[frames..2 * frames]);
        }

        self.ts += frames as u64;
        Ok(frames)
    }
}
