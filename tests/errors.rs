use std::io::{self, Cursor};

use rstest::rstest;
use streamp3::{Error, Layer, Mp3Stream, Mp3StreamBuilder};

mod test_support;
use test_support::{frame, frames, FailingReader, MockDecoder, LAYER2, STEREO_128K};

/// A Layer II frame with a zero body, as long as a Layer III frame would be.
fn layer2_frame() -> Vec<u8> {
    let mut frame = frame(STEREO_128K);
    frame[..4].copy_from_slice(&LAYER2);
    frame
}

#[test]
fn source_errors_pass_through() {
    let source = FailingReader::new(frames(STEREO_128K, 2), io::ErrorKind::ConnectionReset);
    let mut stream = Mp3Stream::builder()
        .with_data(source)
        .with_frame_decoder(MockDecoder::new())
        .build()
        .unwrap();

    assert!(stream.read(None).unwrap().is_some());
    assert!(stream.read(None).unwrap().is_some());
    for _ in 0..2 {
        match stream.read(None) {
            Err(Error::Io(e)) => assert_eq!(e.kind(), io::ErrorKind::ConnectionReset),
            other => panic!("unexpected result: {other:?}"),
        }
    }
}

#[test]
fn iteration_stops_after_an_error() {
    let source = FailingReader::new(frames(STEREO_128K, 1), io::ErrorKind::BrokenPipe);
    let mut stream = Mp3Stream::builder()
        .with_data(source)
        .with_frame_decoder(MockDecoder::new())
        .build()
        .unwrap();

    let results: Vec<_> = stream.by_ref().collect();
    assert_eq!(results.len(), 2);
    assert!(results[0].is_ok());
    assert!(matches!(&results[1], Err(Error::Io(e)) if e.kind() == io::ErrorKind::BrokenPipe));
    assert!(stream.next().is_none());

    // Direct reads are still retried against the source.
    assert!(!stream.is_exhausted());
    assert!(matches!(stream.read(None), Err(Error::Io(_))));
}

#[test]
fn construction_reports_source_errors() {
    let source = FailingReader::new(Vec::new(), io::ErrorKind::TimedOut);
    let err = Mp3Stream::builder()
        .with_data(source)
        .with_frame_decoder(MockDecoder::new())
        .build()
        .err()
        .unwrap();
    assert!(matches!(err, Error::Io(e) if e.kind() == io::ErrorKind::TimedOut));
}

#[test]
fn other_layers_are_rejected_at_construction() {
    let err = Mp3Stream::builder()
        .with_data(Cursor::new(layer2_frame()))
        .with_frame_decoder(MockDecoder::new())
        .build()
        .err()
        .unwrap();
    assert!(matches!(
        err,
        Error::UnsupportedLayer {
            layer: Layer::Layer2
        }
    ));
}

#[test]
fn other_layers_are_rejected_mid_stream() {
    let mut data = frames(STEREO_128K, 2);
    data.extend(layer2_frame());

    let mut stream = Mp3Stream::builder()
        .with_data(Cursor::new(data))
        .with_frame_decoder(MockDecoder::new())
        .build()
        .unwrap();
    assert!(stream.read(None).unwrap().is_some());
    assert!(stream.read(None).unwrap().is_some());
    assert!(matches!(
        stream.read(None),
        Err(Error::UnsupportedLayer { .. })
    ));
}

#[test]
fn undersized_pcm_buffer_is_reported() {
    let err = Mp3Stream::builder()
        .with_data(Cursor::new(frames(STEREO_128K, 2)))
        .with_pcm_buffer_size(1000)
        .with_frame_decoder(MockDecoder::new())
        .build()
        .err()
        .unwrap();
    assert!(matches!(
        err,
        Error::PcmBufferTooSmall {
            needed: 1152,
            capacity: 500
        }
    ));
}

#[rstest]
#[case::no_data(Mp3StreamBuilder::new())]
#[case::zero_chunk_size(
    Mp3StreamBuilder::new()
        .with_data(Cursor::new(frames(STEREO_128K, 1)))
        .with_chunk_size(0)
)]
#[case::tiny_pcm_buffer(
    Mp3StreamBuilder::new()
        .with_data(Cursor::new(frames(STEREO_128K, 1)))
        .with_pcm_buffer_size(1)
)]
fn invalid_settings_are_rejected(#[case] builder: Mp3StreamBuilder<Cursor<Vec<u8>>>) {
    let err = builder
        .with_frame_decoder(MockDecoder::new())
        .build()
        .err()
        .unwrap();
    assert!(matches!(err, Error::InvalidSettings(_)), "unexpected error: {err:?}");
}

#[cfg(not(feature = "symphonia-mp3"))]
#[test]
fn missing_frame_decoder_is_reported() {
    let err = Mp3Stream::new(Cursor::new(frames(STEREO_128K, 1)))
        .err()
        .unwrap();
    assert!(matches!(err, Error::NoFrameDecoder));
}
