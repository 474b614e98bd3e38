/// Stream sample rate (samples per second per channel).
pub type SampleRate = u32;

/// Number of channels in a stream.
pub type ChannelCount = u16;

/// Compressed bit rate of a frame, in bits per second.
pub type BitRate = u32;

/// Size of one PCM sample in the output stream, in bytes.
pub(crate) const BYTES_PER_SAMPLE: usize = 2;

/// Asserts at compile time that an error type is usable across threads and
/// with `?` in boxed-error contexts.
macro_rules! assert_error_traits {
    ($to_test:path) => {
        const _: () = {
            const fn check<T: std::error::Error + Send + Sync + 'static>() {}
            check::<$to_test>();
        };
    };
}
pub(crate) use assert_error_traits;
