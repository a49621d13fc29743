//! Audio decode capability and streaming wrapper

pub mod streaming;
pub mod symphonia;

pub use self::symphonia::SymphoniaSource;
pub use streaming::StreamingDecoder;

use crate::core::{Channels, Waveform};
use crate::error::AudioResult;

/// One step of an external decode capability.
///
/// A source yields already demuxed, decoded and format-converted PCM at a
/// rate and layout negotiated when it was opened. `Ok(None)` signals end of
/// stream; implementations must keep returning it afterwards.
pub trait FrameSource: Send {
    /// Negotiated sample rate in Hz
    fn sample_rate(&self) -> u32;

    /// Negotiated channel layout
    fn channels(&self) -> Channels;

    /// Pull the next unit of decoded audio
    fn pull_frame(&mut self) -> AudioResult<Option<Waveform>>;
}
