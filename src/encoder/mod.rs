//! Audio encode capability and streaming wrapper

pub mod streaming;
pub mod wav;

pub use streaming::StreamingEncoder;
pub use wav::WavSink;

use crate::core::Waveform;
use crate::error::AudioResult;

/// One step of an external encode capability.
///
/// A sink accepts PCM at the rate/layout it was opened with, in units of its
/// native encode-frame size (codecs reject other sizes; only the final frame
/// may be shorter). `flush` signals end-of-input once so codecs can emit
/// delayed frames; `finalize` writes trailing container metadata.
pub trait FrameSink: Send {
    /// Native encode-frame size in frames
    fn frame_size(&self) -> usize;

    /// Submit one encode-frame worth of audio
    fn push_frame(&mut self, waveform: &Waveform) -> AudioResult<()>;

    /// Signal end-of-input; returns whether delayed output was produced,
    /// so callers repeat until it reports `false`.
    fn flush(&mut self) -> AudioResult<bool> {
        Ok(false)
    }

    /// Write trailing container metadata and close the destination
    fn finalize(&mut self) -> AudioResult<()>;
}
