use crate::cancel::CancelToken;
use crate::core::{Channels, FrameFifo, Waveform};
use crate::encoder::FrameSink;
use crate::error::{AudioError, AudioResult};

/// Incremental encoder accepting arbitrary-size waveform chunks.
///
/// Submitted chunks accumulate in an internal FIFO and drain to the wrapped
/// [`FrameSink`] exactly one native encode-frame at a time; whatever does
/// not fill a frame stays buffered for the next call. [`finish`](Self::finish)
/// drains the remainder, flushes the sink's delayed frames and writes the
/// trailer. The cancellation token is checked before every drain.
pub struct StreamingEncoder<K: FrameSink> {
    sink: K,
    fifo: FrameFifo,
    channels: Channels,
    cancel: CancelToken,
    frames_written: u64,
}

impl<K: FrameSink> StreamingEncoder<K> {
    /// Wrap a frame sink expecting the given channel layout
    pub fn new(sink: K, channels: Channels, cancel: CancelToken) -> Self {
        StreamingEncoder {
            sink,
            fifo: FrameFifo::new(channels),
            channels,
            cancel,
            frames_written: 0,
        }
    }

    /// Total frames submitted to the sink so far
    pub fn frames_written(&self) -> u64 {
        self.frames_written
    }

    /// Buffer a chunk and drain every complete encode-frame to the sink.
    pub fn encode(&mut self, waveform: &Waveform) -> AudioResult<()> {
        if waveform.channels() != self.channels {
            return Err(AudioError::InvalidChannels {
                expected: self.channels.count(),
                got: waveform.channels().count(),
            });
        }

        self.fifo.push(waveform.samples())?;

        let frame_size = self.sink.frame_size();
        while self.fifo.frames() >= frame_size {
            self.cancel.check()?;
            self.submit(frame_size)?;
        }
        Ok(())
    }

    /// Drain the remaining buffered audio (including a short final frame),
    /// flush the sink's delayed output and write trailing metadata.
    ///
    /// Consumes the encoder; no further chunks can follow the trailer.
    pub fn finish(mut self) -> AudioResult<u64> {
        let frame_size = self.sink.frame_size();
        while !self.fifo.is_empty() {
            self.cancel.check()?;
            let take = self.fifo.frames().min(frame_size);
            self.submit(take)?;
        }

        // Codecs may hold frames back; keep signaling end-of-input until no
        // more output appears.
        while self.sink.flush()? {
            self.cancel.check()?;
        }

        self.sink.finalize()?;
        Ok(self.frames_written)
    }

    fn submit(&mut self, frames: usize) -> AudioResult<()> {
        let frame = self.fifo.pop(frames);
        self.sink.push_frame(&frame)?;
        self.frames_written += frame.frames() as u64;
        Ok(())
    }
}
