use crate::core::{Channels, Waveform};
use crate::error::{AudioError, AudioResult};

/// Read cursor past which the consumed prefix is dropped.
const COMPACT_THRESHOLD: usize = 1 << 16;

/// FIFO buffer of audio frames bridging variable-size producer and consumer
/// steps.
///
/// Samples live in one owned buffer with an explicit read cursor; popping
/// advances the cursor and the consumed prefix is dropped once it grows
/// past a threshold. The buffer only ever holds whole frames.
#[derive(Debug)]
pub struct FrameFifo {
    samples: Vec<f32>,
    read_pos: usize,
    channels: Channels,
}

impl FrameFifo {
    /// Create an empty FIFO for the given channel layout
    pub fn new(channels: Channels) -> Self {
        FrameFifo {
            samples: Vec::new(),
            read_pos: 0,
            channels,
        }
    }

    /// Number of buffered frames
    pub fn frames(&self) -> usize {
        (self.samples.len() - self.read_pos) / self.channels.count() as usize
    }

    /// Whether the FIFO holds no frames
    pub fn is_empty(&self) -> bool {
        self.samples.len() == self.read_pos
    }

    /// Append interleaved samples. Must be a whole number of frames.
    pub fn push(&mut self, samples: &[f32]) -> AudioResult<()> {
        if samples.len() % self.channels.count() as usize != 0 {
            return Err(AudioError::BufferError(
                "FIFO push of a partial frame".to_string(),
            ));
        }
        self.samples.extend_from_slice(samples);
        Ok(())
    }

    /// Drain up to `max_frames` from the front as a waveform.
    ///
    /// Returns fewer frames only when the buffer holds fewer, and an empty
    /// waveform when the buffer is empty.
    pub fn pop(&mut self, max_frames: usize) -> Waveform {
        let ch = self.channels.count() as usize;
        let take = self.frames().min(max_frames) * ch;
        let out = self.samples[self.read_pos..self.read_pos + take].to_vec();
        self.read_pos += take;
        self.compact();
        // Whole-frame invariant held by push
        Waveform::new(out, self.channels).expect("FIFO drained a partial frame")
    }

    fn compact(&mut self) {
        if self.read_pos >= COMPACT_THRESHOLD {
            self.samples.drain(..self.read_pos);
            self.read_pos = 0;
        }
    }
}
