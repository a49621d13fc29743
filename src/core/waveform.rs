use crate::error::{AudioError, AudioResult};

/// Channel configuration for audio
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channels {
    /// Mono (1 channel)
    Mono = 1,
    /// Stereo (2 channels)
    Stereo = 2,
    /// Quad (4 channels)
    Quad = 4,
    /// 5.1 surround sound
    SurroundFivePointOne = 6,
    /// 7.1 surround sound
    SurroundSevenPointOne = 8,
}

impl Channels {
    /// Create Channels from channel count
    pub fn from_count(count: u32) -> AudioResult<Self> {
        match count {
            1 => Ok(Channels::Mono),
            2 => Ok(Channels::Stereo),
            4 => Ok(Channels::Quad),
            6 => Ok(Channels::SurroundFivePointOne),
            8 => Ok(Channels::SurroundSevenPointOne),
            n => Err(AudioError::InvalidChannels {
                expected: 1,
                got: n,
            }),
        }
    }

    /// Get the number of channels
    pub fn count(&self) -> u32 {
        *self as u32
    }

    /// Get channel layout name
    pub fn name(&self) -> &'static str {
        match self {
            Channels::Mono => "Mono",
            Channels::Stereo => "Stereo",
            Channels::Quad => "Quad",
            Channels::SurroundFivePointOne => "5.1 Surround",
            Channels::SurroundSevenPointOne => "7.1 Surround",
        }
    }
}

/// A run of interleaved multi-channel float samples.
///
/// Samples are stored per frame: all channels of frame 0, then frame 1, and
/// so on. The channel layout is fixed for the lifetime of a waveform, and
/// every operation produces a new value rather than mutating in place, so
/// the pipeline can be reasoned about as a chain of pure functions.
#[derive(Debug, Clone, PartialEq)]
pub struct Waveform {
    /// Interleaved samples, f32 in [-1.0, 1.0]
    samples: Vec<f32>,
    /// Channel layout
    channels: Channels,
}

impl Waveform {
    /// Create a waveform from interleaved samples.
    ///
    /// The sample count must be a whole number of frames.
    pub fn new(samples: Vec<f32>, channels: Channels) -> AudioResult<Self> {
        if samples.len() % channels.count() as usize != 0 {
            return Err(AudioError::BufferError(
                "Sample count not divisible by channel count".to_string(),
            ));
        }
        Ok(Waveform { samples, channels })
    }

    /// Create an empty waveform with the given layout
    pub fn empty(channels: Channels) -> Self {
        Waveform {
            samples: Vec::new(),
            channels,
        }
    }

    /// Get reference to the interleaved samples
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// Get owned samples (consumes the waveform)
    pub fn into_samples(self) -> Vec<f32> {
        self.samples
    }

    /// Get channel configuration
    pub fn channels(&self) -> Channels {
        self.channels
    }

    /// Number of frames (one sample per channel each)
    pub fn frames(&self) -> usize {
        self.samples.len() / self.channels.count() as usize
    }

    /// Check if the waveform holds no frames
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Extract frames `[start, end)` as a new waveform.
    pub fn sub_frames(&self, start: usize, end: usize) -> AudioResult<Waveform> {
        if start > end || end > self.frames() {
            return Err(AudioError::BufferError(format!(
                "sub_frames range [{start}, {end}) out of bounds for {} frames",
                self.frames()
            )));
        }
        let ch = self.channels.count() as usize;
        Ok(Waveform {
            samples: self.samples[start * ch..end * ch].to_vec(),
            channels: self.channels,
        })
    }

    /// Extract frames `[start, frames())` as a new waveform.
    pub fn sub_end_frames(&self, start: usize) -> AudioResult<Waveform> {
        self.sub_frames(start, self.frames())
    }

    /// Concatenate `other` after this waveform.
    ///
    /// Both waveforms must share a channel layout.
    pub fn concat(&self, other: &Waveform) -> AudioResult<Waveform> {
        if self.channels != other.channels {
            return Err(AudioError::InvalidChannels {
                expected: self.channels.count(),
                got: other.channels.count(),
            });
        }
        let mut samples = Vec::with_capacity(self.samples.len() + other.samples.len());
        samples.extend_from_slice(&self.samples);
        samples.extend_from_slice(&other.samples);
        Ok(Waveform {
            samples,
            channels: self.channels,
        })
    }
}
