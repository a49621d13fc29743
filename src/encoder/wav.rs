use crate::core::{Channels, Waveform};
use crate::error::{AudioError, AudioResult};
use hound::{WavSpec, WavWriter};
use std::path::Path;

/// Write granularity in frames. WAV has no codec frame size, so writes are
/// batched at this size purely to bound per-call work.
const WAV_FRAME_SIZE: usize = 1024;

/// WAV encode capability (32-bit float)
pub struct WavSink {
    writer: Option<WavWriter<std::io::BufWriter<std::fs::File>>>,
    sample_rate: u32,
    channels: Channels,
}

impl WavSink {
    /// Open a WAV file for writing at the given rate and layout
    pub fn create<P: AsRef<Path>>(
        path: P,
        sample_rate: u32,
        channels: Channels,
    ) -> AudioResult<Self> {
        if sample_rate == 0 {
            return Err(AudioError::InvalidSampleRate { rate: sample_rate });
        }

        let spec = WavSpec {
            channels: channels.count() as u16,
            sample_rate,
            bits_per_sample: 32,
            sample_format: hound::SampleFormat::Float,
        };

        let writer =
            WavWriter::create(path, spec).map_err(|e| AudioError::EncodeError(e.to_string()))?;

        Ok(WavSink {
            writer: Some(writer),
            sample_rate,
            channels,
        })
    }

    /// Get the sample rate
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Get the channel configuration
    pub fn channels(&self) -> Channels {
        self.channels
    }
}

impl super::FrameSink for WavSink {
    fn frame_size(&self) -> usize {
        WAV_FRAME_SIZE
    }

    fn push_frame(&mut self, waveform: &Waveform) -> AudioResult<()> {
        if waveform.channels() != self.channels {
            return Err(AudioError::InvalidChannels {
                expected: self.channels.count(),
                got: waveform.channels().count(),
            });
        }

        let writer = self
            .writer
            .as_mut()
            .ok_or_else(|| AudioError::EncodeError("Sink already finalized".to_string()))?;

        for &sample in waveform.samples() {
            writer
                .write_sample(sample)
                .map_err(|e| AudioError::EncodeError(e.to_string()))?;
        }

        Ok(())
    }

    fn finalize(&mut self) -> AudioResult<()> {
        if let Some(writer) = self.writer.take() {
            writer
                .finalize()
                .map_err(|e| AudioError::EncodeError(e.to_string()))?;
        }
        Ok(())
    }
}
