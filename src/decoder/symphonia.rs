use crate::core::{Channels, Waveform};
use crate::error::{AudioError, AudioResult};
use std::fs::File;
use std::path::Path;
use symphonia::core::audio::SampleBuffer;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

/// Symphonia-based decode capability
pub struct SymphoniaSource {
    /// Current reader for the audio source
    reader: Box<dyn symphonia::core::formats::FormatReader>,
    /// Track information
    track_id: u32,
    /// Sample rate
    sample_rate: u32,
    /// Number of channels
    channels: Channels,
    /// Whether the stream hit end of file
    finished: bool,
    /// Current decoder state
    decoder: Box<dyn symphonia::core::codecs::Decoder>,
}

impl SymphoniaSource {
    /// Open a source from a file path, probing the container format and
    /// negotiating rate/layout from the first audio track.
    pub fn from_file<P: AsRef<Path>>(path: P) -> AudioResult<Self> {
        let path = path.as_ref();

        let file = Box::new(File::open(path).map_err(AudioError::Io)?);

        let mss = MediaSourceStream::new(file, Default::default());

        // Probe the file to detect format
        let mut hint = Hint::new();
        if let Some(ext) = path.extension() {
            if let Some(ext_str) = ext.to_str() {
                hint.with_extension(ext_str);
            }
        }

        let format_opts = FormatOptions::default();
        let metadata_opts = MetadataOptions::default();

        let probed = symphonia::default::get_probe()
            .format(&hint, mss, &format_opts, &metadata_opts)
            .map_err(|e| AudioError::UnsupportedFormat(e.to_string()))?;

        let reader = probed.format;

        // Find the first audio track
        let track = reader
            .tracks()
            .iter()
            .find(|t| t.codec_params.codec != symphonia::core::codecs::CODEC_TYPE_NULL)
            .ok_or_else(|| AudioError::InvalidMetadata("No audio track found".to_string()))?
            .clone();

        let track_id = track.id;
        let codec_params = &track.codec_params;

        let sample_rate = codec_params
            .sample_rate
            .ok_or_else(|| AudioError::InvalidMetadata("Unknown sample rate".to_string()))?;
        if sample_rate == 0 {
            return Err(AudioError::InvalidSampleRate { rate: sample_rate });
        }

        let channels = if let Some(channels) = codec_params.channels {
            Channels::from_count(channels.count() as u32)?
        } else {
            return Err(AudioError::InvalidMetadata(
                "Unknown channel count".to_string(),
            ));
        };

        let decoder = symphonia::default::get_codecs()
            .make(codec_params, &Default::default())
            .map_err(|e| AudioError::DecodeError(e.to_string()))?;

        Ok(SymphoniaSource {
            reader,
            track_id,
            sample_rate,
            channels,
            finished: false,
            decoder,
        })
    }
}

impl super::FrameSource for SymphoniaSource {
    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn channels(&self) -> Channels {
        self.channels
    }

    fn pull_frame(&mut self) -> AudioResult<Option<Waveform>> {
        if self.finished {
            return Ok(None);
        }

        loop {
            let packet = match self.reader.next_packet() {
                Ok(packet) => packet,
                Err(symphonia::core::errors::Error::IoError(ref e))
                    if e.kind() == std::io::ErrorKind::UnexpectedEof =>
                {
                    self.finished = true;
                    return Ok(None);
                }
                Err(symphonia::core::errors::Error::DecodeError(_)) => {
                    // Skip corrupt packets and try the next one
                    continue;
                }
                Err(e) => return Err(AudioError::DecodeError(e.to_string())),
            };

            // Only process packets from our audio track
            if packet.track_id() != self.track_id {
                continue;
            }

            let audio_buf = match self.decoder.decode(&packet) {
                Ok(audio_buf) => audio_buf,
                Err(e) => return Err(AudioError::DecodeError(e.to_string())),
            };

            if audio_buf.frames() == 0 {
                continue;
            }

            // Convert whatever sample format the codec produced into
            // interleaved f32
            let spec = *audio_buf.spec();
            let mut sample_buf = SampleBuffer::<f32>::new(audio_buf.capacity() as u64, spec);
            sample_buf.copy_interleaved_ref(audio_buf);

            let wave = Waveform::new(sample_buf.samples().to_vec(), self.channels)?;
            return Ok(Some(wave));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_file() {
        let result = SymphoniaSource::from_file("/nonexistent/file.mp3");
        assert!(result.is_err());
    }
}
