use crate::cancel::CancelToken;
use crate::core::{Channels, FrameFifo, Waveform};
use crate::decoder::FrameSource;
use crate::error::AudioResult;

/// Incremental decoder yielding bounded-size waveform chunks.
///
/// Decoded units from the wrapped [`FrameSource`] accumulate in an internal
/// FIFO; each [`decode`](Self::decode) call drains at most `max_frames` so
/// memory stays bounded no matter how long the input file is. The
/// cancellation token is checked after every pull from the source.
pub struct StreamingDecoder<S: FrameSource> {
    source: S,
    fifo: FrameFifo,
    exhausted: bool,
    cancel: CancelToken,
    frames_emitted: u64,
}

impl<S: FrameSource> StreamingDecoder<S> {
    /// Wrap a frame source
    pub fn new(source: S, cancel: CancelToken) -> Self {
        let fifo = FrameFifo::new(source.channels());
        StreamingDecoder {
            source,
            fifo,
            exhausted: false,
            cancel,
            frames_emitted: 0,
        }
    }

    /// Negotiated sample rate in Hz
    pub fn sample_rate(&self) -> u32 {
        self.source.sample_rate()
    }

    /// Negotiated channel layout
    pub fn channels(&self) -> Channels {
        self.source.channels()
    }

    /// Total frames returned by `decode` so far
    pub fn frames_emitted(&self) -> u64 {
        self.frames_emitted
    }

    /// Pull the next chunk of up to `max_frames` decoded frames.
    ///
    /// Returns `Ok(None)` once the source is exhausted and the FIFO is
    /// drained; exhaustion is sticky, later calls never pull again. A set
    /// cancel token surfaces as `Err(AudioError::Canceled)`.
    pub fn decode(&mut self, max_frames: usize) -> AudioResult<Option<Waveform>> {
        while !self.exhausted && self.fifo.frames() < max_frames {
            match self.source.pull_frame()? {
                Some(unit) => self.fifo.push(unit.samples())?,
                None => self.exhausted = true,
            }
            self.cancel.check()?;
        }

        if self.fifo.is_empty() {
            return Ok(None);
        }

        let chunk = self.fifo.pop(max_frames);
        self.frames_emitted += chunk.frames() as u64;
        Ok(Some(chunk))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AudioError;

    /// Source yielding scripted units, then end of stream.
    struct ScriptedSource {
        units: Vec<Vec<f32>>,
        next: usize,
        channels: Channels,
    }

    impl ScriptedSource {
        fn new(units: Vec<Vec<f32>>, channels: Channels) -> Self {
            ScriptedSource {
                units,
                next: 0,
                channels,
            }
        }
    }

    impl FrameSource for ScriptedSource {
        fn sample_rate(&self) -> u32 {
            44100
        }

        fn channels(&self) -> Channels {
            self.channels
        }

        fn pull_frame(&mut self) -> AudioResult<Option<Waveform>> {
            match self.units.get(self.next) {
                Some(unit) => {
                    self.next += 1;
                    Ok(Some(Waveform::new(unit.clone(), self.channels)?))
                }
                None => Ok(None),
            }
        }
    }

    fn ramp_units(total_frames: usize, unit_frames: usize) -> Vec<Vec<f32>> {
        (0..total_frames)
            .map(|i| i as f32)
            .collect::<Vec<_>>()
            .chunks(unit_frames)
            .map(|c| c.to_vec())
            .collect()
    }

    #[test]
    fn test_chunked_decode_preserves_frames() {
        // Decode in chunks of 7 and in one giant chunk; totals must match
        // and contents must concatenate to the same stream.
        let total = 100;
        for chunk_size in [7usize, 32, 1000] {
            let source = ScriptedSource::new(ramp_units(total, 13), Channels::Mono);
            let mut decoder = StreamingDecoder::new(source, CancelToken::new());

            let mut frames = 0;
            let mut samples = Vec::new();
            while let Some(chunk) = decoder.decode(chunk_size).unwrap() {
                assert!(chunk.frames() <= chunk_size);
                frames += chunk.frames();
                samples.extend_from_slice(chunk.samples());
            }
            assert_eq!(frames, total);
            assert_eq!(samples, (0..total).map(|i| i as f32).collect::<Vec<_>>());
        }
    }

    #[test]
    fn test_exhaustion_is_sticky() {
        let source = ScriptedSource::new(ramp_units(10, 10), Channels::Mono);
        let mut decoder = StreamingDecoder::new(source, CancelToken::new());

        assert!(decoder.decode(16).unwrap().is_some());
        assert!(decoder.decode(16).unwrap().is_none());
        assert!(decoder.decode(16).unwrap().is_none());
        assert_eq!(decoder.frames_emitted(), 10);
    }

    #[test]
    fn test_short_final_chunk() {
        let source = ScriptedSource::new(ramp_units(25, 10), Channels::Mono);
        let mut decoder = StreamingDecoder::new(source, CancelToken::new());

        assert_eq!(decoder.decode(10).unwrap().unwrap().frames(), 10);
        assert_eq!(decoder.decode(10).unwrap().unwrap().frames(), 10);
        assert_eq!(decoder.decode(10).unwrap().unwrap().frames(), 5);
        assert!(decoder.decode(10).unwrap().is_none());
    }

    #[test]
    fn test_cancel_aborts_decode() {
        let cancel = CancelToken::new();
        cancel.cancel();
        let source = ScriptedSource::new(ramp_units(50, 10), Channels::Mono);
        let mut decoder = StreamingDecoder::new(source, cancel);

        let result = decoder.decode(20);
        assert!(matches!(result, Err(AudioError::Canceled)));
    }

    #[test]
    fn test_source_error_propagates() {
        struct FailingSource;

        impl FrameSource for FailingSource {
            fn sample_rate(&self) -> u32 {
                44100
            }
            fn channels(&self) -> Channels {
                Channels::Mono
            }
            fn pull_frame(&mut self) -> AudioResult<Option<Waveform>> {
                Err(AudioError::DecodeError("bad packet".to_string()))
            }
        }

        let mut decoder = StreamingDecoder::new(FailingSource, CancelToken::new());
        assert!(matches!(
            decoder.decode(8),
            Err(AudioError::DecodeError(_))
        ));
    }
}
