use crate::cancel::CancelToken;
use crate::core::Waveform;
use crate::decoder::{FrameSource, StreamingDecoder, SymphoniaSource};
use crate::encoder::{FrameSink, StreamingEncoder, WavSink};
use crate::error::{AudioError, AudioResult};
use crate::processor::{MarginCarry, ProcessingStats, Segmenter};
use crate::transform::Transform;
use log::{debug, info};
use std::path::Path;
use std::time::{Duration, Instant};

/// Window and margin durations for a pipeline run
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Window size excluding margin, in seconds
    pub segment_seconds: f64,
    /// One-sided overlap margin, in seconds
    pub boundary_seconds: f64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        // 10 s windows with 0.5 s of context on each interior edge
        PipelineConfig {
            segment_seconds: 10.0,
            boundary_seconds: 0.5,
        }
    }
}

/// How a pipeline run ended, errors aside
#[derive(Debug)]
pub enum RunStatus {
    /// The whole input was processed and the output finalized
    Completed(ProcessingStats),
    /// The cancel token was observed before completion; the output file
    /// was not finalized
    Canceled,
}

/// Which leg of the pipeline a progress report refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressLeg {
    /// Position pulled from the decoder so far
    Decode,
    /// Position handed to the encoder so far
    Encode,
}

impl ProgressLeg {
    /// Short name for log lines
    pub fn name(&self) -> &'static str {
        match self {
            ProgressLeg::Decode => "decode",
            ProgressLeg::Encode => "encode",
        }
    }
}

/// Progress callback receiving a leg and its cumulative position in
/// milliseconds
pub type ProgressFn<'a> = &'a mut dyn FnMut(ProgressLeg, u64);

/// Minimum wall time between progress callback invocations, per leg
const PROGRESS_INTERVAL: Duration = Duration::from_millis(500);

/// Rate-limited progress reporter. Each leg throttles independently so a
/// slow decode cannot starve encode reports or vice versa.
struct Progress<'a> {
    callback: Option<ProgressFn<'a>>,
    sample_rate: u32,
    last_emit: [Option<Instant>; 2],
}

impl<'a> Progress<'a> {
    fn new(callback: Option<ProgressFn<'a>>, sample_rate: u32) -> Self {
        Progress {
            callback,
            sample_rate,
            last_emit: [None, None],
        }
    }

    /// Report a leg's cumulative frames, at most once per interval per leg.
    fn update(&mut self, leg: ProgressLeg, frames: u64) {
        let Some(callback) = self.callback.as_mut() else {
            return;
        };
        let now = Instant::now();
        let slot = &mut self.last_emit[leg as usize];
        let due = match *slot {
            Some(last) => now.duration_since(last) >= PROGRESS_INTERVAL,
            None => true,
        };
        if due {
            callback(leg, frames * 1000 / self.sample_rate as u64);
            *slot = Some(now);
        }
    }
}

/// Run the pipeline from one audio file to a WAV file.
///
/// Decodes `input` incrementally, feeds each chunk (with its boundary
/// margin) through `transform`, and streams the trimmed result into
/// `output`. Returns [`RunStatus::Canceled`] when the token was set,
/// `Err` for decode/encode failures, [`RunStatus::Completed`] otherwise —
/// exactly one of the three, never a silent partial success.
pub fn run<P: AsRef<Path>, Q: AsRef<Path>, T: Transform>(
    input: P,
    output: Q,
    config: &PipelineConfig,
    transform: &mut T,
    cancel: CancelToken,
    progress: Option<ProgressFn<'_>>,
) -> AudioResult<RunStatus> {
    let source = SymphoniaSource::from_file(&input)?;
    let sample_rate = source.sample_rate();
    let channels = source.channels();
    info!(
        "opened {}: {} Hz, {}",
        input.as_ref().display(),
        sample_rate,
        channels.name()
    );

    let segment_frames = (config.segment_seconds * sample_rate as f64) as usize;
    let boundary_frames = (config.boundary_seconds * sample_rate as f64) as usize;
    let segmenter = Segmenter::new(segment_frames, boundary_frames)?;

    let decoder = StreamingDecoder::new(source, cancel.clone());
    let sink = WavSink::create(&output, sample_rate, channels)?;
    let encoder = StreamingEncoder::new(sink, channels, cancel.clone());

    match run_streams(decoder, encoder, &segmenter, transform, &cancel, progress) {
        Ok(stats) => {
            info!(
                "finished {}: {} frames in, {} frames out, {} chunks",
                output.as_ref().display(),
                stats.frames_decoded,
                stats.frames_encoded,
                stats.chunks_processed
            );
            Ok(RunStatus::Completed(stats))
        }
        Err(e) if e.is_canceled() => Ok(RunStatus::Canceled),
        Err(e) => Err(e),
    }
}

/// Drive decode → transform → encode over already-opened endpoints.
///
/// Generic over source and sink so the loop can be exercised against mocks;
/// [`run`] wires in the symphonia/WAV pair. Cancellation surfaces as
/// `Err(AudioError::Canceled)` for the caller to map.
pub fn run_streams<S, K, T>(
    mut decoder: StreamingDecoder<S>,
    mut encoder: StreamingEncoder<K>,
    segmenter: &Segmenter,
    transform: &mut T,
    cancel: &CancelToken,
    progress: Option<ProgressFn<'_>>,
) -> AudioResult<ProcessingStats>
where
    S: FrameSource,
    K: FrameSink,
    T: Transform,
{
    let mut stats = ProcessingStats::default();
    let mut carry = MarginCarry::new(segmenter.boundary_frames());
    let mut progress = Progress::new(progress, decoder.sample_rate());

    loop {
        cancel.check()?;

        let chunk = match decoder.decode(segmenter.segment_frames())? {
            Some(chunk) => chunk,
            None => break,
        };
        stats.frames_decoded += chunk.frames() as u64;
        progress.update(ProgressLeg::Decode, stats.frames_decoded);

        let trimmed = process_chunk(&chunk, &mut carry, transform)?;
        stats.chunks_processed += 1;

        encoder.encode(&trimmed)?;
        stats.frames_encoded += trimmed.frames() as u64;
        progress.update(ProgressLeg::Encode, stats.frames_encoded);

        debug!(
            "chunk {}: {} frames in, {} frames out",
            stats.chunks_processed,
            chunk.frames(),
            trimmed.frames()
        );
    }

    let written = encoder.finish()?;
    debug_assert_eq!(written, stats.frames_encoded);
    progress.update(ProgressLeg::Encode, stats.frames_encoded);

    Ok(stats)
}

/// Prepend the carried margin, transform, strip the margin's output, and
/// re-arm the carry from the untransformed chunk.
fn process_chunk<T: Transform>(
    chunk: &Waveform,
    carry: &mut MarginCarry,
    transform: &mut T,
) -> AudioResult<Waveform> {
    let padded = carry.extend(chunk)?;
    let transformed = transform.apply(padded)?;
    if transformed.channels() != chunk.channels() {
        return Err(AudioError::InvalidChannels {
            expected: chunk.channels().count(),
            got: transformed.channels().count(),
        });
    }
    let trimmed = carry.strip(transformed)?;
    carry.advance(chunk)?;
    Ok(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Channels;
    use crate::transform::{Gain, Identity};
    use std::sync::{Arc, Mutex};

    struct VecSource {
        frames: Vec<f32>,
        pos: usize,
        unit: usize,
    }

    impl VecSource {
        fn new(frames: Vec<f32>, unit: usize) -> Self {
            VecSource {
                frames,
                pos: 0,
                unit,
            }
        }
    }

    impl FrameSource for VecSource {
        fn sample_rate(&self) -> u32 {
            1000
        }
        fn channels(&self) -> Channels {
            Channels::Mono
        }
        fn pull_frame(&mut self) -> AudioResult<Option<Waveform>> {
            if self.pos >= self.frames.len() {
                return Ok(None);
            }
            let end = (self.pos + self.unit).min(self.frames.len());
            let wave = Waveform::new(self.frames[self.pos..end].to_vec(), Channels::Mono)?;
            self.pos = end;
            Ok(Some(wave))
        }
    }

    #[derive(Clone)]
    struct VecSink {
        samples: Arc<Mutex<Vec<f32>>>,
        finalized: Arc<Mutex<bool>>,
    }

    impl VecSink {
        fn new() -> Self {
            VecSink {
                samples: Arc::new(Mutex::new(Vec::new())),
                finalized: Arc::new(Mutex::new(false)),
            }
        }
    }

    impl FrameSink for VecSink {
        fn frame_size(&self) -> usize {
            16
        }
        fn push_frame(&mut self, waveform: &Waveform) -> AudioResult<()> {
            self.samples
                .lock()
                .unwrap()
                .extend_from_slice(waveform.samples());
            Ok(())
        }
        fn finalize(&mut self) -> AudioResult<()> {
            *self.finalized.lock().unwrap() = true;
            Ok(())
        }
    }

    fn run_over(
        input: Vec<f32>,
        segmenter: &Segmenter,
        transform: &mut impl Transform,
        cancel: CancelToken,
    ) -> (AudioResult<ProcessingStats>, Vec<f32>, bool) {
        let decoder = StreamingDecoder::new(VecSource::new(input, 17), cancel.clone());
        let sink = VecSink::new();
        let samples = sink.samples.clone();
        let finalized = sink.finalized.clone();
        let encoder = StreamingEncoder::new(sink, Channels::Mono, cancel.clone());

        let result = run_streams(decoder, encoder, segmenter, transform, &cancel, None);
        let out = samples.lock().unwrap().clone();
        let done = *finalized.lock().unwrap();
        (result, out, done)
    }

    #[test]
    fn test_identity_run_preserves_stream() {
        let input: Vec<f32> = (0..100).map(|i| i as f32).collect();
        let segmenter = Segmenter::new(40, 10).unwrap();
        let (result, out, finalized) = run_over(
            input.clone(),
            &segmenter,
            &mut Identity,
            CancelToken::new(),
        );

        let stats = result.unwrap();
        assert_eq!(stats.frames_decoded, 100);
        assert_eq!(stats.frames_encoded, 100);
        assert_eq!(out, input);
        assert!(finalized);
    }

    #[test]
    fn test_transform_applies_across_chunk_boundaries() {
        let input: Vec<f32> = (0..250).map(|i| (i % 7) as f32).collect();
        let segmenter = Segmenter::new(64, 8).unwrap();
        let (result, out, _) = run_over(
            input.clone(),
            &segmenter,
            &mut Gain { factor: 0.5 },
            CancelToken::new(),
        );

        result.unwrap();
        let expected: Vec<f32> = input.iter().map(|s| s * 0.5).collect();
        assert_eq!(out, expected);
    }

    #[test]
    fn test_preset_cancel_writes_nothing() {
        let cancel = CancelToken::new();
        cancel.cancel();
        let segmenter = Segmenter::new(40, 10).unwrap();
        let (result, out, finalized) = run_over(
            vec![0.0; 100],
            &segmenter,
            &mut Identity,
            cancel,
        );

        assert!(matches!(result, Err(AudioError::Canceled)));
        assert!(out.is_empty());
        assert!(!finalized);
    }

    #[test]
    fn test_empty_input_completes_with_zero_frames() {
        let segmenter = Segmenter::new(40, 10).unwrap();
        let (result, out, finalized) =
            run_over(Vec::new(), &segmenter, &mut Identity, CancelToken::new());

        let stats = result.unwrap();
        assert_eq!(stats.frames_decoded, 0);
        assert_eq!(stats.chunks_processed, 0);
        assert!(out.is_empty());
        assert!(finalized);
    }

    #[test]
    fn test_progress_reports_cover_both_legs() {
        let cancel = CancelToken::new();
        let input: Vec<f32> = (0..100).map(|i| i as f32).collect();
        let decoder = StreamingDecoder::new(VecSource::new(input, 17), cancel.clone());
        let encoder = StreamingEncoder::new(VecSink::new(), Channels::Mono, cancel.clone());
        let segmenter = Segmenter::new(40, 10).unwrap();

        let mut reports: Vec<(ProgressLeg, u64)> = Vec::new();
        let mut progress = |leg: ProgressLeg, ms: u64| reports.push((leg, ms));
        run_streams(
            decoder,
            encoder,
            &segmenter,
            &mut Identity,
            &cancel,
            Some(&mut progress),
        )
        .unwrap();

        // Both legs report, and the decode leg reports before any frame
        // reaches the encoder.
        assert!(reports.iter().any(|&(leg, _)| leg == ProgressLeg::Decode));
        assert!(reports.iter().any(|&(leg, _)| leg == ProgressLeg::Encode));
        assert_eq!(reports[0].0, ProgressLeg::Decode);

        // Positions are cumulative within each leg.
        for leg in [ProgressLeg::Decode, ProgressLeg::Encode] {
            let seq: Vec<u64> = reports
                .iter()
                .filter(|&&(l, _)| l == leg)
                .map(|&(_, ms)| ms)
                .collect();
            assert!(seq.windows(2).all(|w| w[0] <= w[1]));
        }
    }

    #[test]
    fn test_bad_transform_channels_rejected() {
        struct ChannelSwapper;
        impl Transform for ChannelSwapper {
            fn apply(&mut self, waveform: Waveform) -> AudioResult<Waveform> {
                Waveform::new(
                    waveform.into_samples().repeat(2),
                    Channels::Stereo,
                )
            }
        }

        let segmenter = Segmenter::new(40, 10).unwrap();
        let (result, _, finalized) = run_over(
            vec![0.0; 50],
            &segmenter,
            &mut ChannelSwapper,
            CancelToken::new(),
        );
        assert!(matches!(
            result,
            Err(AudioError::InvalidChannels { .. })
        ));
        assert!(!finalized);
    }
}
