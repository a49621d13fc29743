//! Per-window transform capability

use crate::core::Waveform;
use crate::error::AudioResult;

/// The external per-window processing step.
///
/// Anything that maps a waveform to a waveform of the same layout fits —
/// a separation model, a remote call, or the identity stub. The pipeline
/// feeds each window with its boundary margin attached and discards the
/// margin's output afterwards, so implementations see extra context at
/// both ends.
pub trait Transform: Send {
    /// Transform one window
    fn apply(&mut self, waveform: Waveform) -> AudioResult<Waveform>;
}

/// Pass-through transform, the placeholder used when no model is wired in
#[derive(Debug, Default)]
pub struct Identity;

impl Transform for Identity {
    fn apply(&mut self, waveform: Waveform) -> AudioResult<Waveform> {
        Ok(waveform)
    }
}

/// Constant gain, handy for exercising the pipeline with a visible effect
#[derive(Debug)]
pub struct Gain {
    /// Linear gain factor
    pub factor: f32,
}

impl Transform for Gain {
    fn apply(&mut self, waveform: Waveform) -> AudioResult<Waveform> {
        let channels = waveform.channels();
        let samples = waveform
            .into_samples()
            .into_iter()
            .map(|s| s * self.factor)
            .collect();
        Waveform::new(samples, channels)
    }
}
