#![warn(missing_docs)]

//! # stempipe: Chunked Audio Transform Pipeline
//!
//! Streams long audio files through a per-window transform without holding
//! the full decoded signal in memory: decode into bounded chunks, attach
//! overlap margins, run the transform, discard the margins' output, and
//! re-encode — with cooperative cancellation at every blocking step.
//!
//! ## Quick Start
//!
//! ```ignore
//! use stempipe::{CancelToken, PipelineConfig, RunStatus};
//! use stempipe::transform::Identity;
//!
//! let cancel = CancelToken::new();
//! let status = stempipe::run(
//!     "input.flac",
//!     "output.wav",
//!     &PipelineConfig::default(),
//!     &mut Identity,
//!     cancel,
//!     None,
//! )?;
//! match status {
//!     RunStatus::Completed(stats) => println!("{} frames", stats.frames_encoded),
//!     RunStatus::Canceled => println!("stopped"),
//! }
//! ```

/// Cooperative cancellation token
pub mod cancel;
/// Core audio types and structures
pub mod core;
/// Audio decode capability and streaming wrapper
pub mod decoder;
/// Audio encode capability and streaming wrapper
pub mod encoder;
/// Error types for audio operations
pub mod error;
/// Chunked processing pipeline
pub mod processor;
/// Per-window transform capability
pub mod transform;

// Export public types
pub use crate::cancel::CancelToken;
pub use crate::core::{Channels, Waveform};
pub use crate::error::{AudioError, AudioResult};
pub use crate::processor::{
    PipelineConfig, ProcessingStats, ProgressLeg, RunStatus, Segmenter, run,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
