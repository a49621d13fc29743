//! Chunked processing pipeline

pub mod pipeline;
pub mod segment;

pub use pipeline::{PipelineConfig, ProgressLeg, RunStatus, run};
pub use segment::{MarginCarry, Segmenter};

/// Bookkeeping for one pipeline run
#[derive(Debug, Clone, Default)]
pub struct ProcessingStats {
    /// Frames pulled from the decoder
    pub frames_decoded: u64,
    /// Frames handed to the encoder after margin trimming
    pub frames_encoded: u64,
    /// Chunks that went through the transform
    pub chunks_processed: u64,
}
