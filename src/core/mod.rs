//! Core audio types and structures

/// Waveform value type and channel layouts
pub mod waveform;

/// Frame FIFO bridging producer/consumer steps
pub mod fifo;

pub use fifo::FrameFifo;
pub use waveform::{Channels, Waveform};
