//! Capture-to-output pipeline: acquisition, wiring, lifecycle, teardown.

pub mod manager;
mod worker;

pub use manager::{AudioPipelineManager, DEFAULT_FRAME_LEN, PipelineHandle, PipelineState};
