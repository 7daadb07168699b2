//! Real-time noise-gating microphone pipeline.
//!
//! Captures a live audio stream, runs every frame through an adaptive
//! noise gate, and exposes the result as a synthetic output stream for an
//! external publisher (e.g. a real-time-communication client) to consume.
//!
//! The gate estimates the ambient noise floor from the lower tail of
//! recent frame energy, maps loudness to a target gain through a
//! quadratic transfer curve, and smooths the applied gain sample-by-sample
//! with asymmetric attack/release time constants. Native noise suppression
//! on the capture device is forced off because this gate replaces it.
//!
//! # Quick start
//!
//! ```ignore
//! use mic_gate::{AudioPipelineManager, CaptureConstraints, GateParameters};
//!
//! let manager = AudioPipelineManager::new(
//!     CaptureConstraints::default(),
//!     GateParameters::default(),
//! );
//! let mut handle = manager.start()?;
//!
//! let mut buf = vec![0.0f32; 1024];
//! loop {
//!     let n = handle.output().unwrap().read(&mut buf);
//!     // hand buf[..n] to the publishing client
//! }
//! ```
//!
//! The DSP is usable on its own for offline processing:
//!
//! ```
//! use mic_gate::{GateParameters, NoiseGateNode};
//!
//! let mut gate = NoiseGateNode::new(GateParameters::default(), 48000);
//! let mut frame = vec![0.0f32; 128];
//! gate.process(&mut frame);
//! ```

pub mod audio;
pub mod error;
pub mod gate;
pub mod pipeline;

pub use audio::{AudioFrame, CaptureConstraints, OutputStream};
pub use error::PipelineError;
pub use gate::{GateParameters, NoiseGateNode};
pub use pipeline::{AudioPipelineManager, DEFAULT_FRAME_LEN, PipelineHandle, PipelineState};
