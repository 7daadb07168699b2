//! Audio frame type and device/stream boundaries.

pub mod capture;
pub mod frame;
pub mod output;

pub use capture::CaptureConstraints;
pub use frame::AudioFrame;
pub use output::OutputStream;
