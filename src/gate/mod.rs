//! Noise-gate DSP: energy estimation, adaptive floor tracking, the gate
//! curve, gain smoothing, and the composed per-frame node.

pub mod curve;
pub mod energy;
pub mod floor;
pub mod node;
pub mod params;
pub mod smoother;

pub use curve::{FLOOR_GAIN, target_gain};
pub use energy::frame_rms;
pub use floor::NoiseFloorTracker;
pub use node::NoiseGateNode;
pub use params::GateParameters;
pub use smoother::GainSmoother;
