//! The composed per-frame noise-gate transform.

use tracing::warn;

use crate::gate::curve::target_gain;
use crate::gate::energy::frame_rms;
use crate::gate::floor::NoiseFloorTracker;
use crate::gate::params::GateParameters;
use crate::gate::smoother::GainSmoother;

/// Stateful noise gate operating on fixed-cadence mono frames.
///
/// Each call to [`process`](Self::process) runs the fixed per-frame chain:
/// RMS energy -> noise-floor update -> target gain -> smoothed application.
/// State (floor estimate, energy history, applied gain) is owned
/// exclusively by this instance, so independent pipelines never
/// cross-contaminate.
///
/// `process` performs no allocation and no blocking, making it safe to
/// call from a real-time audio callback.
#[derive(Debug)]
pub struct NoiseGateNode {
    params: GateParameters,
    floor: NoiseFloorTracker,
    smoother: GainSmoother,
    sample_rate: u32,
}

impl NoiseGateNode {
    pub fn new(params: GateParameters, sample_rate: u32) -> Self {
        Self {
            floor: NoiseFloorTracker::new(params.noise_floor_init, params.history_size),
            smoother: GainSmoother::new(),
            params,
            sample_rate,
        }
    }

    /// Transform one frame in place.
    ///
    /// Total over well-formed frames: it cannot fail. An empty frame is a
    /// programming-contract violation and aborts rather than being
    /// recovered silently.
    pub fn process(&mut self, frame: &mut [f32]) {
        assert!(
            !frame.is_empty(),
            "noise gate fed an empty frame; the pipeline guarantees nonzero frame length"
        );

        let rms = frame_rms(frame);
        let noise_floor = self.floor.observe(rms);
        let target = target_gain(rms, noise_floor, self.params.gate_threshold);

        self.smoother.apply(
            frame,
            target,
            self.params.attack_time_s,
            self.params.release_time_s,
            self.sample_rate,
        );
    }

    /// Replace the whole parameter set atomically between frames.
    ///
    /// Adaptive state survives the swap: the floor estimate and applied
    /// gain carry over, and the energy history is retained up to the new
    /// window length. The history capacity is fixed at construction; a
    /// larger `history_size` is clamped to it.
    pub fn set_parameters(&mut self, params: GateParameters) {
        let applied = self.floor.set_window(params.history_size);
        if applied != params.history_size {
            warn!(
                requested = params.history_size,
                applied, "history_size clamped to the capacity built at construction"
            );
        }
        self.params = params;
    }

    pub fn parameters(&self) -> &GateParameters {
        &self.params
    }

    /// Current noise-floor estimate.
    pub fn noise_floor(&self) -> f32 {
        self.floor.noise_floor()
    }

    /// Gain applied to the most recent sample, in `[0, 1]`.
    pub fn current_gain(&self) -> f32 {
        self.smoother.gain()
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }
}
