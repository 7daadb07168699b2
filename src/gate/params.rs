//! Gate parameter set.

use serde::{Deserialize, Serialize};

/// Immutable parameter snapshot for the noise gate.
///
/// A snapshot is fixed at construction and replaced whole via
/// [`NoiseGateNode::set_parameters`](super::NoiseGateNode::set_parameters),
/// taking effect on the next frame, never mid-frame. The defaults are the
/// reference behavior's heuristic constants, kept exactly for behavioral
/// compatibility.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GateParameters {
    /// Noise-floor estimate used until enough energy history exists.
    pub noise_floor_init: f32,
    /// Width of the transition band above the floor.
    pub gate_threshold: f32,
    /// Time constant for the gate opening (seconds).
    pub attack_time_s: f32,
    /// Time constant for the gate closing (seconds).
    pub release_time_s: f32,
    /// Sliding-window length for the noise-floor tracker, in frames.
    pub history_size: usize,
}

impl Default for GateParameters {
    fn default() -> Self {
        Self {
            noise_floor_init: 0.01,
            gate_threshold: 0.02,
            attack_time_s: 0.001,
            release_time_s: 0.1,
            history_size: 100,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_reference_behavior() {
        let p = GateParameters::default();
        assert_eq!(p.noise_floor_init, 0.01);
        assert_eq!(p.gate_threshold, 0.02);
        assert_eq!(p.attack_time_s, 0.001);
        assert_eq!(p.release_time_s, 0.1);
        assert_eq!(p.history_size, 100);
    }

    #[test]
    fn test_partial_json_falls_back_to_defaults() {
        let p: GateParameters = serde_json::from_str(r#"{"gate_threshold": 0.05}"#).unwrap();
        assert_eq!(p.gate_threshold, 0.05);
        assert_eq!(p.history_size, 100);
    }
}
