//! Gate transfer curve: loudness and floor in, target gain out.

/// Attenuation applied below the noise floor. Never fully mutes, so the
/// gate cannot produce hard sample discontinuities when it closes.
pub const FLOOR_GAIN: f32 = 0.1;

/// Map frame loudness to a target gain in `[0, 1]`.
///
/// - clearly above the floor (`rms > noise_floor + gate_threshold`): pass
///   through at 1.0;
/// - inside the transition band: quadratic ramp, which keeps the gate
///   closed longer near the floor and opens quickly once signal clearly
///   exceeds it;
/// - at or below the floor: fixed [`FLOOR_GAIN`].
pub fn target_gain(rms: f32, noise_floor: f32, gate_threshold: f32) -> f32 {
    if rms > noise_floor + gate_threshold {
        1.0
    } else if rms > noise_floor {
        let ratio = (rms - noise_floor) / gate_threshold;
        ratio * ratio
    } else {
        FLOOR_GAIN
    }
}
