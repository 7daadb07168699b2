//! Per-frame loudness estimation.

/// RMS energy of one frame: `sqrt(mean(sample^2))`.
///
/// Input invariant: `samples` is nonzero-length. The pipeline guarantees
/// this by construction (frames are assembled to a fixed nonzero length),
/// so the degenerate case is not handled here.
pub fn frame_rms(samples: &[f32]) -> f32 {
    debug_assert!(!samples.is_empty(), "frame_rms requires a nonzero frame");

    let sum_sq: f64 = samples.iter().map(|&s| s as f64 * s as f64).sum();
    (sum_sq / samples.len() as f64).sqrt() as f32
}
