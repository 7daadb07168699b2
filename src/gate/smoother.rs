//! Sample-granular gain smoothing with asymmetric attack/release.

/// First-order IIR smoother that low-passes a target gain into the gain
/// actually applied, sample by sample.
///
/// The time constant is asymmetric: opening uses the attack time (fast, so
/// transients are not clipped), closing uses the release time (slow, so
/// trailing syllables are not chopped). Smoothing runs inside the frame,
/// not just at frame granularity, so within-frame gain changes stay
/// audibly smooth instead of stepped.
#[derive(Debug)]
pub struct GainSmoother {
    prev_gain: f32,
}

impl GainSmoother {
    pub fn new() -> Self {
        Self { prev_gain: 0.0 }
    }

    /// Per-sample smoothing coefficient for a given time constant:
    /// `1 - exp(-1 / (sample_rate * time_s))`.
    fn coefficient(sample_rate: u32, time_s: f32) -> f32 {
        1.0 - (-1.0 / (sample_rate as f32 * time_s)).exp()
    }

    /// Smooth toward `target_gain` across `frame`, scaling each sample by
    /// the gain as it evolves. The final gain persists for the next frame.
    pub fn apply(
        &mut self,
        frame: &mut [f32],
        target_gain: f32,
        attack_time_s: f32,
        release_time_s: f32,
        sample_rate: u32,
    ) {
        let time_s = if target_gain > self.prev_gain {
            attack_time_s
        } else {
            release_time_s
        };
        let coeff = Self::coefficient(sample_rate, time_s);

        for sample in frame {
            self.prev_gain += (target_gain - self.prev_gain) * coeff;
            *sample *= self.prev_gain;
        }
    }

    /// The last applied gain, always in `[0, 1]`.
    pub fn gain(&self) -> f32 {
        self.prev_gain
    }
}

impl Default for GainSmoother {
    fn default() -> Self {
        Self::new()
    }
}
