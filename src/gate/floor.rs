//! Adaptive noise-floor estimation from recent frame energy.

use std::collections::VecDeque;

/// Minimum number of observed frames before the floor estimate updates.
/// Below this, the initial estimate is kept (cold-start policy).
const MIN_HISTORY: usize = 10;

/// The floor is read from the lower tail of the energy distribution:
/// ambient noise dominates the quiet end, speech bursts the loud end.
const PERCENTILE: f32 = 0.2;

/// Headroom multiplier so voiced segments near the floor are not
/// classified as noise.
const HEADROOM: f32 = 1.5;

/// Tracks a sliding window of per-frame RMS energy and derives a running
/// noise-floor estimate without a voice-activity detector.
///
/// All storage is preallocated at construction; `observe` never allocates,
/// so it is safe on the real-time path.
#[derive(Debug)]
pub struct NoiseFloorTracker {
    history: VecDeque<f32>,
    /// Scratch for the sorted copy used by the percentile pick.
    scratch: Vec<f32>,
    capacity: usize,
    window: usize,
    noise_floor: f32,
}

impl NoiseFloorTracker {
    /// `history_size` fixes the ring capacity for the lifetime of the
    /// tracker; `initial_floor` is reported until enough history exists.
    pub fn new(initial_floor: f32, history_size: usize) -> Self {
        Self {
            history: VecDeque::with_capacity(history_size),
            scratch: Vec::with_capacity(history_size),
            capacity: history_size,
            window: history_size,
            noise_floor: initial_floor,
        }
    }

    /// Record one frame's RMS energy and return the updated floor.
    ///
    /// The oldest entry is evicted once the window is full. With fewer
    /// than [`MIN_HISTORY`] observations the floor is left unchanged.
    pub fn observe(&mut self, rms: f32) -> f32 {
        self.history.push_back(rms);
        while self.history.len() > self.window {
            self.history.pop_front();
        }

        if self.history.len() >= MIN_HISTORY {
            self.scratch.clear();
            self.scratch.extend(self.history.iter().copied());
            self.scratch.sort_unstable_by(|a, b| a.total_cmp(b));

            // Index 0 picks the minimum observed energy, the most
            // conservative estimate available.
            let idx = (self.scratch.len() as f32 * PERCENTILE).floor() as usize;
            self.noise_floor = self.scratch[idx] * HEADROOM;
        }

        self.noise_floor
    }

    pub fn noise_floor(&self) -> f32 {
        self.noise_floor
    }

    /// Shrink or grow the logical window, bounded by the capacity chosen
    /// at construction. Returns the effective window actually applied.
    pub fn set_window(&mut self, history_size: usize) -> usize {
        self.window = history_size.min(self.capacity);
        while self.history.len() > self.window {
            self.history.pop_front();
        }
        self.window
    }

    pub fn window(&self) -> usize {
        self.window
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cold_start_keeps_initial_floor() {
        let mut tracker = NoiseFloorTracker::new(0.01, 100);

        // Fewer than 10 observations: the estimate must not move, no
        // matter what energies are fed in.
        for rms in [0.9, 0.0, 0.5, 0.7, 0.1, 0.3, 0.2, 0.8, 0.6] {
            assert_eq!(tracker.observe(rms), 0.01);
        }
        assert_eq!(tracker.noise_floor(), 0.01);
    }

    #[test]
    fn test_percentile_pick_over_twenty_values() {
        let mut tracker = NoiseFloorTracker::new(0.0, 100);

        // 20 known values: sorted, index floor(20 * 0.2) = 4 holds 0.05.
        for i in 1..=20 {
            tracker.observe(i as f32 * 0.01);
        }
        let expected = 0.05 * 1.5;
        assert!((tracker.noise_floor() - expected).abs() < 1e-6);
    }

    #[test]
    fn test_floor_updates_at_tenth_observation() {
        let mut tracker = NoiseFloorTracker::new(0.5, 100);

        for _ in 0..9 {
            tracker.observe(0.1);
        }
        assert_eq!(tracker.noise_floor(), 0.5);

        // Tenth sample: sorted history is ten 0.1s, index 2 -> 0.1 * 1.5.
        let floor = tracker.observe(0.1);
        assert!((floor - 0.15).abs() < 1e-6);
    }

    #[test]
    fn test_window_eviction() {
        let mut tracker = NoiseFloorTracker::new(0.0, 10);

        // Fill the window with loud frames, then push quiet ones until the
        // loud history is fully evicted.
        for _ in 0..10 {
            tracker.observe(1.0);
        }
        for _ in 0..10 {
            tracker.observe(0.01);
        }
        // Window now holds only 0.01s: floor = 0.01 * 1.5.
        assert!((tracker.noise_floor() - 0.015).abs() < 1e-6);
    }

    #[test]
    fn test_set_window_clamps_to_capacity() {
        let mut tracker = NoiseFloorTracker::new(0.0, 50);
        assert_eq!(tracker.set_window(200), 50);
        assert_eq!(tracker.set_window(20), 20);
    }

    #[test]
    fn test_set_window_shrink_drops_oldest() {
        let mut tracker = NoiseFloorTracker::new(0.0, 100);
        for i in 0..30 {
            tracker.observe(i as f32);
        }
        tracker.set_window(10);
        // Only the 10 most recent energies (20..=29) remain. One more
        // observation evicts 20; sorted history is then
        // [21..=29, 29], index 2 -> 23 * 1.5.
        tracker.observe(29.0);
        assert!((tracker.noise_floor() - 34.5).abs() < 1e-4);
    }
}
