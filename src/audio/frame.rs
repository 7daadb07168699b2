//! Owned audio frame for the offline path and tests.

use anyhow::Result;

/// A fixed-length block of consecutive mono `f32` samples.
///
/// The real-time path works in place on `&mut [f32]` and never constructs
/// one of these; `AudioFrame` exists for offline processing (file demos,
/// tests) and for frames pulled out of the synthetic output stream.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioFrame {
    samples: Vec<f32>,
    sample_rate: u32,
}

impl AudioFrame {
    /// Create a frame from raw mono samples.
    ///
    /// Returns an error for an empty sample block; zero-length frames are
    /// excluded by construction everywhere in the pipeline.
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Result<Self> {
        if samples.is_empty() {
            anyhow::bail!("audio frame must contain at least one sample");
        }
        Ok(Self {
            samples,
            sample_rate,
        })
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn samples_mut(&mut self) -> &mut [f32] {
        &mut self.samples
    }

    /// Consumes the frame and returns the raw samples.
    pub fn into_samples(self) -> Vec<f32> {
        self.samples
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_creation() {
        let frame = AudioFrame::new(vec![0.1, -0.1, 0.2], 48000).unwrap();
        assert_eq!(frame.len(), 3);
        assert_eq!(frame.sample_rate(), 48000);
        assert_eq!(frame.samples(), &[0.1, -0.1, 0.2]);
    }

    #[test]
    fn test_empty_frame_rejected() {
        assert!(AudioFrame::new(Vec::new(), 48000).is_err());
    }

    #[test]
    fn test_in_place_mutation() {
        let mut frame = AudioFrame::new(vec![1.0; 4], 48000).unwrap();
        for s in frame.samples_mut() {
            *s *= 0.5;
        }
        assert_eq!(frame.into_samples(), vec![0.5; 4]);
    }
}
