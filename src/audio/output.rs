//! Synthetic output stream fed by the processing graph.

use rtrb::Consumer;
use tracing::debug;

use crate::audio::frame::AudioFrame;

/// The consumer end of the processed-audio ring: a programmatically
/// generated stream fed by gated samples rather than directly by the
/// hardware device. An external publishing client drains this as its
/// outgoing audio source.
///
/// Samples arrive in processing order; reads are lock-free and never block
/// the audio thread on the other end.
pub struct OutputStream {
    consumer: Consumer<f32>,
    frame_len: usize,
    sample_rate: u32,
}

impl OutputStream {
    pub(crate) fn new(consumer: Consumer<f32>, frame_len: usize, sample_rate: u32) -> Self {
        Self {
            consumer,
            frame_len,
            sample_rate,
        }
    }

    /// Copy up to `buf.len()` processed samples into `buf`, returning how
    /// many were written. Returns 0 when no samples are pending.
    pub fn read(&mut self, buf: &mut [f32]) -> usize {
        let available = self.consumer.slots().min(buf.len());
        if available == 0 {
            return 0;
        }

        match self.consumer.read_chunk(available) {
            Ok(chunk) => {
                let (first, second) = chunk.as_slices();
                buf[..first.len()].copy_from_slice(first);
                buf[first.len()..first.len() + second.len()].copy_from_slice(second);
                chunk.commit_all();
                available
            }
            Err(e) => {
                debug!("output ring read failed: {}", e);
                0
            }
        }
    }

    /// Pull exactly one frame's worth of samples, or `None` if a full
    /// frame is not yet available.
    pub fn pull_frame(&mut self) -> Option<AudioFrame> {
        if self.consumer.slots() < self.frame_len {
            return None;
        }
        let mut samples = vec![0.0f32; self.frame_len];
        let n = self.read(&mut samples);
        debug_assert_eq!(n, self.frame_len);
        AudioFrame::new(samples, self.sample_rate).ok()
    }

    /// Number of processed samples currently buffered.
    pub fn pending_samples(&self) -> usize {
        self.consumer.slots()
    }

    pub fn frame_len(&self) -> usize {
        self.frame_len
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }
}
