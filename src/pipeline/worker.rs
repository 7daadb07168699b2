//! Real-time frame assembly and per-frame processing.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crossbeam::channel::Sender;
use rtrb::{Consumer, Producer};
use tracing::debug;

use crate::gate::{GateParameters, NoiseGateNode};

/// Runs inside the capture callback: collects converted samples into
/// fixed-length frames, applies pending parameter snapshots at frame
/// boundaries, runs the gate, and chunk-writes the result into the output
/// ring.
///
/// Everything on this path is allocation-free and lock-free. Frames are
/// handled strictly in arrival order; the stop flag is observed at the
/// start of a frame, never mid-frame.
pub(crate) struct FrameWorker {
    frame: Vec<f32>,
    frame_len: usize,
    gate: NoiseGateNode,
    params_rx: Consumer<GateParameters>,
    out_tx: Producer<f32>,
    stop: Arc<AtomicBool>,
    /// One-shot readiness signal, fired on the first sample delivered.
    ready_tx: Option<Sender<()>>,
}

impl FrameWorker {
    pub(crate) fn new(
        gate: NoiseGateNode,
        frame_len: usize,
        params_rx: Consumer<GateParameters>,
        out_tx: Producer<f32>,
        stop: Arc<AtomicBool>,
        ready_tx: Sender<()>,
    ) -> Self {
        Self {
            frame: Vec::with_capacity(frame_len),
            frame_len,
            gate,
            params_rx,
            out_tx,
            stop,
            ready_tx: Some(ready_tx),
        }
    }

    /// Accept one channel-0 sample from the capture callback.
    pub(crate) fn on_sample(&mut self, sample: f32) {
        if let Some(tx) = self.ready_tx.take() {
            let _ = tx.try_send(());
        }

        self.frame.push(sample);
        if self.frame.len() < self.frame_len {
            return;
        }

        // Frame boundary. Cooperative stop: discard instead of processing.
        if self.stop.load(Ordering::Relaxed) {
            self.frame.clear();
            return;
        }

        // Apply the newest pending parameter snapshot before the frame,
        // never mid-computation.
        let mut latest = None;
        while let Ok(params) = self.params_rx.pop() {
            latest = Some(params);
        }
        if let Some(params) = latest {
            self.gate.set_parameters(params);
        }

        self.gate.process(&mut self.frame);

        match self.out_tx.write_chunk_uninit(self.frame_len) {
            Ok(chunk) => {
                let written = chunk.fill_from_iter(self.frame.iter().copied());
                debug_assert_eq!(written, self.frame_len);
            }
            Err(_) => debug!("Output ring full, dropping frame"),
        }
        self.frame.clear();
    }

    #[cfg(test)]
    pub(crate) fn gate(&self) -> &NoiseGateNode {
        &self.gate
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam::channel;
    use rtrb::RingBuffer;

    const SAMPLE_RATE: u32 = 48000;
    const FRAME_LEN: usize = 8;

    struct Harness {
        worker: FrameWorker,
        params_tx: Producer<GateParameters>,
        out_rx: Consumer<f32>,
        ready_rx: channel::Receiver<()>,
        stop: Arc<AtomicBool>,
    }

    fn harness() -> Harness {
        let (params_tx, params_rx) = RingBuffer::new(8);
        let (out_tx, out_rx) = RingBuffer::new(FRAME_LEN * 4);
        let (ready_tx, ready_rx) = channel::bounded(1);
        let stop = Arc::new(AtomicBool::new(false));
        let gate = NoiseGateNode::new(GateParameters::default(), SAMPLE_RATE);
        let worker = FrameWorker::new(
            gate,
            FRAME_LEN,
            params_rx,
            out_tx,
            stop.clone(),
            ready_tx,
        );
        Harness {
            worker,
            params_tx,
            out_rx,
            ready_rx,
            stop,
        }
    }

    #[test]
    fn test_full_frame_produces_processed_output() {
        let mut h = harness();
        for _ in 0..FRAME_LEN {
            h.worker.on_sample(0.5);
        }
        assert_eq!(h.out_rx.slots(), FRAME_LEN);
        // Gate between silence-start and open: every sample attenuated,
        // none amplified.
        while let Ok(s) = h.out_rx.pop() {
            assert!(s.abs() <= 0.5);
        }
    }

    #[test]
    fn test_partial_frame_emits_nothing() {
        let mut h = harness();
        for _ in 0..FRAME_LEN - 1 {
            h.worker.on_sample(0.5);
        }
        assert_eq!(h.out_rx.slots(), 0);
    }

    #[test]
    fn test_ready_fires_once_on_first_sample() {
        let mut h = harness();
        assert!(h.ready_rx.try_recv().is_err());
        h.worker.on_sample(0.0);
        assert!(h.ready_rx.try_recv().is_ok());
        h.worker.on_sample(0.0);
        assert!(h.ready_rx.try_recv().is_err());
    }

    #[test]
    fn test_stop_observed_at_frame_boundary() {
        let mut h = harness();
        h.stop.store(true, Ordering::Relaxed);
        for _ in 0..FRAME_LEN * 3 {
            h.worker.on_sample(0.5);
        }
        assert_eq!(h.out_rx.slots(), 0);
    }

    #[test]
    fn test_parameters_apply_at_next_frame_boundary_only() {
        let mut h = harness();
        let updated = GateParameters {
            gate_threshold: 0.07,
            ..Default::default()
        };

        // Update lands while a frame is in flight.
        for _ in 0..FRAME_LEN / 2 {
            h.worker.on_sample(0.1);
        }
        h.params_tx.push(updated).unwrap();
        for _ in 0..FRAME_LEN / 2 - 1 {
            h.worker.on_sample(0.1);
        }
        // Frame not yet complete: still the construction-time parameters.
        assert_eq!(h.worker.gate().parameters().gate_threshold, 0.02);

        // Completing the frame applies the snapshot before processing it.
        h.worker.on_sample(0.1);
        assert_eq!(h.worker.gate().parameters().gate_threshold, 0.07);
    }

    #[test]
    fn test_newest_pending_parameter_snapshot_wins() {
        let mut h = harness();
        h.params_tx
            .push(GateParameters {
                gate_threshold: 0.03,
                ..Default::default()
            })
            .unwrap();
        h.params_tx
            .push(GateParameters {
                gate_threshold: 0.09,
                ..Default::default()
            })
            .unwrap();
        for _ in 0..FRAME_LEN {
            h.worker.on_sample(0.1);
        }
        assert_eq!(h.worker.gate().parameters().gate_threshold, 0.09);
    }
}
