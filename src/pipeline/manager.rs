//! Pipeline construction, lifecycle, and teardown.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use anyhow::anyhow;
use cpal::Stream;
use cpal::traits::{DeviceTrait, StreamTrait};
use crossbeam::channel;
use rtrb::{Producer, RingBuffer};
use tracing::{debug, info, warn};

use crate::audio::capture::{build_capture_stream, resolve_input_device};
use crate::audio::{CaptureConstraints, OutputStream};
use crate::error::PipelineError;
use crate::gate::{GateParameters, NoiseGateNode};
use crate::pipeline::worker::FrameWorker;

/// Frame length of the processing graph, in samples (the render-quantum
/// size of the reference behavior).
pub const DEFAULT_FRAME_LEN: usize = 128;

/// Output ring capacity, in frames. Roughly 85 ms at the default frame
/// length and 48 kHz; a publisher that falls further behind loses the
/// oldest audio rather than stalling the capture callback.
const DEFAULT_RING_FRAMES: usize = 32;

/// Readiness handshake deadline (reference behavior: 5 s, fail closed).
const DEFAULT_READY_TIMEOUT: Duration = Duration::from_secs(5);

/// Pending parameter snapshots between two frame boundaries. Drained
/// every frame, so the queue only fills if updates outpace frames.
const PARAM_RING_CAPACITY: usize = 8;

/// Lifecycle of one pipeline. `Closed` is terminal; any state may move
/// directly to `Closing` on error or explicit stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Uninitialized,
    Acquiring,
    Ready,
    Running,
    Closing,
    Closed,
}

/// Acquires a capture stream, wires it through a [`NoiseGateNode`] into a
/// synthetic output stream, and hands the whole graph to the caller as a
/// single [`PipelineHandle`].
///
/// Construction either returns a fully live handle or one of the
/// [`PipelineError`] kinds; it never returns a partially-initialized
/// pipeline, and every construction failure releases whatever was already
/// acquired.
pub struct AudioPipelineManager {
    constraints: CaptureConstraints,
    params: GateParameters,
    frame_len: usize,
    ring_frames: usize,
    ready_timeout: Duration,
}

impl AudioPipelineManager {
    pub fn new(constraints: CaptureConstraints, params: GateParameters) -> Self {
        Self {
            constraints,
            params,
            frame_len: DEFAULT_FRAME_LEN,
            ring_frames: DEFAULT_RING_FRAMES,
            ready_timeout: DEFAULT_READY_TIMEOUT,
        }
    }

    /// Override the processing frame length (samples per frame).
    pub fn with_frame_len(mut self, frame_len: usize) -> Self {
        self.frame_len = frame_len;
        self
    }

    /// Override the readiness-handshake deadline.
    pub fn with_ready_timeout(mut self, timeout: Duration) -> Self {
        self.ready_timeout = timeout;
        self
    }

    /// Acquire the capture stream, build the graph, start frames flowing,
    /// and return the live handle.
    pub fn start(self) -> Result<PipelineHandle, PipelineError> {
        if self.frame_len == 0 {
            return Err(PipelineError::PreconditionViolation(
                "frame length must be nonzero".into(),
            ));
        }
        if self.constraints.channel_count == 0 {
            return Err(PipelineError::PreconditionViolation(
                "channel count must be nonzero".into(),
            ));
        }

        debug!(state = ?PipelineState::Acquiring, "Acquiring capture device");
        let device = resolve_input_device(self.constraints.device_id.as_deref())
            .map_err(PipelineError::CaptureUnavailable)?;
        info!(
            "Using capture device: {}",
            device.name().unwrap_or_else(|_| "Unknown".to_string())
        );

        let (params_tx, params_rx) = RingBuffer::new(PARAM_RING_CAPACITY);
        let (out_tx, out_rx) = RingBuffer::new(self.frame_len * self.ring_frames);
        let (ready_tx, ready_rx) = channel::bounded::<()>(1);
        let stop = Arc::new(AtomicBool::new(false));

        let gate = NoiseGateNode::new(self.params, self.constraints.sample_rate);
        let mut worker = FrameWorker::new(
            gate,
            self.frame_len,
            params_rx,
            out_tx,
            stop.clone(),
            ready_tx,
        );

        let stream =
            build_capture_stream(&device, &self.constraints, move |s| worker.on_sample(s))
                .map_err(PipelineError::GraphConstructionFailed)?;
        debug!(state = ?PipelineState::Ready, "Processing graph constructed");

        if let Err(e) = stream.play() {
            release_partial(stream, &stop);
            return Err(PipelineError::GraphConstructionFailed(
                anyhow!(e).context("Failed to start capture stream"),
            ));
        }

        // Readiness handshake: the graph is not declared live until the
        // node has confirmed it is receiving frames, bounded by the
        // timeout. Timing out fails closed and releases everything.
        if ready_rx.recv_timeout(self.ready_timeout).is_err() {
            warn!(
                "No frames reached the processing node within {:?}",
                self.ready_timeout
            );
            release_partial(stream, &stop);
            return Err(PipelineError::InitializationTimeout(self.ready_timeout));
        }

        info!(state = ?PipelineState::Running, "Audio pipeline running");
        Ok(PipelineHandle {
            stream: Some(stream),
            output: Some(OutputStream::new(
                out_rx,
                self.frame_len,
                self.constraints.sample_rate,
            )),
            params_tx,
            stop,
            state: PipelineState::Running,
        })
    }
}

/// Best-effort release of a partially constructed graph.
fn release_partial(stream: Stream, stop: &AtomicBool) {
    stop.store(true, Ordering::Relaxed);
    if let Err(e) = stream.pause() {
        warn!("Failed to pause capture stream during teardown: {}", e);
    }
    drop(stream);
    debug!("Partially acquired audio resources released");
}

/// Owns the capture stream, the processing graph, and the synthetic output
/// stream as one unit with one lifecycle.
///
/// Dropping the handle closes the pipeline. The handle is not `Send`: the
/// underlying capture stream is tied to the thread that created it on
/// some backends.
pub struct PipelineHandle {
    stream: Option<Stream>,
    output: Option<OutputStream>,
    params_tx: Producer<GateParameters>,
    stop: Arc<AtomicBool>,
    state: PipelineState,
}

impl PipelineHandle {
    pub fn state(&self) -> PipelineState {
        self.state
    }

    /// The synthetic output stream, for the external publisher to drain.
    /// `None` once the pipeline is closed.
    pub fn output(&mut self) -> Option<&mut OutputStream> {
        self.output.as_mut()
    }

    /// Hand a new parameter snapshot to the audio thread. Takes effect at
    /// the next frame boundary, never mid-frame. The handoff is a
    /// single-producer single-consumer ring, so the real-time side never
    /// contends on a lock.
    pub fn update_parameters(&mut self, params: GateParameters) {
        if self.state != PipelineState::Running {
            warn!(state = ?self.state, "Parameter update ignored: pipeline is not running");
            return;
        }
        if self.params_tx.push(params).is_err() {
            warn!("Parameter queue full, update dropped");
        }
    }

    /// Stop the pipeline and release every acquired resource.
    ///
    /// Teardown is best-effort and total: each release is attempted even
    /// if an earlier one fails, and failures are logged, never returned.
    /// Safe to call repeatedly; after the first close this is a no-op.
    pub fn close(&mut self) {
        if self.state == PipelineState::Closed {
            return;
        }
        self.state = PipelineState::Closing;

        // Stop moving frames through the graph; the callback observes the
        // flag at the next frame boundary.
        self.stop.store(true, Ordering::Relaxed);

        // Stop the capture stream, then release the audio context it
        // holds by dropping it.
        if let Some(stream) = self.stream.take() {
            if let Err(e) = stream.pause() {
                warn!("Failed to pause capture stream during close: {}", e);
            }
            drop(stream);
        }

        // Stop the synthetic output stream.
        self.output = None;

        self.state = PipelineState::Closed;
        info!("Audio pipeline closed");
    }
}

impl Drop for PipelineHandle {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Handle wired to live rings but no device stream, for lifecycle
    /// tests that must run without audio hardware.
    fn detached_handle() -> PipelineHandle {
        let (params_tx, _params_rx) = RingBuffer::new(PARAM_RING_CAPACITY);
        let (_out_tx, out_rx) = RingBuffer::new(DEFAULT_FRAME_LEN);
        PipelineHandle {
            stream: None,
            output: Some(OutputStream::new(out_rx, DEFAULT_FRAME_LEN, 48000)),
            params_tx,
            stop: Arc::new(AtomicBool::new(false)),
            state: PipelineState::Running,
        }
    }

    #[test]
    fn test_close_is_idempotent() {
        let mut handle = detached_handle();
        assert_eq!(handle.state(), PipelineState::Running);

        handle.close();
        assert_eq!(handle.state(), PipelineState::Closed);
        assert!(handle.output().is_none());
        assert!(handle.stop.load(Ordering::Relaxed));

        // Second close: same resource state, no error, no panic.
        handle.close();
        assert_eq!(handle.state(), PipelineState::Closed);
        assert!(handle.output().is_none());
    }

    #[test]
    fn test_parameter_update_after_close_is_ignored() {
        let mut handle = detached_handle();
        handle.close();
        handle.update_parameters(GateParameters::default());
        assert_eq!(handle.state(), PipelineState::Closed);
    }

    #[test]
    fn test_zero_frame_len_rejected_before_acquisition() {
        let manager = AudioPipelineManager::new(
            CaptureConstraints::default(),
            GateParameters::default(),
        )
        .with_frame_len(0);
        match manager.start() {
            Err(PipelineError::PreconditionViolation(_)) => {}
            other => panic!("expected PreconditionViolation, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_zero_channel_count_rejected() {
        let constraints = CaptureConstraints {
            channel_count: 0,
            ..Default::default()
        };
        let manager = AudioPipelineManager::new(constraints, GateParameters::default());
        assert!(matches!(
            manager.start(),
            Err(PipelineError::PreconditionViolation(_))
        ));
    }
}
