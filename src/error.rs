//! Pipeline error types.

use std::time::Duration;
use thiserror::Error;

/// Errors surfaced by pipeline construction and boundary checks.
///
/// Per-frame gate processing has no error path: it is a total function over
/// well-formed frames. Teardown failures are logged and swallowed, never
/// returned through this type.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// No capture device matched the constraints, or the device could not
    /// be opened (missing hardware, denied permission, dead backend).
    #[error("capture device unavailable: {0}")]
    CaptureUnavailable(#[source] anyhow::Error),

    /// The processing graph could not be built or started: the input
    /// stream failed to construct, or refused to play.
    #[error("audio graph construction failed: {0}")]
    GraphConstructionFailed(#[source] anyhow::Error),

    /// The readiness handshake did not complete in time. The capture
    /// stream was started but no frame reached the processing node before
    /// the deadline.
    #[error("pipeline initialization timed out after {0:?}")]
    InitializationTimeout(Duration),

    /// A caller bug: malformed configuration or frame geometry that the
    /// pipeline contract forbids. Not retried.
    #[error("precondition violated: {0}")]
    PreconditionViolation(String),
}
