//! Capture-device resolution and input-stream construction using cpal.

use anyhow::{Context, Result};
use cpal::traits::{DeviceTrait, HostTrait};
use cpal::{BufferSize, Device, SampleFormat, SampleRate, Stream, StreamConfig};
use dasp_sample::{Sample as DaspSample, ToSample};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

/// Constraints for acquiring the capture stream.
///
/// `echo_cancellation` and `auto_gain_control` toggle the capture device's
/// native processing where the backend supports it; they are requested,
/// not reimplemented. Native noise suppression is always forced off at
/// this boundary because the gate replaces it, so it is not representable
/// here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConstraints {
    /// Capture device name; `None` selects the default input device.
    pub device_id: Option<String>,
    pub sample_rate: u32,
    pub channel_count: u16,
    pub echo_cancellation: bool,
    pub auto_gain_control: bool,
}

impl Default for CaptureConstraints {
    fn default() -> Self {
        Self {
            device_id: None,
            sample_rate: 48000,
            channel_count: 1,
            echo_cancellation: true,
            auto_gain_control: true,
        }
    }
}

fn find_device_by_name<I: Iterator<Item = Device>>(devices: I, name: &str) -> Option<Device> {
    devices
        .filter_map(|d| d.name().ok().map(|n| (d, n)))
        .find(|(_, n)| n == name)
        .map(|(d, _)| d)
}

/// Resolve the capture device the constraints ask for.
pub(crate) fn resolve_input_device(device_id: Option<&str>) -> Result<Device> {
    let host = cpal::default_host();
    match device_id {
        Some(name) => {
            let devices = host
                .input_devices()
                .context("Failed to enumerate input devices")?;
            find_device_by_name(devices, name)
                .with_context(|| format!("Input device {:?} not found", name))
        }
        None => host
            .default_input_device()
            .context("No default input device available"),
    }
}

/// Build (but do not start) a capture stream matching the constraints.
///
/// `on_sample` receives channel-0 samples converted to `f32`, one at a
/// time, on the audio thread. Interleaved extra channels are discarded.
pub(crate) fn build_capture_stream(
    device: &Device,
    constraints: &CaptureConstraints,
    on_sample: impl FnMut(f32) + Send + 'static,
) -> Result<Stream> {
    let supported = device
        .default_input_config()
        .context("Failed to get default input config")?;

    let config = StreamConfig {
        channels: constraints.channel_count,
        sample_rate: SampleRate(constraints.sample_rate),
        buffer_size: BufferSize::Default,
    };

    info!(
        echo_cancellation = constraints.echo_cancellation,
        auto_gain_control = constraints.auto_gain_control,
        noise_suppression = false,
        "Capture options requested (noise suppression forced off, the gate replaces it)"
    );

    let channels = config.channels as usize;
    match supported.sample_format() {
        SampleFormat::I16 => build_typed_stream::<i16>(device, &config, channels, on_sample),
        SampleFormat::U16 => build_typed_stream::<u16>(device, &config, channels, on_sample),
        SampleFormat::F32 => build_typed_stream::<f32>(device, &config, channels, on_sample),
        format => anyhow::bail!("Unsupported sample format: {:?}", format),
    }
}

fn build_typed_stream<T>(
    device: &Device,
    config: &StreamConfig,
    channels: usize,
    mut on_sample: impl FnMut(f32) + Send + 'static,
) -> Result<Stream>
where
    T: cpal::SizedSample + DaspSample + ToSample<f32>,
{
    let stream = device
        .build_input_stream(
            config,
            move |data: &[T], _: &cpal::InputCallbackInfo| {
                for &sample in data.iter().step_by(channels) {
                    on_sample(sample.to_sample());
                }
            },
            |err| error!("An error occurred on the capture stream: {}", err),
            None,
        )
        .context("Failed to build input stream")?;

    Ok(stream)
}
