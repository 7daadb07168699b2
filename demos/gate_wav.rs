//! Offline demo: run a wav file through the noise gate.
//!
//! Usage: gate_wav <input.wav> <output.wav> [params.json]
//!
//! Reads channel 0 of the input, processes it frame by frame with the
//! same node the live pipeline uses, and writes a 16-bit mono wav.

use anyhow::{Context, Result};
use mic_gate::{DEFAULT_FRAME_LEN, GateParameters, NoiseGateNode};
use tracing::info;

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let mut args = std::env::args().skip(1);
    let input = args.next().context("usage: gate_wav <input.wav> <output.wav> [params.json]")?;
    let output = args.next().context("missing output path")?;
    let params = match args.next() {
        Some(path) => {
            let text = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read {}", path))?;
            serde_json::from_str(&text).context("Failed to parse gate parameters")?
        }
        None => GateParameters::default(),
    };

    let mut reader = hound::WavReader::open(&input)
        .with_context(|| format!("Failed to open {}", input))?;
    let spec = reader.spec();
    info!(
        "Input: {} Hz, {} channel(s), {:?} {} bit",
        spec.sample_rate, spec.channels, spec.sample_format, spec.bits_per_sample
    );

    // Channel 0 only, normalized to f32.
    let channels = spec.channels as usize;
    let samples: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Float => reader
            .samples::<f32>()
            .step_by(channels)
            .collect::<Result<_, _>>()?,
        hound::SampleFormat::Int => {
            let scale = (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .samples::<i32>()
                .step_by(channels)
                .map(|s| s.map(|s| s as f32 / scale))
                .collect::<Result<_, _>>()?
        }
    };

    let mut gate = NoiseGateNode::new(params, spec.sample_rate);
    let mut gated = samples;
    for frame in gated.chunks_mut(DEFAULT_FRAME_LEN) {
        gate.process(frame);
    }

    let out_spec = hound::WavSpec {
        channels: 1,
        sample_rate: spec.sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(&output, out_spec)
        .with_context(|| format!("Failed to create {}", output))?;
    for &s in &gated {
        writer.write_sample((s.clamp(-1.0, 1.0) * 32767.0) as i16)?;
    }
    writer.finalize()?;

    info!("Wrote gated audio to {}", output);
    Ok(())
}
