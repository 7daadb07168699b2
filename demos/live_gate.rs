//! Live demo: capture the default microphone through the gate and print a
//! level meter of the gated output for a few seconds.

use std::time::{Duration, Instant};

use anyhow::Result;
use mic_gate::{AudioPipelineManager, CaptureConstraints, GateParameters, gate::frame_rms};

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let manager =
        AudioPipelineManager::new(CaptureConstraints::default(), GateParameters::default());
    let mut handle = manager.start()?;

    let start = Instant::now();
    let mut buf = vec![0.0f32; 1024];
    while start.elapsed() < Duration::from_secs(10) {
        let Some(output) = handle.output() else { break };
        let n = output.read(&mut buf);
        if n == 0 {
            std::thread::sleep(Duration::from_millis(5));
            continue;
        }
        let rms = frame_rms(&buf[..n]);
        let bars = (rms * 200.0).min(60.0) as usize;
        println!("{:>8.5} |{}", rms, "#".repeat(bars));
    }

    handle.close();
    Ok(())
}
