//! Lists capture devices and their configs, to find a `device_id` for
//! `CaptureConstraints`.

use cpal::traits::{DeviceTrait, HostTrait};

fn main() {
    let host = cpal::default_host();

    if let Some(device) = host.default_input_device() {
        println!(
            "Default input device: {}",
            device.name().unwrap_or_default()
        );
        if let Ok(config) = device.default_input_config() {
            println!("Default config: {:#?}", config);
        }
    }

    match host.input_devices() {
        Ok(devices) => {
            println!("\nAll input devices:");
            for device in devices {
                println!("  {}", device.name().unwrap_or_default());
                if let Ok(configs) = device.supported_input_configs() {
                    for config in configs {
                        println!("    {:?}", config);
                    }
                }
            }
        }
        Err(e) => eprintln!("Failed to enumerate input devices: {}", e),
    }
}
