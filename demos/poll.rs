//! Open the haptic device and print mapped positions.
//!
//! Usage: cargo run --example poll [-- 2d|3d]
//! In 2d mode the system pointer follows the stylus.

use std::time::{Duration, Instant};

use haptic_bridge::{Calibration, DeviceSession, HapticDriver};

#[cfg(feature = "phantom")]
fn driver() -> Box<dyn HapticDriver> {
    Box::new(haptic_bridge::phantom::PhantomDriver::new())
}

#[cfg(not(feature = "phantom"))]
fn driver() -> Box<dyn HapticDriver> {
    Box::new(haptic_bridge::simulator::SimulatedDriver::new())
}

fn main() {
    env_logger::init();

    let mode = std::env::args().nth(1).unwrap_or_else(|| "3d".to_string());

    let mut session = DeviceSession::with_calibration(
        driver(),
        haptic_bridge::pointer::system_pointer(),
        Calibration::from_env(),
    );

    if !session.set_mode(&mode) {
        eprintln!("Unknown mode '{}' (expected 2d or 3d)", mode);
        std::process::exit(2);
    }

    if !session.open() {
        eprintln!("Failed to open device {}", session.device_id());
        std::process::exit(1);
    }

    println!("Type: {}  mode: {}", session.device_type(), mode);
    println!("Polling for 5s...");

    let start = Instant::now();
    let mut count: u64 = 0;
    while start.elapsed() < Duration::from_secs(5) {
        let pos = session.position();
        count += 1;

        // Print every ~100th sample to avoid flooding the terminal
        if count % 100 == 1 {
            println!("pos=[{}]", pos);
        }
        std::thread::sleep(Duration::from_millis(1));
    }

    let elapsed = start.elapsed().as_secs_f64();
    println!(
        "\nTotal: {} polls in {:.1}s ({:.1} Hz)",
        count,
        elapsed,
        count as f64 / elapsed
    );

    if !session.close() {
        eprintln!("Driver refused to close device {}", session.device_id());
    }
}
