//! Print device and calibration info for the haptic device.
//!
//! Uses the hdPhantom SDK when built with `--features phantom`, otherwise
//! the simulated device.

use haptic_bridge::pointer::NullPointer;
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

    let mut session = DeviceSession::with_calibration(driver(), NullPointer, Calibration::from_env());

    if session.device_count() < 1 {
        eprintln!("Error: no haptic device attached");
        std::process::exit(1);
    }

    println!("Devices:    {}", session.device_count());
    println!("Device id:  {}", session.device_id());
    println!("Type:       {}", session.device_type());
    println!("Max force:  {} N", session.max_force());
    println!("Workspace:  {} m", session.workspace_size());
    println!("Pixel:      {} m/px", session.pixel_width());
}
