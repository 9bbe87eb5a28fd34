//! In-process stand-in for a haptic device.
//!
//! Lets a host (or a test) drive a [`crate::DeviceSession`] without hardware.
//! The driver and any [`SimulatedDriver::handle`] clones share one device
//! state, so the state stays observable after the driver moves into a session.

use crate::driver::HapticDriver;
use crate::types::{Buttons, Vec3};
use crate::{HapticError, Result};
use std::sync::{Arc, Mutex, MutexGuard};

pub const DEFAULT_DEVICE_TYPE: &str = "Virtual PHANTOM";

bitflags::bitflags! {
    /// Driver calls forced to return the failure sentinel.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct FailPoints: u32 {
        const OPEN      = 1 << 0;
        const CLOSE     = 1 << 1;
        const SET_FORCE = 1 << 2;
        const GET_TYPE  = 1 << 3;
    }
}

/// Per-operation call counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CallCounts {
    pub open: u32,
    pub close: u32,
    pub start_servo: u32,
    pub stop_servo: u32,
    pub position: u32,
    pub set_force: u32,
    pub device_type: u32,
    pub buttons: u32,
}

/// Observable state of the simulated device.
#[derive(Debug, Clone)]
pub struct SimState {
    pub device_count: i32,
    pub device_type: String,
    pub position: Vec3,
    pub buttons: Buttons,
    pub fail: FailPoints,
    /// Id of the currently opened device.
    pub opened: Option<i32>,
    pub servo_running: bool,
    /// Last accepted force, in SDK argument order `(z, x, y)`.
    pub last_force: Option<[f64; 3]>,
    pub calls: CallCounts,
}

impl Default for SimState {
    fn default() -> Self {
        Self {
            device_count: 1,
            device_type: DEFAULT_DEVICE_TYPE.to_string(),
            position: Vec3::default(),
            buttons: Buttons::empty(),
            fail: FailPoints::empty(),
            opened: None,
            servo_running: false,
            last_force: None,
            calls: CallCounts::default(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SimulatedDriver {
    state: Arc<Mutex<SimState>>,
}

impl SimulatedDriver {
    /// One attached device, at the origin, no buttons held.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_device_count(count: i32) -> Self {
        let driver = Self::new();
        driver.state().device_count = count;
        driver
    }

    /// Another handle onto the same simulated device.
    pub fn handle(&self) -> SimulatedDriver {
        self.clone()
    }

    /// Lock the shared state for inspection or scripting.
    pub fn state(&self) -> MutexGuard<'_, SimState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn set_position(&self, position: Vec3) {
        self.state().position = position;
    }

    pub fn set_buttons(&self, buttons: Buttons) {
        self.state().buttons = buttons;
    }

    /// Set the buttons from a raw driver word, decoded like the SDK's.
    pub fn set_raw_buttons(&self, raw: i32) {
        self.state().buttons = Buttons::from_raw(raw);
    }

    pub fn set_failing(&self, fail: FailPoints) {
        self.state().fail = fail;
    }

    pub fn calls(&self) -> CallCounts {
        self.state().calls
    }

    fn known(state: &SimState, id: i32) -> bool {
        (0..state.device_count).contains(&id)
    }
}

impl HapticDriver for SimulatedDriver {
    fn device_count(&self) -> i32 {
        self.state().device_count
    }

    fn open(&mut self, id: i32) -> Result<()> {
        let mut s = self.state();
        s.calls.open += 1;
        if s.fail.contains(FailPoints::OPEN) || !Self::known(&s, id) {
            return Err(HapticError::driver("open"));
        }
        s.opened = Some(id);
        Ok(())
    }

    fn close(&mut self, id: i32) -> Result<()> {
        let mut s = self.state();
        s.calls.close += 1;
        if s.fail.contains(FailPoints::CLOSE) || s.opened != Some(id) {
            return Err(HapticError::driver("close"));
        }
        s.opened = None;
        Ok(())
    }

    fn start_servo(&mut self) {
        let mut s = self.state();
        s.calls.start_servo += 1;
        s.servo_running = true;
    }

    fn stop_servo(&mut self) {
        let mut s = self.state();
        s.calls.stop_servo += 1;
        s.servo_running = false;
    }

    fn position(&mut self, _id: i32) -> Vec3 {
        let mut s = self.state();
        s.calls.position += 1;
        s.position
    }

    fn set_force(&mut self, id: i32, z: f64, x: f64, y: f64) -> Result<()> {
        let mut s = self.state();
        s.calls.set_force += 1;
        if s.fail.contains(FailPoints::SET_FORCE) || s.opened != Some(id) {
            return Err(HapticError::driver("set_force"));
        }
        s.last_force = Some([z, x, y]);
        Ok(())
    }

    fn device_type(&mut self, id: i32) -> Result<String> {
        let mut s = self.state();
        s.calls.device_type += 1;
        if s.fail.contains(FailPoints::GET_TYPE) || !Self::known(&s, id) {
            return Err(HapticError::driver("get_type"));
        }
        Ok(s.device_type.clone())
    }

    fn buttons(&mut self, _id: i32) -> Buttons {
        let mut s = self.state();
        s.calls.buttons += 1;
        s.buttons
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handles_share_state() {
        let mut driver = SimulatedDriver::new();
        let probe = driver.handle();

        driver.open(0).unwrap();
        assert_eq!(probe.state().opened, Some(0));
        assert_eq!(probe.calls().open, 1);
    }

    #[test]
    fn test_open_unknown_id_fails() {
        let mut driver = SimulatedDriver::with_device_count(0);
        assert!(driver.open(-1).is_err());
        assert!(driver.open(0).is_err());
    }

    #[test]
    fn test_fail_points() {
        let mut driver = SimulatedDriver::new();
        driver.set_failing(FailPoints::OPEN | FailPoints::GET_TYPE);
        assert!(driver.open(0).is_err());
        assert!(driver.device_type(0).is_err());

        driver.set_failing(FailPoints::empty());
        driver.open(0).unwrap();
        assert_eq!(driver.device_type(0).unwrap(), DEFAULT_DEVICE_TYPE);
    }

    #[test]
    fn test_force_requires_open_device() {
        let mut driver = SimulatedDriver::new();
        assert!(driver.set_force(0, 1.0, 2.0, 3.0).is_err());
        driver.open(0).unwrap();
        driver.set_force(0, 1.0, 2.0, 3.0).unwrap();
        assert_eq!(driver.state().last_force, Some([1.0, 2.0, 3.0]));
    }
}
