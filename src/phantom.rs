//! Binding to the vendor `hdPhantom` SDK.
//!
//! Only built with the `phantom` feature. The import library (`hdPhantom.lib`
//! on Windows) must be on the linker search path.

use crate::codec;
use crate::driver::{check_status, HapticDriver, DEVICE_TYPE_BUF_LEN};
use crate::types::{Buttons, Vec3};
use crate::Result;
use std::ffi::{c_char, c_double, c_int};

#[link(name = "hdPhantom")]
extern "C" {
    fn hdPhantomGetNumDevices() -> c_int;
    fn hdPhantomOpen(id: c_int) -> c_int;
    fn hdPhantomClose(id: c_int) -> c_int;
    fn hdPhantomStartServo();
    fn hdPhantomStopServo();
    fn hdPhantomGetPosition(id: c_int, x: *mut c_double, y: *mut c_double, z: *mut c_double);
    fn hdPhantomSetForce(
        id: c_int,
        z: *mut c_double,
        x: *mut c_double,
        y: *mut c_double,
    ) -> c_int;
    fn hdPhantomGetType(id: c_int, buf: *mut c_char) -> c_int;
    fn hdPhantomGetButtons(id: c_int) -> c_int;
}

/// [`HapticDriver`] backed by the installed hdPhantom runtime.
#[derive(Debug, Default)]
pub struct PhantomDriver {
    _private: (),
}

impl PhantomDriver {
    pub fn new() -> Self {
        Self::default()
    }
}

impl HapticDriver for PhantomDriver {
    fn device_count(&self) -> i32 {
        unsafe { hdPhantomGetNumDevices() }
    }

    fn open(&mut self, id: i32) -> Result<()> {
        check_status(unsafe { hdPhantomOpen(id) }, "hdPhantomOpen").map(|_| ())
    }

    fn close(&mut self, id: i32) -> Result<()> {
        check_status(unsafe { hdPhantomClose(id) }, "hdPhantomClose").map(|_| ())
    }

    fn start_servo(&mut self) {
        unsafe { hdPhantomStartServo() }
    }

    fn stop_servo(&mut self) {
        unsafe { hdPhantomStopServo() }
    }

    fn position(&mut self, id: i32) -> Vec3 {
        let mut p = Vec3::default();
        unsafe { hdPhantomGetPosition(id, &mut p.x, &mut p.y, &mut p.z) };
        p
    }

    fn set_force(&mut self, id: i32, z: f64, x: f64, y: f64) -> Result<()> {
        let (mut z, mut x, mut y) = (z, x, y);
        let status = unsafe { hdPhantomSetForce(id, &mut z, &mut x, &mut y) };
        check_status(status, "hdPhantomSetForce").map(|_| ())
    }

    fn device_type(&mut self, id: i32) -> Result<String> {
        // One spare byte keeps the buffer terminated even if the SDK fills it.
        let mut buf = [0 as c_char; DEVICE_TYPE_BUF_LEN + 1];
        check_status(
            unsafe { hdPhantomGetType(id, buf.as_mut_ptr()) },
            "hdPhantomGetType",
        )?;
        let bytes: Vec<u8> = buf.iter().map(|&c| c as u8).collect();
        Ok(codec::extract_string(&bytes))
    }

    fn buttons(&mut self, id: i32) -> Buttons {
        Buttons::from_raw(unsafe { hdPhantomGetButtons(id) })
    }
}
