use crate::types::{Buttons, Vec3};
use crate::{HapticError, Result};

/// Status code the vendor SDK returns when a call did not take effect.
pub const FAILURE_SENTINEL: i32 = -1;

/// Minimum size of the buffer handed to the SDK's type query.
pub const DEVICE_TYPE_BUF_LEN: usize = 20;

/// Map an SDK status code onto `Result`, naming the call that failed.
pub fn check_status(status: i32, op: &'static str) -> Result<i32> {
    if status == FAILURE_SENTINEL {
        log::warn!("{} failed (status {})", op, status);
        Err(HapticError::driver(op))
    } else {
        Ok(status)
    }
}

/// Device driver contract for a single-device haptic SDK.
///
/// Every call blocks until the SDK returns. Implementations must not be
/// assumed safe to call on an unopened device; [`crate::DeviceSession`]
/// guards the calls that need an open handle.
pub trait HapticDriver {
    /// Number of attached devices.
    fn device_count(&self) -> i32;

    fn open(&mut self, id: i32) -> Result<()>;

    fn close(&mut self, id: i32) -> Result<()>;

    /// Start the SDK's real-time servo loop. Assumed infallible.
    fn start_servo(&mut self);

    /// Stop the servo loop. Assumed infallible.
    fn stop_servo(&mut self);

    /// Raw end-effector position in device axes (meters).
    fn position(&mut self, id: i32) -> Vec3;

    /// Submit a force with arguments in SDK order `(z, x, y)`.
    fn set_force(&mut self, id: i32, z: f64, x: f64, y: f64) -> Result<()>;

    /// Model string, e.g. `"PHANTOM Omni"`.
    fn device_type(&mut self, id: i32) -> Result<String>;

    fn buttons(&mut self, id: i32) -> Buttons;
}

impl<T: HapticDriver + ?Sized> HapticDriver for Box<T> {
    fn device_count(&self) -> i32 {
        (**self).device_count()
    }

    fn open(&mut self, id: i32) -> Result<()> {
        (**self).open(id)
    }

    fn close(&mut self, id: i32) -> Result<()> {
        (**self).close(id)
    }

    fn start_servo(&mut self) {
        (**self).start_servo()
    }

    fn stop_servo(&mut self) {
        (**self).stop_servo()
    }

    fn position(&mut self, id: i32) -> Vec3 {
        (**self).position(id)
    }

    fn set_force(&mut self, id: i32, z: f64, x: f64, y: f64) -> Result<()> {
        (**self).set_force(id, z, x, y)
    }

    fn device_type(&mut self, id: i32) -> Result<String> {
        (**self).device_type(id)
    }

    fn buttons(&mut self, id: i32) -> Buttons {
        (**self).buttons(id)
    }
}
