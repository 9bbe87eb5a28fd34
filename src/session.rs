use crate::codec;
use crate::driver::HapticDriver;
use crate::pointer::PointerSink;
use crate::types::{Button, ForceVector, MappingMode, Vec3, INITIALIZED, NOT_INITIALIZED};
use crate::workspace::{Calibration, WorkspaceMapper};
use crate::{HapticError, Result};

/// Connection to the last enumerated haptic device.
///
/// Host-facing operations never fail loudly. A driver failure, a closed
/// session or bad input comes back as `false` or [`NOT_INITIALIZED`], which
/// the host reads as "did not take effect". Dropping an open session closes
/// the device.
pub struct DeviceSession<D: HapticDriver, P: PointerSink> {
    driver: D,
    pointer: P,
    mapper: WorkspaceMapper,
    device_id: i32,
    is_open: bool,
    raw_position: Vec3,
}

impl<D: HapticDriver, P: PointerSink> DeviceSession<D, P> {
    /// Create a closed session with the default calibration.
    pub fn new(driver: D, pointer: P) -> Self {
        Self::with_calibration(driver, pointer, Calibration::default())
    }

    /// Create a closed session bound to device `count - 1`.
    pub fn with_calibration(driver: D, pointer: P, calibration: Calibration) -> Self {
        let device_id = driver.device_count() - 1;
        log::debug!("Session bound to device id {}", device_id);

        Self {
            driver,
            pointer,
            mapper: WorkspaceMapper::new(calibration),
            device_id,
            is_open: false,
            raw_position: Vec3::default(),
        }
    }

    pub fn device_id(&self) -> i32 {
        self.device_id
    }

    /// Number of devices the driver currently reports.
    pub fn device_count(&self) -> i32 {
        self.driver.device_count()
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    /// `"Initialized"` while open, `"Not initialized"` otherwise.
    pub fn status_message(&self) -> &'static str {
        if self.is_open {
            INITIALIZED
        } else {
            NOT_INITIALIZED
        }
    }

    /// Open the device and start its servo loop. Returns the open state.
    ///
    /// Calling this on an open session does not touch the driver.
    pub fn open(&mut self) -> bool {
        if self.is_open {
            return true;
        }

        match self.driver.open(self.device_id) {
            Ok(()) => {
                self.driver.start_servo();
                self.is_open = true;
                log::info!("Connection opened (device {})", self.device_id);
            }
            Err(e) => {
                log::warn!("Failed to open device {}: {}", self.device_id, e);
            }
        }

        self.is_open
    }

    /// Close the device and stop its servo loop.
    ///
    /// Returns `true` only when this call closed the device. A closed session
    /// is left alone and the driver is not called.
    pub fn close(&mut self) -> bool {
        if !self.is_open {
            return false;
        }

        match self.driver.close(self.device_id) {
            Ok(()) => {
                self.driver.stop_servo();
                self.is_open = false;
                log::info!("Connection closed (device {})", self.device_id);
                true
            }
            Err(e) => {
                log::warn!("Failed to close device {}: {}", self.device_id, e);
                false
            }
        }
    }

    /// Submit a force encoded as `"x,y,z"`. Returns whether the driver accepted it.
    pub fn send_force(&mut self, encoded: &str) -> bool {
        let result = encoded
            .parse::<ForceVector>()
            .and_then(|force| self.send_force_vector(force));

        match result {
            Ok(()) => true,
            Err(e) => {
                log::warn!("Force {:?} not applied: {}", encoded, e);
                false
            }
        }
    }

    /// Submit a force in world axes. The driver receives `(z, x, -y)`.
    pub fn send_force_vector(&mut self, force: ForceVector) -> Result<()> {
        if !self.is_open {
            return Err(HapticError::NotInitialized);
        }
        let [z, x, y] = force.to_driver_order();
        log::trace!("set_force z={} x={} y={}", z, x, y);
        self.driver.set_force(self.device_id, z, x, y)
    }

    /// Poll the device and map the reading for the current mode.
    ///
    /// In 2D mode this also drives the pointer.
    pub fn poll(&mut self) -> Result<Vec3> {
        if !self.is_open {
            return Err(HapticError::NotInitialized);
        }

        self.raw_position = self.driver.position(self.device_id);
        let buttons = self.driver.buttons(self.device_id);
        log::trace!(
            "poll raw={} buttons={:?}",
            codec::array_to_string(&self.raw_position),
            buttons
        );

        Ok(self.mapper.map(self.raw_position, buttons, &mut self.pointer))
    }

    /// Encoded position for the current mode, or `"Not initialized"` when closed.
    pub fn position(&mut self) -> String {
        match self.poll() {
            Ok(mapped) => codec::array_to_string(&mapped),
            Err(_) => NOT_INITIALIZED.to_string(),
        }
    }

    /// Raw reading from the most recent poll, in device axes.
    pub fn raw_position(&self) -> Vec3 {
        self.raw_position
    }

    /// Model string reported by the driver, or `"Not initialized"` if the
    /// query fails.
    ///
    /// Unlike the other queries this one does not require an open session.
    pub fn device_type(&mut self) -> String {
        self.driver
            .device_type(self.device_id)
            .unwrap_or_else(|e| {
                log::warn!("Device type query failed: {}", e);
                NOT_INITIALIZED.to_string()
            })
    }

    /// Live state of one stylus button. Always `false` while closed.
    pub fn button_pressed(&mut self, which: Button) -> bool {
        if !self.is_open {
            return false;
        }
        which.is_reported_by(self.driver.buttons(self.device_id))
    }

    /// Switch between `"2d"` and `"3d"` reporting. Any other name is rejected
    /// and the mode is unchanged.
    pub fn set_mode(&mut self, name: &str) -> bool {
        match self.mapper.set_mode(name) {
            Ok(_) => true,
            Err(e) => {
                log::warn!("{}", e);
                false
            }
        }
    }

    pub fn mode(&self) -> MappingMode {
        self.mapper.mode()
    }

    /// Peak renderable force in newtons.
    pub fn max_force(&self) -> f64 {
        self.mapper.calibration().max_force
    }

    /// Workspace extents encoded as `"w,h,d"`.
    pub fn workspace_size(&self) -> String {
        self.mapper.workspace_size()
    }

    /// Meters of stylus travel per screen pixel.
    pub fn pixel_width(&self) -> f64 {
        self.mapper.pixel_pitch()
    }

    pub fn mapper(&self) -> &WorkspaceMapper {
        &self.mapper
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }
}

impl<D: HapticDriver, P: PointerSink> Drop for DeviceSession<D, P> {
    fn drop(&mut self) {
        if self.is_open && !self.close() {
            log::warn!(
                "Device {} still open at teardown, driver refused to close",
                self.device_id
            );
        }
    }
}
