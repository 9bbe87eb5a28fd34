use std::fmt;

/// Errors produced by the haptic session core.
///
/// None of these are fatal. Session operations that the host calls directly
/// turn them into `false` or a sentinel string.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum HapticError {
    #[error("driver call `{op}` returned the failure sentinel")]
    DriverFailure { op: &'static str },

    #[error("unrecognized mapping mode {0:?} (expected \"2d\" or \"3d\")")]
    InvalidMode(String),

    #[error("device session is not open")]
    NotInitialized,

    #[error("malformed triple {0:?} (expected three comma-separated numbers)")]
    InvalidTriple(String),

    #[error("session handle was released")]
    OwnerReleased,
}

impl HapticError {
    pub(crate) fn driver(op: &'static str) -> Self {
        HapticError::DriverFailure { op }
    }
}

/// Thread-safe last-error storage for the C FFI layer.
pub(crate) struct LastError {
    message: std::sync::Mutex<String>,
}

impl LastError {
    pub const fn new() -> Self {
        Self {
            message: std::sync::Mutex::new(String::new()),
        }
    }

    pub fn set(&self, err: &HapticError) {
        if let Ok(mut msg) = self.message.lock() {
            *msg = fmt::format(format_args!("{}\0", err));
        }
    }

    pub fn clear(&self) {
        if let Ok(mut msg) = self.message.lock() {
            msg.clear();
        }
    }

    pub fn as_ptr(&self) -> *const std::ffi::c_char {
        match self.message.lock() {
            Ok(msg) if !msg.is_empty() => msg.as_ptr() as *const std::ffi::c_char,
            _ => std::ptr::null(),
        }
    }
}
