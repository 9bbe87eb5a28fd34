//! C FFI layer for haptic-bridge.
//!
//! Provides an opaque handle-based API for the host adapter (browser plugin,
//! scripting bridge). The generated C header is written to
//! `include/haptic_bridge.h` by cbindgen.
//!
//! A handle is not internally synchronized. The host must serialize all
//! calls on one handle.

use crate::driver::HapticDriver;
use crate::error::{HapticError, LastError};
use crate::pointer::{NullPointer, PointerSink};
use crate::session::DeviceSession;
use crate::simulator::SimulatedDriver;
use crate::types::{Button, ForceVector, NOT_INITIALIZED};
use crate::workspace::Calibration;
use std::ffi::{c_char, c_double, c_int, CStr, CString};

static LAST_ERROR: LastError = LastError::new();

type DynSession = DeviceSession<Box<dyn HapticDriver>, Box<dyn PointerSink>>;

/// Opaque session handle for C consumers.
pub struct HbSession(DynSession);

fn new_handle(driver: Box<dyn HapticDriver>, pointer: Box<dyn PointerSink>) -> *mut HbSession {
    LAST_ERROR.clear();
    let session = DeviceSession::with_calibration(driver, pointer, Calibration::from_env());
    Box::into_raw(Box::new(HbSession(session)))
}

/// Borrow the session behind `ptr`, recording `OwnerReleased` if it is null.
unsafe fn session<'a>(ptr: *mut HbSession) -> Option<&'a mut DynSession> {
    if ptr.is_null() {
        LAST_ERROR.set(&HapticError::OwnerReleased);
        return None;
    }
    Some(&mut (*ptr).0)
}

unsafe fn read_str<'a>(ptr: *const c_char) -> Option<&'a str> {
    if ptr.is_null() {
        return None;
    }
    CStr::from_ptr(ptr).to_str().ok()
}

fn into_c_string(s: String) -> *mut c_char {
    CString::new(s)
        .map(CString::into_raw)
        .unwrap_or(std::ptr::null_mut())
}

/// Create a session on the simulated device.
/// Calibration comes from the `HAPTIC_*` environment variables.
#[no_mangle]
pub extern "C" fn hb_session_new_simulated() -> *mut HbSession {
    new_handle(Box::new(SimulatedDriver::new()), Box::new(NullPointer))
}

/// Create a session on the last enumerated hdPhantom device, driving the
/// system pointer in 2D mode.
#[cfg(feature = "phantom")]
#[no_mangle]
pub extern "C" fn hb_session_new_phantom() -> *mut HbSession {
    new_handle(
        Box::new(crate::phantom::PhantomDriver::new()),
        crate::pointer::system_pointer(),
    )
}

/// Free a session. An open device is closed first.
///
/// # Safety
/// `s` must be a pointer returned by an `hb_session_new_*` function, or null.
#[no_mangle]
pub unsafe extern "C" fn hb_session_free(s: *mut HbSession) {
    if !s.is_null() {
        drop(Box::from_raw(s));
    }
}

/// Number of attached devices, or -1 for a null handle.
///
/// # Safety
/// `s` must be a valid session pointer, or null.
#[no_mangle]
pub unsafe extern "C" fn hb_device_count(s: *mut HbSession) -> c_int {
    match session(s) {
        Some(s) => s.device_count(),
        None => -1,
    }
}

/// Open the device. Returns the open state after the call.
///
/// # Safety
/// `s` must be a valid session pointer, or null.
#[no_mangle]
pub unsafe extern "C" fn hb_open(s: *mut HbSession) -> bool {
    let Some(s) = session(s) else { return false };
    let opened = s.open();
    if opened {
        LAST_ERROR.clear();
    } else {
        LAST_ERROR.set(&HapticError::driver("open"));
    }
    opened
}

/// Close the device. Returns true only if this call closed it.
///
/// # Safety
/// `s` must be a valid session pointer, or null.
#[no_mangle]
pub unsafe extern "C" fn hb_close(s: *mut HbSession) -> bool {
    let Some(s) = session(s) else { return false };
    let was_open = s.is_open();
    let closed = s.close();
    if closed {
        LAST_ERROR.clear();
    } else if was_open {
        LAST_ERROR.set(&HapticError::driver("close"));
    }
    closed
}

/// # Safety
/// `s` must be a valid session pointer, or null.
#[no_mangle]
pub unsafe extern "C" fn hb_is_open(s: *mut HbSession) -> bool {
    session(s).map(|s| s.is_open()).unwrap_or(false)
}

/// Send a force encoded as `"x,y,z"` (newtons, world axes).
/// Returns false if it was not applied (see `hb_last_error`).
///
/// # Safety
/// `s` must be a valid session pointer, or null. `force` must be a valid
/// NUL-terminated string, or null.
#[no_mangle]
pub unsafe extern "C" fn hb_send_force(s: *mut HbSession, force: *const c_char) -> bool {
    let Some(s) = session(s) else { return false };
    let Some(text) = read_str(force) else {
        LAST_ERROR.set(&HapticError::InvalidTriple(String::new()));
        return false;
    };

    match text
        .parse::<ForceVector>()
        .and_then(|f| s.send_force_vector(f))
    {
        Ok(()) => {
            LAST_ERROR.clear();
            true
        }
        Err(e) => {
            LAST_ERROR.set(&e);
            false
        }
    }
}

/// Current position for the active mode, as an owned string.
/// Free it with `hb_string_free`.
///
/// # Safety
/// `s` must be a valid session pointer, or null.
#[no_mangle]
pub unsafe extern "C" fn hb_position(s: *mut HbSession) -> *mut c_char {
    match session(s) {
        Some(s) => into_c_string(s.position()),
        None => into_c_string(NOT_INITIALIZED.to_string()),
    }
}

/// Device model string as an owned string. Free it with `hb_string_free`.
///
/// # Safety
/// `s` must be a valid session pointer, or null.
#[no_mangle]
pub unsafe extern "C" fn hb_device_type(s: *mut HbSession) -> *mut c_char {
    match session(s) {
        Some(s) => into_c_string(s.device_type()),
        None => into_c_string(NOT_INITIALIZED.to_string()),
    }
}

/// Select `"2d"` or `"3d"` reporting. Any other name returns false.
///
/// # Safety
/// `s` must be a valid session pointer, or null. `mode` must be a valid
/// NUL-terminated string, or null.
#[no_mangle]
pub unsafe extern "C" fn hb_set_mode(s: *mut HbSession, mode: *const c_char) -> bool {
    let Some(s) = session(s) else { return false };
    let name = read_str(mode).unwrap_or("");
    let ok = s.set_mode(name);
    if ok {
        LAST_ERROR.clear();
    } else {
        LAST_ERROR.set(&HapticError::InvalidMode(name.to_string()));
    }
    ok
}

/// `which`: 1 = left, 2 = right. Other values return false.
///
/// # Safety
/// `s` must be a valid session pointer, or null.
#[no_mangle]
pub unsafe extern "C" fn hb_button_pressed(s: *mut HbSession, which: c_int) -> bool {
    let Some(s) = session(s) else { return false };
    match which {
        1 => s.button_pressed(Button::Left),
        2 => s.button_pressed(Button::Right),
        _ => false,
    }
}

/// # Safety
/// `s` must be a valid session pointer, or null.
#[no_mangle]
pub unsafe extern "C" fn hb_max_force(s: *mut HbSession) -> c_double {
    session(s).map(|s| s.max_force()).unwrap_or(0.0)
}

/// # Safety
/// `s` must be a valid session pointer, or null.
#[no_mangle]
pub unsafe extern "C" fn hb_pixel_width(s: *mut HbSession) -> c_double {
    session(s).map(|s| s.pixel_width()).unwrap_or(0.0)
}

/// Workspace extents `"w,h,d"` in meters. Free with `hb_string_free`.
///
/// # Safety
/// `s` must be a valid session pointer, or null.
#[no_mangle]
pub unsafe extern "C" fn hb_workspace_size(s: *mut HbSession) -> *mut c_char {
    match session(s) {
        Some(s) => into_c_string(s.workspace_size()),
        None => std::ptr::null_mut(),
    }
}

/// Free a string returned by this library.
///
/// # Safety
/// `p` must come from an `hb_*` function returning `*mut c_char`, or be null.
#[no_mangle]
pub unsafe extern "C" fn hb_string_free(p: *mut c_char) {
    if !p.is_null() {
        drop(CString::from_raw(p));
    }
}

/// Get the last error message. Returns NULL if no error.
///
/// A successful `hb_open`, `hb_close`, `hb_send_force` or `hb_set_mode`
/// clears it. The returned pointer is valid until the next one of those calls.
#[no_mangle]
pub extern "C" fn hb_last_error() -> *const c_char {
    LAST_ERROR.as_ptr()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // LAST_ERROR is process-wide.
    static SERIAL: Mutex<()> = Mutex::new(());

    unsafe fn take(p: *mut c_char) -> String {
        let s = CStr::from_ptr(p).to_string_lossy().into_owned();
        hb_string_free(p);
        s
    }

    #[test]
    fn test_simulated_session_lifecycle() {
        let _guard = SERIAL.lock().unwrap_or_else(|e| e.into_inner());
        unsafe {
            let s = hb_session_new_simulated();
            assert!(!s.is_null());
            assert_eq!(hb_device_count(s), 1);
            assert_eq!(take(hb_position(s)), NOT_INITIALIZED);

            assert!(hb_open(s));
            assert!(hb_is_open(s));
            assert_eq!(take(hb_position(s)), "0,-0,-0");

            let mode = CString::new("2d").unwrap();
            assert!(hb_set_mode(s, mode.as_ptr()));
            let bad = CString::new("4d").unwrap();
            assert!(!hb_set_mode(s, bad.as_ptr()));

            let force = CString::new("0.5,0,0").unwrap();
            assert!(hb_send_force(s, force.as_ptr()));
            let junk = CString::new("0.5").unwrap();
            assert!(!hb_send_force(s, junk.as_ptr()));

            assert!(hb_close(s));
            assert!(!hb_close(s));
            hb_session_free(s);
        }
    }

    #[test]
    fn test_null_handle_is_harmless() {
        let _guard = SERIAL.lock().unwrap_or_else(|e| e.into_inner());
        unsafe {
            let null = std::ptr::null_mut();
            assert_eq!(hb_device_count(null), -1);
            assert!(!hb_open(null));
            assert!(!hb_button_pressed(null, 1));
            assert_eq!(take(hb_position(null)), NOT_INITIALIZED);
            assert!(hb_workspace_size(null).is_null());
            hb_session_free(null);
            hb_string_free(std::ptr::null_mut());
        }
    }

    #[test]
    fn test_success_clears_last_error() {
        let _guard = SERIAL.lock().unwrap_or_else(|e| e.into_inner());
        unsafe {
            let s = hb_session_new_simulated();

            let junk = CString::new("1,2").unwrap();
            assert!(!hb_send_force(s, junk.as_ptr()));
            assert!(!hb_last_error().is_null());
            assert!(hb_open(s));
            assert!(hb_last_error().is_null());

            let bad = CString::new("xyz").unwrap();
            assert!(!hb_set_mode(s, bad.as_ptr()));
            assert!(!hb_last_error().is_null());
            let force = CString::new("0,1,0").unwrap();
            assert!(hb_send_force(s, force.as_ptr()));
            assert!(hb_last_error().is_null());

            assert!(!hb_set_mode(s, bad.as_ptr()));
            let mode = CString::new("3d").unwrap();
            assert!(hb_set_mode(s, mode.as_ptr()));
            assert!(hb_last_error().is_null());

            assert!(!hb_set_mode(s, bad.as_ptr()));
            assert!(hb_close(s));
            assert!(hb_last_error().is_null());
            hb_session_free(s);
        }
    }
}
