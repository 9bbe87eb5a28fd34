//! # haptic-bridge - session core for PHANTOM-class haptic devices
//!
//! Sits between a vendor haptic SDK and a host environment (browser plugin,
//! scripting bridge). Provides:
//! - Device session lifecycle: open/close with servo loop, guaranteed close on drop
//! - Position polling mapped either to a 3D reporting convention or to screen
//!   pixels with pointer emulation
//! - Force submission from `"x,y,z"` text
//! - C FFI for integration with C/C++ hosts
//!
//! ## Quick Start
//! ```no_run
//! use haptic_bridge::pointer::NullPointer;
//! use haptic_bridge::simulator::SimulatedDriver;
//! use haptic_bridge::DeviceSession;
//!
//! let mut session = DeviceSession::new(SimulatedDriver::new(), NullPointer);
//! if session.open() {
//!     session.set_mode("3d");
//!     println!("pos: {}", session.position());
//!     session.send_force("0.0,0.5,0.0");
//! }
//! ```

pub mod error;
pub mod types;
pub mod codec;
pub mod driver;
#[cfg(feature = "phantom")]
pub mod phantom;
pub mod simulator;
pub mod pointer;
pub mod workspace;
pub mod session;
pub mod ffi;

pub use error::HapticError;
pub use types::*;
pub use driver::HapticDriver;
pub use pointer::PointerSink;
pub use session::DeviceSession;
pub use workspace::{Calibration, WorkspaceMapper};

/// Result type alias for haptic-bridge operations.
pub type Result<T> = std::result::Result<T, HapticError>;
