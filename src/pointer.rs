//! Host pointer emulation used by 2D mapping.
//!
//! Pointer calls are fire-and-forget: they mutate global OS state and there
//! is nothing to roll back if a later step fails.

use std::sync::{Arc, Mutex};

/// Sink for synthetic pointer input.
pub trait PointerSink {
    /// Move the cursor to absolute screen pixel `(x, y)`.
    fn move_to(&mut self, x: f64, y: f64);

    /// Press and release the primary button at the current position.
    fn left_click(&mut self);
}

impl<T: PointerSink + ?Sized> PointerSink for Box<T> {
    fn move_to(&mut self, x: f64, y: f64) {
        (**self).move_to(x, y)
    }

    fn left_click(&mut self) {
        (**self).left_click()
    }
}

/// Discards all pointer input.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullPointer;

impl PointerSink for NullPointer {
    fn move_to(&mut self, _x: f64, _y: f64) {}

    fn left_click(&mut self) {}
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    MoveTo { x: f64, y: f64 },
    LeftClick,
}

/// Keeps every pointer call in order; clones share the same log.
#[derive(Debug, Clone, Default)]
pub struct RecordingPointer {
    events: Arc<Mutex<Vec<PointerEvent>>>,
}

impl RecordingPointer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<PointerEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    pub fn clear(&self) {
        if let Ok(mut e) = self.events.lock() {
            e.clear();
        }
    }

    fn push(&self, event: PointerEvent) {
        if let Ok(mut e) = self.events.lock() {
            e.push(event);
        }
    }
}

impl PointerSink for RecordingPointer {
    fn move_to(&mut self, x: f64, y: f64) {
        self.push(PointerEvent::MoveTo { x, y });
    }

    fn left_click(&mut self) {
        self.push(PointerEvent::LeftClick);
    }
}

/// Drives the real Windows cursor through `SetCursorPos` / `SendInput`.
#[cfg(windows)]
#[derive(Debug, Clone, Copy, Default)]
pub struct WindowsPointer;

#[cfg(windows)]
impl PointerSink for WindowsPointer {
    fn move_to(&mut self, x: f64, y: f64) {
        use windows::Win32::UI::WindowsAndMessaging::SetCursorPos;

        if let Err(e) = unsafe { SetCursorPos(x as i32, y as i32) } {
            log::warn!("SetCursorPos({}, {}) failed: {}", x, y, e);
        }
    }

    fn left_click(&mut self) {
        use windows::Win32::UI::Input::KeyboardAndMouse::{
            SendInput, INPUT, INPUT_0, INPUT_MOUSE, MOUSEEVENTF_LEFTDOWN, MOUSEEVENTF_LEFTUP,
            MOUSEINPUT,
        };
        use windows::Win32::UI::WindowsAndMessaging::GetMessageExtraInfo;

        let input = INPUT {
            r#type: INPUT_MOUSE,
            Anonymous: INPUT_0 {
                mi: MOUSEINPUT {
                    dx: 0,
                    dy: 0,
                    mouseData: 0,
                    dwFlags: MOUSEEVENTF_LEFTDOWN | MOUSEEVENTF_LEFTUP,
                    time: 0,
                    dwExtraInfo: unsafe { GetMessageExtraInfo() }.0 as usize,
                },
            },
        };

        let sent = unsafe { SendInput(&[input], std::mem::size_of::<INPUT>() as i32) };
        if sent != 1 {
            log::warn!("SendInput injected {} of 1 click events", sent);
        }
    }
}

/// The pointer backend for the current platform.
pub fn system_pointer() -> Box<dyn PointerSink> {
    #[cfg(windows)]
    {
        Box::new(WindowsPointer)
    }
    #[cfg(not(windows))]
    {
        log::warn!("no pointer backend on this platform, 2D mode will not move the cursor");
        Box::new(NullPointer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_pointer_shared_log() {
        let rec = RecordingPointer::new();
        let mut sink: Box<dyn PointerSink> = Box::new(rec.clone());

        sink.move_to(10.0, 20.5);
        sink.left_click();

        assert_eq!(
            rec.events(),
            vec![
                PointerEvent::MoveTo { x: 10.0, y: 20.5 },
                PointerEvent::LeftClick
            ]
        );
        rec.clear();
        assert!(rec.events().is_empty());
    }
}
