//! Pointer control for Windows using GetCursorPos/SetCursorPos Win32 APIs.

use anyhow::{Context, Result};
use windows::Win32::Foundation::POINT;
use windows::Win32::UI::WindowsAndMessaging::{GetCursorPos, SetCursorPos};

use super::{PointerDevice, Position};

/// Pointer device backed by the Win32 cursor APIs.
pub struct SystemPointer;

impl SystemPointer {
    pub fn new() -> Result<Self> {
        // Probe the API once so a missing desktop session fails at startup.
        let mut point = POINT::default();
        unsafe { GetCursorPos(&mut point) }
            .context("Failed to query cursor position. Is a desktop session available?")?;

        Ok(Self)
    }
}

impl PointerDevice for SystemPointer {
    fn position(&mut self) -> Result<Position> {
        let mut point = POINT::default();
        unsafe { GetCursorPos(&mut point) }.context("GetCursorPos failed")?;
        Ok(Position::new(point.x, point.y))
    }

    fn move_to(&mut self, target: Position) -> Result<()> {
        unsafe { SetCursorPos(target.x, target.y) }.context("SetCursorPos failed")?;
        Ok(())
    }
}
