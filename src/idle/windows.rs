//! Idle detection for Windows using GetLastInputInfo Win32 API.

use anyhow::{anyhow, Result};
use std::time::Duration;
use windows::Win32::System::SystemInformation::GetTickCount;
use windows::Win32::UI::Input::KeyboardAndMouse::{GetLastInputInfo, LASTINPUTINFO};

use super::IdleSource;

/// Idle probe using the Windows GetLastInputInfo API.
pub struct SystemIdle;

impl SystemIdle {
    pub fn new() -> Result<Self> {
        let mut probe = Self;
        probe.idle_time()?;
        Ok(probe)
    }
}

impl IdleSource for SystemIdle {
    fn idle_time(&mut self) -> Result<Duration> {
        unsafe {
            let mut last_input = LASTINPUTINFO {
                cbSize: std::mem::size_of::<LASTINPUTINFO>() as u32,
                dwTime: 0,
            };

            if GetLastInputInfo(&mut last_input).as_bool() {
                // Tick counts wrap after ~49.7 days; wrapping_sub stays correct
                // across the rollover.
                let current_tick = GetTickCount();
                let idle_ms = current_tick.wrapping_sub(last_input.dwTime);
                Ok(Duration::from_millis(u64::from(idle_ms)))
            } else {
                Err(anyhow!("GetLastInputInfo failed"))
            }
        }
    }
}
