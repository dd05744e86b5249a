//! Idle detection module with platform-specific implementations.

#[cfg(target_os = "macos")]
mod macos;
#[cfg(target_os = "linux")]
mod linux;
#[cfg(target_os = "windows")]
mod windows;

use anyhow::Result;
use std::time::Duration;

/// Source of system idle-time measurements.
pub trait IdleSource {
    /// Time elapsed since the last user input device activity.
    fn idle_time(&mut self) -> Result<Duration>;
}

#[cfg(target_os = "macos")]
pub use macos::SystemIdle;
#[cfg(target_os = "linux")]
pub use linux::SystemIdle;
#[cfg(target_os = "windows")]
pub use windows::SystemIdle;
