//! Idle detection for Linux using X11 XScreenSaver extension.

use anyhow::{Context, Result};
use std::time::Duration;
use x11rb::connection::Connection;
use x11rb::protocol::screensaver::ConnectionExt as ScreensaverConnectionExt;
use x11rb::protocol::xproto::Window;
use x11rb::rust_connection::RustConnection;

use super::IdleSource;

/// Idle probe using the X11 XScreenSaver extension.
pub struct SystemIdle {
    conn: RustConnection,
    root: Window,
}

impl SystemIdle {
    /// Connect to the X11 display and verify the extension is usable.
    pub fn new() -> Result<Self> {
        let (conn, screen_num) = RustConnection::connect(None)
            .context("Failed to connect to X11 display. Is DISPLAY set?")?;

        let root = conn.setup().roots[screen_num].root;

        // Test that XScreenSaver extension works
        conn.screensaver_query_info(root)
            .context("XScreenSaver extension not available")?
            .reply()
            .context("Failed to query XScreenSaver info")?;

        Ok(Self { conn, root })
    }
}

impl IdleSource for SystemIdle {
    fn idle_time(&mut self) -> Result<Duration> {
        let reply = self
            .conn
            .screensaver_query_info(self.root)
            .context("Failed to issue XScreenSaver query")?
            .reply()
            .context("Failed to query XScreenSaver info")?;

        // ms_since_user_input is the idle time in milliseconds
        Ok(Duration::from_millis(u64::from(reply.ms_since_user_input)))
    }
}
