//! Pointer control for Linux using X11 (XCB).

use anyhow::{Context, Result};
use x11rb::connection::Connection;
use x11rb::protocol::xproto::{ConnectionExt, Window};
use x11rb::rust_connection::RustConnection;

use super::{PointerDevice, Position};

/// Pointer device backed by the X11 core protocol.
pub struct SystemPointer {
    conn: RustConnection,
    root: Window,
}

impl SystemPointer {
    /// Connect to the X11 display and cache the root window.
    pub fn new() -> Result<Self> {
        let (conn, screen_num) = RustConnection::connect(None)
            .context("Failed to connect to X11 display. Is DISPLAY set?")?;

        let root = conn.setup().roots[screen_num].root;

        Ok(Self { conn, root })
    }
}

impl PointerDevice for SystemPointer {
    fn position(&mut self) -> Result<Position> {
        let reply = self
            .conn
            .query_pointer(self.root)
            .context("Failed to issue QueryPointer request")?
            .reply()
            .context("Failed to query pointer position")?;

        Ok(Position::new(
            i32::from(reply.root_x),
            i32::from(reply.root_y),
        ))
    }

    fn move_to(&mut self, target: Position) -> Result<()> {
        // WarpPointer with a destination window interprets the coordinates as
        // absolute positions within that window; the root window makes them
        // screen coordinates.
        self.conn
            .warp_pointer(
                x11rb::NONE,
                self.root,
                0,
                0,
                0,
                0,
                target.x as i16,
                target.y as i16,
            )
            .context("Failed to issue WarpPointer request")?
            .check()
            .context("Failed to warp pointer")?;

        Ok(())
    }
}
