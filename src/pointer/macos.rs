//! Pointer control for macOS using CoreGraphics events.

use anyhow::{anyhow, Result};
use core_graphics::event::{CGEvent, CGEventTapLocation, CGEventType, CGMouseButton};
use core_graphics::event_source::{CGEventSource, CGEventSourceStateID};
use core_graphics::geometry::CGPoint;

use super::{PointerDevice, Position};

/// Pointer device backed by CoreGraphics.
///
/// Moves are delivered as `MouseMoved` events posted at the HID tap location
/// rather than a bare cursor warp, so the system registers them as real input
/// activity.
pub struct SystemPointer {
    source: CGEventSource,
}

impl SystemPointer {
    /// Create an event source for the combined session state.
    pub fn new() -> Result<Self> {
        let source = CGEventSource::new(CGEventSourceStateID::CombinedSessionState)
            .map_err(|_| anyhow!("Failed to create CGEventSource. Is a window session available?"))?;

        Ok(Self { source })
    }
}

impl PointerDevice for SystemPointer {
    fn position(&mut self) -> Result<Position> {
        let event = CGEvent::new(self.source.clone())
            .map_err(|_| anyhow!("Failed to create CGEvent for cursor query"))?;

        let location = event.location();
        Ok(Position::new(location.x as i32, location.y as i32))
    }

    fn move_to(&mut self, target: Position) -> Result<()> {
        let point = CGPoint::new(f64::from(target.x), f64::from(target.y));

        let event = CGEvent::new_mouse_event(
            self.source.clone(),
            CGEventType::MouseMoved,
            point,
            CGMouseButton::Left,
        )
        .map_err(|_| anyhow!("Failed to create mouse-moved event"))?;

        event.post(CGEventTapLocation::HID);
        Ok(())
    }
}
