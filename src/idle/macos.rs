//! Idle detection using IOKit HIDIdleTime for system-wide idle monitoring (macOS).

use anyhow::{anyhow, Result};
use core_foundation::base::TCFType;
use core_foundation::number::CFNumber;
use core_foundation::string::CFString;
use std::time::Duration;

use super::IdleSource;

/// Idle probe reading the HIDIdleTime property of IOHIDSystem.
pub struct SystemIdle;

impl SystemIdle {
    /// Verify the IOHIDSystem registry entry is reachable.
    pub fn new() -> Result<Self> {
        query_hid_idle_time()
            .ok_or_else(|| anyhow!("Failed to read HIDIdleTime from IOKit. Is a HID session available?"))?;
        Ok(Self)
    }
}

impl IdleSource for SystemIdle {
    fn idle_time(&mut self) -> Result<Duration> {
        query_hid_idle_time().ok_or_else(|| anyhow!("Failed to read HIDIdleTime from IOKit"))
    }
}

/// Get the system idle time using IOKit HIDIdleTime.
/// Returns the time elapsed since the last user input.
fn query_hid_idle_time() -> Option<Duration> {
    // Use IOKit to get HIDIdleTime
    // This requires linking against IOKit framework
    #[link(name = "IOKit", kind = "framework")]
    extern "C" {
        fn IOServiceGetMatchingService(
            main_port: u32,
            matching: core_foundation::base::CFTypeRef,
        ) -> u32;
        fn IOServiceMatching(name: *const std::os::raw::c_char) -> core_foundation::base::CFTypeRef;
        fn IORegistryEntryCreateCFProperty(
            entry: u32,
            key: core_foundation::string::CFStringRef,
            allocator: core_foundation::base::CFAllocatorRef,
            options: u32,
        ) -> core_foundation::base::CFTypeRef;
        fn IOObjectRelease(object: u32) -> i32;
    }

    unsafe {
        let service_name = std::ffi::CString::new("IOHIDSystem").ok()?;
        let matching = IOServiceMatching(service_name.as_ptr());
        if matching.is_null() {
            return None;
        }

        let service = IOServiceGetMatchingService(0, matching);
        if service == 0 {
            return None;
        }

        let key = CFString::new("HIDIdleTime");
        let property = IORegistryEntryCreateCFProperty(
            service,
            key.as_concrete_TypeRef(),
            std::ptr::null(),
            0,
        );

        IOObjectRelease(service);

        if property.is_null() {
            return None;
        }

        // The property is a CFNumber containing nanoseconds
        let cf_number: CFNumber = CFNumber::wrap_under_create_rule(property as *mut _);
        let nanoseconds: i64 = cf_number.to_i64()?;

        Some(Duration::from_nanos(nanoseconds as u64))
    }
}
