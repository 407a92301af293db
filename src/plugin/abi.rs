//! C-compatible types shared by the host and plug-in robots.
//!
//! Everything that crosses a shared-library boundary is `#[repr(C)]` and
//! carries [`ABI_VERSION`]. Bump the version whenever a layout in this file
//! changes.

use std::ffi::c_void;

pub const ABI_VERSION: u32 = 1;

/// Name of the symbol every robot library exports.
pub const ENTRY_SYMBOL: &[u8] = b"crobots_robot_entry\0";

// Status codes returned by `RobotVTable::tick`
pub const TICK_OK: i32 = 0;
pub const TICK_PANICKED: i32 = 1;
pub const TICK_INVALID: i32 = 2;

/// Borrowed UTF-8 string. Only valid while its owner lives.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct AbiStr {
    pub ptr: *const u8,
    pub len: usize,
}

impl AbiStr {
    pub fn new(s: &str) -> Self {
        AbiStr {
            ptr: s.as_ptr(),
            len: s.len(),
        }
    }

    /// # Safety
    /// `ptr` must point to `len` readable bytes (or be null).
    pub unsafe fn to_string_lossy(&self) -> String {
        if self.ptr.is_null() {
            return String::new();
        }
        let bytes = unsafe { std::slice::from_raw_parts(self.ptr, self.len) };
        String::from_utf8_lossy(bytes).into_owned()
    }
}

/// What the host tells a robot factory about the robot it is building
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProxyAbi {
    pub abi_version: u32,
    pub id: u32,
    pub arena_width: u32,
    pub arena_height: u32,
}

/// Functions the host provides to a robot during `tick`. Every function takes
/// the opaque context pointer passed alongside the table.
#[repr(C)]
pub struct HostApi {
    pub abi_version: u32,
    pub drive: unsafe extern "C" fn(ctx: *mut c_void, degree: f32, speed: f32),
    pub scan: unsafe extern "C" fn(ctx: *mut c_void, degree: f32, resolution: f32) -> f32,
    pub cannon: unsafe extern "C" fn(ctx: *mut c_void, degree: f32, range: f32) -> bool,
    pub damage: unsafe extern "C" fn(ctx: *mut c_void) -> u32,
    pub speed: unsafe extern "C" fn(ctx: *mut c_void) -> f32,
    pub facing: unsafe extern "C" fn(ctx: *mut c_void) -> f32,
    pub loc_x: unsafe extern "C" fn(ctx: *mut c_void) -> u32,
    pub loc_y: unsafe extern "C" fn(ctx: *mut c_void) -> u32,
    pub rand: unsafe extern "C" fn(ctx: *mut c_void, limit: u32) -> u32,
    pub arena_width: unsafe extern "C" fn(ctx: *mut c_void) -> u32,
    pub arena_height: unsafe extern "C" fn(ctx: *mut c_void) -> u32,
}

/// Functions a plug-in provides for one robot instance
#[repr(C)]
pub struct RobotVTable {
    pub name: unsafe extern "C" fn(instance: *const c_void) -> AbiStr,
    pub tick: unsafe extern "C" fn(instance: *mut c_void, host: *const HostApi, ctx: *mut c_void) -> i32,
    pub destroy: unsafe extern "C" fn(instance: *mut c_void),
}

/// Returned by the entry point. A null `instance` means the factory failed.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct RobotHandleAbi {
    pub abi_version: u32,
    pub instance: *mut c_void,
    pub vtable: *const RobotVTable,
}

impl RobotHandleAbi {
    pub fn null() -> Self {
        RobotHandleAbi {
            abi_version: ABI_VERSION,
            instance: std::ptr::null_mut(),
            vtable: std::ptr::null(),
        }
    }

    pub fn is_null(&self) -> bool {
        self.instance.is_null() || self.vtable.is_null()
    }
}

pub type EntryFn = unsafe extern "C" fn(proxy: *const ProxyAbi) -> RobotHandleAbi;
