//! Plug-in side of the boundary.
//!
//! A robot library only needs a factory and the [`export_robot!`](crate::export_robot)
//! macro; everything here is called through the generated entry point. Panics
//! raised by the robot are caught before they can reach the host.

use super::abi::{
    ABI_VERSION, AbiStr, HostApi, ProxyAbi, RobotHandleAbi, RobotVTable, TICK_INVALID, TICK_OK,
    TICK_PANICKED,
};
use crate::arena::Arena;
use crate::proxy::RobotProxy;
use crate::robot::{Controls, Robot};
use std::ffi::c_void;
use std::panic::{self, AssertUnwindSafe};

struct GuestRobot {
    robot: Box<dyn Robot>,
    // Cached so `AbiStr` has something stable to point at
    name: String,
}

// Controls backed by the host's function table
struct GuestControls {
    host: *const HostApi,
    ctx: *mut c_void,
}

impl GuestControls {
    fn api(&self) -> &HostApi {
        unsafe { &*self.host }
    }
}

impl Controls for GuestControls {
    fn drive(&mut self, degree: f32, speed: f32) {
        unsafe { (self.api().drive)(self.ctx, degree, speed) }
    }

    fn scan(&mut self, degree: f32, resolution: f32) -> f32 {
        unsafe { (self.api().scan)(self.ctx, degree, resolution) }
    }

    fn cannon(&mut self, degree: f32, range: f32) -> bool {
        unsafe { (self.api().cannon)(self.ctx, degree, range) }
    }

    fn damage(&self) -> u32 {
        unsafe { (self.api().damage)(self.ctx) }
    }

    fn speed(&self) -> f32 {
        unsafe { (self.api().speed)(self.ctx) }
    }

    fn facing(&self) -> f32 {
        unsafe { (self.api().facing)(self.ctx) }
    }

    fn loc_x(&self) -> u32 {
        unsafe { (self.api().loc_x)(self.ctx) }
    }

    fn loc_y(&self) -> u32 {
        unsafe { (self.api().loc_y)(self.ctx) }
    }

    fn rand(&mut self, limit: u32) -> u32 {
        unsafe { (self.api().rand)(self.ctx, limit) }
    }

    fn arena_dimensions(&self) -> (u32, u32) {
        unsafe { ((self.api().arena_width)(self.ctx), (self.api().arena_height)(self.ctx)) }
    }
}

/// Build a robot for the host. Returns a null handle if the request is
/// malformed, the ABI versions differ, or the factory panics.
///
/// # Safety
/// `proxy` must be null or point to a valid [`ProxyAbi`].
pub unsafe fn export<R, F>(proxy: *const ProxyAbi, factory: F) -> RobotHandleAbi
where
    R: Robot + 'static,
    F: FnOnce(RobotProxy) -> R,
{
    let Some(request) = (unsafe { proxy.as_ref() }) else {
        return RobotHandleAbi::null();
    };
    if request.abi_version != ABI_VERSION {
        return RobotHandleAbi::null();
    }
    let Ok(arena) = Arena::new(request.arena_width, request.arena_height) else {
        return RobotHandleAbi::null();
    };
    let robot_proxy = RobotProxy::new(request.id, arena);

    let built = panic::catch_unwind(AssertUnwindSafe(move || {
        let robot: Box<dyn Robot> = Box::new(factory(robot_proxy));
        let name = robot.name().to_string();
        GuestRobot { robot, name }
    }));
    match built {
        Ok(guest) => RobotHandleAbi {
            abi_version: ABI_VERSION,
            instance: Box::into_raw(Box::new(guest)) as *mut c_void,
            vtable: &GUEST_VTABLE,
        },
        Err(_) => RobotHandleAbi::null(),
    }
}

unsafe extern "C" fn guest_name(instance: *const c_void) -> AbiStr {
    match unsafe { (instance as *const GuestRobot).as_ref() } {
        Some(guest) => AbiStr::new(&guest.name),
        None => AbiStr::new(""),
    }
}

unsafe extern "C" fn guest_tick(instance: *mut c_void, host: *const HostApi, ctx: *mut c_void) -> i32 {
    let Some(guest) = (unsafe { (instance as *mut GuestRobot).as_mut() }) else {
        return TICK_INVALID;
    };
    match unsafe { host.as_ref() } {
        Some(api) if api.abi_version == ABI_VERSION => {}
        _ => return TICK_INVALID,
    }
    let mut controls = GuestControls { host, ctx };
    match panic::catch_unwind(AssertUnwindSafe(|| guest.robot.tick(&mut controls))) {
        Ok(()) => TICK_OK,
        Err(_) => TICK_PANICKED,
    }
}

unsafe extern "C" fn guest_destroy(instance: *mut c_void) {
    if instance.is_null() {
        return;
    }
    let guest = unsafe { Box::from_raw(instance as *mut GuestRobot) };
    let _ = panic::catch_unwind(AssertUnwindSafe(move || drop(guest)));
}

static GUEST_VTABLE: RobotVTable = RobotVTable {
    name: guest_name,
    tick: guest_tick,
    destroy: guest_destroy,
};

/// Export a robot factory from a `cdylib` as the library's entry point.
///
/// ```ignore
/// crobots::export_robot!(MyRobot::new);
/// ```
#[macro_export]
macro_rules! export_robot {
    ($factory:expr) => {
        #[unsafe(no_mangle)]
        pub unsafe extern "C" fn crobots_robot_entry(
            proxy: *const $crate::plugin::abi::ProxyAbi,
        ) -> $crate::plugin::abi::RobotHandleAbi {
            unsafe { $crate::plugin::guest::export(proxy, $factory) }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Named;

    impl Robot for Named {
        fn name(&self) -> &str {
            "Named"
        }
        fn tick(&mut self, _ctl: &mut dyn Controls) {}
    }

    #[test]
    fn test_export_rejects_null_request() {
        let handle = unsafe { export(std::ptr::null(), |_| Named) };
        assert!(handle.is_null());
    }

    #[test]
    fn test_tick_rejects_missing_host() {
        let request = ProxyAbi {
            abi_version: ABI_VERSION,
            id: 1,
            arena_width: 100,
            arena_height: 100,
        };
        let handle = unsafe { export(&request, |_| Named) };
        assert!(!handle.is_null());
        unsafe {
            let vtable = &*handle.vtable;
            assert_eq!((vtable.name)(handle.instance).to_string_lossy(), "Named");
            assert_eq!(
                (vtable.tick)(handle.instance, std::ptr::null(), std::ptr::null_mut()),
                TICK_INVALID
            );
            assert_eq!(
                (vtable.tick)(std::ptr::null_mut(), std::ptr::null(), std::ptr::null_mut()),
                TICK_INVALID
            );
            (vtable.destroy)(handle.instance);
        }
    }
}
