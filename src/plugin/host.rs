// Host side of the plug-in boundary: a shared-library robot behind the Robot trait

use super::abi::{
    ABI_VERSION, ENTRY_SYMBOL, EntryFn, HostApi, ProxyAbi, RobotHandleAbi, RobotVTable, TICK_OK,
    TICK_PANICKED,
};
use crate::error::LoadError;
use crate::proxy::RobotProxy;
use crate::robot::{Controls, Robot};
use libloading::{Library, Symbol};
use log::{info, warn};
use std::ffi::c_void;
use std::path::Path;

/// A robot instance living in a plug-in library.
pub struct PluginRobot {
    instance: *mut c_void,
    vtable: *const RobotVTable,
    name: String,
    // Must outlive the instance; fields drop after `Drop::drop` runs
    _library: Option<Library>,
}

impl PluginRobot {
    /// Open the library at `path`, call its entry point and take the robot it returns.
    ///
    /// # Safety
    /// Loading a library runs its initialisers, and the entry point is trusted
    /// to follow the ABI in [`super::abi`].
    pub unsafe fn open(path: &Path, proxy: &RobotProxy) -> Result<PluginRobot, LoadError> {
        let library = unsafe { Library::new(path) }.map_err(|source| LoadError::Library {
            path: path.to_path_buf(),
            source,
        })?;
        let entry: EntryFn = {
            let symbol: Symbol<EntryFn> =
                unsafe { library.get(ENTRY_SYMBOL) }.map_err(|source| LoadError::MissingEntryPoint {
                    path: path.to_path_buf(),
                    source,
                })?;
            *symbol
        };

        let (arena_width, arena_height) = proxy.arena_dimensions();
        let request = ProxyAbi {
            abi_version: ABI_VERSION,
            id: proxy.id(),
            arena_width,
            arena_height,
        };
        crate::debug_loader!("Calling entry point of {}", path.display());
        let handle = unsafe { entry(&request) };
        unsafe { Self::from_handle(handle, Some(library), &path.display().to_string()) }
    }

    /// Wrap a handle returned by an entry point.
    ///
    /// # Safety
    /// A non-null handle must carry a valid instance and vtable, and `library`
    /// must be the code they live in (or `None` when it is linked in-process).
    pub unsafe fn from_handle(
        handle: RobotHandleAbi,
        library: Option<Library>,
        source: &str,
    ) -> Result<PluginRobot, LoadError> {
        if handle.abi_version != ABI_VERSION {
            return Err(LoadError::AbiMismatch {
                expected: ABI_VERSION,
                found: handle.abi_version,
            });
        }
        if handle.is_null() {
            return Err(LoadError::NullRobot(source.to_string()));
        }
        let name = unsafe { ((*handle.vtable).name)(handle.instance).to_string_lossy() };
        info!("Plug-in robot '{}' created from {}", name, source);
        Ok(PluginRobot {
            instance: handle.instance,
            vtable: handle.vtable,
            name,
            _library: library,
        })
    }
}

impl Robot for PluginRobot {
    fn name(&self) -> &str {
        &self.name
    }

    fn tick(&mut self, ctl: &mut dyn Controls) {
        let mut ctl_ref: &mut dyn Controls = ctl;
        let ctx = &mut ctl_ref as *mut &mut dyn Controls as *mut c_void;
        let status = unsafe { ((*self.vtable).tick)(self.instance, &HOST_API, ctx) };
        match status {
            TICK_OK => {}
            TICK_PANICKED => warn!("Robot '{}' panicked during tick, skipping it", self.name),
            other => warn!("Robot '{}' tick failed with status {}", self.name, other),
        }
    }
}

impl Drop for PluginRobot {
    fn drop(&mut self) {
        crate::debug_loader!("Destroying plug-in robot '{}'", self.name);
        unsafe { ((*self.vtable).destroy)(self.instance) };
    }
}

// --- Host callbacks ---

// `ctx` is always a `*mut &mut dyn Controls` built in `PluginRobot::tick`
unsafe fn controls<'a>(ctx: *mut c_void) -> &'a mut dyn Controls {
    let ctl = ctx as *mut &'a mut (dyn Controls + 'a);
    unsafe { &mut **ctl }
}

unsafe extern "C" fn host_drive(ctx: *mut c_void, degree: f32, speed: f32) {
    unsafe { controls(ctx) }.drive(degree, speed);
}

unsafe extern "C" fn host_scan(ctx: *mut c_void, degree: f32, resolution: f32) -> f32 {
    unsafe { controls(ctx) }.scan(degree, resolution)
}

unsafe extern "C" fn host_cannon(ctx: *mut c_void, degree: f32, range: f32) -> bool {
    unsafe { controls(ctx) }.cannon(degree, range)
}

unsafe extern "C" fn host_damage(ctx: *mut c_void) -> u32 {
    unsafe { controls(ctx) }.damage()
}

unsafe extern "C" fn host_speed(ctx: *mut c_void) -> f32 {
    unsafe { controls(ctx) }.speed()
}

unsafe extern "C" fn host_facing(ctx: *mut c_void) -> f32 {
    unsafe { controls(ctx) }.facing()
}

unsafe extern "C" fn host_loc_x(ctx: *mut c_void) -> u32 {
    unsafe { controls(ctx) }.loc_x()
}

unsafe extern "C" fn host_loc_y(ctx: *mut c_void) -> u32 {
    unsafe { controls(ctx) }.loc_y()
}

unsafe extern "C" fn host_rand(ctx: *mut c_void, limit: u32) -> u32 {
    unsafe { controls(ctx) }.rand(limit)
}

unsafe extern "C" fn host_arena_width(ctx: *mut c_void) -> u32 {
    unsafe { controls(ctx) }.arena_dimensions().0
}

unsafe extern "C" fn host_arena_height(ctx: *mut c_void) -> u32 {
    unsafe { controls(ctx) }.arena_dimensions().1
}

static HOST_API: HostApi = HostApi {
    abi_version: ABI_VERSION,
    drive: host_drive,
    scan: host_scan,
    cannon: host_cannon,
    damage: host_damage,
    speed: host_speed,
    facing: host_facing,
    loc_x: host_loc_x,
    loc_y: host_loc_y,
    rand: host_rand,
    arena_width: host_arena_width,
    arena_height: host_arena_height,
};
