use crate::arena::Arena;
use crate::engine::LoadedRobot;
use crate::error::LoadError;
use crate::plugin::PluginRobot;
use crate::proxy::RobotProxy;
use crate::robot::Robot;
use log::{error, info};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Builds an in-process robot for the given proxy
pub type RobotFactory = fn(RobotProxy) -> Box<dyn Robot>;

/// Resolves robot names to robot instances, each bound to a fresh proxy.
///
/// Registered built-ins win over shared libraries of the same name.
pub struct Loader {
    arena: Arena,
    search_dir: PathBuf,
    builtins: HashMap<String, RobotFactory>,
    robots: Vec<LoadedRobot>,
}

impl Loader {
    pub fn new(arena: Arena) -> Self {
        Loader {
            arena,
            search_dir: PathBuf::from("."),
            builtins: HashMap::new(),
            robots: Vec::new(),
        }
    }

    /// Look for robot libraries in `dir` instead of the working directory.
    pub fn with_search_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.search_dir = dir.into();
        self
    }

    pub fn register_builtin(&mut self, name: &str, factory: RobotFactory) {
        crate::debug_loader!("Registered built-in robot '{}'", name);
        self.builtins.insert(name.to_string(), factory);
    }

    pub fn search_dir(&self) -> &Path {
        &self.search_dir
    }

    /// Load the robot called `name` under the engine-issued `id`.
    ///
    /// The reason for any failure is logged before it is returned; the caller
    /// decides whether it is fatal.
    pub fn load(&mut self, name: &str, id: u32) -> Result<(), LoadError> {
        let result = self.build(name, id);
        match &result {
            Ok(robot) => info!(
                "Loaded robot {} '{}' as '{}'",
                id,
                name,
                robot.robot.name()
            ),
            Err(e) => error!("Failed to load robot '{}': {}", name, e),
        }
        self.robots.push(result?);
        Ok(())
    }

    fn build(&self, name: &str, id: u32) -> Result<LoadedRobot, LoadError> {
        validate_name(name)?;
        let proxy = RobotProxy::new(id, self.arena);

        if let Some(factory) = self.builtins.get(name) {
            crate::debug_loader!("Using built-in robot '{}'", name);
            return Ok(LoadedRobot {
                proxy,
                robot: factory(proxy),
            });
        }

        let path = self.search_dir.join(library_filename(name));
        crate::debug_loader!("Opening {}", path.display());
        let robot = unsafe { PluginRobot::open(&path, &proxy) }?;
        Ok(LoadedRobot {
            proxy,
            robot: Box::new(robot),
        })
    }

    pub fn loaded(&self) -> usize {
        self.robots.len()
    }

    /// Hand every loaded robot over, in load order.
    pub fn into_robots(self) -> Vec<LoadedRobot> {
        self.robots
    }
}

// Names map straight onto file names, so nothing that could walk the filesystem
fn validate_name(name: &str) -> Result<(), LoadError> {
    if name.is_empty() {
        return Err(LoadError::EmptyName);
    }
    if name.contains('/') || name.contains('\\') || name.starts_with('.') {
        return Err(LoadError::PathInName(name.to_string()));
    }
    Ok(())
}

/// Platform file name of the library holding robot `name`.
pub fn library_filename(name: &str) -> String {
    if cfg!(target_os = "windows") {
        format!("{}.dll", name)
    } else if cfg!(target_os = "macos") {
        format!("lib{}.dylib", name)
    } else {
        format!("lib{}.so", name)
    }
}
