// Error types: arena construction, engine lifecycle, plug-in loading

use std::path::PathBuf;
use thiserror::Error;

/// Arena Errors
#[derive(Error, Debug, PartialEq, Eq, Clone, Copy)]
pub enum ArenaError {
    #[error("Arena dimensions must be non-zero (got {width}x{height})")]
    ZeroDimension { width: u32, height: u32 },
}

/// Engine Errors
#[derive(Error, Debug, PartialEq, Eq, Clone)]
pub enum EngineError {
    #[error("Robots have already been loaded into this engine")]
    AlreadyLoaded,
    #[error("Cannot start a match without robots")]
    NoRobots,
    #[error("Robot id {0} was loaded more than once")]
    DuplicateRobot(u32),
    #[error("Placement margin {margin} leaves no room in a {width}x{height} arena")]
    MarginTooLarge { margin: u32, width: u32, height: u32 },
    #[error("No robot with id {0}")]
    UnknownRobot(u32),
}

/// Loader Errors
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Cannot load an empty robot name")]
    EmptyName,
    #[error("Path characters not permitted in robot name '{0}'")]
    PathInName(String),
    #[error("Failed to open {path}: {source}")]
    Library {
        path: PathBuf,
        #[source]
        source: libloading::Error,
    },
    #[error("Failed to find entry point in {path}: {source}")]
    MissingEntryPoint {
        path: PathBuf,
        #[source]
        source: libloading::Error,
    },
    #[error("Plug-in ABI version {found} does not match host version {expected}")]
    AbiMismatch { expected: u32, found: u32 },
    #[error("Factory in {0} returned no robot")]
    NullRobot(String),
}
