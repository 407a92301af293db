//! Crobots: an arena where autonomous robots drive, scan and shoot.
//!
//! The [`Engine`] owns the simulation and runs it one tick at a time. Robots
//! implement [`Robot`] and only ever see the world through [`Controls`] and
//! their [`RobotProxy`]. The [`Loader`] builds robots by name, either from
//! the built-ins or from shared libraries exporting [`export_robot!`].

pub mod arena;
pub mod config;
mod context;
pub mod engine;
pub mod error;
pub mod game;
pub mod loader;
pub mod logging;
pub mod plugin;
pub mod proxy;
pub mod robot;
pub mod robots;
mod scan;
pub mod shot;
pub mod utils;

pub use arena::Arena;
pub use engine::{Engine, EngineOptions, LoadedRobot, MatchSnapshot, MatchState, World};
pub use error::{ArenaError, EngineError, LoadError};
pub use loader::Loader;
pub use proxy::RobotProxy;
pub use robot::{Controls, Robot, RobotProfile, RobotState, RobotView};
pub use shot::{Ballistics, InertBallistics, Shot};
