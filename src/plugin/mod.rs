//! Shared-library robots.
//!
//! Robots built as separate libraries talk to the host through versioned C
//! function tables ([`abi`]). The host wraps a loaded robot in
//! [`PluginRobot`], which implements [`Robot`](crate::robot::Robot) like any
//! in-process robot. Library authors use [`export_robot!`](crate::export_robot).

pub mod abi;
pub mod guest;
mod host;

pub use host::PluginRobot;
