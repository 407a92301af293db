use crate::arena::Arena;
use crate::engine::World;

/// A robot's capability handle on the engine.
///
/// Built once per robot by the loader and handed to the robot's factory. It
/// answers "how big is the arena" and routes scans to the engine on the robot's
/// behalf; nothing else about the engine is reachable through it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RobotProxy {
    id: u32,
    arena: Arena,
}

impl RobotProxy {
    pub fn new(id: u32, arena: Arena) -> Self {
        RobotProxy { id, arena }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn arena_dimensions(&self) -> (u32, u32) {
        self.arena.dimensions()
    }

    /// Ask the engine what a scan from this robot returns. Yields -1 if the
    /// robot is not part of the world.
    pub fn scan_query(&self, world: &mut World, degree: f32, resolution: f32) -> f32 {
        world
            .scan_result(self.id, degree, resolution)
            .unwrap_or(-1.0)
    }
}
