// The Controls a robot sees during its tick, backed by the engine's world

use crate::engine::World;
use crate::proxy::RobotProxy;
use crate::robot::{Controls, RobotState};

pub(crate) struct TickContext<'a> {
    proxy: &'a RobotProxy,
    world: &'a mut World,
    index: usize,
}

impl<'a> TickContext<'a> {
    pub(crate) fn new(proxy: &'a RobotProxy, world: &'a mut World, index: usize) -> Self {
        debug_assert!(index < world.robots.len());
        TickContext {
            proxy,
            world,
            index,
        }
    }

    fn state(&self) -> &RobotState {
        &self.world.robots[self.index]
    }

    fn state_mut(&mut self) -> &mut RobotState {
        &mut self.world.robots[self.index]
    }
}

impl Controls for TickContext<'_> {
    fn drive(&mut self, degree: f32, speed: f32) {
        self.state_mut().drive(degree, speed);
    }

    fn scan(&mut self, degree: f32, resolution: f32) -> f32 {
        if !self.state_mut().try_scan(degree, resolution) {
            return -1.0;
        }
        self.proxy.scan_query(self.world, degree, resolution)
    }

    fn cannon(&mut self, degree: f32, range: f32) -> bool {
        self.state_mut().register_shot(degree, range)
    }

    fn damage(&self) -> u32 {
        self.state().damage() as u32
    }

    fn speed(&self) -> f32 {
        self.state().speed()
    }

    fn facing(&self) -> f32 {
        self.state().facing()
    }

    fn loc_x(&self) -> u32 {
        self.state().loc_x()
    }

    fn loc_y(&self) -> u32 {
        self.state().loc_y()
    }

    fn rand(&mut self, limit: u32) -> u32 {
        self.state_mut().rand(limit)
    }

    fn arena_dimensions(&self) -> (u32, u32) {
        self.proxy.arena_dimensions()
    }
}
