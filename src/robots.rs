//! Built-in robots, loadable by name without a shared library.

use crate::loader::Loader;
use crate::proxy::RobotProxy;
use crate::robot::{Controls, Robot};
use crate::utils::bearing;

/// Drives back and forth along the X axis, turning around near the side walls.
pub struct Dummy {
    proxy: RobotProxy,
}

impl Dummy {
    pub fn new(proxy: RobotProxy) -> Self {
        Dummy { proxy }
    }
}

impl Robot for Dummy {
    fn name(&self) -> &str {
        "Dummy"
    }

    fn tick(&mut self, ctl: &mut dyn Controls) {
        let (width, _) = self.proxy.arena_dimensions();
        let (width, x) = (u64::from(width), u64::from(ctl.loc_x()));

        let mut facing = ctl.facing().round() as u32;
        if facing != 0 && facing != 180 {
            facing = 0;
        }
        if x > width * 95 / 100 {
            facing = 180;
        } else if x < width * 5 / 100 {
            facing = 0;
        }
        ctl.drive(facing as f32, 100.0);
    }
}

const SWEEP_WIDTH: f32 = 20.0;
const WANDER_TICKS: u32 = 200;

/// Sweeps its scanner around, shoots at whatever it finds and wanders about.
pub struct Doofus {
    proxy: RobotProxy,
    scan_dir: f32,
    heading: f32,
    ticks_on_heading: u32,
}

impl Doofus {
    pub fn new(proxy: RobotProxy) -> Self {
        Doofus {
            proxy,
            scan_dir: 0.0,
            heading: 0.0,
            ticks_on_heading: WANDER_TICKS,
        }
    }

    fn near_wall(&self, x: u32, y: u32) -> bool {
        let (width, height) = self.proxy.arena_dimensions();
        let margin_x = width / 10;
        let margin_y = height / 10;
        x < margin_x || x > width - margin_x || y < margin_y || y > height - margin_y
    }
}

impl Robot for Doofus {
    fn name(&self) -> &str {
        "Doofus"
    }

    fn tick(&mut self, ctl: &mut dyn Controls) {
        let range = ctl.scan(self.scan_dir, SWEEP_WIDTH);
        if range > 0.0 {
            // Keep the scanner on target and fire
            ctl.cannon(self.scan_dir, range);
        } else if range == 0.0 {
            self.scan_dir = (self.scan_dir + SWEEP_WIDTH) % 360.0;
        }

        let (x, y) = (ctl.loc_x(), ctl.loc_y());
        self.ticks_on_heading += 1;
        if self.near_wall(x, y) {
            let (width, height) = self.proxy.arena_dimensions();
            self.heading = bearing(x as f32, y as f32, width as f32 / 2.0, height as f32 / 2.0);
            self.ticks_on_heading = 0;
        } else if self.ticks_on_heading >= WANDER_TICKS {
            self.heading = (ctl.rand(360) - 1) as f32;
            self.ticks_on_heading = 0;
        }
        ctl.drive(self.heading, 50.0);
    }
}

fn build_dummy(proxy: RobotProxy) -> Box<dyn Robot> {
    Box::new(Dummy::new(proxy))
}

fn build_doofus(proxy: RobotProxy) -> Box<dyn Robot> {
    Box::new(Doofus::new(proxy))
}

/// Make the built-in robots available to `loader` by name.
pub fn register_builtins(loader: &mut Loader) {
    loader.register_builtin("Dummy", build_dummy);
    loader.register_builtin("Doofus", build_doofus);
}
