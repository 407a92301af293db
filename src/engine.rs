use crate::arena::Arena;
use crate::config;
use crate::context::TickContext;
use crate::error::EngineError;
use crate::proxy::RobotProxy;
use crate::robot::{Robot, RobotProfile, RobotState, RobotView};
use crate::scan;
use crate::shot::{Ballistics, InertBallistics, Shot};
use log::{info, warn};
use rand::prelude::*;
use rand::rngs::StdRng;
use std::collections::HashSet;

/// Where a match stands after the last tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchState {
    Loading,
    Running,
    /// Fewer robots than the survival threshold remain. `winner` is the sole
    /// survivor when exactly one robot is still alive.
    GameOver { winner: Option<u32> },
}

/// Debug and rule options fixed at engine construction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineOptions {
    /// Robots take no damage at all
    pub indestructible: bool,
    /// Robots spawn within [margin, dimension - margin]
    pub placement_margin: u32,
    /// The match ends once fewer than this many robots are alive
    pub min_alive: usize,
    /// Seed for placement and robot RNGs; drawn from entropy when unset
    pub seed: Option<u64>,
    pub profile: RobotProfile,
}

impl Default for EngineOptions {
    fn default() -> Self {
        EngineOptions {
            indestructible: false,
            placement_margin: config::DEFAULT_PLACEMENT_MARGIN,
            min_alive: config::DEFAULT_MIN_ALIVE,
            seed: None,
            profile: RobotProfile::default(),
        }
    }
}

/// A robot instance paired with the proxy it was built with
pub struct LoadedRobot {
    pub proxy: RobotProxy,
    pub robot: Box<dyn Robot>,
}

/// Owned copy of committed match state, safe to hand to another thread
#[derive(Debug, Clone, PartialEq)]
pub struct MatchSnapshot {
    pub tick: u64,
    pub state: MatchState,
    pub arena: Arena,
    pub robots: Vec<RobotView>,
    pub shots: Vec<Shot>,
}

/// The part of the engine a robot's proxy may query: the arena and every
/// robot's state, in load order.
#[derive(Debug)]
pub struct World {
    pub(crate) arena: Arena,
    pub(crate) robots: Vec<RobotState>,
}

impl World {
    fn new(arena: Arena) -> Self {
        World {
            arena,
            robots: Vec::new(),
        }
    }

    pub(crate) fn index_of(&self, robot_id: u32) -> Option<usize> {
        self.robots.iter().position(|r| r.id == robot_id)
    }

    pub(crate) fn scan_result(&mut self, robot_id: u32, degree: f32, resolution: f32) -> Option<f32> {
        let index = self.index_of(robot_id)?;
        Some(scan::sweep(&mut self.robots, index, degree, resolution))
    }
}

/// The simulation authority: owns the arena, the robots and the shots, and
/// runs the tick pipeline.
pub struct Engine {
    world: World,
    brains: Vec<Box<dyn Robot>>,
    proxies: Vec<RobotProxy>,
    shots: Vec<Shot>,
    ballistics: Box<dyn Ballistics>,
    options: EngineOptions,
    state: MatchState,
    ticks: u64,
    seed: u64,
    rng: StdRng,
}

impl Engine {
    pub fn new(arena: Arena, options: EngineOptions) -> Self {
        let seed = options
            .seed
            .unwrap_or_else(|| rand::thread_rng().r#gen::<u64>());
        info!(
            "Engine created: arena {}x{}, seed {}",
            arena.width(),
            arena.height(),
            seed
        );
        Engine {
            world: World::new(arena),
            brains: Vec::new(),
            proxies: Vec::new(),
            shots: Vec::new(),
            ballistics: Box::new(InertBallistics),
            options,
            state: MatchState::Loading,
            ticks: 0,
            seed,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Replace the shot flight/detonation model.
    pub fn set_ballistics(&mut self, ballistics: Box<dyn Ballistics>) {
        self.ballistics = ballistics;
    }

    /// Take ownership of the robots and place them at random spots in the arena.
    pub fn load(&mut self, robots: Vec<LoadedRobot>) -> Result<(), EngineError> {
        if self.state != MatchState::Loading {
            return Err(EngineError::AlreadyLoaded);
        }
        if robots.is_empty() {
            return Err(EngineError::NoRobots);
        }
        let mut seen = HashSet::new();
        for loaded in &robots {
            if !seen.insert(loaded.proxy.id()) {
                return Err(EngineError::DuplicateRobot(loaded.proxy.id()));
            }
        }
        let arena = self.world.arena;
        let margin = self.options.placement_margin;
        if margin.saturating_mul(2) > arena.width() || margin.saturating_mul(2) > arena.height() {
            return Err(EngineError::MarginTooLarge {
                margin,
                width: arena.width(),
                height: arena.height(),
            });
        }

        info!(
            "Engine::load: {} robots, arena {}x{}",
            robots.len(),
            arena.width(),
            arena.height()
        );
        for LoadedRobot { proxy, robot } in robots {
            if proxy.arena_dimensions() != arena.dimensions() {
                warn!(
                    "Robot {} was built for a {:?} arena, engine arena is {:?}",
                    proxy.id(),
                    proxy.arena_dimensions(),
                    arena.dimensions()
                );
            }
            let robot_rng = StdRng::seed_from_u64(robot_seed(self.seed, proxy.id()));
            let mut state =
                RobotState::new(proxy.id(), robot.name().to_string(), self.options.profile, robot_rng);
            state.indestructible = self.options.indestructible;

            let x = self
                .rng
                .gen_range(margin as f32..=(arena.width() - margin) as f32);
            let y = self
                .rng
                .gen_range(margin as f32..=(arena.height() - margin) as f32);
            state.place(x, y);
            info!(
                "Robot {} ({}) placed at ({:.1}, {:.1})",
                state.id, state.name, x, y
            );

            self.world.robots.push(state);
            self.proxies.push(proxy);
            self.brains.push(robot);
        }
        self.state = MatchState::Running;
        Ok(())
    }

    /// Advance the match by one tick. Does nothing unless the match is running.
    pub fn tick(&mut self) -> MatchState {
        if self.state != MatchState::Running {
            return self.state;
        }
        self.ticks += 1;
        crate::debug_engine!("Tick {} on {} robots", self.ticks, self.world.robots.len());

        for robot in &mut self.world.robots {
            robot.begin_tick();
        }
        self.run_robots();

        let arena = self.world.arena;
        for robot in &mut self.world.robots {
            robot.move_robot(&arena);
        }
        for robot in &mut self.world.robots {
            robot.accel_robot();
        }
        self.add_shots();
        self.ballistics.move_shots_in_flight(&mut self.shots, &arena);
        self.ballistics
            .detonate_shots(&mut self.shots, &mut self.world.robots);

        self.update_arena()
    }

    // Robot callbacks run against pre-move positions; movement happens after all of them.
    fn run_robots(&mut self) {
        for (index, brain) in self.brains.iter_mut().enumerate() {
            let robot = &self.world.robots[index];
            if robot.is_dead() {
                continue;
            }
            crate::debug_robot!(robot.id, "tick at ({}, {})", robot.loc_x(), robot.loc_y());
            let mut ctx = TickContext::new(&self.proxies[index], &mut self.world, index);
            brain.tick(&mut ctx);
        }
    }

    fn add_shots(&mut self) {
        for robot in &mut self.world.robots {
            if let Some(shot) = robot.take_shot() {
                crate::debug_weapon!(
                    robot.id,
                    "shot away: facing {:.1}, range {:.1}",
                    shot.facing,
                    shot.range
                );
                self.shots.push(shot);
            }
        }
    }

    pub fn add_shot(&mut self, shot: Shot) {
        self.shots.push(shot);
    }

    fn update_arena(&mut self) -> MatchState {
        for robot in &mut self.world.robots {
            robot.commit_move();
        }
        let alive: Vec<u32> = self
            .world
            .robots
            .iter()
            .filter(|r| !r.is_dead())
            .map(|r| r.id)
            .collect();
        if alive.len() < self.options.min_alive {
            let winner = match alive.as_slice() {
                [sole] => Some(*sole),
                _ => None,
            };
            self.game_over(winner);
        }
        self.state
    }

    fn game_over(&mut self, winner: Option<u32>) {
        match winner {
            Some(id) => info!("Game over after {} ticks: robot {} wins", self.ticks, id),
            None => info!("Game over after {} ticks: no survivors", self.ticks),
        }
        self.state = MatchState::GameOver { winner };
    }

    /// Scan from `robot_id`'s current position. See [`crate::robot::Controls::scan`]
    /// for the meaning of the result; no rate limit applies here.
    pub fn scan_result(&mut self, robot_id: u32, degree: f32, resolution: f32) -> Result<f32, EngineError> {
        self.world
            .scan_result(robot_id, degree, resolution)
            .ok_or(EngineError::UnknownRobot(robot_id))
    }

    // --- Read accessors, valid until the next tick ---

    pub fn arena(&self) -> Arena {
        self.world.arena
    }

    pub fn robots(&self) -> &[RobotState] {
        &self.world.robots
    }

    pub fn robot(&self, robot_id: u32) -> Result<&RobotState, EngineError> {
        self.world
            .index_of(robot_id)
            .map(|i| &self.world.robots[i])
            .ok_or(EngineError::UnknownRobot(robot_id))
    }

    pub fn shots(&self) -> &[Shot] {
        &self.shots
    }

    pub fn state(&self) -> MatchState {
        self.state
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn alive_count(&self) -> usize {
        self.world.robots.iter().filter(|r| !r.is_dead()).count()
    }

    pub fn snapshot(&self) -> MatchSnapshot {
        MatchSnapshot {
            tick: self.ticks,
            state: self.state,
            arena: self.world.arena,
            robots: self.world.robots.iter().map(RobotState::view).collect(),
            shots: self.shots.clone(),
        }
    }

    #[cfg(test)]
    pub(crate) fn robot_mut(&mut self, robot_id: u32) -> &mut RobotState {
        let index = self.world.index_of(robot_id).expect("unknown robot");
        &mut self.world.robots[index]
    }
}

// Each robot gets its own stream, keyed by the match seed and its id
fn robot_seed(match_seed: u64, robot_id: u32) -> u64 {
    match_seed ^ (robot_id as u64 + 1).wrapping_mul(0x9E37_79B9_7F4A_7C15)
}
