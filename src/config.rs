//! Configuration constants for the robot arena simulation.

// Arena
pub const DEFAULT_ARENA_WIDTH: u32 = 1000;
pub const DEFAULT_ARENA_HEIGHT: u32 = 1000;
pub const DEFAULT_PLACEMENT_MARGIN: u32 = 1; // Keep spawn points off the clamped edge
pub const WALL_CLEARANCE: f32 = 1.0; // Robots are clamped into [1, dimension - 1]

// Movement
pub const SPEED_SCALE: f32 = 200.0; // Percent-speed divisor giving arena units per tick
pub const MAX_SPEED: f32 = 100.0;
pub const DEFAULT_ACCELERATION: f32 = 10.0; // Percent per tick
pub const DEFAULT_BRAKING: f32 = 20.0; // Percent per tick
pub const DEFAULT_TURN_RATE: f32 = 15.0; // Degrees per tick

// Damage
pub const DEAD_DAMAGE: f32 = 100.0;
pub const WALL_DAMAGE: f32 = 2.0; // Damage per tick spent hitting a wall

// Scanner
pub const MIN_SCAN_RESOLUTION: f32 = 10.0; // Full cone width in degrees
pub const DEFAULT_TICKS_PER_SCAN: u32 = 10;

// Cannon
pub const DEFAULT_CANNON_RELOAD_TICKS: u32 = 15;
pub const DEFAULT_CANNON_MAX_RANGE: f32 = 700.0;
pub const DEFAULT_SHOT_SPEED: f32 = 10.0; // Arena units per tick, once flight exists

// Game rules
pub const DEFAULT_MIN_ALIVE: usize = 1; // Match ends when fewer robots than this are alive
pub const MAX_ROBOTS: usize = 4;
pub const DEFAULT_MAX_TICKS: u64 = 10_000;
pub const DEFAULT_TICK_MS: u64 = 0; // Headless runs go as fast as possible
