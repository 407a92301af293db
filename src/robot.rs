use crate::arena::Arena;
use crate::config;
use crate::shot::Shot;
use crate::utils::{approach, normalize_degrees, shortest_turn};
use rand::prelude::*;
use rand::rngs::StdRng;
use std::fmt;

/// A robot brain. Third-party code implements this and nothing else; every
/// interaction with the arena goes through the [`Controls`] handed to `tick`.
pub trait Robot {
    fn name(&self) -> &str;

    /// Called once per engine tick while the robot is alive. Actuator calls
    /// overwrite each other: only the last `drive` or `cannon` of a tick counts.
    fn tick(&mut self, ctl: &mut dyn Controls);
}

/// The sensor/actuator API available to a robot during its `tick`.
pub trait Controls {
    /// Set the desired heading (wrapped into 0-359) and speed (clamped to 0-100).
    /// Speed and facing change gradually according to the robot's profile.
    fn drive(&mut self, degree: f32, speed: f32);

    /// Look for robots within `resolution / 2` degrees of `degree` (the cone is
    /// never narrower than 10 degrees). Returns the range to the closest one,
    /// 0 if nothing was seen, or -1 if the scanner is still cooling down or
    /// there is nobody else in the arena.
    fn scan(&mut self, degree: f32, resolution: f32) -> f32;

    /// Register a cannon shot for this tick. Returns false while reloading.
    fn cannon(&mut self, degree: f32, range: f32) -> bool;

    /// Damage taken so far; 100 or more means disabled.
    fn damage(&self) -> u32;

    /// Actual speed, which may lag behind the last `drive`.
    fn speed(&self) -> f32;

    /// Actual facing, which may lag behind the last `drive`.
    fn facing(&self) -> f32;

    fn loc_x(&self) -> u32;
    fn loc_y(&self) -> u32;

    /// Uniform random integer in [1, limit]; 0 when `limit` is 0.
    fn rand(&mut self, limit: u32) -> u32;

    fn arena_dimensions(&self) -> (u32, u32);
}

// What finished off a robot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageCause {
    Wall,
    Cannon,
}

// Snapshot of a robot at the moment its damage reached 100
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeathData {
    pub cause: DamageCause,
    pub x: f32,
    pub y: f32,
    pub damage: f32,
    pub heading: f32,
}

// One scan hit, kept for debug overlays until the next tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactDetails {
    pub from_x: f32,
    pub from_y: f32,
    pub to_x: f32,
    pub to_y: f32,
    pub bearing: f32,
    pub range: f32,
}

impl fmt::Display for ContactDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "contact ({:.1}, {:.1}) -> ({:.1}, {:.1}) bearing {:.1} range {:.1}",
            self.from_x, self.from_y, self.to_x, self.to_y, self.bearing, self.range
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CannonState {
    Ready,
    Firing, // Shot registered this tick
    Reloading(u32),
}

// Performance parameters. Everyone gets the same ones for now.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RobotProfile {
    pub acceleration: f32,
    pub braking: f32,
    pub turn_rate: f32,
    pub ticks_per_scan: u32,
    pub cannon_reload_ticks: u32,
    pub cannon_max_range: f32,
    pub shot_speed: f32,
}

impl Default for RobotProfile {
    fn default() -> Self {
        RobotProfile {
            acceleration: config::DEFAULT_ACCELERATION,
            braking: config::DEFAULT_BRAKING,
            turn_rate: config::DEFAULT_TURN_RATE,
            ticks_per_scan: config::DEFAULT_TICKS_PER_SCAN,
            cannon_reload_ticks: config::DEFAULT_CANNON_RELOAD_TICKS,
            cannon_max_range: config::DEFAULT_CANNON_MAX_RANGE,
            shot_speed: config::DEFAULT_SHOT_SPEED,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingShot {
    pub degree: f32,
    pub range: f32,
    pub speed: f32,
}

// Engine-owned state of one robot
#[derive(Debug, Clone)]
pub struct RobotState {
    pub(crate) id: u32,
    pub(crate) name: String,
    // Authoritative position. LocX/LocY round these off.
    pub(crate) current_x: f32,
    pub(crate) current_y: f32,
    // Post-move position, committed at the end of the tick
    pub(crate) next_x: f32,
    pub(crate) next_y: f32,
    pub(crate) facing: f32,
    pub(crate) desired_facing: f32,
    pub(crate) speed: f32,
    pub(crate) desired_speed: f32,
    pub(crate) profile: RobotProfile,
    pub(crate) damage: f32,
    pub(crate) indestructible: bool,
    pub(crate) cannon_reload_remaining: u32,
    pub(crate) pending_shot: Option<PendingShot>,
    pub(crate) death: Option<DeathData>,
    pub(crate) scan_cooldown_remaining: u32,
    pub(crate) scan_dir: f32,
    pub(crate) scan_resolution: f32,
    pub(crate) contacts: Vec<ContactDetails>,
    // Seen by another robot's scan this tick
    pub(crate) detected: bool,
    pub(crate) rng: StdRng,
}

impl RobotState {
    pub fn new(id: u32, name: String, profile: RobotProfile, rng: StdRng) -> Self {
        RobotState {
            id,
            name,
            current_x: 0.0,
            current_y: 0.0,
            next_x: 0.0,
            next_y: 0.0,
            facing: 0.0,
            desired_facing: 0.0,
            speed: 0.0,
            desired_speed: 0.0,
            profile,
            damage: 0.0,
            indestructible: false,
            cannon_reload_remaining: 0,
            pending_shot: None,
            death: None,
            scan_cooldown_remaining: 0,
            scan_dir: 0.0,
            scan_resolution: config::MIN_SCAN_RESOLUTION,
            contacts: Vec::new(),
            detected: false,
            rng,
        }
    }

    // --- Read accessors (renderer and tests) ---

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn x(&self) -> f32 {
        self.current_x
    }

    pub fn y(&self) -> f32 {
        self.current_y
    }

    pub fn next_position(&self) -> (f32, f32) {
        (self.next_x, self.next_y)
    }

    pub fn facing(&self) -> f32 {
        self.facing
    }

    pub fn desired_facing(&self) -> f32 {
        self.desired_facing
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn desired_speed(&self) -> f32 {
        self.desired_speed
    }

    pub fn damage(&self) -> f32 {
        self.damage
    }

    pub fn is_dead(&self) -> bool {
        self.damage >= config::DEAD_DAMAGE
    }

    pub fn is_detected(&self) -> bool {
        self.detected
    }

    pub fn contacts(&self) -> &[ContactDetails] {
        &self.contacts
    }

    pub fn death_data(&self) -> Option<DeathData> {
        self.death
    }

    pub fn scan_sweep(&self) -> (f32, f32) {
        (self.scan_dir, self.scan_resolution)
    }

    pub fn pending_shot(&self) -> Option<PendingShot> {
        self.pending_shot
    }

    pub fn cannon_state(&self) -> CannonState {
        if self.cannon_reload_remaining > 0 {
            CannonState::Reloading(self.cannon_reload_remaining)
        } else if self.pending_shot.is_some() {
            CannonState::Firing
        } else {
            CannonState::Ready
        }
    }

    pub fn loc_x(&self) -> u32 {
        self.current_x.round().max(0.0) as u32
    }

    pub fn loc_y(&self) -> u32 {
        self.current_y.round().max(0.0) as u32
    }

    // --- Engine-side mutation ---

    pub(crate) fn place(&mut self, x: f32, y: f32) {
        self.current_x = x;
        self.current_y = y;
        self.next_x = x;
        self.next_y = y;
    }

    /// Per-tick counter maintenance, run for every robot before any callback.
    pub(crate) fn begin_tick(&mut self) {
        self.scan_cooldown_remaining = self.scan_cooldown_remaining.saturating_sub(1);
        self.cannon_reload_remaining = self.cannon_reload_remaining.saturating_sub(1);
        self.pending_shot = None;
        self.contacts.clear();
        self.detected = false;
    }

    pub(crate) fn drive(&mut self, degree: f32, speed: f32) {
        self.desired_facing = normalize_degrees(degree);
        self.desired_speed = speed.clamp(0.0, config::MAX_SPEED);
        crate::debug_drive!(
            self.id,
            "drive: desired facing {:.1}, desired speed {:.1}",
            self.desired_facing,
            self.desired_speed
        );
    }

    /// Consumes the scanner's cooldown. Returns false if a scan is not allowed yet.
    pub(crate) fn try_scan(&mut self, degree: f32, resolution: f32) -> bool {
        if self.scan_cooldown_remaining > 0 {
            crate::debug_scan!(
                self.id,
                "scan refused, {} ticks of cooldown left",
                self.scan_cooldown_remaining
            );
            return false;
        }
        self.scan_cooldown_remaining = self.profile.ticks_per_scan;
        self.scan_dir = normalize_degrees(degree);
        self.scan_resolution = resolution.max(config::MIN_SCAN_RESOLUTION);
        true
    }

    pub(crate) fn register_shot(&mut self, degree: f32, range: f32) -> bool {
        if self.is_dead() || self.cannon_reload_remaining > 0 {
            crate::debug_weapon!(
                self.id,
                "cannon not ready ({} ticks of reload left)",
                self.cannon_reload_remaining
            );
            return false;
        }
        let shot = PendingShot {
            degree: normalize_degrees(degree),
            range: range.clamp(0.0, self.profile.cannon_max_range),
            speed: self.profile.shot_speed,
        };
        crate::debug_weapon!(
            self.id,
            "shot registered: degree {:.1}, range {:.1}",
            shot.degree,
            shot.range
        );
        self.pending_shot = Some(shot);
        true
    }

    /// Stage the next position from the current speed and facing.
    pub(crate) fn move_robot(&mut self, arena: &Arena) {
        if self.is_dead() {
            self.speed = 0.0;
            self.next_x = self.current_x;
            self.next_y = self.current_y;
            return;
        }
        let actual_speed = self.speed / config::SPEED_SCALE;
        let angle_rad = self.facing.to_radians();
        let tentative_x = self.current_x + actual_speed * angle_rad.cos();
        let tentative_y = self.current_y + actual_speed * angle_rad.sin();
        let (x, y, clamped) = arena.clamp_point(tentative_x, tentative_y);
        self.next_x = x;
        self.next_y = y;
        if clamped {
            self.hit_the_wall();
        }
    }

    fn hit_the_wall(&mut self) {
        crate::debug_drive!(
            self.id,
            "hit the wall at ({:.2}, {:.2})",
            self.next_x,
            self.next_y
        );
        self.take_damage(config::WALL_DAMAGE, DamageCause::Wall);
    }

    /// Add damage from `cause`, capped at 100. Ignored for indestructible or dead robots.
    pub fn take_damage(&mut self, amount: f32, cause: DamageCause) {
        if self.indestructible || self.is_dead() {
            return;
        }
        self.damage = (self.damage + amount).min(config::DEAD_DAMAGE);
        if self.is_dead() {
            self.death = Some(DeathData {
                cause,
                x: self.next_x,
                y: self.next_y,
                damage: config::DEAD_DAMAGE,
                heading: self.facing,
            });
            self.speed = 0.0;
            self.desired_speed = 0.0;
            log::info!("Robot {} ({}) destroyed by {:?}", self.id, self.name, cause);
        }
    }

    /// Move speed and facing toward their desired values by at most one tick's worth.
    pub(crate) fn accel_robot(&mut self) {
        if self.is_dead() {
            self.speed = 0.0;
            return;
        }
        let rate = if self.desired_speed >= self.speed {
            self.profile.acceleration
        } else {
            self.profile.braking
        };
        self.speed = approach(self.speed, self.desired_speed, rate);

        let turn = shortest_turn(self.facing, self.desired_facing);
        if turn.abs() <= self.profile.turn_rate {
            self.facing = self.desired_facing;
        } else {
            self.facing = normalize_degrees(self.facing + self.profile.turn_rate.copysign(turn));
        }
    }

    /// Turn a registered cannon shot into a shot in flight and start reloading.
    pub(crate) fn take_shot(&mut self) -> Option<Shot> {
        if self.is_dead() {
            return None;
        }
        let pending = self.pending_shot.take()?;
        self.cannon_reload_remaining = self.profile.cannon_reload_ticks;
        Some(Shot::new(
            self.id,
            self.current_x,
            self.current_y,
            pending.degree,
            pending.speed,
            pending.range,
        ))
    }

    pub(crate) fn commit_move(&mut self) {
        self.current_x = self.next_x;
        self.current_y = self.next_y;
    }

    pub(crate) fn rand(&mut self, limit: u32) -> u32 {
        if limit == 0 {
            return 0;
        }
        self.rng.gen_range(1..=limit)
    }

    pub fn view(&self) -> RobotView {
        RobotView {
            id: self.id,
            name: self.name.clone(),
            x: self.current_x,
            y: self.current_y,
            facing: self.facing,
            speed: self.speed,
            damage: self.damage,
            alive: !self.is_dead(),
            detected: self.detected,
            scan_dir: self.scan_dir,
            scan_resolution: self.scan_resolution,
            contacts: self.contacts.clone(),
            death: self.death,
        }
    }
}

// Plain copy of the display-relevant parts of a robot
#[derive(Debug, Clone, PartialEq)]
pub struct RobotView {
    pub id: u32,
    pub name: String,
    pub x: f32,
    pub y: f32,
    pub facing: f32,
    pub speed: f32,
    pub damage: f32,
    pub alive: bool,
    pub detected: bool,
    pub scan_dir: f32,
    pub scan_resolution: f32,
    pub contacts: Vec<ContactDetails>,
    pub death: Option<DeathData>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;
    use proptest::prelude::*;

    fn test_robot() -> RobotState {
        RobotState::new(
            1,
            "Test".to_string(),
            RobotProfile::default(),
            StdRng::seed_from_u64(7),
        )
    }

    fn arena() -> Arena {
        Arena::new(100, 100).unwrap()
    }

    #[test]
    fn test_drive_wraps_and_clamps() {
        let mut robot = test_robot();
        robot.drive(-90.0, 150.0);
        assert_approx_eq!(robot.desired_facing, 270.0);
        assert_eq!(robot.desired_speed, 100.0);
        robot.drive(725.0, -5.0);
        assert_approx_eq!(robot.desired_facing, 5.0);
        assert_eq!(robot.desired_speed, 0.0);
    }

    #[test]
    fn test_drive_last_call_wins() {
        let mut robot = test_robot();
        robot.drive(10.0, 50.0);
        robot.drive(90.0, 100.0);
        assert_eq!(robot.desired_facing, 90.0);
        assert_eq!(robot.desired_speed, 100.0);
    }

    #[test]
    fn test_move_follows_facing() {
        let mut robot = test_robot();
        robot.place(50.0, 50.0);
        robot.speed = 100.0;
        robot.facing = 90.0;
        robot.move_robot(&arena());
        assert_approx_eq!(robot.next_x, 50.0, 1e-4);
        assert_approx_eq!(robot.next_y, 50.5, 1e-4);
        // Not committed yet
        assert_eq!(robot.current_y, 50.0);
        robot.commit_move();
        assert_approx_eq!(robot.current_y, 50.5, 1e-4);
    }

    #[test]
    fn test_wall_hit_clamps_and_damages_once() {
        let mut robot = test_robot();
        robot.place(98.9, 98.9);
        robot.speed = 100.0;
        robot.desired_speed = 100.0;
        robot.facing = 45.0;
        robot.move_robot(&arena());
        // Both axes clamp, still one wall hit
        assert_eq!(robot.next_position(), (99.0, 99.0));
        assert_eq!(robot.damage, config::WALL_DAMAGE);
        // Only the damage reading shows the hit
        assert_eq!(robot.speed, 100.0);
        assert_eq!(robot.desired_speed, 100.0);
    }

    #[test]
    fn test_wall_death_records_death_data() {
        let mut robot = test_robot();
        robot.place(1.0, 50.0);
        robot.damage = 99.0;
        robot.speed = 50.0;
        robot.facing = 180.0;
        robot.move_robot(&arena());
        assert!(robot.is_dead());
        let death = robot.death_data().unwrap();
        assert_eq!(death.cause, DamageCause::Wall);
        assert_eq!(death.damage, 100.0);
        assert_eq!((death.x, death.y), (1.0, 50.0));
        assert_eq!(death.heading, 180.0);
    }

    #[test]
    fn test_indestructible_ignores_damage() {
        let mut robot = test_robot();
        robot.indestructible = true;
        robot.take_damage(500.0, DamageCause::Cannon);
        assert_eq!(robot.damage, 0.0);
        assert!(robot.death_data().is_none());
    }

    #[test]
    fn test_dead_robot_does_not_move() {
        let mut robot = test_robot();
        robot.place(50.0, 50.0);
        robot.damage = 100.0;
        robot.speed = 80.0;
        robot.desired_speed = 80.0;
        robot.move_robot(&arena());
        robot.accel_robot();
        assert_eq!(robot.next_position(), (50.0, 50.0));
        assert_eq!(robot.speed, 0.0);
    }

    #[test]
    fn test_speed_uses_braking_when_slowing() {
        let mut robot = test_robot();
        robot.speed = 100.0;
        robot.desired_speed = 0.0;
        robot.accel_robot();
        assert_eq!(robot.speed, 100.0 - config::DEFAULT_BRAKING);
    }

    #[test]
    fn test_turn_crosses_zero() {
        let mut robot = test_robot();
        robot.facing = 5.0;
        robot.desired_facing = 345.0;
        robot.accel_robot();
        // Turns clockwise through 0 rather than 340 degrees the long way
        assert_approx_eq!(robot.facing, 350.0);
        robot.accel_robot();
        assert_eq!(robot.facing, 345.0);
    }

    #[test]
    fn test_cannon_reload_cycle() {
        let mut robot = test_robot();
        let reload = robot.profile.cannon_reload_ticks;
        assert_eq!(robot.cannon_state(), CannonState::Ready);
        assert!(robot.register_shot(0.0, 100.0));
        assert_eq!(robot.cannon_state(), CannonState::Firing);
        assert!(robot.take_shot().is_some());
        assert_eq!(robot.cannon_state(), CannonState::Reloading(reload));

        for _ in 1..reload {
            robot.begin_tick();
            assert!(!robot.register_shot(0.0, 100.0));
            assert!(robot.take_shot().is_none());
        }
        robot.begin_tick();
        assert!(robot.register_shot(0.0, 100.0));
    }

    #[test]
    fn test_cannon_range_clamped_to_max() {
        let mut robot = test_robot();
        robot.profile.cannon_max_range = 700.0;
        assert!(robot.register_shot(370.0, 5000.0));
        let pending = robot.pending_shot().unwrap();
        assert_eq!(pending.range, 700.0);
        assert_approx_eq!(pending.degree, 10.0);

        robot.pending_shot = None;
        robot.profile.cannon_max_range = 250.0;
        assert!(robot.register_shot(0.0, 400.0));
        assert_eq!(robot.pending_shot().unwrap().range, 250.0);
    }

    #[test]
    fn test_scan_cooldown() {
        let mut robot = test_robot();
        robot.profile.ticks_per_scan = 3;
        assert!(robot.try_scan(0.0, 5.0));
        assert_eq!(robot.scan_sweep(), (0.0, config::MIN_SCAN_RESOLUTION));
        robot.begin_tick();
        assert!(!robot.try_scan(0.0, 10.0));
        robot.begin_tick();
        assert!(!robot.try_scan(0.0, 10.0));
        robot.begin_tick();
        assert!(robot.try_scan(0.0, 10.0));
    }

    #[test]
    fn test_rand_range() {
        let mut robot = test_robot();
        assert_eq!(robot.rand(0), 0);
        for _ in 0..200 {
            let value = robot.rand(6);
            assert!((1..=6).contains(&value));
        }
        assert_eq!(robot.rand(1), 1);
    }

    proptest! {
        #[test]
        fn speed_converges_without_overshoot(start in 0.0f32..=100.0, target in 0.0f32..=100.0) {
            let mut robot = test_robot();
            robot.speed = start;
            robot.desired_speed = target;
            let rate = if target >= start { robot.profile.acceleration } else { robot.profile.braking };
            let ticks = ((target - start).abs() / rate).ceil() as usize;
            for _ in 0..ticks {
                robot.accel_robot();
                if target >= start {
                    prop_assert!(robot.speed <= target);
                } else {
                    prop_assert!(robot.speed >= target);
                }
            }
            prop_assert_eq!(robot.speed, target);
        }

        #[test]
        fn facing_takes_shortest_path_and_lands_exactly(
            start in 0.0f32..360.0,
            target in 0.0f32..360.0,
        ) {
            let mut robot = test_robot();
            robot.facing = start;
            robot.desired_facing = target;
            let total = shortest_turn(start, target);
            prop_assert!(total.abs() <= 180.0);
            let mut travelled = 0.0f32;
            for _ in 0..=(180.0 / robot.profile.turn_rate).ceil() as usize {
                let before = robot.facing;
                robot.accel_robot();
                travelled += shortest_turn(before, robot.facing).abs();
                prop_assert!(robot.facing >= 0.0 && robot.facing < 360.0);
            }
            prop_assert_eq!(robot.facing, target);
            prop_assert!(travelled <= 180.0 + 1e-2);
        }

        #[test]
        fn move_never_leaves_drivable_area(
            x in 1.0f32..=99.0,
            y in 1.0f32..=99.0,
            facing in 0.0f32..360.0,
            speed in 0.0f32..=100.0,
        ) {
            let mut robot = test_robot();
            robot.place(x, y);
            robot.facing = facing;
            robot.speed = speed;
            robot.move_robot(&arena());
            let (nx, ny) = robot.next_position();
            prop_assert!((1.0..=99.0).contains(&nx));
            prop_assert!((1.0..=99.0).contains(&ny));
            prop_assert!(robot.damage == 0.0 || robot.damage == config::WALL_DAMAGE);
        }
    }
}
