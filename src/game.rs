use crate::engine::{Engine, MatchState};
use log::info;
use std::io::{self, BufRead};
use std::thread;
use std::time::Duration;

/// How the headless runner paces and reports a match
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GameSettings {
    pub max_ticks: u64,
    /// Minimum wall-clock time per tick; zero runs flat out
    pub tick_duration: Duration,
    /// Wait for a line on the pause input after every tick with scan contacts
    pub pause_on_scan: bool,
    /// Log a status line every this many ticks; zero disables it
    pub status_every: u64,
}

/// The Game struct drives a loaded engine to completion
pub struct Game {
    engine: Engine,
    settings: GameSettings,
}

impl Game {
    pub fn new(engine: Engine, settings: GameSettings) -> Self {
        Game { engine, settings }
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// Run until game over or the tick limit, pausing on stdin when asked to
    pub fn run(&mut self) -> MatchState {
        let stdin = io::stdin();
        let mut input = stdin.lock();
        self.run_with(&mut input)
    }

    pub fn run_with<R: BufRead>(&mut self, pause_input: &mut R) -> MatchState {
        info!(
            "Starting match: {} robots, up to {} ticks, seed {}",
            self.engine.robots().len(),
            self.settings.max_ticks,
            self.engine.seed()
        );
        let mut pausing = self.settings.pause_on_scan;
        let mut state = self.engine.state();

        while state == MatchState::Running && self.engine.ticks() < self.settings.max_ticks {
            state = self.engine.tick();

            if self.settings.status_every > 0 && self.engine.ticks() % self.settings.status_every == 0 {
                self.report_status();
            }
            if pausing && self.report_contacts() {
                info!("Press Enter to continue");
                let mut line = String::new();
                // EOF or a broken input stops further pauses
                if !matches!(pause_input.read_line(&mut line), Ok(n) if n > 0) {
                    pausing = false;
                }
            }
            if !self.settings.tick_duration.is_zero() {
                thread::sleep(self.settings.tick_duration);
            }
        }

        self.announce(state);
        state
    }

    // Returns whether anything was seen this tick
    fn report_contacts(&self) -> bool {
        let mut seen = false;
        for robot in self.engine.robots() {
            for contact in robot.contacts() {
                info!("Robot {} ({}): {}", robot.id(), robot.name(), contact);
                seen = true;
            }
        }
        seen
    }

    fn report_status(&self) {
        info!(
            "Tick {}: {} of {} robots alive, {} shots fired",
            self.engine.ticks(),
            self.engine.alive_count(),
            self.engine.robots().len(),
            self.engine.shots().len()
        );
        for robot in self.engine.robots() {
            info!(
                "Robot {} ({}) at ({}, {}) facing {:.0} speed {:.0} damage {:.0}",
                robot.id(),
                robot.name(),
                robot.loc_x(),
                robot.loc_y(),
                robot.facing(),
                robot.speed(),
                robot.damage()
            );
        }
    }

    fn announce(&self, state: MatchState) {
        match state {
            MatchState::GameOver { winner: Some(id) } => {
                let name = self.engine.robot(id).map(|r| r.name()).unwrap_or("?");
                info!("Robot {} ({}) Wins! after {} ticks", id, name, self.engine.ticks());
            }
            MatchState::GameOver { winner: None } => {
                info!("Draw! after {} ticks", self.engine.ticks());
            }
            MatchState::Running => {
                info!(
                    "Tick limit of {} reached with {} robots alive",
                    self.settings.max_ticks,
                    self.engine.alive_count()
                );
            }
            MatchState::Loading => info!("No robots loaded, nothing to run"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::Arena;
    use crate::engine::{EngineOptions, LoadedRobot};
    use crate::proxy::RobotProxy;
    use crate::robot::{Controls, Robot};
    use std::io::Cursor;

    // Scans straight along +X every tick
    struct Spotter;

    impl Robot for Spotter {
        fn name(&self) -> &str {
            "Spotter"
        }

        fn tick(&mut self, ctl: &mut dyn Controls) {
            ctl.scan(0.0, 10.0);
        }
    }

    fn settings(max_ticks: u64) -> GameSettings {
        GameSettings {
            max_ticks,
            tick_duration: Duration::ZERO,
            pause_on_scan: false,
            status_every: 0,
        }
    }

    fn spotter_match() -> Engine {
        let arena = Arena::new(100, 100).unwrap();
        let mut engine = Engine::new(
            arena,
            EngineOptions {
                seed: Some(5),
                ..EngineOptions::default()
            },
        );
        let robots = (1..=2)
            .map(|id| LoadedRobot {
                proxy: RobotProxy::new(id, arena),
                robot: Box::new(Spotter) as Box<dyn Robot>,
            })
            .collect();
        engine.load(robots).unwrap();
        engine.robot_mut(1).place(20.0, 50.0);
        engine.robot_mut(2).place(80.0, 50.0);
        engine
    }

    #[test]
    fn test_stops_at_tick_limit() {
        let mut game = Game::new(spotter_match(), settings(25));
        let state = game.run_with(&mut Cursor::new(Vec::new()));
        assert_eq!(state, MatchState::Running);
        assert_eq!(game.engine().ticks(), 25);
    }

    #[test]
    fn test_stops_at_game_over() {
        let mut engine = spotter_match();
        engine
            .robot_mut(2)
            .take_damage(100.0, crate::robot::DamageCause::Cannon);
        engine.robot_mut(1).take_damage(100.0, crate::robot::DamageCause::Cannon);
        let mut game = Game::new(engine, settings(1000));
        let state = game.run_with(&mut Cursor::new(Vec::new()));
        assert_eq!(state, MatchState::GameOver { winner: None });
        assert_eq!(game.engine().ticks(), 1);
    }

    #[test]
    fn test_pause_on_scan_consumes_input_until_eof() {
        let mut game = Game::new(
            spotter_match(),
            GameSettings {
                pause_on_scan: true,
                status_every: 5,
                ..settings(30)
            },
        );
        // Scans land on ticks 1, 11 and 21; only two lines of input are available
        let mut input = Cursor::new(b"\n\n".to_vec());
        game.run_with(&mut input);
        assert_eq!(input.position(), 2);
        assert_eq!(game.engine().ticks(), 30);
    }
}
