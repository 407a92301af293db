//! Shots in flight and the ballistics extension point.
//!
//! A [`Shot`] is created when a robot's registered cannon shot is consumed at
//! the tick boundary. Flight and detonation are not modelled yet: the engine
//! hands its shot list to a [`Ballistics`] implementation twice per tick, and
//! the default [`InertBallistics`] leaves every shot exactly where it was
//! fired.

use crate::arena::Arena;
use crate::robot::RobotState;

// This represents a shot in-flight. Only unguided cannon shells exist so far.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shot {
    pub source_robot: u32,
    pub x: f32,
    pub y: f32,
    pub facing: f32,
    pub speed: f32,
    // Range the shot was fired at; it detonates after travelling this far
    pub range: f32,
    pub remaining_range: f32,
}

impl Shot {
    pub fn new(source_robot: u32, x: f32, y: f32, facing: f32, speed: f32, range: f32) -> Self {
        Shot {
            source_robot,
            x,
            y,
            facing,
            speed,
            range,
            remaining_range: range,
        }
    }
}

/// Hooks for the `MoveShotsInFlight` and `DetonateShots` tick phases.
pub trait Ballistics {
    /// Advance every shot by one tick.
    fn move_shots_in_flight(&mut self, _shots: &mut Vec<Shot>, _arena: &Arena) {}

    /// Resolve shots that reached their target, applying damage to robots.
    fn detonate_shots(&mut self, _shots: &mut Vec<Shot>, _robots: &mut [RobotState]) {}
}

/// Shots neither move nor detonate.
#[derive(Debug, Default, Clone, Copy)]
pub struct InertBallistics;

impl Ballistics for InertBallistics {}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_new_shot_has_full_range_remaining() {
        let shot = Shot::new(3, 10.0, 20.0, 45.0, 10.0, 300.0);
        assert_eq!(shot.remaining_range, 300.0);
        assert_eq!(shot.source_robot, 3);
    }

    proptest! {
        #[test]
        fn inert_ballistics_leave_shots_untouched(
            x in 1.0f32..999.0,
            y in 1.0f32..999.0,
            facing in 0.0f32..360.0,
            range in 0.0f32..700.0,
            ticks in 1usize..50,
        ) {
            let arena = Arena::default();
            let original = Shot::new(1, x, y, facing, 10.0, range);
            let mut shots = vec![original];
            let mut robots: Vec<RobotState> = Vec::new();
            let mut ballistics = InertBallistics;
            for _ in 0..ticks {
                ballistics.move_shots_in_flight(&mut shots, &arena);
                ballistics.detonate_shots(&mut shots, &mut robots);
            }
            prop_assert_eq!(shots, vec![original]);
        }
    }
}
