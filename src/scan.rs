// Scan resolution: which robots fall inside a scanner's cone, and how far away the nearest is

use crate::config;
use crate::robot::{ContactDetails, RobotState};
use crate::utils::{angular_distance, bearing, normalize_degrees};

/// Sweep the cone centred on `degree` from the robot at `scanner`.
///
/// Returns the range to the nearest robot inside the cone, 0.0 when the cone
/// is empty, and -1.0 when there is nobody else to scan. Every robot inside the
/// cone is marked detected and recorded as a contact of the scanner.
pub(crate) fn sweep(robots: &mut [RobotState], scanner: usize, degree: f32, resolution: f32) -> f32 {
    if robots.len() < 2 || scanner >= robots.len() {
        return -1.0;
    }
    let heading = normalize_degrees(degree);
    let half_width = resolution.max(config::MIN_SCAN_RESOLUTION) / 2.0;
    let from_x = robots[scanner].current_x;
    let from_y = robots[scanner].current_y;
    let scanner_id = robots[scanner].id;

    let mut nearest: Option<f32> = None;
    let mut contacts = Vec::new();

    for (i, target) in robots.iter_mut().enumerate() {
        if i == scanner {
            continue;
        }
        let dx = target.current_x - from_x;
        let dy = target.current_y - from_y;
        let range = dx.hypot(dy);
        let target_bearing = bearing(from_x, from_y, target.current_x, target.current_y);

        if angular_distance(target_bearing, heading) <= half_width {
            target.detected = true;
            contacts.push(ContactDetails {
                from_x,
                from_y,
                to_x: target.current_x,
                to_y: target.current_y,
                bearing: target_bearing,
                range,
            });
            nearest = Some(nearest.map_or(range, |best: f32| best.min(range)));
            crate::debug_scan!(
                scanner_id,
                "hit robot {} at bearing {:.1}, range {:.1}",
                target.id,
                target_bearing,
                range
            );
        }
    }

    robots[scanner].contacts.extend(contacts);
    nearest.unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::robot::RobotProfile;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn robot_at(id: u32, x: f32, y: f32) -> RobotState {
        let mut robot = RobotState::new(
            id,
            format!("R{}", id),
            RobotProfile::default(),
            StdRng::seed_from_u64(id as u64),
        );
        robot.place(x, y);
        robot
    }

    #[test]
    fn test_scan_hits_exact_distance() {
        let mut robots = vec![robot_at(1, 0.0, 0.0), robot_at(2, 10.0, 0.0)];
        assert_eq!(sweep(&mut robots, 0, 0.0, 20.0), 10.0);
        assert!(robots[1].is_detected());
        assert_eq!(robots[0].contacts().len(), 1);
        assert_eq!(robots[0].contacts()[0].range, 10.0);
    }

    #[test]
    fn test_scan_wrong_direction_misses() {
        let mut robots = vec![robot_at(1, 0.0, 0.0), robot_at(2, 10.0, 0.0)];
        assert_eq!(sweep(&mut robots, 0, 180.0, 20.0), 0.0);
        assert!(!robots[1].is_detected());
        assert!(robots[0].contacts().is_empty());
    }

    #[test]
    fn test_scan_alone_returns_minus_one() {
        let mut robots = vec![robot_at(1, 50.0, 50.0)];
        assert_eq!(sweep(&mut robots, 0, 0.0, 20.0), -1.0);
    }

    #[test]
    fn test_scan_returns_nearest_hit() {
        let mut robots = vec![
            robot_at(1, 10.0, 10.0),
            robot_at(2, 60.0, 10.0),
            robot_at(3, 30.0, 10.0),
            robot_at(4, 10.0, 60.0),
        ];
        assert_eq!(sweep(&mut robots, 0, 0.0, 10.0), 20.0);
        assert_eq!(robots[0].contacts().len(), 2);
        assert!(robots[1].is_detected());
        assert!(robots[2].is_detected());
        assert!(!robots[3].is_detected());
    }

    #[test]
    fn test_scan_cone_wraps_through_zero() {
        // Target at bearing 355, scanning at 359 with the minimum 10 degree cone
        let mut robots = vec![
            robot_at(1, 50.0, 50.0),
            robot_at(2, 50.0 + 100.0 * 355f32.to_radians().cos(), 50.0 + 100.0 * 355f32.to_radians().sin()),
        ];
        let range = sweep(&mut robots, 0, 359.0, 1.0);
        assert!((range - 100.0).abs() < 1e-3);
    }

    #[test]
    fn test_scan_enforces_minimum_resolution() {
        // Bearing 4 degrees off: outside a 2 degree cone, inside the 10 degree minimum
        let mut robots = vec![
            robot_at(1, 0.0, 0.0),
            robot_at(2, 100.0 * 4f32.to_radians().cos(), 100.0 * 4f32.to_radians().sin()),
        ];
        assert!(sweep(&mut robots, 0, 0.0, 2.0) > 0.0);
        // 6 degrees off is outside even the minimum cone
        let mut robots = vec![
            robot_at(1, 0.0, 0.0),
            robot_at(2, 100.0 * 6f32.to_radians().cos(), 100.0 * 6f32.to_radians().sin()),
        ];
        assert_eq!(sweep(&mut robots, 0, 0.0, 2.0), 0.0);
    }
}
