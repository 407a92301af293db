/// Wrap any angle into [0, 360)
pub fn normalize_degrees(degrees: f32) -> f32 {
    let wrapped = degrees.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

/// Unsigned angular distance along the shorter arc, in [0, 180]
pub fn angular_distance(a: f32, b: f32) -> f32 {
    let diff = (normalize_degrees(a) - normalize_degrees(b)).abs();
    diff.min(360.0 - diff)
}

/// Signed rotation from `from` to `to` along the shorter arc, in (-180, 180].
/// Positive is counter-clockwise.
pub fn shortest_turn(from: f32, to: f32) -> f32 {
    let delta = normalize_degrees(to - from);
    if delta > 180.0 { delta - 360.0 } else { delta }
}

/// Step `current` toward `target` by at most `max_step`, landing exactly on the target
pub fn approach(current: f32, target: f32, max_step: f32) -> f32 {
    let delta = target - current;
    if delta.abs() <= max_step {
        target
    } else {
        current + max_step.copysign(delta)
    }
}

/// Bearing from one point to another in degrees, 0 along +X, counter-clockwise
pub fn bearing(from_x: f32, from_y: f32, to_x: f32, to_y: f32) -> f32 {
    normalize_degrees((to_y - from_y).atan2(to_x - from_x).to_degrees())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn test_normalize_degrees() {
        assert_approx_eq!(normalize_degrees(0.0), 0.0);
        assert_approx_eq!(normalize_degrees(360.0), 0.0);
        assert_approx_eq!(normalize_degrees(725.0), 5.0);
        assert_approx_eq!(normalize_degrees(-90.0), 270.0);
        assert!(normalize_degrees(-1e-7) < 360.0);
    }

    #[test]
    fn test_angular_distance() {
        assert_approx_eq!(angular_distance(350.0, 10.0), 20.0);
        assert_approx_eq!(angular_distance(10.0, 350.0), 20.0);
        assert_approx_eq!(angular_distance(0.0, 180.0), 180.0);
        assert_approx_eq!(angular_distance(90.0, 90.0), 0.0);
    }

    #[test]
    fn test_shortest_turn() {
        assert_approx_eq!(shortest_turn(350.0, 10.0), 20.0);
        assert_approx_eq!(shortest_turn(10.0, 350.0), -20.0);
        assert_approx_eq!(shortest_turn(0.0, 270.0), -90.0);
        assert_approx_eq!(shortest_turn(90.0, 0.0), -90.0);
    }

    #[test]
    fn test_approach() {
        assert_eq!(approach(0.0, 100.0, 30.0), 30.0);
        assert_eq!(approach(90.0, 100.0, 30.0), 100.0);
        assert_eq!(approach(100.0, 0.0, 40.0), 60.0);
        assert_eq!(approach(50.0, 50.0, 10.0), 50.0);
    }

    #[test]
    fn test_bearing_quadrants() {
        assert_approx_eq!(bearing(0.0, 0.0, 10.0, 0.0), 0.0);
        assert_approx_eq!(bearing(0.0, 0.0, 0.0, 10.0), 90.0);
        assert_approx_eq!(bearing(0.0, 0.0, -10.0, 0.0), 180.0);
        assert_approx_eq!(bearing(0.0, 0.0, 0.0, -10.0), 270.0);
        assert_approx_eq!(bearing(5.0, 5.0, 10.0, 10.0), 45.0);
    }
}
