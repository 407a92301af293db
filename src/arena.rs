use crate::config;
use crate::error::ArenaError;

// Represents the game arena: a fixed rectangle, immutable once a match starts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Arena {
    width: u32,
    height: u32,
}

impl Arena {
    pub fn new(width: u32, height: u32) -> Result<Self, ArenaError> {
        if width == 0 || height == 0 {
            return Err(ArenaError::ZeroDimension { width, height });
        }
        Ok(Arena { width, height })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Clamps a point into the drivable area, [1, dimension - 1] on each axis.
    /// Returns the clamped point and whether any axis had to be clamped.
    pub fn clamp_point(&self, x: f32, y: f32) -> (f32, f32, bool) {
        let max_x = (self.width as f32 - config::WALL_CLEARANCE).max(config::WALL_CLEARANCE);
        let max_y = (self.height as f32 - config::WALL_CLEARANCE).max(config::WALL_CLEARANCE);
        let cx = x.clamp(config::WALL_CLEARANCE, max_x);
        let cy = y.clamp(config::WALL_CLEARANCE, max_y);
        (cx, cy, cx != x || cy != y)
    }
}

impl Default for Arena {
    fn default() -> Self {
        Arena {
            width: config::DEFAULT_ARENA_WIDTH,
            height: config::DEFAULT_ARENA_HEIGHT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_zero_dimensions() {
        assert_eq!(
            Arena::new(0, 10),
            Err(ArenaError::ZeroDimension { width: 0, height: 10 })
        );
        assert!(Arena::new(10, 0).is_err());
        assert!(Arena::new(1, 1).is_ok());
    }

    #[test]
    fn test_clamp_point() {
        let arena = Arena::new(100, 50).unwrap();
        assert_eq!(arena.clamp_point(50.0, 25.0), (50.0, 25.0, false));
        assert_eq!(arena.clamp_point(100.5, 25.0), (99.0, 25.0, true));
        assert_eq!(arena.clamp_point(0.2, -3.0), (1.0, 1.0, true));
        assert_eq!(arena.clamp_point(1.0, 49.0), (1.0, 49.0, false));
    }
}
