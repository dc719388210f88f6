//! Degree-based angle helpers.
//!
//! Headings are degrees, 0 along +x, growing counter-clockwise.

use glam::Vec2;

/// Unit vector pointing along `degrees`.
pub fn direction(degrees: f32) -> Vec2 {
    Vec2::from_angle(degrees.to_radians())
}

/// Velocity for a speed and heading.
pub fn velocity(speed: f32, degrees: f32) -> Vec2 {
    direction(degrees) * speed
}

/// Heading of `v` in degrees. Zero vectors yield 0.
pub fn heading_of(v: Vec2) -> f32 {
    if v == Vec2::ZERO {
        0.0
    } else {
        v.y.atan2(v.x).to_degrees()
    }
}

/// Heading from `from` towards `to`.
pub fn angle_towards(from: Vec2, to: Vec2) -> f32 {
    heading_of(to - from)
}

/// Wrap into (-180, 180].
pub fn wrap(degrees: f32) -> f32 {
    let wrapped = degrees.rem_euclid(360.0);
    if wrapped > 180.0 {
        wrapped - 360.0
    } else {
        wrapped
    }
}

/// Turn `current` towards `target` by at most `max_turn` degrees,
/// along the shorter way round.
pub fn turn_towards(current: f32, target: f32, max_turn: f32) -> f32 {
    let limit = max_turn.abs();
    current + wrap(target - current).clamp(-limit, limit)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn direction_axes() {
        assert!(direction(0.0).abs_diff_eq(Vec2::X, 1e-6));
        assert!(direction(90.0).abs_diff_eq(Vec2::Y, 1e-6));
    }

    #[test]
    fn heading_round_trip() {
        assert!(close(heading_of(direction(135.0)), 135.0));
        assert_eq!(heading_of(Vec2::ZERO), 0.0);
    }

    #[test]
    fn wrap_range() {
        assert!(close(wrap(190.0), -170.0));
        assert!(close(wrap(-190.0), 170.0));
        assert!(close(wrap(180.0), 180.0));
        assert!(close(wrap(720.0), 0.0));
    }

    #[test]
    fn turn_takes_short_way() {
        // From 170 to -170 is 20 degrees counter-clockwise.
        assert!(close(turn_towards(170.0, -170.0, 5.0), 175.0));
        assert!(close(turn_towards(0.0, 3.0, 5.0), 3.0));
        assert!(close(turn_towards(0.0, -90.0, 5.0), -5.0));
    }
}
