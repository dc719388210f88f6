//! Firing geometry for multi-bullet volleys.
//!
//! A partial arc puts bullets on both of its extremes, so `count` bullets
//! are `count - 1` steps apart. A full circle has no extremes: its step is
//! `arc / count`, which keeps a duplicate bullet off the 0/360 seam.

use crate::collab::RandomSource;
use crate::limits::FULL_CIRCLE_EPSILON;

/// Whether `arc` degrees closes the circle.
pub fn is_full_circle(arc: f32) -> bool {
    (arc.abs() - 360.0).abs() <= FULL_CIRCLE_EPSILON
}

/// Angular distance between neighbouring bullets.
pub fn step(count: i32, arc: f32) -> f32 {
    if count <= 1 {
        0.0
    } else if is_full_circle(arc) {
        arc / count as f32
    } else {
        arc / (count - 1) as f32
    }
}

/// `count` angles from `start` across `arc` degrees.
pub fn spread_angles(count: i32, start: f32, arc: f32) -> Vec<f32> {
    if count <= 0 {
        return Vec::new();
    }
    let step = step(count, arc);
    (0..count).map(|i| start + step * i as f32).collect()
}

/// `count` angles across `arc` degrees, symmetric about `center`.
pub fn centered_angles(count: i32, center: f32, arc: f32) -> Vec<f32> {
    if count == 1 {
        return vec![center];
    }
    spread_angles(count, center - arc / 2.0, arc)
}

/// `count` angles evenly around the full circle from `start`.
pub fn ring_angles(count: i32, start: f32) -> Vec<f32> {
    spread_angles(count, start, 360.0)
}

/// `count` angles sampled independently inside the arc centred on `center`.
pub fn random_angles(
    count: i32,
    center: f32,
    arc: f32,
    rng: &mut dyn RandomSource,
) -> Vec<f32> {
    let half = arc / 2.0;
    (0..count.max(0))
        .map(|_| center + rng.uniform(-half, half))
        .collect()
}

/// `count` speeds from `min` to `max` inclusive.
pub fn fan_speeds(count: i32, min: f32, max: f32) -> Vec<f32> {
    match count {
        c if c <= 0 => Vec::new(),
        1 => vec![min],
        _ => {
            let step = (max - min) / (count - 1) as f32;
            (0..count).map(|i| min + step * i as f32).collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collab::SeededRng;
    use proptest::prelude::*;

    fn assert_angles(actual: &[f32], expected: &[f32]) {
        assert_eq!(actual.len(), expected.len(), "{actual:?} vs {expected:?}");
        for (a, e) in actual.iter().zip(expected) {
            assert!((a - e).abs() < 1e-4, "{actual:?} vs {expected:?}");
        }
    }

    #[test]
    fn centered_three_over_sixty() {
        assert_angles(&centered_angles(3, 90.0, 60.0), &[60.0, 90.0, 120.0]);
    }

    #[test]
    fn full_circle_has_no_seam_duplicate() {
        assert_angles(&spread_angles(4, 0.0, 360.0), &[0.0, 90.0, 180.0, 270.0]);
        assert_angles(&ring_angles(4, 0.0), &[0.0, 90.0, 180.0, 270.0]);
    }

    #[test]
    fn near_full_circle_counts_as_full() {
        assert!(is_full_circle(360.0005));
        assert!(is_full_circle(-360.0));
        assert!(!is_full_circle(359.0));
    }

    #[test]
    fn partial_arc_populates_both_extremes() {
        assert_angles(&spread_angles(5, 10.0, 40.0), &[10.0, 20.0, 30.0, 40.0, 50.0]);
    }

    #[test]
    fn single_bullet_sits_on_the_angle() {
        assert_angles(&spread_angles(1, 45.0, 90.0), &[45.0]);
        assert_angles(&centered_angles(1, 45.0, 90.0), &[45.0]);
    }

    #[test]
    fn non_positive_count_fires_nothing() {
        assert!(spread_angles(0, 0.0, 90.0).is_empty());
        assert!(centered_angles(-2, 0.0, 90.0).is_empty());
        assert!(fan_speeds(0, 1.0, 2.0).is_empty());
    }

    #[test]
    fn fan_speeds_span_range() {
        assert_angles(&fan_speeds(3, 2.0, 4.0), &[2.0, 3.0, 4.0]);
        assert_angles(&fan_speeds(1, 2.0, 4.0), &[2.0]);
    }

    #[test]
    fn random_angles_stay_in_arc() {
        let mut rng = SeededRng::new(3);
        let angles = random_angles(20, 90.0, 60.0, &mut rng);
        assert_eq!(angles.len(), 20);
        assert!(angles.iter().all(|a| (60.0..=120.0).contains(a)));
    }

    proptest! {
        #[test]
        fn spread_yields_count_angles(count in 0i32..64, start in -360.0f32..360.0, arc in 0.0f32..360.0) {
            let angles = spread_angles(count, start, arc);
            prop_assert_eq!(angles.len(), count as usize);
            if count > 1 && !is_full_circle(arc) {
                let last = angles[angles.len() - 1];
                prop_assert!((last - (start + arc)).abs() < 1e-2);
            }
        }

        #[test]
        fn centered_spread_is_symmetric(count in 1i32..32, center in -180.0f32..180.0, arc in 0.0f32..300.0) {
            let angles = centered_angles(count, center, arc);
            let first = angles[0];
            let last = angles[angles.len() - 1];
            prop_assert!(((first + last) / 2.0 - center).abs() < 1e-2);
        }
    }
}
