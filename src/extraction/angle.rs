//! Joint angle geometry.

/// Angle at `vertex` between the rays to `a` and `b`, in degrees.
///
/// Computed as the absolute difference of the two ray headings and
/// folded into `[0, 180]`. Returns `None` for non-finite input.
pub fn joint_angle(a: (f32, f32), vertex: (f32, f32), b: (f32, f32)) -> Option<f32> {
    let heading_b = (b.1 - vertex.1).atan2(b.0 - vertex.0);
    let heading_a = (a.1 - vertex.1).atan2(a.0 - vertex.0);

    let mut angle = (heading_b - heading_a).to_degrees().abs();
    if angle > 180.0 {
        angle = 360.0 - angle;
    }

    angle.is_finite().then_some(angle)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_straight_arm() {
        let angle = joint_angle((0.0, 0.0), (0.5, 0.0), (1.0, 0.0)).unwrap();
        assert!((angle - 180.0).abs() < 1e-4);
    }

    #[test]
    fn test_right_angle() {
        let angle = joint_angle((0.0, 0.0), (0.5, 0.0), (0.5, 0.5)).unwrap();
        assert!((angle - 90.0).abs() < 1e-4);
    }

    #[test]
    fn test_reflex_difference_is_folded() {
        // Headings of +135° and -135° differ by 270°, folded to 90°.
        let angle = joint_angle((-1.0, 1.0), (0.0, 0.0), (-1.0, -1.0)).unwrap();
        assert!((angle - 90.0).abs() < 1e-4);
    }

    #[test]
    fn test_order_does_not_matter() {
        let a = (0.2, 0.7);
        let v = (0.5, 0.5);
        let b = (0.9, 0.6);
        let forward = joint_angle(a, v, b).unwrap();
        let backward = joint_angle(b, v, a).unwrap();
        assert!((forward - backward).abs() < 1e-4);
    }

    #[test]
    fn test_non_finite_input() {
        assert!(joint_angle((f32::NAN, 0.0), (0.5, 0.0), (1.0, 0.0)).is_none());
    }
}
