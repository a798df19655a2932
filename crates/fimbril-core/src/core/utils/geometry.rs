use nalgebra::{Rotation3, Vector3};

/// Turn angle between consecutive backbone vectors.
///
/// `a` is the outgoing bond, `b` the incoming bond at a joint. The cosine
/// is clamped at 1 before `acos` so that collinear bonds with rounding
/// error above unity do not produce NaN.
pub fn bend_angle(a: &Vector3<f64>, b: &Vector3<f64>) -> f64 {
    (a.dot(b) / (a.norm() * b.norm())).min(1.0).acos()
}

/// Composite rotation built from elementary rotations about the x, y, then
/// z axes, in that fixed order: `R = Rx(tx) · Ry(ty) · Rz(tz)`.
///
/// This is not a uniform rotation on SO(3); it is the proposal scheme used
/// by the tail-rotation move, where only the accept/reject energetics
/// matter.
pub fn euler_rotation(tx: f64, ty: f64, tz: f64) -> Rotation3<f64> {
    Rotation3::from_axis_angle(&Vector3::x_axis(), tx)
        * Rotation3::from_axis_angle(&Vector3::y_axis(), ty)
        * Rotation3::from_axis_angle(&Vector3::z_axis(), tz)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;
    use std::f64::consts::{FRAC_PI_2, PI};

    const TOLERANCE: f64 = 1e-12;

    #[test]
    fn bend_angle_is_zero_for_collinear_bonds() {
        let a = Vector3::new(0.0, 0.0, 1.0);
        let b = Vector3::new(0.0, 0.0, 1.0);
        assert!(bend_angle(&a, &b).abs() < TOLERANCE);
    }

    #[test]
    fn bend_angle_detects_right_angle() {
        let a = Vector3::new(1.0, 0.0, 0.0);
        let b = Vector3::new(0.0, 0.0, 1.0);
        assert!((bend_angle(&a, &b) - FRAC_PI_2).abs() < TOLERANCE);
    }

    #[test]
    fn bend_angle_clamps_cosine_above_unity() {
        // Scaled collinear vectors whose normalized dot product rounds to
        // slightly above 1.0.
        let a = Vector3::new(0.1, 0.1, 0.1);
        let b = a * 3.0;
        let angle = bend_angle(&a, &b);
        assert!(angle.is_finite());
        assert!(angle.abs() < 1e-7);
    }

    #[test]
    fn bend_angle_is_pi_for_reversed_bonds() {
        let a = Vector3::new(1.0, 0.0, 0.0);
        let b = Vector3::new(-1.0, 0.0, 0.0);
        assert!((bend_angle(&a, &b) - PI).abs() < 1e-7);
    }

    #[test]
    fn euler_rotation_composes_x_then_y_then_z() {
        // With tx = 90° and ty = tz = 0 the composite must equal the plain
        // x-axis rotation: +y maps onto +z.
        let rot = euler_rotation(FRAC_PI_2, 0.0, 0.0);
        let moved = rot * Vector3::new(0.0, 1.0, 0.0);
        assert!((moved - Vector3::new(0.0, 0.0, 1.0)).norm() < 1e-12);

        // A z-axis vector is untouched by Rz, so Rx(90°)·Ry(90°) applied to
        // +z must first send it to +x (Ry), then leave +x alone (Rx).
        let rot = euler_rotation(FRAC_PI_2, FRAC_PI_2, 0.0);
        let moved = rot * Vector3::new(0.0, 0.0, 1.0);
        assert!((moved - Vector3::new(1.0, 0.0, 0.0)).norm() < 1e-12);
    }

    #[test]
    fn euler_rotation_preserves_distances() {
        let rot = euler_rotation(0.3, -1.1, 2.4);
        let p = Point3::new(1.0, 2.0, 3.0);
        let q = Point3::new(-0.5, 0.25, 1.5);
        let before = (p - q).norm();
        let after = (rot * (p - q)).norm();
        assert!((before - after).abs() < TOLERANCE);
    }
}
