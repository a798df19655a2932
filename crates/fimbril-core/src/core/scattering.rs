use nalgebra::Point3;

/// Evenly spaced scattering-vector magnitudes from 0 to `q_max` inclusive,
/// with `q[0] = 0` by convention.
pub fn q_grid(q_max: f64, count: usize) -> Vec<f64> {
    if count <= 1 {
        return vec![0.0];
    }
    (0..count)
        .map(|i| i as f64 * q_max / (count - 1) as f64)
        .collect()
}

/// Debye scattering intensity of a set of point scatterers.
///
/// Every bead contributes a self term of 1 to every bin; every unordered
/// pair contributes `2·sin(q·r)/(q·r)` per bin, with the `q = 0` limit of
/// 2. The curve is normalized by its `q = 0` value (the squared bead
/// count), so the result equals 1 at `q = 0`; this normalization is what
/// downstream curve fitting expects and must be preserved.
pub fn debye(positions: &[Point3<f64>], q: &[f64]) -> Vec<f64> {
    let mut intensity = vec![0.0; q.len()];
    if q.is_empty() || positions.is_empty() {
        return intensity;
    }

    for (i, bead) in positions.iter().enumerate() {
        for bin in intensity.iter_mut() {
            *bin += 1.0;
        }
        for other in &positions[..i] {
            let r = (bead - other).norm();
            for (bin, &qk) in intensity.iter_mut().zip(q) {
                if qk == 0.0 {
                    *bin += 2.0;
                } else {
                    *bin += 2.0 * (qk * r).sin() / (qk * r);
                }
            }
        }
    }

    let norm = intensity[0];
    intensity.iter().map(|v| v / norm).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1e-12;

    fn pair(r: f64) -> Vec<Point3<f64>> {
        vec![Point3::origin(), Point3::new(r, 0.0, 0.0)]
    }

    #[test]
    fn q_grid_spans_zero_to_max() {
        let q = q_grid(0.5, 51);
        assert_eq!(q.len(), 51);
        assert_eq!(q[0], 0.0);
        assert!((q[50] - 0.5).abs() < TOLERANCE);
        assert!((q[1] - 0.01).abs() < TOLERANCE);
    }

    #[test]
    fn q_grid_with_single_point_is_just_zero() {
        assert_eq!(q_grid(0.5, 1), vec![0.0]);
    }

    #[test]
    fn normalized_intensity_is_one_at_zero_q() {
        let positions = pair(3.0);
        assert!((debye(&positions, &[0.0])[0] - 1.0).abs() < TOLERANCE);

        let many: Vec<Point3<f64>> = (0..7)
            .map(|i| Point3::new(i as f64 * 1.3, 0.2, -0.5))
            .collect();
        let curve = debye(&many, &q_grid(0.5, 11));
        assert!((curve[0] - 1.0).abs() < TOLERANCE);
    }

    #[test]
    fn two_bead_curve_matches_closed_form() {
        // I(q) = (2 + 2 sin(qr)/(qr)) / 4 for two scatterers a distance r
        // apart.
        let r = 2.0;
        let q = [0.0, 0.3, 0.7, 1.5];
        let curve = debye(&pair(r), &q);
        for (&qk, &value) in q.iter().zip(&curve).skip(1) {
            let expected = (2.0 + 2.0 * (qk * r).sin() / (qk * r)) / 4.0;
            assert!((value - expected).abs() < TOLERANCE);
        }
    }

    #[test]
    fn intensity_decays_from_the_forward_peak() {
        let positions: Vec<Point3<f64>> = (0..20)
            .map(|i| Point3::new(0.0, 0.0, 0.5 + i as f64))
            .collect();
        let curve = debye(&positions, &q_grid(0.5, 21));
        assert!(curve.iter().skip(1).all(|&v| v < 1.0));
    }
}
