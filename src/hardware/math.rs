use crate::path::CanvasPoint;

use super::{AngleTarget, GeometryConfig};

///
/// Converts a cartesian pen position into rope lengths. The position is relative
/// to the left anchor, growing rightwards/downwards. All values are in millimetres.
///
/// # Parameters:
/// - `x`: The x parameter of the pen position, horizontally relative to the left anchor
/// - `y`: The y parameter of the pen position, vertically relative to the left anchor
/// - `anchor_interspace`: The distance between the two rope anchors
///
/// # Returns:
/// - A tuple containing the left and right rope lengths, respectively
///
pub fn cartesian_to_rope(x: f64, y: f64, anchor_interspace: f64) -> (f64, f64) {
    let left_rope = f64::sqrt(f64::powi(x, 2) + f64::powi(y, 2));
    let right_rope = f64::sqrt(f64::powi(anchor_interspace - x, 2) + f64::powi(y, 2));

    (left_rope, right_rope)
}

///
/// Converts a normalized canvas point into the pair of absolute shaft angles the
/// motors must reach for the pen to sit on that point. The point is scaled by the
/// canvas size, offset to anchor space, turned into rope lengths and finally into
/// angles via `degree_per_mm`.
///
/// Non-finite inputs are deliberately not clamped; the resulting NaN targets
/// propagate to the control loop, which then visibly fails to converge instead
/// of silently drawing somewhere wrong.
///
/// # Parameters:
/// - `point`: The canvas point, each coordinate nominally in [0, 1]
/// - `geometry`: The physical dimensions of the rig
///
/// # Returns:
/// - An `AngleTarget` holding the left and right shaft angles, in degrees
///
pub fn canvas_to_angles(point: CanvasPoint, geometry: &GeometryConfig) -> AngleTarget {
    let x = point.x * geometry.canvas_width() + geometry.canvas_horizontal_offset();
    let y = point.y * geometry.canvas_height() + geometry.canvas_vertical_offset();

    let (left_rope, right_rope) = cartesian_to_rope(x, y, *geometry.anchor_interspace());

    AngleTarget {
        left_deg: left_rope * geometry.degree_per_mm(),
        right_deg: right_rope * geometry.degree_per_mm(),
    }
}

///
/// Tests relating to the inverse kinematics functions.
///
#[cfg(test)]
mod tests {
    use super::*;

    fn rig() -> GeometryConfig {
        GeometryConfig::new(790., 290., 640., 270., 400., -40.).unwrap()
    }

    #[test]
    fn canvas_origin_matches_formula() {
        let target = canvas_to_angles(CanvasPoint::new(0., 0.), &rig());

        let left = f64::sqrt(290_f64.powi(2) + 640_f64.powi(2)) * -40.;
        let right = f64::sqrt(500_f64.powi(2) + 640_f64.powi(2)) * -40.;

        assert!((target.left_deg - left).abs() < 1e-9);
        assert!((target.right_deg - right).abs() < 1e-9);
    }

    #[test]
    fn centered_canvas_is_symmetric() {
        // canvas horizontally centered between the anchors, so x = 0.5 sits on
        // the vertical symmetry axis: offset_x = (interspace - width) / 2
        let geometry = GeometryConfig::new(790., 260., 640., 270., 400., -40.).unwrap();

        for y in [0., 0.25, 0.5, 1.] {
            let target = canvas_to_angles(CanvasPoint::new(0.5, y), &geometry);
            assert!((target.left_deg - target.right_deg).abs() < 1e-9);
        }
    }

    #[test]
    fn angles_are_continuous() {
        let geometry = rig();
        let base = canvas_to_angles(CanvasPoint::new(0.3, 0.7), &geometry);
        let nudged = canvas_to_angles(CanvasPoint::new(0.3 + 1e-9, 0.7 - 1e-9), &geometry);

        // the angle gradient is bounded by degree_per_mm * canvas size, so a
        // nanometre-scale nudge shifts both angles by well under a millidegree
        assert!((base.left_deg - nudged.left_deg).abs() < 1e-3);
        assert!((base.right_deg - nudged.right_deg).abs() < 1e-3);
    }

    #[test]
    fn non_finite_input_propagates() {
        let target = canvas_to_angles(CanvasPoint::new(f64::NAN, 0.5), &rig());

        assert!(target.left_deg.is_nan());
        assert!(target.right_deg.is_nan());
    }

    #[test]
    fn rope_lengths_from_known_triangle() {
        let (left, right) = cartesian_to_rope(300., 400., 1100.);

        assert!((left - 500.).abs() < 1e-9);
        // sqrt(800^2 + 400^2)
        assert!((right - f64::sqrt(800_000.)).abs() < 1e-9);
    }
}
