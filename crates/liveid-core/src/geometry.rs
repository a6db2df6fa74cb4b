//! Eye landmark geometry.
//!
//! The eye aspect ratio (EAR) is a scalar derived from six eye landmark
//! points: two vertical lid distances over the horizontal corner distance.
//! A fully open eye sits well above the blink threshold; a closed eye
//! collapses the vertical distances and drops the ratio near zero.
//!
//! Points follow the common 6-point convention:
//! p1/p4 are the outer/inner corners (horizontal axis), p2/p3 the upper
//! lid, p6/p5 the lower lid.

/// Horizontal distances below this are considered degenerate — the eye
/// region is too small for a meaningful ratio.
const MIN_HORIZONTAL_DISTANCE: f32 = 1e-6;

/// Euclidean distance between two points.
pub fn distance(a: (f32, f32), b: (f32, f32)) -> f32 {
    let dx = b.0 - a.0;
    let dy = b.1 - a.1;
    (dx * dx + dy * dy).sqrt()
}

/// Compute the eye aspect ratio from a sequence of normalized eye landmarks.
///
/// EAR = (|p2−p6| + |p3−p5|) / (2·|p1−p4|)
///
/// Returns 0.0 when fewer than 6 points are supplied or when the horizontal
/// corner distance is degenerate. A zero return is a "no usable signal"
/// marker, not a closed-eye reading — callers must not treat it as a blink.
pub fn eye_aspect_ratio(points: &[(f32, f32)]) -> f32 {
    if points.len() < 6 {
        return 0.0;
    }

    let p1 = points[0];
    let p2 = points[1];
    let p3 = points[2];
    let p4 = points[3];
    let p5 = points[4];
    let p6 = points[5];

    let horizontal = distance(p1, p4);
    if horizontal < MIN_HORIZONTAL_DISTANCE {
        return 0.0;
    }

    let vertical1 = distance(p2, p6);
    let vertical2 = distance(p3, p5);

    (vertical1 + vertical2) / (2.0 * horizontal)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Helper: a 6-point eye with the given half-height of the lid opening.
    fn eye_with_opening(half_height: f32) -> Vec<(f32, f32)> {
        vec![
            (0.0, 0.0),           // p1 outer corner
            (0.3, half_height),   // p2 upper lid
            (0.7, half_height),   // p3 upper lid
            (1.0, 0.0),           // p4 inner corner
            (0.7, -half_height),  // p5 lower lid
            (0.3, -half_height),  // p6 lower lid
        ]
    }

    #[test]
    fn distance_matches_known_triangle() {
        assert!((distance((0.0, 0.0), (3.0, 4.0)) - 5.0).abs() < 1e-6);
    }

    #[test]
    fn ear_returns_zero_below_six_points() {
        for n in 0..6 {
            let points: Vec<(f32, f32)> = (0..n).map(|i| (i as f32, 0.0)).collect();
            assert_eq!(eye_aspect_ratio(&points), 0.0, "n = {n}");
        }
    }

    #[test]
    fn ear_returns_zero_for_degenerate_horizontal() {
        // All six points coincide — horizontal distance is zero
        let points = vec![(0.5, 0.5); 6];
        assert_eq!(eye_aspect_ratio(&points), 0.0);
    }

    #[test]
    fn ear_known_geometry() {
        // Vertical pairs each 2 * 0.12 apart, horizontal distance 1.0:
        // EAR = (0.24 + 0.24) / 2 = 0.24
        let ear = eye_aspect_ratio(&eye_with_opening(0.12));
        assert!((ear - 0.24).abs() < 1e-6);
    }

    #[test]
    fn ear_collapses_when_eye_closes() {
        let open = eye_aspect_ratio(&eye_with_opening(0.12));
        let closed = eye_aspect_ratio(&eye_with_opening(0.005));
        assert!(open > 0.2);
        assert!(closed < 0.025);
    }

    #[test]
    fn ear_ignores_extra_points() {
        // Points beyond the first six are tolerated
        let mut points = eye_with_opening(0.12);
        points.push((0.5, 0.9));
        points.push((0.5, -0.9));
        let ear = eye_aspect_ratio(&points);
        assert!((ear - 0.24).abs() < 1e-6);
    }
}
