//! Easing curves for animated transitions

/// Cubic ease-in/ease-out
///
/// Maps `[0, 1]` onto `[0, 1]` with zero slope at both ends:
/// `4t³` on the first half and `1 - (-2t + 2)³ / 2` on the second.
/// Inputs outside `[0, 1]` are clamped.
pub fn ease_in_out_cubic(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}
