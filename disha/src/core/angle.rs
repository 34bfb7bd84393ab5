//! Degree arithmetic for compass-like headings.
//!
//! Unlike the radian helpers used for robot poses, everything here works in
//! degrees on the `[0, 360)` circle because that is what the step detector
//! and the compass report.

/// Wrap an angle in degrees into `[0, 360)`.
///
/// # Example
/// ```
/// use disha::core::normalize_degrees;
///
/// assert_eq!(normalize_degrees(370.0), 10.0);
/// assert_eq!(normalize_degrees(-45.0), 315.0);
/// ```
#[inline]
pub fn normalize_degrees(angle: f64) -> f64 {
    let a = angle.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if a >= 360.0 { 0.0 } else { a }
}

/// Unsigned circular difference between two headings in degrees.
///
/// Returns `min(|a-b|, 360-|a-b|)` after wrapping both inputs, so the
/// result is always in `[0, 180]` and symmetric in its arguments.
///
/// # Example
/// ```
/// use disha::core::circular_diff;
///
/// assert_eq!(circular_diff(350.0, 10.0), 20.0);
/// assert_eq!(circular_diff(10.0, 350.0), 20.0);
/// assert_eq!(circular_diff(0.0, 180.0), 180.0);
/// ```
#[inline]
pub fn circular_diff(a: f64, b: f64) -> f64 {
    let d = (normalize_degrees(a) - normalize_degrees(b)).abs();
    d.min(360.0 - d)
}
