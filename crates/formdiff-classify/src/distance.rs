//! Display scaling for the diff engine's raw distance.

/// Scale a raw `[0, 1]` distance to `[0, 100]`, rounded to two decimals.
///
/// A missing or non-finite raw distance counts as zero.
pub fn normalize_distance(raw: Option<f64>) -> f64 {
    let raw = raw.filter(|d| d.is_finite()).unwrap_or(0.0);
    let scaled = (raw * 100.0 * 100.0).round() / 100.0;
    scaled.clamp(0.0, 100.0)
}
