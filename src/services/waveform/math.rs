//! Numeric helpers for seeking and rate changes.

/// Upper bound for a seek fraction.
///
/// Seeking to exactly 1.0 makes some players stall at the end of media.
pub const MAX_SEEK_FRACTION: f64 = 0.99999;

/// Restrict `value` to `[min, max]`. NaN maps to `min`.
pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
    if value.is_nan() {
        return min;
    }
    value.max(min).min(max)
}

/// Restrict a seek fraction to `[0, MAX_SEEK_FRACTION]`.
pub fn clamp_seek(fraction: f64) -> f64 {
    clamp(fraction, 0.0, MAX_SEEK_FRACTION)
}

/// Convert an absolute time into the fraction a player seeks to.
///
/// A zero, negative or non-finite duration yields 0.
pub fn normalized_seek_fraction(target_time: f64, duration: f64) -> f64 {
    if !duration.is_finite() || duration <= 0.0 {
        return 0.0;
    }
    clamp_seek(target_time / duration)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_keeps_in_range_values() {
        for v in [0.0, 0.25, 0.5, MAX_SEEK_FRACTION] {
            assert_eq!(clamp_seek(v), v);
        }
    }

    #[test]
    fn clamp_bounds_out_of_range_values() {
        for v in [-10.0, -0.0001, 1.0, 7.5, f64::INFINITY, f64::NEG_INFINITY, f64::NAN] {
            let clamped = clamp_seek(v);
            assert!((0.0..=MAX_SEEK_FRACTION).contains(&clamped), "{v} -> {clamped}");
        }
        assert_eq!(clamp(12.0, 0.0, 10.0), 10.0);
        assert_eq!(clamp(-3.0, 0.0, 10.0), 0.0);
    }

    #[test]
    fn zero_duration_seeks_to_start() {
        assert_eq!(normalized_seek_fraction(12.0, 0.0), 0.0);
        assert_eq!(normalized_seek_fraction(0.0, 0.0), 0.0);
        assert_eq!(normalized_seek_fraction(5.0, f64::NAN), 0.0);
        assert_eq!(normalized_seek_fraction(5.0, -1.0), 0.0);
    }

    #[test]
    fn fraction_never_reaches_end() {
        assert_eq!(normalized_seek_fraction(10.0, 20.0), 0.5);
        assert_eq!(normalized_seek_fraction(20.0, 20.0), MAX_SEEK_FRACTION);
        assert_eq!(normalized_seek_fraction(500.0, 20.0), MAX_SEEK_FRACTION);
    }
}
