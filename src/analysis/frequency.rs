//! Mappings shared by the curve renderer and the estimator.

use crate::consts::{MAX_FREQUENCY_HZ, MIN_FREQUENCY_HZ};

/// Linearly remap `value` from `[src_low, src_high]` onto `[dst_low, dst_high]`.
pub fn remap(value: f32, src_low: f32, src_high: f32, dst_low: f32, dst_high: f32) -> f32 {
    dst_low + (value - src_low) / (src_high - src_low) * (dst_high - dst_low)
}

/// Position of `frequency` on the 20 Hz – 20 kHz log axis: 0 at 20 Hz, 1 at 20 kHz.
/// Frequencies outside the range land outside `[0, 1]`; non-positive ones are
/// treated as 1 Hz so the result stays finite.
pub fn normalized_log_position(frequency: f32) -> f32 {
    (frequency.max(1.0) / MIN_FREQUENCY_HZ).log10() / (MAX_FREQUENCY_HZ / MIN_FREQUENCY_HZ).log10()
}

/// Inverse of [`normalized_log_position`].
pub fn frequency_at_position(position: f32) -> f32 {
    MIN_FREQUENCY_HZ * (MAX_FREQUENCY_HZ / MIN_FREQUENCY_HZ).powf(position)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn remap_endpoints() {
        assert_relative_eq!(remap(-48.0, -48.0, 0.0, 0.0, 1000.0), 0.0);
        assert_relative_eq!(remap(0.0, -48.0, 0.0, 0.0, 1000.0), 1000.0);
        assert_relative_eq!(remap(-24.0, -48.0, 0.0, 110.0, 0.0), 55.0);
    }

    #[test]
    fn log_axis_endpoints() {
        assert_relative_eq!(normalized_log_position(20.0), 0.0);
        assert_relative_eq!(normalized_log_position(20_000.0), 1.0, epsilon = 1e-6);
        assert_relative_eq!(normalized_log_position(632.455_5), 0.5, epsilon = 1e-5);
        assert!(normalized_log_position(0.0).is_finite());
    }

    #[test]
    fn position_round_trip() {
        for frequency in [20.0f32, 100.0, 937.5, 5000.0, 19_999.0] {
            let back = frequency_at_position(normalized_log_position(frequency));
            assert_relative_eq!(back, frequency, max_relative = 1e-4);
        }
    }
}
