//! Derives low-cut, peak and high-cut settings from the averaged spectrum.
//!
//! The average is read in bin space. Distances between features are measured
//! on the normalized log axis (20 Hz = 0, 20 kHz = 1) so that they follow
//! musical spacing rather than bin count.
//!
//! * Low cut: where the spectrum first stops rising, walking up from the
//!   lowest bin.
//! * High cut: the last audible bin, then up to two louder bins found by
//!   sweeping a shrinking window down the log axis.
//! * Peak: halfway (on the log axis) between the two cuts, boosted by the
//!   amount it sits below the louder of the two edges.
//!
//! The result always comes back with every band bypassed. Engaging the bands
//! is left to the caller.

use log::debug;

use crate::analysis::frequency::{frequency_at_position, normalized_log_position};
use crate::analysis::{FilterSettings, Slope, SpectrumHistory};
use crate::consts::{ANALYSIS_RANGE_MAX, MAX_FREQUENCY_HZ, MIN_FREQUENCY_HZ};

/// How far the high-cut window moves down the log axis per step.
const REFINE_STEP: f32 = 0.1;
/// The high-cut window never goes below this log position (~630 Hz).
const REFINE_FLOOR: f32 = 0.5;
/// Every accepted refinement adds a pick, so this also caps refinements at
/// two. Steps that find nothing new do not count; the floor ends those.
const MAX_HIGH_PICKS: usize = 3;

/// Added to the chosen high pick's log position before converting it to Hz,
/// so the cut sits just above the pick rather than on it.
const HIGH_CUT_OFFSET: f32 = 0.01;

/// Spacing between high picks is compared in hundredths of the log axis.
const SPACING_SCALE: f32 = 100.0;
const STEEPEST_SPACING: f32 = 5.0;
const STEEP_SPACING: f32 = 7.0;
const MODERATE_SPACING: f32 = 11.0;

const LOW_CUT_SLOPE: Slope = Slope::Db24;
const PEAK_GAIN_RANGE_DB: f32 = 24.0;
const PEAK_SPAN_WEIGHT: f32 = 6.0;

pub struct AutoEqEstimator {
    bin_width_hz: f32,
}

impl AutoEqEstimator {
    pub fn new(bin_width_hz: f32) -> Self {
        Self { bin_width_hz }
    }

    pub fn for_stream(sample_rate: f32, fft_size: usize) -> Self {
        Self::new(sample_rate / fft_size as f32)
    }

    pub fn bin_width_hz(&self) -> f32 {
        self.bin_width_hz
    }

    /// Average the history (emptying it) and derive new settings from it.
    ///
    /// `current` is returned unchanged when there is nothing to analyze: an
    /// empty history, or an average whose lowest bin is silent.
    pub fn estimate(
        &self,
        history: &mut SpectrumHistory,
        current: &FilterSettings,
    ) -> FilterSettings {
        let count = history.len();
        match history.take_average() {
            Some(average) => {
                debug!("Estimating from {count} sample(s), {} bins", average.len());
                self.estimate_from_average(&average, current)
            }
            None => *current,
        }
    }

    pub fn estimate_from_average(
        &self,
        average: &[f32],
        current: &FilterSettings,
    ) -> FilterSettings {
        if average.first().is_none_or(|&level| level == 0.0) {
            debug!("Lowest bin is silent, keeping current settings");
            return *current;
        }

        let low = low_cut_bin(average);
        let picks = self.high_cut_picks(average);
        let high = picks[picks.len() - 1];

        let high_cut_slope = self.high_cut_slope(&picks);
        let high_cut_freq = whole_hz(frequency_at_position(self.position(high) + HIGH_CUT_OFFSET));

        let low_position = self.position(low);
        let span = self.position(high) - low_position;
        let (mid, peak_gain_db, peak_quality) = if span <= 0.0 {
            (0, 0.0, 0.0)
        } else {
            let mid = self.bin_at(low_position + span / 2.0).min(average.len() - 1);
            let edge = average[low].max(average[high]);
            let gain = PEAK_GAIN_RANGE_DB * (edge - average[mid]) / ANALYSIS_RANGE_MAX;
            (
                mid,
                gain.clamp(-PEAK_GAIN_RANGE_DB, PEAK_GAIN_RANGE_DB),
                1.0 / (span * PEAK_SPAN_WEIGHT + 1.0),
            )
        };

        debug!("Auto EQ picks: low {low}, mid {mid}, high {picks:?}");

        FilterSettings {
            low_cut_freq: self.bin_hz(low),
            low_cut_slope: LOW_CUT_SLOPE,
            peak_freq: self.bin_hz(mid),
            peak_gain_db,
            peak_quality,
            high_cut_freq,
            high_cut_slope,
            low_cut_bypassed: true,
            peak_bypassed: true,
            high_cut_bypassed: true,
        }
    }

    /// The last non-silent bin, followed by each louder bin found while
    /// sweeping a window down the log axis. Never empty.
    fn high_cut_picks(&self, average: &[f32]) -> Vec<usize> {
        let mut top = average.len() - 1;
        while top > 0 && average[top] == 0.0 {
            top -= 1;
        }

        let mut picks = vec![top];
        let mut position = self.position(top);
        let mut step = REFINE_STEP;

        while picks.len() < MAX_HIGH_PICKS {
            position -= step;
            if position <= REFINE_FLOOR {
                break;
            }

            let last = picks[picks.len() - 1];
            let window = self.bin_at(position).min(last);
            let found = window + loudest_bin(&average[window..=last]);

            if found == last {
                step += REFINE_STEP;
            } else {
                picks.push(found);
                step = REFINE_STEP;
            }
        }

        picks
    }

    fn high_cut_slope(&self, picks: &[usize]) -> Slope {
        let (a, b) = match picks {
            [] | [_] => return Slope::Db12,
            [first, second] => (*first, *second),
            // With three or more picks the second pick is compared with
            // itself. The spacing is always zero, so the steepest tier wins.
            [_, second, ..] => (*second, *second),
        };

        let spacing = (self.position(a) - self.position(b)).abs() * SPACING_SCALE;
        if spacing < STEEPEST_SPACING {
            Slope::Db48
        } else if spacing < STEEP_SPACING {
            Slope::Db36
        } else if spacing < MODERATE_SPACING {
            Slope::Db24
        } else {
            Slope::Db12
        }
    }

    fn position(&self, bin: usize) -> f32 {
        normalized_log_position(bin as f32 * self.bin_width_hz)
    }

    fn bin_at(&self, position: f32) -> usize {
        (frequency_at_position(position) / self.bin_width_hz).floor() as usize
    }

    fn bin_hz(&self, bin: usize) -> f32 {
        whole_hz(bin as f32 * self.bin_width_hz)
    }
}

/// First bin, walking up from bin 1, that is quieter than the one below it.
/// A spectrum that never falls stops at its last bin.
fn low_cut_bin(average: &[f32]) -> usize {
    let mut i = 1;
    while i < average.len() && average[i] >= average[i - 1] {
        i += 1;
    }
    i.min(average.len() - 1)
}

/// Index of the largest value. Ties go to the later index.
fn loudest_bin(levels: &[f32]) -> usize {
    levels
        .iter()
        .enumerate()
        .fold(0, |best, (i, &level)| if level >= levels[best] { i } else { best })
}

fn whole_hz(frequency: f32) -> f32 {
    frequency.floor().clamp(MIN_FREQUENCY_HZ, MAX_FREQUENCY_HZ)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const BIN_WIDTH: f32 = 48000.0 / 2048.0;
    const BINS: usize = 1024;

    fn estimator() -> AutoEqEstimator {
        AutoEqEstimator::new(BIN_WIDTH)
    }

    #[test]
    fn empty_history_returns_current() {
        let mut history = SpectrumHistory::new(10);
        let current = FilterSettings {
            peak_freq: 1234.0,
            ..FilterSettings::default()
        };
        assert_eq!(estimator().estimate(&mut history, &current), current);
    }

    #[test]
    fn silent_lowest_bin_returns_current_and_consumes_history() {
        let mut history = SpectrumHistory::new(10);
        let mut levels = vec![0.0f32; BINS];
        levels[100] = 500.0;
        history.push(levels.into());

        let current = FilterSettings::default();
        assert_eq!(estimator().estimate(&mut history, &current), current);
        assert!(history.is_empty());
    }

    #[test]
    fn low_cut_scan_stops_at_the_end_of_a_rising_spectrum() {
        let rising: Vec<f32> = (1..=BINS).map(|i| i as f32).collect();
        assert_eq!(low_cut_bin(&rising), BINS - 1);
        assert_eq!(low_cut_bin(&[5.0]), 0);
        assert_eq!(low_cut_bin(&[1.0, 3.0, 2.0, 4.0]), 2);
    }

    #[test]
    fn loudest_bin_prefers_the_later_tie() {
        assert_eq!(loudest_bin(&[1.0, 3.0, 3.0, 2.0]), 2);
        assert_eq!(loudest_bin(&[1.0, 1.0, 1.0]), 2);
        assert_eq!(loudest_bin(&[4.0]), 0);
    }

    #[test]
    fn flat_spectrum_keeps_a_single_high_pick() {
        let picks = estimator().high_cut_picks(&vec![1.0; BINS]);
        assert_eq!(picks, vec![BINS - 1]);
    }

    #[test]
    fn two_high_picks_pick_slope_from_their_spacing() {
        let mut levels = vec![1.0; BINS];
        levels[600] = 10.0;

        let estimator = estimator();
        let picks = estimator.high_cut_picks(&levels);
        assert_eq!(picks, vec![BINS - 1, 600]);

        // About 7.7 hundredths of the log axis apart.
        assert_eq!(estimator.high_cut_slope(&picks), Slope::Db24);
        let settings = estimator.estimate_from_average(&levels, &FilterSettings::default());
        assert_eq!(settings.high_cut_slope, Slope::Db24);
    }

    #[test]
    fn three_high_picks_compare_the_second_pick_with_itself() {
        let mut levels = vec![1.0; BINS];
        levels[600] = 10.0;
        levels[300] = 20.0;

        let estimator = estimator();
        let picks = estimator.high_cut_picks(&levels);
        assert_eq!(picks, vec![BINS - 1, 600, 300]);

        // picks[0] against picks[1] would land in the 24 dB tier, but the
        // zero self-spacing always selects the steepest one.
        assert_eq!(estimator.high_cut_slope(&picks[..2]), Slope::Db24);
        assert_eq!(estimator.high_cut_slope(&picks), Slope::Db48);
    }

    #[test]
    fn refinement_stops_at_three_picks() {
        let mut levels = vec![1.0; BINS];
        levels[600] = 10.0;
        levels[300] = 20.0;
        // Still above the position floor, but never reached.
        levels[150] = 30.0;

        assert_eq!(estimator().high_cut_picks(&levels), vec![BINS - 1, 600, 300]);
    }

    #[test]
    fn slope_tiers_follow_pick_spacing() {
        // Spacing against bin 1000 in hundredths of the log axis.
        let cases = [
            (900, Slope::Db48), // 1.53
            (710, Slope::Db48), // 4.96
            (705, Slope::Db36), // 5.06
            (650, Slope::Db36), // 6.24
            (617, Slope::Db36), // 6.99
            (615, Slope::Db24), // 7.04
            (520, Slope::Db24), // 9.47
            (468, Slope::Db24), // 10.99
            (467, Slope::Db12), // 11.02
            (300, Slope::Db12), // 17.43
        ];

        let estimator = estimator();
        for (pick, expected) in cases {
            assert_eq!(estimator.high_cut_slope(&[1000, pick]), expected, "pick {pick}");
            assert_eq!(estimator.high_cut_slope(&[pick, 1000]), expected, "pick {pick}");
        }
        assert_eq!(estimator.high_cut_slope(&[1000]), Slope::Db12);
    }

    #[test]
    fn dip_between_the_cuts_becomes_a_boost() {
        let mut levels = vec![0.0; BINS];
        levels[..=10].fill(100.0);
        levels[10] = 300.0;
        levels[11..400].fill(50.0);
        levels[400] = 400.0;

        let settings = estimator().estimate_from_average(&levels, &FilterSettings::default());

        let span = normalized_log_position(400.0 * BIN_WIDTH)
            - normalized_log_position(11.0 * BIN_WIDTH);
        assert_eq!(settings.low_cut_freq, (11.0 * BIN_WIDTH).floor());
        assert_eq!(settings.low_cut_slope, Slope::Db24);
        assert_eq!(settings.peak_freq, (66.0 * BIN_WIDTH).floor());
        assert_relative_eq!(settings.peak_gain_db, 24.0 * 350.0 / 1000.0, max_relative = 1e-4);
        assert_relative_eq!(settings.peak_quality, 1.0 / (span * 6.0 + 1.0), max_relative = 1e-4);
        assert_eq!(settings.high_cut_slope, Slope::Db12);
        assert!(settings.high_cut_freq > 400.0 * BIN_WIDTH && settings.high_cut_freq < 11_000.0);
        assert!(settings.all_bypassed());
    }

    #[test]
    fn inverted_cuts_collapse_the_peak() {
        // Rises all the way to its last audible bin, so the low cut lands
        // above the high cut.
        let mut levels = vec![0.0; BINS];
        for (i, level) in levels.iter_mut().enumerate().take(200) {
            *level = 1.0 + i as f32;
        }

        let settings = estimator().estimate_from_average(&levels, &FilterSettings::default());
        assert_eq!(settings.peak_freq, MIN_FREQUENCY_HZ);
        assert_eq!(settings.peak_gain_db, 0.0);
        assert_eq!(settings.peak_quality, 0.0);
        assert!(settings.all_bypassed());
    }
}
