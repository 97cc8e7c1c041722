//! Spectrum snapshot to display curve and analysis sample conversion.

use crate::analysis::frequency::{normalized_log_position, remap};
use crate::audio::BoundedChannel;
use crate::consts;

/// Screen rectangle the curve is drawn into, y growing downwards.
#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub struct DisplayBounds {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl DisplayBounds {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }
}

#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub struct CurvePoint {
    pub x: f32,
    pub y: f32,
}

/// Polyline through the spectrum, left to right.
#[derive(PartialEq, Debug, Default)]
pub struct SpectrumCurve {
    pub points: Vec<CurvePoint>,
}

// Written by hand so `clone_from` reuses the point buffer.
impl Clone for SpectrumCurve {
    fn clone(&self) -> Self {
        Self {
            points: self.points.clone(),
        }
    }

    fn clone_from(&mut self, source: &Self) {
        self.points.clone_from(&source.points);
    }
}

impl SpectrumCurve {
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Levels of bins `1..N/2` of one snapshot on the linear `[0, 1000]` scale.
/// Only used for averaging.
#[derive(Clone, PartialEq, Debug, Default)]
pub struct AnalysisSample(Vec<f32>);

impl AnalysisSample {
    pub fn values(&self) -> &[f32] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<f32>> for AnalysisSample {
    fn from(values: Vec<f32>) -> Self {
        Self(values)
    }
}

pub struct CurveGenerator {
    curve: SpectrumCurve,
    output: BoundedChannel<SpectrumCurve>,
}

impl Default for CurveGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl CurveGenerator {
    pub fn new() -> Self {
        Self {
            curve: SpectrumCurve::default(),
            output: BoundedChannel::new(consts::CURVE_SLOTS, SpectrumCurve::default()),
        }
    }

    /// Map `snapshot` into `bounds` on a log frequency axis and push the curve.
    ///
    /// The noise floor lands just below the bottom edge and 0 dB on the top
    /// edge. Each pixel column holds at most one vertex (the loudest bin that
    /// falls into it), so the x coordinates are strictly increasing and there
    /// are never more vertices than columns. Returns `false` if the curve was
    /// dropped because the channel is full.
    pub fn build_curve(
        &mut self,
        snapshot: &[f32],
        bounds: DisplayBounds,
        fft_size: usize,
        bin_width_hz: f32,
        noise_floor_db: f32,
    ) -> bool {
        let num_bins = (fft_size / 2).min(snapshot.len());
        let bottom = bounds.bottom();
        let map_y = |db: f32| {
            let y = remap(
                db,
                noise_floor_db,
                0.0,
                bottom + consts::CURVE_BOTTOM_MARGIN,
                bounds.top,
            );
            if y.is_finite() { y } else { bottom }
        };

        let points = &mut self.curve.points;
        points.clear();

        if num_bins > 0 && bounds.width > 0.0 {
            points.push(CurvePoint {
                x: bounds.left,
                y: map_y(snapshot[0]),
            });

            let mut last_column = 0.0;
            for (bin, &db) in snapshot.iter().enumerate().take(num_bins).skip(1) {
                let frequency = bin as f32 * bin_width_hz;
                let column = (normalized_log_position(frequency) * bounds.width).floor();
                if column >= bounds.width {
                    break;
                }

                let y = map_y(db);
                if column > last_column {
                    points.push(CurvePoint {
                        x: bounds.left + column,
                        y,
                    });
                    last_column = column;
                } else if let Some(last) = points.last_mut() {
                    last.y = last.y.min(y);
                }
            }
        }

        self.output.push(&self.curve)
    }

    pub fn curves_available(&self) -> usize {
        self.output.available_for_reading()
    }

    pub fn take_curve(&self, out: &mut SpectrumCurve) -> bool {
        self.output.pull(out)
    }

    /// Map bins `1..fft_size / 2` of `snapshot` onto `[0, 1000]`, noise floor
    /// at 0. Non-finite results become 0.
    pub fn build_analysis_sample(
        &self,
        snapshot: &[f32],
        fft_size: usize,
        noise_floor_db: f32,
    ) -> AnalysisSample {
        let num_bins = (fft_size / 2).min(snapshot.len());

        snapshot
            .iter()
            .take(num_bins)
            .skip(1)
            .map(|&db| {
                let level = remap(db, noise_floor_db, 0.0, 0.0, consts::ANALYSIS_RANGE_MAX);
                if level.is_finite() { level } else { 0.0 }
            })
            .collect::<Vec<_>>()
            .into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const NOISE_FLOOR: f32 = -48.0;
    const FFT_SIZE: usize = 2048;
    const BIN_WIDTH: f32 = 48000.0 / FFT_SIZE as f32;

    fn flat_snapshot(db: f32) -> Vec<f32> {
        vec![db; FFT_SIZE]
    }

    fn built_curve(
        generator: &mut CurveGenerator,
        snapshot: &[f32],
        bounds: DisplayBounds,
    ) -> SpectrumCurve {
        assert!(generator.build_curve(snapshot, bounds, FFT_SIZE, BIN_WIDTH, NOISE_FLOOR));
        let mut curve = SpectrumCurve::default();
        assert!(generator.take_curve(&mut curve));
        curve
    }

    #[test]
    fn vertices_are_bounded_and_strictly_increasing() {
        let mut generator = CurveGenerator::new();
        let bounds = DisplayBounds::new(0.0, 0.0, 300.0, 200.0);
        let snapshot: Vec<f32> = (0..FFT_SIZE).map(|i| -((i % 48) as f32)).collect();
        let curve = built_curve(&mut generator, &snapshot, bounds);

        assert!(curve.points.len() > 1);
        assert!(curve.points.len() <= bounds.width as usize);
        assert!(curve.points.windows(2).all(|pair| pair[0].x < pair[1].x));
        assert!(curve.points.iter().all(|p| p.x >= 0.0 && p.x < bounds.width));
        assert_eq!(curve.points[0].x, 0.0);
    }

    #[test]
    fn levels_map_between_top_and_bottom() {
        let mut generator = CurveGenerator::new();
        let bounds = DisplayBounds::new(10.0, 20.0, 400.0, 100.0);

        let loud = built_curve(&mut generator, &flat_snapshot(0.0), bounds);
        assert!(loud.points.iter().all(|p| p.y == bounds.top));

        let silent = built_curve(&mut generator, &flat_snapshot(NOISE_FLOOR), bounds);
        assert!(silent
            .points
            .iter()
            .all(|p| p.y == bounds.bottom() + consts::CURVE_BOTTOM_MARGIN));

        let half = built_curve(&mut generator, &flat_snapshot(NOISE_FLOOR / 2.0), bounds);
        assert_relative_eq!(half.points[3].y, 20.0 + 110.0 / 2.0);
        assert_eq!(half.points[0].x, bounds.left);
    }

    #[test]
    fn non_finite_levels_fall_to_the_bottom() {
        let mut generator = CurveGenerator::new();
        let bounds = DisplayBounds::new(0.0, 0.0, 200.0, 100.0);
        let mut snapshot = flat_snapshot(-6.0);
        snapshot[0] = f32::NAN;

        let curve = built_curve(&mut generator, &snapshot, bounds);
        assert_eq!(curve.points[0].y, bounds.bottom());
    }

    #[test]
    fn a_column_keeps_its_loudest_bin() {
        let mut generator = CurveGenerator::new();
        // Narrow enough that the top octave packs many bins into each column.
        let bounds = DisplayBounds::new(0.0, 0.0, 50.0, 100.0);
        let mut snapshot = flat_snapshot(NOISE_FLOOR);
        snapshot[700] = 0.0;

        let curve = built_curve(&mut generator, &snapshot, bounds);
        let column = (normalized_log_position(700.0 * BIN_WIDTH) * bounds.width).floor();
        let vertex = curve
            .points
            .iter()
            .find(|p| p.x == column)
            .expect("column of bin 700 has a vertex");
        assert_eq!(vertex.y, bounds.top);
    }

    #[test]
    fn full_curve_channel_drops_newest() {
        let mut generator = CurveGenerator::new();
        let bounds = DisplayBounds::new(0.0, 0.0, 100.0, 100.0);
        let snapshot = flat_snapshot(-12.0);
        for _ in 0..consts::CURVE_SLOTS {
            assert!(generator.build_curve(&snapshot, bounds, FFT_SIZE, BIN_WIDTH, NOISE_FLOOR));
        }
        assert!(!generator.build_curve(&snapshot, bounds, FFT_SIZE, BIN_WIDTH, NOISE_FLOOR));
        assert_eq!(generator.curves_available(), consts::CURVE_SLOTS);
    }

    #[test]
    fn analysis_sample_is_linear_and_skips_bin_zero() {
        let generator = CurveGenerator::new();
        let mut snapshot = flat_snapshot(NOISE_FLOOR);
        snapshot[0] = 0.0;
        snapshot[1] = 0.0;
        snapshot[2] = -24.0;

        let sample = generator.build_analysis_sample(&snapshot, FFT_SIZE, NOISE_FLOOR);
        assert_eq!(sample.len(), FFT_SIZE / 2 - 1);
        assert_relative_eq!(sample.values()[0], 1000.0);
        assert_relative_eq!(sample.values()[1], 500.0);
        assert_eq!(sample.values()[2], 0.0);
    }

    #[test]
    fn analysis_sample_clamps_non_finite() {
        let generator = CurveGenerator::new();
        let mut snapshot = flat_snapshot(-12.0);
        snapshot[5] = f32::INFINITY;
        snapshot[6] = f32::NAN;

        let sample = generator.build_analysis_sample(&snapshot, FFT_SIZE, NOISE_FLOOR);
        assert_eq!(sample.values()[4], 0.0);
        assert_eq!(sample.values()[5], 0.0);
        assert!(sample.values().iter().all(|v| v.is_finite()));
    }
}
