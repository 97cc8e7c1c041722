use log::{debug, trace};
use ringbuf::HeapCons;
use ringbuf::traits::{Consumer, Observer};

use crate::analysis::{
    AutoEqEstimator, CurveGenerator, DisplayBounds, FilterSettings, SpectrumCurve,
    SpectrumHistory,
};
use crate::audio::{FftOrder, MonoFrameBuffer, SpectrumGenerator, SpectrumSnapshot};
use crate::config::AnalyzerConfig;

/// Everything between the raw sample tap and the display curve.
///
/// Call `process` once per UI frame. It analyzes every complete hop waiting
/// in the tap, keeps the newest curve for painting and, while capture is on,
/// records one analysis sample per spectrum frame for `analyze`.
pub struct AnalyzerPipeline {
    source: HeapCons<f32>,
    sample_rate: f32,
    noise_floor_db: f32,
    block: Vec<f32>,
    frame: MonoFrameBuffer,
    spectrum: SpectrumGenerator,
    curves: CurveGenerator,
    history: SpectrumHistory,
    snapshot: SpectrumSnapshot,
    curve: SpectrumCurve,
}

impl AnalyzerPipeline {
    pub fn new(config: &AnalyzerConfig, source: HeapCons<f32>, sample_rate: f32) -> Self {
        let fft_size = config.fft_order.fft_size();

        Self {
            source,
            sample_rate,
            noise_floor_db: config.noise_floor_db,
            block: vec![0.0; config.hop_size.clamp(1, fft_size)],
            frame: MonoFrameBuffer::new(fft_size),
            spectrum: SpectrumGenerator::new(config.fft_order),
            curves: CurveGenerator::new(),
            history: SpectrumHistory::new(config.history_capacity),
            snapshot: vec![0.0; fft_size],
            curve: SpectrumCurve::default(),
        }
    }

    /// Apply a new configuration. The sample tap is kept, everything derived
    /// from the old settings (including captured history) is dropped.
    pub fn reconfigure(&mut self, config: &AnalyzerConfig) {
        debug!("Reconfiguring analyzer: {config:?}");
        self.set_order(config.fft_order);
        self.noise_floor_db = config.noise_floor_db;
        self.block
            .resize(config.hop_size.clamp(1, config.fft_order.fft_size()), 0.0);
        self.history = SpectrumHistory::new(config.history_capacity);
    }

    /// Change FFT size. Not to be called while another thread feeds the generator.
    pub fn set_order(&mut self, order: FftOrder) {
        let fft_size = order.fft_size();
        self.spectrum.set_order(order);
        self.frame.resize(fft_size);
        self.snapshot = vec![0.0; fft_size];
        self.block.truncate(fft_size);
        self.curve.points.clear();
        self.history.clear();
    }

    /// Read from a new tap, e.g. after switching input device.
    pub fn set_source(&mut self, source: HeapCons<f32>, sample_rate: f32) {
        debug!("Analyzer source changed, {sample_rate} Hz");
        self.source = source;
        self.sample_rate = sample_rate;
        self.frame.resize(self.spectrum.fft_size());
        self.curve.points.clear();
        self.history.clear();
    }

    /// Analyze all pending audio. Returns the number of spectrum frames produced.
    pub fn process(&mut self, bounds: DisplayBounds, capture: bool) -> usize {
        let hop = self.block.len();
        let mut frames = 0;

        while self.source.occupied_len() >= hop {
            self.source.pop_slice(&mut self.block);
            self.frame.push_block(&self.block);
            if !self.spectrum.process(self.frame.frame(), self.noise_floor_db) {
                trace!("Snapshot channel full, frame dropped");
            }
            self.drain(bounds, capture);
            frames += 1;
        }

        if frames > 0 {
            trace!(
                "Analyzed {frames} frame(s), history {}/{}",
                self.history.len(),
                self.history.capacity()
            );
        }
        frames
    }

    fn drain(&mut self, bounds: DisplayBounds, capture: bool) {
        let fft_size = self.spectrum.fft_size();
        let bin_width = self.bin_width_hz();

        while self.spectrum.take_snapshot(&mut self.snapshot) {
            self.curves.build_curve(
                &self.snapshot,
                bounds,
                fft_size,
                bin_width,
                self.noise_floor_db,
            );
            if capture {
                let sample = self.curves.build_analysis_sample(
                    &self.snapshot,
                    fft_size,
                    self.noise_floor_db,
                );
                self.history.push(sample);
            }
        }

        while self.curves.take_curve(&mut self.curve) {}
    }

    /// Derive filter settings from everything captured so far and empty the history.
    pub fn analyze(&mut self, current: &FilterSettings) -> FilterSettings {
        AutoEqEstimator::new(self.bin_width_hz()).estimate(&mut self.history, current)
    }

    pub fn curve(&self) -> &SpectrumCurve {
        &self.curve
    }

    pub fn history(&self) -> &SpectrumHistory {
        &self.history
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    pub fn fft_size(&self) -> usize {
        self.spectrum.fft_size()
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    pub fn bin_width_hz(&self) -> f32 {
        self.sample_rate / self.spectrum.fft_size() as f32
    }
}
