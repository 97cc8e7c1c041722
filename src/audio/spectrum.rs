use std::f32::consts::PI;
use std::sync::Arc;

use log::debug;
use rustfft::{Fft, FftPlanner, num_complex::Complex};

use crate::audio::BoundedChannel;
use crate::consts;
use crate::error::{AnalyzerError, Result};

/// Magnitudes in dB, one per FFT bin. Only the first half carries information,
/// the mirrored upper half is held at the noise floor.
pub type SpectrumSnapshot = Vec<f32>;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum FftOrder {
    #[default]
    Order2048 = 11,
    Order4096 = 12,
    Order8192 = 13,
}

impl FftOrder {
    pub const ALL: [FftOrder; 3] = [FftOrder::Order2048, FftOrder::Order4096, FftOrder::Order8192];

    pub fn fft_size(self) -> usize {
        1 << self as u32
    }

    pub fn from_fft_size(size: usize) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|order| order.fft_size() == size)
            .ok_or(AnalyzerError::UnsupportedFftSize(size))
    }
}

impl TryFrom<u32> for FftOrder {
    type Error = AnalyzerError;

    fn try_from(order: u32) -> Result<Self> {
        match order {
            11 => Ok(FftOrder::Order2048),
            12 => Ok(FftOrder::Order4096),
            13 => Ok(FftOrder::Order8192),
            other => Err(AnalyzerError::UnsupportedFftOrder(other)),
        }
    }
}

/// Convert a linear gain to decibels, substituting `floor_db` for silence.
pub fn gain_to_decibels(gain: f32, floor_db: f32) -> f32 {
    if gain > 0.0 {
        (20.0 * gain.log10()).max(floor_db)
    } else {
        floor_db
    }
}

/// Blackman-Harris window, scaled so the coefficients sum to `size`.
fn blackman_harris(size: usize) -> Vec<f32> {
    let denom = (size - 1) as f32;
    let mut window: Vec<f32> = (0..size)
        .map(|i| {
            let phase = 2.0 * PI * i as f32 / denom;
            0.35875 - 0.48829 * phase.cos() + 0.14128 * (2.0 * phase).cos()
                - 0.01168 * (3.0 * phase).cos()
        })
        .collect();

    let sum: f32 = window.iter().sum();
    if sum > 0.0 {
        let factor = size as f32 / sum;
        window.iter_mut().for_each(|w| *w *= factor);
    }
    window
}

/// Turns mono audio frames into dB magnitude snapshots.
///
/// Everything sized by the FFT length lives here and is rebuilt together by
/// `set_order`. `process` itself does not allocate.
pub struct SpectrumGenerator {
    order: FftOrder,
    window: Vec<f32>,
    fft: Arc<dyn Fft<f32>>,
    buffer: Vec<Complex<f32>>,
    scratch: Vec<Complex<f32>>,
    snapshot: SpectrumSnapshot,
    output: BoundedChannel<SpectrumSnapshot>,
}

impl SpectrumGenerator {
    pub fn new(order: FftOrder) -> Self {
        let fft_size = order.fft_size();
        let fft = FftPlanner::new().plan_fft_forward(fft_size);
        let scratch = vec![Complex::new(0.0, 0.0); fft.get_inplace_scratch_len()];

        Self {
            order,
            window: blackman_harris(fft_size),
            fft,
            buffer: vec![Complex::new(0.0, 0.0); fft_size],
            scratch,
            snapshot: vec![0.0; fft_size],
            output: BoundedChannel::new(consts::SNAPSHOT_SLOTS, vec![0.0; fft_size]),
        }
    }

    /// Switch FFT size. Snapshots still waiting in the channel are discarded.
    /// Must not run concurrently with `process` or `take_snapshot`.
    pub fn set_order(&mut self, order: FftOrder) {
        debug!("Spectrum generator order {:?} -> {:?}", self.order, order);
        *self = Self::new(order);
    }

    pub fn order(&self) -> FftOrder {
        self.order
    }

    pub fn fft_size(&self) -> usize {
        self.order.fft_size()
    }

    /// Analyze one frame and push the snapshot. A frame shorter than the FFT
    /// size is zero padded. Returns `false` if the snapshot was dropped
    /// because the channel is full.
    pub fn process(&mut self, frame: &[f32], noise_floor_db: f32) -> bool {
        let fft_size = self.fft_size();
        let num_bins = fft_size / 2;

        let taken = frame.len().min(fft_size);
        for (slot, (&sample, &w)) in self
            .buffer
            .iter_mut()
            .zip(frame[..taken].iter().zip(&self.window))
        {
            *slot = Complex::new(sample * w, 0.0);
        }
        self.buffer[taken..].fill(Complex::new(0.0, 0.0));

        self.fft.process_with_scratch(&mut self.buffer, &mut self.scratch);

        for (db, bin) in self.snapshot[..num_bins].iter_mut().zip(&self.buffer) {
            let magnitude = bin.norm() / num_bins as f32;
            let magnitude = if magnitude.is_finite() { magnitude } else { 0.0 };
            *db = gain_to_decibels(magnitude, noise_floor_db);
        }
        self.snapshot[num_bins..].fill(noise_floor_db);

        self.output.push(&self.snapshot)
    }

    pub fn available_snapshot_count(&self) -> usize {
        self.output.available_for_reading()
    }

    pub fn take_snapshot(&self, out: &mut SpectrumSnapshot) -> bool {
        self.output.pull(out)
    }
}
