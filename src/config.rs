use crate::audio::FftOrder;
use crate::consts;

#[derive(Clone, PartialEq, Debug)]
pub struct AnalyzerConfig {
    /// FFT order used by the spectrum generator.
    /// Larger = better frequency resolution but slower response.
    /// 2048 samples at 48kHz = ~43ms of audio, 23.4Hz per bin
    pub fft_order: FftOrder,

    /// Level (in dB) substituted for silence and anything quieter.
    /// Lower = more of the quiet spectrum shows up on the curve
    /// and counts towards the analysis.
    pub noise_floor_db: f32,

    /// Number of new samples between two spectrum frames.
    /// Smaller = more frames (and more CPU) per second of audio.
    pub hop_size: usize,

    /// Refresh interval of the spectrum view in milliseconds.
    pub update_interval_ms: u64,

    /// How many analysis samples are kept for the auto EQ average.
    pub history_capacity: usize,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            fft_order: FftOrder::Order2048,
            noise_floor_db: -48.0,
            hop_size: 512,
            update_interval_ms: 16,
            history_capacity: consts::HISTORY_CAPACITY,
        }
    }
}
