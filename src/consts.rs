pub const APP_VERSION: &str = "v0.1.0";

/// Lowest frequency shown on the log axis and accepted for a filter cutoff.
pub const MIN_FREQUENCY_HZ: f32 = 20.0;

/// Highest frequency shown on the log axis and accepted for a filter cutoff.
pub const MAX_FREQUENCY_HZ: f32 = 20_000.0;

/// Top of the linear range analysis samples are mapped onto.
/// The noise floor maps to 0, full scale (0 dB) maps to this value.
pub const ANALYSIS_RANGE_MAX: f32 = 1000.0;

/// Number of analysis samples kept for averaging.
/// At 60 frames per second this is a little over one minute of audio.
pub const HISTORY_CAPACITY: usize = 4000;

/// Slots in the snapshot and curve channels.
/// The consumer usually drains every frame, so a few dozen is plenty.
pub const SNAPSHOT_SLOTS: usize = 30;
pub const CURVE_SLOTS: usize = 30;

/// Capacity (in mono samples) of the ring between the audio callback and the analyzer.
/// Enough for several frames at the largest FFT size.
pub const SAMPLE_TAP_CAPACITY: usize = 8192 * 4;

/// Extra pixels below the bottom edge the noise floor maps to,
/// so silence draws just out of view.
pub const CURVE_BOTTOM_MARGIN: f32 = 10.0;
