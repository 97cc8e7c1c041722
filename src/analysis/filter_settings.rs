use std::fmt;

/// Roll-off steepness of a cut filter.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Default)]
pub enum Slope {
    #[default]
    Db12,
    Db24,
    Db36,
    Db48,
}

impl Slope {
    pub const ALL: [Slope; 4] = [Slope::Db12, Slope::Db24, Slope::Db36, Slope::Db48];

    pub fn db_per_octave(self) -> u32 {
        match self {
            Slope::Db12 => 12,
            Slope::Db24 => 24,
            Slope::Db36 => 36,
            Slope::Db48 => 48,
        }
    }
}

impl fmt::Display for Slope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} dB/Oct", self.db_per_octave())
    }
}

/// Target parameters for the low-cut, peak and high-cut bands.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct FilterSettings {
    pub low_cut_freq: f32,
    pub low_cut_slope: Slope,
    pub peak_freq: f32,
    pub peak_gain_db: f32,
    pub peak_quality: f32,
    pub high_cut_freq: f32,
    pub high_cut_slope: Slope,
    pub low_cut_bypassed: bool,
    pub peak_bypassed: bool,
    pub high_cut_bypassed: bool,
}

impl Default for FilterSettings {
    fn default() -> Self {
        Self {
            low_cut_freq: 20.0,
            low_cut_slope: Slope::Db12,
            peak_freq: 750.0,
            peak_gain_db: 0.0,
            peak_quality: 1.0,
            high_cut_freq: 20_000.0,
            high_cut_slope: Slope::Db12,
            low_cut_bypassed: false,
            peak_bypassed: false,
            high_cut_bypassed: false,
        }
    }
}

impl FilterSettings {
    pub fn all_bypassed(&self) -> bool {
        self.low_cut_bypassed && self.peak_bypassed && self.high_cut_bypassed
    }
}
