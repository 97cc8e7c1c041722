use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum AnalyzerError {
    #[error("unsupported FFT order {0} (expected 11, 12 or 13)")]
    UnsupportedFftOrder(u32),

    #[error("unsupported FFT size {0} (expected 2048, 4096 or 8192)")]
    UnsupportedFftSize(usize),

    #[error("unsupported sample format: {0}")]
    UnsupportedSampleFormat(String),

    #[error("no input device named {0:?}")]
    DeviceNotFound(String),
}

pub type Result<T> = std::result::Result<T, AnalyzerError>;
