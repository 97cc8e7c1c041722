//! Spectrum analysis core of an auto equalizer.
//!
//! Audio flows through three stages:
//! - [`audio::SpectrumGenerator`] turns mono frames into dB snapshots
//! - [`analysis::CurveGenerator`] maps snapshots onto a log frequency display
//!   curve and onto linear analysis samples
//! - [`analysis::AutoEqEstimator`] averages the captured samples and derives
//!   low-cut, peak and high-cut [`analysis::FilterSettings`]
//!
//! [`analysis::AnalyzerPipeline`] wires the stages together behind the
//! lock-free sample tap fed by [`audio::AudioStream`].

pub mod analysis;
pub mod audio;
pub mod config;
pub mod consts;
pub mod error;

pub use analysis::{AnalyzerPipeline, AutoEqEstimator, FilterSettings, Slope};
pub use config::AnalyzerConfig;
pub use error::{AnalyzerError, Result};
