pub mod curve;
pub mod estimator;
pub mod filter_settings;
pub mod frequency;
pub mod history;
pub mod pipeline;

pub use curve::{AnalysisSample, CurveGenerator, CurvePoint, DisplayBounds, SpectrumCurve};
pub use estimator::AutoEqEstimator;
pub use filter_settings::{FilterSettings, Slope};
pub use history::SpectrumHistory;
pub use pipeline::AnalyzerPipeline;
