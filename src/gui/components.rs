mod config_panel;
mod filter_panel;
mod spectrum_view;

pub use config_panel::render_config_panel;
pub use filter_panel::{AnalysisAction, render_analysis_controls, render_filter_panel};
pub use spectrum_view::render_spectrum_view;
