mod gui;

use autoeq::AnalyzerConfig;
use log::{debug, info};

fn main() -> Result<(), eframe::Error> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    info!("Starting up...");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([900.0, 800.0])
            .with_title("Auto EQ"),
        ..Default::default()
    };

    debug!("Launching GUI...");
    let result = eframe::run_native(
        "Auto EQ analyzer",
        options,
        Box::new(|_cc| Ok(Box::new(gui::AppState::new(AnalyzerConfig::default())))),
    );

    info!("Clean shutdown complete");

    result
}
