use autoeq::AnalyzerConfig;
use autoeq::audio::FftOrder;
use eframe::egui;

pub fn render_config_panel(ui: &mut egui::Ui, config: &mut AnalyzerConfig) {
    ui.label(egui::RichText::new("Configuration").size(16.0));
    ui.add_space(8.0);

    // Spectrum Settings
    render_spectrum_settings(ui, config);

    ui.add_space(8.0);

    // Capture Settings
    render_capture_settings(ui, config);

    ui.add_space(20.0);
}

fn render_spectrum_settings(ui: &mut egui::Ui, config: &mut AnalyzerConfig) {
    egui::CollapsingHeader::new("Spectrum")
        .default_open(true)
        .show(ui, |ui| {
            ui.add_space(4.0);
            egui::Grid::new("spectrum_settings_grid")
                .num_columns(2)
                .spacing([20.0, 8.0])
                .show(ui, |ui| {
                    ui.label("FFT Size:")
                        .on_hover_text("Larger = finer frequency detail, slower response");
                    egui::ComboBox::from_id_salt("fft_order")
                        .selected_text(config.fft_order.fft_size().to_string())
                        .show_ui(ui, |ui| {
                            for order in FftOrder::ALL {
                                ui.selectable_value(
                                    &mut config.fft_order,
                                    order,
                                    order.fft_size().to_string(),
                                );
                            }
                        });
                    ui.end_row();

                    ui.label("Noise Floor:")
                        .on_hover_text("Anything quieter is treated as silence");
                    ui.add(
                        egui::Slider::new(&mut config.noise_floor_db, -96.0..=-24.0)
                            .suffix(" dB"),
                    );
                    ui.end_row();

                    ui.label("Hop Size:")
                        .on_hover_text("New samples per spectrum frame (lower = more frames)");
                    ui.add(
                        egui::Slider::new(&mut config.hop_size, 64..=4096)
                            .logarithmic(true)
                            .suffix(" samples"),
                    );
                    ui.end_row();

                    ui.label("Update Interval:")
                        .on_hover_text("How often the view refreshes (lower = smoother)");
                    ui.add(
                        egui::Slider::new(&mut config.update_interval_ms, 8..=100).suffix(" ms"),
                    );
                    ui.end_row();
                });
        });
}

fn render_capture_settings(ui: &mut egui::Ui, config: &mut AnalyzerConfig) {
    egui::CollapsingHeader::new("Capture")
        .default_open(true)
        .show(ui, |ui| {
            ui.add_space(4.0);
            egui::Grid::new("capture_settings_grid")
                .num_columns(2)
                .spacing([20.0, 8.0])
                .show(ui, |ui| {
                    ui.label("History Length:")
                        .on_hover_text("Frames averaged by Analyze. Applying clears the history");
                    ui.add(
                        egui::Slider::new(&mut config.history_capacity, 100..=8000)
                            .suffix(" frames"),
                    );
                    ui.end_row();
                });
        });
}
