use autoeq::consts::{MAX_FREQUENCY_HZ, MIN_FREQUENCY_HZ};
use autoeq::{FilterSettings, Slope};
use eframe::egui;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum AnalysisAction {
    None,
    Analyze,
    ClearHistory,
}

/// Analyzer/capture toggles with the Analyze and Clear buttons.
pub fn render_analysis_controls(
    ui: &mut egui::Ui,
    analyzer_enabled: &mut bool,
    capture_enabled: &mut bool,
    history_len: usize,
    history_capacity: usize,
) -> AnalysisAction {
    let mut action = AnalysisAction::None;

    ui.group(|ui| {
        ui.horizontal(|ui| {
            ui.checkbox(analyzer_enabled, "Analyzer");
            ui.add_enabled(
                *analyzer_enabled,
                egui::Checkbox::new(capture_enabled, "Capture"),
            )
            .on_hover_text("Record spectrum frames for the next analysis");

            ui.separator();

            ui.add_enabled_ui(history_len > 0, |ui| {
                if ui
                    .button("Analyze")
                    .on_hover_text("Derive filter settings from the captured frames")
                    .clicked()
                {
                    action = AnalysisAction::Analyze;
                }
                if ui.button("Clear").clicked() {
                    action = AnalysisAction::ClearHistory;
                }
            });
        });

        let fill = history_len as f32 / history_capacity.max(1) as f32;
        ui.add(egui::ProgressBar::new(fill).text(format!(
            "{history_len} / {history_capacity} frames captured"
        )));
    });

    action
}

pub fn render_filter_panel(ui: &mut egui::Ui, settings: &mut FilterSettings) {
    ui.label(egui::RichText::new("Filters").size(16.0));
    ui.add_space(8.0);

    egui::Grid::new("filter_settings_grid")
        .num_columns(4)
        .spacing([20.0, 8.0])
        .show(ui, |ui| {
            ui.label("Low Cut:");
            frequency_slider(ui, &mut settings.low_cut_freq);
            slope_selector(ui, "low_cut_slope", &mut settings.low_cut_slope);
            ui.checkbox(&mut settings.low_cut_bypassed, "Bypass");
            ui.end_row();

            ui.label("Peak:");
            frequency_slider(ui, &mut settings.peak_freq);
            ui.horizontal(|ui| {
                ui.add(
                    egui::DragValue::new(&mut settings.peak_gain_db)
                        .range(-24.0..=24.0)
                        .speed(0.1)
                        .suffix(" dB"),
                );
                ui.add(
                    egui::DragValue::new(&mut settings.peak_quality)
                        .range(0.0..=10.0)
                        .speed(0.01)
                        .prefix("Q "),
                );
            });
            ui.checkbox(&mut settings.peak_bypassed, "Bypass");
            ui.end_row();

            ui.label("High Cut:");
            frequency_slider(ui, &mut settings.high_cut_freq);
            slope_selector(ui, "high_cut_slope", &mut settings.high_cut_slope);
            ui.checkbox(&mut settings.high_cut_bypassed, "Bypass");
            ui.end_row();
        });

    if settings.all_bypassed() {
        ui.colored_label(egui::Color32::GRAY, "All bands bypassed");
    }
}

fn frequency_slider(ui: &mut egui::Ui, freq: &mut f32) {
    ui.add(
        egui::Slider::new(freq, MIN_FREQUENCY_HZ..=MAX_FREQUENCY_HZ)
            .logarithmic(true)
            .suffix(" Hz"),
    );
}

fn slope_selector(ui: &mut egui::Ui, id: &str, slope: &mut Slope) {
    egui::ComboBox::from_id_salt(id)
        .selected_text(slope.to_string())
        .show_ui(ui, |ui| {
            for option in Slope::ALL {
                ui.selectable_value(slope, option, option.to_string());
            }
        });
}
