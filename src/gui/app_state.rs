use std::time::Duration;

use autoeq::analysis::DisplayBounds;
use autoeq::audio::{AudioStream, audio_stream, sample_tap};
use autoeq::consts::{APP_VERSION, SAMPLE_TAP_CAPACITY};
use autoeq::{AnalyzerConfig, AnalyzerPipeline, FilterSettings};
use eframe::egui;
use log::{debug, error, info};
use ringbuf::HeapCons;

use super::components::{
    AnalysisAction, render_analysis_controls, render_config_panel, render_filter_panel,
    render_spectrum_view,
};

/// Used for bin math while no stream is open.
const FALLBACK_SAMPLE_RATE: f32 = 48000.0;

pub struct AppState {
    active_config: AnalyzerConfig,
    pending_config: AnalyzerConfig, // Local copy for sliders
    devices: Vec<String>,
    active_device_idx: usize,
    pending_device_idx: usize, // Local selection for device selector
    audio_stream: Option<AudioStream>,
    pipeline: AnalyzerPipeline,
    spectrum_bounds: DisplayBounds,
    filter_settings: FilterSettings,
    analyzer_enabled: bool,
    capture_enabled: bool,
}

impl eframe::App for AppState {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.analyzer_enabled {
            self.pipeline.process(self.spectrum_bounds, self.capture_enabled);
        }

        self.render_top_panel(ctx);
        self.render_bottom_panel(ctx);
        self.render_central_panel(ctx);

        ctx.request_repaint_after(Duration::from_millis(self.active_config.update_interval_ms));
    }
}

impl AppState {
    pub fn new(config: AnalyzerConfig) -> Self {
        debug!("Initializing GUI state...");

        let devices = audio_stream::input_device_names();
        debug!("Found {} audio input devices", devices.len());

        let selected_device_idx = audio_stream::default_input_device_index(&devices);
        let selected_device = devices
            .get(selected_device_idx)
            .map(|s| s.as_str())
            .unwrap_or("None");
        info!("Selected initial audio device: {selected_device}");

        let (audio_stream, source) = open_stream(selected_device_idx, &devices);
        let sample_rate = audio_stream
            .as_ref()
            .map_or(FALLBACK_SAMPLE_RATE, AudioStream::sample_rate);

        debug!(
            "Initial config loaded: fft_size={}, hop_size={}, update_interval={}ms",
            config.fft_order.fft_size(),
            config.hop_size,
            config.update_interval_ms
        );

        Self {
            pipeline: AnalyzerPipeline::new(&config, source, sample_rate),
            pending_config: config.clone(),
            active_config: config,
            devices,
            pending_device_idx: selected_device_idx,
            active_device_idx: selected_device_idx,
            audio_stream,
            spectrum_bounds: DisplayBounds::default(),
            filter_settings: FilterSettings::default(),
            analyzer_enabled: true,
            capture_enabled: false,
        }
    }

    fn apply_settings(&mut self) {
        let device_name = self
            .devices
            .get(self.pending_device_idx)
            .map(|s| s.as_str())
            .unwrap_or("Unknown");

        debug!(
            "Applying settings - Device: {}, Config: {:?}",
            device_name, self.pending_config
        );

        if self.pending_device_idx != self.active_device_idx || self.audio_stream.is_none() {
            debug!("Reloading audio stream with new device...");
            // The old stream must stop before a new one opens on the same device.
            self.audio_stream = None;
            let (audio_stream, source) = open_stream(self.pending_device_idx, &self.devices);
            let sample_rate = audio_stream
                .as_ref()
                .map_or(FALLBACK_SAMPLE_RATE, AudioStream::sample_rate);
            self.audio_stream = audio_stream;
            self.pipeline.set_source(source, sample_rate);
            self.active_device_idx = self.pending_device_idx;
        }

        if self.pending_config != self.active_config {
            self.pipeline.reconfigure(&self.pending_config);
            self.active_config = self.pending_config.clone();
        }

        info!("Settings applied successfully");
    }

    fn reset_to_default(&mut self) {
        debug!("Resetting config to defaults");
        self.pending_config = AnalyzerConfig::default();
    }

    fn disable_apply_button(&self) -> bool {
        let config_unchanged = self.pending_config == self.active_config;
        let device_unchanged = self.pending_device_idx == self.active_device_idx;

        config_unchanged && device_unchanged && self.audio_stream.is_some()
    }

    fn analyze(&mut self) {
        let captured = self.pipeline.history().len();
        self.filter_settings = self.pipeline.analyze(&self.filter_settings);
        self.capture_enabled = false;
        let settings = &self.filter_settings;
        info!(
            "Auto EQ from {captured} frame(s): low cut {} Hz ({}), peak {} Hz {:+.1} dB Q {:.2}, \
             high cut {} Hz ({})",
            settings.low_cut_freq,
            settings.low_cut_slope,
            settings.peak_freq,
            settings.peak_gain_db,
            settings.peak_quality,
            settings.high_cut_freq,
            settings.high_cut_slope,
        );
    }

    fn render_top_panel(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.add_space(8.0);
            ui.horizontal(|ui| {
                ui.heading(format!("Auto EQ {APP_VERSION}"));
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    match &self.audio_stream {
                        Some(stream) => {
                            ui.colored_label(
                                egui::Color32::GREEN,
                                format!("Listening @ {} Hz", stream.sample_rate()),
                            );
                        }
                        None => {
                            ui.colored_label(egui::Color32::RED, "No Audio Stream");
                        }
                    }
                });
            });
            ui.add_space(4.0);
            ui.separator();
            ui.add_space(4.0);

            // Device Selection
            ui.horizontal(|ui| {
                ui.label("Audio Device:");
                egui::ComboBox::from_id_salt("device_selector")
                    .selected_text(
                        self.devices
                            .get(self.pending_device_idx)
                            .map(|name| name.as_str())
                            .unwrap_or("No devices"),
                    )
                    .show_ui(ui, |ui| {
                        for (idx, name) in self.devices.iter().enumerate() {
                            ui.selectable_value(&mut self.pending_device_idx, idx, name);
                        }
                    });
            });
            ui.add_space(4.0);
        });
    }

    fn render_bottom_panel(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("bottom_panel").show(ctx, |ui| {
            ui.add_space(8.0);

            ui.horizontal(|ui| {
                ui.add_space(4.0);
                let apply_enabled = !self.disable_apply_button();

                if apply_enabled {
                    if ui.button("Apply Settings").clicked() {
                        self.apply_settings();
                    }
                } else {
                    ui.add_enabled(false, egui::Button::new("Apply Settings"));
                }

                if ui.button("↺ Reset to Default").clicked() {
                    self.reset_to_default();
                }
            });
            ui.add_space(8.0);
        });
    }

    fn render_central_panel(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false; 2])
                .show(ui, |ui| {
                    ui.add_space(8.0);

                    let rect = render_spectrum_view(
                        ui,
                        self.analyzer_enabled.then(|| self.pipeline.curve()),
                        &self.filter_settings,
                    );
                    self.spectrum_bounds =
                        DisplayBounds::new(rect.left(), rect.top(), rect.width(), rect.height());

                    ui.add_space(8.0);

                    let history = self.pipeline.history();
                    let (history_len, history_capacity) = (history.len(), history.capacity());
                    let action = render_analysis_controls(
                        ui,
                        &mut self.analyzer_enabled,
                        &mut self.capture_enabled,
                        history_len,
                        history_capacity,
                    );
                    match action {
                        AnalysisAction::Analyze => self.analyze(),
                        AnalysisAction::ClearHistory => {
                            debug!("Clearing {history_len} captured frame(s)");
                            self.pipeline.clear_history();
                        }
                        AnalysisAction::None => {}
                    }

                    ui.add_space(8.0);
                    render_filter_panel(ui, &mut self.filter_settings);

                    ui.add_space(20.0);

                    // Configuration Section
                    render_config_panel(ui, &mut self.pending_config);
                });
        });
    }
}

/// Open `device_idx` feeding a fresh sample tap. The consumer half is returned
/// even when the device fails to open, so the pipeline always has a source.
fn open_stream(device_idx: usize, devices: &[String]) -> (Option<AudioStream>, HeapCons<f32>) {
    let (producer, consumer) = sample_tap(SAMPLE_TAP_CAPACITY);

    match audio_stream::create_audio_stream(device_idx, devices, producer) {
        Ok(stream) => (Some(stream), consumer),
        Err(err) => {
            error!("Failed to open audio stream: {err:#}");
            (None, consumer)
        }
    }
}
