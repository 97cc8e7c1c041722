use autoeq::FilterSettings;
use autoeq::analysis::SpectrumCurve;
use autoeq::analysis::frequency::normalized_log_position;
use eframe::egui;

const GRID_FREQUENCIES: [f32; 10] = [
    20.0, 50.0, 100.0, 200.0, 500.0, 1000.0, 2000.0, 5000.0, 10000.0, 20000.0,
];

/// Paints the spectrum curve over a log frequency grid and returns the rect
/// it was painted into, which is where the next curve should be mapped.
pub fn render_spectrum_view(
    ui: &mut egui::Ui,
    curve: Option<&SpectrumCurve>,
    settings: &FilterSettings,
) -> egui::Rect {
    let mut painted = egui::Rect::NOTHING;

    ui.group(|ui| {
        ui.label("Spectrum");

        let desired_height = 260.0;
        let (response, painter) = ui.allocate_painter(
            egui::vec2(ui.available_width(), desired_height),
            egui::Sense::hover(),
        );

        let rect = response.rect;
        painted = rect;

        // Draw background
        painter.rect_filled(rect, 0.0, egui::Color32::from_gray(20));

        let grid = egui::Stroke::new(0.5, egui::Color32::from_gray(60));
        let x_at = |freq: f32| rect.left() + normalized_log_position(freq) * rect.width();

        for freq in GRID_FREQUENCIES {
            let x = x_at(freq);
            painter.line_segment(
                [egui::pos2(x, rect.top()), egui::pos2(x, rect.bottom())],
                grid,
            );
            painter.text(
                egui::pos2(x + 2.0, rect.bottom() - 2.0),
                egui::Align2::LEFT_BOTTOM,
                frequency_label(freq),
                egui::FontId::monospace(10.0),
                egui::Color32::from_gray(120),
            );
        }

        // Filter markers
        let cut = egui::Color32::from_rgb(255, 160, 60);
        let peak = egui::Color32::from_rgb(120, 220, 120);
        let bands = [
            (settings.low_cut_freq, settings.low_cut_bypassed, cut),
            (settings.peak_freq, settings.peak_bypassed, peak),
            (settings.high_cut_freq, settings.high_cut_bypassed, cut),
        ];
        for (freq, bypassed, color) in bands {
            let color = if bypassed { color.gamma_multiply(0.35) } else { color };
            let x = x_at(freq);
            painter.line_segment(
                [egui::pos2(x, rect.top()), egui::pos2(x, rect.bottom())],
                egui::Stroke::new(1.0, color),
            );
        }

        if let Some(curve) = curve
            && curve.points.len() > 1
        {
            let points: Vec<egui::Pos2> = curve
                .points
                .iter()
                .map(|p| egui::pos2(p.x, p.y.min(rect.bottom())))
                .collect();

            painter.add(egui::Shape::line(
                points,
                egui::Stroke::new(1.5, egui::Color32::from_rgb(100, 200, 255)),
            ));
        }
    });

    painted
}

fn frequency_label(freq: f32) -> String {
    if freq >= 1000.0 {
        format!("{}k", freq / 1000.0)
    } else {
        format!("{freq}")
    }
}
