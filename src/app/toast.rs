//! Toast notification (bottom-right of the central panel)

use super::App;
use crate::theme;
use eframe::egui;
use std::time::Instant;

const VISIBLE_SECS: f32 = 3.0;
const FADE_SECS: f32 = 0.5;

impl App {
    pub fn show_toast(&mut self, message: impl Into<String>) {
        self.toast_message = Some(message.into());
        self.toast_start = Some(Instant::now());
    }

    /// 3s visible then fade, paused while hovered
    pub fn render_toast(&mut self, ctx: &egui::Context) {
        let (Some(msg), Some(panel_rect)) = (self.toast_message.clone(), self.central_panel_rect)
        else {
            return;
        };
        let total = VISIBLE_SECS + FADE_SECS;
        let margin = theme::SPACING_LG;
        let toast_pos = egui::pos2(panel_rect.right() - margin, panel_rect.bottom() - margin);
        let elapsed = self.toast_start.map(|t| t.elapsed().as_secs_f32()).unwrap_or(0.0);
        let alpha = if elapsed > VISIBLE_SECS {
            ((total - elapsed) / FADE_SECS).clamp(0.0, 1.0)
        } else {
            1.0
        };

        let response = egui::Area::new(egui::Id::new("toast"))
            .fixed_pos(toast_pos)
            .pivot(egui::Align2::RIGHT_BOTTOM)
            .show(ctx, |ui| {
                egui::Frame::new()
                    .fill(theme::BG_ELEVATED.gamma_multiply(0.9 * alpha))
                    .stroke(egui::Stroke::new(
                        theme::STROKE_DEFAULT,
                        theme::ACCENT.gamma_multiply(0.4 * alpha),
                    ))
                    .corner_radius(theme::RADIUS_LARGE)
                    .inner_margin(egui::Margin::symmetric(16, 10))
                    .show(ui, |ui| {
                        ui.label(
                            egui::RichText::new(msg).color(theme::TEXT_PRIMARY.gamma_multiply(alpha)),
                        );
                    });
            });

        if response.response.hovered() {
            self.toast_start = Some(Instant::now());
        }

        let elapsed = self.toast_start.map(|t| t.elapsed().as_secs_f32()).unwrap_or(0.0);
        if elapsed >= total {
            self.toast_message = None;
            self.toast_start = None;
        } else {
            ctx.request_repaint();
        }
    }
}
