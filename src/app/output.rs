//! Central panel: the text to render and the resulting word cloud

use super::App;
use crate::constants::APP_NAME;
use crate::export;
use crate::render::RenderResult;
use crate::theme;
use crate::types::RenderStatus;
use crate::ui::components::field_label;
use crate::utils::format_bytes;
use chrono::Local;
use eframe::egui;
use egui_phosphor::regular as icons;
use std::sync::Arc;
use tracing::error;

enum OutputAction {
    Save(Arc<RenderResult>),
    CopyLink(Arc<RenderResult>),
    OpenExport,
}

impl App {
    pub fn render_output(&mut self, ctx: &egui::Context) {
        let (_, status) = self.scheduler.status();
        let pending = self.scheduler.is_pending();
        let mut action = None;

        egui::CentralPanel::default()
            .frame(
                egui::Frame::new()
                    .fill(theme::BG_BASE)
                    .inner_margin(egui::Margin::same(theme::SPACING_XL as i8)),
            )
            .show(ctx, |ui| {
                self.central_panel_rect = Some(ui.max_rect());

                field_label(ui, "Word Cloud Text:");
                egui::Frame::new()
                    .fill(theme::BG_INPUT)
                    .stroke(egui::Stroke::new(theme::STROKE_DEFAULT, theme::BORDER_DEFAULT))
                    .corner_radius(theme::RADIUS_DEFAULT)
                    .inner_margin(egui::Margin::same(theme::SPACING_MD as i8))
                    .show(ui, |ui| {
                        egui::ScrollArea::vertical()
                            .id_salt("text_scroll")
                            .max_height(theme::FONT_BODY * 1.5 * theme::TEXT_AREA_ROWS as f32)
                            .show(ui, |ui| {
                                ui.add(
                                    egui::TextEdit::multiline(&mut self.input.text)
                                        .frame(false)
                                        .desired_rows(theme::TEXT_AREA_ROWS)
                                        .desired_width(f32::INFINITY)
                                        .font(egui::FontId::proportional(theme::FONT_BODY)),
                                );
                            });
                    });

                ui.add_space(theme::SPACING_LG);
                ui.horizontal(|ui| {
                    field_label(ui, "Result:");
                    if pending || matches!(status, RenderStatus::Rendering) {
                        ui.add_space(theme::SPACING_SM);
                        ui.spinner();
                    }
                });

                theme::card_frame().show(ui, |ui| {
                    ui.set_width(ui.available_width());
                    ui.set_min_height(ui.available_height());
                    match &status {
                        RenderStatus::Idle => {
                            ui.add(
                                egui::Label::new(
                                    egui::RichText::new("Enter some text to render a word cloud")
                                        .color(theme::TEXT_DIM),
                                )
                                .selectable(false),
                            );
                        }
                        RenderStatus::Rendering => {
                            ui.horizontal(|ui| {
                                ui.spinner();
                                ui.label(
                                    egui::RichText::new("Rendering...").color(theme::TEXT_MUTED),
                                );
                            });
                        }
                        RenderStatus::Failed {
                            message,
                            kind,
                            detail,
                        } => {
                            ui.label(
                                egui::RichText::new(format!("{}  {}", icons::WARNING, message))
                                    .size(theme::FONT_BODY)
                                    .color(theme::STATUS_ERROR),
                            );
                            ui.add_space(theme::SPACING_SM);
                            ui.label(
                                egui::RichText::new(format!("{}: {}", kind, detail))
                                    .size(theme::FONT_SMALL)
                                    .color(theme::TEXT_DIM),
                            );
                        }
                        RenderStatus::Complete(result) => {
                            action = self.render_result(ui, result);
                        }
                    }
                });
            });

        match action {
            Some(OutputAction::Save(result)) => self.save_result(&result),
            Some(OutputAction::CopyLink(result)) => {
                ctx.copy_text(result.download_link.clone());
                self.show_toast("Download link copied to clipboard");
            }
            Some(OutputAction::OpenExport) => {
                if let Some(path) = &self.last_export {
                    if let Err(e) = open::that(path) {
                        error!(path = %path.display(), error = %e, "Failed to open export");
                    }
                }
            }
            None => {}
        }
    }

    fn render_result(
        &mut self,
        ui: &mut egui::Ui,
        result: &Arc<RenderResult>,
    ) -> Option<OutputAction> {
        let mut action = None;

        ui.horizontal(|ui| {
            if ui
                .add(theme::button_accent(format!("{}  Save PNG...", icons::DOWNLOAD_SIMPLE)))
                .clicked()
            {
                action = Some(OutputAction::Save(result.clone()));
            }
            if ui
                .add(theme::button(format!("{}  Copy link", icons::LINK)))
                .on_hover_text("Copy the image as a data: link")
                .clicked()
            {
                action = Some(OutputAction::CopyLink(result.clone()));
            }
            if self.last_export.is_some()
                && ui
                    .add(theme::button(format!("{}  Open", icons::ARROW_SQUARE_OUT)))
                    .on_hover_text("Open the last saved image")
                    .clicked()
            {
                action = Some(OutputAction::OpenExport);
            }
            ui.add_space(theme::SPACING_MD);
            ui.label(
                egui::RichText::new(format!(
                    "{} × {}  ·  {}",
                    result.width(),
                    result.height(),
                    format_bytes(result.png.len() as u64)
                ))
                .size(theme::FONT_SMALL)
                .color(theme::TEXT_DIM),
            );
        });
        ui.add_space(theme::SPACING_MD);

        let stale = !matches!(
            &self.result_texture,
            Some((shown, _)) if Arc::ptr_eq(shown, result)
        );
        if stale {
            let size = [result.width() as usize, result.height() as usize];
            let image = egui::ColorImage::from_rgba_unmultiplied(size, result.image.as_raw());
            let texture = ui
                .ctx()
                .load_texture("wordcloud", image, egui::TextureOptions::LINEAR);
            self.result_texture = Some((result.clone(), texture));
        }

        if let Some((_, texture)) = &self.result_texture {
            let natural = texture.size_vec2();
            let available = ui.available_size();
            let scale = (available.x / natural.x)
                .min(available.y / natural.y)
                .min(1.0);
            ui.centered_and_justified(|ui| {
                let size = natural * scale;
                let (rect, _) = ui.allocate_exact_size(size, egui::Sense::hover());
                ui.painter()
                    .rect_filled(rect, theme::RADIUS_DEFAULT, theme::BG_CANVAS);
                egui::Image::new(egui::load::SizedTexture::new(texture.id(), size))
                    .paint_at(ui, rect);
            });
        }

        action
    }

    fn save_result(&mut self, result: &RenderResult) {
        export::prepare_export_dir(&self.export_dir);
        let Some(path) = rfd::FileDialog::new()
            .set_title(format!("{} - Save PNG", APP_NAME))
            .set_directory(&self.export_dir)
            .set_file_name(export::default_file_name(Local::now()))
            .add_filter("PNG image", &["png"])
            .save_file()
        else {
            return;
        };

        match export::save_png(&path, result) {
            Ok(saved) => {
                if let Some(parent) = saved.parent() {
                    self.export_dir = parent.to_path_buf();
                }
                let name = saved
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_default();
                self.last_export = Some(saved);
                self.save_settings();
                self.show_toast(format!("{}  Saved {}", icons::CHECK_CIRCLE, name));
            }
            Err(e) => {
                error!(error = %e, "Export failed");
                self.show_toast(format!("Export failed: {}", e));
            }
        }
    }
}
