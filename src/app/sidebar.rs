//! Settings sidebar: the grouped controls that make up a `ParameterInput`

use super::App;
use crate::constants::*;
use crate::params::ParameterInput;
use crate::theme;
use crate::ui::components::{field_label, framed_text_edit, hex_to_rgb, rgb_to_hex, section};
use crate::utils;
use eframe::egui;
use egui_phosphor::regular as icons;

const HELP_ICON: &str = "Icon name for the word cloud shape (Font Awesome free solid icons).";
const HELP_INVERT: &str =
    "Invert the icon mask so the words fill the space around the icon instead of the icon itself.";
const HELP_PALETTE_TYPE: &str = "Family of CARTOColors palettes to choose from.";
const HELP_PALETTE: &str = "Palette used to color the words.";
const HELP_COLORS: &str = "Number of colors taken from the palette.";
const HELP_BACKGROUND: &str = "Background color of the word cloud.";
const HELP_WIDTH: &str = "Width of the word cloud in pixels.";
const HELP_HEIGHT: &str = "Height of the word cloud in pixels.";
const HELP_FONT: &str = "Maximum font size in the word cloud.";
const HELP_MAX_WORDS: &str = "Maximum number of words to include in the word cloud.";
const HELP_COLLOCATIONS: &str = "Whether to include collocations (bigrams) of two words.";
const HELP_PYTHON: &str =
    "Python interpreter with the stylecloud package installed. Applied when the field loses focus.";

impl App {
    pub fn render_sidebar(&mut self, ctx: &egui::Context) {
        egui::SidePanel::left("settings_panel")
            .exact_width(theme::SIDEBAR_WIDTH)
            .resizable(false)
            .show_separator_line(false)
            .frame(
                egui::Frame::new()
                    .fill(theme::BG_BASE)
                    .inner_margin(egui::Margin::symmetric(theme::SPACING_XL as i8, 0)),
            )
            .show(ctx, |ui| {
                ui.add_space(theme::SPACING_XL);
                self.render_header(ui, ctx);
                ui.add_space(theme::SPACING_LG);

                egui::ScrollArea::vertical()
                    .auto_shrink([false, false])
                    .show(ui, |ui| {
                        self.shape_section(ui);
                        self.colors_section(ui);
                        self.dimensions_section(ui);
                        self.content_section(ui);
                        self.generator_section(ui);

                        if ui
                            .add(theme::button(format!(
                                "{}  Reset settings",
                                icons::ARROW_COUNTER_CLOCKWISE
                            )))
                            .on_hover_text("Restore default settings, keeping the text")
                            .clicked()
                        {
                            let text = std::mem::take(&mut self.input.text);
                            self.input = ParameterInput {
                                text,
                                ..ParameterInput::defaults(&self.catalog)
                            };
                        }
                        ui.add_space(theme::SPACING_XL);
                    });
            });
    }

    fn render_header(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        ui.horizontal(|ui| {
            let size = theme::LOGO_SIZE;
            if self.logo_texture.is_none() {
                self.logo_texture = utils::rasterize_logo(size as u32 * 2).map(|(pixels, w, h)| {
                    ctx.load_texture(
                        "logo",
                        egui::ColorImage::from_rgba_unmultiplied([w as usize, h as usize], &pixels),
                        egui::TextureOptions::LINEAR,
                    )
                });
            }
            if let Some(texture) = &self.logo_texture {
                ui.image(egui::load::SizedTexture::new(texture.id(), egui::vec2(size, size)));
            }
            ui.vertical(|ui| {
                ui.add(
                    egui::Label::new(
                        egui::RichText::new(APP_NAME)
                            .size(theme::FONT_TITLE)
                            .color(theme::TEXT_PRIMARY),
                    )
                    .selectable(false),
                );
                ui.add(
                    egui::Label::new(
                        egui::RichText::new(format!("v{}", APP_VERSION))
                            .size(theme::FONT_SMALL)
                            .color(theme::TEXT_DIM),
                    )
                    .selectable(false),
                );
            });
        });
    }

    fn shape_section(&mut self, ui: &mut egui::Ui) {
        let catalog = self.catalog.clone();
        section(ui, icons::SHAPES, "Shape", |ui| {
            field_label(ui, "Icon Mask:");
            egui::ComboBox::from_id_salt("icon_mask")
                .selected_text(&self.input.icon)
                .width(ui.available_width())
                .height(320.0)
                .show_ui(ui, |ui| {
                    for icon in catalog.icons().iter() {
                        ui.selectable_value(&mut self.input.icon, icon.to_string(), icon);
                    }
                })
                .response
                .on_hover_text(HELP_ICON);

            ui.checkbox(&mut self.input.invert_mask, "Invert mask")
                .on_hover_text(HELP_INVERT);
        });
    }

    fn colors_section(&mut self, ui: &mut egui::Ui) {
        let catalog = self.catalog.clone();
        let palettes = catalog.palettes();
        section(ui, icons::PALETTE, "Colors", |ui| {
            field_label(ui, "Palette Type:");
            let current_type = palettes
                .type_label(&self.input.palette_type)
                .unwrap_or(&self.input.palette_type)
                .to_string();
            let mut chosen_type = None;
            egui::ComboBox::from_id_salt("palette_type")
                .selected_text(current_type)
                .width(ui.available_width())
                .show_ui(ui, |ui| {
                    for (key, label) in palettes.types() {
                        if ui
                            .selectable_label(self.input.palette_type == key, label)
                            .clicked()
                        {
                            chosen_type = Some(key);
                        }
                    }
                })
                .response
                .on_hover_text(HELP_PALETTE_TYPE);
            if let Some(key) = chosen_type {
                self.input.select_palette_type(&catalog, key);
            }

            field_label(ui, "Palette:");
            let current_palette = palettes
                .palette_label(&self.input.palette_type, &self.input.palette_name)
                .unwrap_or(&self.input.palette_name)
                .to_string();
            let options = self.input.palette_options(&catalog);
            egui::ComboBox::from_id_salt("palette_name")
                .selected_text(current_palette)
                .width(ui.available_width())
                .height(320.0)
                .show_ui(ui, |ui| {
                    for (name, label) in options {
                        ui.selectable_value(&mut self.input.palette_name, name.to_string(), label);
                    }
                })
                .response
                .on_hover_text(HELP_PALETTE);

            field_label(ui, "No. of colors:");
            ui.add(egui::Slider::new(
                &mut self.input.color_count,
                COLOR_COUNT_RANGE.0..=COLOR_COUNT_RANGE.1,
            ))
            .on_hover_text(HELP_COLORS);

            field_label(ui, "Background Color:");
            ui.horizontal(|ui| {
                let mut rgb = hex_to_rgb(&self.input.background).unwrap_or([255, 255, 255]);
                if egui::color_picker::color_edit_button_srgb(ui, &mut rgb)
                    .on_hover_text(HELP_BACKGROUND)
                    .changed()
                {
                    self.input.background = rgb_to_hex(rgb);
                }
                let width = ui.available_width() - theme::SPACING_LG;
                framed_text_edit(ui, &mut self.input.background, width);
            });
        });
    }

    fn dimensions_section(&mut self, ui: &mut egui::Ui) {
        section(ui, icons::RULER, "Dimensions", |ui| {
            field_label(ui, "Width:");
            ui.add(
                egui::Slider::new(&mut self.input.width, DIMENSION_RANGE.0..=DIMENSION_RANGE.1)
                    .step_by(DIMENSION_STEP as f64)
                    .suffix(" px"),
            )
            .on_hover_text(HELP_WIDTH);

            field_label(ui, "Height:");
            ui.add(
                egui::Slider::new(&mut self.input.height, DIMENSION_RANGE.0..=DIMENSION_RANGE.1)
                    .step_by(DIMENSION_STEP as f64)
                    .suffix(" px"),
            )
            .on_hover_text(HELP_HEIGHT);

            field_label(ui, "Max. font size:");
            ui.add(
                egui::Slider::new(
                    &mut self.input.max_font_size,
                    FONT_SIZE_RANGE.0..=FONT_SIZE_RANGE.1,
                )
                .step_by(FONT_SIZE_STEP as f64),
            )
            .on_hover_text(HELP_FONT);
        });
    }

    fn content_section(&mut self, ui: &mut egui::Ui) {
        section(ui, icons::TEXT_AA, "Content", |ui| {
            field_label(ui, "Max. words:");
            let width = ui.available_width() - theme::SPACING_LG;
            framed_text_edit(ui, &mut self.input.max_words, width).on_hover_text(HELP_MAX_WORDS);

            ui.checkbox(&mut self.input.collocations, "Include Collocations")
                .on_hover_text(HELP_COLLOCATIONS);
        });
    }

    fn generator_section(&mut self, ui: &mut egui::Ui) {
        let mut apply = false;
        section(ui, icons::TERMINAL_WINDOW, "Generator", |ui| {
            field_label(ui, "Python command:");
            let width = ui.available_width() - theme::SPACING_LG;
            let response = framed_text_edit(ui, &mut self.python_command, width)
                .on_hover_text(HELP_PYTHON);
            apply |= response.lost_focus();

            field_label(ui, "Timeout:");
            let slider =
                ui.add(egui::Slider::new(&mut self.render_timeout_secs, 10..=600).suffix(" s"));
            apply |= slider_committed(&slider);
        });
        if apply && self.generator_settings_changed() {
            self.apply_generator_settings();
        }
    }

    fn generator_settings_changed(&self) -> bool {
        self.python_command.trim() != self.settings.python_command
            || self.render_timeout_secs != self.settings.render_timeout_secs
    }
}

/// A slider value is final once a drag ends or after a click/keyboard step.
/// Values passed through mid-drag are not.
fn slider_committed(response: &egui::Response) -> bool {
    value_committed(response.drag_stopped(), response.changed(), response.dragged())
}

fn value_committed(drag_stopped: bool, changed: bool, dragging: bool) -> bool {
    drag_stopped || (changed && !dragging)
}
