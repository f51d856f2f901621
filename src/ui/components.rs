//! Reusable UI components
//!
//! Small widgets and conversions shared by the sidebar and the output panel.

use crate::params::normalize_hex_color;
use crate::theme;
use eframe::egui;

/// Parse `#rgb` / `#rrggbb` into color picker channels
pub fn hex_to_rgb(hex: &str) -> Option<[u8; 3]> {
    let hex = normalize_hex_color(hex)?;
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some([channel(1)?, channel(3)?, channel(5)?])
}

pub fn rgb_to_hex(rgb: [u8; 3]) -> String {
    format!("#{:02x}{:02x}{:02x}", rgb[0], rgb[1], rgb[2])
}

/// Collapsible sidebar section with a phosphor icon in the header
pub fn section(
    ui: &mut egui::Ui,
    icon: &str,
    title: &str,
    add_contents: impl FnOnce(&mut egui::Ui),
) {
    theme::section_frame().show(ui, |ui| {
        ui.set_width(ui.available_width());
        egui::CollapsingHeader::new(
            egui::RichText::new(format!("{}  {}", icon, title))
                .size(theme::FONT_LABEL)
                .color(theme::TEXT_SECONDARY),
        )
        .id_salt(title)
        .default_open(true)
        .show(ui, add_contents);
    });
    ui.add_space(theme::SPACING_MD);
}

/// Dim caption above a control
pub fn field_label(ui: &mut egui::Ui, text: &str) {
    ui.add(
        egui::Label::new(
            egui::RichText::new(text)
                .size(theme::FONT_SMALL)
                .color(theme::TEXT_DIM),
        )
        .selectable(false),
    );
}

/// Single-line text field in an input-styled frame
pub fn framed_text_edit(ui: &mut egui::Ui, value: &mut String, width: f32) -> egui::Response {
    egui::Frame::new()
        .fill(theme::BG_INPUT)
        .stroke(egui::Stroke::new(theme::STROKE_DEFAULT, theme::BORDER_DEFAULT))
        .corner_radius(theme::RADIUS_DEFAULT)
        .inner_margin(egui::Margin::symmetric(6, 4))
        .show(ui, |ui| {
            ui.add(
                egui::TextEdit::singleline(value)
                    .frame(false)
                    .desired_width(width)
                    .font(egui::FontId::proportional(theme::FONT_LABEL)),
            )
        })
        .inner
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_round_trip() {
        assert_eq!(hex_to_rgb("#ffffff"), Some([255, 255, 255]));
        assert_eq!(hex_to_rgb("#0A8"), Some([0x00, 0xaa, 0x88]));
        assert_eq!(hex_to_rgb("teal"), None);
        assert_eq!(rgb_to_hex([0x3a, 0x7b, 0xd5]), "#3a7bd5");
        assert_eq!(hex_to_rgb(&rgb_to_hex([1, 2, 3])), Some([1, 2, 3]));
    }
}
