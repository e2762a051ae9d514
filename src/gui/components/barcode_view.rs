//! Full-screen barcode view

use eframe::egui;

use crate::color::Rgb;
use crate::display::{ActiveDisplay, ViewportStyle};
use crate::gui::constants::*;
use crate::render::BarcodeImage;

pub fn color32(color: Rgb) -> egui::Color32 {
    egui::Color32::from_rgb(color.r, color.g, color.b)
}

pub fn ui(ui: &mut egui::Ui, active: &ActiveDisplay, viewport: &ViewportStyle) {
    let dim = |c: egui::Color32| color32(viewport.filter(Rgb::new(c.r(), c.g(), c.b())));

    ui.vertical_centered(|ui| {
        ui.add_space(ui.available_height() * 0.2);

        match &active.barcode {
            Ok(image) => paint_barcode(ui, image, viewport),
            Err(e) => {
                ui.colored_label(STATUS_ERROR, format!("Cannot display this barcode: {e}"));
            }
        }

        ui.add_space(ITEM_SPACING);
        ui.label(
            egui::RichText::new(&active.entry.name)
                .size(NAME_TEXT_SIZE)
                .color(dim(TEXT_DARK)),
        );
        ui.label(
            egui::RichText::new("Tap to go back")
                .size(HINT_TEXT_SIZE)
                .color(dim(TEXT_MUTED)),
        );
    });
}

/// Scale the symbol to the available width and paint bars plus value text
fn paint_barcode(ui: &mut egui::Ui, image: &BarcodeImage, viewport: &ViewportStyle) {
    let options = image.options();
    let target_width = (ui.available_width() * BARCODE_WIDTH_FRACTION).min(BARCODE_MAX_WIDTH);
    let scale = target_width / image.pixel_width() as f32;
    let text_height = if options.display_value { VALUE_TEXT_SIZE * 1.4 } else { 0.0 };
    let size = egui::vec2(target_width, image.pixel_height() as f32 * scale + text_height);

    let (rect, _) = ui.allocate_exact_size(size, egui::Sense::hover());
    let painter = ui.painter_at(rect);
    let background = color32(viewport.filter(options.background));
    let line = color32(viewport.filter(options.line_color));

    painter.rect_filled(rect, egui::CornerRadius::ZERO, background);

    let margin = options.margin as f32 * scale;
    let bar_height = options.height as f32 * scale;
    for (x, width) in image.bars() {
        let min = rect.min + egui::vec2(margin + x as f32 * scale, margin);
        painter.rect_filled(
            egui::Rect::from_min_size(min, egui::vec2(width as f32 * scale, bar_height)),
            egui::CornerRadius::ZERO,
            line,
        );
    }

    if options.display_value {
        painter.text(
            egui::pos2(rect.center().x, rect.min.y + image.pixel_height() as f32 * scale),
            egui::Align2::CENTER_TOP,
            image.text(),
            egui::FontId::monospace(VALUE_TEXT_SIZE),
            line,
        );
    }
}
