//! Stored barcode list with select and delete buttons

use eframe::egui;

use crate::gui::constants::*;
use crate::types::BarcodeEntry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListAction {
    None,
    Select(usize),
    Delete(usize),
}

pub fn ui(ui: &mut egui::Ui, entries: &[BarcodeEntry], loading: bool) -> ListAction {
    let mut action = ListAction::None;

    ui.label(egui::RichText::new("Your Barcodes").heading().strong());
    ui.add_space(ITEM_SPACING);

    if loading {
        ui.horizontal(|ui| {
            ui.spinner();
            ui.label("Loading saved barcodes...");
        });
        return action;
    }

    if entries.is_empty() {
        ui.label(egui::RichText::new("No barcodes yet").color(TEXT_MUTED));
        return action;
    }

    egui::ScrollArea::vertical().show(ui, |ui| {
        for (idx, entry) in entries.iter().enumerate() {
            ui.push_id(idx, |ui| {
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    // Separate button so deleting never selects the row
                    let delete = egui::Button::new(egui::RichText::new("🗑").color(egui::Color32::WHITE))
                        .fill(DELETE_FILL);
                    if ui
                        .add_sized([DELETE_BUTTON_SIZE, ROW_HEIGHT], delete)
                        .on_hover_text("Delete")
                        .clicked()
                    {
                        action = ListAction::Delete(idx);
                    }

                    let select = egui::Button::new(format!("▮▯▮ {}", entry.name));
                    if ui
                        .add_sized([ui.available_width(), ROW_HEIGHT], select)
                        .on_hover_text(entry.data.as_str())
                        .clicked()
                    {
                        action = ListAction::Select(idx);
                    }
                });
            });
            ui.add_space(ITEM_SPACING / 2.0);
        }
    });

    action
}
