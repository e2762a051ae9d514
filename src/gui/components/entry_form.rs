//! Name/value input card for adding a barcode

use eframe::egui;

use crate::gui::constants::ITEM_SPACING;

#[derive(Default)]
pub struct EntryForm {
    pub name: String,
    pub data: String,
}

impl EntryForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Renders the form; returns true when the user submits
    pub fn ui(&mut self, ui: &mut egui::Ui) -> bool {
        let mut submitted = false;

        ui.group(|ui| {
            ui.add(
                egui::TextEdit::singleline(&mut self.name)
                    .hint_text("Name (e.g., Loyalty Card)")
                    .desired_width(f32::INFINITY),
            );
            ui.add_space(ITEM_SPACING);

            let data = ui.add(
                egui::TextEdit::singleline(&mut self.data)
                    .hint_text("Barcode Number")
                    .desired_width(f32::INFINITY),
            );
            if data.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                submitted = true;
            }
            ui.add_space(ITEM_SPACING);

            if ui.button("Add Barcode").clicked() {
                submitted = true;
            }
        });

        submitted
    }

    pub fn clear(&mut self) {
        self.name.clear();
        self.data.clear();
    }
}
