//! GUI-specific constants for layout, colors and intervals

pub const APP_TITLE: &str = "Barcode Wallet";

/// Window minimum size
pub const WINDOW_MIN_WIDTH: f32 = 320.0;
pub const WINDOW_MIN_HEIGHT: f32 = 480.0;

/// Layout spacing
pub const PADDING: f32 = 12.0;
pub const SECTION_SPACING: f32 = 15.0;
pub const ITEM_SPACING: f32 = 8.0;
pub const ROW_HEIGHT: f32 = 36.0;
pub const DELETE_BUTTON_SIZE: f32 = 36.0;

/// Full-screen barcode view
pub const BARCODE_MAX_WIDTH: f32 = 720.0;
pub const BARCODE_WIDTH_FRACTION: f32 = 0.85;
pub const VALUE_TEXT_SIZE: f32 = 20.0;
pub const NAME_TEXT_SIZE: f32 = 22.0;
pub const HINT_TEXT_SIZE: f32 = 14.0;

/// Colors
pub const DELETE_FILL: egui::Color32 = egui::Color32::from_rgb(220, 38, 38);
pub const STATUS_ERROR: egui::Color32 = egui::Color32::from_rgb(200, 0, 0);
pub const TEXT_DARK: egui::Color32 = egui::Color32::from_rgb(17, 17, 17);
pub const TEXT_MUTED: egui::Color32 = egui::Color32::from_rgb(107, 114, 128);

/// Poll interval while the startup load is in flight
pub const LOAD_POLL_INTERVAL_MS: u64 = 50;
