//! Application-wide constants
//!
//! This module contains all magic numbers and string literals used throughout
//! the application, providing a single source of truth for constant values.

/// Config file location
pub mod config {
    /// Directory name under the platform config/data dirs
    pub const APP_DIR: &str = "barcode-wallet";

    /// Config filename
    pub const FILENAME: &str = "config.json";
}

/// Local store layout
pub mod store {
    /// Keyed object store file (one record per barcode name)
    pub const FILENAME: &str = "barcodes.json";

    /// Scratch file used for atomic replace of the store
    pub const TMP_FILENAME: &str = "barcodes.json.tmp";

    /// Object store schema version
    pub const VERSION: u32 = 1;

    /// Flat key-value file from the old single-blob layout
    pub const LEGACY_FILENAME: &str = "local_storage.json";

    /// Key under which the whole list was serialized as one JSON string
    pub const LEGACY_KEY: &str = "barcodes";
}

/// Fixed symbol options handed to the barcode renderer
pub mod render {
    /// Width of the narrowest bar in pixels
    pub const MODULE_WIDTH: u32 = 2;

    /// Bar height in pixels
    pub const HEIGHT: u32 = 100;

    /// Quiet zone around the symbol in pixels
    pub const MARGIN: u32 = 10;

    /// Widest raster a symbol may produce
    pub const MAX_PIXEL_WIDTH: u32 = 65_535;

    /// Show the human-readable value under the bars
    pub const DISPLAY_VALUE: bool = true;

    pub const BACKGROUND: &str = "#ffffff";
    pub const LINE_COLOR: &str = "#000000";
}

/// Full-screen display session
pub mod display {
    /// Viewport background forced while a barcode is shown
    pub const BACKGROUND: &str = "#FFFFFF";

    /// Brightness boost applied while a barcode is shown
    pub const BRIGHTNESS_PERCENT: u16 = 120;

    /// Brightness of the normal list view
    pub const DEFAULT_BRIGHTNESS_PERCENT: u16 = 100;
}

/// Screen wake lock via logind idle inhibitor
pub mod wake_lock {
    pub const PROGRAM: &str = "systemd-inhibit";
    pub const WHO: &str = "barcode-wallet";
    pub const WHY: &str = "Displaying a barcode for scanning";
}

/// Environment variable names
pub mod env {
    pub const LOG_LEVEL: &str = "LOG_LEVEL";
    pub const DATA_DIR: &str = "BARCODE_WALLET_DATA_DIR";
    pub const BRIGHTNESS: &str = "BARCODE_WALLET_BRIGHTNESS";
    pub const WAKE_LOCK: &str = "BARCODE_WALLET_WAKE_LOCK";
}

/// Config validation ranges
pub mod validation {
    pub const MIN_BRIGHTNESS_PERCENT: u16 = 100;
    pub const MAX_BRIGHTNESS_PERCENT: u16 = 200;
    pub const MIN_WINDOW_DIMENSION: u16 = 240;
    pub const MAX_WINDOW_DIMENSION: u16 = 4096;
}

/// Version string baked in at build time (`BARCODE_WALLET_VERSION`)
pub fn version() -> &'static str {
    option_env!("BARCODE_WALLET_VERSION").unwrap_or("unknown")
}
