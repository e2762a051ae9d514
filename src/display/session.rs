//! Display session: the side effects active while one barcode is full-screen

use tracing::{info, warn};

use super::wake_lock::{WakeGuard, WakeLock};
use crate::color::Rgb;
use crate::constants::display;

/// Viewport styling the UI reads every frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewportStyle {
    /// Forced background; `None` means the theme default
    pub background: Option<Rgb>,
    pub brightness_percent: u16,
}

impl Default for ViewportStyle {
    fn default() -> Self {
        Self {
            background: None,
            brightness_percent: display::DEFAULT_BRIGHTNESS_PERCENT,
        }
    }
}

impl ViewportStyle {
    /// Style applied for the length of a display session
    pub fn boosted(brightness_percent: u16) -> Self {
        Self {
            background: Some(Rgb::parse_or(display::BACKGROUND, Rgb::WHITE)),
            brightness_percent,
        }
    }

    /// `color` with the brightness filter applied
    pub fn filter(&self, color: Rgb) -> Rgb {
        color.brightened(self.brightness_percent)
    }
}

/// Captures the pre-display style and wake lock so `exit` can undo both
pub struct DisplaySession {
    previous: ViewportStyle,
    wake_guard: Option<Box<dyn WakeGuard>>,
}

impl DisplaySession {
    /// Apply `style` to `viewport` and try to keep the screen awake
    pub fn enter(viewport: &mut ViewportStyle, style: ViewportStyle, wake_lock: &dyn WakeLock) -> Self {
        let previous = *viewport;
        *viewport = style;

        let wake_guard = match wake_lock.acquire() {
            Ok(Some(guard)) => Some(guard),
            Ok(None) => {
                info!("Wake lock unavailable, screen may dim while displaying");
                None
            }
            Err(e) => {
                warn!(error = ?e, "Wake lock error");
                None
            }
        };

        Self {
            previous,
            wake_guard,
        }
    }

    pub fn holds_wake_lock(&self) -> bool {
        self.wake_guard.is_some()
    }

    /// Release the wake lock and restore the captured style
    pub fn exit(mut self, viewport: &mut ViewportStyle) {
        if let Some(guard) = self.wake_guard.take() {
            if let Err(e) = guard.release() {
                warn!(error = ?e, "Wake lock release error");
            }
        }
        *viewport = self.previous;
    }
}
