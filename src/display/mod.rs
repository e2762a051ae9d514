//! Display controller
//!
//! Two states: `Idle` (list view) and `Displaying` (one barcode full-screen).
//! Entering a display starts a [`DisplaySession`] and renders the entry once;
//! dismissing ends the session and restores the viewport.

use tracing::{info, warn};

pub mod session;
pub mod wake_lock;

pub use session::{DisplaySession, ViewportStyle};
pub use wake_lock::{InhibitWakeLock, NoWakeLock, WakeLock};

use crate::render::{BarcodeImage, BarcodeRenderer, RenderError, RenderOptions};
use crate::types::BarcodeEntry;

/// The barcode currently on screen
pub struct ActiveDisplay {
    pub entry: BarcodeEntry,
    /// Render failures are shown in place of the bars
    pub barcode: Result<BarcodeImage, RenderError>,
    session: DisplaySession,
}

pub enum DisplayState {
    Idle,
    Displaying(Box<ActiveDisplay>),
}

pub struct DisplayController {
    state: DisplayState,
    renderer: Box<dyn BarcodeRenderer>,
    wake_lock: Box<dyn WakeLock>,
    style: ViewportStyle,
}

impl DisplayController {
    /// `style` is what the viewport switches to while displaying
    pub fn new(renderer: Box<dyn BarcodeRenderer>, wake_lock: Box<dyn WakeLock>, style: ViewportStyle) -> Self {
        Self {
            state: DisplayState::Idle,
            renderer,
            wake_lock,
            style,
        }
    }

    pub fn state(&self) -> &DisplayState {
        &self.state
    }

    pub fn active(&self) -> Option<&ActiveDisplay> {
        match &self.state {
            DisplayState::Idle => None,
            DisplayState::Displaying(active) => Some(active.as_ref()),
        }
    }

    pub fn is_displaying(&self) -> bool {
        matches!(self.state(), DisplayState::Displaying(_))
    }

    /// Idle -> Displaying(entry); an active display is dismissed first
    pub fn select(&mut self, entry: BarcodeEntry, viewport: &mut ViewportStyle) {
        self.dismiss(viewport);

        let session = DisplaySession::enter(viewport, self.style, self.wake_lock.as_ref());
        let barcode = self.renderer.render(&entry.data, &RenderOptions::fixed());
        match &barcode {
            Ok(_) => info!(name = %entry.name, wake_lock = session.holds_wake_lock(), "Displaying barcode"),
            Err(e) => warn!(name = %entry.name, error = %e, "Failed to render barcode"),
        }

        self.state = DisplayState::Displaying(Box::new(ActiveDisplay {
            entry,
            barcode,
            session,
        }));
    }

    /// Displaying -> Idle, reverting every side effect; false if already idle
    pub fn dismiss(&mut self, viewport: &mut ViewportStyle) -> bool {
        match std::mem::replace(&mut self.state, DisplayState::Idle) {
            DisplayState::Idle => false,
            DisplayState::Displaying(active) => {
                info!(name = %active.entry.name, "Dismissed barcode");
                active.session.exit(viewport);
                true
            }
        }
    }
}
