//! Wallet window implemented with egui/eframe

use std::time::Duration;

use anyhow::{Result, anyhow};
use eframe::{CreationContext, NativeOptions, egui};
use tokio::sync::oneshot;
use tracing::{error, info};

use super::components::{EntryForm, ListAction, barcode_list, barcode_view};
use super::constants::*;
use crate::config::Config;
use crate::constants;
use crate::display::{DisplayController, InhibitWakeLock, NoWakeLock, ViewportStyle, WakeLock};
use crate::registry::Registry;
use crate::render::Code128Renderer;
use crate::store::{JsonStore, StoreHandle, StoreStatus, queue};
use crate::types::BarcodeEntry;

struct WalletApp {
    registry: Registry<StoreHandle>,
    pending_load: Option<oneshot::Receiver<Result<Vec<BarcodeEntry>>>>,
    load_error: Option<String>,
    display: DisplayController,
    viewport: ViewportStyle,
    form: EntryForm,
}

impl WalletApp {
    fn new(_cc: &CreationContext<'_>, store: StoreHandle, display: DisplayController) -> Self {
        info!("Initializing wallet window");
        let pending_load = Some(store.request_load());

        Self {
            registry: Registry::new(store),
            pending_load,
            load_error: None,
            display,
            viewport: ViewportStyle::default(),
            form: EntryForm::new(),
        }
    }

    /// Install the startup load once the store worker answers
    fn poll_load(&mut self) {
        let Some(rx) = self.pending_load.as_mut() else {
            return;
        };
        let outcome = match rx.try_recv() {
            Err(oneshot::error::TryRecvError::Empty) => return,
            Ok(outcome) => outcome,
            Err(oneshot::error::TryRecvError::Closed) => Err(anyhow!("Store worker stopped before load completed")),
        };
        self.pending_load = None;

        match outcome {
            Ok(entries) => self.registry.merge_loaded(entries),
            Err(err) => {
                error!(error = ?err, "Failed to load barcodes, continuing with in-memory list");
                self.registry.load_failed();
                self.load_error = Some(format!(
                    "Could not load saved barcodes, deletions will not be saved: {err:#}"
                ));
            }
        }
    }

    fn storage_warning(&self) -> Option<String> {
        if let StoreStatus::Failed(message) = self.registry.sink().status() {
            return Some(format!("Changes are not being saved: {message}"));
        }
        self.load_error.clone()
    }

    fn select(&mut self, ctx: &egui::Context, index: usize) {
        if let Some(entry) = self.registry.get(index).cloned() {
            self.display.select(entry, &mut self.viewport);
            ctx.send_viewport_cmd(egui::ViewportCommand::Fullscreen(true));
        }
    }

    fn dismiss(&mut self, ctx: &egui::Context) {
        if self.display.dismiss(&mut self.viewport) {
            ctx.send_viewport_cmd(egui::ViewportCommand::Fullscreen(false));
        }
    }

    fn show_list(&mut self, ctx: &egui::Context) {
        let mut action = ListAction::None;
        let warning = self.storage_warning();
        let loading = self.pending_load.is_some();

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.add_space(PADDING);
            ui.heading("Barcode Wallet");
            ui.add_space(SECTION_SPACING);

            if let Some(warning) = warning {
                ui.colored_label(STATUS_ERROR, warning);
                ui.add_space(ITEM_SPACING);
            }

            if self.form.ui(ui) && self.registry.add(&self.form.name, &self.form.data) {
                self.form.clear();
            }

            ui.add_space(SECTION_SPACING);
            action = barcode_list::ui(ui, self.registry.list(), loading);
        });

        match action {
            ListAction::None => {}
            ListAction::Select(index) => self.select(ctx, index),
            ListAction::Delete(index) => {
                self.registry.delete(index);
            }
        }
    }

    fn show_barcode(&mut self, ctx: &egui::Context) {
        let Some(active) = self.display.active() else {
            return;
        };
        let fill = self
            .viewport
            .background
            .map(|bg| barcode_view::color32(self.viewport.filter(bg)))
            .unwrap_or_else(|| ctx.style().visuals.panel_fill);

        let response = egui::CentralPanel::default()
            .frame(egui::Frame::new().fill(fill))
            .show(ctx, |ui| barcode_view::ui(ui, active, &self.viewport))
            .response;

        let dismissed = response.interact(egui::Sense::click()).clicked()
            || ctx.input(|i| i.key_pressed(egui::Key::Escape));
        if dismissed {
            self.dismiss(ctx);
        }
    }
}

impl eframe::App for WalletApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_load();

        if self.display.is_displaying() {
            self.show_barcode(ctx);
        } else {
            self.show_list(ctx);
        }

        egui::Area::new(egui::Id::new("version_label"))
            .anchor(egui::Align2::RIGHT_BOTTOM, [-PADDING, -PADDING / 2.0])
            .interactable(false)
            .show(ctx, |ui| {
                ui.small(egui::RichText::new(constants::version()).color(TEXT_MUTED));
            });

        if self.pending_load.is_some() {
            ctx.request_repaint_after(Duration::from_millis(LOAD_POLL_INTERVAL_MS));
        }
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.display.dismiss(&mut self.viewport);
        if let Err(err) = self.registry.sink().flush_blocking() {
            error!(error = ?err, "Failed to flush pending saves during shutdown");
        }
        info!("Wallet exiting");
    }
}

pub fn run_gui(config: &Config) -> Result<()> {
    let store = JsonStore::new(config.store_dir(), config.save_strategy);
    info!(dir = %store.dir().display(), "Using barcode store");
    let (handle, worker) = queue::channel(Box::new(store));
    worker.spawn_thread()?;

    let wake_lock: Box<dyn WakeLock> = if config.wake_lock {
        Box::new(InhibitWakeLock)
    } else {
        Box::new(NoWakeLock)
    };
    let display = DisplayController::new(
        Box::new(Code128Renderer),
        wake_lock,
        ViewportStyle::boosted(config.brightness_percent),
    );

    let options = NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([config.window_width as f32, config.window_height as f32])
            .with_min_inner_size([WINDOW_MIN_WIDTH, WINDOW_MIN_HEIGHT])
            .with_title(APP_TITLE),
        ..Default::default()
    };

    eframe::run_native(
        APP_TITLE,
        options,
        Box::new(move |cc| Ok(Box::new(WalletApp::new(cc, handle, display)))),
    )
    .map_err(|err| anyhow!("Failed to launch wallet window: {err}"))
}
