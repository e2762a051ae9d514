//! egui front end: list view and full-screen barcode view

mod app;
mod components;
mod constants;

pub use app::run_gui;
