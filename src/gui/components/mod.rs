//! Reusable GUI components for the wallet window

pub mod barcode_list;
pub mod barcode_view;
pub mod entry_form;

pub use barcode_list::ListAction;
pub use entry_form::EntryForm;
