//! Command-line interface
//!
//! Without a subcommand the wallet window opens. The other commands operate
//! on the same store through the same single-writer queue.

use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;

use crate::config::Config;
use crate::registry::Registry;
use crate::render::{BarcodeRenderer, Code128Renderer, RenderOptions};
use crate::store::{JsonStore, StoreHandle, StoreStatus, queue};

#[derive(Parser, Debug)]
#[command(name = "barcode-wallet", version, about = "Store barcodes and show them full-screen for scanning")]
pub struct Cli {
    /// Store directory (overrides config and BARCODE_WALLET_DATA_DIR)
    #[arg(long, global = true, value_name = "PATH")]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Open the wallet window (default)
    Gui,
    /// Print stored barcodes
    List,
    /// Store a new barcode
    Add { name: String, data: String },
    /// Remove the barcode at INDEX (as shown by `list`)
    Delete { index: usize },
    /// Render the barcode at INDEX as a PNG image
    Export { index: usize, path: PathBuf },
}

/// Run a non-GUI command against the store
pub fn run_command(command: Command, config: &Config) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .context("Failed to build runtime")?;

    runtime.block_on(async {
        let store = JsonStore::new(config.store_dir(), config.save_strategy);
        let (handle, worker) = queue::channel(Box::new(store));
        let writer = tokio::spawn(worker.run());

        let mut registry = Registry::new(handle.clone());
        registry.merge_loaded(handle.load().await?);

        let result = execute(&command, &mut registry);

        handle.flush().await?;
        let status = handle.status();
        drop(registry);
        drop(handle);
        writer.await.context("Store worker panicked")?;

        if let StoreStatus::Failed(message) = status {
            return Err(anyhow!("Failed to save barcodes: {message}"));
        }
        result
    })
}

fn execute(command: &Command, registry: &mut Registry<StoreHandle>) -> Result<()> {
    match command {
        Command::Gui => Err(anyhow!("The window is not opened from here")),
        Command::List => {
            for line in format_list(registry) {
                println!("{line}");
            }
            Ok(())
        }
        Command::Add { name, data } => {
            if registry.add(name, data) {
                println!("Added '{name}' at index {}", registry.list().len() - 1);
            } else {
                println!("Nothing added: name and data must both be non-empty");
            }
            Ok(())
        }
        Command::Delete { index } => {
            match registry.delete(*index) {
                Some(entry) => println!("Deleted '{}'", entry.name),
                None => println!("No barcode at index {index}"),
            }
            Ok(())
        }
        Command::Export { index, path } => {
            let entry = registry
                .get(*index)
                .ok_or_else(|| anyhow!("No barcode at index {index}"))?;
            let image = Code128Renderer
                .render(&entry.data, &RenderOptions::fixed())
                .with_context(|| format!("Cannot render '{}'", entry.name))?;
            image.write_png(path)?;
            info!(name = %entry.name, path = %path.display(), "Exported barcode");
            println!("Wrote '{}' to {}", entry.name, path.display());
            Ok(())
        }
    }
}

fn format_list(registry: &Registry<StoreHandle>) -> Vec<String> {
    if registry.list().is_empty() {
        return vec!["No barcodes stored".to_string()];
    }
    registry
        .list()
        .iter()
        .enumerate()
        .map(|(i, e)| format!("{i:>3}  {:<24}  {}", e.name, e.data))
        .collect()
}
