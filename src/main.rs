use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use color_eyre::Result;
use tracing::info;

use crate::app::{App, AppState};
use crate::cli::{Args, CliCommand};
use crate::config::KeyResolver;
use crate::inventory::Inventory;
use crate::store::{DocumentStore, JsonFileStore, MemoryStore};

mod app;
mod cli;
mod commands;
mod config;
mod dialog;
mod export;
mod filter;
mod fonts;
mod inventory;
mod logging;
mod model;
mod search;
mod sort;
mod store;
mod theme;
mod tui;
mod ui;
mod version;
mod view;

pub use theme::Theme;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();

    let config = config::load()?;
    let logging = logging::initialize_logging(config.log_level)?;
    info!("Starting partsbin {}", version::CURRENT);

    let (mut store, store_label) = open_store(&args, &config)?;

    if let Some(CliCommand::AddUser {
        name,
        password,
        write,
    }) = &args.command
    {
        store::add_user(store.as_mut(), name, password, *write)?;
        println!("User {name} saved (write: {write})");
        return Ok(());
    }

    let inventory = Inventory::new(store, Duration::from_secs(config.store.refresh_secs));
    let resolver = Arc::new(KeyResolver::new(Arc::new(config.keybindings.clone())));
    let mut state = AppState::new(
        inventory,
        config,
        resolver,
        logging.console,
        logging.control,
        store_label,
    );
    state.login_hint = args.user;
    state.config_path = crate::config::config_path();

    let mut app = App::new(state);
    app.run().await?;

    drop(logging.guard);
    Ok(())
}

fn open_store(args: &Args, config: &config::AppConfig) -> Result<(Box<dyn DocumentStore>, String)> {
    if args.memory {
        info!("Using in-memory demo store");
        return Ok((Box::new(MemoryStore::with_demo_data()?), "memory (demo)".to_string()));
    }

    let path = args
        .data
        .clone()
        .unwrap_or_else(|| config.store.resolved_path());
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let store = JsonFileStore::open(&path)?;
    info!("Using store {}", store.path().display());
    let label = store.path().display().to_string();
    Ok((Box::new(store), label))
}
