//! Async commands for side effects.
//!
//! Views queue commands on the app state; the App spawns them on the tokio
//! runtime so slow system calls never block a frame.

mod clipboard;
mod launch;

use std::sync::{Arc, Mutex};

use arboard::Clipboard;
use async_trait::async_trait;
use tokio::sync::mpsc::UnboundedSender;

use crate::app::AppMessage;
use crate::ui::ToastType;

pub use clipboard::CopyToClipboardCmd;
pub use launch::OpenCmd;

/// Async command that performs a side effect.
#[async_trait]
pub trait Command: Send + 'static {
    /// Human-readable name, used in logs and failure toasts.
    fn name(&self) -> String;

    async fn execute(self: Box<Self>, env: CommandEnv) -> color_eyre::Result<()>;
}

/// Shared resources handed to every command.
///
/// Clone is cheap (Arc-based) so each spawned command gets its own handle.
#[derive(Clone)]
pub struct CommandEnv {
    clipboard: Arc<Mutex<Option<Clipboard>>>,
    app_tx: UnboundedSender<AppMessage>,
}

impl CommandEnv {
    pub fn new(app_tx: UnboundedSender<AppMessage>) -> Self {
        Self {
            clipboard: Arc::new(Mutex::new(None)),
            app_tx,
        }
    }

    /// Copy text to the system clipboard.
    ///
    /// On Linux the clipboard is owned by the process, so the handle is kept
    /// for the lifetime of the app.
    pub fn set_clipboard(&self, text: &str) -> color_eyre::Result<()> {
        let mut guard = self
            .clipboard
            .lock()
            .map_err(|e| color_eyre::eyre::eyre!("Failed to lock clipboard: {e}"))?;

        if guard.is_none() {
            *guard = Some(Clipboard::new()?);
        }
        if let Some(clipboard) = guard.as_mut() {
            clipboard.set_text(text)?;
        }
        Ok(())
    }

    pub fn show_toast(&self, message: impl Into<String>, toast_type: ToastType) {
        let _ = self.app_tx.send(AppMessage::ShowToast {
            message: message.into(),
            toast_type,
        });
    }
}

/// Run `command` to completion, reporting failures back to the app.
pub async fn run(command: Box<dyn Command>, env: CommandEnv) {
    let name = command.name();
    tracing::debug!("Running command: {name}");
    if let Err(error) = command.execute(env.clone()).await {
        tracing::error!("{name} failed: {error}");
        let _ = env.app_tx.send(AppMessage::CommandFailed {
            name,
            error: error.to_string(),
        });
    }
}
