use std::path::PathBuf;
use std::sync::Arc;

use crate::Theme;
use crate::commands::Command;
use crate::config::{self, AppConfig, KeyResolver};
use crate::dialog;
use crate::inventory::{Inventory, InventoryError};
use crate::logging::{LogConsole, LogControl};
use crate::ui::{Popup, Toast, ToastManager};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Items,
    Categories,
    Boms,
    Logger,
}

impl Tab {
    pub const ALL: [Self; 4] = [Self::Items, Self::Categories, Self::Boms, Self::Logger];

    pub const fn title(self) -> &'static str {
        match self {
            Self::Items => "Items",
            Self::Categories => "Categories",
            Self::Boms => "BOMs",
            Self::Logger => "Logger",
        }
    }

    const fn index(self) -> usize {
        self as usize
    }

    #[must_use]
    pub const fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    #[must_use]
    pub const fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// Everything popup callbacks and views may touch.
pub struct AppState {
    pub inventory: Inventory,
    pub config: AppConfig,
    /// Where config changes are persisted. `None` keeps them in memory.
    pub config_path: Option<PathBuf>,
    pub theme: Theme,
    pub resolver: Arc<KeyResolver>,
    pub console: LogConsole,
    pub log_control: LogControl,
    pub toasts: ToastManager,
    pub tab: Tab,
    pub should_quit: bool,
    /// Username the login popup starts with.
    pub login_hint: Option<String>,
    /// Where the data lives, shown in the status bar.
    pub store_label: String,
    commands: Vec<Box<dyn Command>>,
}

impl AppState {
    pub fn new(
        inventory: Inventory,
        config: AppConfig,
        resolver: Arc<KeyResolver>,
        console: LogConsole,
        log_control: LogControl,
        store_label: impl Into<String>,
    ) -> Self {
        let theme = crate::theme::theme_from_name(&config.theme.name);
        Self {
            inventory,
            config,
            config_path: None,
            theme,
            resolver,
            console,
            log_control,
            toasts: ToastManager::default(),
            tab: Tab::default(),
            should_quit: false,
            login_hint: None,
            store_label: store_label.into(),
            commands: Vec::new(),
        }
    }

    pub fn spawn(&mut self, command: impl Command) {
        self.commands.push(Box::new(command));
    }

    pub fn take_commands(&mut self) -> Vec<Box<dyn Command>> {
        std::mem::take(&mut self.commands)
    }

    /// Persist a change to the config file, if there is one.
    pub fn save_config(&self, f: impl FnOnce(&mut AppConfig)) -> color_eyre::Result<()> {
        match &self.config_path {
            Some(path) => config::loader::update(path, f),
            None => Ok(()),
        }
    }

    pub fn toast(&mut self, toast: Toast) {
        self.toasts.show(toast);
    }

    /// Surface a failed inventory operation in a popup.
    pub fn report(&mut self, popup: &mut Popup<Self>, error: &InventoryError) {
        match error {
            InventoryError::Unauthorized => {
                tracing::warn!("{error}");
                dialog::unauthorized(popup);
            }
            _ => {
                tracing::error!("{error}");
                dialog::error(popup, &error.to_string());
            }
        }
    }
}

#[cfg(test)]
impl AppState {
    /// Demo inventory, logged in as `user` when given (password = username).
    pub fn demo(user: Option<&str>) -> Self {
        use crate::config::keybindings::KeybindingsConfig;
        use crate::store::MemoryStore;

        let store = MemoryStore::with_demo_data().unwrap();
        let mut inventory = Inventory::new(Box::new(store), std::time::Duration::from_secs(60));
        if let Some(user) = user {
            assert!(inventory.login(user, user).unwrap());
        }
        Self::new(
            inventory,
            AppConfig::default(),
            Arc::new(KeyResolver::new(Arc::new(KeybindingsConfig::default()))),
            LogConsole::new(),
            LogControl::detached(),
            "memory",
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tabs_wrap() {
        assert_eq!(Tab::Items.prev(), Tab::Logger);
        assert_eq!(Tab::Logger.next(), Tab::Items);
        assert_eq!(Tab::Categories.next(), Tab::Boms);
    }
}
