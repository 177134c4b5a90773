use crossterm::event::KeyCode;
use serde::{Deserialize, Serialize};

use crate::config::key::{Key, KeyBinding};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobalKeybindings {
    pub quit: KeyBinding,
    pub menu: KeyBinding,
    pub help: KeyBinding,
    pub options: KeyBinding,
    pub login: KeyBinding,
    pub reload: KeyBinding,
    pub next_tab: KeyBinding,
    pub prev_tab: KeyBinding,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationKeybindings {
    pub up: KeyBinding,
    pub down: KeyBinding,
    pub page_up: KeyBinding,
    pub page_down: KeyBinding,
    pub home: KeyBinding,
    pub end: KeyBinding,
    pub select: KeyBinding,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterKeybindings {
    pub toggle: KeyBinding,
    pub exit: KeyBinding,
    pub next_column: KeyBinding,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableKeybindings {
    pub sort_next: KeyBinding,
    pub sort_prev: KeyBinding,
    pub sort_reverse: KeyBinding,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ItemKeybindings {
    pub add: KeyBinding,
    pub edit: KeyBinding,
    pub delete: KeyBinding,
    pub increment: KeyBinding,
    pub decrement: KeyBinding,
    pub copy: KeyBinding,
    pub open_link: KeyBinding,
    pub export: KeyBinding,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryKeybindings {
    pub add: KeyBinding,
    pub edit: KeyBinding,
    pub delete: KeyBinding,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BomKeybindings {
    pub add: KeyBinding,
    pub edit: KeyBinding,
    pub delete: KeyBinding,
    pub make: KeyBinding,
    pub export: KeyBinding,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerKeybindings {
    pub clear: KeyBinding,
    pub copy: KeyBinding,
    pub follow: KeyBinding,
    pub level_up: KeyBinding,
    pub level_down: KeyBinding,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct KeybindingsConfig {
    pub global: GlobalKeybindings,
    pub navigation: NavigationKeybindings,
    pub filter: FilterKeybindings,
    pub table: TableKeybindings,
    pub items: ItemKeybindings,
    pub categories: CategoryKeybindings,
    pub boms: BomKeybindings,
    pub logger: LoggerKeybindings,
}

impl Default for GlobalKeybindings {
    fn default() -> Self {
        Self {
            quit: Key::new(KeyCode::Char('q')).into(),
            menu: Key::new(KeyCode::Char('m')).into(),
            help: KeyBinding::multiple(vec![Key::new(KeyCode::Char('?')), Key::new(KeyCode::F(1))]),
            options: Key::new(KeyCode::Char('o')).into(),
            login: Key::new(KeyCode::Char('L')).into(),
            reload: Key::new(KeyCode::Char('r')).into(),
            next_tab: Key::new(KeyCode::Tab).into(),
            prev_tab: Key::new(KeyCode::BackTab).into(),
        }
    }
}

impl Default for NavigationKeybindings {
    fn default() -> Self {
        Self {
            up: KeyBinding::multiple(vec![Key::new(KeyCode::Char('k')), Key::new(KeyCode::Up)]),
            down: KeyBinding::multiple(vec![Key::new(KeyCode::Char('j')), Key::new(KeyCode::Down)]),
            page_up: Key::new(KeyCode::PageUp).into(),
            page_down: Key::new(KeyCode::PageDown).into(),
            home: KeyBinding::multiple(vec![Key::new(KeyCode::Char('g')), Key::new(KeyCode::Home)]),
            end: KeyBinding::multiple(vec![Key::new(KeyCode::Char('G')), Key::new(KeyCode::End)]),
            select: Key::new(KeyCode::Enter).into(),
        }
    }
}

impl Default for FilterKeybindings {
    fn default() -> Self {
        Self {
            toggle: Key::new(KeyCode::Char('/')).into(),
            exit: Key::new(KeyCode::Esc).into(),
            next_column: Key::new(KeyCode::Tab).into(),
        }
    }
}

impl Default for TableKeybindings {
    fn default() -> Self {
        Self {
            sort_next: Key::new(KeyCode::Char('>')).into(),
            sort_prev: Key::new(KeyCode::Char('<')).into(),
            sort_reverse: Key::new(KeyCode::Char('s')).into(),
        }
    }
}

impl Default for ItemKeybindings {
    fn default() -> Self {
        Self {
            add: Key::new(KeyCode::Char('a')).into(),
            edit: KeyBinding::multiple(vec![Key::new(KeyCode::Char('e')), Key::new(KeyCode::Enter)]),
            delete: KeyBinding::multiple(vec![Key::new(KeyCode::Char('d')), Key::new(KeyCode::Delete)]),
            increment: Key::new(KeyCode::Char('+')).into(),
            decrement: Key::new(KeyCode::Char('-')).into(),
            copy: Key::new(KeyCode::Char('y')).into(),
            open_link: Key::new(KeyCode::Char('l')).into(),
            export: Key::new(KeyCode::Char('x')).into(),
        }
    }
}

impl Default for CategoryKeybindings {
    fn default() -> Self {
        Self {
            add: Key::new(KeyCode::Char('a')).into(),
            edit: KeyBinding::multiple(vec![Key::new(KeyCode::Char('e')), Key::new(KeyCode::Enter)]),
            delete: KeyBinding::multiple(vec![Key::new(KeyCode::Char('d')), Key::new(KeyCode::Delete)]),
        }
    }
}

impl Default for BomKeybindings {
    fn default() -> Self {
        Self {
            add: Key::new(KeyCode::Char('a')).into(),
            edit: KeyBinding::multiple(vec![Key::new(KeyCode::Char('e')), Key::new(KeyCode::Enter)]),
            delete: KeyBinding::multiple(vec![Key::new(KeyCode::Char('d')), Key::new(KeyCode::Delete)]),
            make: Key::new(KeyCode::Char('b')).into(),
            export: Key::new(KeyCode::Char('x')).into(),
        }
    }
}

impl Default for LoggerKeybindings {
    fn default() -> Self {
        Self {
            clear: Key::new(KeyCode::Char('c')).into(),
            copy: Key::new(KeyCode::Char('y')).into(),
            follow: Key::new(KeyCode::Char('f')).into(),
            level_up: Key::new(KeyCode::Char(']')).into(),
            level_down: Key::new(KeyCode::Char('[')).into(),
        }
    }
}
