use std::sync::Arc;

use crossterm::event::KeyEvent;

use crate::config::actions::*;
use crate::config::key::KeyBinding;
use crate::config::keybindings::KeybindingsConfig;

/// Maps key events to actions according to the configured keybindings.
pub struct KeyResolver {
    pub keybindings: Arc<KeybindingsConfig>,
}

impl KeyResolver {
    pub const fn new(keybindings: Arc<KeybindingsConfig>) -> Self {
        Self { keybindings }
    }

    fn global(&self, action: GlobalAction) -> &KeyBinding {
        let kb = &self.keybindings.global;
        match action {
            GlobalAction::Quit => &kb.quit,
            GlobalAction::Menu => &kb.menu,
            GlobalAction::Help => &kb.help,
            GlobalAction::Options => &kb.options,
            GlobalAction::Login => &kb.login,
            GlobalAction::Reload => &kb.reload,
            GlobalAction::NextTab => &kb.next_tab,
            GlobalAction::PrevTab => &kb.prev_tab,
        }
    }

    pub fn matches_global(&self, event: &KeyEvent, action: GlobalAction) -> bool {
        self.global(action).matches(event)
    }

    pub fn display_global(&self, action: GlobalAction) -> String {
        self.global(action).display()
    }

    fn nav(&self, action: NavAction) -> &KeyBinding {
        let kb = &self.keybindings.navigation;
        match action {
            NavAction::Up => &kb.up,
            NavAction::Down => &kb.down,
            NavAction::PageUp => &kb.page_up,
            NavAction::PageDown => &kb.page_down,
            NavAction::Home => &kb.home,
            NavAction::End => &kb.end,
            NavAction::Select => &kb.select,
        }
    }

    pub fn matches_nav(&self, event: &KeyEvent, action: NavAction) -> bool {
        self.nav(action).matches(event)
    }

    pub fn display_nav(&self, action: NavAction) -> String {
        self.nav(action).display()
    }

    fn filter(&self, action: FilterAction) -> &KeyBinding {
        let kb = &self.keybindings.filter;
        match action {
            FilterAction::Toggle => &kb.toggle,
            FilterAction::Exit => &kb.exit,
            FilterAction::NextColumn => &kb.next_column,
        }
    }

    pub fn matches_filter(&self, event: &KeyEvent, action: FilterAction) -> bool {
        self.filter(action).matches(event)
    }

    pub fn display_filter(&self, action: FilterAction) -> String {
        self.filter(action).display()
    }

    fn table(&self, action: TableAction) -> &KeyBinding {
        let kb = &self.keybindings.table;
        match action {
            TableAction::SortNext => &kb.sort_next,
            TableAction::SortPrev => &kb.sort_prev,
            TableAction::SortReverse => &kb.sort_reverse,
        }
    }

    pub fn matches_table(&self, event: &KeyEvent, action: TableAction) -> bool {
        self.table(action).matches(event)
    }

    pub fn display_table(&self, action: TableAction) -> String {
        self.table(action).display()
    }

    fn items(&self, action: ItemAction) -> &KeyBinding {
        let kb = &self.keybindings.items;
        match action {
            ItemAction::Add => &kb.add,
            ItemAction::Edit => &kb.edit,
            ItemAction::Delete => &kb.delete,
            ItemAction::Increment => &kb.increment,
            ItemAction::Decrement => &kb.decrement,
            ItemAction::Copy => &kb.copy,
            ItemAction::OpenLink => &kb.open_link,
            ItemAction::Export => &kb.export,
        }
    }

    pub fn matches_items(&self, event: &KeyEvent, action: ItemAction) -> bool {
        self.items(action).matches(event)
    }

    pub fn display_items(&self, action: ItemAction) -> String {
        self.items(action).display()
    }

    fn categories(&self, action: CategoryAction) -> &KeyBinding {
        let kb = &self.keybindings.categories;
        match action {
            CategoryAction::Add => &kb.add,
            CategoryAction::Edit => &kb.edit,
            CategoryAction::Delete => &kb.delete,
        }
    }

    pub fn matches_categories(&self, event: &KeyEvent, action: CategoryAction) -> bool {
        self.categories(action).matches(event)
    }

    pub fn display_categories(&self, action: CategoryAction) -> String {
        self.categories(action).display()
    }

    fn boms(&self, action: BomAction) -> &KeyBinding {
        let kb = &self.keybindings.boms;
        match action {
            BomAction::Add => &kb.add,
            BomAction::Edit => &kb.edit,
            BomAction::Delete => &kb.delete,
            BomAction::Make => &kb.make,
            BomAction::Export => &kb.export,
        }
    }

    pub fn matches_boms(&self, event: &KeyEvent, action: BomAction) -> bool {
        self.boms(action).matches(event)
    }

    pub fn display_boms(&self, action: BomAction) -> String {
        self.boms(action).display()
    }

    fn logger(&self, action: LoggerAction) -> &KeyBinding {
        let kb = &self.keybindings.logger;
        match action {
            LoggerAction::Clear => &kb.clear,
            LoggerAction::Copy => &kb.copy,
            LoggerAction::Follow => &kb.follow,
            LoggerAction::LevelUp => &kb.level_up,
            LoggerAction::LevelDown => &kb.level_down,
        }
    }

    pub fn matches_logger(&self, event: &KeyEvent, action: LoggerAction) -> bool {
        self.logger(action).matches(event)
    }

    pub fn display_logger(&self, action: LoggerAction) -> String {
        self.logger(action).display()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::key::Key;
    use crossterm::event::{KeyCode, KeyModifiers};

    #[test]
    fn test_default_bindings_resolve() {
        let resolver = KeyResolver::new(Arc::new(KeybindingsConfig::default()));
        let plus = KeyEvent::new(KeyCode::Char('+'), KeyModifiers::NONE);
        assert!(resolver.matches_items(&plus, ItemAction::Increment));
        assert!(!resolver.matches_items(&plus, ItemAction::Decrement));
        assert_eq!(resolver.display_boms(BomAction::Delete), "d/Delete");
    }

    #[test]
    fn test_custom_binding_overrides_default() {
        let mut keybindings = KeybindingsConfig::default();
        keybindings.boms.make = Key::new(KeyCode::Char('M')).into();
        let resolver = KeyResolver::new(Arc::new(keybindings));

        let shift_m = KeyEvent::new(KeyCode::Char('M'), KeyModifiers::SHIFT);
        let b = KeyEvent::new(KeyCode::Char('b'), KeyModifiers::NONE);
        assert!(resolver.matches_boms(&shift_m, BomAction::Make));
        assert!(!resolver.matches_boms(&b, BomAction::Make));
    }
}
