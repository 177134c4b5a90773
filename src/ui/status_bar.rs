use std::sync::Arc;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};

use crate::Theme;
use crate::config::{GlobalAction, KeyResolver, NavAction};

/// A key and what it does, for the hint bar and the user guide.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keybinding {
    pub key: String,
    pub description: String,
    /// Shown in the hint bar, not only in the user guide.
    pub hint: bool,
}

impl Keybinding {
    pub fn new(key: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            description: description.into(),
            hint: false,
        }
    }

    pub fn hint(key: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            hint: true,
            ..Self::new(key, description)
        }
    }
}

/// Facts shown on the left of the status bar.
pub struct StatusInfo<'a> {
    pub user: Option<&'a str>,
    pub can_write: bool,
    pub store: &'a str,
    pub store_error: bool,
}

pub struct StatusBar {
    resolver: Arc<KeyResolver>,
}

impl StatusBar {
    pub const fn new(resolver: Arc<KeyResolver>) -> Self {
        Self { resolver }
    }

    pub fn render(
        &self,
        frame: &mut Frame,
        area: Rect,
        theme: &Theme,
        info: &StatusInfo<'_>,
        local_keybindings: &[Keybinding],
    ) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(theme.border()));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(34), Constraint::Min(20)])
            .split(inner);

        Self::render_status(frame, chunks[0], theme, info);
        self.render_hints(frame, chunks[1], theme, local_keybindings);
    }

    fn render_status(frame: &mut Frame, area: Rect, theme: &Theme, info: &StatusInfo<'_>) {
        let w = area.width as usize;
        let user = match info.user {
            Some(name) if info.can_write => Span::styled(
                truncate_str(&format!("{name} (write)"), w),
                Style::default().fg(theme.green()).add_modifier(Modifier::BOLD),
            ),
            Some(name) => Span::styled(
                truncate_str(&format!("{name} (read only)"), w),
                Style::default().fg(theme.yellow()).add_modifier(Modifier::BOLD),
            ),
            None => Span::styled("Not logged in", Style::default().fg(theme.overlay0())),
        };
        let store = if info.store_error {
            Span::styled("store unavailable", Style::default().fg(theme.red()))
        } else {
            Span::styled(truncate_str(info.store, w), Style::default().fg(theme.subtext0()))
        };

        frame.render_widget(Paragraph::new(vec![Line::from(user), Line::from(store)]), area);
    }

    fn render_hints(&self, frame: &mut Frame, area: Rect, theme: &Theme, local: &[Keybinding]) {
        let global = self.global_keybindings();
        let hints: Vec<&Keybinding> = local
            .iter()
            .chain(global.iter())
            .filter(|kb| kb.hint)
            .collect();
        if hints.is_empty() || area.height == 0 {
            return;
        }

        let max_key_w = hints.iter().map(|kb| kb.key.len()).max().unwrap_or(1);
        let max_desc_w = hints.iter().map(|kb| kb.description.len()).max().unwrap_or(1);
        let col_width = u16::try_from(max_key_w + 3 + max_desc_w + 2).unwrap_or(u16::MAX);
        let num_cols = (area.width / col_width).max(1) as usize;
        let num_rows = area.height as usize;

        let mut columns: Vec<Vec<Line>> = vec![Vec::new(); num_cols];
        for (i, kb) in hints.iter().enumerate() {
            let Some(column) = columns.get_mut(i / num_rows) else {
                break;
            };
            column.push(Line::from(vec![
                Span::styled(
                    format!("{:>max_key_w$}", kb.key),
                    Style::default().fg(theme.peach()),
                ),
                Span::styled(" │ ", Style::default().fg(theme.surface2())),
                Span::styled(kb.description.clone(), Style::default().fg(theme.subtext0())),
            ]));
        }

        let areas = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(vec![Constraint::Length(col_width); num_cols])
            .split(area);
        for (lines, column_area) in columns.into_iter().zip(areas.iter()) {
            frame.render_widget(Paragraph::new(lines), *column_area);
        }
    }

    /// Application-wide keys, also listed in the user guide.
    pub fn global_keybindings(&self) -> Vec<Keybinding> {
        let r = &self.resolver;
        vec![
            Keybinding::hint(r.display_global(GlobalAction::Menu), "Menu"),
            Keybinding::hint(r.display_global(GlobalAction::Login), "Login"),
            Keybinding::hint(r.display_global(GlobalAction::Help), "Guide"),
            Keybinding::new(r.display_global(GlobalAction::Options), "Options"),
            Keybinding::new(r.display_global(GlobalAction::Reload), "Reload"),
            Keybinding::new(
                format!(
                    "{}/{}",
                    r.display_global(GlobalAction::NextTab),
                    r.display_global(GlobalAction::PrevTab)
                ),
                "Switch tab",
            ),
            Keybinding::new(
                format!(
                    "{}/{}",
                    r.display_nav(NavAction::Up),
                    r.display_nav(NavAction::Down)
                ),
                "Navigate",
            ),
            Keybinding::hint(r.display_global(GlobalAction::Quit), "Quit"),
        ]
    }
}

/// Truncate to `max_width` characters, ending in "..." when cut.
fn truncate_str(s: &str, max_width: usize) -> String {
    if s.chars().count() <= max_width {
        s.to_string()
    } else if max_width > 3 {
        let kept: String = s.chars().take(max_width - 3).collect();
        format!("{kept}...")
    } else {
        s.chars().take(max_width).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::keybindings::KeybindingsConfig;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    #[test]
    fn test_truncate_str() {
        assert_eq!(truncate_str("inventory.json", 20), "inventory.json");
        assert_eq!(truncate_str("inventory.json", 8), "inven...");
        assert_eq!(truncate_str("ab", 1), "a");
    }

    #[test]
    fn test_renders_user_and_hints() {
        let resolver = Arc::new(KeyResolver::new(Arc::new(KeybindingsConfig::default())));
        let bar = StatusBar::new(resolver);
        let mut terminal = Terminal::new(TestBackend::new(100, 4)).unwrap();
        let info = StatusInfo {
            user: Some("admin"),
            can_write: true,
            store: "memory",
            store_error: false,
        };

        terminal
            .draw(|frame| {
                bar.render(
                    frame,
                    frame.area(),
                    &Theme::default(),
                    &info,
                    &[Keybinding::hint("a", "Add")],
                );
            })
            .unwrap();

        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(ratatui::buffer::Cell::symbol)
            .collect();
        assert!(text.contains("admin (write)"));
        assert!(text.contains("Add"));
        assert!(text.contains("Quit"));
    }
}
