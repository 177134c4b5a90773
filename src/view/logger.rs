use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};

use super::View;
use crate::app::AppState;
use crate::commands::CopyToClipboardCmd;
use crate::config::{FilterAction, KeyResolver, LoggerAction, NavAction};
use crate::dialog::AppPopup;
use crate::logging::{LogEntry, LogLevel};
use crate::ui::{Handled, Keybinding, Result, Toast};

const PAGE: usize = 10;

/// Scrollable view over the in-app log console.
pub struct LoggerView {
    resolver: Arc<KeyResolver>,
    entries: Vec<LogEntry>,
    min_level: LogLevel,
    filter: String,
    filtering: bool,
    /// Keep the newest entry in view.
    follow: bool,
    scroll: usize,
    /// Body height of the last render, used for paging.
    height: usize,
}

impl LoggerView {
    pub const fn new(resolver: Arc<KeyResolver>) -> Self {
        Self {
            resolver,
            entries: Vec::new(),
            min_level: LogLevel::Debug,
            filter: String::new(),
            filtering: false,
            follow: true,
            scroll: 0,
            height: PAGE,
        }
    }

    fn max_scroll(&self) -> usize {
        self.entries.len().saturating_sub(self.height)
    }

    fn scroll_by(&mut self, delta: isize) {
        self.scroll = self.scroll.saturating_add_signed(delta).min(self.max_scroll());
        self.follow = self.scroll == self.max_scroll();
    }

    fn handle_filter_key(&mut self, key: KeyEvent) {
        if self.resolver.matches_filter(&key, FilterAction::Exit) {
            self.filtering = false;
            self.filter.clear();
        } else if self.resolver.matches_nav(&key, NavAction::Select) {
            self.filtering = false;
        } else {
            match key.code {
                KeyCode::Backspace => {
                    self.filter.pop();
                }
                KeyCode::Char(c) => self.filter.push(c),
                _ => {}
            }
        }
    }

    /// Copy the lines that pass the current filters.
    fn copy(&self, state: &mut AppState) {
        if self.entries.is_empty() {
            state.toast(Toast::info("Nothing to copy"));
            return;
        }
        let text = self
            .entries
            .iter()
            .map(LogEntry::line)
            .collect::<Vec<_>>()
            .join("\n");
        let label = format!("{} log lines", self.entries.len());
        state.spawn(CopyToClipboardCmd::new(text, label));
    }

    fn title(&self) -> String {
        let follow = if self.follow { " [follow]" } else { "" };
        format!(" Logger [{}+]{follow} ", self.min_level)
    }

    fn render_filter_bar(&self, frame: &mut Frame, area: Rect, state: &AppState) {
        let theme = &state.theme;
        let text_style = if self.filtering {
            Style::default().fg(theme.yellow())
        } else {
            Style::default().fg(theme.subtext0())
        };
        let cursor = if self.filtering { "_" } else { "" };
        let line = Line::from(vec![
            Span::styled(
                format!(" {} ", self.resolver.display_filter(FilterAction::Toggle)),
                Style::default().fg(theme.peach()),
            ),
            Span::styled(format!("{}{cursor}", self.filter), text_style),
            Span::styled(
                format!("  ({} of {})", self.entries.len(), state.console.len()),
                Style::default().fg(theme.overlay0()),
            ),
        ]);
        frame.render_widget(Paragraph::new(line), area);
    }
}

impl View for LoggerView {
    fn sync(&mut self, state: &AppState) {
        self.entries = state.console.filtered(self.min_level, &self.filter);
        self.scroll = if self.follow {
            self.max_scroll()
        } else {
            self.scroll.min(self.max_scroll())
        };
    }

    fn handle_key(
        &mut self,
        key: KeyEvent,
        state: &mut AppState,
        _popup: &mut AppPopup,
    ) -> Result<Handled<()>> {
        if self.filtering {
            self.handle_filter_key(key);
            self.sync(state);
            return Ok(Handled::Consumed);
        }

        let r = Arc::clone(&self.resolver);
        let page = isize::try_from(self.height.max(1)).unwrap_or(1);
        if r.matches_filter(&key, FilterAction::Toggle) {
            self.filtering = true;
        } else if r.matches_filter(&key, FilterAction::Exit) && !self.filter.is_empty() {
            self.filter.clear();
        } else if r.matches_logger(&key, LoggerAction::Clear) {
            state.console.clear();
            self.scroll = 0;
        } else if r.matches_logger(&key, LoggerAction::Copy) {
            self.copy(state);
            return Ok(Handled::Consumed);
        } else if r.matches_logger(&key, LoggerAction::Follow) {
            self.follow = !self.follow;
        } else if r.matches_logger(&key, LoggerAction::LevelUp) {
            self.min_level = self.min_level.next().min(LogLevel::Critical);
        } else if r.matches_logger(&key, LoggerAction::LevelDown) {
            self.min_level = self.min_level.prev();
        } else if r.matches_nav(&key, NavAction::Up) {
            self.scroll_by(-1);
        } else if r.matches_nav(&key, NavAction::Down) {
            self.scroll_by(1);
        } else if r.matches_nav(&key, NavAction::PageUp) {
            self.scroll_by(-page);
        } else if r.matches_nav(&key, NavAction::PageDown) {
            self.scroll_by(page);
        } else if r.matches_nav(&key, NavAction::Home) {
            self.scroll = 0;
            self.follow = false;
        } else if r.matches_nav(&key, NavAction::End) {
            self.follow = true;
        } else {
            return Ok(Handled::Ignored);
        }
        self.sync(state);
        Ok(Handled::Consumed)
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, state: &AppState) {
        let theme = &state.theme;
        let [body_area, filter_area] =
            Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(area);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(theme.border()))
            .title(self.title())
            .title_style(Style::default().fg(theme.mauve()).add_modifier(Modifier::BOLD));
        self.height = block.inner(body_area).height as usize;
        self.scroll = if self.follow {
            self.max_scroll()
        } else {
            self.scroll.min(self.max_scroll())
        };

        let lines: Vec<Line> = self
            .entries
            .iter()
            .skip(self.scroll)
            .take(self.height)
            .map(|entry| {
                Line::styled(entry.line(), Style::default().fg(theme.log_level(entry.level)))
            })
            .collect();
        frame.render_widget(Paragraph::new(lines).block(block), body_area);
        self.render_filter_bar(frame, filter_area, state);
    }

    fn keybindings(&self) -> Vec<Keybinding> {
        keybindings(&self.resolver)
    }
}

pub(super) fn keybindings(r: &KeyResolver) -> Vec<Keybinding> {
    vec![
        Keybinding::hint(r.display_filter(FilterAction::Toggle), "Filter"),
        Keybinding::hint(
            format!(
                "{}/{}",
                r.display_logger(LoggerAction::LevelDown),
                r.display_logger(LoggerAction::LevelUp)
            ),
            "Level",
        ),
        Keybinding::hint(r.display_logger(LoggerAction::Follow), "Follow"),
        Keybinding::new(r.display_logger(LoggerAction::Copy), "Copy"),
        Keybinding::new(r.display_logger(LoggerAction::Clear), "Clear"),
    ]
}
