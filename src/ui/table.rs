use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table as TableWidget, TableState};

use crate::Theme;
use crate::config::{FilterAction, KeyResolver, NavAction, TableAction};
use crate::filter::Filter;
use crate::sort::{SortSpec, Sortable};
use crate::ui::{Component, Handled, Result};

const PAGE: isize = 10;

pub enum TableEvent<T> {
    Activated(T),
}

/// A record shown as one table row. Headers come from [`crate::filter::Filterable`].
pub trait TableRow: Sortable {
    fn widths() -> &'static [Constraint];
    fn render_cells(&self, theme: &Theme) -> Vec<Cell<'static>>;
}

/// Filterable, sortable table over a snapshot of records.
pub struct Table<T: TableRow + Clone> {
    items: Vec<T>,
    visible: Vec<usize>,
    state: TableState,
    title: String,
    filter: Filter,
    filtering: bool,
    sort: SortSpec,
    resolver: Arc<KeyResolver>,
}

impl<T: TableRow + Clone> Table<T> {
    pub fn new(title: impl Into<String>, resolver: Arc<KeyResolver>) -> Self {
        Self {
            items: Vec::new(),
            visible: Vec::new(),
            state: TableState::default(),
            title: title.into(),
            filter: Filter::default(),
            filtering: false,
            sort: SortSpec::default(),
            resolver,
        }
    }

    /// Replace the rows, keeping the selected position where possible.
    pub fn set_items(&mut self, items: Vec<T>) {
        self.items = items;
        self.update_view();
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn selected(&self) -> Option<&T> {
        let index = *self.visible.get(self.state.selected()?)?;
        self.items.get(index)
    }

    /// Rows that pass the filter, in display order.
    pub fn visible_rows(&self) -> Vec<T> {
        self.visible.iter().map(|&i| self.items[i].clone()).collect()
    }

    pub const fn is_filtering(&self) -> bool {
        self.filtering
    }

    #[cfg(test)]
    pub const fn sort_spec(&self) -> SortSpec {
        self.sort
    }

    fn update_view(&mut self) {
        let mut visible: Vec<usize> = (0..self.items.len())
            .filter(|&i| self.filter.check_match(&self.items[i], None))
            .collect();
        visible.sort_by(|&a, &b| self.sort.compare(&self.items[a], &self.items[b]));
        self.visible = visible;

        if self.visible.is_empty() {
            self.state.select(None);
        } else {
            let last = self.visible.len() - 1;
            self.state
                .select(Some(self.state.selected().map_or(0, |i| i.min(last))));
        }
    }

    fn move_selection(&mut self, delta: isize) {
        if self.visible.is_empty() {
            return;
        }
        let last = self.visible.len() - 1;
        let current = self.state.selected().unwrap_or(0);
        self.state
            .select(Some(current.saturating_add_signed(delta).min(last)));
    }

    fn select_sort_column(&mut self, column: usize) {
        self.sort.select(column);
        self.update_view();
    }

    fn handle_filter_key(&mut self, key: KeyEvent) -> Handled<TableEvent<T>> {
        if self.resolver.matches_filter(&key, FilterAction::Exit) {
            self.filtering = false;
            self.filter.text.clear();
        } else if self.resolver.matches_nav(&key, NavAction::Select) {
            self.filtering = false;
        } else if self.resolver.matches_filter(&key, FilterAction::NextColumn) {
            self.filter.next_column::<T>();
        } else {
            match key.code {
                KeyCode::Backspace => {
                    self.filter.text.pop();
                }
                KeyCode::Char(c) => self.filter.text.push(c),
                _ => {}
            }
        }
        self.update_view();
        Handled::Consumed
    }

    fn handle_navigation_key(&mut self, key: KeyEvent) -> Handled<TableEvent<T>> {
        let resolver = Arc::clone(&self.resolver);
        let nav = |action| resolver.matches_nav(&key, action);
        let delta = if nav(NavAction::Down) {
            Some(1)
        } else if nav(NavAction::Up) {
            Some(-1)
        } else if nav(NavAction::PageDown) {
            Some(PAGE)
        } else if nav(NavAction::PageUp) {
            Some(-PAGE)
        } else if nav(NavAction::Home) {
            Some(isize::MIN)
        } else if nav(NavAction::End) {
            Some(isize::MAX)
        } else {
            None
        };
        if let Some(delta) = delta {
            self.move_selection(delta);
            return Handled::Consumed;
        }

        if nav(NavAction::Select) {
            return self
                .selected()
                .cloned()
                .map_or(Handled::Ignored, |row| TableEvent::Activated(row).into());
        }

        let columns = T::COLUMNS.len();
        if resolver.matches_filter(&key, FilterAction::Toggle) {
            self.filtering = true;
        } else if resolver.matches_filter(&key, FilterAction::Exit) && self.filter.is_active() {
            self.filter.text.clear();
            self.update_view();
        } else if resolver.matches_table(&key, TableAction::SortNext) {
            self.select_sort_column((self.sort.column + 1) % columns);
        } else if resolver.matches_table(&key, TableAction::SortPrev) {
            self.select_sort_column((self.sort.column + columns - 1) % columns);
        } else if resolver.matches_table(&key, TableAction::SortReverse) {
            self.select_sort_column(self.sort.column);
        } else {
            return Handled::Ignored;
        }
        Handled::Consumed
    }

    fn render_filter_bar(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
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
            Span::styled(
                format!("[{}] ", self.filter.column_label::<T>()),
                Style::default().fg(theme.lavender()),
            ),
            Span::styled(format!("{}{cursor}", self.filter.text), text_style),
            Span::styled(
                format!("  ({} of {})", self.visible.len(), self.items.len()),
                Style::default().fg(theme.overlay0()),
            ),
        ]);
        frame.render_widget(Paragraph::new(line), area);
    }
}

impl<T: TableRow + Clone> Component for Table<T> {
    type Output = TableEvent<T>;

    fn handle_key(&mut self, key: KeyEvent) -> Result<Handled<Self::Output>> {
        Ok(if self.filtering {
            self.handle_filter_key(key)
        } else {
            self.handle_navigation_key(key)
        })
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let [table_area, filter_area] =
            Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(area);

        let header = Row::new(T::COLUMNS.iter().enumerate().map(|(i, label)| {
            let marker = match (i == self.sort.column, self.sort.ascending) {
                (true, true) => " ▲",
                (true, false) => " ▼",
                (false, _) => "",
            };
            Cell::from(format!("{label}{marker}"))
                .style(Style::default().fg(theme.header()).add_modifier(Modifier::BOLD))
        }))
        .style(Style::default().bg(theme.surface0()));

        let rows = self.visible.iter().map(|&i| {
            Row::new(self.items[i].render_cells(theme)).style(Style::default().fg(theme.text()))
        });

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(theme.border()))
            .title(format!(" {} ", self.title))
            .title_style(Style::default().fg(theme.mauve()).add_modifier(Modifier::BOLD));

        let table = TableWidget::new(rows, T::widths().iter().copied())
            .header(header)
            .block(block)
            .row_highlight_style(
                Style::default()
                    .bg(theme.selection_bg())
                    .fg(theme.lavender())
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("▶ ");

        frame.render_stateful_widget(table, table_area, &mut self.state);
        self.render_filter_bar(frame, filter_area, theme);
    }
}
