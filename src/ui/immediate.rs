//! Immediate-mode drawing context used by popup callbacks.
//!
//! Widgets are declared every frame in the order they should appear. The
//! context keeps only the focused widget between frames; everything else is
//! rebuilt from scratch by [`Ui::begin_frame`].

use std::collections::VecDeque;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::Theme;
use crate::fonts::{FontStack, TextStyle};

/// Input delivered to the focused widget on the next frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiInput {
    Activate,
    Cancel,
    Next,
    Prev,
    Left,
    Right,
    Backspace,
    Char(char),
}

impl UiInput {
    #[must_use]
    pub const fn from_key(key: &KeyEvent) -> Option<Self> {
        Some(match key.code {
            KeyCode::Enter => Self::Activate,
            KeyCode::Esc => Self::Cancel,
            KeyCode::Tab | KeyCode::Down => Self::Next,
            KeyCode::BackTab | KeyCode::Up => Self::Prev,
            KeyCode::Left => Self::Left,
            KeyCode::Right => Self::Right,
            KeyCode::Backspace => Self::Backspace,
            KeyCode::Char(c)
                if key.modifiers.is_empty() || key.modifiers.contains(KeyModifiers::SHIFT) =>
            {
                Self::Char(c)
            }
            _ => return None,
        })
    }
}

pub struct Ui {
    theme: Theme,
    fonts: FontStack,
    lines: Vec<Line<'static>>,
    row: Vec<Span<'static>>,
    same_line: bool,
    focus: usize,
    widgets: usize,
    last_widgets: usize,
    pending: VecDeque<UiInput>,
    input: Option<UiInput>,
    close_requested: bool,
}

impl Ui {
    #[must_use]
    pub fn new(theme: Theme) -> Self {
        Self {
            theme,
            fonts: FontStack::new(),
            lines: Vec::new(),
            row: Vec::new(),
            same_line: false,
            focus: 0,
            widgets: 0,
            last_widgets: 0,
            pending: VecDeque::new(),
            input: None,
            close_requested: false,
        }
    }

    /// Queue input for an upcoming frame. One input is applied per frame.
    pub fn feed(&mut self, input: UiInput) {
        self.pending.push_back(input);
    }

    pub fn begin_frame(&mut self, theme: Theme) {
        self.theme = theme;
        self.fonts.clear();
        self.lines.clear();
        self.row.clear();
        self.same_line = false;
        self.last_widgets = self.widgets;
        self.widgets = 0;
        self.close_requested = false;
        self.input = self.pending.pop_front();

        match self.input {
            Some(UiInput::Next) => {
                if self.last_widgets > 0 {
                    self.focus = (self.focus + 1) % self.last_widgets;
                }
                self.input = None;
            }
            Some(UiInput::Prev) => {
                if self.last_widgets > 0 {
                    self.focus = (self.focus + self.last_widgets - 1) % self.last_widgets;
                }
                self.input = None;
            }
            Some(UiInput::Cancel) => {
                self.close_requested = true;
                self.input = None;
            }
            _ => {}
        }
        if self.last_widgets > 0 && self.focus >= self.last_widgets {
            self.focus = self.last_widgets - 1;
        }
    }

    /// Drop focus and queued input, used when a different popup takes over.
    pub fn reset_focus(&mut self) {
        self.focus = 0;
        self.widgets = 0;
        self.pending.clear();
        self.input = None;
    }

    #[must_use]
    pub const fn theme(&self) -> &Theme {
        &self.theme
    }

    #[must_use]
    pub const fn close_requested(&self) -> bool {
        self.close_requested
    }

    /// Flush the accumulated output for this frame.
    pub fn finish(&mut self) -> Vec<Line<'static>> {
        self.flush_row();
        std::mem::take(&mut self.lines)
    }

    /// Place the next widget on the same row as the previous one.
    pub const fn same_line(&mut self) {
        self.same_line = true;
    }

    pub fn spacing(&mut self) {
        self.flush_row();
        self.lines.push(Line::default());
    }

    pub fn separator(&mut self) {
        self.flush_row();
        self.lines.push(Line::styled(
            "─".repeat(48),
            Style::default().fg(self.theme.surface2()),
        ));
    }

    pub fn text(&mut self, txt: &str) {
        let style = self.base_style();
        for part in txt.split('\n') {
            self.place(vec![Span::styled(part.to_string(), style)]);
        }
    }

    pub fn text_colored(&mut self, txt: &str, color: Color) {
        let style = self.base_style().fg(color);
        self.place(vec![Span::styled(txt.to_string(), style)]);
    }

    pub fn text_centered(&mut self, txt: &str) {
        self.flush_row();
        let style = self.base_style();
        for part in txt.split('\n') {
            self.lines
                .push(Line::from(Span::styled(part.to_string(), style)).centered());
        }
    }

    /// Text rendered with a `"Font"` or `"Font/color"` style string.
    pub fn text_styled(&mut self, txt: &str, style: &str, centered: bool) {
        let parsed = TextStyle::parse(style);
        let pushed = match self.fonts.push(&parsed.font) {
            Ok(()) => true,
            Err(err) => {
                tracing::debug!("Falling back to default font: {err}");
                false
            }
        };

        let mut span_style = self.base_style();
        if let Some(color) = parsed.color {
            span_style = span_style.fg(color);
        }

        if centered {
            self.flush_row();
            for part in txt.split('\n') {
                self.lines
                    .push(Line::from(Span::styled(part.to_string(), span_style)).centered());
            }
        } else {
            for part in txt.split('\n') {
                self.place(vec![Span::styled(part.to_string(), span_style)]);
            }
        }

        if pushed {
            let _ = self.fonts.pop();
        }
    }

    pub fn button(&mut self, label: &str) -> bool {
        self.button_enabled(label, true)
    }

    /// A button that is drawn dimmed and never activates when `enabled` is false.
    pub fn button_enabled(&mut self, label: &str, enabled: bool) -> bool {
        let focused = self.next_widget();
        let activated = enabled && focused && self.take_input(UiInput::Activate);

        let style = if !enabled {
            Style::default()
                .fg(self.theme.overlay0())
                .add_modifier(Modifier::DIM)
        } else if focused {
            Style::default()
                .fg(self.theme.base())
                .bg(self.theme.lavender())
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
                .fg(self.theme.lavender())
                .add_modifier(Modifier::BOLD)
        };
        self.place(vec![Span::styled(format!("[ {label} ]"), style)]);
        activated
    }

    /// Editable single-line text field bound to `value`.
    pub fn text_input(&mut self, label: &str, value: &mut String, masked: bool) -> bool {
        let focused = self.next_widget();
        let mut changed = false;
        if focused {
            match self.input {
                Some(UiInput::Char(c)) => {
                    value.push(c);
                    self.input = None;
                    changed = true;
                }
                Some(UiInput::Backspace) => {
                    changed = value.pop().is_some();
                    self.input = None;
                }
                _ => {}
            }
        }

        let shown = if masked {
            "*".repeat(value.chars().count())
        } else {
            value.clone()
        };
        let label_style = Style::default().fg(self.theme.subtext0());
        let value_style = if focused {
            Style::default()
                .fg(self.theme.text())
                .bg(self.theme.surface0())
        } else {
            Style::default().fg(self.theme.text())
        };
        let mut spans = vec![
            Span::styled(format!("{label}: "), label_style),
            Span::styled(shown, value_style),
        ];
        if focused {
            spans.push(Span::styled(
                " ",
                Style::default().bg(self.theme.text()),
            ));
        }
        self.place(spans);
        changed
    }

    pub fn checkbox(&mut self, label: &str, value: &mut bool) -> bool {
        let focused = self.next_widget();
        let toggled = focused
            && (self.take_input(UiInput::Activate) || self.take_input(UiInput::Char(' ')));
        if toggled {
            *value = !*value;
        }

        let mark = if *value { "[x]" } else { "[ ]" };
        let style = if focused {
            Style::default()
                .fg(self.theme.lavender())
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(self.theme.text())
        };
        self.place(vec![Span::styled(format!("{mark} {label}"), style)]);
        toggled
    }

    /// Cycles through `options` with Left/Right while focused.
    pub fn selector<S: AsRef<str>>(&mut self, label: &str, options: &[S], index: &mut usize) -> bool {
        let focused = self.next_widget();
        let mut changed = false;
        if focused && !options.is_empty() {
            if self.take_input(UiInput::Right) {
                *index = (*index + 1) % options.len();
                changed = true;
            } else if self.take_input(UiInput::Left) {
                *index = (*index + options.len() - 1) % options.len();
                changed = true;
            }
        }
        if *index >= options.len() {
            *index = 0;
        }

        let current = options.get(*index).map_or("", AsRef::as_ref);
        let value_style = if focused {
            Style::default()
                .fg(self.theme.lavender())
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(self.theme.text())
        };
        self.place(vec![
            Span::styled(format!("{label}: "), Style::default().fg(self.theme.subtext0())),
            Span::styled(format!("◀ {current} ▶"), value_style),
        ]);
        changed
    }

    fn base_style(&self) -> Style {
        Style::default().fg(self.theme.text()).patch(self.fonts.current())
    }

    fn next_widget(&mut self) -> bool {
        let id = self.widgets;
        self.widgets += 1;
        id == self.focus
    }

    fn take_input(&mut self, wanted: UiInput) -> bool {
        if self.input == Some(wanted) {
            self.input = None;
            true
        } else {
            false
        }
    }

    fn place(&mut self, spans: Vec<Span<'static>>) {
        if self.same_line && !self.row.is_empty() {
            self.row.push(Span::raw(" "));
        } else {
            self.flush_row();
        }
        self.same_line = false;
        self.row.extend(spans);
    }

    fn flush_row(&mut self) {
        if !self.row.is_empty() {
            self.lines.push(Line::from(std::mem::take(&mut self.row)));
        }
    }
}
