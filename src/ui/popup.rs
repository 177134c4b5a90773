//! Re-entrant modal popup engine.
//!
//! A popup is opened with a title and then composed from an ordered list of
//! entries. Each entry is one of five callback shapes. While the popup is open
//! the whole list is replayed every frame against the immediate-mode [`Ui`],
//! so the content of a dialog is declared once and the dismissal logic lives
//! here.
//!
//! ```ignore
//! popup
//!     .open("Confirm")
//!     .labeled("Are you sure?", |ui, _, text| ui.text_centered(text))
//!     .committing("Yes", |ui, _, label| ui.button(label), |state, _| state.delete());
//! ```
//!
//! Completion and close callbacks receive the engine itself so they can open
//! a follow-up popup (for example a "retry" dialog after a failed save).

use ratatui::Frame;
use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap};

use crate::Theme;
use crate::ui::Ui;

type ActionFn<S> = Box<dyn FnMut(&mut Ui, &mut S)>;
type QueryFn<S> = Box<dyn FnMut(&mut Ui, &mut S) -> bool>;
type LabeledFn<S> = Box<dyn FnMut(&mut Ui, &mut S, &mut String)>;
type PredicateFn<S> = Box<dyn FnMut(&mut Ui, &mut S, &str) -> bool>;
type ExtendedFn<S> = Box<dyn FnMut(&mut Ui, &mut S, &str, &str, bool)>;

/// Callback run once with the engine, after a commit or on close.
pub type Completion<S> = Box<dyn FnOnce(&mut S, &mut Popup<S>)>;

enum Entry<S> {
    Action(ActionFn<S>),
    /// The returned flag is observed but does not affect the session.
    Query(QueryFn<S>),
    Labeled {
        f: LabeledFn<S>,
        text: String,
    },
    Committing {
        label: String,
        predicate: PredicateFn<S>,
        completion: Option<Completion<S>>,
    },
    Extended {
        f: ExtendedFn<S>,
        label: String,
        text: String,
        flag: bool,
    },
}

/// One open popup: its chrome and the entries replayed every frame.
pub struct Session<S> {
    title: String,
    entries: Vec<Entry<S>>,
    on_close: Option<Completion<S>>,
    size: Option<(u16, u16)>,
    show_close: bool,
    closed: bool,
}

impl<S> Session<S> {
    fn new(title: String) -> Self {
        Self {
            title,
            entries: Vec::new(),
            on_close: None,
            size: None,
            show_close: true,
            closed: false,
        }
    }

    /// Run `f` once when the popup is dismissed through the Close control.
    pub fn on_close(&mut self, f: impl FnOnce(&mut S, &mut Popup<S>) + 'static) -> &mut Self {
        self.on_close = Some(Box::new(f));
        self
    }

    /// Width and height of the popup as a percentage of the screen.
    pub const fn size(&mut self, width: u16, height: u16) -> &mut Self {
        self.size = Some((width, height));
        self
    }

    /// Hide the Close control. The popup can then only be left through a
    /// committing entry.
    pub const fn hide_close(&mut self) -> &mut Self {
        self.show_close = false;
        self
    }

    pub fn action(&mut self, f: impl FnMut(&mut Ui, &mut S) + 'static) -> &mut Self {
        self.entries.push(Entry::Action(Box::new(f)));
        self
    }

    pub fn query(&mut self, f: impl FnMut(&mut Ui, &mut S) -> bool + 'static) -> &mut Self {
        self.entries.push(Entry::Query(Box::new(f)));
        self
    }

    /// Entry bound to an owned text buffer that the callback may edit.
    pub fn labeled(
        &mut self,
        text: impl Into<String>,
        f: impl FnMut(&mut Ui, &mut S, &mut String) + 'static,
    ) -> &mut Self {
        self.entries.push(Entry::Labeled {
            f: Box::new(f),
            text: text.into(),
        });
        self
    }

    /// Entry that closes the popup once `predicate` reports true, running
    /// `completion` exactly once on that frame.
    pub fn committing(
        &mut self,
        label: impl Into<String>,
        predicate: impl FnMut(&mut Ui, &mut S, &str) -> bool + 'static,
        completion: impl FnOnce(&mut S, &mut Popup<S>) + 'static,
    ) -> &mut Self {
        self.entries.push(Entry::Committing {
            label: label.into(),
            predicate: Box::new(predicate),
            completion: Some(Box::new(completion)),
        });
        self
    }

    pub fn extended(
        &mut self,
        label: impl Into<String>,
        text: impl Into<String>,
        flag: bool,
        f: impl FnMut(&mut Ui, &mut S, &str, &str, bool) + 'static,
    ) -> &mut Self {
        self.entries.push(Entry::Extended {
            f: Box::new(f),
            label: label.into(),
            text: text.into(),
            flag,
        });
        self
    }

    /// Shorthand for a plain text entry.
    pub fn text(&mut self, text: impl Into<String>) -> &mut Self {
        self.labeled(text, |ui, _, text| ui.text(text))
    }

    /// Shorthand for a centered text entry.
    pub fn text_centered(&mut self, text: impl Into<String>) -> &mut Self {
        self.labeled(text, |ui, _, text| ui.text_centered(text))
    }

    /// Shorthand for a styled text entry, see [`crate::fonts::TextStyle`].
    pub fn text_styled(
        &mut self,
        text: impl Into<String>,
        style: impl Into<String>,
        centered: bool,
    ) -> &mut Self {
        self.extended(text, style, centered, |ui, _, text, style, centered| {
            ui.text_styled(text, style, centered);
        })
    }

    /// Shorthand for a button that commits when pressed.
    pub fn button(
        &mut self,
        label: impl Into<String>,
        completion: impl FnOnce(&mut S, &mut Popup<S>) + 'static,
    ) -> &mut Self {
        self.committing(label, |ui, _, label| ui.button(label), completion)
    }

    pub fn same_line(&mut self) -> &mut Self {
        self.action(|ui, _| ui.same_line())
    }

    pub fn spacing(&mut self) -> &mut Self {
        self.action(|ui, _| ui.spacing())
    }
}

/// What the app draws around the replayed content for one frame.
pub struct ModalFrame {
    pub title: String,
    pub size: Option<(u16, u16)>,
    pub lines: Vec<Line<'static>>,
}

impl ModalFrame {
    /// Draw the dimmed backdrop, the centered block and the content.
    pub fn render(self, frame: &mut Frame, area: Rect, theme: &Theme, default_width: u16) {
        let backdrop = Block::default().style(
            Style::default()
                .bg(theme.crust())
                .add_modifier(Modifier::DIM),
        );
        frame.render_widget(backdrop, area);

        let (width, height) = self.size.unwrap_or_else(|| {
            let rows = u16::try_from(self.lines.len()).unwrap_or(u16::MAX);
            (default_width, rows.saturating_add(2))
        });
        let popup_area = if self.size.is_some() {
            area.centered(Constraint::Percentage(width), Constraint::Percentage(height))
        } else {
            area.centered(Constraint::Percentage(width), Constraint::Length(height))
        };

        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title(format!(" {} ", self.title))
            .title_style(
                Style::default()
                    .fg(theme.mauve())
                    .add_modifier(Modifier::BOLD),
            )
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(theme.lavender()))
            .style(Style::default().bg(theme.base()));

        let paragraph = Paragraph::new(self.lines)
            .block(block)
            .wrap(Wrap { trim: false });
        frame.render_widget(paragraph, popup_area);
    }
}

/// Owner of the single active popup session.
pub struct Popup<S> {
    session: Option<Session<S>>,
    generation: u64,
    rendered_generation: u64,
}

impl<S> Default for Popup<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> Popup<S> {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            session: None,
            generation: 0,
            rendered_generation: 0,
        }
    }

    /// Start a new session, discarding whatever was open before.
    pub fn open(&mut self, title: impl Into<String>) -> &mut Session<S> {
        self.generation += 1;
        self.session.insert(Session::new(title.into()))
    }

    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.session.is_some()
    }

    /// Title of the open popup, if any.
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.title.as_str())
    }

    /// Drop the open session without running its close handler.
    pub fn close(&mut self) {
        self.session = None;
    }

    /// Replay the open session against `ui` and return what to draw.
    ///
    /// Returns `None` when no session is open. Entries registered on the
    /// session run in insertion order. A committing entry that fires closes
    /// the session after the current replay finishes. If a completion or the
    /// close handler opens another popup, that popup replaces this one.
    pub fn render_frame(&mut self, ui: &mut Ui, state: &mut S) -> Option<ModalFrame> {
        let mut session = self.session.take()?;
        let generation = self.generation;
        if self.rendered_generation != generation {
            ui.reset_focus();
            self.rendered_generation = generation;
        }

        let title = session.title.clone();
        let size = session.size;

        for entry in &mut session.entries {
            match entry {
                Entry::Action(f) => f(ui, state),
                Entry::Query(f) => {
                    let _ = f(ui, state);
                }
                Entry::Labeled { f, text } => f(ui, state, text),
                Entry::Committing {
                    label,
                    predicate,
                    completion,
                } => {
                    if predicate(ui, state, label) {
                        if let Some(completion) = completion.take() {
                            completion(state, self);
                        }
                        session.closed = true;
                    }
                }
                Entry::Extended {
                    f,
                    label,
                    text,
                    flag,
                } => f(ui, state, label, text, *flag),
            }
        }

        let replaced = self.generation != generation;
        if !session.closed && !replaced && session.show_close {
            ui.separator();
            let clicked = ui.button("Close");
            if clicked || ui.close_requested() {
                session.closed = true;
                if let Some(on_close) = session.on_close.take() {
                    on_close(state, self);
                }
            }
        }

        let lines = ui.finish();
        if !session.closed && self.generation == generation {
            self.session = Some(session);
        }

        Some(ModalFrame { title, size, lines })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::UiInput;

    #[derive(Default)]
    struct Recorder {
        calls: Vec<String>,
        deleted: usize,
        closed: usize,
    }

    fn render(popup: &mut Popup<Recorder>, ui: &mut Ui, state: &mut Recorder) -> bool {
        ui.begin_frame(Theme::default());
        popup.render_frame(ui, state).is_some()
    }

    #[test]
    fn test_replays_in_insertion_order() {
        let mut popup = Popup::new();
        let mut ui = Ui::new(Theme::default());
        let mut state = Recorder::default();

        popup
            .open("Order")
            .action(|_, s: &mut Recorder| s.calls.push("action".into()))
            .query(|_, s| {
                s.calls.push("query".into());
                true
            })
            .labeled("text", |_, s, t| s.calls.push(format!("labeled:{t}")))
            .committing(
                "Yes",
                |_, s, l| {
                    s.calls.push(format!("committing:{l}"));
                    false
                },
                |_, _| {},
            )
            .extended("l", "t", true, |_, s, l, t, f| {
                s.calls.push(format!("extended:{l}:{t}:{f}"));
            });

        render(&mut popup, &mut ui, &mut state);
        assert_eq!(
            state.calls,
            vec![
                "action",
                "query",
                "labeled:text",
                "committing:Yes",
                "extended:l:t:true"
            ]
        );
        assert!(popup.is_open());
    }

    #[test]
    fn test_query_result_is_ignored() {
        let mut popup = Popup::new();
        let mut ui = Ui::new(Theme::default());
        let mut state = Recorder::default();

        popup.open("Query").query(|_, _: &mut Recorder| true);
        render(&mut popup, &mut ui, &mut state);
        assert!(popup.is_open());
    }

    #[test]
    fn test_open_discards_previous_entries() {
        let mut popup = Popup::new();
        let mut ui = Ui::new(Theme::default());
        let mut state = Recorder::default();

        popup
            .open("First")
            .action(|_, s: &mut Recorder| s.calls.push("first".into()));
        popup
            .open("Second")
            .action(|_, s: &mut Recorder| s.calls.push("second".into()));

        render(&mut popup, &mut ui, &mut state);
        assert_eq!(state.calls, vec!["second"]);
        assert_eq!(popup.title(), Some("Second"));
    }

    #[test]
    fn test_false_predicate_keeps_session() {
        let mut popup = Popup::new();
        let mut ui = Ui::new(Theme::default());
        let mut state = Recorder::default();

        popup.open("Pending").committing(
            "Yes",
            |_, _: &mut Recorder, _| false,
            |s, _| s.deleted += 1,
        );

        for _ in 0..3 {
            render(&mut popup, &mut ui, &mut state);
        }
        assert_eq!(state.deleted, 0);
        assert!(popup.is_open());
    }

    #[test]
    fn test_confirm_commits_once() {
        let mut popup = Popup::new();
        let mut ui = Ui::new(Theme::default());
        let mut state = Recorder::default();

        popup
            .open("Confirm")
            .labeled("Are you sure?", |ui, _: &mut Recorder, text| {
                ui.text_centered(text);
            })
            .committing("Yes", |_, _, _| true, |s, _| s.deleted += 1)
            .action(|_, s| s.calls.push("after".into()));

        assert!(render(&mut popup, &mut ui, &mut state));
        assert_eq!(state.deleted, 1);
        assert_eq!(state.calls, vec!["after"]);
        assert!(!popup.is_open());

        assert!(!render(&mut popup, &mut ui, &mut state));
        assert_eq!(state.deleted, 1);
        assert_eq!(state.calls.len(), 1);
    }

    #[test]
    fn test_only_firing_commit_completes() {
        let mut popup = Popup::new();
        let mut ui = Ui::new(Theme::default());
        let mut state = Recorder::default();

        popup
            .open("Choose")
            .committing("Yes", |_, _: &mut Recorder, _| false, |s, _| {
                s.calls.push("yes".into());
            })
            .committing("No", |_, _, _| true, |s, _| s.calls.push("no".into()));

        render(&mut popup, &mut ui, &mut state);
        assert_eq!(state.calls, vec!["no"]);
        assert!(!popup.is_open());
    }

    #[test]
    fn test_close_runs_handler_once() {
        let mut popup = Popup::new();
        let mut ui = Ui::new(Theme::default());
        let mut state = Recorder::default();

        popup
            .open("Info")
            .on_close(|s: &mut Recorder, _| s.closed += 1)
            .text("Hello");

        ui.feed(UiInput::Cancel);
        render(&mut popup, &mut ui, &mut state);
        assert_eq!(state.closed, 1);
        assert!(!popup.is_open());

        render(&mut popup, &mut ui, &mut state);
        assert_eq!(state.closed, 1);
    }

    #[test]
    fn test_close_button_without_handler() {
        let mut popup = Popup::new();
        let mut ui = Ui::new(Theme::default());
        let mut state = Recorder::default();

        popup.open("Info").text("Hello");
        // Close is the only focusable widget, so it holds focus.
        render(&mut popup, &mut ui, &mut state);
        ui.feed(UiInput::Activate);
        render(&mut popup, &mut ui, &mut state);
        assert!(!popup.is_open());
    }

    #[test]
    fn test_hidden_close_ignores_escape() {
        let mut popup = Popup::new();
        let mut ui = Ui::new(Theme::default());
        let mut state = Recorder::default();

        popup.open("Busy").hide_close().text("Working");
        ui.feed(UiInput::Cancel);
        render(&mut popup, &mut ui, &mut state);
        assert!(popup.is_open());
    }

    #[test]
    fn test_completion_can_open_followup() {
        let mut popup = Popup::new();
        let mut ui = Ui::new(Theme::default());
        let mut state = Recorder::default();

        popup.open("Save").committing(
            "Save",
            |_, _: &mut Recorder, _| true,
            |_, popup| {
                popup
                    .open("Retry")
                    .action(|_, s: &mut Recorder| s.calls.push("retry".into()));
            },
        );

        render(&mut popup, &mut ui, &mut state);
        assert_eq!(popup.title(), Some("Retry"));

        render(&mut popup, &mut ui, &mut state);
        assert_eq!(state.calls, vec!["retry"]);
    }

    #[test]
    fn test_close_handler_can_reopen() {
        let mut popup = Popup::new();
        let mut ui = Ui::new(Theme::default());
        let mut state = Recorder::default();

        popup
            .open("Invalid")
            .on_close(|_: &mut Recorder, popup| {
                popup.open("Login");
            })
            .text("Invalid username and/or password!");

        ui.feed(UiInput::Cancel);
        render(&mut popup, &mut ui, &mut state);
        assert_eq!(popup.title(), Some("Login"));
    }

    #[test]
    fn test_labeled_text_is_mutable() {
        let mut popup = Popup::new();
        let mut ui = Ui::new(Theme::default());
        let mut state = Recorder::default();

        popup
            .open("Notes")
            .labeled(String::new(), |_, s: &mut Recorder, text| {
                text.push('x');
                s.calls.push(text.clone());
            });

        render(&mut popup, &mut ui, &mut state);
        render(&mut popup, &mut ui, &mut state);
        assert_eq!(state.calls, vec!["x", "xx"]);
    }

    #[test]
    fn test_render_without_session() {
        let mut popup: Popup<Recorder> = Popup::new();
        let mut ui = Ui::new(Theme::default());
        let mut state = Recorder::default();
        assert!(!render(&mut popup, &mut ui, &mut state));
    }
}
