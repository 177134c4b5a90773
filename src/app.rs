mod state;

pub use state::{AppState, Tab};

use std::sync::Arc;
use std::time::Instant;

use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tracing::{debug, info};

use crate::commands::{self, CommandEnv};
use crate::config::GlobalAction;
use crate::dialog::{self, AppPopup};
use crate::tui::{Event, Tui};
use crate::ui::{Component, StatusBar, StatusInfo, Toast, ToastType, Ui, UiInput};
use crate::view::{BomsView, CategoriesView, ItemsView, LoggerView, View};
use crate::{fonts, version};

const FRAME_RATE: f64 = 30.0;
const TICK_RATE: f64 = 4.0;

/// Messages sent back to the app by async commands.
#[derive(Debug, Clone)]
pub enum AppMessage {
    ShowToast {
        message: String,
        toast_type: ToastType,
    },
    CommandFailed {
        name: String,
        error: String,
    },
}

struct Views {
    items: ItemsView,
    categories: CategoriesView,
    boms: BomsView,
    logger: LoggerView,
}

impl Views {
    fn get_mut(&mut self, tab: Tab) -> &mut dyn View {
        match tab {
            Tab::Items => &mut self.items,
            Tab::Categories => &mut self.categories,
            Tab::Boms => &mut self.boms,
            Tab::Logger => &mut self.logger,
        }
    }
}

pub struct App {
    state: AppState,
    popup: AppPopup,
    ui: Ui,
    status_bar: StatusBar,
    views: Views,
    env: CommandEnv,
    message_rx: UnboundedReceiver<AppMessage>,
    /// Modal width in percent. Font size changes apply on the next start.
    modal_width: u16,
}

impl App {
    pub fn new(state: AppState) -> Self {
        let (message_tx, message_rx) = mpsc::unbounded_channel();
        let resolver = &state.resolver;
        let views = Views {
            items: ItemsView::new(Arc::clone(resolver)),
            categories: CategoriesView::new(Arc::clone(resolver)),
            boms: BomsView::new(Arc::clone(resolver)),
            logger: LoggerView::new(Arc::clone(resolver)),
        };

        let mut app = Self {
            ui: Ui::new(state.theme),
            status_bar: StatusBar::new(Arc::clone(resolver)),
            modal_width: fonts::modal_width_percent(state.config.font_size),
            views,
            env: CommandEnv::new(message_tx),
            message_rx,
            popup: AppPopup::new(),
            state,
        };
        app.open_startup_popup();
        app
    }

    /// Changelog first. The login prompt for a given user follows it, or
    /// opens straight away when there is nothing new.
    fn open_startup_popup(&mut self) {
        let releases = version::changes_since(self.state.config.last_seen_version.as_deref());
        if !releases.is_empty() {
            dialog::whats_new(&mut self.popup, &releases);
        } else if let Some(user) = self.state.login_hint.clone() {
            dialog::login(&mut self.popup, user);
        }
    }

    pub async fn run(&mut self) -> color_eyre::Result<()> {
        let mut tui = Tui::new(FRAME_RATE, TICK_RATE)?;
        tui.enter()?;
        info!("Started with store {}", self.state.store_label);

        while !self.state.should_quit {
            let Some(event) = tui.next_event().await else {
                break;
            };
            match event {
                Event::Quit => self.state.should_quit = true,
                Event::Suspend => {
                    tui.suspend()?;
                    tui.enter()?;
                    tui.clear()?;
                }
                Event::Tick => self.on_tick(),
                Event::Render => self.render(&mut tui)?,
                Event::Resize(width, height) => {
                    tui.resize(Rect::new(0, 0, width, height))?;
                    self.render(&mut tui)?;
                }
                Event::Key(key) => self.handle_key(key)?,
                Event::Paste(text) => self.handle_paste(&text),
                Event::Error(error) => tracing::warn!("Terminal event error: {error}"),
                Event::Init => {}
            }
            self.drain_messages();
            self.spawn_commands();
        }

        tui.exit()?;
        info!("Exiting");
        Ok(())
    }

    fn on_tick(&mut self) {
        self.state.inventory.refresh_all(Instant::now());
        self.state.toasts.on_tick();
    }

    fn handle_key(&mut self, key: KeyEvent) -> color_eyre::Result<()> {
        if self.popup.is_open() {
            if let Some(input) = UiInput::from_key(&key) {
                self.ui.feed(input);
            }
            return Ok(());
        }

        let view = self.views.get_mut(self.state.tab);
        view.sync(&self.state);
        if view
            .handle_key(key, &mut self.state, &mut self.popup)?
            .is_consumed()
        {
            return Ok(());
        }
        self.handle_global_key(key);
        Ok(())
    }

    fn handle_global_key(&mut self, key: KeyEvent) {
        let resolver = Arc::clone(&self.state.resolver);
        let matches = |action| resolver.matches_global(&key, action);
        let state = &mut self.state;
        let popup = &mut self.popup;

        if matches(GlobalAction::Quit) {
            state.should_quit = true;
        } else if matches(GlobalAction::Menu) {
            dialog::main_menu(popup, state);
        } else if matches(GlobalAction::Help) {
            dialog::user_guide(popup, state);
        } else if matches(GlobalAction::Options) {
            dialog::options(popup, state);
        } else if matches(GlobalAction::Login) {
            if state.inventory.session().username().is_some() {
                state.inventory.logout();
                state.toast(Toast::info("Logged out"));
            } else {
                dialog::login(popup, state.login_hint.clone().unwrap_or_default());
            }
        } else if matches(GlobalAction::Reload) {
            if state.inventory.reload() {
                state.toast(Toast::success("Inventory reloaded"));
            } else {
                state.toast(Toast::error("Could not reach the store"));
            }
        } else if matches(GlobalAction::NextTab) {
            state.tab = state.tab.next();
        } else if matches(GlobalAction::PrevTab) {
            state.tab = state.tab.prev();
        }
    }

    /// Pasted text goes to the focused popup field, one character per frame.
    fn handle_paste(&mut self, text: &str) {
        if self.popup.is_open() {
            for c in text.chars().filter(|c| !c.is_control()) {
                self.ui.feed(UiInput::Char(c));
            }
        }
    }

    fn drain_messages(&mut self) {
        while let Ok(message) = self.message_rx.try_recv() {
            debug!("Handling message: {message:?}");
            let toast = match message {
                AppMessage::ShowToast {
                    message,
                    toast_type,
                } => Toast::new(message, toast_type),
                AppMessage::CommandFailed { name, error } => {
                    Toast::error(format!("{name} failed: {error}"))
                }
            };
            self.state.toast(toast);
        }
    }

    fn spawn_commands(&mut self) {
        for command in self.state.take_commands() {
            tokio::spawn(commands::run(command, self.env.clone()));
        }
    }

    fn render(&mut self, tui: &mut Tui) -> color_eyre::Result<()> {
        tui.draw(|frame| self.draw(frame))?;
        Ok(())
    }

    /// Replay the popup first so its callbacks see this frame's input, then
    /// draw the screen underneath it.
    fn draw(&mut self, frame: &mut Frame) {
        self.ui.begin_frame(self.state.theme);
        let modal = self.popup.render_frame(&mut self.ui, &mut self.state);

        let area = frame.area();
        let [tabs_area, body_area, status_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(4),
        ])
        .areas(area);

        self.render_tabs(frame, tabs_area);

        let state = &self.state;
        let view = self.views.get_mut(state.tab);
        view.sync(state);
        view.render(frame, body_area, state);
        let info = StatusInfo {
            user: state.inventory.session().username(),
            can_write: state.inventory.can_write(),
            store: &state.store_label,
            store_error: state.inventory.has_error(),
        };
        self.status_bar
            .render(frame, status_area, &state.theme, &info, &view.keybindings());

        let theme = self.state.theme;
        if let Some(modal) = modal {
            modal.render(frame, area, &theme, self.modal_width);
        }
        self.state.toasts.render(frame, area, &theme);
    }

    fn render_tabs(&self, frame: &mut Frame, area: Rect) {
        let theme = &self.state.theme;
        let mut spans = vec![Span::styled(
            " partsbin ",
            Style::default().fg(theme.mauve()).add_modifier(Modifier::BOLD),
        )];
        for tab in Tab::ALL {
            let style = if tab == self.state.tab {
                Style::default()
                    .fg(theme.lavender())
                    .bg(theme.surface0())
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(theme.subtext0())
            };
            spans.push(Span::raw(" "));
            spans.push(Span::styled(format!(" {} ", tab.title()), style));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyModifiers};
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn app(user: Option<&str>) -> App {
        let mut state = AppState::demo(user);
        state.config.last_seen_version = Some(version::CURRENT.to_string());
        App::new(state)
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn draw(app: &mut App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 30)).unwrap();
        terminal.draw(|frame| app.draw(frame)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(ratatui::buffer::Cell::symbol)
            .collect()
    }

    #[test]
    fn test_whats_new_on_first_start() {
        let app = App::new(AppState::demo(None));
        assert_eq!(app.popup.title(), Some("What's new"));
    }

    #[test]
    fn test_login_follows_whats_new() {
        let mut state = AppState::demo(None);
        state.login_hint = Some("bob".into());
        let mut app = App::new(state);
        assert_eq!(app.popup.title(), Some("What's new"));

        draw(&mut app);
        app.handle_key(key(KeyCode::Esc)).unwrap();
        draw(&mut app);

        assert_eq!(app.popup.title(), Some("Login"));
        assert_eq!(
            app.state.config.last_seen_version.as_deref(),
            Some(version::CURRENT.to_string().as_str())
        );
    }

    #[test]
    fn test_login_prompt_for_given_user() {
        let mut state = AppState::demo(None);
        state.config.last_seen_version = Some(version::CURRENT.to_string());
        state.login_hint = Some("bob".into());
        let app = App::new(state);
        assert_eq!(app.popup.title(), Some("Login"));
    }

    #[test]
    fn test_tab_switching() {
        let mut app = app(None);
        app.handle_key(key(KeyCode::Tab)).unwrap();
        assert_eq!(app.state.tab, Tab::Categories);
        app.handle_key(key(KeyCode::BackTab)).unwrap();
        app.handle_key(key(KeyCode::BackTab)).unwrap();
        assert_eq!(app.state.tab, Tab::Logger);
    }

    #[test]
    fn test_keys_go_to_popup_while_open() {
        let mut app = app(None);
        app.handle_key(key(KeyCode::Char('m'))).unwrap();
        assert_eq!(app.popup.title(), Some("Menu"));
        draw(&mut app);

        app.handle_key(key(KeyCode::Char('q'))).unwrap();
        assert!(!app.state.should_quit);

        app.handle_key(key(KeyCode::Esc)).unwrap();
        draw(&mut app);
        draw(&mut app);
        assert!(!app.popup.is_open());
    }

    #[test]
    fn test_login_key_toggles_session() {
        let mut app = app(Some("admin"));
        app.handle_key(key(KeyCode::Char('L'))).unwrap();
        assert!(app.state.inventory.session().username().is_none());
        assert!(!app.popup.is_open());

        app.handle_key(key(KeyCode::Char('L'))).unwrap();
        assert_eq!(app.popup.title(), Some("Login"));
    }

    #[test]
    fn test_unhandled_view_key_falls_through_to_quit() {
        let mut app = app(None);
        app.handle_key(key(KeyCode::Char('q'))).unwrap();
        assert!(app.state.should_quit);
    }

    #[test]
    fn test_draws_tabs_items_and_status() {
        let mut app = app(Some("admin"));
        let screen = draw(&mut app);
        assert!(screen.contains("partsbin"));
        assert!(screen.contains("BOMs"));
        assert!(screen.contains("R0"));
        assert!(screen.contains("admin (write)"));
    }

    struct Failing;

    #[async_trait::async_trait]
    impl commands::Command for Failing {
        fn name(&self) -> String {
            "Failing".to_string()
        }

        async fn execute(self: Box<Self>, _env: CommandEnv) -> color_eyre::Result<()> {
            Err(color_eyre::eyre::eyre!("no clipboard"))
        }
    }

    #[tokio::test]
    async fn test_command_messages_become_toasts() {
        let mut app = app(None);
        app.env.show_toast("Copied", ToastType::Success);
        app.drain_messages();
        assert_eq!(app.state.toasts.len(), 1);

        commands::run(Box::new(Failing), app.env.clone()).await;
        app.drain_messages();
        assert_eq!(app.state.toasts.len(), 2);
    }
}
