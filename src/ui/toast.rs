use std::collections::VecDeque;
use std::time::{Duration, Instant};

use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Paragraph};

use super::Component;
use crate::Theme;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastType {
    Success,
    Info,
    Error,
}

pub struct Toast {
    message: String,
    toast_type: ToastType,
    created_at: Instant,
    duration: Duration,
}

impl Toast {
    pub fn new(message: impl Into<String>, toast_type: ToastType) -> Self {
        Self {
            message: message.into(),
            toast_type,
            created_at: Instant::now(),
            duration: Duration::from_secs(3),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(message, ToastType::Success)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(message, ToastType::Info)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            duration: Duration::from_secs(5),
            ..Self::new(message, ToastType::Error)
        }
    }

    fn is_expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.created_at) >= self.duration
    }
}

/// Short-lived notifications stacked in the bottom-right corner.
pub struct ToastManager {
    toasts: VecDeque<Toast>,
    max_visible: usize,
}

impl Default for ToastManager {
    fn default() -> Self {
        Self {
            toasts: VecDeque::new(),
            max_visible: 3,
        }
    }
}

impl ToastManager {
    pub fn show(&mut self, toast: Toast) {
        self.toasts.push_back(toast);
        while self.toasts.len() > self.max_visible {
            self.toasts.pop_front();
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.toasts.len()
    }

    fn expire(&mut self, now: Instant) {
        self.toasts.retain(|t| !t.is_expired(now));
    }
}

impl Component for ToastManager {
    type Output = ();

    fn on_tick(&mut self) {
        self.expire(Instant::now());
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let toast_height = 3u16;
        let toast_width = 50u16.min(area.width.saturating_sub(4));

        for (i, toast) in self.toasts.iter().rev().enumerate() {
            let offset = u16::try_from(i).unwrap_or(u16::MAX).saturating_mul(toast_height + 1);
            let Some(bottom) = area.height.checked_sub(toast_height + offset + 1) else {
                break;
            };
            let toast_area = Rect::new(
                area.x + area.width.saturating_sub(toast_width + 2),
                area.y + bottom,
                toast_width,
                toast_height,
            );

            let (color, icon) = match toast.toast_type {
                ToastType::Success => (theme.green(), "✓"),
                ToastType::Info => (theme.blue(), "ℹ"),
                ToastType::Error => (theme.red(), "✗"),
            };

            frame.render_widget(Clear, toast_area);
            let block = Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(color))
                .style(Style::default().bg(theme.surface0()));
            let paragraph = Paragraph::new(format!("{icon} {}", toast.message))
                .style(Style::default().fg(theme.text()).add_modifier(Modifier::BOLD))
                .alignment(Alignment::Center)
                .block(block);
            frame.render_widget(paragraph, toast_area);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keeps_latest_toasts() {
        let mut toasts = ToastManager::default();
        for i in 0..5 {
            toasts.show(Toast::info(format!("toast {i}")));
        }
        assert_eq!(toasts.len(), 3);
        assert_eq!(toasts.toasts[0].message, "toast 2");
    }

    #[test]
    fn test_expired_toasts_are_dropped() {
        let mut toasts = ToastManager::default();
        toasts.show(Toast::success("Saved"));
        toasts.show(Toast::error("Store unavailable"));

        toasts.expire(Instant::now() + Duration::from_secs(4));
        assert_eq!(toasts.len(), 1);
        toasts.expire(Instant::now() + Duration::from_secs(6));
        assert_eq!(toasts.len(), 0);
    }
}
