//! UI building blocks for the TUI.
//!
//! - [`Component`] - Reusable, interactive widgets driven by key events
//! - [`Popup`] - The single modal popup, composed from callbacks and replayed every frame
//! - [`Ui`] - Immediate-mode context the popup callbacks draw into
//! - [`Handled`] - Result of handling an input event

mod component;
mod immediate;
pub mod popup;
mod status_bar;
mod table;
mod toast;

pub use component::Component;
pub use immediate::{Ui, UiInput};
pub use popup::{ModalFrame, Popup, Session};
pub use status_bar::{Keybinding, StatusBar, StatusInfo};
pub use table::{Table, TableEvent, TableRow};
pub use toast::{Toast, ToastManager, ToastType};

/// Result type alias for UI operations.
pub type Result<T> = std::result::Result<T, color_eyre::Report>;

/// Result of handling an input event.
///
/// - `Ignored` - The handler didn't recognize or handle this input
/// - `Consumed` - The input was handled but produced no event
/// - `Event(E)` - The input was handled and produced an event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Handled<E> {
    /// Input was not handled, parent should process it.
    Ignored,
    /// Input was consumed but produced no event.
    Consumed,
    /// Input was consumed and produced an event.
    Event(E),
}

impl<E> Handled<E> {
    /// Returns true if the input was consumed (not ignored).
    pub const fn is_consumed(&self) -> bool {
        !matches!(self, Self::Ignored)
    }

    /// Maps the event type using the provided function.
    pub fn map<F, U>(self, f: F) -> Handled<U>
    where
        F: FnOnce(E) -> U,
    {
        match self {
            Self::Ignored => Handled::Ignored,
            Self::Consumed => Handled::Consumed,
            Self::Event(e) => Handled::Event(f(e)),
        }
    }
}

impl<E> From<E> for Handled<E> {
    fn from(event: E) -> Self {
        Self::Event(event)
    }
}
