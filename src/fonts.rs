//! Named text styles that can be pushed and popped while rendering.
//!
//! A terminal cannot swap typefaces, so a "font" here is a ratatui [`Style`]
//! preset. Presets are layered: the effective style is every pushed preset
//! patched on top of the one below it.

use ratatui::style::{Color, Modifier, Style};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FontError {
    #[error("font '{0}' does not exist")]
    Inexistant(String),
    #[error("no font to pop")]
    NothingToPop,
}

/// Font sizes offered in the options dialog.
///
/// Terminal cells have a fixed size, so the value only scales modal widths.
pub const FONT_SIZES: &[&str] = &["Small", "Normal", "Large", "Extra Large"];

/// Index into [`FONT_SIZES`] used when the config has none.
pub const DEFAULT_FONT_SIZE: usize = 1;

/// Width percentage for modals at the given font size index.
#[must_use]
pub fn modal_width_percent(font_size: usize) -> u16 {
    match font_size {
        0 => 40,
        2 => 60,
        3 => 70,
        _ => 50,
    }
}

#[derive(Debug, Clone)]
struct Font {
    name: &'static str,
    style: Style,
}

#[derive(Debug, Clone)]
pub struct FontStack {
    fonts: Vec<Font>,
    stack: Vec<usize>,
}

impl Default for FontStack {
    fn default() -> Self {
        Self::new()
    }
}

impl FontStack {
    #[must_use]
    pub fn new() -> Self {
        let fonts = vec![
            Font {
                name: "Default",
                style: Style::default(),
            },
            Font {
                name: "Bold",
                style: Style::default().add_modifier(Modifier::BOLD),
            },
            Font {
                name: "Italic",
                style: Style::default().add_modifier(Modifier::ITALIC),
            },
            Font {
                name: "Underline",
                style: Style::default().add_modifier(Modifier::UNDERLINED),
            },
            Font {
                name: "Dim",
                style: Style::default().add_modifier(Modifier::DIM),
            },
            Font {
                name: "Title",
                style: Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            },
        ];
        Self {
            fonts,
            stack: Vec::new(),
        }
    }

    pub fn push(&mut self, name: &str) -> Result<(), FontError> {
        let index = self
            .fonts
            .iter()
            .position(|f| f.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| FontError::Inexistant(name.to_string()))?;
        self.stack.push(index);
        Ok(())
    }

    pub fn pop(&mut self) -> Result<(), FontError> {
        self.stack.pop().map(|_| ()).ok_or(FontError::NothingToPop)
    }

    #[must_use]
    pub fn current(&self) -> Style {
        self.stack
            .iter()
            .fold(Style::default(), |acc, &i| acc.patch(self.fonts[i].style))
    }

    pub fn clear(&mut self) {
        self.stack.clear();
    }
}

/// A parsed `"Font"` or `"Font/color"` style string.
///
/// The color is a packed `u32` with red in the low byte, followed by green,
/// blue and alpha, so `4278190335` is opaque red.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextStyle {
    pub font: String,
    pub color: Option<Color>,
}

impl TextStyle {
    #[must_use]
    pub fn parse(spec: &str) -> Self {
        match spec.split_once('/') {
            Some((font, color)) => Self {
                font: font.trim().to_string(),
                color: color.trim().parse::<u32>().ok().map(packed_to_color),
            },
            None => Self {
                font: spec.trim().to_string(),
                color: None,
            },
        }
    }
}

#[allow(clippy::cast_possible_truncation)]
const fn packed_to_color(packed: u32) -> Color {
    Color::Rgb(
        (packed & 0xFF) as u8,
        ((packed >> 8) & 0xFF) as u8,
        ((packed >> 16) & 0xFF) as u8,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_unknown_font() {
        let mut fonts = FontStack::new();
        assert_eq!(
            fonts.push("Comic"),
            Err(FontError::Inexistant("Comic".to_string()))
        );
        assert_eq!(fonts.pop(), Err(FontError::NothingToPop));
    }

    #[test]
    fn test_pop_empty() {
        let mut fonts = FontStack::new();
        assert_eq!(fonts.pop(), Err(FontError::NothingToPop));
    }

    #[test]
    fn test_styles_layer() {
        let mut fonts = FontStack::new();
        fonts.push("bold").unwrap();
        fonts.push("Italic").unwrap();
        let style = fonts.current();
        assert!(style.add_modifier.contains(Modifier::BOLD));
        assert!(style.add_modifier.contains(Modifier::ITALIC));

        fonts.pop().unwrap();
        assert!(!fonts.current().add_modifier.contains(Modifier::ITALIC));
    }

    #[test]
    fn test_parse_style() {
        let style = TextStyle::parse("Bold/4278190335");
        assert_eq!(style.font, "Bold");
        assert_eq!(style.color, Some(Color::Rgb(255, 0, 0)));

        let style = TextStyle::parse("Italic");
        assert_eq!(style.font, "Italic");
        assert_eq!(style.color, None);
    }

    #[test]
    fn test_modal_width() {
        assert_eq!(modal_width_percent(DEFAULT_FONT_SIZE), 50);
        assert!(modal_width_percent(3) > modal_width_percent(0));
    }
}
