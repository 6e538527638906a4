//! Single-line text field used by the form demos.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use featuretour_core::Theme;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Widget};

/// A labelled single-line input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextField {
    label: &'static str,
    placeholder: &'static str,
    value: String,
    max_length: Option<usize>,
}

impl TextField {
    /// Creates an empty field
    pub fn new(label: &'static str) -> Self {
        TextField {
            label,
            ..Default::default()
        }
    }

    /// Text shown while the field is empty
    #[must_use]
    pub fn with_placeholder(mut self, placeholder: &'static str) -> Self {
        self.placeholder = placeholder;
        self
    }

    /// Caps the number of characters
    #[must_use]
    pub fn with_max_length(mut self, max: usize) -> Self {
        self.max_length = Some(max);
        self
    }

    /// Current value
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Field label
    pub fn label(&self) -> &'static str {
        self.label
    }

    /// Empties the field
    pub fn clear(&mut self) {
        self.value.clear();
    }

    /// Applies an editing key. Returns true when the key was consumed.
    pub fn handle_key(&mut self, key: &KeyEvent) -> bool {
        if key.kind != KeyEventKind::Press {
            return false;
        }
        match key.code {
            KeyCode::Char(c) if !key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) => {
                if self
                    .max_length
                    .is_none_or(|max| self.value.chars().count() < max)
                {
                    self.value.push(c);
                }
                true
            }
            KeyCode::Backspace => {
                self.value.pop();
                true
            }
            _ => false,
        }
    }

    /// Widget drawing this field
    pub fn widget<'a>(&'a self, theme: &'a Theme, focused: bool, enabled: bool) -> FieldView<'a> {
        FieldView {
            field: self,
            theme,
            focused,
            enabled,
        }
    }
}

/// Renders a [`TextField`] inside a titled border.
pub struct FieldView<'a> {
    field: &'a TextField,
    theme: &'a Theme,
    focused: bool,
    enabled: bool,
}

impl Widget for FieldView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border = if self.focused && self.enabled {
            Style::default().fg(self.theme.colors.accent)
        } else {
            self.theme.muted()
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border)
            .title(self.field.label);

        let (text, style) = if self.field.value.is_empty() {
            (self.field.placeholder, self.theme.muted())
        } else if self.enabled {
            (self.field.value.as_str(), self.theme.base())
        } else {
            (self.field.value.as_str(), self.theme.muted())
        };
        let mut spans = vec![Span::styled(text, style)];
        if self.focused && self.enabled {
            spans.push(Span::styled(
                "\u{2588}",
                Style::default().fg(self.theme.colors.accent),
            ));
        }

        Paragraph::new(Line::from(spans)).block(block).render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_typing_and_backspace() {
        let mut field = TextField::new("Name");
        for c in "abc".chars() {
            assert!(field.handle_key(&press(KeyCode::Char(c))));
        }
        assert_eq!(field.value(), "abc");
        field.handle_key(&press(KeyCode::Backspace));
        assert_eq!(field.value(), "ab");
        field.clear();
        assert_eq!(field.value(), "");
    }

    #[test]
    fn test_shift_is_typed_control_is_not() {
        let mut field = TextField::new("Name");
        assert!(field.handle_key(&KeyEvent::new(KeyCode::Char('A'), KeyModifiers::SHIFT)));
        assert!(!field.handle_key(&KeyEvent::new(KeyCode::Char('a'), KeyModifiers::CONTROL)));
        assert!(!field.handle_key(&press(KeyCode::Enter)));
        assert_eq!(field.value(), "A");
    }

    #[test]
    fn test_max_length() {
        let mut field = TextField::new("Code").with_max_length(2);
        for c in "xyz".chars() {
            field.handle_key(&press(KeyCode::Char(c)));
        }
        assert_eq!(field.value(), "xy");
    }

    #[test]
    fn test_render_placeholder_and_value() {
        let theme = Theme::dark();
        let area = Rect::new(0, 0, 20, 3);

        let field = TextField::new("Email").with_placeholder("you@host");
        let mut buf = Buffer::empty(area);
        field.widget(&theme, false, true).render(area, &mut buf);
        let row: String = (1..19).map(|x| buf[(x, 1)].symbol().to_string()).collect();
        assert!(row.starts_with("you@host"));
        assert_eq!(buf[(1, 1)].fg, theme.colors.muted);

        let mut field = field;
        field.handle_key(&press(KeyCode::Char('a')));
        let mut buf = Buffer::empty(area);
        field.widget(&theme, true, true).render(area, &mut buf);
        assert_eq!(buf[(1, 1)].symbol(), "a");
        assert_eq!(buf[(2, 1)].symbol(), "\u{2588}");
    }
}
