//! Single-line text field state
//!
//! Fields don't own a focus handle: the main window owns focus and routes
//! key presses to whichever field is selected. This keeps the editing rules
//! plain data that can be tested without a window.

use gpui::{Context, Div, IntoElement, SharedString, div, prelude::*, px};

use crate::ui::Theme;

/// Which characters a field accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Any printable text (paths, extensions)
    Text,
    /// Unsigned decimal number
    Decimal,
    /// Unsigned whole number
    Integer,
    /// Whole number with an optional leading minus
    SignedInteger,
}

impl FieldKind {
    /// Whether `c` may be inserted into `current`
    fn accepts(&self, current: &str, c: char) -> bool {
        if c.is_control() {
            return false;
        }
        match self {
            FieldKind::Text => true,
            FieldKind::Decimal => c.is_ascii_digit() || (c == '.' && !current.contains('.')),
            FieldKind::Integer => c.is_ascii_digit(),
            FieldKind::SignedInteger => c.is_ascii_digit() || (c == '-' && current.is_empty()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TextField {
    text: String,
    kind: FieldKind,
}

impl TextField {
    pub fn new(kind: FieldKind, initial: &str) -> Self {
        Self {
            text: initial.to_string(),
            kind,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replace the whole value (browse, drop), bypassing the character filter
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    /// Type characters at the end; rejected characters are dropped silently
    ///
    /// Returns true if anything was inserted.
    pub fn insert(&mut self, typed: &str) -> bool {
        let mut changed = false;
        for c in typed.chars() {
            if self.kind.accepts(&self.text, c) {
                self.text.push(c);
                changed = true;
            }
        }
        changed
    }

    pub fn backspace(&mut self) -> bool {
        self.text.pop().is_some()
    }

    /// Nudge a numeric value by `delta`, clamped to `range`
    ///
    /// An unparsable value is treated as the nearest in-range value to zero
    /// before stepping. Text fields are left alone.
    pub fn step(&mut self, delta: f64, range: (f64, f64)) {
        if self.kind == FieldKind::Text {
            return;
        }
        let current = self
            .text
            .trim()
            .parse::<f64>()
            .unwrap_or_else(|_| 0.0_f64.clamp(range.0, range.1));
        let next = (current + delta).clamp(range.0, range.1);

        self.text = match self.kind {
            FieldKind::Decimal => {
                // Round away float noise from repeated 0.05 steps
                let rounded = (next * 100.0).round() / 100.0;
                format!("{:.2}", rounded)
            }
            _ => format!("{}", next.round() as i64),
        };
    }
}

/// Render a field as a clickable box
///
/// `focused` draws the accent border and the caret.
pub fn render_text_field<V: 'static>(
    id: &'static str,
    field: &TextField,
    focused: bool,
    placeholder: &'static str,
    theme: &Theme,
    cx: &mut Context<V>,
    on_focus: impl Fn(&mut V) + 'static,
) -> impl IntoElement {
    let is_empty = field.text().is_empty();
    let shown: SharedString = if is_empty {
        placeholder.into()
    } else {
        field.text().to_string().into()
    };

    div()
        .id(SharedString::from(id))
        .flex_1()
        .min_w(px(48.))
        .h(px(28.))
        .px_2()
        .flex()
        .items_center()
        .overflow_hidden()
        .bg(theme.bg_card)
        .border_1()
        .border_color(if focused { theme.accent } else { theme.border })
        .rounded_md()
        .cursor_text()
        .on_click(cx.listener(move |view, _event, _window, cx| {
            on_focus(view);
            cx.notify();
        }))
        .child(
            div()
                .text_sm()
                .text_color(if is_empty { theme.text_muted } else { theme.text })
                .when(is_empty, |el| el.italic())
                .child(shown),
        )
        .when(focused, |el| {
            el.child(div().w(px(2.)).h(px(16.)).bg(theme.accent).ml_px())
        })
}

/// Small square button used for the −/+ steppers and similar
pub fn render_small_button(
    id: SharedString,
    label: &'static str,
    theme: &Theme,
) -> gpui::Stateful<Div> {
    let hover = theme.bg_card_hover;
    div()
        .id(id)
        .w(px(28.))
        .h(px(28.))
        .flex()
        .items_center()
        .justify_center()
        .bg(theme.bg_card)
        .border_1()
        .border_color(theme.border)
        .rounded_md()
        .text_sm()
        .text_color(theme.text)
        .cursor_pointer()
        .hover(move |s| s.bg(hover))
        .child(label)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_accepts_anything_printable() {
        let mut field = TextField::new(FieldKind::Text, "");
        assert!(field.insert("/tmp/My Video.mov"));
        assert_eq!(field.text(), "/tmp/My Video.mov");
        assert!(!field.insert("\u{7f}"));
    }

    #[test]
    fn test_decimal_allows_one_point() {
        let mut field = TextField::new(FieldKind::Decimal, "");
        field.insert("1.2.5a");
        assert_eq!(field.text(), "1.25");
    }

    #[test]
    fn test_integer_rejects_sign_and_point() {
        let mut field = TextField::new(FieldKind::Integer, "");
        field.insert("-12.8k");
        assert_eq!(field.text(), "128");
    }

    #[test]
    fn test_signed_integer_minus_only_first() {
        let mut field = TextField::new(FieldKind::SignedInteger, "");
        field.insert("-5-");
        assert_eq!(field.text(), "-5");

        let mut field = TextField::new(FieldKind::SignedInteger, "3");
        field.insert("-");
        assert_eq!(field.text(), "3");
    }

    #[test]
    fn test_backspace() {
        let mut field = TextField::new(FieldKind::Text, "mp4");
        assert!(field.backspace());
        assert_eq!(field.text(), "mp");
        field.set_text("");
        assert!(!field.backspace());
    }

    #[test]
    fn test_step_integer_clamps() {
        let mut field = TextField::new(FieldKind::SignedInteger, "19");
        field.step(1.0, (-20.0, 20.0));
        assert_eq!(field.text(), "20");
        field.step(1.0, (-20.0, 20.0));
        assert_eq!(field.text(), "20");

        let mut field = TextField::new(FieldKind::SignedInteger, "-");
        field.step(-1.0, (-20.0, 20.0));
        assert_eq!(field.text(), "-1");
    }

    #[test]
    fn test_step_decimal_speed() {
        let mut field = TextField::new(FieldKind::Decimal, "1.0");
        for _ in 0..3 {
            field.step(0.05, (0.25, 4.0));
        }
        assert_eq!(field.text(), "1.15");

        let mut field = TextField::new(FieldKind::Decimal, "0.27");
        field.step(-0.05, (0.25, 4.0));
        assert_eq!(field.text(), "0.25");
    }

    #[test]
    fn test_step_ignores_text_fields() {
        let mut field = TextField::new(FieldKind::Text, "mp3");
        field.step(1.0, (0.0, 10.0));
        assert_eq!(field.text(), "mp3");
    }
}
