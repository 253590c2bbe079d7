//! Shared log pane
//!
//! All tabs write into one scrolling pane. The buffer keeps only the most
//! recent lines.

use std::collections::VecDeque;

use gpui::{Context, Div, ScrollHandle, SharedString, div, prelude::*, px};

use crate::ui::Theme;

/// Lines kept in the pane before the oldest are dropped
pub const MAX_LOG_LINES: usize = 2000;

/// Bounded buffer of rendered log lines
#[derive(Debug, Clone)]
pub struct LogBuffer {
    lines: VecDeque<String>,
    cap: usize,
}

impl Default for LogBuffer {
    fn default() -> Self {
        Self::with_capacity(MAX_LOG_LINES)
    }
}

impl LogBuffer {
    pub fn with_capacity(cap: usize) -> Self {
        Self {
            lines: VecDeque::with_capacity(cap.min(256)),
            cap: cap.max(1),
        }
    }

    pub fn push(&mut self, line: impl Into<String>) {
        if self.lines.len() == self.cap {
            self.lines.pop_front();
        }
        self.lines.push_back(line.into());
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(String::as_str)
    }
}

/// Render the log pane with its Clear button
pub fn render_log_pane<V: 'static>(
    buffer: &LogBuffer,
    scroll_handle: &ScrollHandle,
    theme: &Theme,
    cx: &mut Context<V>,
    on_clear: impl Fn(&mut V) + 'static,
) -> Div {
    let mut body = div().w_full().flex().flex_col().font_family("Menlo");
    if buffer.is_empty() {
        body = body.child(
            div()
                .text_xs()
                .text_color(theme.text_muted)
                .child("Tool output appears here"),
        );
    }
    for line in buffer.lines() {
        body = body.child(
            div()
                .text_xs()
                .text_color(theme.log_text)
                .child(SharedString::from(line.to_string())),
        );
    }

    let hover = theme.bg_card_hover;

    div()
        .flex_1()
        .min_h(px(120.))
        .flex()
        .flex_col()
        .gap_1()
        .child(
            div()
                .flex()
                .items_center()
                .justify_between()
                .text_sm()
                .text_color(theme.text_muted)
                .child("Log")
                .child(
                    div()
                        .id(SharedString::from("clear-log"))
                        .px_2()
                        .rounded_md()
                        .text_xs()
                        .cursor_pointer()
                        .hover(move |s| s.bg(hover))
                        .on_click(cx.listener(move |view, _event, _window, cx| {
                            on_clear(view);
                            cx.notify();
                        }))
                        .child("Clear"),
                ),
        )
        .child(
            div()
                .id("log-scroll")
                .flex_1()
                .w_full()
                .overflow_scroll()
                .track_scroll(scroll_handle)
                .p_2()
                .bg(theme.log_bg)
                .border_1()
                .border_color(theme.border)
                .rounded_md()
                .child(body),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_keeps_order() {
        let mut buffer = LogBuffer::default();
        buffer.push("one");
        buffer.push(String::from("two"));
        assert_eq!(buffer.lines().collect::<Vec<_>>(), vec!["one", "two"]);
    }

    #[test]
    fn test_buffer_drops_oldest_at_cap() {
        let mut buffer = LogBuffer::with_capacity(3);
        for i in 0..5 {
            buffer.push(format!("line {}", i));
        }
        assert_eq!(buffer.lines().count(), 3);
        assert_eq!(
            buffer.lines().collect::<Vec<_>>(),
            vec!["line 2", "line 3", "line 4"]
        );
    }

    #[test]
    fn test_default_cap() {
        let mut buffer = LogBuffer::default();
        for i in 0..(MAX_LOG_LINES + 10) {
            buffer.push(i.to_string());
        }
        assert_eq!(buffer.lines().count(), MAX_LOG_LINES);
        assert_eq!(buffer.lines().next(), Some("10"));
    }

    #[test]
    fn test_clear() {
        let mut buffer = LogBuffer::default();
        buffer.push("x");
        buffer.clear();
        assert!(buffer.is_empty());
    }
}
