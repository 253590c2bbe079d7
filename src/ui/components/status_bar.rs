//! Action button and bottom status bar

use gpui::{Context, IntoElement, SharedString, div, prelude::*};

use crate::ui::Theme;

/// Properties for a tab's action button
pub struct ActionButtonProps {
    pub id: &'static str,
    pub label: &'static str,
    pub enabled: bool,
    /// Short explanation shown under the button
    pub hint: &'static str,
}

/// Render an action button with its hint
///
/// While disabled the button shows "Working..." and ignores clicks.
pub fn render_action_button<V: 'static>(
    props: ActionButtonProps,
    theme: &Theme,
    cx: &mut Context<V>,
    on_button_click: impl Fn(&mut V, &mut gpui::Window, &mut Context<V>) + 'static,
) -> impl IntoElement {
    let ActionButtonProps {
        id,
        label,
        enabled,
        hint,
    } = props;
    let hover = theme.success_hover;

    div()
        .flex()
        .flex_col()
        .gap_1()
        .child(
            div()
                .id(SharedString::from(id))
                .px_4()
                .py_2()
                .flex()
                .justify_center()
                .bg(if enabled { theme.success } else { theme.disabled })
                .text_color(gpui::white())
                .text_sm()
                .font_weight(gpui::FontWeight::SEMIBOLD)
                .rounded_md()
                .when(enabled, |el| {
                    el.cursor_pointer().hover(move |s| s.bg(hover))
                })
                .on_click(cx.listener(move |view, _event, window, cx| {
                    if enabled {
                        on_button_click(view, window, cx);
                    }
                }))
                .child(if enabled { label } else { "Working..." }),
        )
        .child(div().text_xs().text_color(theme.text_muted).child(hint))
}

/// Text for the status bar: which tabs have a job running
pub fn running_summary(running: &[&'static str]) -> String {
    match running.len() {
        0 => "Idle".to_string(),
        _ => format!("Running: {}", running.join(", ")),
    }
}

/// Render the bottom status bar
pub fn render_status_bar(
    running: &[&'static str],
    output_dir: &str,
    theme: &Theme,
) -> impl IntoElement {
    div()
        .h_8()
        .px_4()
        .flex()
        .items_center()
        .justify_between()
        .border_t_1()
        .border_color(theme.border)
        .text_xs()
        .text_color(theme.text_muted)
        .child(running_summary(running))
        .child(SharedString::from(format!("Output: {}", output_dir)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_running_summary() {
        assert_eq!(running_summary(&[]), "Idle");
        assert_eq!(running_summary(&["Convert"]), "Running: Convert");
        assert_eq!(
            running_summary(&["Convert", "Equalizer"]),
            "Running: Convert, Equalizer"
        );
    }
}
