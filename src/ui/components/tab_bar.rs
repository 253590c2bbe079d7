//! Tab bar across the top of the main window

use std::rc::Rc;

use gpui::{Context, Div, SharedString, div, prelude::*};

use crate::core::OperationKind;
use crate::ui::Theme;

/// Render one tab per operation
///
/// Tabs with a job in flight get a bullet after the label.
pub fn render_tab_bar<V: 'static>(
    active: OperationKind,
    is_busy: impl Fn(OperationKind) -> bool,
    theme: &Theme,
    cx: &mut Context<V>,
    on_select: impl Fn(&mut V, OperationKind) + 'static,
) -> Div {
    let on_select = Rc::new(on_select);
    let mut bar = div()
        .w_full()
        .flex()
        .gap_1()
        .px_4()
        .pt_3()
        .border_b_1()
        .border_color(theme.border);

    for kind in OperationKind::ALL {
        let selected = kind == active;
        let label = if is_busy(kind) {
            format!("{} \u{2022}", kind.label())
        } else {
            kind.label().to_string()
        };
        let hover = theme.bg_card_hover;
        let on_select = on_select.clone();

        bar = bar.child(
            div()
                .id(SharedString::from(format!("tab-{}", kind.index())))
                .px_3()
                .py_2()
                .text_sm()
                .rounded_t_md()
                .cursor_pointer()
                .when(selected, |el| {
                    el.bg(theme.bg_card)
                        .text_color(theme.text)
                        .border_b_2()
                        .border_color(theme.accent)
                })
                .when(!selected, |el| {
                    el.text_color(theme.text_muted).hover(move |s| s.bg(hover))
                })
                .on_click(cx.listener(move |view, _event, _window, cx| {
                    on_select(view, kind);
                    cx.notify();
                }))
                .child(SharedString::from(label)),
        );
    }

    bar
}
