//! Rendering implementation for MainWindow

use gpui::{
    AnyElement, Context, ExternalPaths, IntoElement, KeyDownEvent, PromptLevel, Render,
    SharedString, Window, div, prelude::*, px, rgb,
};

use crate::core::{AppConfig, OperationKind};
use crate::ui::Theme;
use crate::ui::components::log_pane::render_log_pane;
use crate::ui::components::status_bar::{
    ActionButtonProps, render_action_button, render_status_bar,
};
use crate::ui::components::tab_bar::render_tab_bar;
use crate::ui::components::text_field::{render_small_button, render_text_field};

use super::{FieldId, Forms, MainWindow};

/// Width of the label column in form rows
const LABEL_WIDTH: f32 = 210.;

impl MainWindow {
    /// Start polling job events (called once the view exists)
    pub fn start_polling(&self, cx: &mut Context<Self>) {
        Self::start_event_polling(cx);
    }

    fn render_label(label: &'static str, theme: &Theme) -> impl IntoElement {
        div()
            .w(px(LABEL_WIDTH))
            .flex_none()
            .text_sm()
            .text_color(theme.text_muted)
            .child(label)
    }

    fn render_field(
        &self,
        id: FieldId,
        placeholder: &'static str,
        theme: &Theme,
        cx: &mut Context<Self>,
    ) -> impl IntoElement {
        render_text_field(
            id.element_id(),
            self.forms.field(id),
            self.focused_field == Some(id),
            placeholder,
            theme,
            cx,
            move |view: &mut Self| view.focus_field(id),
        )
    }

    /// File path field with its Browse button
    fn render_path_row(
        &self,
        kind: OperationKind,
        label: &'static str,
        theme: &Theme,
        cx: &mut Context<Self>,
    ) -> impl IntoElement {
        let id = Forms::input_field(kind);
        let hover = theme.bg_card_hover;

        div()
            .flex()
            .items_center()
            .gap_2()
            .child(Self::render_label(label, theme))
            .child(self.render_field(id, "Choose or drop a file", theme, cx))
            .child(
                div()
                    .id(SharedString::from(format!("browse-{}", kind.index())))
                    .px_3()
                    .h(px(28.))
                    .flex()
                    .items_center()
                    .bg(theme.bg_card)
                    .border_1()
                    .border_color(theme.border)
                    .rounded_md()
                    .text_sm()
                    .text_color(theme.text)
                    .cursor_pointer()
                    .hover(move |s| s.bg(hover))
                    .on_click(cx.listener(move |this, _event, _window, cx| {
                        this.browse(kind, cx);
                    }))
                    .child("Browse..."),
            )
    }

    /// Labelled field, with −/+ buttons when the field has a stepper
    fn render_field_row(
        &self,
        id: FieldId,
        label: &'static str,
        theme: &Theme,
        cx: &mut Context<Self>,
    ) -> impl IntoElement {
        let mut row = div()
            .flex()
            .items_center()
            .gap_2()
            .child(Self::render_label(label, theme))
            .child(div().w(px(110.)).flex().child(self.render_field(id, "", theme, cx)));

        if id.stepper().is_some() {
            for (up, symbol) in [(false, "\u{2212}"), (true, "+")] {
                let button_id = SharedString::from(format!(
                    "{}-{}",
                    id.element_id(),
                    if up { "up" } else { "down" }
                ));
                row = row.child(render_small_button(button_id, symbol, theme).on_click(
                    cx.listener(move |this, _event, _window, cx| {
                        this.forms.step(id, up);
                        cx.notify();
                    }),
                ));
            }
        }

        row
    }

    fn render_submit(
        &self,
        kind: OperationKind,
        label: &'static str,
        hint: &'static str,
        theme: &Theme,
        cx: &mut Context<Self>,
    ) -> impl IntoElement {
        render_action_button(
            ActionButtonProps {
                id: match kind {
                    OperationKind::Convert => "convert-button",
                    OperationKind::CompressPrecise => "precise-button",
                    OperationKind::CompressFast => "fast-button",
                    OperationKind::AudioEdit => "eq-button",
                },
                label,
                enabled: !self.is_busy(kind),
                hint,
            },
            theme,
            cx,
            move |this: &mut Self, _window, cx| {
                let config = cx.global::<AppConfig>().clone();
                this.submit(kind, &config);
                cx.notify();
            },
        )
    }

    fn render_convert_tab(&self, theme: &Theme, cx: &mut Context<Self>) -> AnyElement {
        let kind = OperationKind::Convert;
        div()
            .flex()
            .flex_col()
            .gap_3()
            .child(self.render_path_row(kind, "File:", theme, cx))
            .child(self.render_field_row(
                FieldId::ConvertExtension,
                "Output extension (mp4, png, webp...):",
                theme,
                cx,
            ))
            .child(self.render_submit(
                kind,
                "Convert",
                "Copies the streams into the new container, re-encodes if that fails",
                theme,
                cx,
            ))
            .into_any_element()
    }

    fn render_compress_tab(
        &self,
        kind: OperationKind,
        theme: &Theme,
        cx: &mut Context<Self>,
    ) -> AnyElement {
        let (size, audio, hint) = match kind {
            OperationKind::CompressPrecise => (
                FieldId::PreciseSize,
                FieldId::PreciseAudio,
                "Two-pass encoding is more accurate but slower",
            ),
            _ => (
                FieldId::FastSize,
                FieldId::FastAudio,
                "One-pass encoding is fast but less accurate",
            ),
        };

        div()
            .flex()
            .flex_col()
            .gap_3()
            .child(self.render_path_row(kind, "Video file:", theme, cx))
            .child(self.render_field_row(size, "Target size (MB):", theme, cx))
            .child(self.render_field_row(audio, "Audio bitrate (kbps):", theme, cx))
            .child(self.render_submit(kind, "Compress", hint, theme, cx))
            .into_any_element()
    }

    fn render_equalizer_tab(&self, theme: &Theme, cx: &mut Context<Self>) -> AnyElement {
        let kind = OperationKind::AudioEdit;
        div()
            .flex()
            .flex_col()
            .gap_2()
            .child(self.render_path_row(kind, "Audio file:", theme, cx))
            .child(self.render_field_row(
                FieldId::EqExtension,
                "Output extension (mp3, wav, flac...):",
                theme,
                cx,
            ))
            .child(self.render_field_row(FieldId::EqSpeed, "Speed (0.25 - 4.0):", theme, cx))
            .child(self.render_field_row(FieldId::EqBass, "Bass (dB, -20..+20):", theme, cx))
            .child(self.render_field_row(FieldId::EqTreble, "Treble (dB, -20..+20):", theme, cx))
            .child(self.render_field_row(FieldId::EqGain, "Gain (dB, -20..+20):", theme, cx))
            .child(self.render_field_row(
                FieldId::EqBitrate,
                "Audio bitrate (kbps, 32-320):",
                theme,
                cx,
            ))
            .child(self.render_submit(
                kind,
                "Apply and save",
                "Creates a new audio file in the saves folder",
                theme,
                cx,
            ))
            .into_any_element()
    }

    /// Show any pending error dialog
    fn show_pending_error_dialog(&mut self, window: &mut Window, cx: &mut Context<Self>) {
        if let Some((title, message)) = self.pending_error_message.take() {
            let _future = window.prompt(PromptLevel::Warning, &title, Some(&message), &["OK"], cx);
        }
    }
}

impl Render for MainWindow {
    fn render(&mut self, window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        if !self.appearance_subscription_set {
            self.appearance_subscription_set = true;
            cx.observe_window_appearance(window, |_this, _window, cx| {
                cx.notify();
            })
            .detach();
        }

        if self.needs_initial_focus {
            self.needs_initial_focus = false;
            if let Some(ref focus_handle) = self.focus_handle {
                focus_handle.focus(window);
            }
        }

        self.show_pending_error_dialog(window, cx);

        let theme = Theme::from_appearance(window.appearance());

        let running: Vec<&'static str> = OperationKind::ALL
            .iter()
            .filter(|kind| self.is_busy(**kind))
            .map(|kind| kind.label())
            .collect();
        let output_dir = cx.global::<AppConfig>().output_dir.display().to_string();

        let executor = self.executor.clone();
        let tab_bar = render_tab_bar(
            self.active_tab,
            move |kind| executor.is_busy(kind),
            &theme,
            cx,
            |this: &mut Self, kind| this.select_tab(kind),
        );

        let form = match self.active_tab {
            OperationKind::Convert => self.render_convert_tab(&theme, cx),
            OperationKind::CompressPrecise | OperationKind::CompressFast => {
                self.render_compress_tab(self.active_tab, &theme, cx)
            }
            OperationKind::AudioEdit => self.render_equalizer_tab(&theme, cx),
        };

        let log_pane = render_log_pane(
            &self.log,
            &self.scroll_handle,
            &theme,
            cx,
            |this: &mut Self| this.clear_log(),
        );

        let on_external_drop = cx.listener(|this, paths: &ExternalPaths, _window, cx| {
            if this.handle_drop(paths.paths()) {
                cx.notify();
            }
        });
        let on_key_down = cx.listener(|this, event: &KeyDownEvent, window, cx| {
            this.on_key_down(event, window, cx);
        });

        let mut container = div()
            .key_context("MainWindow")
            .size_full()
            .flex()
            .flex_col()
            .bg(theme.bg);

        if let Some(ref focus_handle) = self.focus_handle {
            container = container.track_focus(focus_handle);
        }

        container
            .on_key_down(on_key_down)
            .on_drop(on_external_drop)
            .drag_over::<ExternalPaths>(|style, _, _, _| style.bg(rgb(0x3d3d3d)))
            .child(tab_bar)
            .child(div().px_6().py_4().bg(theme.bg).child(form))
            .child(div().flex_1().flex().flex_col().px_6().pb_3().child(log_pane))
            .child(render_status_bar(&running, &output_dir, &theme))
    }
}
