//! About window component

use gpui::{
    Bounds, Context, Render, SharedString, Window, WindowBounds, WindowHandle, WindowOptions, div,
    prelude::*, px, size,
};

use crate::core::AppConfig;
use crate::ui::Theme;

/// The About window content
pub struct AboutBox {
    ffmpeg: String,
    output_dir: String,
    log_file: Option<String>,
}

impl AboutBox {
    pub fn new(cx: &mut Context<Self>) -> Self {
        let config = cx.global::<AppConfig>();
        Self {
            ffmpeg: config.ffmpeg.display().to_string(),
            output_dir: config.output_dir.display().to_string(),
            log_file: crate::logging::get_log_file_path().map(|p| p.display().to_string()),
        }
    }

    /// Open the About window
    pub fn open(cx: &mut gpui::App) -> WindowHandle<Self> {
        let bounds = Bounds::centered(None, size(px(420.), px(260.)), cx);

        cx.open_window(
            WindowOptions {
                window_bounds: Some(WindowBounds::Windowed(bounds)),
                window_min_size: Some(size(px(420.), px(260.))),
                titlebar: Some(gpui::TitlebarOptions {
                    title: Some("About VideoCodex Convertor".into()),
                    appears_transparent: false,
                    traffic_light_position: None,
                }),
                ..Default::default()
            },
            |_window, cx| cx.new(AboutBox::new),
        )
        .unwrap()
    }
}

impl Render for AboutBox {
    fn render(&mut self, window: &mut Window, _cx: &mut Context<Self>) -> impl IntoElement {
        let version = env!("CARGO_PKG_VERSION");
        let theme = Theme::from_appearance(window.appearance());

        div()
            .flex()
            .flex_col()
            .justify_center()
            .size_full()
            .bg(theme.bg)
            .p_6()
            .gap_1()
            .child(
                div()
                    .text_xl()
                    .font_weight(gpui::FontWeight::BOLD)
                    .text_color(theme.text)
                    .child("VideoCodex Convertor"),
            )
            .child(
                div()
                    .text_sm()
                    .text_color(theme.text_muted)
                    .child(SharedString::from(format!("Version {}", version))),
            )
            .child(div().h(px(8.)))
            .child(
                div()
                    .text_sm()
                    .text_color(theme.text_muted)
                    .child("Convert, compress and re-equalize media files with FFmpeg"),
            )
            .child(div().h(px(8.)))
            .child(
                div()
                    .text_xs()
                    .text_color(theme.text_muted)
                    .child(SharedString::from(format!("ffmpeg: {}", self.ffmpeg))),
            )
            .child(
                div()
                    .text_xs()
                    .text_color(theme.text_muted)
                    .child(SharedString::from(format!("Saves to: {}", self.output_dir))),
            )
            .when_some(self.log_file.clone(), |el, log_file| {
                el.child(
                    div()
                        .text_xs()
                        .text_color(theme.text_muted)
                        .child(SharedString::from(format!("Log: {}", log_file))),
                )
            })
            .child(div().h(px(8.)))
            .child(
                div()
                    .text_xs()
                    .text_color(theme.text_muted)
                    .child("Built with Rust and GPUI. Powered by FFmpeg (ffmpeg.org)"),
            )
    }
}
