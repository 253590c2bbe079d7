//! VideoCodex Convertor - GPUI Application
//!
//! A desktop front-end for ffmpeg: convert containers, compress video to a
//! target size and re-equalize audio, with the tool output streamed into a
//! log pane.

mod actions;
mod conversion;
mod core;
mod logging;
#[cfg(test)]
mod test_fixtures;
mod ui;

use gpui::{
    App, Application, Bounds, KeyBinding, Menu, MenuItem, WindowBounds, WindowHandle,
    WindowOptions, prelude::*, px, size,
};

use actions::{About, OpenLogDir, OpenOutputDir, Quit};
use core::AppConfig;
use ui::components::{AboutBox, MainWindow};

const APP_TITLE: &str = "VideoCodex Convertor";

fn build_menus() -> Vec<Menu> {
    vec![
        Menu {
            name: APP_TITLE.into(),
            items: vec![
                MenuItem::action("About VideoCodex Convertor", About),
                MenuItem::separator(),
                MenuItem::action("Quit", Quit),
            ],
        },
        Menu {
            name: "File".into(),
            items: vec![
                MenuItem::action("Open Output Folder", OpenOutputDir),
                MenuItem::action("Open Log Folder", OpenLogDir),
            ],
        },
    ]
}

/// Whether the main window is no longer among the open windows
fn main_window_closed<Id: PartialEq>(open: &[Id], main: &Id) -> bool {
    !open.contains(main)
}

fn main() {
    logging::init_logging();

    let config = match conversion::resolve_config() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Failed to prepare output directory: {}", e);
            AppConfig::rooted_at(&conversion::get_root_dir())
        }
    };

    Application::new().run(move |cx: &mut App| {
        cx.set_global(config);

        cx.on_action(|_: &Quit, cx| cx.quit());
        cx.on_action(|_: &About, cx| {
            AboutBox::open(cx);
        });
        cx.on_action(|_: &OpenOutputDir, cx| {
            let output_dir = cx.global::<AppConfig>().output_dir.clone();
            if let Err(e) = conversion::open_directory(&output_dir) {
                log::warn!("{}", e);
            }
        });
        cx.on_action(|_: &OpenLogDir, _cx| {
            if let Err(e) = logging::open_log_directory() {
                log::warn!("{}", e);
            }
        });

        cx.bind_keys([KeyBinding::new("cmd-q", Quit, None)]);
        cx.set_menus(build_menus());

        let bounds = Bounds::centered(None, size(px(780.), px(520.)), cx);

        let window_handle: WindowHandle<MainWindow> = cx
            .open_window(
                WindowOptions {
                    window_bounds: Some(WindowBounds::Windowed(bounds)),
                    window_min_size: Some(size(px(640.), px(420.))),
                    titlebar: Some(gpui::TitlebarOptions {
                        title: Some(APP_TITLE.into()),
                        appears_transparent: false,
                        traffic_light_position: None,
                    }),
                    ..Default::default()
                },
                |_window, cx| {
                    cx.new(|cx| {
                        let main_window = MainWindow::new(cx);
                        main_window.start_polling(cx);
                        main_window
                    })
                },
            )
            .unwrap();

        // Quit when the main window closes, not when About does
        let main_id = window_handle.window_id();
        cx.on_window_closed(move |cx| {
            let open = cx.windows().iter().map(|w| w.window_id()).collect::<Vec<_>>();
            if main_window_closed(&open, &main_id) {
                cx.quit();
            }
        })
        .detach();

        cx.activate(true);
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closing_about_keeps_app_running() {
        // Main window 1 still open after About (2) closed
        assert!(!main_window_closed(&[1], &1));
    }

    #[test]
    fn test_closing_main_window_quits() {
        assert!(main_window_closed(&[2], &1));
        assert!(main_window_closed::<u64>(&[], &1));
    }
}
