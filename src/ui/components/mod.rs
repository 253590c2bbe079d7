//! Reusable UI components

mod about;
mod log_pane;
mod main_window;
mod status_bar;
mod tab_bar;
mod text_field;

pub use about::AboutBox;
pub use main_window::MainWindow;
