//! UI module - GPUI views and components
//!
//! This module contains all UI-related code:
//! - `components/` - Main window, tab bar, text fields, log pane
//! - `theme` - OS-aware light and dark mode color schemes

pub mod components;
pub mod theme;

pub use theme::Theme;
