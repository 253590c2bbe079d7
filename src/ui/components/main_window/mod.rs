//! MainWindow component - the root view of the application
//!
//! Contains:
//! - Tab bar (one tab per operation)
//! - The active tab's form with its action button
//! - Shared log pane
//! - Status bar

mod forms;
mod input;
mod jobs;
mod render;
#[cfg(test)]
mod tests;

use std::sync::mpsc;

use gpui::{Context, FocusHandle, ScrollHandle};

use crate::conversion::{JobEvent, JobExecutor, start_executor};
use crate::core::OperationKind;
use crate::ui::components::log_pane::LogBuffer;

pub use forms::{FieldId, Forms};

/// The main window view
pub struct MainWindow {
    /// Tab currently shown
    pub(crate) active_tab: OperationKind,
    /// Raw text of every field on every tab
    pub(crate) forms: Forms,
    /// Field receiving key presses
    pub(crate) focused_field: Option<FieldId>,
    /// Shared log pane contents
    pub(crate) log: LogBuffer,
    /// Set when new lines arrived, so the pane scrolls to the end
    pub(crate) log_dirty: bool,
    /// Handle for the log pane's scroll state
    pub(crate) scroll_handle: ScrollHandle,
    /// Submits jobs; one channel per tab
    pub(crate) executor: JobExecutor,
    /// Events from running jobs (std::sync::mpsc for easy polling)
    pub(crate) events_rx: mpsc::Receiver<JobEvent>,
    /// Focus handle for key input and actions (None in tests)
    pub(crate) focus_handle: Option<FocusHandle>,
    /// Whether we've subscribed to appearance changes
    pub(crate) appearance_subscription_set: bool,
    /// Whether we need to grab initial focus
    pub(crate) needs_initial_focus: bool,
    /// Error dialog to show on the next render (title, message)
    pub(crate) pending_error_message: Option<(String, String)>,
}

impl MainWindow {
    pub fn new(cx: &mut Context<Self>) -> Self {
        let (executor, events_rx) = start_executor();
        Self {
            active_tab: OperationKind::Convert,
            forms: Forms::new(),
            focused_field: Some(FieldId::ConvertInput),
            log: LogBuffer::default(),
            log_dirty: false,
            scroll_handle: ScrollHandle::new(),
            executor,
            events_rx,
            focus_handle: Some(cx.focus_handle()),
            appearance_subscription_set: false,
            needs_initial_focus: true,
            pending_error_message: None,
        }
    }

    /// Create a MainWindow for testing (without GPUI context)
    #[cfg(test)]
    pub fn new_for_test() -> Self {
        let (executor, events_rx) = start_executor();
        Self {
            active_tab: OperationKind::Convert,
            forms: Forms::new(),
            focused_field: Some(FieldId::ConvertInput),
            log: LogBuffer::default(),
            log_dirty: false,
            scroll_handle: ScrollHandle::new(),
            executor,
            events_rx,
            focus_handle: None,
            appearance_subscription_set: false,
            needs_initial_focus: false,
            pending_error_message: None,
        }
    }

    /// Switch tabs, moving focus to the new tab's path field
    pub fn select_tab(&mut self, kind: OperationKind) {
        if self.active_tab != kind {
            self.active_tab = kind;
            self.focused_field = Some(Forms::input_field(kind));
        }
    }

    /// Whether the tab's channel has a job in flight
    pub fn is_busy(&self, kind: OperationKind) -> bool {
        self.executor.is_busy(kind)
    }
}
