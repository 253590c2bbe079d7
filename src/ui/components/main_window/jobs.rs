//! Job submission and event polling for MainWindow

use std::time::Duration;

use gpui::{AsyncApp, Context, Timer, WeakEntity};

use crate::conversion::JobEvent;
use crate::core::{AppConfig, OperationKind};

use super::MainWindow;

/// How often the UI drains job events
const POLL_INTERVAL: Duration = Duration::from_millis(50);

impl MainWindow {
    /// Validate a tab's fields and start its job
    ///
    /// Validation and busy-channel errors are queued as an error dialog;
    /// nothing is started in that case. Returns true if a job was submitted.
    pub fn submit(&mut self, kind: OperationKind, config: &AppConfig) -> bool {
        let request = match self.forms.build_request(kind) {
            Ok(request) => request,
            Err(message) => {
                log::info!("{} rejected: {}", kind.label(), message);
                self.pending_error_message = Some(("Error".to_string(), message));
                return false;
            }
        };

        match self.executor.submit(request, config) {
            Ok(job) => {
                log::debug!("Submitted {} job {}", kind.label(), job);
                true
            }
            Err(message) => {
                self.pending_error_message = Some(("Error".to_string(), message));
                false
            }
        }
    }

    pub(crate) fn push_log(&mut self, line: impl Into<String>) {
        self.log.push(line);
        self.log_dirty = true;
    }

    pub fn clear_log(&mut self) {
        self.log.clear();
    }

    /// Drain pending job events into the log pane
    ///
    /// Returns true if anything arrived.
    pub fn poll_job_events(&mut self) -> bool {
        let events: Vec<JobEvent> = self.events_rx.try_iter().collect();
        let had_events = !events.is_empty();

        for event in events {
            match event {
                JobEvent::Started { job, kind } => {
                    self.push_log(format!("=== {} ({}) ===", kind.label(), job.short()));
                }
                JobEvent::Log(line) => self.push_log(line.to_string()),
                JobEvent::Finished(outcome) => {
                    log::debug!(
                        "{} job {} finished, ok={}",
                        outcome.kind.label(),
                        outcome.job.short(),
                        outcome.result.is_ok()
                    );
                }
            }
        }

        had_events
    }

    /// Start the loop that polls job events while the window lives
    pub(super) fn start_event_polling(cx: &mut Context<Self>) {
        cx.spawn(|this: WeakEntity<Self>, cx: &mut AsyncApp| {
            let mut async_cx = cx.clone();
            async move {
                loop {
                    let cx_for_after_await = async_cx.clone();

                    Timer::after(POLL_INTERVAL).await;

                    let alive = this
                        .update(&mut async_cx, |this, cx| {
                            let had_events = this.poll_job_events();
                            if had_events {
                                if this.log_dirty {
                                    this.log_dirty = false;
                                    this.scroll_handle.scroll_to_bottom();
                                }
                                cx.notify();
                            }
                        })
                        .is_ok();

                    // The view is gone once the window closes
                    if !alive {
                        break;
                    }

                    async_cx = cx_for_after_await;
                }
            }
        })
        .detach();
    }
}
