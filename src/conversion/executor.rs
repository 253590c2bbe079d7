//! Background job executor
//!
//! One channel per tab. Each submitted job runs on its own thread with a
//! current-thread tokio runtime, so a long encode never blocks the UI or
//! the other tabs. A channel accepts one job at a time.

use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;

use super::background::{JobError, JobEvent, JobOutcome, LogSink};
use super::jobs::run_job;
use crate::core::{AppConfig, ChannelState, JobId, JobRequest, OperationKind};

/// Handle for submitting jobs; cheap to clone
#[derive(Debug, Clone)]
pub struct JobExecutor {
    channels: [ChannelState; 4],
    events_tx: mpsc::Sender<JobEvent>,
}

/// Start an executor, returning it with the receiver the UI polls
pub fn start_executor() -> (JobExecutor, mpsc::Receiver<JobEvent>) {
    let (events_tx, events_rx) = mpsc::channel();
    let executor = JobExecutor {
        channels: Default::default(),
        events_tx,
    };
    (executor, events_rx)
}

impl JobExecutor {
    fn channel(&self, kind: OperationKind) -> &ChannelState {
        &self.channels[kind.index()]
    }

    /// Whether a job is running on the channel for `kind`
    pub fn is_busy(&self, kind: OperationKind) -> bool {
        self.channel(kind).is_busy()
    }

    /// Start a job on its operation's channel
    ///
    /// Fails without side effects if the channel already has a job in
    /// flight. The thread that runs the job always sends `Finished` and
    /// frees the channel, even if the job panics.
    pub fn submit(&self, request: JobRequest, config: &AppConfig) -> Result<JobId, String> {
        let kind = request.kind();
        let channel = self.channel(kind).clone();
        if !channel.try_acquire() {
            return Err(format!("A {} job is already running", kind.label()));
        }

        let job = request.id;
        let sink = LogSink::new(job, self.events_tx.clone());
        let config = config.clone();

        let spawned = thread::Builder::new()
            .name(format!("job-{}", job.short()))
            .spawn({
                let channel = channel.clone();
                move || {
                    log::info!(
                        "Starting {} job {} on {}",
                        kind.label(),
                        job.short(),
                        request.input_path.display()
                    );
                    sink.event(JobEvent::Started { job, kind });

                    let result = execute(&request, &config, &sink);
                    match &result {
                        Ok(path) => log::info!("Job {} wrote {}", job.short(), path.display()),
                        Err(e) => {
                            log::error!("Job {} failed: {}", job.short(), e);
                            sink.line(format!("Error: {}", e));
                        }
                    }

                    channel.release();
                    sink.event(JobEvent::Finished(JobOutcome { job, kind, result }));
                }
            });

        if let Err(e) = spawned {
            channel.release();
            return Err(format!("Failed to start job thread: {}", e));
        }
        Ok(job)
    }
}

/// Run one job on a fresh runtime, turning a panic into a job error
fn execute(request: &JobRequest, config: &AppConfig, sink: &LogSink) -> Result<PathBuf, JobError> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| JobError::Io(format!("Failed to create tokio runtime: {}", e)))?;

    catch_unwind(AssertUnwindSafe(|| {
        runtime.block_on(run_job(request, config, sink))
    }))
    .unwrap_or_else(|panic| Err(JobError::Panicked(panic_message(panic.as_ref()))))
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    panic
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| panic.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "job panicked".to_string())
}
