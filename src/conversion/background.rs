//! Background job events and types
//!
//! Shared types passed from job threads back to the UI: log lines,
//! start/finish events and the job error taxonomy.

use std::fmt;
use std::path::PathBuf;
use std::sync::mpsc;

use crate::core::{JobId, OperationKind};

/// Why a job did not produce its output
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobError {
    /// The input file does not exist
    MissingInput(PathBuf),
    /// ffprobe could not determine a positive duration
    ProbeFailed(PathBuf),
    /// The tool returned but the expected output file is not there
    MissingOutput(PathBuf),
    /// The tool could not be started
    Spawn { program: String, message: String },
    /// The final ffmpeg run exited non-zero (`None` when killed by a signal)
    ToolFailed(Option<i32>),
    /// Filesystem problem outside the tool (output or temp directory)
    Io(String),
    /// Parameters rejected before the tool ran
    Validation(String),
    /// The job thread panicked
    Panicked(String),
}

impl fmt::Display for JobError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobError::MissingInput(path) => write!(f, "File not found: {}", path.display()),
            JobError::ProbeFailed(path) => write!(
                f,
                "Could not determine the duration of {} (ffprobe)",
                path.display()
            ),
            JobError::MissingOutput(path) => {
                write!(f, "Output file was not created: {}", path.display())
            }
            JobError::Spawn { program, message } => {
                write!(f, "Failed to start {}: {}", program, message)
            }
            JobError::ToolFailed(Some(code)) => write!(f, "ffmpeg exited with status {}", code),
            JobError::ToolFailed(None) => write!(f, "ffmpeg was terminated by a signal"),
            JobError::Io(message) => write!(f, "{}", message),
            JobError::Validation(message) => write!(f, "{}", message),
            JobError::Panicked(message) => write!(f, "Unexpected error: {}", message),
        }
    }
}

impl std::error::Error for JobError {}

/// One line for the log pane
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogLine {
    /// Job that produced the line
    pub job: JobId,
    /// Local wall-clock time, HH:MM:SS
    pub timestamp: String,
    pub text: String,
}

impl fmt::Display for LogLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.timestamp, self.text)
    }
}

/// Result of one job
#[derive(Debug, Clone)]
pub struct JobOutcome {
    pub job: JobId,
    pub kind: OperationKind,
    /// Path of the file written, or why there is none
    pub result: Result<PathBuf, JobError>,
}

/// Events emitted by job threads
#[derive(Debug, Clone)]
pub enum JobEvent {
    /// A job started on a channel
    Started { job: JobId, kind: OperationKind },
    /// A line of progress text
    Log(LogLine),
    /// A job finished (success or failure); its channel is idle again
    Finished(JobOutcome),
}

/// Append-only log sink handed to a running job
///
/// Every line is sent to the UI and mirrored to the application log.
#[derive(Debug, Clone)]
pub struct LogSink {
    job: JobId,
    tx: mpsc::Sender<JobEvent>,
}

impl LogSink {
    pub fn new(job: JobId, tx: mpsc::Sender<JobEvent>) -> Self {
        Self { job, tx }
    }

    /// Sink whose lines can be read back from the returned receiver (tests)
    #[cfg(test)]
    pub fn collecting() -> (Self, mpsc::Receiver<JobEvent>) {
        let (tx, rx) = mpsc::channel();
        (Self::new(JobId::new(), tx), rx)
    }

    pub fn job(&self) -> JobId {
        self.job
    }

    /// Append a line
    pub fn line(&self, text: impl Into<String>) {
        let text = text.into();
        log::debug!("[{}] {}", self.job.short(), text);
        let line = LogLine {
            job: self.job,
            timestamp: chrono::Local::now().format("%H:%M:%S").to_string(),
            text,
        };
        // The UI may already be gone during shutdown
        let _ = self.tx.send(JobEvent::Log(line));
    }

    /// Send a lifecycle event on the same channel as the log lines
    pub(crate) fn event(&self, event: JobEvent) {
        let _ = self.tx.send(event);
    }
}

/// Collect just the text of every log line in a receiver (tests)
#[cfg(test)]
pub fn drain_text(rx: &mpsc::Receiver<JobEvent>) -> Vec<String> {
    rx.try_iter()
        .filter_map(|event| match event {
            JobEvent::Log(line) => Some(line.text),
            _ => None,
        })
        .collect()
}
