//! Subprocess runner that streams tool output into a log sink
//!
//! ffmpeg reports progress on stderr using carriage returns, so output is
//! split on both `\r` and `\n` rather than read with `lines()`.

use std::ffi::OsString;
use std::path::Path;
use std::process::Stdio;

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;

use super::background::{JobError, LogSink};
use super::ffmpeg::display_command;

/// Splits a byte stream into text lines on `\r`, `\n` or `\r\n`
#[derive(Debug, Default)]
pub struct LineSplitter {
    pending: Vec<u8>,
}

impl LineSplitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed bytes, returning every line completed by them
    ///
    /// Blank lines are dropped.
    pub fn push(&mut self, bytes: &[u8]) -> Vec<String> {
        let mut lines = Vec::new();
        for &b in bytes {
            if b == b'\n' || b == b'\r' {
                if !self.pending.is_empty() {
                    lines.push(String::from_utf8_lossy(&self.pending).trim_end().to_string());
                    self.pending.clear();
                }
            } else {
                self.pending.push(b);
            }
        }
        lines.retain(|l| !l.is_empty());
        lines
    }

    /// Flush whatever is left after the stream ends
    pub fn finish(&mut self) -> Option<String> {
        if self.pending.is_empty() {
            return None;
        }
        let line = String::from_utf8_lossy(&self.pending).trim_end().to_string();
        self.pending.clear();
        (!line.is_empty()).then_some(line)
    }
}

/// Copy a stream into the sink line by line until EOF
async fn pump<R: AsyncRead + Unpin>(mut reader: R, sink: &LogSink) {
    let mut splitter = LineSplitter::new();
    let mut buf = [0u8; 4096];
    loop {
        match reader.read(&mut buf).await {
            Ok(0) => break,
            Ok(n) => {
                for line in splitter.push(&buf[..n]) {
                    sink.line(line);
                }
            }
            Err(e) => {
                log::warn!("Error reading tool output: {}", e);
                break;
            }
        }
    }
    if let Some(line) = splitter.finish() {
        sink.line(line);
    }
}

/// Run a tool to completion, streaming its stdout and stderr to `sink`
///
/// The command line is logged first. Returns the exit code, or `None` if the
/// process was terminated by a signal. Only a failure to start the process
/// is an error; a non-zero exit is for the caller to judge.
pub async fn run_tool(
    program: &Path,
    args: &[OsString],
    label: &str,
    sink: &LogSink,
) -> Result<Option<i32>, JobError> {
    sink.line(format!("{}: {}", label, display_command(program, args)));

    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| JobError::Spawn {
            program: program.to_string_lossy().to_string(),
            message: e.to_string(),
        })?;

    let stdout = child.stdout.take();
    let stderr = child.stderr.take();

    let pump_stdout = async {
        if let Some(out) = stdout {
            pump(out, sink).await;
        }
    };
    let pump_stderr = async {
        if let Some(err) = stderr {
            pump(err, sink).await;
        }
    };
    futures::join!(pump_stdout, pump_stderr);

    let status = child.wait().await.map_err(|e| JobError::Spawn {
        program: program.to_string_lossy().to_string(),
        message: e.to_string(),
    })?;

    log::debug!("{} exited with {}", program.display(), status);
    Ok(status.code())
}
