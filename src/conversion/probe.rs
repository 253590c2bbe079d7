//! Duration probing via ffprobe

use std::path::Path;
use std::process::Stdio;

use serde::Deserialize;
use tokio::process::Command;

#[derive(Debug, Deserialize)]
struct ProbeOutput {
    format: Option<ProbeFormat>,
}

#[derive(Debug, Deserialize)]
struct ProbeFormat {
    /// ffprobe reports the duration as a decimal string
    duration: Option<String>,
}

/// Parse ffprobe's JSON output into a positive duration in seconds
pub fn parse_duration(json: &str) -> Option<f64> {
    let output: ProbeOutput = serde_json::from_str(json).ok()?;
    let duration: f64 = output.format?.duration?.trim().parse().ok()?;
    (duration.is_finite() && duration > 0.0).then_some(duration)
}

/// Read a media file's duration in seconds
///
/// Returns None if ffprobe can't be started, fails, or reports no usable
/// duration.
pub async fn probe_duration(ffprobe: &Path, input: &Path) -> Option<f64> {
    let output = Command::new(ffprobe)
        .args(["-v", "error", "-show_entries", "format=duration", "-of", "json"])
        .arg(input)
        .stdin(Stdio::null())
        .output()
        .await;

    let output = match output {
        Ok(output) => output,
        Err(e) => {
            log::warn!("Failed to run {}: {}", ffprobe.display(), e);
            return None;
        }
    };

    if !output.status.success() {
        log::warn!(
            "ffprobe exited with {} for {}: {}",
            output.status,
            input.display(),
            String::from_utf8_lossy(&output.stderr).trim()
        );
        return None;
    }

    let duration = parse_duration(&String::from_utf8_lossy(&output.stdout));
    log::debug!("Probed duration of {}: {:?}", input.display(), duration);
    duration
}
