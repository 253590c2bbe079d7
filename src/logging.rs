//! Session logging
//!
//! One logger for the whole process: info goes to the terminal, debug and
//! above to `videocodex.log` in the platform log directory.

use log::LevelFilter;
use simplelog::{
    ColorChoice, CombinedLogger, Config, ConfigBuilder, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

const APP_DIR: &str = "VideoCodex-Convertor";
const LOG_FILE: &str = "videocodex.log";

/// Rotate the log once it grows past this size
const MAX_LOG_BYTES: u64 = 10 * 1024 * 1024;

/// `~/Library/Logs/VideoCodex-Convertor` on macOS,
/// `<local data dir>/VideoCodex-Convertor/logs` elsewhere
pub fn get_log_directory() -> Option<PathBuf> {
    if cfg!(target_os = "macos") {
        dirs::home_dir().map(|h| h.join("Library").join("Logs").join(APP_DIR))
    } else {
        dirs::data_local_dir().map(|d| d.join(APP_DIR).join("logs"))
    }
}

pub fn get_log_file_path() -> Option<PathBuf> {
    get_log_directory().map(|d| d.join(LOG_FILE))
}

fn log_config() -> Config {
    ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_thread_level(LevelFilter::Off)
        .set_target_level(LevelFilter::Off)
        .build()
}

/// Move `log_path` aside to `<name>.old` if it is larger than `max_bytes`
///
/// Any previous `.old` file is replaced. Returns true if the file was moved.
fn rotate_if_large(log_path: &Path, max_bytes: u64) -> bool {
    let too_large = fs::metadata(log_path).map(|m| m.len() > max_bytes).unwrap_or(false);
    if !too_large {
        return false;
    }
    let mut backup = log_path.as_os_str().to_owned();
    backup.push(".old");
    fs::rename(log_path, PathBuf::from(backup)).is_ok()
}

/// Create `log_dir` if needed, rotate and open the log file for appending
fn open_log_file(log_dir: &Path) -> Result<(File, PathBuf), String> {
    fs::create_dir_all(log_dir).map_err(|e| format!("Could not create log directory: {}", e))?;

    let log_path = log_dir.join(LOG_FILE);
    rotate_if_large(&log_path, MAX_LOG_BYTES);

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .map_err(|e| format!("Could not open log file: {}", e))?;
    Ok((file, log_path))
}

/// Install the process logger, returning the log file path
///
/// Job threads log every line they show in the log pane at debug level,
/// prefixed with the job's short id, so the file holds the complete tool
/// output of a session while the terminal stays at info. Falls back to
/// terminal-only logging (and returns None) when the file is unavailable.
pub fn init_logging() -> Option<PathBuf> {
    let opened = get_log_directory()
        .ok_or_else(|| "Could not determine log directory".to_string())
        .and_then(|dir| open_log_file(&dir));

    let (log_file, log_path) = match opened {
        Ok(opened) => opened,
        Err(e) => {
            eprintln!("Warning: {}", e);
            let loggers: Vec<Box<dyn SharedLogger>> = vec![terminal_logger()];
            let _ = CombinedLogger::init(loggers);
            return None;
        }
    };

    let loggers: Vec<Box<dyn SharedLogger>> = vec![
        terminal_logger(),
        WriteLogger::new(LevelFilter::Debug, log_config(), log_file),
    ];
    if CombinedLogger::init(loggers).is_err() {
        eprintln!("Warning: Logger already initialized");
    }

    log::info!("=== VideoCodex Convertor session started ===");
    log::info!("Log file: {}", log_path.display());
    Some(log_path)
}

fn terminal_logger() -> Box<TermLogger> {
    TermLogger::new(LevelFilter::Info, log_config(), TerminalMode::Mixed, ColorChoice::Auto)
}

/// Open the log directory in the file manager (File > Open Log Folder)
pub fn open_log_directory() -> Result<(), String> {
    let log_dir = get_log_directory().ok_or("Could not determine log directory")?;
    crate::conversion::open_directory(&log_dir)
}
