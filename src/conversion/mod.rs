//! Media tool integration
//!
//! Builds ffmpeg/ffprobe invocations, runs them in the background and
//! manages the output directory.

mod background;
mod executor;
mod ffmpeg;
mod jobs;
mod output_manager;
mod probe;
mod runner;

pub use background::JobEvent;
pub use executor::{JobExecutor, start_executor};
pub use output_manager::{OutputManager, open_directory};

use std::path::{Path, PathBuf};

use crate::core::AppConfig;

/// Binary file name for a tool on this platform
fn binary_name(tool: &str) -> String {
    if cfg!(windows) {
        format!("{}.exe", tool)
    } else {
        tool.to_string()
    }
}

/// Find a tool, preferring a copy bundled in `tool_dir`
///
/// Checks `tool_dir/<tool>.exe` and `tool_dir/<tool>`; if neither exists,
/// returns the bare tool name so the OS resolves it through `PATH`.
pub fn locate_tool(tool_dir: &Path, tool: &str) -> PathBuf {
    let candidates = [tool_dir.join(binary_name(tool)), tool_dir.join(tool)];
    for candidate in candidates {
        if candidate.is_file() {
            log::debug!("Found bundled {} at {:?}", tool, candidate);
            return candidate;
        }
    }
    log::debug!("No bundled {} in {:?}, using PATH", tool, tool_dir);
    PathBuf::from(tool)
}

/// Get the directory the program treats as its root
///
/// In development (running under cargo), uses CARGO_MANIFEST_DIR so a
/// bundled `ffmpeg/` next to Cargo.toml is picked up. Otherwise uses
/// the directory containing the executable.
pub fn get_root_dir() -> PathBuf {
    if let Ok(manifest_dir) = std::env::var("CARGO_MANIFEST_DIR") {
        let dev_path = PathBuf::from(manifest_dir);
        if dev_path.is_dir() {
            return dev_path;
        }
    }

    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Resolve the application config and create the output directory
pub fn resolve_config() -> Result<AppConfig, String> {
    let config = AppConfig::rooted_at(&get_root_dir());
    OutputManager::new(&config.output_dir).ensure_dir()?;

    log::info!("Output directory: {}", config.output_dir.display());
    log::info!("ffmpeg: {}", config.ffmpeg.display());
    log::info!("ffprobe: {}", config.ffprobe.display());
    Ok(config)
}
