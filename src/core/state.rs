//! Application state types
//!
//! - AppConfig: paths resolved once at startup, read-only afterwards
//! - ChannelState: thread-safe busy flag for one tab's job channel

use gpui::Global;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Resolved locations of everything the jobs touch
///
/// Built once in `main` and cloned into every job, so no component reads
/// process-wide path state directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Directory the program runs from (manifest dir under cargo, else exe dir)
    pub root_dir: PathBuf,
    /// Where finished files are written
    pub output_dir: PathBuf,
    /// ffmpeg binary (absolute path, or bare name resolved through PATH)
    pub ffmpeg: PathBuf,
    /// ffprobe binary (absolute path, or bare name resolved through PATH)
    pub ffprobe: PathBuf,
    /// Scratch directory for two-pass statistics
    pub passlog_dir: PathBuf,
}

impl Global for AppConfig {}

impl AppConfig {
    /// Build a config rooted at `root_dir`, with tools in `root_dir/ffmpeg/`
    /// when bundled there
    pub fn rooted_at(root_dir: &Path) -> Self {
        let tool_dir = root_dir.join("ffmpeg");
        Self {
            root_dir: root_dir.to_path_buf(),
            output_dir: root_dir.join("saves"),
            ffmpeg: crate::conversion::locate_tool(&tool_dir, "ffmpeg"),
            ffprobe: crate::conversion::locate_tool(&tool_dir, "ffprobe"),
            passlog_dir: std::env::temp_dir().join("videocodex_passlogs"),
        }
    }
}

/// Busy flag for one job channel (one tab)
///
/// Clones share the same flag.
#[derive(Debug, Clone, Default)]
pub struct ChannelState {
    busy: Arc<AtomicBool>,
}

impl ChannelState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Try to mark the channel busy; false if a job is already in flight
    pub fn try_acquire(&self) -> bool {
        self.busy
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }

    pub fn release(&self) {
        self.busy.store(false, Ordering::SeqCst);
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }
}
