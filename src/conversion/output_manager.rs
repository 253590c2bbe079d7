//! Output directory management
//!
//! Everything a job writes goes into one fixed directory next to the
//! program. Output names are derived from the input stem plus a tag, and
//! never replace a file that already exists there.

use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::core::JobId;

/// Manages the output directory for finished files
#[derive(Debug, Clone)]
pub struct OutputManager {
    output_dir: PathBuf,
}

impl OutputManager {
    pub fn new(output_dir: &Path) -> Self {
        Self {
            output_dir: output_dir.to_path_buf(),
        }
    }

    /// Create the output directory if it doesn't exist
    pub fn ensure_dir(&self) -> Result<(), String> {
        if !self.output_dir.exists() {
            fs::create_dir_all(&self.output_dir)
                .map_err(|e| format!("Failed to create output directory: {}", e))?;
            log::info!("Created output directory: {:?}", self.output_dir);
        }
        Ok(())
    }

    /// Pick a free output path for `file_name` in the output directory
    ///
    /// The check and the later creation by ffmpeg are not atomic: two jobs
    /// resolving the same name at the same moment can both get it.
    pub fn resolve(&self, file_name: &str) -> PathBuf {
        unique_path(&self.output_dir.join(file_name))
    }
}

/// Return `dest` if it is free, otherwise the first free `{stem}_{n}{ext}`
pub fn unique_path(dest: &Path) -> PathBuf {
    if !dest.exists() {
        return dest.to_path_buf();
    }

    let stem = dest
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    let suffix = dest
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();

    let mut i: u32 = 1;
    loop {
        let candidate = dest.with_file_name(format!("{}_{}{}", stem, i, suffix));
        if !candidate.exists() {
            return candidate;
        }
        i += 1;
    }
}

/// Input file stem, or "output" if the path has none
pub fn input_stem(input: &Path) -> String {
    input
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "output".to_string())
}

/// Input extension including the dot, or empty
pub fn input_suffix(input: &Path) -> String {
    input
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default()
}

/// Prefix passed to `-passlogfile` for a two-pass job
///
/// ffmpeg appends `-0.log` (and `.mbtree` for libx264) to it.
pub fn passlog_prefix(passlog_dir: &Path, job: JobId) -> PathBuf {
    passlog_dir.join(format!("pass-{}", job.short()))
}

/// Delete every file in `passlog_dir` starting with the prefix's file name
///
/// Returns the number of files removed.
pub fn cleanup_passlogs(prefix: &Path) -> usize {
    let (Some(dir), Some(name)) = (prefix.parent(), prefix.file_name()) else {
        return 0;
    };
    let name = name.to_string_lossy().to_string();

    let mut removed = 0;
    for entry in WalkDir::new(dir).max_depth(1).into_iter().flatten() {
        if !entry.file_type().is_file() {
            continue;
        }
        if !entry.file_name().to_string_lossy().starts_with(&name) {
            continue;
        }
        match fs::remove_file(entry.path()) {
            Ok(()) => removed += 1,
            Err(e) => log::warn!("Failed to remove pass log {:?}: {}", entry.path(), e),
        }
    }
    removed
}

/// Open a directory in the platform file manager
pub fn open_directory(dir: &Path) -> Result<(), String> {
    if !dir.exists() {
        return Err(format!("Directory does not exist: {}", dir.display()));
    }

    let opener = if cfg!(target_os = "macos") {
        "open"
    } else if cfg!(windows) {
        "explorer"
    } else {
        "xdg-open"
    };

    std::process::Command::new(opener)
        .arg(dir)
        .spawn()
        .map(|_| ())
        .map_err(|e| format!("Failed to open {}: {}", dir.display(), e))
}
