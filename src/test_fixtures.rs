//! Test fixtures for job tests
//!
//! Jobs are exercised against small shell scripts standing in for ffmpeg
//! and ffprobe, so no real media tools are needed. The scripts are written
//! once per test process and keep their per-test state (call log, canned
//! duration, failure switches) next to the input file, which every test
//! places in its own temp directory.

#![cfg(all(test, unix))]

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use crate::core::AppConfig;

static TOOLS_DIR: OnceLock<PathBuf> = OnceLock::new();

const FAKE_FFMPEG: &str = r#"#!/bin/sh
input=""
passlog=""
pass=""
prev=""
last=""
for arg in "$@"; do
  case "$prev" in
    -i) input="$arg" ;;
    -passlogfile) passlog="$arg" ;;
    -pass) pass="$arg" ;;
  esac
  prev="$arg"
  last="$arg"
done
dir="$(dirname "$input")"
echo "$*" >> "$dir/calls.log"
echo "ffmpeg version fake" 1>&2
printf 'frame=    1 fps=0.0\rframe=    2 fps=0.0\r' 1>&2
is_copy=""
case " $* " in
  *" -c copy "*)
    is_copy=1
    if [ -f "$dir/fail_copy" ]; then
      : > "$last"
      echo "Could not write header for output file" 1>&2
      exit 1
    fi
    ;;
esac
if [ "$pass" = "1" ]; then
  echo "stats" > "$passlog-0.log"
  echo "tree" > "$passlog-0.log.mbtree"
  if [ -f "$dir/fail_pass1" ]; then
    exit 1
  fi
  exit 0
fi
if [ -z "$is_copy" ] && [ -f "$dir/fail_encode" ]; then
  : > "$last"
  echo "Error while encoding" 1>&2
  exit 1
fi
if [ -f "$dir/no_output" ]; then
  exit 0
fi
echo "media" > "$last"
exit 0
"#;

const FAKE_FFPROBE: &str = r#"#!/bin/sh
for arg in "$@"; do
  last="$arg"
done
dir="$(dirname "$last")"
if [ ! -f "$dir/duration" ]; then
  echo "Invalid data found when processing input" 1>&2
  exit 1
fi
printf '{ "format": { "duration": "%s" } }\n' "$(cat "$dir/duration")"
"#;

fn write_script(path: &Path, body: &str) {
    std::fs::write(path, body).expect("Failed to write fake tool");
    let mut perms = std::fs::metadata(path).unwrap().permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(path, perms).expect("Failed to make fake tool executable");
}

/// Directory holding the fake tools, created on first use
pub fn tools_dir() -> &'static Path {
    TOOLS_DIR.get_or_init(|| {
        let dir = std::env::temp_dir().join(format!(
            "videocodex_test_tools_{}",
            std::process::id()
        ));
        std::fs::create_dir_all(&dir).expect("Failed to create tools directory");
        write_script(&dir.join("ffmpeg"), FAKE_FFMPEG);
        write_script(&dir.join("ffprobe"), FAKE_FFPROBE);
        dir
    })
}

/// Create a dummy input file in `dir`
pub fn write_input(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, "not really media").expect("Failed to write input");
    path
}

/// Fake tool setup for one test directory
pub struct FakeTools {
    dir: PathBuf,
    pub config: AppConfig,
}

impl FakeTools {
    /// Config pointing at the fake tools; ffprobe reports 100 seconds
    pub fn new(dir: &Path) -> Self {
        let tools = tools_dir();
        let config = AppConfig {
            root_dir: dir.to_path_buf(),
            output_dir: dir.join("saves"),
            ffmpeg: tools.join("ffmpeg"),
            ffprobe: tools.join("ffprobe"),
            passlog_dir: dir.join("passlogs"),
        };
        Self {
            dir: dir.to_path_buf(),
            config,
        }
        .with_duration(Some(100.0))
    }

    fn marker(self, name: &str) -> Self {
        std::fs::write(self.dir.join(name), "").expect("Failed to write marker");
        self
    }

    /// Duration ffprobe reports, or None to make it fail
    pub fn with_duration(self, seconds: Option<f64>) -> Self {
        let path = self.dir.join("duration");
        match seconds {
            Some(s) => {
                std::fs::write(&path, format!("{:.6}", s)).expect("Failed to write duration")
            }
            None => {
                let _ = std::fs::remove_file(&path);
            }
        }
        self
    }

    /// Stream copy leaves an empty output behind and exits non-zero
    pub fn failing_stream_copy(self) -> Self {
        self.marker("fail_copy")
    }

    /// Every encode other than pass 1 and stream copy leaves an empty
    /// output behind and exits non-zero
    pub fn failing_encode(self) -> Self {
        self.marker("fail_encode")
    }

    /// First pass writes its stats but exits non-zero
    pub fn failing_first_pass(self) -> Self {
        self.marker("fail_pass1")
    }

    /// Every encode exits zero but writes no output file
    pub fn never_writing_output(self) -> Self {
        self.marker("no_output")
    }

    /// Argument lines of every ffmpeg call so far
    pub fn ffmpeg_calls(&self) -> Vec<String> {
        std::fs::read_to_string(self.dir.join("calls.log"))
            .map(|s| s.lines().map(|l| l.to_string()).collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_fake_tools_are_executable() {
        let dir = tools_dir();
        for tool in ["ffmpeg", "ffprobe"] {
            let mode = std::fs::metadata(dir.join(tool)).unwrap().permissions().mode();
            assert_ne!(mode & 0o111, 0);
        }
    }

    #[test]
    fn test_fake_ffprobe_reports_duration() {
        let temp_dir = TempDir::new().unwrap();
        let tools = FakeTools::new(temp_dir.path()).with_duration(Some(42.5));
        let input = write_input(temp_dir.path(), "clip.mp4");

        let output = std::process::Command::new(&tools.config.ffprobe)
            .arg(&input)
            .output()
            .unwrap();
        assert!(output.status.success());
        assert!(String::from_utf8_lossy(&output.stdout).contains("42.500000"));
    }

    #[test]
    fn test_no_calls_before_first_run() {
        let temp_dir = TempDir::new().unwrap();
        let tools = FakeTools::new(temp_dir.path());
        assert!(tools.ffmpeg_calls().is_empty());
    }
}
