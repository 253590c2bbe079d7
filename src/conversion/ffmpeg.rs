//! ffmpeg argument construction
//!
//! Every invocation is a flat argument list passed straight to the process,
//! never through a shell. Builders here are pure so the exact command lines
//! can be tested without running anything.

use std::ffi::{OsStr, OsString};
use std::path::Path;

use crate::core::{BitratePlan, FilterChain};

/// Input extensions treated as still images by the convert fallback
const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp", "bmp", "tiff", "gif"];

/// Video codec for every re-encode
const VIDEO_CODEC: &str = "libx264";

/// Audio codec selection for the equalizer output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioCodec {
    /// Re-encode with the named ffmpeg encoder
    Encode(&'static str),
    /// Stream copy; no bitrate is applied
    Copy,
}

/// Look up the audio encoder for an output extension
///
/// Unknown extensions fall back to stream copy.
pub fn audio_codec_for(extension: &str) -> AudioCodec {
    match extension.to_lowercase().as_str() {
        "mp3" => AudioCodec::Encode("libmp3lame"),
        "wav" => AudioCodec::Encode("pcm_s16le"),
        "flac" => AudioCodec::Encode("flac"),
        "aac" | "m4a" => AudioCodec::Encode("aac"),
        "ogg" => AudioCodec::Encode("libvorbis"),
        _ => AudioCodec::Copy,
    }
}

/// Whether the convert fallback should treat the input as an image
pub fn is_image(input: &Path) -> bool {
    input
        .extension()
        .map(|e| {
            let ext = e.to_string_lossy().to_lowercase();
            IMAGE_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

/// Null sink for the first pass of a two-pass encode
pub fn null_device() -> &'static str {
    if cfg!(windows) { "NUL" } else { "/dev/null" }
}

/// Small builder so argument lists read like the command line
#[derive(Debug, Default)]
struct Args(Vec<OsString>);

impl Args {
    fn new() -> Self {
        Self::default()
    }

    fn arg(mut self, value: impl AsRef<OsStr>) -> Self {
        self.0.push(value.as_ref().to_os_string());
        self
    }

    fn args<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.0.extend(values.into_iter().map(|v| v.as_ref().to_os_string()));
        self
    }

    /// `-y -i <input>`, the start of every command
    fn input(self, input: &Path) -> Self {
        self.args(["-y", "-i"]).arg(input)
    }

    fn build(self) -> Vec<OsString> {
        self.0
    }
}

/// Container conversion without re-encoding
pub fn stream_copy_args(input: &Path, output: &Path) -> Vec<OsString> {
    Args::new().input(input).args(["-c", "copy"]).arg(output).build()
}

/// Convert fallback after stream copy failed
///
/// Images are handed to ffmpeg with no codec options; anything else is
/// re-encoded to H.264 / AAC.
pub fn reencode_args(input: &Path, output: &Path) -> Vec<OsString> {
    if is_image(input) {
        return Args::new().input(input).arg(output).build();
    }
    Args::new()
        .input(input)
        .args(["-c:v", VIDEO_CODEC, "-preset", "medium", "-crf", "23"])
        .args(["-c:a", "aac", "-b:a", "128k"])
        .arg(output)
        .build()
}

/// First pass of a two-pass encode: video only, output discarded
pub fn first_pass_args(input: &Path, plan: &BitratePlan, passlog: &Path) -> Vec<OsString> {
    Args::new()
        .input(input)
        .args(["-c:v", VIDEO_CODEC, "-b:v"])
        .arg(plan.video_arg())
        .args(["-pass", "1", "-passlogfile"])
        .arg(passlog)
        .args(["-an", "-f", "mp4", null_device()])
        .build()
}

/// Second pass of a two-pass encode
pub fn second_pass_args(
    input: &Path,
    output: &Path,
    plan: &BitratePlan,
    passlog: &Path,
) -> Vec<OsString> {
    Args::new()
        .input(input)
        .args(["-c:v", VIDEO_CODEC, "-b:v"])
        .arg(plan.video_arg())
        .args(["-pass", "2", "-passlogfile"])
        .arg(passlog)
        .args(["-c:a", "aac", "-b:a"])
        .arg(format!("{}k", plan.audio_kbps()))
        .arg(output)
        .build()
}

/// Single-pass encode at the planned bitrate
pub fn fast_encode_args(input: &Path, output: &Path, plan: &BitratePlan) -> Vec<OsString> {
    Args::new()
        .input(input)
        .args(["-c:v", VIDEO_CODEC, "-b:v"])
        .arg(plan.video_arg())
        .args(["-preset", "fast", "-c:a", "aac", "-b:a"])
        .arg(format!("{}k", plan.audio_kbps()))
        .arg(output)
        .build()
}

/// Equalizer pass
///
/// The `-af` argument is omitted entirely for an empty chain. Copy mode
/// never gets a bitrate.
pub fn audio_edit_args(
    input: &Path,
    output: &Path,
    chain: &FilterChain,
    codec: AudioCodec,
    bitrate_kbps: u32,
) -> Vec<OsString> {
    let mut args = Args::new().input(input);

    if let Some(filter) = chain.to_arg() {
        args = args.arg("-af").arg(filter);
    }

    args = match codec {
        AudioCodec::Encode(name) => args
            .args(["-c:a", name, "-b:a"])
            .arg(format!("{}k", bitrate_kbps)),
        AudioCodec::Copy => args.args(["-c", "copy"]),
    };

    args.arg(output).build()
}

/// Render a command line for the log (display only, not re-parsed)
pub fn display_command(program: &Path, args: &[OsString]) -> String {
    let mut parts = vec![program.to_string_lossy().to_string()];
    parts.extend(args.iter().map(|a| a.to_string_lossy().to_string()));
    parts.join(" ")
}
