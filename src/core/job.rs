//! Job requests
//!
//! A job request is built on the UI thread from the raw text in a tab's
//! fields, validated, and then handed to the executor. It is never changed
//! after submission.

use std::fmt;
use std::path::PathBuf;

use uuid::Uuid;

use super::filters::{DB_RANGE, SPEED_RANGE};

/// Allowed audio bitrate range on the equalizer tab (kbps)
pub const AUDIO_BITRATE_RANGE: (u32, u32) = (32, 320);

/// Unique identifier for a submitted job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct JobId(pub Uuid);

impl JobId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// First 8 hex characters, for log prefixes
    pub fn short(&self) -> String {
        self.0.simple().to_string()[..8].to_string()
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The four operations offered by the UI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    Convert,
    CompressPrecise,
    CompressFast,
    AudioEdit,
}

impl OperationKind {
    pub const ALL: [OperationKind; 4] = [
        OperationKind::Convert,
        OperationKind::CompressPrecise,
        OperationKind::CompressFast,
        OperationKind::AudioEdit,
    ];

    /// Tab label
    pub fn label(&self) -> &'static str {
        match self {
            OperationKind::Convert => "Convert",
            OperationKind::CompressPrecise => "Compress (precise)",
            OperationKind::CompressFast => "Compress (fast)",
            OperationKind::AudioEdit => "Equalizer",
        }
    }

    /// Stable index, used as the executor channel number
    pub fn index(&self) -> usize {
        match self {
            OperationKind::Convert => 0,
            OperationKind::CompressPrecise => 1,
            OperationKind::CompressFast => 2,
            OperationKind::AudioEdit => 3,
        }
    }
}

/// Parameters for a container conversion
#[derive(Debug, Clone, PartialEq)]
pub struct ConvertParams {
    /// Output extension without the leading dot
    pub extension: String,
}

/// Parameters shared by both compression modes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompressParams {
    pub target_size_mb: f64,
    pub audio_kbps: u32,
}

/// Parameters for the equalizer pass
#[derive(Debug, Clone, PartialEq)]
pub struct AudioEditParams {
    /// Lower-cased output extension without the leading dot
    pub extension: String,
    pub speed: f64,
    pub bass_db: i32,
    pub treble_db: i32,
    pub gain_db: i32,
    pub bitrate_kbps: u32,
}

/// Operation plus its parameters
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    Convert(ConvertParams),
    CompressPrecise(CompressParams),
    CompressFast(CompressParams),
    AudioEdit(AudioEditParams),
}

impl Operation {
    pub fn kind(&self) -> OperationKind {
        match self {
            Operation::Convert(_) => OperationKind::Convert,
            Operation::CompressPrecise(_) => OperationKind::CompressPrecise,
            Operation::CompressFast(_) => OperationKind::CompressFast,
            Operation::AudioEdit(_) => OperationKind::AudioEdit,
        }
    }
}

/// A validated job, ready to run
#[derive(Debug, Clone, PartialEq)]
pub struct JobRequest {
    pub id: JobId,
    pub input_path: PathBuf,
    pub operation: Operation,
}

impl JobRequest {
    pub fn new(input_path: PathBuf, operation: Operation) -> Self {
        Self {
            id: JobId::new(),
            input_path,
            operation,
        }
    }

    pub fn kind(&self) -> OperationKind {
        self.operation.kind()
    }
}

/// Raw text from the convert tab
#[derive(Debug, Clone, Default)]
pub struct ConvertForm<'a> {
    pub input: &'a str,
    pub extension: &'a str,
}

/// Raw text from either compression tab
#[derive(Debug, Clone, Default)]
pub struct CompressForm<'a> {
    pub input: &'a str,
    pub target_size_mb: &'a str,
    pub audio_kbps: &'a str,
}

/// Raw text from the equalizer tab
#[derive(Debug, Clone, Default)]
pub struct AudioEditForm<'a> {
    pub input: &'a str,
    pub extension: &'a str,
    pub speed: &'a str,
    pub bass_db: &'a str,
    pub treble_db: &'a str,
    pub gain_db: &'a str,
    pub bitrate_kbps: &'a str,
}

/// Strip surrounding whitespace and any leading dots from an extension
pub fn normalize_extension(raw: &str) -> String {
    raw.trim().trim_start_matches('.').to_string()
}

fn require_input(raw: &str, what: &str) -> Result<PathBuf, String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(format!("Select {} first", what));
    }
    Ok(PathBuf::from(trimmed))
}

fn parse_db(raw: &str, name: &str) -> Result<i32, String> {
    let value: i32 = raw
        .trim()
        .parse()
        .map_err(|_| format!("{} must be a whole number of dB", name))?;
    if value < DB_RANGE.0 || value > DB_RANGE.1 {
        return Err(format!(
            "{} must be between {} and {} dB",
            name, DB_RANGE.0, DB_RANGE.1
        ));
    }
    Ok(value)
}

/// Validate the convert tab
pub fn validate_convert(form: &ConvertForm<'_>) -> Result<JobRequest, String> {
    let input = form.input.trim();
    let extension = normalize_extension(form.extension);
    if input.is_empty() || extension.is_empty() {
        return Err("Select a file and enter an output extension".to_string());
    }
    Ok(JobRequest::new(
        PathBuf::from(input),
        Operation::Convert(ConvertParams { extension }),
    ))
}

/// Validate either compression tab
///
/// `kind` selects precise or fast; any other kind is an error.
pub fn validate_compress(
    form: &CompressForm<'_>,
    kind: OperationKind,
) -> Result<JobRequest, String> {
    let input = require_input(form.input, "a video file to compress")?;

    let invalid = || "Invalid target size or audio bitrate".to_string();
    let target_size_mb = form
        .target_size_mb
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v > 0.0)
        .ok_or_else(invalid)?;
    let audio_kbps = form
        .audio_kbps
        .trim()
        .parse::<u32>()
        .ok()
        .filter(|v| *v > 0)
        .ok_or_else(invalid)?;

    let params = CompressParams {
        target_size_mb,
        audio_kbps,
    };
    let operation = match kind {
        OperationKind::CompressPrecise => Operation::CompressPrecise(params),
        OperationKind::CompressFast => Operation::CompressFast(params),
        other => return Err(format!("{} is not a compression mode", other.label())),
    };

    Ok(JobRequest::new(input, operation))
}

/// Validate the equalizer tab
pub fn validate_audio_edit(form: &AudioEditForm<'_>) -> Result<JobRequest, String> {
    let input = require_input(form.input, "an audio file")?;

    let extension = normalize_extension(form.extension).to_lowercase();
    if extension.is_empty() {
        return Err("Enter an output extension".to_string());
    }

    let speed: f64 = form
        .speed
        .trim()
        .parse()
        .map_err(|_| "Speed must be a number".to_string())?;
    if !speed.is_finite() || speed < SPEED_RANGE.0 || speed > SPEED_RANGE.1 {
        return Err(format!(
            "Speed must be between {} and {}",
            SPEED_RANGE.0, SPEED_RANGE.1
        ));
    }

    let bass_db = parse_db(form.bass_db, "Bass")?;
    let treble_db = parse_db(form.treble_db, "Treble")?;
    let gain_db = parse_db(form.gain_db, "Gain")?;

    let bitrate_kbps: u32 = form
        .bitrate_kbps
        .trim()
        .parse()
        .map_err(|_| "Audio bitrate must be a whole number".to_string())?;
    if bitrate_kbps < AUDIO_BITRATE_RANGE.0 || bitrate_kbps > AUDIO_BITRATE_RANGE.1 {
        return Err(format!(
            "Audio bitrate must be between {} and {} kbps",
            AUDIO_BITRATE_RANGE.0, AUDIO_BITRATE_RANGE.1
        ));
    }

    Ok(JobRequest::new(
        input,
        Operation::AudioEdit(AudioEditParams {
            extension,
            speed,
            bass_db,
            treble_db,
            gain_db,
            bitrate_kbps,
        }),
    ))
}
