//! Bitrate planning for target-size compression
//!
//! Given the size the user wants the finished file to be, the source
//! duration and the audio bitrate they asked for, work out which video
//! bitrate to hand to the encoder. The arithmetic matches what libx264 is
//! asked to hit; container overhead is not modelled.

/// Lowest video bitrate (bits/sec) we will ever hand to the encoder
pub const MIN_VIDEO_BPS: u64 = 10_000;

/// Share of the total budget used when the audio track alone would eat it
const FALLBACK_SHARE: f64 = 0.9;

/// Bytes per "MB" as typed into the target size field (binary megabytes)
const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Computed video/audio bitrate pair for one compression job
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitratePlan {
    /// Video bitrate in bits/sec (integer, passed as `-b:v`)
    pub video_bps: u64,
    /// Audio bitrate in bits/sec
    pub audio_bps: u64,
    /// True when the requested numbers were infeasible and the floor fallback was used
    pub clamped: bool,
}

impl BitratePlan {
    /// Video bitrate as the string passed after `-b:v`
    pub fn video_arg(&self) -> String {
        self.video_bps.to_string()
    }

    /// Audio bitrate in kbps, as the user typed it
    pub fn audio_kbps(&self) -> u64 {
        self.audio_bps / 1000
    }
}

/// Plan the bitrates for a compression job
///
/// # Arguments
/// * `target_size_mb` - Desired output size in (binary) megabytes
/// * `duration_secs` - Source duration in seconds, from ffprobe
/// * `audio_kbps` - Requested audio bitrate in kbps
///
/// # Returns
/// The plan, or an error if any input is not a positive finite number.
/// When the audio track leaves less than [`MIN_VIDEO_BPS`] for video, the
/// plan falls back to 90% of the total budget (never below the floor) and
/// sets `clamped` so the caller can tell the user.
pub fn plan(
    target_size_mb: f64,
    duration_secs: f64,
    audio_kbps: u32,
) -> Result<BitratePlan, String> {
    if !target_size_mb.is_finite() || target_size_mb <= 0.0 {
        return Err(format!("Target size must be greater than zero (got {})", target_size_mb));
    }
    if !duration_secs.is_finite() || duration_secs <= 0.0 {
        return Err(format!("Duration must be greater than zero (got {})", duration_secs));
    }
    if audio_kbps == 0 {
        return Err("Audio bitrate must be greater than zero".to_string());
    }

    let total_bps = target_size_mb * BYTES_PER_MB * 8.0 / duration_secs;
    let audio_bps = audio_kbps as u64 * 1000;
    let mut video_bps = total_bps - audio_bps as f64;
    let mut clamped = false;

    if video_bps < MIN_VIDEO_BPS as f64 {
        log::warn!(
            "Planned video bitrate {:.0} bps is below {} bps (total {:.0} bps, audio {} bps); \
             falling back to 90% of total",
            video_bps,
            MIN_VIDEO_BPS,
            total_bps,
            audio_bps
        );
        video_bps = (total_bps * FALLBACK_SHARE).max(MIN_VIDEO_BPS as f64);
        clamped = true;
    }

    Ok(BitratePlan {
        video_bps: video_bps as u64,
        audio_bps,
        clamped,
    })
}

/// Format bits/sec for display (e.g., "710.9 kbps")
pub fn format_bps(bps: u64) -> String {
    if bps >= 1_000_000 {
        format!("{:.2} Mbps", bps as f64 / 1_000_000.0)
    } else {
        format!("{:.1} kbps", bps as f64 / 1000.0)
    }
}
