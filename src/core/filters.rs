//! Audio filter chain composition for the equalizer tab
//!
//! Turns the speed / bass / treble / gain controls into an ordered list of
//! ffmpeg audio filter stages. `atempo` only accepts factors in [0.5, 2.0],
//! so larger speed changes are split into several chained stages.

use std::fmt;

/// Smallest factor a single `atempo` stage accepts
const TEMPO_MIN: f64 = 0.5;
/// Largest factor a single `atempo` stage accepts
const TEMPO_MAX: f64 = 2.0;
/// Speeds this close to 1.0 are treated as "no change"
const NEUTRAL_EPSILON: f64 = 1e-6;

/// Allowed speed range for the tempo control
pub const SPEED_RANGE: (f64, f64) = (0.25, 4.0);
/// Allowed dB range for bass, treble and gain
pub const DB_RANGE: (i32, i32) = (-20, 20);

/// A single stage in the audio filter chain
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FilterStage {
    /// `atempo` stage; factor is always within [0.5, 2.0]
    Tempo(f64),
    /// Band gain centred at 100 Hz, 200 Hz half-bandwidth
    BassGain(i32),
    /// Band gain centred at 6 kHz, 2 kHz half-bandwidth
    TrebleGain(i32),
    /// Overall gain in dB
    Volume(i32),
}

impl fmt::Display for FilterStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterStage::Tempo(factor) => write!(f, "atempo={}", format_significant(*factor, 6)),
            FilterStage::BassGain(db) => {
                write!(f, "equalizer=f=100:width_type=h:width=200:g={}", db)
            }
            FilterStage::TrebleGain(db) => {
                write!(f, "equalizer=f=6000:width_type=h:width=2000:g={}", db)
            }
            FilterStage::Volume(db) => write!(f, "volume={}dB", db),
        }
    }
}

/// Ordered, immutable list of filter stages
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterChain {
    stages: Vec<FilterStage>,
}

impl FilterChain {
    pub fn stages(&self) -> &[FilterStage] {
        &self.stages
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Render as the value passed after `-af`, or None if the chain is empty
    pub fn to_arg(&self) -> Option<String> {
        if self.stages.is_empty() {
            return None;
        }
        let parts: Vec<String> = self.stages.iter().map(|s| s.to_string()).collect();
        Some(parts.join(","))
    }
}

/// Build the filter chain for the given controls
///
/// Tempo stages come first, then bass, treble and overall gain. Neutral
/// controls (speed 1.0, 0 dB) contribute nothing.
pub fn compose(speed: f64, bass_db: i32, treble_db: i32, gain_db: i32) -> FilterChain {
    let mut stages: Vec<FilterStage> = tempo_factors(speed)
        .into_iter()
        .map(FilterStage::Tempo)
        .collect();

    if bass_db != 0 {
        stages.push(FilterStage::BassGain(bass_db));
    }
    if treble_db != 0 {
        stages.push(FilterStage::TrebleGain(treble_db));
    }
    if gain_db != 0 {
        stages.push(FilterStage::Volume(gain_db));
    }

    FilterChain { stages }
}

/// Split a speed factor into `atempo`-compatible stages
///
/// The product of the returned factors equals `speed`.
pub fn tempo_factors(speed: f64) -> Vec<f64> {
    if !speed.is_finite() || speed <= 0.0 || (speed - 1.0).abs() <= NEUTRAL_EPSILON {
        return Vec::new();
    }

    let mut factors = Vec::new();
    let mut remaining = speed;

    while remaining < TEMPO_MIN {
        factors.push(TEMPO_MIN);
        remaining /= TEMPO_MIN;
    }
    while remaining > TEMPO_MAX {
        factors.push(TEMPO_MAX);
        remaining /= TEMPO_MAX;
    }

    if (remaining - 1.0).abs() > NEUTRAL_EPSILON {
        factors.push(remaining);
    }

    factors
}

/// Format a number with `digits` significant digits, trailing zeros removed
///
/// Switches to exponent notation for very large or very small magnitudes,
/// producing e.g. `1.5e-05` or `1.23457e+06`.
pub fn format_significant(value: f64, digits: usize) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    if !value.is_finite() {
        return value.to_string();
    }

    let digits = digits.max(1);
    // Rounding to `digits` may bump the exponent (9.999996 -> 1e+01), so read
    // it back from the rounded scientific form.
    let sci = format!("{:.*e}", digits - 1, value);
    let (mantissa, exponent) = match sci.split_once('e') {
        Some((m, e)) => (m.to_string(), e.parse::<i32>().unwrap_or(0)),
        None => (sci.clone(), 0),
    };

    if exponent < -4 || exponent >= digits as i32 {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{}e{}{:02}", strip_zeros(&mantissa), sign, exponent.abs())
    } else {
        let decimals = (digits as i32 - 1 - exponent).max(0) as usize;
        strip_zeros(&format!("{:.*}", decimals, value))
    }
}

fn strip_zeros(s: &str) -> String {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        s.to_string()
    }
}
