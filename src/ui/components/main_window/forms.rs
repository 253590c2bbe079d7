//! Per-tab form fields
//!
//! The raw text of every field lives here. A request is only built, and
//! validated, when the tab's button is pressed.

use crate::core::{
    AudioEditForm, CompressForm, ConvertForm, DB_RANGE, JobRequest,
    OperationKind, SPEED_RANGE, validate_audio_edit, validate_compress, validate_convert,
};
use crate::ui::components::text_field::{FieldKind, TextField};

/// Step size of the speed −/+ buttons
pub const SPEED_STEP: f64 = 0.05;
/// Step size of the dB −/+ buttons
pub const DB_STEP: f64 = 1.0;

/// Identifies one field across all tabs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldId {
    ConvertInput,
    ConvertExtension,
    PreciseInput,
    PreciseSize,
    PreciseAudio,
    FastInput,
    FastSize,
    FastAudio,
    EqInput,
    EqExtension,
    EqSpeed,
    EqBass,
    EqTreble,
    EqGain,
    EqBitrate,
}

impl FieldId {
    /// Element id for rendering
    pub fn element_id(&self) -> &'static str {
        match self {
            FieldId::ConvertInput => "convert-input",
            FieldId::ConvertExtension => "convert-extension",
            FieldId::PreciseInput => "precise-input",
            FieldId::PreciseSize => "precise-size",
            FieldId::PreciseAudio => "precise-audio",
            FieldId::FastInput => "fast-input",
            FieldId::FastSize => "fast-size",
            FieldId::FastAudio => "fast-audio",
            FieldId::EqInput => "eq-input",
            FieldId::EqExtension => "eq-extension",
            FieldId::EqSpeed => "eq-speed",
            FieldId::EqBass => "eq-bass",
            FieldId::EqTreble => "eq-treble",
            FieldId::EqGain => "eq-gain",
            FieldId::EqBitrate => "eq-bitrate",
        }
    }

    /// Step size and allowed range for fields with −/+ buttons
    pub fn stepper(&self) -> Option<(f64, (f64, f64))> {
        let db = (DB_RANGE.0 as f64, DB_RANGE.1 as f64);
        match self {
            FieldId::EqSpeed => Some((SPEED_STEP, SPEED_RANGE)),
            FieldId::EqBass | FieldId::EqTreble | FieldId::EqGain => Some((DB_STEP, db)),
            _ => None,
        }
    }
}

/// Fields shared by both compression tabs
#[derive(Debug, Clone)]
struct CompressFields {
    input: TextField,
    size: TextField,
    audio: TextField,
}

impl CompressFields {
    fn new() -> Self {
        Self {
            input: TextField::new(FieldKind::Text, ""),
            size: TextField::new(FieldKind::Decimal, "10"),
            audio: TextField::new(FieldKind::Integer, "128"),
        }
    }

    fn form(&self) -> CompressForm<'_> {
        CompressForm {
            input: self.input.text(),
            target_size_mb: self.size.text(),
            audio_kbps: self.audio.text(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Forms {
    convert_input: TextField,
    convert_extension: TextField,
    precise: CompressFields,
    fast: CompressFields,
    eq_input: TextField,
    eq_extension: TextField,
    eq_speed: TextField,
    eq_bass: TextField,
    eq_treble: TextField,
    eq_gain: TextField,
    eq_bitrate: TextField,
}

impl Default for Forms {
    fn default() -> Self {
        Self::new()
    }
}

impl Forms {
    pub fn new() -> Self {
        Self {
            convert_input: TextField::new(FieldKind::Text, ""),
            convert_extension: TextField::new(FieldKind::Text, "mp4"),
            precise: CompressFields::new(),
            fast: CompressFields::new(),
            eq_input: TextField::new(FieldKind::Text, ""),
            eq_extension: TextField::new(FieldKind::Text, "mp3"),
            eq_speed: TextField::new(FieldKind::Decimal, "1.0"),
            eq_bass: TextField::new(FieldKind::SignedInteger, "0"),
            eq_treble: TextField::new(FieldKind::SignedInteger, "0"),
            eq_gain: TextField::new(FieldKind::SignedInteger, "0"),
            eq_bitrate: TextField::new(FieldKind::Integer, "192"),
        }
    }

    pub fn field(&self, id: FieldId) -> &TextField {
        match id {
            FieldId::ConvertInput => &self.convert_input,
            FieldId::ConvertExtension => &self.convert_extension,
            FieldId::PreciseInput => &self.precise.input,
            FieldId::PreciseSize => &self.precise.size,
            FieldId::PreciseAudio => &self.precise.audio,
            FieldId::FastInput => &self.fast.input,
            FieldId::FastSize => &self.fast.size,
            FieldId::FastAudio => &self.fast.audio,
            FieldId::EqInput => &self.eq_input,
            FieldId::EqExtension => &self.eq_extension,
            FieldId::EqSpeed => &self.eq_speed,
            FieldId::EqBass => &self.eq_bass,
            FieldId::EqTreble => &self.eq_treble,
            FieldId::EqGain => &self.eq_gain,
            FieldId::EqBitrate => &self.eq_bitrate,
        }
    }

    pub fn field_mut(&mut self, id: FieldId) -> &mut TextField {
        match id {
            FieldId::ConvertInput => &mut self.convert_input,
            FieldId::ConvertExtension => &mut self.convert_extension,
            FieldId::PreciseInput => &mut self.precise.input,
            FieldId::PreciseSize => &mut self.precise.size,
            FieldId::PreciseAudio => &mut self.precise.audio,
            FieldId::FastInput => &mut self.fast.input,
            FieldId::FastSize => &mut self.fast.size,
            FieldId::FastAudio => &mut self.fast.audio,
            FieldId::EqInput => &mut self.eq_input,
            FieldId::EqExtension => &mut self.eq_extension,
            FieldId::EqSpeed => &mut self.eq_speed,
            FieldId::EqBass => &mut self.eq_bass,
            FieldId::EqTreble => &mut self.eq_treble,
            FieldId::EqGain => &mut self.eq_gain,
            FieldId::EqBitrate => &mut self.eq_bitrate,
        }
    }

    /// The file path field of a tab
    pub fn input_field(kind: OperationKind) -> FieldId {
        match kind {
            OperationKind::Convert => FieldId::ConvertInput,
            OperationKind::CompressPrecise => FieldId::PreciseInput,
            OperationKind::CompressFast => FieldId::FastInput,
            OperationKind::AudioEdit => FieldId::EqInput,
        }
    }

    /// A tab's fields in tab-key order
    pub fn tab_fields(kind: OperationKind) -> &'static [FieldId] {
        match kind {
            OperationKind::Convert => &[FieldId::ConvertInput, FieldId::ConvertExtension],
            OperationKind::CompressPrecise => &[
                FieldId::PreciseInput,
                FieldId::PreciseSize,
                FieldId::PreciseAudio,
            ],
            OperationKind::CompressFast => {
                &[FieldId::FastInput, FieldId::FastSize, FieldId::FastAudio]
            }
            OperationKind::AudioEdit => &[
                FieldId::EqInput,
                FieldId::EqExtension,
                FieldId::EqSpeed,
                FieldId::EqBass,
                FieldId::EqTreble,
                FieldId::EqGain,
                FieldId::EqBitrate,
            ],
        }
    }

    /// Set the path field of a tab
    pub fn set_input(&mut self, kind: OperationKind, path: &std::path::Path) {
        self.field_mut(Self::input_field(kind))
            .set_text(path.to_string_lossy().to_string());
    }

    /// Apply one −/+ press; fields without a stepper are left alone
    pub fn step(&mut self, id: FieldId, up: bool) {
        if let Some((step, range)) = id.stepper() {
            let delta = if up { step } else { -step };
            self.field_mut(id).step(delta, range);
        }
    }

    /// Validate a tab's fields into a job request
    pub fn build_request(&self, kind: OperationKind) -> Result<JobRequest, String> {
        match kind {
            OperationKind::Convert => validate_convert(&ConvertForm {
                input: self.convert_input.text(),
                extension: self.convert_extension.text(),
            }),
            OperationKind::CompressPrecise => validate_compress(&self.precise.form(), kind),
            OperationKind::CompressFast => validate_compress(&self.fast.form(), kind),
            OperationKind::AudioEdit => validate_audio_edit(&AudioEditForm {
                input: self.eq_input.text(),
                extension: self.eq_extension.text(),
                speed: self.eq_speed.text(),
                bass_db: self.eq_bass.text(),
                treble_db: self.eq_treble.text(),
                gain_db: self.eq_gain.text(),
                bitrate_kbps: self.eq_bitrate.text(),
            }),
        }
    }
}
