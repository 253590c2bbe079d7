//! Core application logic and state
//!
//! This module contains:
//! - Bitrate planning for target-size compression
//! - Audio filter chain composition for the equalizer
//! - Job requests and form validation
//! - Application configuration and per-channel state

mod bitrate;
mod filters;
mod job;
mod state;

pub use bitrate::{BitratePlan, format_bps, plan};
pub use filters::{DB_RANGE, FilterChain, SPEED_RANGE, compose};
pub use job::{
    AudioEditForm, AudioEditParams, CompressForm, CompressParams, ConvertForm, ConvertParams,
    JobId, JobRequest, Operation, OperationKind, validate_audio_edit, validate_compress,
    validate_convert,
};
pub use state::{AppConfig, ChannelState};
