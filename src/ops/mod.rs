//! The operation engine: reading, writing and in-place editing of
//! [`crate::AudioBuffer`] contents.
//!
//! Operations are grouped by concern:
//!
//! - [`read`](mod@crate::ops::read): range reads into caller-requested
//!   formats and destinations.
//! - [`edit`](mod@crate::ops::edit): structural edits that may change the
//!   buffer length (write, insert, remove, slice, pad, shift).
//! - [`process`](mod@crate::ops::process): signal-level edits that keep the
//!   length (trim excepted: it removes silent edges), plus the windowed
//!   transform hook.
//!
//! Each operation resolves its boundaries through [`crate::range`] with its
//! own out-of-range policy, and negotiates data shapes through
//! [`crate::format`]. Option structs below are plain data with `Default`
//! impls; struct-update syntax (`..Default::default()`) is the intended way
//! to set just one of them.

pub mod edit;
pub mod process;
pub mod read;

use crate::format::{ChannelSel, Dtype, SampleFormat};

/// Default trim threshold in decibels (≈ 0.01 amplitude floor).
pub const DEFAULT_TRIM_THRESHOLD_DB: f64 = -40.0;

/// Default fade silence floor in decibels.
pub const DEFAULT_FADE_FLOOR_DB: f64 = -40.0;

/// Options for [`crate::AudioBuffer::read`] and
/// [`crate::AudioBuffer::read_into`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReadOptions {
    /// Channel selection; a single channel yields flat output.
    pub channel: ChannelSel,
    /// Output shape for multi-channel selections.
    pub format: SampleFormat,
    /// Output numeric width; non-f32 widths quantize.
    pub dtype: Dtype,
}

/// Options for the writing operations (`write`, `write_fn`, `insert`,
/// `reverse`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WriteOptions {
    /// Destination channel mapping: source channel `i` lands on the `i`-th
    /// selected channel. Default is identity over the shorter of the two
    /// channel counts.
    pub channels: ChannelSel,
}

/// Options for [`crate::AudioBuffer::trim`].
#[derive(Debug, Clone, PartialEq)]
pub struct TrimOptions {
    /// Silence threshold in decibels; samples below its linear equivalent on
    /// every channel count as silent.
    pub threshold_db: f64,
    /// `None` trims both ends, `Some(true)` only the head, `Some(false)`
    /// only the tail.
    pub left: Option<bool>,
}

impl Default for TrimOptions {
    fn default() -> Self {
        Self {
            threshold_db: DEFAULT_TRIM_THRESHOLD_DB,
            left: None,
        }
    }
}

/// Options for [`crate::AudioBuffer::pad`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PadOptions {
    /// Fill value for the appended or prepended region.
    pub value: f32,
    /// Prepend instead of append.
    pub left: bool,
}

/// Options for [`crate::AudioBuffer::shift`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ShiftOptions {
    /// Wrap shifted-out samples around to the opposite end instead of
    /// discarding them.
    pub rotate: bool,
}

/// Options for [`crate::AudioBuffer::normalize`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizeOptions {
    /// With the default `All`, every channel is scaled by its own peak. An
    /// explicit selection forms one shared-peak group: all listed channels
    /// are scaled by the group's common peak, preserving their relative
    /// levels.
    pub channel: ChannelSel,
}

/// Options for [`crate::AudioBuffer::fade`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FadeOptions {
    /// Decibel level the ramp starts from (fade-in) or decays to
    /// (fade-out).
    pub floor_db: f64,
}

impl Default for FadeOptions {
    fn default() -> Self {
        Self {
            floor_db: DEFAULT_FADE_FLOOR_DB,
        }
    }
}
