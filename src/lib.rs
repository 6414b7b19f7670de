// Correctness and logic
#![warn(clippy::unit_cmp)] // Detects comparing unit types
#![warn(clippy::match_same_arms)]
// Duplicate match arms

// Performance-focused
#![warn(clippy::inefficient_to_string)] // `format!("{}", x)` vs `x.to_string()`
#![warn(clippy::map_clone)] // Cloning inside `map()` unnecessarily
#![warn(clippy::unnecessary_to_owned)] // Detects redundant `.to_owned()` or `.clone()`
#![warn(clippy::large_stack_arrays)] // Helps avoid stack overflows
#![warn(clippy::needless_collect)] // Avoids `.collect().iter()` chains

// Style and idiomatic Rust
#![warn(clippy::redundant_clone)] // Detects unnecessary `.clone()`
#![warn(clippy::identity_op)] // e.g., `x + 0`, `x * 1`
#![warn(clippy::needless_return)] // Avoids `return` at the end of functions
#![warn(clippy::let_unit_value)] // Avoids binding `()` to variables
#![warn(clippy::manual_map)] // Use `.map()` instead of manual `match`
#![warn(clippy::unwrap_used)] // Avoids using `unwrap()`

// Maintainability
#![warn(clippy::missing_panics_doc)] // Docs for functions that might panic
#![warn(clippy::missing_const_for_fn)] // Suggests making eligible functions `const`
#![deny(missing_docs)] // Documentation is a must for release

//! # audio_edit
//!
//! A mutable, multi-channel, sample-accurate audio buffer with a rich
//! in-place editing API: the in-memory working representation for offline
//! audio editing.
//!
//! ## Overview
//!
//! The crate is built from four pieces:
//!
//! - [`AudioBuffer`] owns planar 32-bit float channels of equal length plus
//!   a sample rate — the single source of truth for contents.
//! - [`Window`] / [`range`](mod@range) resolve time-or-sample boundaries
//!   (including negative, fractional and omitted values) into concrete
//!   half-open sample ranges, applying each operation's out-of-range policy.
//! - [`Source`], [`ReadOutput`] and friends in [`format`](mod@format)
//!   negotiate between the native planar representation and external shapes:
//!   scalars, nested per-channel sequences, interleaved sequences, quantized
//!   PCM and foreign channel-major buffers.
//! - The operations in [`ops`](mod@ops) mutate or read the store: `read`,
//!   `write`, `insert`, `remove`, `slice`, `trim`, `pad`, `shift`,
//!   `normalize`, `fade`, `gain`, `reverse`, `invert` and the `through`
//!   transform hook.
//!
//! File codecs, streaming sources and synthesis are deliberately out of
//! scope; they interoperate by producing or consuming [`Source`] values and
//! read output.
//!
//! ## Quick Start
//!
//! ```rust
//! use audio_edit::{AudioBuffer, ChannelSel, ReadOptions, TrimOptions, Window, WriteOptions};
//!
//! // A 3-channel, 10-sample silent buffer.
//! let mut audio = AudioBuffer::silent(10, 3, 44100)?;
//!
//! // Write two channels of data; the third stays silent.
//! audio.write(
//!     vec![vec![0.0f32, 0.5, 1.0], vec![0.0, -0.5, -1.0]],
//!     Window::all(),
//!     &WriteOptions::default(),
//! )?;
//!
//! let front = audio
//!     .read(
//!         Window::all(),
//!         &ReadOptions { channel: ChannelSel::One(0), ..Default::default() },
//!     )?
//!     .into_mono()
//!     .unwrap();
//! assert_eq!(&front[..3], &[0.0, 0.5, 1.0]);
//!
//! // Editing chains through `?`.
//! audio.trim(&TrimOptions::default())?;
//! audio.gain(-6.0, Window::all())?;
//! # Ok::<(), audio_edit::AudioEditError>(())
//! ```
//!
//! ## Error Handling
//!
//! Every operation validates shapes and ranges before touching storage and
//! reports failures through [`AudioEditError`]; a returned error always
//! leaves the buffer unchanged. Valid-but-degenerate input (an empty range,
//! a zero normalization peak, a pad target not exceeding the length) is a
//! successful no-op.
//!
//! ## Concurrency
//!
//! All operations are synchronous. Mutation requires `&mut AudioBuffer`, so
//! the borrow checker enforces the "no concurrent mutation" contract that
//! the design otherwise leaves to callers.

mod buffer;
mod error;
pub mod format;
pub mod math;
pub mod ops;
pub mod range;

pub use crate::buffer::AudioBuffer;
pub use crate::error::{AudioEditError, AudioEditResult};
pub use crate::format::{
    ChannelSel, DestBuffer, Dtype, PcmSamples, ReadOutput, SampleFormat, Source,
};
pub use crate::math::{amplitude_to_db, db_to_amplitude, samples_to_seconds, seconds_to_samples};
pub use crate::ops::{
    DEFAULT_FADE_FLOOR_DB, DEFAULT_TRIM_THRESHOLD_DB, FadeOptions, NormalizeOptions, PadOptions,
    ReadOptions, ShiftOptions, TrimOptions, WriteOptions,
};
pub use crate::range::{Extent, RangePolicy, ResolvedRange, TimeSpec, Window, resolve};

/// Array of supported sample data types as string identifiers.
pub const SUPPORTED_DTYPES: [&str; 5] = ["f32", "u8", "i8", "i16", "i32"];

/// Left channel index.
pub const LEFT: usize = 0;
/// Right channel index.
pub const RIGHT: usize = 1;
